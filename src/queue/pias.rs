//! PIAS-style multi-level feedback queue.
//!
//! Approximates SRPT without knowing total flow sizes: the sender walks
//! an ascending ladder of bytes-sent thresholds to pick a priority
//! level, and the queue applies strict priority across per-level FIFO
//! bands. The link needs no flow-size knowledge, only the tag already
//! assigned by the sender.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::net::Packet;

use super::PacketQueue;

/// 经验流长分布的平均包长，阈值默认值以它为单位。
pub const MEAN_PACKET_SIZE: u64 = 1460;

/// Default ladder breakpoints, in units of [`MEAN_PACKET_SIZE`].
const DEFAULT_THRESH_PKTS: [u64; 7] = [750, 1132, 1456, 1737, 2010, 2199, 2325];

/// Threshold-ladder configuration errors; all fatal at setup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThresholdError {
    #[error("incomplete threshold specification: {got} values provided, {need} required")]
    Incomplete { got: usize, need: usize },
    #[error("thresholds must be strictly ascending (violated at index {index})")]
    NotAscending { index: usize },
    #[error("priority number must be at least 1")]
    ZeroPriorityNumber,
    #[error("empty threshold specification")]
    Empty,
    #[error("invalid threshold value {value:?}")]
    Parse { value: String },
}

/// Ascending ladder of cumulative bytes-sent thresholds defining
/// `priority_number` classes. Read-only after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PiasThresholds {
    threshs: Vec<u64>,
    priority_number: u16,
}

impl PiasThresholds {
    /// `priority_number` classes need `priority_number - 1` thresholds;
    /// extra trailing thresholds are allowed but inactive.
    pub fn new(threshs: Vec<u64>, priority_number: u16) -> Result<Self, ThresholdError> {
        if priority_number == 0 {
            return Err(ThresholdError::ZeroPriorityNumber);
        }
        let need = priority_number as usize - 1;
        if threshs.len() < need {
            return Err(ThresholdError::Incomplete {
                got: threshs.len(),
                need,
            });
        }
        for (index, pair) in threshs.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(ThresholdError::NotAscending { index: index + 1 });
            }
        }
        Ok(Self {
            threshs,
            priority_number,
        })
    }

    pub fn priority_number(&self) -> u16 {
        self.priority_number
    }

    /// Number of priority classes, i.e. queue bands.
    pub fn num_classes(&self) -> usize {
        self.priority_number as usize
    }

    /// Classify a sender by its cumulative bytes sent: first ladder rung
    /// not yet exceeded wins; past every rung the flow rides the lowest
    /// class.
    pub fn priority_of(&self, bytes_sent: u64) -> u8 {
        let active = self.priority_number as usize - 1;
        for (i, thresh) in self.threshs.iter().take(active).enumerate() {
            if bytes_sent <= *thresh {
                return i as u8;
            }
        }
        (self.priority_number - 1) as u8
    }
}

impl Default for PiasThresholds {
    fn default() -> Self {
        let threshs = DEFAULT_THRESH_PKTS
            .iter()
            .map(|pkts| pkts * MEAN_PACKET_SIZE)
            .collect();
        Self {
            threshs,
            priority_number: DEFAULT_THRESH_PKTS.len() as u16 + 1,
        }
    }
}

/// Serializes as a whitespace-separated ascending list of byte counts.
impl fmt::Display for PiasThresholds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, t) in self.threshs.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{t}")?;
        }
        Ok(())
    }
}

impl FromStr for PiasThresholds {
    type Err = ThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut threshs = Vec::new();
        for raw in s.split_whitespace() {
            let v: u64 = raw.parse().map_err(|_| ThresholdError::Parse {
                value: raw.to_string(),
            })?;
            threshs.push(v);
        }
        if threshs.is_empty() {
            return Err(ThresholdError::Empty);
        }
        let priority_number = threshs.len() as u16 + 1;
        Self::new(threshs, priority_number)
    }
}

/// Strict-priority queue over `num_classes` FIFO bands: lowest band
/// served first, FIFO within a band. Untagged (control) packets ride
/// band 0; levels past the last band clamp to it.
#[derive(Debug)]
pub struct PiasQueue {
    bands: Vec<VecDeque<Packet>>,
    cur_bytes: u64,
}

impl PiasQueue {
    pub fn new(num_classes: usize) -> Self {
        let bands = (0..num_classes.max(1)).map(|_| VecDeque::new()).collect();
        Self {
            bands,
            cur_bytes: 0,
        }
    }

    fn band_of(&self, pkt: &Packet) -> usize {
        match pkt.tags.priority {
            Some(level) => (level as usize).min(self.bands.len() - 1),
            None => 0,
        }
    }
}

impl PacketQueue for PiasQueue {
    fn enqueue(&mut self, pkt: Packet) {
        let band = self.band_of(&pkt);
        self.cur_bytes = self.cur_bytes.saturating_add(pkt.size_bytes as u64);
        self.bands[band].push_back(pkt);
    }

    fn dequeue(&mut self) -> Option<Packet> {
        let pkt = self.bands.iter_mut().find_map(|band| band.pop_front())?;
        self.cur_bytes = self.cur_bytes.saturating_sub(pkt.size_bytes as u64);
        Some(pkt)
    }

    fn peek(&self) -> Option<&Packet> {
        self.bands.iter().find_map(|band| band.front())
    }

    fn len(&self) -> usize {
        self.bands.iter().map(|band| band.len()).sum()
    }

    fn bytes(&self) -> u64 {
        self.cur_bytes
    }
}
