//! pFabric-style shortest-remaining-flow-first queue.
//!
//! Senders tag every data packet with a priority equal to the flow's
//! remaining bytes; the queue serves the flow holding the smallest
//! priority value first, oldest segment of that flow first. Untagged
//! packets (ACKs and other control traffic) bypass data scheduling
//! entirely. Both scans are O(n) over the current queue depth, which is
//! the right tradeoff for a shallow bottleneck queue.

use std::collections::VecDeque;

use crate::net::Packet;

use super::PacketQueue;

#[derive(Debug, Default)]
pub struct PfabricQueue {
    items: VecDeque<Packet>,
    cur_bytes: u64,
}

impl PfabricQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the next packet to serve.
    ///
    /// Pass 1: a packet carrying neither a priority nor a flow tag is
    /// control traffic and wins immediately (FIFO among control).
    /// Otherwise find the smallest priority among fully tagged packets;
    /// strict `<` keeps the scan stable for equal priorities. Pass 2:
    /// serve the first-enqueued packet of the winning flow, which may be
    /// an earlier segment than the one that won pass 1.
    fn pick_index(&self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }

        let mut min: Option<(u64, u64, usize)> = None; // (priority, flow, index)
        for (i, pkt) in self.items.iter().enumerate() {
            if pkt.tags.is_control() {
                return Some(i);
            }
            let (Some(prio), Some(flow)) = (pkt.tags.priority, pkt.tags.flow) else {
                // Partially tagged: never wins the scan, drained below.
                continue;
            };
            if min.is_none_or(|(best, _, _)| prio < best) {
                min = Some((prio, flow, i));
            }
        }

        // Only partially tagged packets left: fall back to FIFO.
        let Some((_, flow, min_idx)) = min else {
            return Some(0);
        };

        let oldest_of_flow = self
            .items
            .iter()
            .position(|pkt| pkt.tags.flow == Some(flow));
        Some(oldest_of_flow.unwrap_or(min_idx))
    }
}

impl PacketQueue for PfabricQueue {
    fn enqueue(&mut self, pkt: Packet) {
        self.cur_bytes = self.cur_bytes.saturating_add(pkt.size_bytes as u64);
        self.items.push_back(pkt);
    }

    fn dequeue(&mut self) -> Option<Packet> {
        let idx = self.pick_index()?;
        let pkt = self.items.remove(idx)?;
        self.cur_bytes = self.cur_bytes.saturating_sub(pkt.size_bytes as u64);
        Some(pkt)
    }

    fn peek(&self) -> Option<&Packet> {
        let idx = self.pick_index()?;
        self.items.get(idx)
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn bytes(&self) -> u64 {
        self.cur_bytes
    }
}
