//! D2TCP 拥塞算法
//!
//! 在 DCTCP 的 alpha 估计之上叠加 deadline 感知的惩罚函数：
//! `penalty = alpha ^ d`，d 为截止时间紧迫度。d 越大（越接近截止），
//! 惩罚越接近 alpha 本身，窗口缩减越激进；d 趋近 0 时 penalty 趋近 1
//! 对应满幅缩减——不紧迫的流在拥塞下照常让出带宽，紧迫的流（alpha 的
//! 高次幂趋 0）得以保住吞吐。

use tracing::debug;

use crate::sim::SimTime;

use super::{
    AckFlush, AlphaEstimator, CcEvent, CeState, CongState, CongestionOps, NewReno, SocketState,
};

/// deadline 已过期或极近时紧迫度的上限。
pub const MAX_IMMINENCE: f64 = 64.0;

#[derive(Debug, Clone)]
pub struct D2tcp {
    est: AlphaEstimator,
    ce: CeState,
    reno: NewReno,
    high_ack_mark: u64,

    /// 已被确认的累计字节（远端已收到的量）
    bytes_has_sent: u64,
    /// 从 tcb 快照的 deadline 与总量
    deadline: Option<SimTime>,
    bytes_to_tx: u64,

    /// T_c：以当前窗口的 3/4 发送剩余字节所需的窗口数（RTT 量级的保守估计）
    time_to_achieve: f64,
    /// D：距离 deadline 的剩余秒数（可为负，表示已过期）
    time_remain: f64,
    /// d = T_c / D，限制在 [0, MAX_IMMINENCE]
    deadline_imminence: f64,
    /// p = alpha ^ d
    penalty: f64,
}

impl D2tcp {
    pub fn new(g: f64) -> Self {
        Self {
            est: AlphaEstimator::new(g),
            ce: CeState::default(),
            reno: NewReno,
            high_ack_mark: 0,
            bytes_has_sent: 0,
            deadline: None,
            bytes_to_tx: 0,
            time_to_achieve: 0.0,
            time_remain: 0.0,
            deadline_imminence: 0.0,
            penalty: 0.0,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.est.alpha()
    }

    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    pub fn deadline_imminence(&self) -> f64 {
        self.deadline_imminence
    }

    pub fn time_remain(&self) -> f64 {
        self.time_remain
    }

    fn update_time_to_achieve(&mut self, window_bytes: f64, remaining_bytes: f64) {
        self.time_to_achieve = if window_bytes <= 0.0 {
            0.0
        } else {
            remaining_bytes / (0.75 * window_bytes)
        };
    }

    fn update_deadline_imminence(&mut self, now: SimTime) {
        let Some(deadline) = self.deadline else {
            // 无 deadline 的流固定 d = 1，退化为 DCTCP 行为
            self.time_remain = 0.0;
            self.deadline_imminence = 1.0;
            return;
        };
        self.time_remain = deadline.as_secs_f64() - now.as_secs_f64();
        self.deadline_imminence = if self.time_remain <= 0.0 {
            // 已过期：按最大紧迫度处理，不中断连接
            MAX_IMMINENCE
        } else {
            (self.time_to_achieve / self.time_remain).clamp(0.0, MAX_IMMINENCE)
        };
    }

    fn update_penalty(&mut self) {
        self.penalty = self.est.alpha().powf(self.deadline_imminence);
    }
}

impl CongestionOps for D2tcp {
    fn name(&self) -> &'static str {
        "D2TCP"
    }

    fn pkts_acked(
        &mut self,
        tcb: &mut SocketState,
        segments_acked: u32,
        ece: bool,
        high_tx_mark: u64,
        ack_number: u64,
        now: SimTime,
    ) {
        let bytes = (segments_acked as u64).saturating_mul(tcb.segment_size as u64);
        self.est
            .on_ack_processed(segments_acked, tcb.segment_size, ece);
        self.bytes_has_sent = self.bytes_has_sent.saturating_add(bytes);

        // 恰好每窗口一次，且四个量一起按固定顺序重算：
        // alpha -> T_c -> d -> penalty（penalty 依赖新鲜的 alpha）。
        if ack_number >= self.high_ack_mark {
            self.high_ack_mark = high_tx_mark;
            self.deadline = tcb.deadline;
            self.bytes_to_tx = tcb.bytes_to_tx;

            self.est.update_alpha();
            let remaining = self.bytes_to_tx.saturating_sub(self.bytes_has_sent);
            self.update_time_to_achieve(tcb.cwnd_bytes as f64, remaining as f64);
            self.update_deadline_imminence(now);
            self.update_penalty();

            debug!(
                alpha = self.est.alpha(),
                penalty = self.penalty,
                time_to_achieve = self.time_to_achieve,
                time_remain = self.time_remain,
                "deadline penalty updated"
            );
        }
    }

    fn ss_thresh(&self, tcb: &SocketState, bytes_in_flight: u64) -> u64 {
        if tcb.cong_state == CongState::Recovery {
            return self.reno.ss_thresh(tcb, bytes_in_flight);
        }
        let reduced = ((1.0 - self.penalty / 2.0) * tcb.cwnd_bytes as f64) as u64;
        reduced.max(bytes_in_flight / 2)
    }

    fn increase_window(&mut self, tcb: &mut SocketState, segments_acked: u32) {
        // CWR 期间保持窗口，与 DCTCP 相同
        if tcb.cong_state != CongState::Cwr {
            self.reno.increase_window(tcb, segments_acked);
        }
    }

    fn cwnd_event(&mut self, tcb: &mut SocketState, ev: CcEvent) -> Option<AckFlush> {
        self.ce.on_event(tcb, ev)
    }
}
