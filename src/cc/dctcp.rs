//! DCTCP 拥塞算法
//!
//! alpha 估计 + CE 边沿状态机；ssthresh 按 `(1 - alpha/2) * cwnd` 缩减，
//! CWR 期间窗口保持不增长。丢包恢复退回 NewReno 基线。

use tracing::debug;

use crate::sim::SimTime;

use super::{
    AckFlush, AlphaEstimator, CcEvent, CeState, CongState, CongestionOps, NewReno, SocketState,
};

#[derive(Debug, Clone)]
pub struct Dctcp {
    est: AlphaEstimator,
    ce: CeState,
    reno: NewReno,
    /// 上次 alpha 更新时记录的发送高水位；ACK 越过它才触发下一次更新
    high_ack_mark: u64,
}

impl Dctcp {
    pub fn new(g: f64) -> Self {
        Self {
            est: AlphaEstimator::new(g),
            ce: CeState::default(),
            reno: NewReno,
            high_ack_mark: 0,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.est.alpha()
    }

    pub fn ce_state(&self) -> &CeState {
        &self.ce
    }
}

impl CongestionOps for Dctcp {
    fn name(&self) -> &'static str {
        "DCTCP"
    }

    fn pkts_acked(
        &mut self,
        tcb: &mut SocketState,
        segments_acked: u32,
        ece: bool,
        high_tx_mark: u64,
        ack_number: u64,
        _now: SimTime,
    ) {
        self.est
            .on_ack_processed(segments_acked, tcb.segment_size, ece);

        // 恰好每窗口一次：只有 ACK 水位线越过上次记录的高水位才更新，
        // 重复/乱序 ACK 不会再次触发。
        if ack_number >= self.high_ack_mark {
            self.high_ack_mark = high_tx_mark;
            self.est.update_alpha();
            debug!(
                alpha = self.est.alpha(),
                ce_fraction = self.est.ce_fraction(),
                "alpha updated"
            );
        }
    }

    fn ss_thresh(&self, tcb: &SocketState, bytes_in_flight: u64) -> u64 {
        if tcb.cong_state == CongState::Recovery {
            return self.reno.ss_thresh(tcb, bytes_in_flight);
        }
        let reduced = ((1.0 - self.est.alpha() / 2.0) * tcb.cwnd_bytes as f64) as u64;
        reduced.max(bytes_in_flight / 2)
    }

    fn increase_window(&mut self, tcb: &mut SocketState, segments_acked: u32) {
        // CWR 期间保持窗口，让 ssthresh 驱动的缩减在下个周期生效
        if tcb.cong_state != CongState::Cwr {
            self.reno.increase_window(tcb, segments_acked);
        }
    }

    fn cwnd_event(&mut self, tcb: &mut SocketState, ev: CcEvent) -> Option<AckFlush> {
        self.ce.on_event(tcb, ev)
    }
}
