//! NewReno 基线
//!
//! 慢启动 + AIMD 的最小实现；丢包恢复时 DCTCP/D2TCP 也退回到这里。

use crate::sim::SimTime;

use super::{AckFlush, CcEvent, CongestionOps, SocketState};

#[derive(Debug, Clone, Copy, Default)]
pub struct NewReno;

impl CongestionOps for NewReno {
    fn name(&self) -> &'static str {
        "NewReno"
    }

    fn pkts_acked(
        &mut self,
        _tcb: &mut SocketState,
        _segments_acked: u32,
        _ece: bool,
        _high_tx_mark: u64,
        _ack_number: u64,
        _now: SimTime,
    ) {
    }

    fn ss_thresh(&self, tcb: &SocketState, bytes_in_flight: u64) -> u64 {
        let mss = tcb.segment_size as u64;
        (bytes_in_flight / 2).max(2 * mss)
    }

    fn increase_window(&mut self, tcb: &mut SocketState, segments_acked: u32) {
        let mss = tcb.segment_size as u64;
        if tcb.cwnd_bytes < tcb.ssthresh_bytes {
            // 慢启动：每确认一个段窗口加一个 MSS
            tcb.cwnd_bytes = tcb
                .cwnd_bytes
                .saturating_add(mss.saturating_mul(segments_acked as u64));
        } else {
            // 拥塞避免：每个 ACK 增加 mss^2/cwnd（至少 +1）
            let inc = (mss.saturating_mul(mss) / tcb.cwnd_bytes.max(1)).max(1);
            tcb.cwnd_bytes = tcb.cwnd_bytes.saturating_add(inc);
        }
    }

    fn cwnd_event(&mut self, _tcb: &mut SocketState, _ev: CcEvent) -> Option<AckFlush> {
        None
    }
}
