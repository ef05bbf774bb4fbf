//! 接收端 CE 边沿状态机
//!
//! 跟踪最近一个数据包的 CE 状态与延迟 ACK 预留标志。CE 状态翻转时，
//! 挂起的延迟 ACK 必须立即冲刷，保证标记信号的新鲜度；`demand_cwr`
//! 在 CE 期间置位，传输层据此在发出的 ACK 上回显 ECE。

use super::{AckFlush, CcEvent, SocketState};

#[derive(Debug, Clone, Default)]
pub struct CeState {
    is_ce: bool,
    has_delayed_ack: bool,
}

impl CeState {
    pub fn is_ce(&self) -> bool {
        self.is_ce
    }

    pub fn has_delayed_ack(&self) -> bool {
        self.has_delayed_ack
    }

    pub fn on_event(&mut self, tcb: &mut SocketState, ev: CcEvent) -> Option<AckFlush> {
        match ev {
            // No CE -> CE：冲刷的 ACK 确认的是进入 CE 之前的数据，
            // 所以不带 ECE。
            CcEvent::EcnIsCe if !self.is_ce => {
                let flush = self.has_delayed_ack.then_some(AckFlush::Plain);
                tcb.demand_cwr = true;
                self.is_ce = true;
                flush
            }
            // CE -> No CE：冲刷的 ACK 覆盖的还是 CE 期间的数据，带 ECE。
            CcEvent::EcnNoCe if self.is_ce => {
                let flush = self.has_delayed_ack.then_some(AckFlush::WithEce);
                tcb.demand_cwr = false;
                self.is_ce = false;
                flush
            }
            CcEvent::DelayAckReserved => {
                self.has_delayed_ack = true;
                None
            }
            CcEvent::DelayAckNoReserved => {
                self.has_delayed_ack = false;
                None
            }
            _ => None,
        }
    }
}
