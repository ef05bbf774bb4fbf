//! 链路类型
//!
//! 定义网络链路：串行化时延计算、出口队列策略与 ECN 标记阈值。

use super::id::NodeId;
use crate::queue::{FifoQueue, PacketQueue};
use crate::sim::SimTime;

/// 网络链路
#[derive(Debug)]
pub struct Link {
    pub from: NodeId,
    pub to: NodeId,
    pub latency: SimTime,
    pub bandwidth_bps: u64,
    /// 是否正在串行化发送一个 packet
    pub busy: bool,
    /// ECN 标记阈值（bytes）。None 表示不开启 ECN 标记。
    pub ecn_threshold_bytes: Option<u64>,
    /// 队列容量（bytes）。入队前由链路检查，超出即丢弃。
    pub capacity_bytes: u64,
    /// 链路上的排队策略（默认 FIFO，可替换为 pFabric / PIAS）
    pub queue: Box<dyn PacketQueue>,
}

impl Link {
    /// 创建新链路
    pub fn new(from: NodeId, to: NodeId, latency: SimTime, bandwidth_bps: u64) -> Self {
        Self {
            from,
            to,
            latency,
            bandwidth_bps,
            busy: false,
            ecn_threshold_bytes: None,
            capacity_bytes: u64::MAX,
            queue: Box::new(FifoQueue::new()),
        }
    }

    /// 计算传输指定字节数所需的时间
    pub(crate) fn tx_time(&self, bytes: u32) -> SimTime {
        // ceil(bytes*8 / bps) 秒 -> 纳秒
        if self.bandwidth_bps == 0 {
            return SimTime(u64::MAX / 4);
        }
        let bits = (bytes as u128).saturating_mul(8);
        let nanos = (bits.saturating_mul(1_000_000_000u128)
            + (self.bandwidth_bps as u128 - 1))
            / self.bandwidth_bps as u128;
        SimTime(nanos.min(u64::MAX as u128) as u64)
    }
}
