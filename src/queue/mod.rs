//! 队列策略（Queue disciplines）
//!
//! 提供 FIFO、pFabric（全知 SRPT）与 PIAS（阈值多级）三种出队策略。
//! 容量上限与丢包统计由持有队列的链路负责，策略本身只决定出队顺序。

use crate::net::Packet;

mod fifo;
mod pfabric;
mod pias;

pub use fifo::FifoQueue;
pub use pfabric::PfabricQueue;
pub use pias::{MEAN_PACKET_SIZE, PiasQueue, PiasThresholds, ThresholdError};

pub const DEFAULT_PKT_BYTES: u64 = 1500;

pub fn mem_from_pkt(pkts: u64) -> u64 {
    pkts.saturating_mul(DEFAULT_PKT_BYTES)
}

/// Packet 队列抽象
pub trait PacketQueue: std::fmt::Debug {
    /// 入队：无条件追加（容量检查在链路层）
    fn enqueue(&mut self, pkt: Packet);
    /// 出队：按队列策略返回下一个 packet
    fn dequeue(&mut self) -> Option<Packet>;
    /// 查看下一个将被出队的 packet；不修改队列内容
    fn peek(&self) -> Option<&Packet>;

    fn len(&self) -> usize;
    fn bytes(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
