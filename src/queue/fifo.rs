//! FIFO 队列
//!
//! 按到达顺序出队；与链路层的容量检查组合即为经典 DropTail。

use std::collections::VecDeque;

use crate::net::Packet;

use super::PacketQueue;

#[derive(Debug, Default)]
pub struct FifoQueue {
    q: VecDeque<Packet>,
    cur_bytes: u64,
}

impl FifoQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PacketQueue for FifoQueue {
    fn enqueue(&mut self, pkt: Packet) {
        self.cur_bytes = self.cur_bytes.saturating_add(pkt.size_bytes as u64);
        self.q.push_back(pkt);
    }

    fn dequeue(&mut self) -> Option<Packet> {
        let pkt = self.q.pop_front()?;
        self.cur_bytes = self.cur_bytes.saturating_sub(pkt.size_bytes as u64);
        Some(pkt)
    }

    fn peek(&self) -> Option<&Packet> {
        self.q.front()
    }

    fn len(&self) -> usize {
        self.q.len()
    }

    fn bytes(&self) -> u64 {
        self.cur_bytes
    }
}
