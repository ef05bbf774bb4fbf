//! 网络拓扑管理
//!
//! 定义网络拓扑结构：节点、链路、队列驱动的数据包转发与统计信息。

use std::collections::HashMap;

use super::deliver_packet::DeliverPacket;
use super::id::{LinkId, NodeId};
use super::link::Link;
use super::link_ready::LinkReady;
use super::node::{Host, Node, Switch};
use super::packet::{Ecn, Packet};
use super::stats::Stats;
use super::tags::SocketTags;
use super::transport::Transport;
use crate::proto::tcp::TcpStack;
use crate::queue::PacketQueue;
use crate::sim::{SimTime, Simulator};
use tracing::{debug, trace, warn};

/// 网络拓扑
#[derive(Default)]
pub struct Network {
    nodes: Vec<Option<Box<dyn Node>>>,
    links: Vec<Link>,
    edges: HashMap<(NodeId, NodeId), LinkId>,
    next_pkt_id: u64,
    pub stats: Stats,
    pub tcp: TcpStack,
}

impl Network {
    /// 添加主机节点
    pub fn add_host(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Box::new(Host::new(id, name))));
        id
    }

    /// 添加交换机节点
    pub fn add_switch(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Box::new(Switch::new(id, name))));
        id
    }

    /// 连接两个节点（创建单向链路）
    pub fn connect(
        &mut self,
        from: NodeId,
        to: NodeId,
        latency: SimTime,
        bandwidth_bps: u64,
    ) -> LinkId {
        let id = LinkId(self.links.len());
        self.links.push(Link::new(from, to, latency, bandwidth_bps));
        self.edges.insert((from, to), id);
        id
    }

    /// 路径上每对相邻节点之间是否都有链路
    pub fn has_route(&self, route: &[NodeId]) -> bool {
        route.len() >= 2
            && route
                .windows(2)
                .all(|pair| self.edges.contains_key(&(pair[0], pair[1])))
    }

    /// 替换链路上的队列策略
    pub fn set_link_queue(
        &mut self,
        from: NodeId,
        to: NodeId,
        queue: Box<dyn PacketQueue>,
    ) {
        if let Some(link) = self.link_mut(from, to) {
            link.queue = queue;
        }
    }

    /// 设置链路队列容量（bytes）
    pub fn set_link_queue_capacity_bytes(&mut self, from: NodeId, to: NodeId, cap: u64) {
        if let Some(link) = self.link_mut(from, to) {
            link.capacity_bytes = cap;
        }
    }

    /// 设置链路 ECN 标记阈值（bytes）
    pub fn set_link_ecn_threshold_bytes(&mut self, from: NodeId, to: NodeId, k: u64) {
        if let Some(link) = self.link_mut(from, to) {
            link.ecn_threshold_bytes = Some(k);
        }
    }

    fn link_mut(&mut self, from: NodeId, to: NodeId) -> Option<&mut Link> {
        let id = self.edges.get(&(from, to)).copied()?;
        self.links.get_mut(id.0)
    }

    /// 创建数据包
    pub fn make_packet(&mut self, flow_id: u64, size_bytes: u32, route: Vec<NodeId>) -> Packet {
        let id = self.next_pkt_id;
        self.next_pkt_id = self.next_pkt_id.wrapping_add(1);
        Packet {
            id,
            flow_id,
            size_bytes,
            route,
            hop: 0,
            ecn: Ecn::NotEct,
            tags: SocketTags::default(),
            transport: Transport::None,
        }
    }

    /// 将数据包交付给节点处理
    #[tracing::instrument(skip(self, sim), fields(pkt_id = pkt.id, to = ?to))]
    pub fn deliver(&mut self, to: NodeId, pkt: Packet, sim: &mut Simulator) {
        debug!("📬 将数据包交付给节点处理");

        // 暂时把节点取出来，避免 &mut self 与 &mut node 的重叠借用。
        let mut node = self.nodes[to.0].take().expect("node exists");
        trace!(node_name = %node.name(), "取出节点");

        node.on_packet(pkt, sim, self);

        trace!("节点处理完成，放回节点");
        self.nodes[to.0] = Some(node);
    }

    /// 从指定节点转发数据包：进入出口链路的队列，空闲则立即开始串行化发送
    #[tracing::instrument(skip(self, sim), fields(pkt_id = pkt.id, from = ?from, hop = pkt.hop))]
    pub fn forward_from(&mut self, from: NodeId, mut pkt: Packet, sim: &mut Simulator) {
        debug!("🚀 从指定节点转发数据包");

        let to = pkt.next().expect("has_next checked by caller");
        let link_id = *self
            .edges
            .get(&(from, to))
            .unwrap_or_else(|| panic!("no link from {:?} to {:?}", from, to));
        let link = &mut self.links[link_id.0];
        debug!(
            link_id = ?link_id,
            latency = ?link.latency,
            bandwidth_bps = link.bandwidth_bps,
            "找到链路"
        );

        let sz = pkt.size_bytes as u64;

        // 容量检查在链路层：队列策略本身无条件入队
        if link.queue.bytes().saturating_add(sz) > link.capacity_bytes {
            warn!(
                link_id = ?link_id,
                queued_bytes = link.queue.bytes(),
                capacity = link.capacity_bytes,
                "队列已满，丢弃数据包"
            );
            self.stats.dropped_pkts += 1;
            self.stats.dropped_bytes += sz;
            return;
        }

        // ECN：入队时基于瞬时队列占用做阈值标记
        if let Some(k) = link.ecn_threshold_bytes {
            if link.queue.bytes().saturating_add(sz) > k && pkt.mark_ce_if_ect() {
                trace!(link_id = ?link_id, queued_bytes = link.queue.bytes(), "CE 标记");
                self.stats.marked_pkts += 1;
            }
        }

        link.queue.enqueue(pkt);
        if !link.busy {
            self.start_link_tx(link_id, sim);
        }
    }

    /// 链路空闲时取出下一个 packet 开始串行化发送
    pub(crate) fn start_link_tx(&mut self, link_id: LinkId, sim: &mut Simulator) {
        let link = &mut self.links[link_id.0];
        let Some(pkt) = link.queue.dequeue() else {
            link.busy = false;
            return;
        };

        link.busy = true;
        let to = link.to;
        let tx_time = link.tx_time(pkt.size_bytes);
        let depart = sim.now().saturating_add(tx_time);
        let arrive = depart.saturating_add(link.latency);

        trace!(
            link_id = ?link_id,
            tx_time = ?tx_time,
            depart = ?depart,
            arrive = ?arrive,
            "开始串行化发送"
        );

        sim.schedule(depart, LinkReady { link_id });
        sim.schedule(
            arrive,
            DeliverPacket {
                to,
                pkt: pkt.advance(),
            },
        );
    }

    /// 一次串行化发送完成，继续发队列中的下一个
    pub(crate) fn on_link_ready(&mut self, link_id: LinkId, sim: &mut Simulator) {
        self.links[link_id.0].busy = false;
        self.start_link_tx(link_id, sim);
    }
}
