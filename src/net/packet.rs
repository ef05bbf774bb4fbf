//! 数据包类型
//!
//! 定义网络数据包、ECN 码点及其相关操作。

use super::id::NodeId;
use super::tags::SocketTags;
use super::transport::Transport;

/// ECN 码点（简化为三态）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ecn {
    /// 不支持 ECN（控制包默认）
    #[default]
    NotEct,
    /// ECT(0)：支持 ECN 的数据包
    Ect0,
    /// Congestion Experienced：队列已标记
    Ce,
}

impl Ecn {
    pub fn is_ect(self) -> bool {
        matches!(self, Ecn::Ect0)
    }

    pub fn is_ce(self) -> bool {
        matches!(self, Ecn::Ce)
    }
}

/// 网络数据包
#[derive(Debug, Clone)]
pub struct Packet {
    pub id: u64,
    /// 连接标识（网络层元数据，与调度用的 tags.flow 区分）
    pub flow_id: u64,
    pub size_bytes: u32,
    pub route: Vec<NodeId>,
    pub hop: usize, // 当前所在节点在 route 中的索引
    pub ecn: Ecn,
    pub tags: SocketTags,
    pub transport: Transport,
}

impl Packet {
    /// 获取源节点
    pub fn src(&self) -> NodeId {
        self.route[0]
    }

    /// 获取目标节点
    pub fn dst(&self) -> NodeId {
        *self.route.last().expect("route non-empty")
    }

    /// 获取当前所在节点
    pub fn at(&self) -> NodeId {
        self.route[self.hop]
    }

    /// 检查是否有下一跳
    pub fn has_next(&self) -> bool {
        self.hop + 1 < self.route.len()
    }

    /// 获取下一跳节点（如果有）
    pub fn next(&self) -> Option<NodeId> {
        self.route.get(self.hop + 1).copied()
    }

    /// 前进到下一跳
    pub fn advance(mut self) -> Self {
        self.hop += 1;
        self
    }

    /// 队列拥塞标记：仅对 ECT 包置 CE。
    pub fn mark_ce_if_ect(&mut self) -> bool {
        if self.ecn.is_ect() {
            self.ecn = Ecn::Ce;
            return true;
        }
        false
    }
}
