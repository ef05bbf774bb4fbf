//! 网络模拟模块
//!
//! 此模块包含网络模拟的核心组件，如节点、链路、数据包和网络拓扑。

// 子模块声明
mod deliver_packet;
mod id;
mod link;
mod link_ready;
mod net_world;
mod network;
mod network_proto;
mod node;
mod packet;
mod stats;
mod tags;
mod transport;

// 重新导出公共接口
pub use deliver_packet::DeliverPacket;
pub use id::{LinkId, NodeId};
pub use link::Link;
pub use link_ready::LinkReady;
pub use net_world::NetWorld;
pub use network::Network;
pub use node::{Host, Node, Switch};
pub use packet::{Ecn, Packet};
pub use stats::Stats;
pub use tags::SocketTags;
pub use transport::{TcpSegment, Transport};
