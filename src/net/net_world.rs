//! 网络世界实现
//!
//! 定义网络仿真的世界（World）实现，持有网络拓扑与应用集合。

use super::network::Network;
use crate::app::AppSet;
use crate::sim::World;
use std::any::Any;

/// 一个默认的网络世界实现：持有 Network 与发送应用。
#[derive(Default)]
pub struct NetWorld {
    pub net: Network,
    pub apps: AppSet,
}

impl World for NetWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
