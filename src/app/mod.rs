//! 发送应用模块
//!
//! bulk-send 应用与驱动它的事件：启动、缓冲空间通知、定速恢复。
//! 应用与传输层之间不用回调，全部通过事件队列交接。

mod bulk_send;

pub use bulk_send::{BulkSendApp, BulkSendConfig, ConfigError};

use std::collections::HashMap;

use tracing::warn;

use crate::net::{NetWorld, Network};
use crate::proto::tcp::{TcpConn, TcpStack};
use crate::sim::{Event, Simulator, World};

/// 世界中注册的全部发送应用（按 flow id 索引）。
#[derive(Debug, Default)]
pub struct AppSet {
    apps: HashMap<u64, BulkSendApp>,
}

impl AppSet {
    pub fn insert(&mut self, app: BulkSendApp) {
        self.apps.insert(app.flow_id(), app);
    }

    pub fn get(&self, flow_id: u64) -> Option<&BulkSendApp> {
        self.apps.get(&flow_id)
    }

    pub fn get_mut(&mut self, flow_id: u64) -> Option<&mut BulkSendApp> {
        self.apps.get_mut(&flow_id)
    }

    /// 发送缓冲有空间了：恢复被阻塞的写入。
    pub fn on_send_ready(&mut self, flow_id: u64, sim: &mut Simulator, net: &mut Network) {
        let Some(app) = self.apps.get_mut(&flow_id) else {
            return;
        };
        let mut tcp = std::mem::take(&mut net.tcp);
        app.on_send_ready(sim, &mut tcp, net);
        net.tcp = tcp;
    }

    /// 定速暂停到期：清除暂停标志并继续发送。
    pub fn on_resume(&mut self, flow_id: u64, sim: &mut Simulator, net: &mut Network) {
        let Some(app) = self.apps.get_mut(&flow_id) else {
            return;
        };
        let mut tcp = std::mem::take(&mut net.tcp);
        app.on_resume(sim, &mut tcp, net);
        net.tcp = tcp;
    }
}

/// 事件：启动一条流（注册连接 + 应用并开始发送）。
///
/// 建连失败（路由不可达等）只记日志，流视为未启动，仿真继续。
pub struct AppStart {
    pub conn: TcpConn,
    pub app: BulkSendApp,
}

impl Event for AppStart {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let AppStart { mut conn, app } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");

        let flow_id = app.flow_id();
        // 发送端分类器由应用配置决定
        conn.set_tag_mode(app.tag_mode().clone());
        // 规避同时借用 `w.net` 与 `w.net.tcp`
        let mut tcp = std::mem::take(&mut w.net.tcp);
        match tcp.open(conn, &w.net) {
            Ok(()) => {
                w.apps.insert(app);
                if let Some(app) = w.apps.get_mut(flow_id) {
                    app.on_started(sim, &mut tcp, &mut w.net);
                }
            }
            Err(e) => {
                warn!(flow_id, error = %e, "连接建立失败，流未启动");
            }
        }
        w.net.tcp = tcp;
    }
}

/// 事件：连接的发送缓冲释放了空间（由传输层在 ACK 处理中调度）。
#[derive(Debug)]
pub struct SendBufferReady {
    pub flow_id: u64,
}

impl Event for SendBufferReady {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let SendBufferReady { flow_id } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");
        let mut apps = std::mem::take(&mut w.apps);
        apps.on_send_ready(flow_id, sim, &mut w.net);
        w.apps = apps;
    }
}

/// 事件：定速暂停到期，恢复发送。
#[derive(Debug)]
pub struct ResumeSend {
    pub flow_id: u64,
}

impl Event for ResumeSend {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let ResumeSend { flow_id } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");
        let mut apps = std::mem::take(&mut w.apps);
        apps.on_resume(flow_id, sim, &mut w.net);
        w.apps = apps;
    }
}
