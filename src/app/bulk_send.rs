//! bulk-send 发送应用
//!
//! 以 `send_size` 为单位向发送缓冲写入数据，直到 `max_bytes` 写完。
//! 缓冲满（写入量不足）即停下，等缓冲空间通知恢复；可选的定速机制
//! 在连续写入 `delay_thresh` 个块后主动暂停 `delay_time`。

use thiserror::Error;
use tracing::{debug, trace};

use crate::net::Network;
use crate::proto::tcp::{TagMode, TcpStack};
use crate::queue::ThresholdError;
use crate::sim::{SimTime, Simulator};

use super::ResumeSend;

/// 应用配置错误；全部在构造时报告，随后不再校验。
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("send size must be at least 1 byte")]
    ZeroSendSize,
    #[error("remaining-bytes tagging requires a finite max_bytes")]
    UnboundedTaggedFlow,
    #[error(transparent)]
    Thresholds(#[from] ThresholdError),
}

#[derive(Debug, Clone)]
pub struct BulkSendConfig {
    /// 每次写入的字节数
    pub send_size: u32,
    /// 总发送量；0 表示不设上限
    pub max_bytes: u64,
    /// 连续多少个块后主动暂停；0 表示关闭定速
    pub delay_thresh: u32,
    /// 暂停时长
    pub delay_time: SimTime,
    /// 出包 TOS
    pub tos: u8,
    /// 发送端打标方式（pFabric 剩余字节 / PIAS 阈值级别）
    pub tag_mode: TagMode,
}

impl Default for BulkSendConfig {
    fn default() -> Self {
        Self {
            send_size: 500,
            max_bytes: 0,
            delay_thresh: 0,
            delay_time: SimTime::from_micros(100),
            tos: 0,
            tag_mode: TagMode::None,
        }
    }
}

impl BulkSendConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.send_size == 0 {
            return Err(ConfigError::ZeroSendSize);
        }
        if matches!(self.tag_mode, TagMode::RemainingBytes) && self.max_bytes == 0 {
            return Err(ConfigError::UnboundedTaggedFlow);
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct BulkSendApp {
    flow_id: u64,
    cfg: BulkSendConfig,
    tot_bytes: u64,
    accum_packets: u32,
    is_delay: bool,
    connected: bool,
}

impl BulkSendApp {
    pub fn new(flow_id: u64, cfg: BulkSendConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            flow_id,
            cfg,
            tot_bytes: 0,
            accum_packets: 0,
            is_delay: false,
            connected: false,
        })
    }

    pub fn flow_id(&self) -> u64 {
        self.flow_id
    }

    /// 应用已写入缓冲的总量
    pub fn tot_bytes(&self) -> u64 {
        self.tot_bytes
    }

    pub fn is_paused(&self) -> bool {
        self.is_delay
    }

    pub fn tag_mode(&self) -> &TagMode {
        &self.cfg.tag_mode
    }

    /// 连接建立完成，开始发送。
    pub fn on_started(&mut self, sim: &mut Simulator, tcp: &mut TcpStack, net: &mut Network) {
        debug!(flow_id = self.flow_id, "连接建立，开始发送");
        self.connected = true;
        self.send_data(sim, tcp, net);
    }

    /// 发送缓冲有空间了（唯一的阻塞恢复信号）。
    pub fn on_send_ready(&mut self, sim: &mut Simulator, tcp: &mut TcpStack, net: &mut Network) {
        if self.connected {
            self.send_data(sim, tcp, net);
        }
    }

    /// 定速暂停到期。
    pub fn on_resume(&mut self, sim: &mut Simulator, tcp: &mut TcpStack, net: &mut Network) {
        trace!(flow_id = self.flow_id, "定速暂停结束");
        self.is_delay = false;
        self.accum_packets = 0;
        if self.connected {
            self.send_data(sim, tcp, net);
        }
    }

    /// 持续写入直到缓冲满、触发定速暂停或写完 `max_bytes`。
    fn send_data(&mut self, sim: &mut Simulator, tcp: &mut TcpStack, net: &mut Network) {
        while self.cfg.max_bytes == 0 || self.tot_bytes < self.cfg.max_bytes {
            if self.is_delay {
                break;
            }

            let mut to_send = self.cfg.send_size as u64;
            if self.cfg.max_bytes > 0 {
                to_send = to_send.min(self.cfg.max_bytes - self.tot_bytes);
            }

            trace!(flow_id = self.flow_id, to_send, "写入发送缓冲");
            let actual = tcp.send(self.flow_id, to_send, sim, net);
            if actual > 0 {
                self.tot_bytes = self.tot_bytes.saturating_add(actual);
                self.accum_packets = self.accum_packets.saturating_add(1);
            }

            // 缓冲满：停止写入，等 SendBufferReady 通知，不轮询
            if actual < to_send {
                break;
            }

            if self.cfg.delay_thresh != 0 && self.accum_packets > self.cfg.delay_thresh {
                self.is_delay = true;
                sim.schedule_in(
                    self.cfg.delay_time,
                    ResumeSend {
                        flow_id: self.flow_id,
                    },
                );
                break;
            }
        }

        // 写完了：关闭写方向（已缓冲数据由传输层发完）
        if self.cfg.max_bytes > 0 && self.tot_bytes >= self.cfg.max_bytes && self.connected {
            debug!(flow_id = self.flow_id, tot_bytes = self.tot_bytes, "应用写入完成");
            tcp.close_tx(self.flow_id, sim);
            self.connected = false;
        }
    }
}
