//! 拥塞控制算法模块
//!
//! 包含 NewReno 基线、DCTCP（alpha 估计）与 D2TCP（deadline 感知）三种
//! 算法。算法对象是纯值类型：每条连接独立持有一份，`fork` 即深拷贝，
//! 供监听端派生子 socket 时继承当前数值状态。

mod alpha;
mod ce_state;
mod d2tcp;
mod dctcp;
mod new_reno;

pub use alpha::AlphaEstimator;
pub use ce_state::CeState;
pub use d2tcp::{D2tcp, MAX_IMMINENCE};
pub use dctcp::Dctcp;
pub use new_reno::NewReno;

use crate::sim::SimTime;

/// 拥塞状态机的三个状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CongState {
    /// 正常窗口增长
    #[default]
    Open,
    /// Congestion Window Reduced：CE 边沿触发，窗口保持到下一个周期
    Cwr,
    /// 丢包恢复：交给 NewReno 基线处理，ECN 扩展不介入
    Recovery,
}

/// 传输层向拥塞算法通告的事件。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CcEvent {
    /// 收到带 CE 标记的数据包
    EcnIsCe,
    /// 收到未标记（ECT）的数据包
    EcnNoCe,
    /// 接收端预留了一个延迟 ACK
    DelayAckReserved,
    /// 延迟 ACK 已发出或取消
    DelayAckNoReserved,
}

/// CE 边沿要求传输层立即补发的 ACK 类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckFlush {
    /// 立即发普通 ACK（进入 CE 前的数据）
    Plain,
    /// 立即发带 ECE 的 ACK（离开 CE 前的数据）
    WithEce,
}

/// 连接的共享 socket 状态块（算法读写的 tcb）。
#[derive(Debug, Clone)]
pub struct SocketState {
    pub cwnd_bytes: u64,
    pub ssthresh_bytes: u64,
    pub segment_size: u32,
    pub cong_state: CongState,
    /// 接收端 CE 状态的回显标志：置位期间发出的 ACK 带 ECE
    pub demand_cwr: bool,
    /// 截止时间（绝对仿真时间）；None 表示无 deadline
    pub deadline: Option<SimTime>,
    /// 本连接要发送的总字节数
    pub bytes_to_tx: u64,
}

impl SocketState {
    pub fn new(cwnd_bytes: u64, ssthresh_bytes: u64, segment_size: u32) -> Self {
        Self {
            cwnd_bytes,
            ssthresh_bytes,
            segment_size,
            cong_state: CongState::Open,
            demand_cwr: false,
            deadline: None,
            bytes_to_tx: 0,
        }
    }
}

/// 拥塞算法能力接口。
pub trait CongestionOps {
    fn name(&self) -> &'static str;

    /// 每个前向 ACK 调用一次；`high_tx_mark`/`ack_number` 用于
    /// 恰好每窗口一次的 alpha/penalty 更新判定。
    fn pkts_acked(
        &mut self,
        tcb: &mut SocketState,
        segments_acked: u32,
        ece: bool,
        high_tx_mark: u64,
        ack_number: u64,
        now: SimTime,
    );

    /// 进入 CWR / Recovery 时的新 ssthresh。
    fn ss_thresh(&self, tcb: &SocketState, bytes_in_flight: u64) -> u64;

    /// 窗口增长；算法自行决定在哪些状态下生效。
    fn increase_window(&mut self, tcb: &mut SocketState, segments_acked: u32);

    /// 状态机事件；CE 边沿可能要求传输层立即补发 ACK。
    fn cwnd_event(&mut self, tcb: &mut SocketState, ev: CcEvent) -> Option<AckFlush>;
}

/// 按变体分发的拥塞算法值类型。
#[derive(Debug, Clone)]
pub enum CcAlgo {
    NewReno(NewReno),
    Dctcp(Dctcp),
    D2tcp(D2tcp),
}

impl CcAlgo {
    pub fn new_reno() -> Self {
        CcAlgo::NewReno(NewReno)
    }

    pub fn dctcp(g: f64) -> Self {
        CcAlgo::Dctcp(Dctcp::new(g))
    }

    pub fn d2tcp(g: f64) -> Self {
        CcAlgo::D2tcp(D2tcp::new(g))
    }

    /// 显式深拷贝：克隆体从当前 alpha/penalty/计数器/标志出发。
    pub fn fork(&self) -> CcAlgo {
        self.clone()
    }

    /// 当前 alpha（NewReno 无此概念，返回 0）。
    pub fn alpha(&self) -> f64 {
        match self {
            CcAlgo::NewReno(_) => 0.0,
            CcAlgo::Dctcp(c) => c.alpha(),
            CcAlgo::D2tcp(c) => c.alpha(),
        }
    }
}

impl CongestionOps for CcAlgo {
    fn name(&self) -> &'static str {
        match self {
            CcAlgo::NewReno(c) => c.name(),
            CcAlgo::Dctcp(c) => c.name(),
            CcAlgo::D2tcp(c) => c.name(),
        }
    }

    fn pkts_acked(
        &mut self,
        tcb: &mut SocketState,
        segments_acked: u32,
        ece: bool,
        high_tx_mark: u64,
        ack_number: u64,
        now: SimTime,
    ) {
        match self {
            CcAlgo::NewReno(c) => c.pkts_acked(tcb, segments_acked, ece, high_tx_mark, ack_number, now),
            CcAlgo::Dctcp(c) => c.pkts_acked(tcb, segments_acked, ece, high_tx_mark, ack_number, now),
            CcAlgo::D2tcp(c) => c.pkts_acked(tcb, segments_acked, ece, high_tx_mark, ack_number, now),
        }
    }

    fn ss_thresh(&self, tcb: &SocketState, bytes_in_flight: u64) -> u64 {
        match self {
            CcAlgo::NewReno(c) => c.ss_thresh(tcb, bytes_in_flight),
            CcAlgo::Dctcp(c) => c.ss_thresh(tcb, bytes_in_flight),
            CcAlgo::D2tcp(c) => c.ss_thresh(tcb, bytes_in_flight),
        }
    }

    fn increase_window(&mut self, tcb: &mut SocketState, segments_acked: u32) {
        match self {
            CcAlgo::NewReno(c) => c.increase_window(tcb, segments_acked),
            CcAlgo::Dctcp(c) => c.increase_window(tcb, segments_acked),
            CcAlgo::D2tcp(c) => c.increase_window(tcb, segments_acked),
        }
    }

    fn cwnd_event(&mut self, tcb: &mut SocketState, ev: CcEvent) -> Option<AckFlush> {
        match self {
            CcAlgo::NewReno(c) => c.cwnd_event(tcb, ev),
            CcAlgo::Dctcp(c) => c.cwnd_event(tcb, ev),
            CcAlgo::D2tcp(c) => c.cwnd_event(tcb, ev),
        }
    }
}
