//! TCP（简化版）传输实现，拥塞算法可插拔
//!
//! 目标：支持 dumbbell 上的 DCN 拥塞实验所需的最小功能：
//! - 数据段/ACK 段，ACK 携带 ECE 回显
//! - 有界发送缓冲：`send` 返回实际接收的字节数，0 表示被阻塞；
//!   ACK 释放空间后通过事件通知应用恢复发送
//! - 延迟 ACK 合并，CE 边沿立即冲刷
//! - ECE 驱动的 CWR 进入/退出；3 dupACK 快速重传进入 Recovery；
//!   超时重传（指数退避的 RTO）
//!
//! 注意：这是仿真用途的“极简 TCP”，不实现握手/窗口通告/选择确认等。

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::app::SendBufferReady;
use crate::cc::{AckFlush, CcAlgo, CcEvent, CongState, CongestionOps, SocketState};
use crate::net::{Ecn, NetWorld, Network, NodeId, SocketTags, TcpSegment, Transport};
use crate::queue::PiasThresholds;
use crate::sim::{Event, SimTime, Simulator, World};

/// 一个 TCP 连接的唯一标识（复用 `flow_id` 的语义）。
pub type TcpConnId = u64;

/// 建连失败：流视为未启动，进程继续（由调用方记录日志）。
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("no usable route from {from:?} to {to:?}")]
    NoRoute { from: NodeId, to: NodeId },
    #[error("flow {0} already registered")]
    DuplicateFlow(u64),
}

/// 出包打标方式（发送端分类器）。
#[derive(Debug, Clone, Default)]
pub enum TagMode {
    /// 不打调度标签（FIFO 链路）
    #[default]
    None,
    /// priority = 流剩余字节（pFabric 全知模式）
    RemainingBytes,
    /// priority = 按已发送字节查阈值表得到的级别（PIAS）
    Pias(PiasThresholds),
}

#[derive(Debug, Clone)]
pub struct TcpConfig {
    /// MSS（数据段载荷大小，字节）
    pub mss: u32,
    /// ACK 包大小（字节）
    pub ack_bytes: u32,
    /// 初始 cwnd（字节）
    pub init_cwnd_bytes: u64,
    /// 初始 ssthresh（字节）
    pub init_ssthresh_bytes: u64,
    /// 初始 RTO
    pub init_rto: SimTime,
    /// 最大 RTO（用于退避上限）
    pub max_rto: SimTime,
    /// 发送缓冲容量（未确认 + 未发送字节上限）
    pub tx_buffer_bytes: u64,
    /// 每收到多少个按序段合并发一个 ACK（1 = 不延迟）
    pub delack_count: u32,
    /// 延迟 ACK 超时
    pub delack_timeout: SimTime,
    /// 出包 TOS 标记
    pub tos: u8,
}

impl Default for TcpConfig {
    fn default() -> Self {
        let mss = 1460;
        Self {
            mss,
            ack_bytes: 64,
            init_cwnd_bytes: (mss as u64).saturating_mul(10),
            init_ssthresh_bytes: (mss as u64).saturating_mul(1_000),
            init_rto: SimTime::from_micros(200),
            max_rto: SimTime::from_millis(200),
            tx_buffer_bytes: 128 * 1024,
            delack_count: 2,
            delack_timeout: SimTime::from_micros(100),
            tos: 0,
        }
    }
}

#[derive(Debug, Clone)]
struct SentSeg {
    len: u32,
}

#[derive(Debug, Clone)]
pub struct TcpConn {
    pub id: TcpConnId,
    pub src: NodeId,
    pub dst: NodeId,
    pub fwd_route: Vec<NodeId>,
    pub rev_route: Vec<NodeId>,
    pub cfg: TcpConfig,
    pub cc: CcAlgo,
    pub tcb: SocketState,
    tag_mode: TagMode,

    // sender
    buffered_end: u64, // 应用已写入发送缓冲的字节末尾
    next_seq: u64,
    last_acked: u64,
    dup_acks: u32,
    rto: SimTime,
    rto_epoch: u64, // 重启 RTO 定时器即递增，旧事件到期后自然失效
    inflight: BTreeMap<u64, SentSeg>, // seq -> segment
    recover_seq: u64,                 // Recovery 退出点
    cwr_end: u64,                     // CWR 退出点
    tx_closed: bool,                  // 应用不再写入

    // receiver
    rcv_nxt: u64,
    delack_segs: u32,
    delack_pending: bool,
    delack_gen: u64,

    // stats
    start_at: Option<SimTime>,
    done_at: Option<SimTime>,
}

impl TcpConn {
    /// `total_bytes` 是本流计划发送的总量（deadline 紧迫度与
    /// remaining-bytes 打标都依赖它）；0 表示未知/不设上限。
    pub fn new(
        id: TcpConnId,
        src: NodeId,
        dst: NodeId,
        fwd_route: Vec<NodeId>,
        total_bytes: u64,
        cc: CcAlgo,
        cfg: TcpConfig,
    ) -> Self {
        let mut rev_route = fwd_route.clone();
        rev_route.reverse();
        let init_rto = cfg.init_rto;
        let cwnd = cfg.init_cwnd_bytes.max(cfg.mss as u64);
        let ssthresh = cfg.init_ssthresh_bytes.max(cfg.mss as u64);
        let mut tcb = SocketState::new(cwnd, ssthresh, cfg.mss);
        tcb.bytes_to_tx = total_bytes;
        Self {
            id,
            src,
            dst,
            fwd_route,
            rev_route,
            cfg,
            cc,
            tcb,
            tag_mode: TagMode::None,
            buffered_end: 0,
            next_seq: 0,
            last_acked: 0,
            dup_acks: 0,
            rto: init_rto,
            rto_epoch: 0,
            inflight: BTreeMap::new(),
            recover_seq: 0,
            cwr_end: 0,
            tx_closed: false,
            rcv_nxt: 0,
            delack_segs: 0,
            delack_pending: false,
            delack_gen: 0,
            start_at: None,
            done_at: None,
        }
    }

    pub fn set_tag_mode(&mut self, mode: TagMode) {
        self.tag_mode = mode;
    }

    pub fn set_deadline(&mut self, deadline: SimTime) {
        self.tcb.deadline = Some(deadline);
    }

    pub fn bytes_acked(&self) -> u64 {
        self.last_acked
    }

    pub fn is_done(&self) -> bool {
        self.done_at.is_some()
    }

    pub fn start_time(&self) -> Option<SimTime> {
        self.start_at
    }

    pub fn done_time(&self) -> Option<SimTime> {
        self.done_at
    }

    /// 发送缓冲剩余空间
    pub fn tx_free_bytes(&self) -> u64 {
        let used = self.buffered_end.saturating_sub(self.last_acked);
        self.cfg.tx_buffer_bytes.saturating_sub(used)
    }

    fn earliest_unacked_seq(&self) -> Option<u64> {
        self.inflight.keys().next().copied()
    }

    fn inflight_bytes(&self) -> u64 {
        self.inflight.values().map(|s| s.len as u64).sum()
    }

    fn send_complete(&self) -> bool {
        self.tx_closed && self.last_acked >= self.buffered_end
    }

    /// 段的调度标签：发送端在创建段时一次性打上。
    fn tags_for(&self, seq: u64) -> SocketTags {
        match &self.tag_mode {
            TagMode::None => SocketTags {
                priority: None,
                flow: None,
                tos: self.cfg.tos,
            },
            TagMode::RemainingBytes => SocketTags::tagged(
                self.tcb.bytes_to_tx.saturating_sub(seq),
                self.id,
                self.cfg.tos,
            ),
            TagMode::Pias(threshs) => {
                SocketTags::tagged(threshs.priority_of(seq) as u64, self.id, self.cfg.tos)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct TcpStack {
    conns: HashMap<TcpConnId, TcpConn>,
}

impl TcpStack {
    /// 建立连接：校验路由可达后登记。失败时流不启动。
    pub fn open(&mut self, conn: TcpConn, net: &Network) -> Result<(), ConnectError> {
        if self.conns.contains_key(&conn.id) {
            return Err(ConnectError::DuplicateFlow(conn.id));
        }
        if !net.has_route(&conn.fwd_route) || !net.has_route(&conn.rev_route) {
            return Err(ConnectError::NoRoute {
                from: conn.src,
                to: conn.dst,
            });
        }
        self.conns.insert(conn.id, conn);
        Ok(())
    }

    pub fn get(&self, id: TcpConnId) -> Option<&TcpConn> {
        self.conns.get(&id)
    }

    pub fn get_mut(&mut self, id: TcpConnId) -> Option<&mut TcpConn> {
        self.conns.get_mut(&id)
    }

    /// 连接拆除：移除后，引用它的未决事件（RTO/延迟 ACK）到期即失效。
    pub fn remove(&mut self, id: TcpConnId) -> Option<TcpConn> {
        self.conns.remove(&id)
    }

    /// 应用写入接口：返回实际写入缓冲的字节数。
    ///
    /// 返回值小于 `bytes`（可能为 0）表示缓冲已满，调用方应停止写入，
    /// 等待缓冲空间释放的通知事件，不要轮询重试。
    pub fn send(
        &mut self,
        id: TcpConnId,
        bytes: u64,
        sim: &mut Simulator,
        net: &mut Network,
    ) -> u64 {
        let Some(conn) = self.conns.get_mut(&id) else {
            return 0;
        };
        if conn.tx_closed {
            return 0;
        }
        if conn.start_at.is_none() {
            conn.start_at = Some(sim.now());
        }
        let accepted = bytes.min(conn.tx_free_bytes());
        conn.buffered_end = conn.buffered_end.saturating_add(accepted);
        trace!(conn_id = id, bytes, accepted, "应用写入发送缓冲");
        if accepted > 0 {
            self.try_send(id, sim, net);
        }
        accepted
    }

    /// 应用侧关闭写方向；已缓冲数据仍会发完。
    pub fn close_tx(&mut self, id: TcpConnId, sim: &mut Simulator) {
        let Some(conn) = self.conns.get_mut(&id) else {
            return;
        };
        conn.tx_closed = true;
        if conn.send_complete() && conn.done_at.is_none() {
            conn.done_at = Some(sim.now());
        }
    }

    /// 窗口允许时产生数据段发出。
    pub(crate) fn try_send(&mut self, id: TcpConnId, sim: &mut Simulator, net: &mut Network) {
        let Some(conn) = self.conns.get_mut(&id) else {
            return;
        };
        if conn.done_at.is_some() {
            return;
        }

        let mut avail = conn.tcb.cwnd_bytes.saturating_sub(conn.inflight_bytes());

        while avail > 0 && conn.next_seq < conn.buffered_end {
            let remain = conn.buffered_end - conn.next_seq;
            let len = (conn.cfg.mss as u64).min(remain).min(avail) as u32;
            if len == 0 {
                break;
            }
            let seq = conn.next_seq;
            conn.next_seq = conn.next_seq.saturating_add(len as u64);
            avail = avail.saturating_sub(len as u64);

            let mut pkt = net.make_packet(conn.id, len, conn.fwd_route.clone());
            pkt.transport = Transport::Tcp(TcpSegment::Data { seq, len });
            pkt.ecn = Ecn::Ect0;
            pkt.tags = conn.tags_for(seq);

            debug!(conn_id = id, seq, len, prio = ?pkt.tags.priority, "发送数据段");

            let was_empty = conn.inflight.is_empty();
            conn.inflight.insert(seq, SentSeg { len });

            // 没有未确认段在途时，发出第一段即启动 RTO 定时器
            if was_empty {
                arm_rto(conn, sim);
            }

            net.forward_from(conn.src, pkt, sim);
        }
    }

    fn send_ack(
        &mut self,
        id: TcpConnId,
        ack: u64,
        ece: bool,
        sim: &mut Simulator,
        net: &mut Network,
    ) {
        let Some(conn) = self.conns.get(&id) else {
            return;
        };
        // ACK 是控制包：不打调度标签，不参与 ECN
        let mut pkt = net.make_packet(conn.id, conn.cfg.ack_bytes, conn.rev_route.clone());
        pkt.transport = Transport::Tcp(TcpSegment::Ack { ack, ece });
        trace!(conn_id = id, ack, ece, "发送 ACK");
        net.forward_from(conn.dst, pkt, sim);
    }

    pub fn on_tcp_segment(
        &mut self,
        conn_id: TcpConnId,
        at: NodeId,
        seg: TcpSegment,
        ecn: Ecn,
        sim: &mut Simulator,
        net: &mut Network,
    ) {
        match seg {
            TcpSegment::Data { seq, len } => {
                self.on_data(conn_id, at, seq, len, ecn, sim, net);
            }
            TcpSegment::Ack { ack, ece } => {
                self.on_ack(conn_id, at, ack, ece, sim, net);
            }
        }
    }

    /// 接收端：CE 状态机先行，再做按序接收与延迟 ACK 合并。
    fn on_data(
        &mut self,
        conn_id: TcpConnId,
        at: NodeId,
        seq: u64,
        len: u32,
        ecn: Ecn,
        sim: &mut Simulator,
        net: &mut Network,
    ) {
        let Some(conn) = self.conns.get_mut(&conn_id) else {
            return;
        };
        if at != conn.dst {
            return;
        }

        // CE 边沿先于数据处理：冲刷的 ACK 确认的是旧的 rcv_nxt
        let mut flush: Option<(u64, bool)> = None;
        let ce_event = if ecn.is_ce() {
            Some(CcEvent::EcnIsCe)
        } else if ecn.is_ect() {
            Some(CcEvent::EcnNoCe)
        } else {
            None
        };
        if let Some(ev) = ce_event {
            if let Some(kind) = conn.cc.cwnd_event(&mut conn.tcb, ev) {
                flush = Some((conn.rcv_nxt, matches!(kind, AckFlush::WithEce)));
                conn.delack_pending = false;
                conn.delack_segs = 0;
                conn.delack_gen = conn.delack_gen.wrapping_add(1);
                conn.cc.cwnd_event(&mut conn.tcb, CcEvent::DelayAckNoReserved);
            }
        }

        let in_order = seq == conn.rcv_nxt;
        if in_order {
            conn.rcv_nxt = conn.rcv_nxt.saturating_add(len as u64);
        }

        let mut immediate: Option<(u64, bool)> = None;
        if !in_order {
            // 乱序/重复：立即发累计 ACK（dupACK 体现为 ack 不前进）
            immediate = Some((conn.rcv_nxt, conn.tcb.demand_cwr));
            if conn.delack_pending {
                conn.delack_pending = false;
                conn.delack_gen = conn.delack_gen.wrapping_add(1);
                conn.cc.cwnd_event(&mut conn.tcb, CcEvent::DelayAckNoReserved);
            }
            conn.delack_segs = 0;
        } else {
            conn.delack_segs = conn.delack_segs.saturating_add(1);
            if conn.delack_segs >= conn.cfg.delack_count.max(1) {
                immediate = Some((conn.rcv_nxt, conn.tcb.demand_cwr));
                if conn.delack_pending {
                    conn.delack_pending = false;
                    conn.delack_gen = conn.delack_gen.wrapping_add(1);
                    conn.cc.cwnd_event(&mut conn.tcb, CcEvent::DelayAckNoReserved);
                }
                conn.delack_segs = 0;
            } else if !conn.delack_pending {
                // 预留一个延迟 ACK，超时后冲刷
                conn.delack_pending = true;
                conn.delack_gen = conn.delack_gen.wrapping_add(1);
                let r#gen = conn.delack_gen;
                conn.cc.cwnd_event(&mut conn.tcb, CcEvent::DelayAckReserved);
                sim.schedule_in(conn.cfg.delack_timeout, DelAckTimeout { conn_id, r#gen });
            }
        }

        if let Some((ack, ece)) = flush {
            self.send_ack(conn_id, ack, ece, sim, net);
        }
        if let Some((ack, ece)) = immediate {
            self.send_ack(conn_id, ack, ece, sim, net);
        }
    }

    /// 发送端：前向 ACK 驱动算法更新、CWR/Recovery 状态与继续发送。
    fn on_ack(
        &mut self,
        conn_id: TcpConnId,
        at: NodeId,
        ack: u64,
        ece: bool,
        sim: &mut Simulator,
        net: &mut Network,
    ) {
        let Some(conn) = self.conns.get_mut(&conn_id) else {
            return;
        };
        if at != conn.src {
            return;
        }

        if ack > conn.last_acked {
            conn.dup_acks = 0;
            let newly_acked = ack - conn.last_acked;
            conn.last_acked = ack;

            // 移除已确认段
            let mut to_remove = Vec::new();
            for (&s, sent) in conn.inflight.iter() {
                let end = s.saturating_add(sent.len as u64);
                if end <= ack {
                    to_remove.push(s);
                } else {
                    break;
                }
            }
            for s in to_remove {
                conn.inflight.remove(&s);
            }

            // 前向确认重启 RTO 定时器；全部确认则撤销
            if conn.inflight.is_empty() {
                conn.rto_epoch = conn.rto_epoch.wrapping_add(1);
            } else {
                arm_rto(conn, sim);
            }

            let mss = conn.cfg.mss as u64;
            let segs = ((newly_acked + mss - 1) / mss) as u32;
            let inflight_bytes = conn.inflight_bytes();

            // Recovery 退出：确认越过进入点后窗口收敛到 ssthresh
            if conn.tcb.cong_state == CongState::Recovery && ack >= conn.recover_seq {
                conn.tcb.cong_state = CongState::Open;
                conn.tcb.cwnd_bytes = conn.tcb.ssthresh_bytes.max(mss);
            }

            conn.cc
                .pkts_acked(&mut conn.tcb, segs, ece, conn.next_seq, ack, sim.now());

            // ECE 回显 → 进入 CWR；确认越过进入点后回到 Open
            if ece && conn.tcb.cong_state == CongState::Open {
                conn.tcb.ssthresh_bytes = conn.cc.ss_thresh(&conn.tcb, inflight_bytes);
                conn.tcb.cwnd_bytes = conn.tcb.ssthresh_bytes.max(mss);
                conn.cwr_end = conn.next_seq;
                conn.tcb.cong_state = CongState::Cwr;
                debug!(
                    conn_id,
                    ssthresh = conn.tcb.ssthresh_bytes,
                    cwnd = conn.tcb.cwnd_bytes,
                    "ECE：进入 CWR"
                );
            } else if conn.tcb.cong_state == CongState::Cwr && ack >= conn.cwr_end {
                conn.tcb.cong_state = CongState::Open;
            }

            if conn.tcb.cong_state != CongState::Recovery {
                conn.cc.increase_window(&mut conn.tcb, segs);
            }

            // 完成判定：应用已关闭写方向且全部确认
            if conn.send_complete() && conn.done_at.is_none() {
                conn.done_at = Some(sim.now());
                debug!(conn_id, at = ?sim.now(), "流完成");
                return;
            }

            // 缓冲空间已释放：通知应用恢复写入（仅此信号驱动恢复）
            let notify = !conn.tx_closed;
            let _ = conn;
            if notify {
                sim.schedule(sim.now(), SendBufferReady { flow_id: conn_id });
            }
            self.try_send(conn_id, sim, net);
        } else if ack == conn.last_acked {
            // dupACK
            conn.dup_acks = conn.dup_acks.saturating_add(1);
            let dup = conn.dup_acks;
            let mss = conn.cfg.mss as u64;
            if dup == 3 {
                // 快速重传：进入 Recovery，基线算法决定 ssthresh
                if let Some(seq0) = conn.earliest_unacked_seq() {
                    let inflight_bytes = conn.inflight_bytes();
                    conn.recover_seq = conn.next_seq;
                    conn.tcb.cong_state = CongState::Recovery;
                    conn.tcb.ssthresh_bytes = conn.cc.ss_thresh(&conn.tcb, inflight_bytes);
                    conn.tcb.cwnd_bytes = conn.tcb.ssthresh_bytes.saturating_add(3 * mss);

                    let len = conn
                        .inflight
                        .get(&seq0)
                        .map(|s| s.len)
                        .unwrap_or(conn.cfg.mss);
                    let mut pkt = net.make_packet(conn.id, len, conn.fwd_route.clone());
                    pkt.transport = Transport::Tcp(TcpSegment::Data { seq: seq0, len });
                    pkt.ecn = Ecn::Ect0;
                    pkt.tags = conn.tags_for(seq0);
                    warn!(conn_id, seq = seq0, "3 dupACK，快速重传");
                    net.forward_from(conn.src, pkt, sim);
                }
            } else if dup > 3 {
                // 快速恢复：每个额外 dupACK 让窗口再膨胀一个 MSS
                conn.tcb.cwnd_bytes = conn.tcb.cwnd_bytes.saturating_add(mss);
                let _ = conn;
                self.try_send(conn_id, sim, net);
            }
        }
    }

    /// 延迟 ACK 超时冲刷；`gen` 不匹配说明该预留已被取消。
    pub(crate) fn on_delack_timeout(
        &mut self,
        conn_id: TcpConnId,
        r#gen: u64,
        sim: &mut Simulator,
        net: &mut Network,
    ) {
        let Some(conn) = self.conns.get_mut(&conn_id) else {
            return;
        };
        if !conn.delack_pending || conn.delack_gen != r#gen {
            return;
        }
        conn.delack_pending = false;
        conn.delack_segs = 0;
        conn.cc.cwnd_event(&mut conn.tcb, CcEvent::DelayAckNoReserved);
        let ack = conn.rcv_nxt;
        let ece = conn.tcb.demand_cwr;
        let _ = conn;
        self.send_ack(conn_id, ack, ece, sim, net);
    }

    /// RTO：定时器未被重启/撤销时，重传最早未确认段并回到慢启动。
    pub(crate) fn on_rto(
        &mut self,
        conn_id: TcpConnId,
        epoch: u64,
        sim: &mut Simulator,
        net: &mut Network,
    ) {
        let Some(conn) = self.conns.get_mut(&conn_id) else {
            return;
        };
        if conn.done_at.is_some() || conn.rto_epoch != epoch {
            return;
        }
        let Some(seq) = conn.earliest_unacked_seq() else {
            return;
        };
        let Some(sent) = conn.inflight.get(&seq).cloned() else {
            return;
        };

        let mss = conn.cfg.mss as u64;
        let inflight_bytes = conn.inflight_bytes();
        conn.recover_seq = conn.next_seq;
        conn.tcb.cong_state = CongState::Recovery;
        conn.tcb.ssthresh_bytes = conn.cc.ss_thresh(&conn.tcb, inflight_bytes);
        conn.tcb.cwnd_bytes = mss;
        conn.dup_acks = 0;
        conn.rto = SimTime((conn.rto.0.saturating_mul(2)).min(conn.cfg.max_rto.0));
        warn!(conn_id, seq, new_rto = ?conn.rto, "RTO 超时重传");

        let mut pkt = net.make_packet(conn.id, sent.len, conn.fwd_route.clone());
        pkt.transport = Transport::Tcp(TcpSegment::Data { seq, len: sent.len });
        pkt.ecn = Ecn::Ect0;
        pkt.tags = conn.tags_for(seq);
        net.forward_from(conn.src, pkt, sim);

        arm_rto(conn, sim);
    }
}

/// 重启连接的 RTO 定时器：旧 epoch 的事件到期后自然失效。
fn arm_rto(conn: &mut TcpConn, sim: &mut Simulator) {
    conn.rto_epoch = conn.rto_epoch.wrapping_add(1);
    sim.schedule_in(
        conn.rto,
        TcpRto {
            conn_id: conn.id,
            epoch: conn.rto_epoch,
        },
    );
}

/// TCP RTO 事件：epoch 仍有效时触发超时重传
#[derive(Debug)]
pub struct TcpRto {
    pub conn_id: TcpConnId,
    pub epoch: u64,
}

impl Event for TcpRto {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let TcpRto { conn_id, epoch } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");

        // 规避同时借用 `w.net` 与 `w.net.tcp`
        let mut tcp = std::mem::take(&mut w.net.tcp);
        tcp.on_rto(conn_id, epoch, sim, &mut w.net);
        w.net.tcp = tcp;
    }
}

/// 延迟 ACK 超时事件
#[derive(Debug)]
pub struct DelAckTimeout {
    pub conn_id: TcpConnId,
    pub r#gen: u64,
}

impl Event for DelAckTimeout {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let DelAckTimeout { conn_id, r#gen } = *self;
        let w = world
            .as_any_mut()
            .downcast_mut::<NetWorld>()
            .expect("world must be NetWorld");

        let mut tcp = std::mem::take(&mut w.net.tcp);
        tcp.on_delack_timeout(conn_id, r#gen, sim, &mut w.net);
        w.net.tcp = tcp;
    }
}
