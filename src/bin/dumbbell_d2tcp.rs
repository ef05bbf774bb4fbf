//! Dumbbell 拓扑 D2TCP 实验
//!
//! 在瓶颈链路上跑 N 条带（可选）deadline 的流，拥塞算法与队列策略可选。

use clap::Parser;
use dcnsim_rs::app::{AppStart, BulkSendApp, BulkSendConfig};
use dcnsim_rs::cc::CcAlgo;
use dcnsim_rs::net::NetWorld;
use dcnsim_rs::proto::tcp::{TagMode, TcpConfig, TcpConn};
use dcnsim_rs::queue::{FifoQueue, PacketQueue, PfabricQueue, PiasQueue, PiasThresholds};
use dcnsim_rs::sim::{SimTime, Simulator};
use dcnsim_rs::topo::dumbbell::{DumbbellOpts, build_dumbbell};

#[derive(Debug, Parser)]
#[command(name = "dumbbell-d2tcp", about = "Dumbbell 拓扑仿真：h0->h1 多流 D2TCP（简化）")]
struct Args {
    /// 每条流要发送的应用数据量（字节）
    #[arg(long, default_value_t = 1_000_000)]
    data_bytes: u64,

    /// 并发流数
    #[arg(long, default_value_t = 2)]
    flows: u64,

    /// 拥塞算法：new_reno | dctcp | d2tcp
    #[arg(long, default_value = "d2tcp")]
    cc: String,

    /// 截止时间（微秒，相对各流启动时刻）；0 表示不设 deadline
    #[arg(long, default_value_t = 0)]
    deadline_us: u64,

    /// 各流启动间隔（微秒）
    #[arg(long, default_value_t = 0)]
    start_gap_us: u64,

    /// MSS（每个数据段载荷大小，字节）
    #[arg(long, default_value_t = 1460)]
    mss: u32,

    /// 初始 cwnd（单位：MSS 个数）
    #[arg(long, default_value_t = 10)]
    init_cwnd_pkts: u64,

    /// 初始 ssthresh（单位：MSS 个数）
    #[arg(long, default_value_t = 1_000)]
    init_ssthresh_pkts: u64,

    /// 初始 RTO（微秒）
    #[arg(long, default_value_t = 200)]
    rto_us: u64,

    /// alpha 估计的 EWMA 增益 g
    #[arg(long, default_value_t = 0.0625)]
    g: f64,

    /// 每次应用写入的字节数
    #[arg(long, default_value_t = 500)]
    send_size: u32,

    /// 连续多少个块后定速暂停；0 关闭
    #[arg(long, default_value_t = 0)]
    delay_thresh: u32,

    /// 定速暂停时长（微秒）
    #[arg(long, default_value_t = 100)]
    delay_time_us: u64,

    /// 瓶颈队列策略：fifo | pfabric | pias
    #[arg(long, default_value = "fifo")]
    queue: String,

    /// 瓶颈链路队列容量（单位：MSS 个数）；0 表示几乎无限
    #[arg(long, default_value_t = 0)]
    queue_pkts: u64,

    /// ECN 标记阈值（单位：MSS 个数）；0 表示不开启 ECN
    #[arg(long, default_value_t = 20)]
    ecn_k_pkts: u64,

    #[arg(long, default_value_t = 100)]
    host_link_gbps: u64,

    #[arg(long, default_value_t = 10)]
    bottleneck_gbps: u64,

    /// 单向链路传播时延（微秒）
    #[arg(long, default_value_t = 2)]
    link_latency_us: u64,

    /// 仿真运行到多少毫秒
    #[arg(long, default_value_t = 200)]
    until_ms: u64,

    /// 不打印日志（仅输出结果行）
    #[arg(long)]
    quiet: bool,
}

fn make_queue(kind: &str) -> Box<dyn PacketQueue> {
    match kind {
        "fifo" => Box::new(FifoQueue::new()),
        "pfabric" => Box::new(PfabricQueue::new()),
        "pias" => Box::new(PiasQueue::new(PiasThresholds::default().num_classes())),
        other => {
            eprintln!("unknown queue kind: {other} (expected fifo|pfabric|pias)");
            std::process::exit(1);
        }
    }
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(if args.quiet {
            tracing_subscriber::EnvFilter::new("off")
        } else {
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        })
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let mut sim = Simulator::default();
    let mut world = NetWorld::default();

    let opts = DumbbellOpts {
        host_link_gbps: args.host_link_gbps,
        bottleneck_gbps: args.bottleneck_gbps,
        link_latency: SimTime::from_micros(args.link_latency_us),
        until: SimTime::from_millis(args.until_ms),
    };

    let (src, dst, route) = build_dumbbell(&mut world, &opts);
    let s0 = route[1];
    let s1 = route[2];

    world.net.set_link_queue(s0, s1, make_queue(&args.queue));
    world.net.set_link_queue(s1, s0, make_queue(&args.queue));

    if args.queue_pkts > 0 {
        let cap_bytes = args.queue_pkts.saturating_mul(args.mss as u64);
        world.net.set_link_queue_capacity_bytes(s0, s1, cap_bytes);
        world.net.set_link_queue_capacity_bytes(s1, s0, cap_bytes);
    }

    if args.ecn_k_pkts > 0 {
        let k_bytes = args.ecn_k_pkts.saturating_mul(args.mss as u64);
        world.net.set_link_ecn_threshold_bytes(s0, s1, k_bytes);
        world.net.set_link_ecn_threshold_bytes(s1, s0, k_bytes);
    }

    let tag_mode = match args.queue.as_str() {
        "pfabric" => TagMode::RemainingBytes,
        "pias" => TagMode::Pias(PiasThresholds::default()),
        _ => TagMode::None,
    };

    let cc_template = match args.cc.as_str() {
        "new_reno" => CcAlgo::new_reno(),
        "dctcp" => CcAlgo::dctcp(args.g),
        "d2tcp" => CcAlgo::d2tcp(args.g),
        other => {
            eprintln!("unknown cc kind: {other} (expected new_reno|dctcp|d2tcp)");
            std::process::exit(1);
        }
    };

    let tcp_cfg = TcpConfig {
        mss: args.mss,
        init_cwnd_bytes: args.init_cwnd_pkts.saturating_mul(args.mss as u64),
        init_ssthresh_bytes: args.init_ssthresh_pkts.saturating_mul(args.mss as u64),
        init_rto: SimTime::from_micros(args.rto_us),
        ..TcpConfig::default()
    };

    for i in 0..args.flows {
        let flow_id = i + 1;
        let start = SimTime::from_micros(i.saturating_mul(args.start_gap_us));

        // 同一模板 fork 出每条流的算法实例
        let mut conn = TcpConn::new(
            flow_id,
            src,
            dst,
            route.clone(),
            args.data_bytes,
            cc_template.fork(),
            tcp_cfg.clone(),
        );
        if args.deadline_us > 0 {
            conn.set_deadline(start.saturating_add(SimTime::from_micros(args.deadline_us)));
        }

        let app_cfg = BulkSendConfig {
            send_size: args.send_size,
            max_bytes: args.data_bytes,
            delay_thresh: args.delay_thresh,
            delay_time: SimTime::from_micros(args.delay_time_us),
            tag_mode: tag_mode.clone(),
            ..BulkSendConfig::default()
        };
        let app = match BulkSendApp::new(flow_id, app_cfg) {
            Ok(app) => app,
            Err(e) => {
                eprintln!("flow {flow_id}: invalid configuration: {e}");
                std::process::exit(1);
            }
        };

        sim.schedule(start, AppStart { conn, app });
    }

    sim.run_until(opts.until, &mut world);

    for i in 0..args.flows {
        let flow_id = i + 1;
        let Some(c) = world.net.tcp.get(flow_id) else {
            println!("flow {flow_id}: not started");
            continue;
        };
        let fct_us = match (c.start_time(), c.done_time()) {
            (Some(s), Some(e)) if e.0 >= s.0 => Some((e.0 - s.0) / 1_000),
            _ => None,
        };
        let deadline_met = match (c.tcb.deadline, c.done_time()) {
            (Some(d), Some(e)) => Some(e <= d),
            (Some(_), None) => Some(false),
            (None, _) => None,
        };
        println!(
            "flow {flow_id}: acked_bytes={} finished={} fct_us={:?} deadline_met={:?} alpha={:.4}",
            c.bytes_acked(),
            c.is_done(),
            fct_us,
            deadline_met,
            c.cc.alpha(),
        );
    }

    println!(
        "net: delivered_pkts={} delivered_bytes={} dropped_pkts={} dropped_bytes={} marked_pkts={}",
        world.net.stats.delivered_pkts,
        world.net.stats.delivered_bytes,
        world.net.stats.dropped_pkts,
        world.net.stats.dropped_bytes,
        world.net.stats.marked_pkts
    );
}
