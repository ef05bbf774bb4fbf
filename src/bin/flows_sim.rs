//! 按工作负载文件驱动的流级仿真
//!
//! 读取 JSON 工作负载（拓扑 + 队列配置 + 流列表），运行后输出每条流的
//! `flow_fct` 结果行，可选写出 JSON 汇总。

use clap::Parser;
use dcnsim_rs::app::{AppStart, BulkSendApp, BulkSendConfig};
use dcnsim_rs::cc::CcAlgo;
use dcnsim_rs::net::{NetWorld, NodeId};
use dcnsim_rs::proto::tcp::{TagMode, TcpConfig, TcpConn};
use dcnsim_rs::queue::{FifoQueue, PacketQueue, PfabricQueue, PiasQueue, PiasThresholds};
use dcnsim_rs::sim::{
    CcKind, FlowWorkloadSpec, QueueKind, SimTime, Simulator, TopologySpec,
};
use dcnsim_rs::topo::dumbbell::{DumbbellOpts, build_dumbbell};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "flows-sim", about = "按 JSON 工作负载运行 DCN 流级仿真")]
struct Args {
    /// 工作负载 JSON 文件
    #[arg(long)]
    workload: PathBuf,

    /// 仿真运行到多少毫秒
    #[arg(long, default_value_t = 1_000)]
    until_ms: u64,

    /// 输出 JSON 汇总文件；不填则不生成
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// 不打印日志（仅输出结果行）
    #[arg(long)]
    quiet: bool,
}

fn die(msg: String) -> ! {
    eprintln!("{msg}");
    std::process::exit(1);
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

    let raw = fs::read_to_string(&args.workload)
        .unwrap_or_else(|e| die(format!("read workload {}: {e}", args.workload.display())));
    let spec: FlowWorkloadSpec = serde_json::from_str(&raw)
        .unwrap_or_else(|e| die(format!("parse workload {}: {e}", args.workload.display())));

    let mut sim = Simulator::default();
    let mut world = NetWorld::default();

    let TopologySpec::Dumbbell {
        host_link_gbps,
        bottleneck_gbps,
        link_latency_us,
    } = spec.topology;

    let opts = DumbbellOpts {
        host_link_gbps: host_link_gbps.unwrap_or(100),
        bottleneck_gbps: bottleneck_gbps.unwrap_or(10),
        link_latency: SimTime::from_micros(link_latency_us.unwrap_or(2)),
        until: SimTime::from_millis(args.until_ms),
    };
    let (h0, h1, route) = build_dumbbell(&mut world, &opts);
    let hosts = [h0, h1];
    let s0 = route[1];
    let s1 = route[2];

    let defaults = spec.defaults.clone().unwrap_or(dcnsim_rs::sim::FlowDefaults {
        cc: None,
        mss: None,
        g: None,
        send_size: None,
        delay_thresh: None,
        delay_time_us: None,
    });
    let mss = defaults.mss.unwrap_or(1460);
    let g = defaults.g.unwrap_or(1.0 / 16.0);

    // 队列配置：阈值表错误属于配置错误，立即终止
    let queue_spec = spec.queue.clone().unwrap_or(dcnsim_rs::sim::QueueSpec {
        kind: None,
        capacity_pkts: None,
        ecn_k_pkts: None,
        pias_thresholds: None,
        pias_priority_number: None,
    });
    let queue_kind = queue_spec.kind.unwrap_or(QueueKind::Fifo);
    let thresholds = match &queue_spec.pias_thresholds {
        Some(list) => {
            let n = queue_spec
                .pias_priority_number
                .unwrap_or(list.len() as u16 + 1);
            PiasThresholds::new(list.clone(), n)
                .unwrap_or_else(|e| die(format!("invalid PIAS thresholds: {e}")))
        }
        None => PiasThresholds::default(),
    };

    let make_queue = |kind: QueueKind| -> Box<dyn PacketQueue> {
        match kind {
            QueueKind::Fifo => Box::new(FifoQueue::new()),
            QueueKind::Pfabric => Box::new(PfabricQueue::new()),
            QueueKind::Pias => Box::new(PiasQueue::new(thresholds.num_classes())),
        }
    };
    world.net.set_link_queue(s0, s1, make_queue(queue_kind));
    world.net.set_link_queue(s1, s0, make_queue(queue_kind));

    if let Some(cap_pkts) = queue_spec.capacity_pkts {
        let cap = cap_pkts.saturating_mul(mss as u64);
        world.net.set_link_queue_capacity_bytes(s0, s1, cap);
        world.net.set_link_queue_capacity_bytes(s1, s0, cap);
    }
    if let Some(k_pkts) = queue_spec.ecn_k_pkts {
        let k = k_pkts.saturating_mul(mss as u64);
        world.net.set_link_ecn_threshold_bytes(s0, s1, k);
        world.net.set_link_ecn_threshold_bytes(s1, s0, k);
    }

    let tag_mode = match queue_kind {
        QueueKind::Fifo => TagMode::None,
        QueueKind::Pfabric => TagMode::RemainingBytes,
        QueueKind::Pias => TagMode::Pias(thresholds.clone()),
    };

    for f in &spec.flows {
        let pick = |idx: usize| -> NodeId {
            *hosts
                .get(idx)
                .unwrap_or_else(|| die(format!("flow {}: no host with index {idx}", f.id)))
        };
        let src = pick(f.src);
        let dst = pick(f.dst);
        let fwd_route: Vec<NodeId> = if src == h0 {
            route.clone()
        } else {
            route.iter().rev().copied().collect()
        };

        let cc_kind = f.cc.or(defaults.cc).unwrap_or(CcKind::Dctcp);
        let cc = match cc_kind {
            CcKind::NewReno => CcAlgo::new_reno(),
            CcKind::Dctcp => CcAlgo::dctcp(g),
            CcKind::D2tcp => CcAlgo::d2tcp(g),
        };

        let tcp_cfg = TcpConfig {
            mss,
            ..TcpConfig::default()
        };
        let mut conn = TcpConn::new(f.id, src, dst, fwd_route, f.bytes, cc, tcp_cfg);
        if let Some(d_us) = f.deadline_us {
            conn.set_deadline(SimTime::from_micros(d_us));
        }

        let app_cfg = BulkSendConfig {
            send_size: f.send_size.or(defaults.send_size).unwrap_or(500),
            max_bytes: f.bytes,
            delay_thresh: f.delay_thresh.or(defaults.delay_thresh).unwrap_or(0),
            delay_time: SimTime::from_micros(
                f.delay_time_us.or(defaults.delay_time_us).unwrap_or(100),
            ),
            tos: f.tos.unwrap_or(0),
            tag_mode: tag_mode.clone(),
        };
        let app = BulkSendApp::new(f.id, app_cfg)
            .unwrap_or_else(|e| die(format!("flow {}: invalid configuration: {e}", f.id)));

        let start = SimTime::from_micros(f.start_us.unwrap_or(0));
        sim.schedule(start, AppStart { conn, app });
    }

    sim.run_until(opts.until, &mut world);

    let mut flow_results = Vec::new();
    for f in &spec.flows {
        let Some(c) = world.net.tcp.get(f.id) else {
            println!("flow_fct id={} bytes={} fct_us=na deadline_met=na", f.id, f.bytes);
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
        match fct_us {
            Some(us) => println!(
                "flow_fct id={} bytes={} fct_us={} deadline_met={}",
                f.id,
                f.bytes,
                us,
                deadline_met.map_or("na".to_string(), |m| m.to_string())
            ),
            None => println!(
                "flow_fct id={} bytes={} fct_us=unfinished deadline_met={}",
                f.id,
                f.bytes,
                deadline_met.map_or("na".to_string(), |m| m.to_string())
            ),
        }
        flow_results.push(serde_json::json!({
            "id": f.id,
            "bytes": f.bytes,
            "acked_bytes": c.bytes_acked(),
            "finished": c.is_done(),
            "fct_us": fct_us,
            "deadline_met": deadline_met,
            "alpha": c.cc.alpha(),
        }));
    }

    if let Some(path) = args.summary_json {
        let summary = serde_json::json!({
            "schema_version": spec.schema_version,
            "flows": flow_results,
            "stats": {
                "delivered_pkts": world.net.stats.delivered_pkts,
                "delivered_bytes": world.net.stats.delivered_bytes,
                "dropped_pkts": world.net.stats.dropped_pkts,
                "dropped_bytes": world.net.stats.dropped_bytes,
                "marked_pkts": world.net.stats.marked_pkts,
            },
        });
        let out = serde_json::to_string_pretty(&summary).expect("serialize summary");
        fs::write(&path, out)
            .unwrap_or_else(|e| die(format!("write summary {}: {e}", path.display())));
        if !args.quiet {
            eprintln!("wrote summary to {}", path.display());
        }
    }
}
