use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowWorkloadSpec {
    pub schema_version: u32,
    #[serde(default)]
    pub meta: Option<WorkloadMeta>,
    pub topology: TopologySpec,
    #[serde(default)]
    pub queue: Option<QueueSpec>,
    #[serde(default)]
    pub defaults: Option<FlowDefaults>,
    pub flows: Vec<FlowSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadMeta {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopologySpec {
    Dumbbell {
        #[serde(default)]
        host_link_gbps: Option<u64>,
        #[serde(default)]
        bottleneck_gbps: Option<u64>,
        #[serde(default)]
        link_latency_us: Option<u64>,
    },
}

/// 瓶颈链路队列配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueSpec {
    #[serde(default)]
    pub kind: Option<QueueKind>,
    /// 队列容量（MSS 个数）；None 表示近似无限
    #[serde(default)]
    pub capacity_pkts: Option<u64>,
    /// ECN 标记阈值（MSS 个数）；None 表示不开启 ECN
    #[serde(default)]
    pub ecn_k_pkts: Option<u64>,
    /// PIAS 阈值表（升序字节数，空格分隔的序列化形式也接受）
    #[serde(default)]
    pub pias_thresholds: Option<Vec<u64>>,
    #[serde(default)]
    pub pias_priority_number: Option<u16>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    Fifo,
    Pfabric,
    Pias,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CcKind {
    NewReno,
    Dctcp,
    D2tcp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowDefaults {
    #[serde(default)]
    pub cc: Option<CcKind>,
    #[serde(default)]
    pub mss: Option<u32>,
    #[serde(default)]
    pub g: Option<f64>,
    #[serde(default)]
    pub send_size: Option<u32>,
    #[serde(default)]
    pub delay_thresh: Option<u32>,
    #[serde(default)]
    pub delay_time_us: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowSpec {
    pub id: u64,
    /// 源主机下标（dumbbell：0 = h0，1 = h1）
    pub src: usize,
    pub dst: usize,
    pub bytes: u64,
    #[serde(default)]
    pub start_us: Option<u64>,
    /// 截止时间（相对仿真起点，微秒）；仅 d2tcp 有意义
    #[serde(default)]
    pub deadline_us: Option<u64>,
    #[serde(default)]
    pub cc: Option<CcKind>,
    #[serde(default)]
    pub send_size: Option<u32>,
    #[serde(default)]
    pub delay_thresh: Option<u32>,
    #[serde(default)]
    pub delay_time_us: Option<u64>,
    #[serde(default)]
    pub tos: Option<u8>,
}
