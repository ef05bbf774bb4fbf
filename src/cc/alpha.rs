//! ECN 标记比例估计器
//!
//! 按窗口累计被确认/被标记的字节数，在每个更新窗口结束时把标记比例
//! 融入 EWMA：`alpha = (1-g)*alpha + g*ce_fraction`。标记频率（而非
//! 一次性减半）承载拥塞程度信号。

#[derive(Debug, Clone)]
pub struct AlphaEstimator {
    bytes_acked: u64,
    ecn_bytes_acked: u64,
    alpha: f64,
    ce_fraction: f64,
    g: f64,
}

impl AlphaEstimator {
    /// `g` 为 EWMA 权重（典型 1/16）。
    pub fn new(g: f64) -> Self {
        Self {
            bytes_acked: 0,
            ecn_bytes_acked: 0,
            alpha: 0.0,
            ce_fraction: 0.0,
            g,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn ce_fraction(&self) -> f64 {
        self.ce_fraction
    }

    /// 累计一次 ACK 覆盖的字节；`ecn_marked` 表示该 ACK 带 ECE 回显。
    pub fn on_ack_processed(&mut self, segments_acked: u32, segment_size: u32, ecn_marked: bool) {
        let bytes = (segments_acked as u64).saturating_mul(segment_size as u64);
        self.bytes_acked = self.bytes_acked.saturating_add(bytes);
        if ecn_marked {
            self.ecn_bytes_acked = self.ecn_bytes_acked.saturating_add(bytes);
        }
    }

    /// 每个更新窗口（ACK 水位线前进）调用一次，随后清零计数器。
    pub fn update_alpha(&mut self) {
        self.ce_fraction = if self.bytes_acked == 0 {
            0.0
        } else {
            self.ecn_bytes_acked as f64 / self.bytes_acked as f64
        };
        self.alpha = (1.0 - self.g) * self.alpha + self.g * self.ce_fraction;
        self.bytes_acked = 0;
        self.ecn_bytes_acked = 0;
    }
}
