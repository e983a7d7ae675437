//! 管道指标收集模块
//!
//! 在 ingest / dispatch 各自的计数器之外，提供跨组件的在线统计与
//! 运行摘要。

use metrics::gauge;

/// 记录待处理窗口深度（每次采样时调用）
pub fn record_pending_depth(depth: usize) {
    gauge!("csi_predictor_pending_windows").set(depth as f64);
}

/// 管道指标聚合器
///
/// 在内存中聚合运行期采样，便于退出时输出摘要。
#[derive(Debug, Clone, Default)]
pub struct PipelineMetricsAggregator {
    /// 待处理深度统计
    pub depth_stats: RunningStats,

    /// 批大小统计
    pub batch_stats: RunningStats,
}

impl PipelineMetricsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 采样一次待处理窗口深度
    pub fn sample_pending_depth(&mut self, depth: usize) {
        self.depth_stats.push(depth as f64);
        record_pending_depth(depth);
    }

    /// 记录一次分发批大小
    pub fn record_batch_size(&mut self, windows: u64) {
        self.batch_stats.push(windows as f64);
    }

    /// 生成摘要报告
    #[allow(clippy::too_many_arguments)]
    pub fn summary(
        &self,
        frames_received: u64,
        windows_appended: u64,
        decode_errors: u64,
        batches_dispatched: u64,
        windows_scored: u64,
        empty_ticks: u64,
        failed_ticks: u64,
    ) -> MetricsSummary {
        MetricsSummary {
            frames_received,
            windows_appended,
            decode_errors,
            batches_dispatched,
            windows_scored,
            empty_ticks,
            failed_ticks,
            pending_depth: StatsSummary::from(&self.depth_stats),
            batch_size: StatsSummary::from(&self.batch_stats),
        }
    }

    /// 重置统计
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub frames_received: u64,
    pub windows_appended: u64,
    pub decode_errors: u64,
    pub batches_dispatched: u64,
    pub windows_scored: u64,
    pub empty_ticks: u64,
    pub failed_ticks: u64,
    pub pending_depth: StatsSummary,
    pub batch_size: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Pipeline Metrics Summary ===")?;
        writeln!(f, "Frames received: {}", self.frames_received)?;
        writeln!(f, "Windows appended: {}", self.windows_appended)?;
        writeln!(f, "Decode errors: {}", self.decode_errors)?;
        writeln!(f, "Batches dispatched: {}", self.batches_dispatched)?;
        writeln!(f, "Windows scored: {}", self.windows_scored)?;
        writeln!(f, "Empty ticks: {}", self.empty_ticks)?;
        writeln!(f, "Failed ticks: {}", self.failed_ticks)?;
        writeln!(f, "Pending depth: {}", self.pending_depth)?;
        writeln!(f, "Batch size: {}", self.batch_size)?;
        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// 最小值
    pub fn min(&self) -> f64 {
        self.min
    }

    /// 最大值
    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();

        stats.push(1.0);
        stats.push(2.0);
        stats.push(3.0);
        stats.push(4.0);
        stats.push(5.0);

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator_sampling() {
        let mut aggregator = PipelineMetricsAggregator::new();

        aggregator.sample_pending_depth(0);
        aggregator.sample_pending_depth(10);
        aggregator.record_batch_size(10);

        assert_eq!(aggregator.depth_stats.count(), 2);
        assert!((aggregator.depth_stats.max() - 10.0).abs() < 1e-10);
        assert_eq!(aggregator.batch_stats.count(), 1);
    }

    #[test]
    fn test_summary_display() {
        let mut aggregator = PipelineMetricsAggregator::new();
        aggregator.sample_pending_depth(4);
        aggregator.record_batch_size(4);

        let summary = aggregator.summary(12, 48, 1, 3, 48, 2, 0);
        let output = format!("{}", summary);
        assert!(output.contains("Frames received: 12"));
        assert!(output.contains("Decode errors: 1"));
        assert!(output.contains("n=1"));
    }
}
