use std::sync::atomic::{AtomicU64, Ordering};

/// Shared pipeline counters and gauges. Written by the stage threads,
/// readable from anywhere; plain atomics, no locks.
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    pub frames_captured: AtomicU64,
    /// Frames displaced by a newer one under the latest-frame-wins policy.
    pub frames_dropped: AtomicU64,
    pub frames_processed: AtomicU64,
    /// Hands skipped for a frame (input defect or low detection confidence).
    pub hands_skipped: AtomicU64,
    pub events_emitted: AtomicU64,
    pub commands_dispatched: AtomicU64,
    /// Commands dropped by the fire-and-forget outbound channel.
    pub commands_dropped: AtomicU64,
    /// Most recent capture-to-processed latency, microseconds.
    pub last_latency_us: AtomicU64,
    /// Capture → processing queue depth sampled at each dequeue.
    pub frame_queue_depth: AtomicU64,
    /// Processing → dispatch queue depth sampled at each dequeue.
    pub event_queue_depth: AtomicU64,
}

/// Point-in-time copy of the metrics, for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub frames_captured: u64,
    pub frames_dropped: u64,
    pub frames_processed: u64,
    pub hands_skipped: u64,
    pub events_emitted: u64,
    pub commands_dispatched: u64,
    pub commands_dropped: u64,
    pub last_latency_us: u64,
    pub frame_queue_depth: u64,
    pub event_queue_depth: u64,
}

impl PipelineMetrics {
    pub fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set(gauge: &AtomicU64, value: u64) {
        gauge.store(value, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            frames_captured: self.frames_captured.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
            frames_processed: self.frames_processed.load(Ordering::Relaxed),
            hands_skipped: self.hands_skipped.load(Ordering::Relaxed),
            events_emitted: self.events_emitted.load(Ordering::Relaxed),
            commands_dispatched: self.commands_dispatched.load(Ordering::Relaxed),
            commands_dropped: self.commands_dropped.load(Ordering::Relaxed),
            last_latency_us: self.last_latency_us.load(Ordering::Relaxed),
            frame_queue_depth: self.frame_queue_depth.load(Ordering::Relaxed),
            event_queue_depth: self.event_queue_depth.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "captured={} dropped={} processed={} hands_skipped={} events={} \
             commands={} commands_dropped={} last_latency={}us frame_queue={} \
             event_queue={}",
            self.frames_captured,
            self.frames_dropped,
            self.frames_processed,
            self.hands_skipped,
            self.events_emitted,
            self.commands_dispatched,
            self.commands_dropped,
            self.last_latency_us,
            self.frame_queue_depth,
            self.event_queue_depth,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_counters() {
        let metrics = PipelineMetrics::default();
        PipelineMetrics::incr(&metrics.frames_captured);
        PipelineMetrics::incr(&metrics.frames_captured);
        PipelineMetrics::set(&metrics.frame_queue_depth, 3);
        PipelineMetrics::set(&metrics.event_queue_depth, 1);
        let snap = metrics.snapshot();
        assert_eq!(snap.frames_captured, 2);
        assert_eq!(snap.frame_queue_depth, 3);
        assert_eq!(snap.event_queue_depth, 1);
        assert_eq!(snap.events_emitted, 0);
    }
}
