use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Counters accumulated by a propagator over its lifetime.
#[derive(Debug, Default, Clone)]
pub struct PropagatorMetrics {
    nodes_added: u64,
    edges_added: u64,
    connects_ignored: u64,
    ingests: u64,
    ingest_failures: u64,
    color_passes: u64,
    focus_changes: u64,
    exports: u64,
}

impl PropagatorMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_nodes(&mut self, count: usize) {
        self.nodes_added = self.nodes_added.saturating_add(count as u64);
    }

    pub fn record_edges(&mut self, added: usize) {
        self.edges_added = self.edges_added.saturating_add(added as u64);
    }

    pub fn record_ignored_connect(&mut self) {
        self.connects_ignored = self.connects_ignored.saturating_add(1);
    }

    pub fn record_ingest(&mut self, ok: bool) {
        if ok {
            self.ingests = self.ingests.saturating_add(1);
        } else {
            self.ingest_failures = self.ingest_failures.saturating_add(1);
        }
    }

    pub fn record_color_pass(&mut self) {
        self.color_passes = self.color_passes.saturating_add(1);
    }

    pub fn record_focus_change(&mut self) {
        self.focus_changes = self.focus_changes.saturating_add(1);
    }

    pub fn record_export(&mut self) {
        self.exports = self.exports.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            nodes_added: self.nodes_added,
            edges_added: self.edges_added,
            connects_ignored: self.connects_ignored,
            ingests: self.ingests,
            ingest_failures: self.ingest_failures,
            color_passes: self.color_passes,
            focus_changes: self.focus_changes,
            exports: self.exports,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub nodes_added: u64,
    pub edges_added: u64,
    pub connects_ignored: u64,
    pub ingests: u64,
    pub ingest_failures: u64,
    pub color_passes: u64,
    pub focus_changes: u64,
    pub exports: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "propagator_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("nodes_added".to_string(), json!(self.nodes_added));
        map.insert("edges_added".to_string(), json!(self.edges_added));
        map.insert("connects_ignored".to_string(), json!(self.connects_ignored));
        map.insert("ingests".to_string(), json!(self.ingests));
        map.insert("ingest_failures".to_string(), json!(self.ingest_failures));
        map.insert("color_passes".to_string(), json!(self.color_passes));
        map.insert("focus_changes".to_string(), json!(self.focus_changes));
        map.insert("exports".to_string(), json!(self.exports));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_counters() {
        let mut metrics = PropagatorMetrics::new();
        metrics.record_nodes(3);
        metrics.record_edges(2);
        metrics.record_ingest(true);
        metrics.record_ingest(false);
        metrics.record_ignored_connect();

        let snapshot = metrics.snapshot(Duration::from_millis(1500));
        assert_eq!(snapshot.uptime_ms, 1500);
        assert_eq!(snapshot.nodes_added, 3);
        assert_eq!(snapshot.edges_added, 2);
        assert_eq!(snapshot.ingests, 1);
        assert_eq!(snapshot.ingest_failures, 1);
        assert_eq!(snapshot.connects_ignored, 1);

        let event = snapshot.to_log_event("spatial::metrics");
        assert_eq!(event.message, "propagator_metrics");
        assert_eq!(event.field("ingest_failures"), Some(&json!(1)));
    }
}
