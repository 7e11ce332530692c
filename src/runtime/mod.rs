//! The propagator engine: an owned instance bundling the node graph, focus
//! state, palette settings and diagnostics.
//!
//! Every operation runs to completion on the caller's thread. Callers that
//! share an instance must serialize access themselves.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde_json::{Value, json};

use crate::color::{EntropySignal, PaletteSettings, Trit, entropy_pair, spiral_pair};
use crate::error::{PropagatorError, Result};
use crate::geometry::Rect;
use crate::graph::{Graph, NodeIndex, NodeSpec};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::PropagatorMetrics;
use crate::topology::{self, IngestSummary};

pub mod export;
pub mod focus;

use export::{ColorRecord, ExportTracker, collect_records, write_records};
use focus::FocusController;

/// Configuration knobs for the engine.
#[derive(Clone, Debug)]
pub struct PropagatorConfig {
    /// Max gap, in coordinate units, still treated as touching edges.
    pub adjacency_tolerance: i64,
    /// Lightness added to the focused node's neighbors at export.
    pub halo_boost: f64,
    pub palette: PaletteSettings,
    /// Optional structured logger used by the engine.
    pub logger: Option<Logger>,
    /// Counters shared with whoever holds the handle.
    pub metrics: Option<Arc<Mutex<PropagatorMetrics>>>,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for PropagatorConfig {
    fn default() -> Self {
        Self {
            adjacency_tolerance: 1,
            halo_boost: 0.15,
            palette: PaletteSettings::default(),
            logger: None,
            metrics: None,
            metrics_target: "spatial::metrics".to_string(),
        }
    }
}

impl PropagatorConfig {
    pub fn with_adjacency_tolerance(mut self, tolerance: i64) -> Self {
        self.adjacency_tolerance = tolerance.max(0);
        self
    }

    pub fn with_halo_boost(mut self, boost: f64) -> Self {
        self.halo_boost = boost.clamp(0.0, 1.0);
        self
    }

    pub fn with_palette(mut self, palette: PaletteSettings) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(PropagatorMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<PropagatorMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Spatial color propagator over a graph of tiled regions.
pub struct Propagator {
    graph: Graph,
    focus: FocusController,
    config: PropagatorConfig,
    tracker: ExportTracker,
    started_at: Instant,
}

impl Default for Propagator {
    fn default() -> Self {
        Self::new()
    }
}

impl Propagator {
    pub fn new() -> Self {
        Self::with_config(PropagatorConfig::default())
    }

    pub fn with_config(config: PropagatorConfig) -> Self {
        Self {
            graph: Graph::new(),
            focus: FocusController::new(),
            config,
            tracker: ExportTracker::new(),
            started_at: Instant::now(),
        }
    }

    pub fn config(&self) -> &PropagatorConfig {
        &self.config
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn find_by_window_id(&self, window_id: u32) -> Option<NodeIndex> {
        self.graph.find_by_window_id(window_id)
    }

    pub fn add_node(
        &mut self,
        window_id: u32,
        space_id: u32,
        depth: u32,
        rect: Rect,
    ) -> Result<NodeIndex> {
        let index = self.graph.add_node(NodeSpec {
            window_id,
            space_id,
            depth,
            rect,
        })?;
        self.record(|m| m.record_nodes(1));
        self.emit(
            LogLevel::Trace,
            "spatial::graph",
            "node.added",
            [
                json_kv("index", index),
                json_kv("window_id", window_id),
                json_kv("space_id", space_id),
            ],
        );
        Ok(index)
    }

    /// Advisory edge between two node indices; invalid pairs are dropped silently.
    pub fn connect(&mut self, a: NodeIndex, b: NodeIndex) {
        if self.graph.connect(a, b) {
            self.record(|m| m.record_edges(1));
        } else {
            self.record(|m| m.record_ignored_connect());
        }
    }

    /// Add edges for every pair of rects sharing a boundary; returns how many were new.
    pub fn detect_adjacency(&mut self) -> usize {
        let added = self.graph.detect_adjacency(self.config.adjacency_tolerance);
        self.record(|m| m.record_edges(added));
        self.emit(
            LogLevel::Debug,
            "spatial::graph",
            "adjacency.detected",
            [
                json_kv("added", added),
                json_kv("edges", self.graph.edge_count()),
            ],
        );
        added
    }

    /// Parse and append an encoded topology. On error the graph is unchanged.
    pub fn ingest_topology(&mut self, bytes: &[u8]) -> Result<IngestSummary> {
        let outcome = topology::parse(bytes)
            .map_err(Into::into)
            .and_then(|parsed| parsed.commit(&mut self.graph));

        match &outcome {
            Ok(summary) => {
                self.record(|m| {
                    m.record_ingest(true);
                    m.record_nodes(summary.nodes);
                    m.record_edges(summary.edges);
                });
                self.emit(
                    LogLevel::Info,
                    "spatial::topology",
                    "topology.ingested",
                    [
                        json_kv("base", summary.base),
                        json_kv("nodes", summary.nodes),
                        json_kv("edges", summary.edges),
                    ],
                );
            }
            Err(err) => {
                self.record(|m| m.record_ingest(false));
                let offset = match err {
                    PropagatorError::Topology(topology_err) => json!(topology_err.offset()),
                    _ => Value::Null,
                };
                self.emit(
                    LogLevel::Warn,
                    "spatial::topology",
                    "topology.rejected",
                    [
                        json_kv("code", err.code()),
                        json_kv("offset", offset),
                        json_kv("reason", err.to_string()),
                    ],
                );
            }
        }
        outcome
    }

    /// Golden-angle spiral over the current node order; recolors every node.
    pub fn assign_colors(&mut self) {
        let palette = self.config.palette;
        self.graph
            .recolor(|node| spiral_pair(node.index, &palette));
        self.record(|m| m.record_color_pass());
        self.emit(
            LogLevel::Debug,
            "spatial::color",
            "colors.assigned",
            [
                json_kv("mode", "spiral"),
                json_kv("nodes", self.graph.len()),
            ],
        );
    }

    /// Entropy-driven colors from raw brainwave scalars.
    pub fn assign_colors_bci(&mut self, phi: f32, valence: f32, fisher: f32, trit: i32) {
        let signal = EntropySignal::new(
            phi as f64,
            valence as f64,
            fisher as f64,
            Trit::from_i32(trit),
        );
        self.assign_colors_entropy(signal);
    }

    pub fn assign_colors_entropy(&mut self, signal: EntropySignal) {
        let palette = self.config.palette;
        self.graph
            .recolor(|node| entropy_pair(node.index, &signal, &palette));
        self.record(|m| m.record_color_pass());
        self.emit(
            LogLevel::Debug,
            "spatial::color",
            "colors.assigned",
            [
                json_kv("mode", "entropy"),
                json_kv("nodes", self.graph.len()),
                json_kv("phi", signal.phi),
                json_kv("trit", format!("{:?}", signal.trit)),
            ],
        );
    }

    /// Overwrite one node's stored colors; unknown windows are ignored.
    pub fn set_node_color(&mut self, window_id: u32, fg: u32, bg: u32) -> bool {
        match self.graph.find_by_window_id(window_id) {
            Some(index) => self
                .graph
                .set_colors(index, crate::color::ColorPair { fg, bg }),
            None => false,
        }
    }

    /// Focus the node owning `window_id`; unknown windows leave focus as is.
    pub fn set_focus(&mut self, window_id: u32) {
        let Some(change) = self.focus.focus(&mut self.graph, window_id) else {
            return;
        };
        if change.is_noop() {
            return;
        }
        self.record(|m| m.record_focus_change());
        self.emit(
            LogLevel::Debug,
            "spatial::focus",
            "focus.changed",
            [
                json_kv("previous", json!(change.previous)),
                json_kv("current", change.current),
            ],
        );
    }

    pub fn clear_focus(&mut self) {
        if let Some(window_id) = self.focus.release(&mut self.graph) {
            self.record(|m| m.record_focus_change());
            self.emit(
                LogLevel::Debug,
                "spatial::focus",
                "focus.cleared",
                [json_kv("previous", window_id)],
            );
        }
    }

    pub fn focused_window(&self) -> Option<u32> {
        self.focus.current_window(&self.graph)
    }

    /// Output colors with the focus halo applied, in node index order.
    pub fn output_colors(&self) -> Vec<ColorRecord> {
        let halo = self.focus.halo(&self.graph, self.config.halo_boost);
        collect_records(&self.graph, &halo)
    }

    /// Pack 12-byte records into `buf`; returns bytes written (whole records only).
    pub fn get_spatial_colors(&self, buf: &mut [u8]) -> usize {
        let written = write_records(&self.output_colors(), buf);
        self.record(|m| m.record_export());
        written
    }

    /// Like [`Self::get_spatial_colors`], but returns `None` without writing
    /// when the output matches the previous call of this method.
    pub fn export_if_changed(&mut self, buf: &mut [u8]) -> Option<usize> {
        let records = self.output_colors();
        if !self.tracker.observe(&records) {
            return None;
        }
        self.record(|m| m.record_export());
        Some(write_records(&records, buf))
    }

    /// Log the current metrics snapshot, if both metrics and a logger are configured.
    pub fn emit_metrics(&self) {
        let (Some(logger), Some(metrics)) = (&self.config.logger, &self.config.metrics) else {
            return;
        };
        if let Ok(guard) = metrics.lock() {
            let event = guard
                .snapshot(self.started_at.elapsed())
                .to_log_event(&self.config.metrics_target);
            let _ = logger.log_event(event);
        }
    }

    fn record(&self, update: impl FnOnce(&mut PropagatorMetrics)) {
        if let Some(metrics) = &self.config.metrics {
            if let Ok(mut guard) = metrics.lock() {
                update(&mut *guard);
            }
        }
    }

    fn emit(
        &self,
        level: LogLevel,
        target: &str,
        message: &str,
        fields: impl IntoIterator<Item = (String, Value)>,
    ) {
        if let Some(logger) = &self.config.logger {
            let _ = logger.log_event(event_with_fields(level, target, message, fields));
        }
    }
}
