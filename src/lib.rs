//! Spatial topology and color propagation for tiled window layouts.
//!
//! A [`Propagator`] owns a graph of rectangular regions, learns adjacency from
//! shared edges or from the bracketed topology notation, assigns each region a
//! foreground/background pair (golden-angle spiral or brainwave-entropy
//! driven) and exports halo-adjusted colors for the compositor to draw.
//! Window enumeration and rendering stay with the caller.

pub mod color;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod logging;
pub mod metrics;
pub mod runtime;
pub mod topology;

pub use color::{Argb, ColorPair, EntropySignal, GOLDEN_ANGLE, Hcl, PaletteSettings, Trit, argb_to_hex};
pub use error::{PropagatorError, Result, TopologyError};
pub use geometry::{Axis, Rect, SharedEdge};
pub use graph::{Graph, Node, NodeIndex, NodeSpec};
pub use logging::{FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult, MemorySink};
pub use metrics::{MetricSnapshot, PropagatorMetrics};
pub use runtime::export::{ColorRecord, RECORD_LEN};
pub use runtime::focus::{FocusChange, FocusController, Halo};
pub use runtime::{Propagator, PropagatorConfig};
pub use topology::{IngestSummary, Topology};
