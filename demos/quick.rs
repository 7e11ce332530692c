//! Quick demo: a 2x2 pane grid recolored by a few brain-state presets.
//!
//! Run with `cargo run --example quick`. Each line prints a swatch per pane
//! using the exported (halo-adjusted) foreground over its background.

use std::io::{self, Write};
use std::sync::Arc;

use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::{execute, queue};
use spatial_propagator::color::unpack_argb;
use spatial_propagator::{
    ColorRecord, Logger, MemorySink, Propagator, PropagatorConfig, RECORD_LEN, Rect, argb_to_hex,
};

const PRESETS: &[(&str, f32, f32, f32, i32)] = &[
    ("focused", 25.0, -3.0, 1.5, 0),
    ("resting", 33.0, -2.0, 0.8, 0),
    ("meditative", 34.0, -1.5, 0.5, 1),
    ("stressed", 27.0, -5.0, 2.0, -1),
    ("drowsy", 31.0, -4.0, 0.3, 0),
    ("alert", 24.0, -2.5, 1.8, 1),
];

fn rgb(argb: u32) -> Color {
    let (_, r, g, b) = unpack_argb(argb);
    Color::Rgb { r, g, b }
}

fn swatch(out: &mut impl Write, record: &ColorRecord) -> io::Result<()> {
    queue!(
        out,
        SetForegroundColor(rgb(record.fg)),
        SetBackgroundColor(rgb(record.bg)),
        Print(format!(" pane {} {} ", record.window_id, argb_to_hex(record.fg))),
        ResetColor,
        Print(" "),
    )
}

fn main() -> io::Result<()> {
    let sink = Arc::new(MemorySink::new());
    let mut config = PropagatorConfig::default().with_logger(Logger::from_shared(sink.clone()));
    config.enable_metrics();
    let mut prop = Propagator::with_config(config);

    for (window_id, x, y) in [(1, 0, 0), (2, 100, 0), (3, 0, 100), (4, 100, 100)] {
        prop.add_node(window_id, 0, 2, Rect::new(x, y, 100, 100))
            .map_err(io::Error::other)?;
    }
    prop.detect_adjacency();
    prop.set_focus(1);

    let mut stdout = io::stdout();
    let mut buf = vec![0u8; 4 * RECORD_LEN];
    for (state, phi, valence, fisher, trit) in PRESETS {
        prop.assign_colors_bci(*phi, *valence, *fisher, *trit);
        let written = prop.get_spatial_colors(&mut buf);

        queue!(
            stdout,
            Print(format!(
                "{state:12} phi={phi:5.1} val={valence:5.1} fisher={fisher:4.1} trit={trit:+} "
            ))
        )?;
        for record in ColorRecord::decode_all(&buf[..written]) {
            swatch(&mut stdout, &record)?;
        }
        execute!(stdout, Print("\n"))?;
    }

    prop.emit_metrics();
    println!("\ntopology: {}", prop.graph().to_notation());
    println!("log events captured: {}", sink.events().len());
    Ok(())
}
