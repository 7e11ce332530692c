//! Fixed-width color record stream handed to the compositor.
//!
//! Each node becomes 12 bytes: `window_id`, halo-adjusted `fg`, `bg`, all
//! little-endian `u32`. Writers only ever emit whole records.

use blake3::Hash;

use crate::graph::Graph;

use super::focus::Halo;

pub const RECORD_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorRecord {
    pub window_id: u32,
    pub fg: u32,
    pub bg: u32,
}

impl ColorRecord {
    pub fn to_bytes(&self) -> [u8; RECORD_LEN] {
        let mut out = [0u8; RECORD_LEN];
        out[0..4].copy_from_slice(&self.window_id.to_le_bytes());
        out[4..8].copy_from_slice(&self.fg.to_le_bytes());
        out[8..12].copy_from_slice(&self.bg.to_le_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8; RECORD_LEN]) -> Self {
        let word = |at: usize| u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
        Self {
            window_id: word(0),
            fg: word(4),
            bg: word(8),
        }
    }

    /// Decode every whole record in `bytes`; a partial tail is ignored.
    pub fn decode_all(bytes: &[u8]) -> Vec<ColorRecord> {
        bytes
            .chunks_exact(RECORD_LEN)
            .filter_map(|chunk| <&[u8; RECORD_LEN]>::try_from(chunk).ok())
            .map(ColorRecord::from_bytes)
            .collect()
    }
}

/// Output records in node index order.
pub fn collect_records(graph: &Graph, halo: &Halo) -> Vec<ColorRecord> {
    graph
        .nodes()
        .iter()
        .map(|node| {
            let colors = halo.apply(node);
            ColorRecord {
                window_id: node.window_id,
                fg: colors.fg,
                bg: colors.bg,
            }
        })
        .collect()
}

/// Write as many whole records as fit in `buf`; returns bytes written.
pub fn write_records(records: &[ColorRecord], buf: &mut [u8]) -> usize {
    let fit = records.len().min(buf.len() / RECORD_LEN);
    for (record, slot) in records[..fit].iter().zip(buf.chunks_exact_mut(RECORD_LEN)) {
        slot.copy_from_slice(&record.to_bytes());
    }
    fit * RECORD_LEN
}

/// Remembers the hash of the last full record stream it was shown.
#[derive(Debug, Default, Clone)]
pub struct ExportTracker {
    last: Option<Hash>,
}

impl ExportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when `records` differ from the previous observation.
    pub fn observe(&mut self, records: &[ColorRecord]) -> bool {
        let mut hasher = blake3::Hasher::new();
        for record in records {
            hasher.update(&record.to_bytes());
        }
        let hash = hasher.finalize();
        if self.last.map(|h| h != hash).unwrap_or(true) {
            self.last = Some(hash);
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
