use cityforge_common::Rect;
use serde::{Deserialize, Serialize};

/// Why a block was left out of the layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DropReason {
    BelowMinimumEdge { width: f64, depth: f64, min_edge: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedBlock {
    pub bounds: Rect,
    pub reason: DropReason,
}

/// Everything a generation pass discarded or defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub dropped_blocks: Vec<DroppedBlock>,
    /// Landmarks whose position fell inside no block.
    pub unmatched_landmarks: Vec<String>,
    /// Blocks whose centre fell outside every district polygon.
    pub fallback_blocks: usize,
    /// Street lines suppressed because a boulevard already ran there.
    pub skipped_streets: usize,
}

impl Diagnostics {
    /// True when nothing was dropped or lost. Fallback classification and
    /// skipped streets are expected and do not count.
    pub fn is_clean(&self) -> bool {
        self.dropped_blocks.is_empty() && self.unmatched_landmarks.is_empty()
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "dropped_blocks={} unmatched_landmarks={} fallback_blocks={} skipped_streets={}",
            self.dropped_blocks.len(),
            self.unmatched_landmarks.len(),
            self.fallback_blocks,
            self.skipped_streets
        )
    }
}
