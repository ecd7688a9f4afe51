//! # Rendering Collaborator
//!
//! The seam between the engine and whatever draws the inventory table.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  engine mutation ──► summarize(snapshot) ──► view.render(&snapshot,    │
//! │                                                          &summary)     │
//! │                                                                         │
//! │  The view gets a frozen Snapshot, never the live cache.                │
//! │  User actions come back as InventoryCommand (see command.rs).          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde::{Serialize, Serializer};
use stockroom_core::SummaryRecord;

use crate::cache::Snapshot;

/// Receives a fresh snapshot and summary after every state change.
pub trait InventoryView: Send + Sync {
    fn render(&self, snapshot: &Snapshot, summary: &SummaryRecord);
}

/// View that ignores every frame (headless use and tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpView;

impl InventoryView for NoOpView {
    fn render(&self, _snapshot: &Snapshot, _summary: &SummaryRecord) {}
}

// =============================================================================
// Frames
// =============================================================================

/// One rendered state: the items and their summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub items: Snapshot,
    pub summary: SummaryRecord,
}

impl Frame {
    /// JSON payload for a web or desktop table renderer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Serialize for Snapshot {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        self.items().serialize(serializer)
    }
}

/// View that keeps the latest frame and counts renders.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    latest: Mutex<Option<Frame>>,
    renders: AtomicUsize,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently rendered frame, if any.
    pub fn latest(&self) -> Option<Frame> {
        self.latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// How many times the engine has rendered.
    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

impl InventoryView for FrameBuffer {
    fn render(&self, snapshot: &Snapshot, summary: &SummaryRecord) {
        let frame = Frame {
            items: snapshot.clone(),
            summary: *summary,
        };
        *self
            .latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(frame);
        self.renders.fetch_add(1, Ordering::SeqCst);
    }
}
