use std::collections::HashMap;

use crate::models::{BoardFlashConfig, FlashStatus};

/// Per-port projection of flash outcomes.
///
/// Keyed by the port string; a port that was never flashed has no entry.
/// Entries are overwritten when a port is flashed again, and the latest
/// write wins. Two board entries configured with the same port share one
/// slot — a known limitation of keying by port.
#[derive(Clone, Debug, Default)]
pub struct FlashState {
    statuses: HashMap<String, PortFlashStatus>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PortFlashStatus {
    pub status: FlashStatus,
    /// Display-only progress percentage (0-100) while pending.
    pub progress: Option<f32>,
}

impl FlashState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_for(&self, port: &str) -> Option<&PortFlashStatus> {
        self.statuses.get(port)
    }

    pub fn tracked_ports(&self) -> usize {
        self.statuses.len()
    }

    pub fn mark_pending(&mut self, port: &str) {
        self.statuses.insert(
            port.to_string(),
            PortFlashStatus {
                status: FlashStatus::Pending,
                progress: None,
            },
        );
    }

    pub fn apply_result(&mut self, port: &str, success: bool) {
        let status = if success {
            FlashStatus::Success
        } else {
            FlashStatus::Error
        };

        self.statuses.insert(
            port.to_string(),
            PortFlashStatus {
                status,
                progress: None,
            },
        );
    }

    /// Fold a progress event into the projection. Progress is display-only:
    /// it never creates an entry and never changes the coarse status, so a
    /// late or out-of-order event cannot move a port backward.
    pub fn apply_progress(&mut self, port: &str, current: u64, total: u64) {
        let Some(entry) = self.statuses.get_mut(port) else {
            return;
        };

        if entry.status != FlashStatus::Pending || total == 0 {
            return;
        }

        entry.progress = Some(((current as f32 / total as f32) * 100.0).clamp(0.0, 100.0));
    }
}

/// One backend flash request derived from a board entry. Entries without a
/// port are skipped entirely and never reach the projection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlashTarget {
    pub port: String,
    pub hw_model: Option<u32>,
    pub firmware_version: Option<String>,
}

pub fn flash_targets(boards: &[BoardFlashConfig]) -> Vec<FlashTarget> {
    boards
        .iter()
        .filter_map(|board| {
            board.selected_port.as_ref().map(|port| FlashTarget {
                port: port.clone(),
                hw_model: board.selected_hw_model,
                firmware_version: board.selected_firmware_version.clone(),
            })
        })
        .collect()
}
