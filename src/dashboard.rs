//! # Dashboard Controller
//!
//! Owns every piece of mutable dashboard state and is the only thing that
//! changes it. The application calls one entry point per event:
//!
//! - `handle_message`: an inbound backend payload arrived
//! - `reset`: the user pressed Refresh
//! - `toggle_pause`: the user pressed Pause/Resume
//!
//! Views never touch the controller directly; they receive a `DashboardView`
//! borrowed from it, which is read-only.

use crate::detection::{Detection, InboundMessage};
use crate::stats::{self, ItemTypePercentages, ItemTypeTimes};
use crate::storage::{self, CacheStore, DETECTION_HISTORY_KEY, ITEM_TYPE_TIMES_KEY};
use crate::timeseries::{DetectionHistory, ROLLING_WINDOW};

/// What happened to an inbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    Applied,
    /// Dropped unread because the dashboard is paused
    Paused,
    /// Payload did not parse; nothing changed
    Rejected,
}

pub struct Dashboard {
    store: Box<dyn CacheStore>,
    image: Option<String>,
    detections: Vec<Detection>,
    history: DetectionHistory,
    item_type_times: ItemTypeTimes,
    item_type_percentages: ItemTypePercentages,
    paused: bool,
}

/// Read-only snapshot handed to the view layer
pub struct DashboardView<'a> {
    pub detections: &'a [Detection],
    pub current_target: Option<&'a Detection>,
    pub history: &'a DetectionHistory,
    pub rolling_average: Vec<f64>,
    pub item_type_times: &'a ItemTypeTimes,
    pub item_type_percentages: &'a ItemTypePercentages,
    pub paused: bool,
}

impl Dashboard {
    /// Restores both caches from `store`. Missing or unreadable entries start empty.
    pub fn load(store: Box<dyn CacheStore>) -> Self {
        let history: DetectionHistory =
            storage::read_json_or_default(store.as_ref(), DETECTION_HISTORY_KEY);
        let item_type_times: ItemTypeTimes =
            storage::read_json_or_default(store.as_ref(), ITEM_TYPE_TIMES_KEY);
        let item_type_percentages = stats::percentages(&item_type_times);

        if history.is_empty() && item_type_times.is_empty() {
            log::info!("No cached detection data, starting fresh");
        } else {
            log::info!(
                "Restored {} history points and {} item types from cache",
                history.len(),
                item_type_times.len()
            );
        }

        Self {
            store,
            image: None,
            detections: Vec::new(),
            history,
            item_type_times,
            item_type_percentages,
            paused: false,
        }
    }

    /// Apply one backend payload received at `now_ms` (ms since epoch).
    pub fn handle_message(&mut self, raw: &str, now_ms: i64) -> MessageOutcome {
        if self.paused {
            return MessageOutcome::Paused;
        }

        let message = match InboundMessage::parse(raw) {
            Ok(message) => message,
            Err(e) => {
                log::error!("{}", e);
                return MessageOutcome::Rejected;
            }
        };

        self.image = Some(message.image);

        self.history.add_point(now_ms, message.detections.len());
        self.detections = message.detections;
        if let Err(e) = storage::write_json(self.store.as_mut(), DETECTION_HISTORY_KEY, &self.history) {
            log::error!("{}", e);
        }

        stats::accumulate(&mut self.item_type_times, &message.time_on_screen);
        if let Err(e) = storage::write_json(self.store.as_mut(), ITEM_TYPE_TIMES_KEY, &self.item_type_times) {
            log::error!("{}", e);
        }
        self.item_type_percentages = stats::percentages(&self.item_type_times);

        MessageOutcome::Applied
    }

    /// Forget everything, on disk and in memory. Leaves the pause state alone.
    pub fn reset(&mut self) {
        for key in [DETECTION_HISTORY_KEY, ITEM_TYPE_TIMES_KEY] {
            if let Err(e) = self.store.remove(key) {
                log::error!("{}", e);
            }
        }

        self.history.clear();
        self.item_type_times.clear();
        self.item_type_percentages.clear();
        self.detections.clear();
        self.image = None;

        log::info!("Dashboard reset");
    }

    /// Flip between running and paused; returns the new paused state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        log::info!("Video feed {}", if self.paused { "paused" } else { "resumed" });
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn current_image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn view(&self) -> DashboardView<'_> {
        DashboardView {
            detections: &self.detections,
            current_target: self.detections.first(),
            history: &self.history,
            rolling_average: self.history.rolling_average(ROLLING_WINDOW),
            item_type_times: &self.item_type_times,
            item_type_percentages: &self.item_type_percentages,
            paused: self.paused,
        }
    }
}
