//! Trip detail view state: active tab and pull-to-refresh spinner

use crate::domain::types::TripTab;
use tracing::debug;

pub struct TripDetailView {
    active_tab: TripTab,
    refresh_due_at: Option<u64>,
    refresh_delay_ms: u64,
}

impl TripDetailView {
    pub fn new(refresh_delay_ms: u64) -> Self {
        Self { active_tab: TripTab::Overview, refresh_due_at: None, refresh_delay_ms }
    }

    pub fn select_tab(&mut self, tab: TripTab) {
        debug!(tab = %tab.as_str(), "trip_tab_selected");
        self.active_tab = tab;
    }

    /// Show the spinner; a repeated refresh restarts the delay
    pub fn refresh(&mut self, now: u64) {
        self.refresh_due_at = Some(now + self.refresh_delay_ms);
    }

    /// Clear the spinner once due. Returns `true` when it was cleared.
    pub fn tick(&mut self, now: u64) -> bool {
        match self.refresh_due_at {
            Some(due_at) if now >= due_at => {
                self.refresh_due_at = None;
                debug!("trip_refresh_done");
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.active_tab = TripTab::Overview;
        self.refresh_due_at = None;
    }

    pub fn active_tab(&self) -> TripTab {
        self.active_tab
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh_due_at.is_some()
    }
}
