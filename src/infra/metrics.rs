//! Lock-free counters for controller activity
//!
//! All atomics use Relaxed ordering. They are statistical counters only and
//! must not drive controller logic.

use crate::domain::booking::InputMethod;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Lock-free metrics collector
pub struct Metrics {
    transitions_requested: AtomicU64,
    transitions_superseded: AtomicU64,
    transitions_applied: AtomicU64,
    /// Committed bookings indexed by source (manual, screenshot, email)
    bookings_by_source: [AtomicU64; 3],
    extractions_total: AtomicU64,
    destinations_saved: AtomicU64,
    destinations_unsaved: AtomicU64,
    rejected_actions: AtomicU64,
    last_report_time: parking_lot::Mutex<Instant>,
}

#[inline]
fn source_index(source: InputMethod) -> usize {
    match source {
        InputMethod::Manual => 0,
        InputMethod::Screenshot => 1,
        InputMethod::Email => 2,
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            transitions_requested: AtomicU64::new(0),
            transitions_superseded: AtomicU64::new(0),
            transitions_applied: AtomicU64::new(0),
            bookings_by_source: Default::default(),
            extractions_total: AtomicU64::new(0),
            destinations_saved: AtomicU64::new(0),
            destinations_unsaved: AtomicU64::new(0),
            rejected_actions: AtomicU64::new(0),
            last_report_time: parking_lot::Mutex::new(Instant::now()),
        }
    }

    #[inline]
    pub fn record_transition_requested(&self, superseded: bool) {
        self.transitions_requested.fetch_add(1, Ordering::Relaxed);
        if superseded {
            self.transitions_superseded.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn record_transition_applied(&self) {
        self.transitions_applied.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_booking(&self, source: InputMethod) {
        self.bookings_by_source[source_index(source)].fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_extraction(&self) {
        self.extractions_total.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_destination_toggle(&self, saved: bool) {
        if saved {
            self.destinations_saved.fetch_add(1, Ordering::Relaxed);
        } else {
            self.destinations_unsaved.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn record_rejected_action(&self) {
        self.rejected_actions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bookings_total(&self) -> u64 {
        self.bookings_by_source.iter().map(|c| c.load(Ordering::Relaxed)).sum()
    }

    /// Snapshot all counters. Counters are monotonic and not reset.
    pub fn report(&self) -> MetricsSummary {
        let elapsed_secs = {
            let mut last = self.last_report_time.lock();
            let elapsed = last.elapsed().as_secs_f64();
            *last = Instant::now();
            elapsed
        };

        MetricsSummary {
            transitions_requested: self.transitions_requested.load(Ordering::Relaxed),
            transitions_superseded: self.transitions_superseded.load(Ordering::Relaxed),
            transitions_applied: self.transitions_applied.load(Ordering::Relaxed),
            bookings_manual: self.bookings_by_source[0].load(Ordering::Relaxed),
            bookings_screenshot: self.bookings_by_source[1].load(Ordering::Relaxed),
            bookings_email: self.bookings_by_source[2].load(Ordering::Relaxed),
            extractions_total: self.extractions_total.load(Ordering::Relaxed),
            destinations_saved: self.destinations_saved.load(Ordering::Relaxed),
            destinations_unsaved: self.destinations_unsaved.load(Ordering::Relaxed),
            rejected_actions: self.rejected_actions.load(Ordering::Relaxed),
            elapsed_secs,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub transitions_requested: u64,
    pub transitions_superseded: u64,
    pub transitions_applied: u64,
    pub bookings_manual: u64,
    pub bookings_screenshot: u64,
    pub bookings_email: u64,
    pub extractions_total: u64,
    pub destinations_saved: u64,
    pub destinations_unsaved: u64,
    pub rejected_actions: u64,
    pub elapsed_secs: f64,
}

impl MetricsSummary {
    pub fn log(&self) {
        info!(
            transitions = %self.transitions_requested,
            superseded = %self.transitions_superseded,
            applied = %self.transitions_applied,
            bookings_manual = %self.bookings_manual,
            bookings_screenshot = %self.bookings_screenshot,
            extractions = %self.extractions_total,
            saves = %self.destinations_saved,
            unsaves = %self.destinations_unsaved,
            rejected = %self.rejected_actions,
            window_secs = format!("{:.1}", self.elapsed_secs),
            "metrics"
        );
    }
}
