//! Replay of scripted UI events against the controller
//!
//! Scripts are JSONL, one event per line, tagged by `op`:
//!
//! ```text
//! {"op": "login"}
//! {"op": "wait", "ms": 300}
//! {"op": "choose_method", "method": "screenshot"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use crate::domain::booking::{BookingType, InputMethod};
use crate::domain::types::{Destination, Screen, Trip, TripTab};
use crate::io::egress::SnapshotWriter;
use crate::services::app::AppController;
use crate::services::clock::ManualClock;
use crate::services::error::AppError;
use crate::services::extractor::ScreenshotUpload;
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum UiEvent {
    Login,
    Navigate {
        screen: Screen,
        #[serde(default)]
        trip: Option<Trip>,
    },
    SelectTrip {
        trip: Trip,
    },
    OpenExplore,
    NextOnboarding,
    SkipOnboarding,
    OpenAddBooking,
    ChooseMethod {
        method: InputMethod,
    },
    ChooseType {
        #[serde(rename = "type")]
        booking_type: BookingType,
    },
    SetField {
        key: String,
        value: String,
    },
    UploadScreenshot {
        file_name: String,
        size_bytes: u64,
    },
    EditDetails,
    SaveBooking,
    WizardBack,
    ToggleSave {
        destination: Destination,
    },
    SelectTab {
        tab: TripTab,
    },
    RefreshTrip,
    Wait {
        ms: u64,
    },
}

/// Parse a JSONL script
pub fn parse_script(content: &str) -> anyhow::Result<Vec<UiEvent>> {
    let mut events = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let event: UiEvent = serde_json::from_str(line)
            .with_context(|| format!("invalid event on line {}", idx + 1))?;
        events.push(event);
    }
    Ok(events)
}

pub fn load_script<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<UiEvent>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    parse_script(&content).with_context(|| format!("Failed to parse script {}", path.display()))
}

/// Dispatch one event. `Wait` is handled by the runners and is a no-op here.
pub fn apply_event(app: &mut AppController, event: &UiEvent) -> Result<(), AppError> {
    match event {
        UiEvent::Login => app.login()?,
        UiEvent::Navigate { screen, trip } => app.navigate_to(*screen, trip.clone())?,
        UiEvent::SelectTrip { trip } => app.select_trip(trip.clone())?,
        UiEvent::OpenExplore => app.open_explore()?,
        UiEvent::NextOnboarding => app.next_onboarding(),
        UiEvent::SkipOnboarding => app.skip_onboarding(),
        UiEvent::OpenAddBooking => app.open_add_booking()?,
        UiEvent::ChooseMethod { method } => {
            app.choose_method(*method)?;
        }
        UiEvent::ChooseType { booking_type } => {
            app.choose_type(*booking_type)?;
        }
        UiEvent::SetField { key, value } => app.set_field(key, value)?,
        UiEvent::UploadScreenshot { file_name, size_bytes } => {
            app.upload_screenshot(ScreenshotUpload::new(file_name, *size_bytes))?
        }
        UiEvent::EditDetails => {
            app.edit_details()?;
        }
        UiEvent::SaveBooking => {
            app.save_booking()?;
        }
        UiEvent::WizardBack => {
            app.wizard_back()?;
        }
        UiEvent::ToggleSave { destination } => {
            app.toggle_save_destination(destination);
        }
        UiEvent::SelectTab { tab } => app.select_tab(*tab),
        UiEvent::RefreshTrip => app.refresh_trip(),
        UiEvent::Wait { .. } => {}
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub applied: usize,
    pub rejected: usize,
}

fn apply_logged(app: &mut AppController, event: &UiEvent, report: &mut ReplayReport) {
    match apply_event(app, event) {
        Ok(()) => {
            debug!(event = ?event, "event_applied");
            report.applied += 1;
        }
        Err(e) => {
            warn!(event = ?event, error = %e, "event_rejected");
            report.rejected += 1;
        }
    }
}

/// Replay on virtual time: `wait` advances `clock` and ticks once
pub fn run_virtual(
    app: &mut AppController,
    clock: &ManualClock,
    events: &[UiEvent],
    writer: &mut SnapshotWriter,
) -> ReplayReport {
    let mut report = ReplayReport::default();
    for event in events {
        if let UiEvent::Wait { ms } = event {
            clock.advance(*ms);
        } else {
            apply_logged(app, event, &mut report);
        }
        app.tick();
        writer.write(&app.snapshot());
    }
    report
}

/// Replay on wall-clock time: `wait` sleeps while a tick interval drives the controller
pub async fn run_realtime(
    app: &mut AppController,
    events: &[UiEvent],
    writer: &mut SnapshotWriter,
) -> ReplayReport {
    let mut report = ReplayReport::default();
    let mut ticker =
        tokio::time::interval(Duration::from_millis(app.config().tick_interval_ms()));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    for event in events {
        if let UiEvent::Wait { ms } = event {
            let deadline = tokio::time::Instant::now() + Duration::from_millis(*ms);
            loop {
                tokio::select! {
                    _ = tokio::time::sleep_until(deadline) => break,
                    _ = ticker.tick() => {
                        app.tick();
                    }
                }
            }
        } else {
            apply_logged(app, event, &mut report);
        }
        app.tick();
        writer.write(&app.snapshot());
    }
    report
}
