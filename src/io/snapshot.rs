//! Serializable view of controller state for the rendering layer

use crate::domain::booking::{Booking, BookingDraft, BookingType, InputMethod};
use crate::domain::types::{DestinationId, Screen, Trip, TripTab};
use crate::services::app::AppController;
use crate::services::wizard::WizardStep;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct WizardSnapshot {
    pub step: WizardStep,
    pub input_method: Option<InputMethod>,
    pub booking_type: Option<BookingType>,
    pub is_processing: bool,
    pub draft: BookingDraft,
    pub missing_fields: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshot {
    /// Controller clock at capture time
    pub t: u64,
    pub screen: Screen,
    pub pending_screen: Option<Screen>,
    pub is_transitioning: bool,
    pub onboarding_step: u8,
    pub selected_trip: Option<Trip>,
    pub trip_tab: TripTab,
    pub is_refreshing: bool,
    pub wizard: Option<WizardSnapshot>,
    pub bookings: Vec<Booking>,
    pub saved_destinations: Vec<DestinationId>,
}

impl StateSnapshot {
    pub fn capture(app: &AppController) -> Self {
        let nav = app.navigator();
        let wizard = app.wizard().map(|w| WizardSnapshot {
            step: w.step(),
            input_method: w.input_method(),
            booking_type: w.booking_type(),
            is_processing: w.is_processing(),
            draft: w.draft().clone(),
            missing_fields: w
                .booking_type()
                .map(|t| w.draft().missing_fields(t).into_vec())
                .unwrap_or_default(),
        });

        Self {
            t: app.now_ms(),
            screen: nav.current_screen(),
            pending_screen: nav.pending_target(),
            is_transitioning: nav.is_transitioning(),
            onboarding_step: nav.onboarding_step(),
            selected_trip: nav.selected_trip().cloned(),
            trip_tab: app.trip_detail().active_tab(),
            is_refreshing: app.trip_detail().is_refreshing(),
            wizard,
            bookings: app.bookings().to_vec(),
            saved_destinations: app
                .saved_destinations()
                .list()
                .iter()
                .map(|s| s.destination.id)
                .collect(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::config::Config;
    use crate::services::clock::ManualClock;
    use std::sync::Arc;

    #[test]
    fn test_snapshot_of_fresh_controller() {
        let clock = ManualClock::new();
        let app = AppController::with_clock(Config::default().with_extraction_seed(1), Arc::new(clock));

        let parsed: serde_json::Value = serde_json::from_str(&app.snapshot().to_json()).unwrap();

        assert_eq!(parsed["screen"], "login");
        assert_eq!(parsed["is_transitioning"], false);
        assert_eq!(parsed["onboarding_step"], 0);
        assert_eq!(parsed["trip_tab"], "overview");
        assert!(parsed["wizard"].is_null());
        assert_eq!(parsed["bookings"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_snapshot_lists_missing_fields() {
        let clock = ManualClock::new();
        let mut app = AppController::with_clock(Config::default(), Arc::new(clock));
        app.open_add_booking().unwrap();
        app.choose_method(InputMethod::Manual).unwrap();
        app.choose_type(BookingType::Hotel).unwrap();
        app.set_field("name", "Alila Ubud").unwrap();

        let snapshot = app.snapshot();

        let wizard = snapshot.wizard.unwrap();
        assert_eq!(wizard.step, WizardStep::Form);
        assert_eq!(wizard.missing_fields, vec!["checkIn", "checkOut"]);
        assert_eq!(snapshot.pending_screen, Some(Screen::AddBooking));
    }
}
