//! App controller - single owner of all UI state
//!
//! The rendering layer reads state through the accessors and `snapshot()`,
//! and changes it only through the named operations below. Delayed effects
//! (screen fades, screenshot processing, refresh spinner) are applied by
//! `tick()`, which reads the injected clock once per call.

use crate::domain::booking::{epoch_ms, Booking, BookingType, DraftCommit, InputMethod};
use crate::domain::types::{Destination, DestinationId, Screen, Trip, TripId, TripTab};
use crate::infra::config::Config;
use crate::infra::metrics::Metrics;
use crate::io::snapshot::StateSnapshot;
use crate::services::clock::Clock;
use crate::services::error::{AppError, NavError, WizardError};
use crate::services::extractor::{BookingExtractor, ScreenshotUpload, TemplateExtractor};
use crate::services::navigator::Navigator;
use crate::services::saved::SavedDestinations;
use crate::services::trip_detail::TripDetailView;
use crate::services::wizard::{BackOutcome, BookingWizard, WizardStep};
use std::sync::Arc;
use tracing::{debug, info};

/// The wizard plus where to go once it is done
struct ActiveWizard {
    wizard: BookingWizard,
    return_to: Screen,
    trip: Option<Trip>,
}

pub struct AppController {
    config: Config,
    clock: Arc<dyn Clock>,
    extractor: Box<dyn BookingExtractor>,
    metrics: Arc<Metrics>,
    navigator: Navigator,
    wizard: Option<ActiveWizard>,
    trip_detail: TripDetailView,
    bookings: Vec<Booking>,
    saved: SavedDestinations,
}

impl AppController {
    pub fn new(
        config: Config,
        clock: Arc<dyn Clock>,
        extractor: Box<dyn BookingExtractor>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            navigator: Navigator::new(config.transition_delay_ms()),
            trip_detail: TripDetailView::new(config.refresh_delay_ms()),
            wizard: None,
            bookings: Vec::new(),
            saved: SavedDestinations::new(),
            config,
            clock,
            extractor,
            metrics,
        }
    }

    /// Controller with the template extractor seeded from config
    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Self {
        let extractor = Box::new(TemplateExtractor::new(config.extraction_seed()));
        Self::new(config, clock, extractor, Arc::new(Metrics::new()))
    }

    fn request(&mut self, screen: Screen, payload: Option<Trip>) -> Result<(), NavError> {
        let now = self.clock.now_ms();
        let superseded = self.navigator.navigate_to(screen, payload, now)?;
        self.metrics.record_transition_requested(superseded);
        Ok(())
    }

    fn rejected(&self, err: WizardError) -> AppError {
        self.metrics.record_rejected_action();
        AppError::Wizard(err)
    }

    fn active_wizard(&mut self) -> Result<&mut ActiveWizard, AppError> {
        self.wizard.as_mut().ok_or(AppError::WizardNotActive)
    }

    // --- navigation -------------------------------------------------------

    pub fn login(&mut self) -> Result<(), AppError> {
        self.navigate_to(Screen::Onboarding, None)
    }

    /// Request a screen change. `AddBooking` always starts a fresh wizard.
    pub fn navigate_to(&mut self, screen: Screen, payload: Option<Trip>) -> Result<(), AppError> {
        if screen == Screen::AddBooking {
            return self.open_add_booking();
        }
        self.request(screen, payload)?;
        Ok(())
    }

    pub fn select_trip(&mut self, trip: Trip) -> Result<(), AppError> {
        self.navigate_to(Screen::TripDetail, Some(trip))
    }

    pub fn open_explore(&mut self) -> Result<(), AppError> {
        self.navigate_to(Screen::Explore, None)
    }

    pub fn next_onboarding(&mut self) {
        let now = self.clock.now_ms();
        if let Some(superseded) = self.navigator.next_onboarding(now) {
            self.metrics.record_transition_requested(superseded);
        }
    }

    pub fn skip_onboarding(&mut self) {
        let now = self.clock.now_ms();
        let superseded = self.navigator.skip_onboarding(now);
        self.metrics.record_transition_requested(superseded);
    }

    // --- add-booking wizard ---------------------------------------------------

    /// Start the add-booking flow, discarding any earlier draft.
    ///
    /// The origin is the screen being shown or, mid-fade, the one being
    /// faded to. Opened from trip detail, the booking is attached to that
    /// trip and the wizard returns there; reopened from inside the wizard,
    /// the earlier return target is kept; otherwise it returns home.
    pub fn open_add_booking(&mut self) -> Result<(), AppError> {
        let old = self.wizard.take();
        if let Some(old) = &old {
            debug!(step = %old.wizard.step(), "wizard_discarded");
        }

        let origin = self.navigator.pending_target().unwrap_or(self.navigator.current_screen());
        let (return_to, trip) = match (origin, old) {
            (Screen::AddBooking, Some(old)) => (old.return_to, old.trip),
            (Screen::TripDetail, _) => {
                match self.navigator.pending_trip().or(self.navigator.selected_trip()) {
                    Some(trip) => (Screen::TripDetail, Some(trip.clone())),
                    None => (Screen::Home, None),
                }
            }
            _ => (Screen::Home, None),
        };

        info!(
            return_to = %return_to,
            trip_id = ?trip.as_ref().map(|t| t.id.0),
            "wizard_opened"
        );
        self.wizard = Some(ActiveWizard {
            wizard: BookingWizard::new(self.config.extraction_delay_ms()),
            return_to,
            trip,
        });
        self.request(Screen::AddBooking, None)?;
        Ok(())
    }

    pub fn choose_method(&mut self, method: InputMethod) -> Result<WizardStep, AppError> {
        let result = self.active_wizard()?.wizard.choose_method(method);
        result.map_err(|e| self.rejected(e))
    }

    pub fn choose_type(&mut self, booking_type: BookingType) -> Result<WizardStep, AppError> {
        let result = self.active_wizard()?.wizard.choose_type(booking_type);
        result.map_err(|e| self.rejected(e))
    }

    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        let result = self.active_wizard()?.wizard.set_field(key, value);
        result.map_err(|e| self.rejected(e))
    }

    pub fn upload_screenshot(&mut self, upload: ScreenshotUpload) -> Result<(), AppError> {
        let now = self.clock.now_ms();
        let result = self.active_wizard()?.wizard.start_upload(upload, now);
        result.map_err(|e| self.rejected(e))
    }

    pub fn edit_details(&mut self) -> Result<WizardStep, AppError> {
        let result = self.active_wizard()?.wizard.edit_details();
        result.map_err(|e| self.rejected(e))
    }

    /// "Save" on the form or "Confirm & Save" on the confirm step.
    ///
    /// Commits the draft as a new booking and leaves the wizard.
    pub fn save_booking(&mut self) -> Result<Booking, AppError> {
        let result = self.active_wizard()?.wizard.commit();
        let commit = result.map_err(|e| self.rejected(e))?;
        let Some(active) = self.wizard.take() else {
            return Err(AppError::WizardNotActive);
        };

        let booking = self.add_booking(commit, active.trip.as_ref().map(|t| t.id));
        self.request(active.return_to, active.trip)?;
        Ok(booking)
    }

    /// Back inside the wizard; back on the first step cancels it
    pub fn wizard_back(&mut self) -> Result<BackOutcome, AppError> {
        let outcome = self.active_wizard()?.wizard.back();
        if outcome == BackOutcome::Exit {
            if let Some(active) = self.wizard.take() {
                info!(return_to = %active.return_to, "wizard_cancelled");
                self.request(active.return_to, active.trip)?;
            }
        }
        Ok(outcome)
    }

    /// Append a committed booking. Existing bookings are never touched.
    pub fn add_booking(&mut self, commit: DraftCommit, trip_id: Option<TripId>) -> Booking {
        let booking = Booking::from_commit(commit, trip_id);
        info!(
            id = %booking.id,
            booking_type = %booking.booking_type,
            source = %booking.source,
            trip_id = ?trip_id.map(|t| t.0),
            fields = %booking.fields.len(),
            "booking_committed"
        );
        self.metrics.record_booking(booking.source);
        self.bookings.push(booking.clone());
        booking
    }

    // --- explore ----------------------------------------------------------

    /// Returns whether the destination is saved after the toggle
    pub fn toggle_save_destination(&mut self, destination: &Destination) -> bool {
        let saved = self.saved.toggle(destination, epoch_ms());
        self.metrics.record_destination_toggle(saved);
        saved
    }

    pub fn is_destination_saved(&self, id: DestinationId) -> bool {
        self.saved.is_saved(id)
    }

    // --- trip detail ------------------------------------------------------

    pub fn select_tab(&mut self, tab: TripTab) {
        self.trip_detail.select_tab(tab);
    }

    pub fn refresh_trip(&mut self) {
        let now = self.clock.now_ms();
        self.trip_detail.refresh(now);
    }

    // --- time -------------------------------------------------------------

    /// Apply every delayed effect that is due. Returns the screen landed on, if any.
    pub fn tick(&mut self) -> Option<Screen> {
        let now = self.clock.now_ms();

        let landed = self.navigator.tick(now);
        if let Some(screen) = landed {
            self.metrics.record_transition_applied();
            if screen == Screen::TripDetail {
                self.trip_detail.reset();
            }
            if screen != Screen::AddBooking {
                if let Some(old) = self.wizard.take() {
                    debug!(step = %old.wizard.step(), screen = %screen, "wizard_discarded");
                }
            }
        }

        if let Some(active) = self.wizard.as_mut() {
            if active.wizard.poll(now, self.extractor.as_mut()) {
                self.metrics.record_extraction();
            }
        }

        self.trip_detail.tick(now);
        landed
    }

    // --- queries ----------------------------------------------------------

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn current_screen(&self) -> Screen {
        self.navigator.current_screen()
    }

    pub fn wizard(&self) -> Option<&BookingWizard> {
        self.wizard.as_ref().map(|a| &a.wizard)
    }

    pub fn trip_detail(&self) -> &TripDetailView {
        &self.trip_detail
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn bookings_for_trip(&self, trip_id: TripId) -> impl Iterator<Item = &Booking> {
        self.bookings.iter().filter(move |b| b.trip_id == Some(trip_id))
    }

    pub fn saved_destinations(&self) -> &SavedDestinations {
        &self.saved
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::capture(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::BookingDraft;
    use crate::services::clock::ManualClock;
    use crate::services::extractor::Extracted;
    use std::collections::HashSet;

    /// Returns a flight first, then a hotel, alternating
    struct AlternatingExtractor {
        next_flight: bool,
    }

    impl BookingExtractor for AlternatingExtractor {
        fn extract(&mut self, _upload: &ScreenshotUpload) -> Extracted {
            let flight = self.next_flight;
            self.next_flight = !self.next_flight;
            if flight {
                Extracted {
                    booking_type: BookingType::Flight,
                    draft: BookingDraft::new()
                        .with("airline", "Garuda Indonesia")
                        .with("flightNumber", "GA 404")
                        .with("date", "2025-03-15"),
                }
            } else {
                Extracted {
                    booking_type: BookingType::Hotel,
                    draft: BookingDraft::new().with("name", "Alila Ubud"),
                }
            }
        }
    }

    struct Harness {
        app: AppController,
        clock: ManualClock,
    }

    impl Harness {
        fn new() -> Self {
            let clock = ManualClock::new();
            let app = AppController::new(
                Config::default(),
                Arc::new(clock.clone()),
                Box::new(AlternatingExtractor { next_flight: true }),
                Arc::new(Metrics::new()),
            );
            Self { app, clock }
        }

        /// Advance virtual time and apply due effects
        fn wait(&mut self, ms: u64) -> Option<Screen> {
            self.clock.advance(ms);
            self.app.tick()
        }

        fn at_home(mut self) -> Self {
            self.app.navigate_to(Screen::Home, None).unwrap();
            self.wait(300);
            assert_eq!(self.app.current_screen(), Screen::Home);
            self
        }
    }

    fn bali() -> Trip {
        Trip::new(1, "Bali")
    }

    #[test]
    fn test_login_to_onboarding_to_home() {
        let mut h = Harness::new();
        h.app.login().unwrap();
        assert_eq!(h.wait(300), Some(Screen::Onboarding));

        for _ in 0..4 {
            h.app.next_onboarding();
        }
        assert_eq!(h.app.navigator().onboarding_step(), 3);
        assert_eq!(h.wait(300), Some(Screen::Home));
    }

    #[test]
    fn test_last_navigation_wins_after_settle() {
        let mut h = Harness::new();
        h.app.navigate_to(Screen::Home, None).unwrap();
        h.clock.advance(100);
        h.app.open_explore().unwrap();
        h.clock.advance(100);
        h.app.select_trip(bali()).unwrap();

        h.wait(10_000);

        assert_eq!(h.app.current_screen(), Screen::TripDetail);
        assert!(!h.app.navigator().is_transitioning());
        let summary = h.app.metrics().report();
        assert_eq!(summary.transitions_requested, 3);
        assert_eq!(summary.transitions_superseded, 2);
        assert_eq!(summary.transitions_applied, 1);
    }

    #[test]
    fn test_trip_detail_without_selection_is_rejected() {
        let mut h = Harness::new().at_home();
        let err = h.app.navigate_to(Screen::TripDetail, None).unwrap_err();
        assert_eq!(err, AppError::Nav(NavError::MissingSelection(Screen::TripDetail)));
    }

    #[test]
    fn test_landing_on_trip_detail_resets_tabs() {
        let mut h = Harness::new().at_home();
        h.app.select_trip(bali()).unwrap();
        h.wait(300);
        h.app.select_tab(TripTab::Budget);
        h.app.refresh_trip();
        assert!(h.app.trip_detail().is_refreshing());

        h.app.navigate_to(Screen::Home, None).unwrap();
        h.wait(300);
        h.app.navigate_to(Screen::TripDetail, None).unwrap();
        h.wait(300);

        assert_eq!(h.app.trip_detail().active_tab(), TripTab::Overview);
        assert!(!h.app.trip_detail().is_refreshing());
    }

    #[test]
    fn test_manual_flight_booking() {
        let mut h = Harness::new().at_home();
        h.app.open_add_booking().unwrap();
        h.wait(300);
        assert_eq!(h.app.current_screen(), Screen::AddBooking);

        h.app.choose_method(InputMethod::Manual).unwrap();
        h.app.choose_type(BookingType::Flight).unwrap();
        h.app.set_field("airline", "Singapore Airlines").unwrap();
        h.app.set_field("flightNumber", "SQ 25").unwrap();
        h.app.set_field("date", "2025-03-15").unwrap();
        let booking = h.app.save_booking().unwrap();

        assert_eq!(booking.booking_type, BookingType::Flight);
        assert_eq!(booking.source, InputMethod::Manual);
        assert!(booking.trip_id.is_none());
        assert_eq!(h.app.bookings().len(), 1);
        assert!(h.app.wizard().is_none());

        assert_eq!(h.wait(300), Some(Screen::Home));
    }

    #[test]
    fn test_screenshot_booking_with_edit() {
        let mut h = Harness::new().at_home();
        h.app.open_add_booking().unwrap();
        h.wait(300);

        h.app.choose_method(InputMethod::Screenshot).unwrap();
        h.app.upload_screenshot(ScreenshotUpload::new("pass.png", 2048)).unwrap();
        assert!(h.app.wizard().unwrap().is_processing());

        h.wait(1999);
        assert_eq!(h.app.wizard().unwrap().step(), WizardStep::Screenshot);
        h.wait(1);
        let wizard = h.app.wizard().unwrap();
        assert_eq!(wizard.step(), WizardStep::Confirm);
        let extracted = wizard.draft().clone();
        assert!(!extracted.is_empty());

        h.app.edit_details().unwrap();
        assert_eq!(h.app.wizard().unwrap().draft(), &extracted);

        let booking = h.app.save_booking().unwrap();
        assert_eq!(booking.source, InputMethod::Screenshot);
        assert_eq!(booking.booking_type, BookingType::Flight);
        assert_eq!(&booking.fields, extracted.fields());
        assert_eq!(h.app.bookings().len(), 1);
        assert_eq!(h.app.metrics().report().extractions_total, 1);
    }

    #[test]
    fn test_booking_from_trip_detail_attaches_trip() {
        let mut h = Harness::new().at_home();
        h.app.select_trip(bali()).unwrap();
        h.wait(300);

        h.app.open_add_booking().unwrap();
        h.wait(300);
        h.app.choose_method(InputMethod::Manual).unwrap();
        h.app.choose_type(BookingType::Restaurant).unwrap();
        h.app.set_field("name", "Locavore").unwrap();
        let booking = h.app.save_booking().unwrap();

        assert_eq!(booking.trip_id, Some(TripId(1)));
        assert_eq!(h.wait(300), Some(Screen::TripDetail));
        assert_eq!(h.app.bookings_for_trip(TripId(1)).count(), 1);
    }

    #[test]
    fn test_booking_ids_unique_across_commits() {
        let mut h = Harness::new().at_home();
        for _ in 0..5 {
            h.app.open_add_booking().unwrap();
            h.wait(300);
            h.app.choose_method(InputMethod::Manual).unwrap();
            h.app.choose_type(BookingType::Transfer).unwrap();
            h.app.save_booking().unwrap();
            h.wait(300);
        }

        let ids: HashSet<&str> = h.app.bookings().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_wizard_back_from_method_cancels() {
        let mut h = Harness::new().at_home();
        h.app.open_add_booking().unwrap();
        h.wait(300);

        assert_eq!(h.app.wizard_back().unwrap(), BackOutcome::Exit);

        assert!(h.app.wizard().is_none());
        assert_eq!(h.wait(300), Some(Screen::Home));
        assert!(h.app.bookings().is_empty());
        assert_eq!(h.app.choose_method(InputMethod::Manual), Err(AppError::WizardNotActive));
    }

    #[test]
    fn test_reopening_wizard_discards_draft() {
        let mut h = Harness::new().at_home();
        h.app.open_add_booking().unwrap();
        h.wait(300);
        h.app.choose_method(InputMethod::Manual).unwrap();
        h.app.choose_type(BookingType::Hotel).unwrap();
        h.app.set_field("name", "Capella Ubud").unwrap();

        h.app.open_add_booking().unwrap();

        let wizard = h.app.wizard().unwrap();
        assert_eq!(wizard.step(), WizardStep::Method);
        assert!(wizard.draft().is_empty());
    }

    #[test]
    fn test_reopening_wizard_keeps_trip_context() {
        let mut h = Harness::new().at_home();
        h.app.select_trip(bali()).unwrap();
        h.wait(300);
        h.app.open_add_booking().unwrap();
        h.wait(300);

        h.app.open_add_booking().unwrap();
        h.app.choose_method(InputMethod::Manual).unwrap();
        h.app.choose_type(BookingType::Hotel).unwrap();
        h.app.set_field("name", "Capella Ubud").unwrap();
        let booking = h.app.save_booking().unwrap();

        assert_eq!(booking.trip_id, Some(TripId(1)));
        assert_eq!(h.wait(300), Some(Screen::TripDetail));
    }

    #[test]
    fn test_add_booking_mid_fade_to_trip_detail() {
        let mut h = Harness::new().at_home();
        h.app.select_trip(bali()).unwrap();
        h.clock.advance(100);
        h.app.open_add_booking().unwrap();
        h.wait(300);
        assert_eq!(h.app.current_screen(), Screen::AddBooking);
        assert!(h.app.navigator().selected_trip().is_none());

        h.app.choose_method(InputMethod::Manual).unwrap();
        h.app.choose_type(BookingType::Car).unwrap();
        let booking = h.app.save_booking().unwrap();

        assert_eq!(booking.trip_id, Some(TripId(1)));
        assert_eq!(h.wait(300), Some(Screen::TripDetail));
        assert_eq!(h.app.navigator().selected_trip(), Some(&bali()));
    }

    #[test]
    fn test_cancel_mid_fade_returns_to_trip() {
        let mut h = Harness::new().at_home();
        h.app.select_trip(bali()).unwrap();
        h.app.open_add_booking().unwrap();
        h.wait(300);

        assert_eq!(h.app.wizard_back().unwrap(), BackOutcome::Exit);

        assert_eq!(h.wait(300), Some(Screen::TripDetail));
        assert_eq!(h.app.navigator().selected_trip().map(|t| t.id), Some(TripId(1)));
    }

    #[test]
    fn test_add_booking_returns_stored_copy() {
        let mut h = Harness::new();
        let commit = DraftCommit {
            booking_type: BookingType::Experience,
            draft: BookingDraft::new().with("name", "Mount Batur sunrise"),
            source: InputMethod::Email,
        };

        let booking = h.app.add_booking(commit, Some(TripId(4)));

        assert_eq!(h.app.bookings(), &[booking]);
        assert_eq!(h.app.bookings_for_trip(TripId(4)).count(), 1);
    }

    #[test]
    fn test_leaving_add_booking_discards_wizard() {
        let mut h = Harness::new().at_home();
        h.app.open_add_booking().unwrap();
        h.wait(300);
        h.app.choose_method(InputMethod::Email).unwrap();

        h.app.open_explore().unwrap();
        h.wait(300);

        assert!(h.app.wizard().is_none());
    }

    #[test]
    fn test_invalid_wizard_action_counted() {
        let mut h = Harness::new().at_home();
        h.app.open_add_booking().unwrap();

        let err = h.app.edit_details().unwrap_err();

        assert!(matches!(err, AppError::Wizard(WizardError::InvalidTransition { .. })));
        assert_eq!(h.app.metrics().report().rejected_actions, 1);
    }

    #[test]
    fn test_toggle_save_destination() {
        let mut h = Harness::new().at_home();
        let kyoto = Destination::new(7, "Kyoto", "Japan");

        assert!(h.app.toggle_save_destination(&kyoto));
        assert!(h.app.is_destination_saved(DestinationId(7)));
        assert!(!h.app.toggle_save_destination(&kyoto));
        assert!(!h.app.is_destination_saved(DestinationId(7)));
        assert!(h.app.saved_destinations().is_empty());
    }
}
