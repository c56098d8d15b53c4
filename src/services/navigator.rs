//! Screen navigation with a delayed fade transition
//!
//! `navigate_to` never swaps the screen directly. It records a pending
//! transition due after the configured delay; `tick` applies it. Only one
//! transition is pending at a time and a newer request replaces it.

use crate::domain::types::{Screen, Trip};
use crate::services::error::NavError;
use tracing::{debug, info};

/// Last onboarding slide index; advancing past it exits to home
pub const LAST_ONBOARDING_STEP: u8 = 3;

/// A requested screen change waiting for its fade delay
#[derive(Debug, Clone)]
struct PendingTransition {
    target: Screen,
    payload: Option<Trip>,
    due_at: u64,
}

/// Holds the current screen, onboarding progress and selected trip
pub struct Navigator {
    current: Screen,
    onboarding_step: u8,
    pending: Option<PendingTransition>,
    selected_trip: Option<Trip>,
    transition_delay_ms: u64,
}

impl Navigator {
    pub fn new(transition_delay_ms: u64) -> Self {
        Self {
            current: Screen::Login,
            onboarding_step: 0,
            pending: None,
            selected_trip: None,
            transition_delay_ms,
        }
    }

    /// Begin a transition to `screen`.
    ///
    /// `payload` becomes the selected trip once the transition lands.
    /// Returns `true` when an earlier pending transition was replaced.
    pub fn navigate_to(
        &mut self,
        screen: Screen,
        payload: Option<Trip>,
        now: u64,
    ) -> Result<bool, NavError> {
        if screen == Screen::TripDetail && payload.is_none() && self.selected_trip.is_none() {
            return Err(NavError::MissingSelection(screen));
        }

        let due_at = now + self.transition_delay_ms;
        let superseded = self.pending.replace(PendingTransition { target: screen, payload, due_at });

        if let Some(old) = &superseded {
            debug!(
                old_target = %old.target,
                new_target = %screen,
                "transition_superseded"
            );
        }

        debug!(
            from = %self.current,
            to = %screen,
            due_at = %due_at,
            "transition_requested"
        );

        Ok(superseded.is_some())
    }

    /// Apply the pending transition if its delay has elapsed
    pub fn tick(&mut self, now: u64) -> Option<Screen> {
        let due = self.pending.as_ref().is_some_and(|p| now >= p.due_at);
        if !due {
            return None;
        }

        let pending = self.pending.take()?;
        let from = self.current;
        self.current = pending.target;
        if let Some(trip) = pending.payload {
            self.selected_trip = Some(trip);
        }

        info!(
            from = %from,
            to = %self.current,
            trip_id = ?self.selected_trip.as_ref().map(|t| t.id.0),
            "transition_applied"
        );

        Some(self.current)
    }

    /// Advance the onboarding carousel, exiting to home after the last slide.
    ///
    /// Returns `None` when only the step moved, or `Some(superseded)` when a
    /// transition to home was requested.
    pub fn next_onboarding(&mut self, now: u64) -> Option<bool> {
        if self.onboarding_step < LAST_ONBOARDING_STEP {
            self.onboarding_step += 1;
            debug!(step = %self.onboarding_step, "onboarding_advanced");
            None
        } else {
            Some(self.go_home(now))
        }
    }

    /// Leave onboarding immediately, whatever the current step.
    /// Returns `true` when an earlier pending transition was replaced.
    pub fn skip_onboarding(&mut self, now: u64) -> bool {
        debug!(step = %self.onboarding_step, "onboarding_skipped");
        self.go_home(now)
    }

    fn go_home(&mut self, now: u64) -> bool {
        // Home never needs a selection
        self.navigate_to(Screen::Home, None, now).unwrap_or(false)
    }

    pub fn current_screen(&self) -> Screen {
        self.current
    }

    pub fn onboarding_step(&self) -> u8 {
        self.onboarding_step
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_target(&self) -> Option<Screen> {
        self.pending.as_ref().map(|p| p.target)
    }

    /// Trip carried by the pending transition, if any
    pub fn pending_trip(&self) -> Option<&Trip> {
        self.pending.as_ref().and_then(|p| p.payload.as_ref())
    }

    pub fn selected_trip(&self) -> Option<&Trip> {
        self.selected_trip.as_ref()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(300)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bali() -> Trip {
        Trip::new(1, "Bali").with_dates("Mar 15 - Mar 25")
    }

    #[test]
    fn test_starts_at_login() {
        let nav = Navigator::default();
        assert_eq!(nav.current_screen(), Screen::Login);
        assert_eq!(nav.onboarding_step(), 0);
        assert!(!nav.is_transitioning());
        assert!(nav.selected_trip().is_none());
    }

    #[test]
    fn test_screen_not_swapped_in_same_call() {
        let mut nav = Navigator::new(300);

        nav.navigate_to(Screen::Onboarding, None, 0).unwrap();

        assert!(nav.is_transitioning());
        assert_eq!(nav.current_screen(), Screen::Login);
    }

    #[test]
    fn test_transition_respects_delay() {
        let mut nav = Navigator::new(300);
        nav.navigate_to(Screen::Onboarding, None, 1000).unwrap();

        assert_eq!(nav.tick(1299), None);
        assert_eq!(nav.current_screen(), Screen::Login);

        assert_eq!(nav.tick(1300), Some(Screen::Onboarding));
        assert_eq!(nav.current_screen(), Screen::Onboarding);
        assert!(!nav.is_transitioning());
    }

    #[test]
    fn test_last_write_wins() {
        let mut nav = Navigator::new(300);

        assert!(!nav.navigate_to(Screen::Home, None, 0).unwrap());
        assert!(nav.navigate_to(Screen::Explore, None, 100).unwrap());
        assert_eq!(nav.pending_target(), Some(Screen::Explore));

        // The first request's deadline passes without effect
        assert_eq!(nav.tick(300), None);
        assert_eq!(nav.tick(400), Some(Screen::Explore));
        assert_eq!(nav.tick(10_000), None);
        assert_eq!(nav.current_screen(), Screen::Explore);
    }

    #[test]
    fn test_trip_detail_requires_selection() {
        let mut nav = Navigator::new(300);

        let err = nav.navigate_to(Screen::TripDetail, None, 0).unwrap_err();
        assert_eq!(err, NavError::MissingSelection(Screen::TripDetail));
        assert!(!nav.is_transitioning());
    }

    #[test]
    fn test_payload_applied_on_landing() {
        let mut nav = Navigator::new(300);
        nav.navigate_to(Screen::TripDetail, Some(bali()), 0).unwrap();

        assert!(nav.selected_trip().is_none());
        nav.tick(300);
        assert_eq!(nav.selected_trip(), Some(&bali()));
        assert_eq!(nav.current_screen(), Screen::TripDetail);

        // Selection survives a trip back home and allows returning without a payload
        nav.navigate_to(Screen::Home, None, 400).unwrap();
        nav.tick(700);
        assert!(nav.selected_trip().is_some());
        assert!(nav.navigate_to(Screen::TripDetail, None, 800).is_ok());
    }

    #[test]
    fn test_superseded_payload_is_dropped() {
        let mut nav = Navigator::new(300);
        nav.navigate_to(Screen::TripDetail, Some(bali()), 0).unwrap();
        nav.navigate_to(Screen::Home, None, 10).unwrap();

        nav.tick(1000);
        assert_eq!(nav.current_screen(), Screen::Home);
        assert!(nav.selected_trip().is_none());
    }

    #[test]
    fn test_next_onboarding_four_times_lands_home() {
        let mut nav = Navigator::new(300);
        let mut steps = Vec::new();

        for _ in 0..4 {
            nav.next_onboarding(0);
            steps.push(nav.onboarding_step());
        }

        assert_eq!(steps, vec![1, 2, 3, 3]);
        assert_eq!(nav.pending_target(), Some(Screen::Home));
        nav.tick(300);
        assert_eq!(nav.current_screen(), Screen::Home);
    }

    #[test]
    fn test_next_onboarding_never_exceeds_last_step() {
        let mut nav = Navigator::new(300);
        for i in 0..20 {
            nav.next_onboarding(i);
            assert!(nav.onboarding_step() <= LAST_ONBOARDING_STEP);
        }
    }

    #[test]
    fn test_skip_onboarding() {
        let mut nav = Navigator::new(300);
        nav.next_onboarding(0);

        nav.skip_onboarding(0);

        assert_eq!(nav.pending_target(), Some(Screen::Home));
        assert_eq!(nav.onboarding_step(), 1);
    }
}
