//! Shared types for screens, trips and destinations

use serde::{Deserialize, Serialize};

/// Newtype wrapper for trip IDs to provide type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct TripId(pub u32);

impl std::fmt::Display for TripId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype wrapper for destination IDs (saved-set key)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct DestinationId(pub u32);

impl std::fmt::Display for DestinationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Top-level full-view states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Screen {
    Login,
    Onboarding,
    Home,
    Explore,
    TripDetail,
    AddBooking,
}

impl Screen {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Login => "login",
            Screen::Onboarding => "onboarding",
            Screen::Home => "home",
            Screen::Explore => "explore",
            Screen::TripDetail => "tripDetail",
            Screen::AddBooking => "addBooking",
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trip as selected from the home dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub destination: String,
    #[serde(default)]
    pub dates: String,
}

impl Trip {
    pub fn new(id: u32, destination: &str) -> Self {
        Self { id: TripId(id), destination: destination.to_string(), dates: String::new() }
    }

    pub fn with_dates(mut self, dates: &str) -> Self {
        self.dates = dates.to_string();
        self
    }
}

/// An entry in the explore feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: DestinationId,
    pub name: String,
    #[serde(default)]
    pub country: String,
}

impl Destination {
    pub fn new(id: u32, name: &str, country: &str) -> Self {
        Self { id: DestinationId(id), name: name.to_string(), country: country.to_string() }
    }
}

/// Tabs on the trip detail screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripTab {
    #[default]
    Overview,
    Updates,
    Budget,
    Weather,
    Documents,
}

impl TripTab {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripTab::Overview => "overview",
            TripTab::Updates => "updates",
            TripTab::Budget => "budget",
            TripTab::Weather => "weather",
            TripTab::Documents => "documents",
        }
    }
}
