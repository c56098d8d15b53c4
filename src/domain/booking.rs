//! Booking data model: drafts collected by the wizard and committed bookings

use crate::domain::types::TripId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Generate a new UUIDv7 (time-sortable)
pub fn new_uuid_v7() -> String {
    Uuid::now_v7().to_string()
}

/// Get current epoch milliseconds
#[inline]
pub fn epoch_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
}

/// Kind of reservation being recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    Flight,
    Hotel,
    Car,
    Experience,
    Restaurant,
    Transfer,
}

impl BookingType {
    pub const ALL: [BookingType; 6] = [
        BookingType::Flight,
        BookingType::Hotel,
        BookingType::Car,
        BookingType::Experience,
        BookingType::Restaurant,
        BookingType::Transfer,
    ];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingType::Flight => "flight",
            BookingType::Hotel => "hotel",
            BookingType::Car => "car",
            BookingType::Experience => "experience",
            BookingType::Restaurant => "restaurant",
            BookingType::Transfer => "transfer",
        }
    }

    /// Form keys the manual form must collect before the booking is useful
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            BookingType::Flight => &["airline", "flightNumber", "date"],
            BookingType::Hotel => &["name", "checkIn", "checkOut"],
            BookingType::Car => &["company", "pickupDate", "returnDate"],
            BookingType::Experience => &["name", "date"],
            BookingType::Restaurant => &["name", "date", "time"],
            BookingType::Transfer => &["from", "to", "date"],
        }
    }
}

impl std::str::FromStr for BookingType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown booking type '{s}'"))
    }
}

impl std::fmt::Display for BookingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the booking details were entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMethod {
    Manual,
    Screenshot,
    Email,
}

impl InputMethod {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMethod::Manual => "manual",
            InputMethod::Screenshot => "screenshot",
            InputMethod::Email => "email",
        }
    }
}

impl std::fmt::Display for InputMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-progress, uncommitted field set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingDraft {
    fields: BTreeMap<String, String>,
}

impl BookingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field; an empty value removes it
    pub fn set(&mut self, key: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            self.fields.remove(key);
        } else {
            self.fields.insert(key.to_string(), value.to_string());
        }
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Required keys for `booking_type` that are not filled in yet
    pub fn missing_fields(&self, booking_type: BookingType) -> SmallVec<[&'static str; 4]> {
        booking_type
            .required_fields()
            .iter()
            .copied()
            .filter(|key| !self.fields.contains_key(*key))
            .collect()
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }
}

/// Output of a wizard commit, before an id and timestamp are assigned
#[derive(Debug, Clone, PartialEq)]
pub struct DraftCommit {
    pub booking_type: BookingType,
    pub draft: BookingDraft,
    pub source: InputMethod,
}

/// A committed booking. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub id: String,
    #[serde(rename = "type")]
    pub booking_type: BookingType,
    pub fields: BTreeMap<String, String>,
    pub source: InputMethod,
    pub created_at: u64,
    pub trip_id: Option<TripId>,
}

impl Booking {
    /// Create a booking from a wizard commit.
    ///
    /// Assigns a fresh UUIDv7 id and the current epoch time.
    ///
    /// # Example
    ///
    /// ```
    /// use tripdeck::domain::booking::{Booking, BookingDraft, BookingType, DraftCommit, InputMethod};
    ///
    /// let commit = DraftCommit {
    ///     booking_type: BookingType::Hotel,
    ///     draft: BookingDraft::new().with("name", "Alila Ubud"),
    ///     source: InputMethod::Manual,
    /// };
    /// let booking = Booking::from_commit(commit, None);
    /// assert_eq!(booking.booking_type, BookingType::Hotel);
    /// assert_eq!(booking.fields["name"], "Alila Ubud");
    /// ```
    pub fn from_commit(commit: DraftCommit, trip_id: Option<TripId>) -> Self {
        Self {
            id: new_uuid_v7(),
            booking_type: commit.booking_type,
            fields: commit.draft.into_fields(),
            source: commit.source,
            created_at: epoch_ms(),
            trip_id,
        }
    }
}

/// A destination snapshot bookmarked from the explore feed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedDestination {
    pub destination: crate::domain::types::Destination,
    pub saved_at: u64,
}
