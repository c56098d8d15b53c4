//! Screenshot extraction seam
//!
//! The wizard hands an uploaded screenshot to a [`BookingExtractor`] once the
//! processing delay has elapsed. [`TemplateExtractor`] stands in for a real
//! parsing service by returning one of two fixed bookings.

use crate::domain::booking::{BookingDraft, BookingType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// File selected by the user on the screenshot step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenshotUpload {
    pub file_name: String,
    pub size_bytes: u64,
}

impl ScreenshotUpload {
    pub fn new(file_name: &str, size_bytes: u64) -> Self {
        Self { file_name: file_name.to_string(), size_bytes }
    }
}

/// Booking details recovered from a screenshot
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    pub booking_type: BookingType,
    pub draft: BookingDraft,
}

pub trait BookingExtractor: Send {
    fn extract(&mut self, upload: &ScreenshotUpload) -> Extracted;
}

fn flight_template() -> Extracted {
    Extracted {
        booking_type: BookingType::Flight,
        draft: BookingDraft::new()
            .with("airline", "Singapore Airlines")
            .with("flightNumber", "SQ 25")
            .with("from", "SIN")
            .with("to", "DPS")
            .with("date", "2025-03-15")
            .with("time", "08:45")
            .with("confirmation", "XKCD42"),
    }
}

fn hotel_template() -> Extracted {
    Extracted {
        booking_type: BookingType::Hotel,
        draft: BookingDraft::new()
            .with("name", "Four Seasons Resort Bali")
            .with("address", "Jimbaran, Bali")
            .with("checkIn", "2025-03-15")
            .with("checkOut", "2025-03-22")
            .with("roomType", "Ocean Villa")
            .with("confirmation", "FS-88213"),
    }
}

/// Coin-flip between a flight and a hotel template
pub struct TemplateExtractor {
    rng: StdRng,
}

impl TemplateExtractor {
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Seeded when `seed` is set, otherwise from OS entropy
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::with_seed(s),
            None => Self::from_entropy(),
        }
    }
}

impl BookingExtractor for TemplateExtractor {
    fn extract(&mut self, upload: &ScreenshotUpload) -> Extracted {
        let extracted = if self.rng.gen_bool(0.5) { flight_template() } else { hotel_template() };
        debug!(
            file = %upload.file_name,
            booking_type = %extracted.booking_type,
            fields = %extracted.draft.len(),
            "screenshot_extracted"
        );
        extracted
    }
}
