//! Domain models - core app types
//!
//! This module contains the canonical data types used throughout the app:
//! - `Screen` - top-level views the renderer can show
//! - `Trip` / `Destination` - selection payloads
//! - `Booking` / `BookingDraft` - committed bookings and wizard drafts

pub mod booking;
pub mod types;
