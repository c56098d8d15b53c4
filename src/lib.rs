//! tripdeck library
//!
//! Navigation and add-booking wizard state for the travel itinerary app.
//! Exposes modules for integration testing and binary reuse.

pub mod domain;
pub mod infra;
pub mod io;
pub mod services;
