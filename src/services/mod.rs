//! Services - state machines and the controller that owns them
//!
//! - `app` - App controller, the single owner of UI state
//! - `navigator` - Screen transitions and onboarding
//! - `wizard` - Add-booking step machine
//! - `extractor` - Screenshot extraction seam
//! - `saved` - Saved-destinations set
//! - `trip_detail` - Trip detail tabs and refresh
//! - `clock` - Injectable time source

pub mod app;
pub mod clock;
pub mod error;
pub mod extractor;
pub mod navigator;
pub mod saved;
pub mod trip_detail;
pub mod wizard;

// Re-export commonly used types
pub use app::AppController;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AppError, NavError, WizardError};
