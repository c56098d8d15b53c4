//! Add-booking wizard state machine
//!
//! Steps: `method -> {type -> form, screenshot -> confirm -> form, email}`.
//! Every action is checked against the current step; anything outside the
//! table is rejected with [`WizardError::InvalidTransition`] and leaves the
//! state untouched.
//!
//! Back navigation from `form` depends on how the form was reached: the
//! screenshot path returns to `confirm`, the manual path to `type`.

use crate::domain::booking::{BookingDraft, BookingType, DraftCommit, InputMethod};
use crate::services::error::WizardError;
use crate::services::extractor::{BookingExtractor, ScreenshotUpload};
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    Method,
    Type,
    Form,
    Screenshot,
    Email,
    Confirm,
}

impl WizardStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::Method => "method",
            WizardStep::Type => "type",
            WizardStep::Form => "form",
            WizardStep::Screenshot => "screenshot",
            WizardStep::Email => "email",
            WizardStep::Confirm => "confirm",
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of pressing back inside the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    Step(WizardStep),
    /// Back on the first step leaves the wizard
    Exit,
}

pub struct BookingWizard {
    step: WizardStep,
    input_method: Option<InputMethod>,
    booking_type: Option<BookingType>,
    draft: BookingDraft,
    upload: Option<ScreenshotUpload>,
    /// Set while a screenshot is being processed
    extraction_due_at: Option<u64>,
    extraction_delay_ms: u64,
}

impl BookingWizard {
    pub fn new(extraction_delay_ms: u64) -> Self {
        Self {
            step: WizardStep::Method,
            input_method: None,
            booking_type: None,
            draft: BookingDraft::new(),
            upload: None,
            extraction_due_at: None,
            extraction_delay_ms,
        }
    }

    fn invalid(&self, action: &'static str) -> WizardError {
        warn!(step = %self.step, action = %action, "wizard_invalid_transition");
        WizardError::InvalidTransition { step: self.step, action }
    }

    fn enter(&mut self, step: WizardStep) {
        debug!(from = %self.step, to = %step, "wizard_step");
        self.step = step;
    }

    pub fn choose_method(&mut self, method: InputMethod) -> Result<WizardStep, WizardError> {
        if self.step != WizardStep::Method {
            return Err(self.invalid("choose_method"));
        }
        self.input_method = Some(method);
        let next = match method {
            InputMethod::Manual => WizardStep::Type,
            InputMethod::Screenshot => WizardStep::Screenshot,
            InputMethod::Email => WizardStep::Email,
        };
        self.enter(next);
        Ok(next)
    }

    pub fn choose_type(&mut self, booking_type: BookingType) -> Result<WizardStep, WizardError> {
        if self.step != WizardStep::Type {
            return Err(self.invalid("choose_type"));
        }
        self.booking_type = Some(booking_type);
        self.draft = BookingDraft::new();
        self.enter(WizardStep::Form);
        Ok(WizardStep::Form)
    }

    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), WizardError> {
        if self.step != WizardStep::Form {
            return Err(self.invalid("set_field"));
        }
        self.draft.set(key, value);
        Ok(())
    }

    /// Start simulated processing of an uploaded screenshot
    pub fn start_upload(&mut self, upload: ScreenshotUpload, now: u64) -> Result<(), WizardError> {
        if self.step != WizardStep::Screenshot || self.is_processing() {
            return Err(self.invalid("upload"));
        }
        if upload.size_bytes == 0 {
            warn!(file = %upload.file_name, "wizard_empty_upload");
            return Err(WizardError::EmptyUpload(upload.file_name));
        }

        let due_at = now + self.extraction_delay_ms;
        info!(
            file = %upload.file_name,
            size_bytes = %upload.size_bytes,
            due_at = %due_at,
            "screenshot_processing_started"
        );
        self.upload = Some(upload);
        self.extraction_due_at = Some(due_at);
        Ok(())
    }

    /// Finish a pending extraction once its delay has elapsed.
    /// Returns `true` when the wizard moved to `confirm`.
    pub fn poll(&mut self, now: u64, extractor: &mut dyn BookingExtractor) -> bool {
        match self.extraction_due_at {
            Some(due_at) if now >= due_at => {}
            _ => return false,
        }
        self.extraction_due_at = None;
        let Some(upload) = self.upload.take() else {
            return false;
        };

        let extracted = extractor.extract(&upload);
        info!(
            file = %upload.file_name,
            booking_type = %extracted.booking_type,
            fields = %extracted.draft.len(),
            "screenshot_processing_done"
        );
        self.booking_type = Some(extracted.booking_type);
        self.draft = extracted.draft;
        self.enter(WizardStep::Confirm);
        true
    }

    /// "Edit Details" on the confirm step; the draft is kept
    pub fn edit_details(&mut self) -> Result<WizardStep, WizardError> {
        if self.step != WizardStep::Confirm {
            return Err(self.invalid("edit_details"));
        }
        self.enter(WizardStep::Form);
        Ok(WizardStep::Form)
    }

    /// Take the draft out of the wizard and reset it to the first step
    pub fn commit(&mut self) -> Result<DraftCommit, WizardError> {
        if !matches!(self.step, WizardStep::Form | WizardStep::Confirm) {
            return Err(self.invalid("commit"));
        }
        let (Some(booking_type), Some(source)) = (self.booking_type, self.input_method) else {
            return Err(self.invalid("commit"));
        };

        let draft = std::mem::take(&mut self.draft);
        debug!(
            booking_type = %booking_type,
            source = %source,
            fields = %draft.len(),
            "wizard_committed"
        );
        *self = Self::new(self.extraction_delay_ms);
        Ok(DraftCommit { booking_type, draft, source })
    }

    pub fn back(&mut self) -> BackOutcome {
        let next = match self.step {
            WizardStep::Method => return BackOutcome::Exit,
            WizardStep::Type | WizardStep::Email => {
                self.input_method = None;
                WizardStep::Method
            }
            WizardStep::Form => match self.input_method {
                Some(InputMethod::Screenshot) => WizardStep::Confirm,
                _ => {
                    self.booking_type = None;
                    self.draft = BookingDraft::new();
                    WizardStep::Type
                }
            },
            WizardStep::Screenshot => {
                if self.extraction_due_at.take().is_some() {
                    debug!("screenshot_processing_cancelled");
                }
                self.upload = None;
                self.input_method = None;
                WizardStep::Method
            }
            WizardStep::Confirm => {
                self.booking_type = None;
                self.draft = BookingDraft::new();
                WizardStep::Screenshot
            }
        };
        self.enter(next);
        BackOutcome::Step(next)
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn input_method(&self) -> Option<InputMethod> {
        self.input_method
    }

    pub fn booking_type(&self) -> Option<BookingType> {
        self.booking_type
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn is_processing(&self) -> bool {
        self.extraction_due_at.is_some()
    }
}
