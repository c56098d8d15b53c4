//! Error types for controller operations

use crate::domain::types::Screen;
use crate::services::wizard::WizardStep;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("cannot navigate to {0} without a selected trip")]
    MissingSelection(Screen),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("wizard action '{action}' is not valid in step {step}")]
    InvalidTransition { step: WizardStep, action: &'static str },
    #[error("uploaded screenshot '{0}' is empty")]
    EmptyUpload(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error(transparent)]
    Nav(#[from] NavError),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error("add-booking wizard is not open")]
    WizardNotActive,
}
