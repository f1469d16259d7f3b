#![forbid(unsafe_code)]

//! Errors raised while presenting a popover.

use std::fmt;

/// Why a popover could not be shown.
///
/// The public `present` entry point turns every variant into a silent no-op;
/// [`crate::Presenter::try_present`] surfaces them for callers that care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowError {
    /// No host screen is attached to the presenter.
    NoHost,
    /// Another popover already occupies the tag.
    TagOccupied,
    /// Neither a content view nor a child screen was available.
    MissingContent,
    /// The trigger is no longer part of the host hierarchy.
    TriggerGone,
    /// The instance has already been shown once.
    AlreadyShown,
}

impl fmt::Display for ShowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShowError::NoHost => write!(f, "no host screen is attached"),
            ShowError::TagOccupied => write!(f, "tag is occupied by another popover"),
            ShowError::MissingContent => write!(f, "no content view or child screen to show"),
            ShowError::TriggerGone => write!(f, "trigger view is no longer in the host"),
            ShowError::AlreadyShown => write!(f, "popover instance was already shown"),
        }
    }
}

impl std::error::Error for ShowError {}

/// Result type for show operations.
pub type ShowResult<T> = Result<T, ShowError>;
