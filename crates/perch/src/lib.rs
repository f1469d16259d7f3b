#![forbid(unsafe_code)]

//! Perch public facade crate.
//!
//! Re-exports the geometry, render, and runtime crates behind one surface and
//! offers a small prelude for day-to-day usage.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use perch_core::animation::Curve;
pub use perch_core::color::{BlurStyle, Rgba};
pub use perch_core::geometry::{Axis, Insets, Point, Rect, Size};
pub use perch_core::layer::Layer;
pub use perch_core::placement::{
    Direction, Placement, PlacementInput, arrow_anchor, compute_placement, plain_dialog_anchor,
    resolve_auto_direction,
};

// --- Render re-exports -----------------------------------------------------

pub use perch_render::outline::{Outline, build_outline};
pub use perch_render::overlay::{Cutout, OverlayDescriptor, OverlayFill, TapOutcome, build_overlay};

// --- Runtime re-exports ----------------------------------------------------

pub use perch_runtime::{
    AnimationRequest, AnimationRunner, AnimationTarget, Attachment, AttachmentTable, Content,
    DialogKind, Handlers, Host, Node, NodeId, Phase, PopoverEvent, PopoverId, PopoverInstance,
    PopoverNode, PopoverOptions, PopoverStyle, Presentation, Presenter, PresenterConfig,
    ScreenId, ShowError, Tag, TimelineRunner, TriggerId, ViewId,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for perch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A popover could not be shown.
    Show(ShowError),
    /// No popover occupies the tag.
    UnknownTag(Tag),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Show(err) => write!(f, "{err}"),
            Self::UnknownTag(tag) => write!(f, "no popover in tag {}", tag.0),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Show(err) => Some(err),
            Self::UnknownTag(_) => None,
        }
    }
}

impl From<ShowError> for Error {
    fn from(err: ShowError) -> Self {
        Self::Show(err)
    }
}

/// Standard result type for perch APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Dismiss the popover in `tag`, reporting why nothing happened.
///
/// [`Presenter::dismiss`] returns `false` both for an empty tag and for a
/// popover that is not yet visible; this tells the two apart.
pub fn dismiss<H: Host, R: AnimationRunner>(presenter: &mut Presenter<H, R>, tag: Tag) -> Result<bool> {
    if !presenter.is_occupied(tag) {
        return Err(Error::UnknownTag(tag));
    }
    Ok(presenter.dismiss(tag))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Content, Direction, Error, Handlers, Host, Phase, PopoverOptions, Presentation,
        Presenter, Rect, Result, Size, Tag, TapOutcome, ViewId,
    };
}
