#![forbid(unsafe_code)]

//! Presentation runtime for anchored popovers.
//!
//! The [`Presenter`] owns one popover per [`Tag`] on a [`Host`]. It resolves
//! options, asks the placement engine for geometry, builds the outline and
//! overlay, and sequences the entrance and exit through an
//! [`AnimationRunner`].

pub mod attachments;
pub mod error;
pub mod host;
pub mod instance;
pub mod options;
pub mod presenter;
pub mod runner;

pub use attachments::{Attachment, AttachmentTable, DialogKind};
pub use error::{ShowError, ShowResult};
pub use host::{Content, Host, Node, NodeId, PopoverNode, ScreenId, Tag, TriggerId, ViewId};
pub use instance::{Handlers, Phase, PopoverEvent, PopoverInstance};
pub use options::{PopoverOptions, PopoverStyle, PresenterConfig};
pub use presenter::{PopoverId, Presentation, Presenter};
pub use runner::{AnimationId, AnimationRequest, AnimationRunner, AnimationTarget, TimelineRunner};
