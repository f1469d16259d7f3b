#![forbid(unsafe_code)]

//! Per-trigger side table.
//!
//! Callers record content size, dialog kind, options, and an optional child
//! screen against a trigger before presenting. The presenter reads the entry
//! once at show time; missing entries and missing fields fall back to
//! defaults.

use std::collections::HashMap;

use perch_core::geometry::Size;

use crate::host::{ScreenId, TriggerId};
use crate::options::PopoverOptions;

/// Content size used when none was recorded.
pub const DEFAULT_CONTENT_SIZE: Size = Size::new(100.0, 100.0);

/// Whether the popover points at its trigger or floats as a centered panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DialogKind {
    /// Arrow popover anchored to the trigger, with highlight cutout.
    #[default]
    Arrow,
    /// Centered panel without an arrow.
    Plain,
}

/// State attached to one trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub content_size: Size,
    pub dialog_kind: DialogKind,
    pub options: PopoverOptions,
    /// Child screen shown when no content is passed to `present`.
    pub child: Option<ScreenId>,
}

impl Default for Attachment {
    fn default() -> Self {
        Self {
            content_size: DEFAULT_CONTENT_SIZE,
            dialog_kind: DialogKind::Arrow,
            options: PopoverOptions::default(),
            child: None,
        }
    }
}

/// Map from trigger to its [`Attachment`].
#[derive(Debug, Clone, Default)]
pub struct AttachmentTable {
    entries: HashMap<TriggerId, Attachment>,
}

impl AttachmentTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry for `trigger`, created with defaults if absent.
    pub fn entry(&mut self, trigger: TriggerId) -> &mut Attachment {
        self.entries.entry(trigger).or_default()
    }

    /// Record the content size.
    pub fn set_content_size(&mut self, trigger: TriggerId, size: Size) {
        self.entry(trigger).content_size = size;
    }

    pub fn set_dialog_kind(&mut self, trigger: TriggerId, kind: DialogKind) {
        self.entry(trigger).dialog_kind = kind;
    }

    /// Record options; merged under any options passed to `present`.
    pub fn set_options(&mut self, trigger: TriggerId, options: PopoverOptions) {
        self.entry(trigger).options = options;
    }

    pub fn set_child(&mut self, trigger: TriggerId, child: ScreenId) {
        self.entry(trigger).child = Some(child);
    }

    /// The recorded entry, if any.
    pub fn get(&self, trigger: TriggerId) -> Option<&Attachment> {
        self.entries.get(&trigger)
    }

    /// The recorded entry, or defaults.
    pub fn resolve(&self, trigger: TriggerId) -> Attachment {
        self.get(trigger).cloned().unwrap_or_default()
    }

    /// Forget everything recorded for `trigger`.
    pub fn remove(&mut self, trigger: TriggerId) -> Option<Attachment> {
        self.entries.remove(&trigger)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
