#![forbid(unsafe_code)]

//! The presenter: one slot per tag on one host.
//!
//! `present` is fire-and-forget. It runs configuration and placement
//! synchronously, hands the entrance to the runner, and returns. Completions
//! come back through [`Presenter::pump`], which the host calls from its event
//! loop (or after each runner tick).

use std::collections::BTreeMap;

use perch_core::geometry::Point;
use perch_render::overlay::TapOutcome;

use crate::attachments::AttachmentTable;
use crate::error::{ShowError, ShowResult};
use crate::host::{Content, Host, ScreenId, Tag, TriggerId, ViewId};
use crate::instance::{AnimationIds, Handlers, Phase, PopoverEvent, PopoverInstance, Setup};
use crate::options::{PopoverOptions, PresenterConfig};
use crate::runner::AnimationRunner;

/// Identity of one presentation, unique per presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PopoverId(pub u64);

/// A request to show a popover.
///
/// # Example
///
/// ```
/// use perch_runtime::{Presentation, Tag, ViewId};
/// use perch_runtime::options::PopoverOptions;
///
/// let request = Presentation::view(ViewId(2), ViewId(1), Tag(7))
///     .options(PopoverOptions::new().corner_radius(12.0));
/// assert_eq!(request.tag(), Tag(7));
/// ```
#[derive(Debug)]
pub struct Presentation {
    trigger: TriggerId,
    tag: Tag,
    content: Option<Content>,
    options: PopoverOptions,
    handlers: Handlers,
}

impl Presentation {
    /// Show `content` pointing at `trigger`.
    pub fn view(content: ViewId, trigger: TriggerId, tag: Tag) -> Self {
        Self::with_content(Some(Content::View(content)), trigger, tag)
    }

    /// Show the child screen `screen` pointing at `trigger`.
    pub fn screen(screen: ScreenId, trigger: TriggerId, tag: Tag) -> Self {
        Self::with_content(Some(Content::Screen(screen)), trigger, tag)
    }

    /// Show the child screen recorded for `trigger` in the attachment table.
    pub fn attached(trigger: TriggerId, tag: Tag) -> Self {
        Self::with_content(None, trigger, tag)
    }

    fn with_content(content: Option<Content>, trigger: TriggerId, tag: Tag) -> Self {
        Self {
            trigger,
            tag,
            content,
            options: PopoverOptions::default(),
            handlers: Handlers::default(),
        }
    }

    /// Options applied on top of the trigger's recorded options.
    #[must_use]
    pub fn options(mut self, options: PopoverOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn handlers(mut self, handlers: Handlers) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn trigger(&self) -> TriggerId {
        self.trigger
    }
}

/// Presents popovers on a host and drives their lifecycles.
#[derive(Debug)]
pub struct Presenter<H, R> {
    host: Option<H>,
    runner: R,
    config: PresenterConfig,
    attachments: AttachmentTable,
    instances: BTreeMap<Tag, (PopoverId, PopoverInstance)>,
    ids: AnimationIds,
    next_popover: u64,
    events: Vec<PopoverEvent>,
}

impl<H: Host, R: AnimationRunner> Presenter<H, R> {
    /// A presenter without a host; every `present` is a no-op until one is set.
    pub fn new(runner: R) -> Self {
        Self {
            host: None,
            runner,
            config: PresenterConfig::default(),
            attachments: AttachmentTable::default(),
            instances: BTreeMap::new(),
            ids: AnimationIds::default(),
            next_popover: 0,
            events: Vec::new(),
        }
    }

    /// Attach the host screen.
    #[must_use]
    pub fn with_host(mut self, host: H) -> Self {
        self.host = Some(host);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: PresenterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn set_host(&mut self, host: H) {
        self.host = Some(host);
    }

    pub fn host(&self) -> Option<&H> {
        self.host.as_ref()
    }

    pub fn host_mut(&mut self) -> Option<&mut H> {
        self.host.as_mut()
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn runner_mut(&mut self) -> &mut R {
        &mut self.runner
    }

    pub fn config(&self) -> &PresenterConfig {
        &self.config
    }

    /// The per-trigger side table.
    pub fn attachments(&self) -> &AttachmentTable {
        &self.attachments
    }

    pub fn attachments_mut(&mut self) -> &mut AttachmentTable {
        &mut self.attachments
    }

    /// Show a popover; a no-op returning `None` if it cannot be shown.
    pub fn present(&mut self, request: Presentation) -> Option<PopoverId> {
        let tag = request.tag;
        match self.try_present(request) {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::debug!(tag = tag.0, %err, "present ignored");
                None
            }
        }
    }

    /// Show a popover, reporting why it could not be shown.
    pub fn try_present(&mut self, request: Presentation) -> ShowResult<PopoverId> {
        let Presentation {
            trigger,
            tag,
            content,
            options,
            handlers,
        } = request;

        let Some(host) = self.host.as_mut() else {
            return Err(ShowError::NoHost);
        };
        if self.instances.contains_key(&tag) {
            return Err(ShowError::TagOccupied);
        }

        let attachment = self.attachments.resolve(trigger);
        let content = content
            .or(attachment.child.map(Content::Screen))
            .ok_or(ShowError::MissingContent)?;
        let style = self
            .config
            .defaults
            .clone()
            .with(&attachment.options.merge(&options));
        let setup = Setup {
            content,
            content_size: attachment.content_size,
            dialog_kind: attachment.dialog_kind,
            style,
            min_scale: self.config.min_scale,
        };

        let mut instance = PopoverInstance::new(tag, trigger, handlers);
        instance.show(setup, host, &mut self.runner, &mut self.ids)?;
        self.events.extend(instance.drain_events());

        self.next_popover += 1;
        let id = PopoverId(self.next_popover);
        tracing::debug!(tag = tag.0, popover = id.0, "popover presented");
        self.instances.insert(tag, (id, instance));
        Ok(id)
    }

    /// Start dismissing the popover in `tag`. Only a visible popover can be
    /// dismissed.
    pub fn dismiss(&mut self, tag: Tag) -> bool {
        let Some((_, instance)) = self.instances.get_mut(&tag) else {
            return false;
        };
        let started = instance.dismiss(&mut self.runner, &mut self.ids);
        self.events.extend(instance.drain_events());
        started
    }

    /// Route a tap on the overlay of `tag`.
    ///
    /// A dismissing tap during the entrance is held and replayed by
    /// [`Presenter::pump`] once the popover is visible.
    pub fn overlay_tapped(&mut self, tag: Tag) -> TapOutcome {
        let outcome = self
            .instances
            .get(&tag)
            .map_or(TapOutcome::PassThrough, |(_, instance)| instance.tap());
        if outcome == TapOutcome::Dismiss && !self.dismiss(tag) {
            if let Some((_, instance)) = self.instances.get_mut(&tag) {
                instance.defer_dismiss();
            }
        }
        outcome
    }

    /// Whether `point` (host coordinates) lands on the popover in `tag`.
    pub fn hit_test(&self, tag: Tag, point: Point) -> bool {
        self.instances
            .get(&tag)
            .is_some_and(|(_, instance)| instance.hit_test(point))
    }

    /// Apply runner progress and completions, advancing every lifecycle.
    pub fn pump(&mut self) {
        let Some(host) = self.host.as_mut() else {
            return;
        };

        for sample in self.runner.progress() {
            if let Some((_, instance)) = self
                .instances
                .values_mut()
                .find(|(_, instance)| instance.owns(sample.id))
            {
                instance.apply_sample(sample.target, sample.value, host);
            }
        }

        for id in self.runner.drain_completed() {
            let owner = self
                .instances
                .values_mut()
                .find(|(_, instance)| instance.owns(id));
            match owner {
                Some((_, instance)) => {
                    instance.on_animation_complete(id, host);
                    if instance.take_deferred_dismiss() {
                        instance.dismiss(&mut self.runner, &mut self.ids);
                    }
                    self.events.extend(instance.drain_events());
                }
                None => tracing::trace!(id = id.0, "completion for a released popover"),
            }
        }

        self.instances
            .retain(|_, (_, instance)| instance.phase() != Phase::Detached);
    }

    /// Phase of the popover in `tag`, if any.
    pub fn phase(&self, tag: Tag) -> Option<Phase> {
        self.instances.get(&tag).map(|(_, instance)| instance.phase())
    }

    /// Whether `tag` holds a popover that has not finished dismissing.
    pub fn is_occupied(&self, tag: Tag) -> bool {
        self.instances.contains_key(&tag)
    }

    pub fn instance(&self, tag: Tag) -> Option<&PopoverInstance> {
        self.instances.get(&tag).map(|(_, instance)| instance)
    }

    /// Id of the popover in `tag`.
    pub fn popover_id(&self, tag: Tag) -> Option<PopoverId> {
        self.instances.get(&tag).map(|(id, _)| *id)
    }

    /// Number of popovers currently attached.
    pub fn active(&self) -> usize {
        self.instances.len()
    }

    /// Take queued lifecycle events, oldest first.
    pub fn drain_events(&mut self) -> Vec<PopoverEvent> {
        std::mem::take(&mut self.events)
    }
}
