/// Editing session
///
/// Owns the slot store, the global filter settings, the controller and the
/// filter engine, and exposes one method per user/capability event. The
/// view layer only talks to the session.

use super::controller::{FilterApplicationController, FilterEvent, RecomputeReport};
use super::data::{ImageHandle, Mode, SourceKind};
use super::settings::{FilterKind, FilterSettings};
use super::slots::{ImageSlotStore, QuadEntryPolicy};
use crate::compose::{compose, CanvasSize};
use crate::config::AppConfig;
use crate::error::SlotError;
use crate::filter::{BuiltinEngine, FilterEngine};

pub struct Session {
    store: ImageSlotStore,
    settings: FilterSettings,
    controller: FilterApplicationController,
    engine: Box<dyn FilterEngine + Send>,
    canvas: CanvasSize,
}

impl Session {
    pub fn new(
        settings: FilterSettings,
        quad_entry: QuadEntryPolicy,
        engine: Box<dyn FilterEngine + Send>,
    ) -> Self {
        Self {
            store: ImageSlotStore::new(quad_entry),
            settings,
            controller: FilterApplicationController::default(),
            engine,
            canvas: CanvasSize::default(),
        }
    }

    /// Session with the built-in engine and the configured defaults
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.filter_settings(),
            config.quad_entry_policy,
            Box::new(BuiltinEngine::new()),
        )
    }

    /// Replace the recompute trigger table
    pub fn with_controller(mut self, controller: FilterApplicationController) -> Self {
        self.controller = controller;
        self
    }

    pub fn store(&self) -> &ImageSlotStore {
        &self.store
    }

    /// Mutable store access, for subscribing
    pub fn store_mut(&mut self) -> &mut ImageSlotStore {
        &mut self.store
    }

    pub fn settings(&self) -> &FilterSettings {
        &self.settings
    }

    pub fn mode(&self) -> Mode {
        self.store.mode()
    }

    /// Slot the next capture/pick writes into
    pub fn target_slot(&self) -> usize {
        self.store.active_slot_index()
    }

    /// User picked a filter
    pub fn set_filter_kind(&mut self, kind: FilterKind) -> Option<RecomputeReport> {
        if !self.settings.set_kind(kind) {
            return None;
        }
        self.dispatch(FilterEvent::KindChanged)
    }

    /// User moved the intensity slider
    pub fn set_intensity(&mut self, intensity: f32) -> Option<RecomputeReport> {
        if !self.settings.set_intensity(intensity) {
            return None;
        }
        self.dispatch(FilterEvent::IntensityChanged)
    }

    /// User flipped the Quad Mode toggle
    pub fn set_mode(&mut self, mode: Mode) {
        self.store.set_mode(mode);
    }

    /// User chose which slot the next pick fills (no-op outside Quad mode)
    pub fn select_slot(&mut self, index: usize) -> Result<(), SlotError> {
        self.store.set_active_slot_index(index)
    }

    /// A capture/pick delivered an image for `target`.
    ///
    /// Camera shots taken in Quad mode are also appended to the quad
    /// capture log. Whether the delivery triggers a recompute depends on
    /// the controller's slot trigger table.
    pub fn deliver(
        &mut self,
        target: usize,
        source: SourceKind,
        image: ImageHandle,
    ) -> Result<Option<RecomputeReport>, SlotError> {
        if source == SourceKind::Camera && self.mode().is_quad() {
            self.store.set_slot_image(target, image.clone())?;
            self.store.log_quad_capture(image);
        } else {
            self.store.set_slot_image(target, image)?;
        }
        log::debug!("{source} delivered into slot {target}");

        Ok(self.dispatch(FilterEvent::SlotPopulated(target)))
    }

    /// The 2x2 grid image, built from the current slots
    pub fn composite(&self) -> ImageHandle {
        compose(&self.store.slots(), self.canvas)
    }

    fn dispatch(&mut self, event: FilterEvent) -> Option<RecomputeReport> {
        self.controller
            .handle(event, &mut self.store, &self.settings, self.engine.as_ref())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("store", &self.store)
            .field("settings", &self.settings)
            .field("controller", &self.controller)
            .finish()
    }
}
