/// Filter application controller
///
/// Recomputes the displayed image of every populated slot when the filter
/// settings change, or when a slot listed in the trigger table receives a
/// new image.
///
/// Filtering is destructive: each slot is overwritten with the filtered
/// result, and the next recompute filters that result again. Moving the
/// intensity slider twice therefore compounds the effect. This is the
/// app's long-standing behavior and is kept as is.

use super::data::SLOT_COUNT;
use super::settings::FilterSettings;
use super::slots::ImageSlotStore;
use crate::error::FilterError;
use crate::filter::FilterEngine;

/// Things that may cause a recompute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterEvent {
    KindChanged,
    IntensityChanged,
    /// A capture/pick wrote into this slot
    SlotPopulated(usize),
}

/// Slots whose population triggers a recompute. Only slot 0 does; images
/// delivered to slots 1-3 are filtered on the next global trigger.
pub const DEFAULT_SLOT_TRIGGERS: [bool; SLOT_COUNT] = [true, false, false, false];

/// Outcome of one recompute pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecomputeReport {
    /// Slots overwritten with a filtered image
    pub updated: Vec<usize>,
    /// Slots left untouched because the engine failed
    pub failed: Vec<(usize, FilterError)>,
}

impl RecomputeReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct FilterApplicationController {
    slot_triggers: [bool; SLOT_COUNT],
}

impl Default for FilterApplicationController {
    fn default() -> Self {
        Self::new(DEFAULT_SLOT_TRIGGERS)
    }
}

impl FilterApplicationController {
    pub fn new(slot_triggers: [bool; SLOT_COUNT]) -> Self {
        Self { slot_triggers }
    }

    /// Whether `event` should start a recompute
    pub fn triggers(&self, event: FilterEvent) -> bool {
        match event {
            FilterEvent::KindChanged | FilterEvent::IntensityChanged => true,
            FilterEvent::SlotPopulated(index) => {
                self.slot_triggers.get(index).copied().unwrap_or(false)
            }
        }
    }

    /// React to an event; returns the report if a recompute ran
    pub fn handle(
        &self,
        event: FilterEvent,
        store: &mut ImageSlotStore,
        settings: &FilterSettings,
        engine: &dyn FilterEngine,
    ) -> Option<RecomputeReport> {
        if !self.triggers(event) {
            log::debug!("{event:?} does not trigger a recompute");
            return None;
        }
        Some(self.recompute(store, settings, engine))
    }

    /// Filter every populated slot in place with the current settings.
    ///
    /// A failing slot keeps its previous image; the other slots are still
    /// processed.
    pub fn recompute(
        &self,
        store: &mut ImageSlotStore,
        settings: &FilterSettings,
        engine: &dyn FilterEngine,
    ) -> RecomputeReport {
        let mut report = RecomputeReport::default();

        let populated: Vec<usize> = store.populated().collect();
        for index in populated {
            let Some(current) = store.slot_image(index).cloned() else {
                continue;
            };

            match engine.apply(&current, settings.kind(), settings.intensity()) {
                Ok(filtered) => match store.set_slot_image(index, filtered) {
                    Ok(()) => report.updated.push(index),
                    Err(err) => log::error!("could not write slot {index}: {err}"),
                },
                Err(err) => {
                    log::warn!("⚠️  {} filter failed on slot {index}: {err}", settings.kind());
                    report.failed.push((index, err));
                }
            }
        }

        log::debug!(
            "recomputed {} slot(s) with {} @ {:.2}, {} failed",
            report.updated.len(),
            settings.kind(),
            settings.intensity(),
            report.failed.len()
        );
        report
    }
}
