/// The four-slot image store
///
/// Holds exactly four optional images, the display mode, the slot the next
/// capture/pick writes into, and the list of camera shots taken in Quad
/// mode. Every mutation is announced to subscribers so the view layer can
/// re-render.

use serde::{Deserialize, Serialize};

use super::data::{ImageHandle, Mode, SLOT_COUNT};
use crate::error::SlotError;

/// What changed in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    SlotChanged(usize),
    ActiveSlotChanged(usize),
    ModeChanged(Mode),
    /// A camera shot was appended; carries the new log length
    QuadCaptureLogged(usize),
}

/// Handle returned by `subscribe`, used to unsubscribe
pub type SubscriptionId = u64;

type Subscriber = Box<dyn FnMut(&StoreEvent) + Send>;

/// Where the active slot points when Quad mode is entered
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuadEntryPolicy {
    /// Always start at slot 0
    #[default]
    Reset,
    /// Go back to the slot that was active when Quad mode was last left
    Retain,
}

pub struct ImageSlotStore {
    slots: [Option<ImageHandle>; SLOT_COUNT],
    mode: Mode,
    active: usize,
    /// Active slot remembered across Single mode, for `QuadEntryPolicy::Retain`
    last_quad_active: usize,
    quad_entry: QuadEntryPolicy,
    quad_captures: Vec<ImageHandle>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: SubscriptionId,
}

impl Default for ImageSlotStore {
    fn default() -> Self {
        Self::new(QuadEntryPolicy::default())
    }
}

/// Validate a slot index
pub fn check_index(index: usize) -> Result<usize, SlotError> {
    if index < SLOT_COUNT {
        Ok(index)
    } else {
        Err(SlotError::IndexOutOfRange { index })
    }
}

impl ImageSlotStore {
    /// Empty store in Single mode with slot 0 active
    pub fn new(quad_entry: QuadEntryPolicy) -> Self {
        Self {
            slots: Default::default(),
            mode: Mode::Single,
            active: 0,
            last_quad_active: 0,
            quad_entry,
            quad_captures: Vec::new(),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Overwrite a slot. The previous image (if any) is dropped, not blended.
    pub fn set_slot_image(&mut self, index: usize, image: ImageHandle) -> Result<(), SlotError> {
        let index = check_index(index)?;
        self.slots[index] = Some(image);
        self.notify(StoreEvent::SlotChanged(index));
        Ok(())
    }

    /// Image in a slot. Out-of-range indices read as empty.
    pub fn slot_image(&self, index: usize) -> Option<&ImageHandle> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Snapshot of all four slots
    pub fn slots(&self) -> [Option<ImageHandle>; SLOT_COUNT] {
        self.slots.clone()
    }

    /// Indices of slots that currently hold an image
    pub fn populated(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| i))
    }

    pub fn active_slot_index(&self) -> usize {
        self.active
    }

    /// Choose the slot targeted by the next capture/pick.
    ///
    /// The index is validated in every mode. In Single mode the call then
    /// does nothing: the active slot stays pinned to 0.
    pub fn set_active_slot_index(&mut self, index: usize) -> Result<(), SlotError> {
        let index = check_index(index)?;
        if self.mode == Mode::Single {
            log::debug!("ignoring active slot {index} outside Quad mode");
            return Ok(());
        }
        self.last_quad_active = index;
        self.set_active(index);
        Ok(())
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch between Single and Quad mode.
    ///
    /// Slots are never cleared. Leaving Quad pins the active slot to 0;
    /// entering Quad applies the configured `QuadEntryPolicy`.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.notify(StoreEvent::ModeChanged(mode));

        let target = match (mode, self.quad_entry) {
            (Mode::Single, _) => 0,
            (Mode::Quad, QuadEntryPolicy::Reset) => 0,
            (Mode::Quad, QuadEntryPolicy::Retain) => self.last_quad_active,
        };
        self.set_active(target);
    }

    /// Append a camera shot taken in Quad mode
    pub fn log_quad_capture(&mut self, image: ImageHandle) {
        self.quad_captures.push(image);
        let len = self.quad_captures.len();
        self.notify(StoreEvent::QuadCaptureLogged(len));
    }

    /// Camera shots taken in Quad mode, oldest first
    pub fn quad_captures(&self) -> &[ImageHandle] {
        &self.quad_captures
    }

    /// Register a callback run after every mutation
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + Send + 'static,
    {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    fn set_active(&mut self, index: usize) {
        if self.active != index {
            self.active = index;
            self.notify(StoreEvent::ActiveSlotChanged(index));
        }
    }

    fn notify(&mut self, event: StoreEvent) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&event);
        }
    }
}

impl std::fmt::Debug for ImageSlotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filled: Vec<bool> = self.slots.iter().map(Option::is_some).collect();
        f.debug_struct("ImageSlotStore")
            .field("slots", &filled)
            .field("mode", &self.mode)
            .field("active", &self.active)
            .field("quad_captures", &self.quad_captures.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
