/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - Global filter settings (settings.rs)
/// - The four-slot image store with subscribe/notify (slots.rs)
/// - Filter recompute on settings/slot events (controller.rs)
/// - The session the UI drives (session.rs)
/// - The timestamp record database (records.rs)

pub mod data;
pub mod settings;
pub mod slots;
pub mod controller;
pub mod session;
pub mod records;
