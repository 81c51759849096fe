//! FourSplit: pick or capture up to four photos, run a sepia or mono filter
//! over them, and tile them into a 2x2 grid.

pub mod capture;
pub mod compose;
pub mod config;
pub mod error;
pub mod filter;
pub mod state;

pub use compose::{compose, CanvasSize};
pub use config::AppConfig;
pub use error::{CaptureError, ConfigError, FilterError, RecordError, SlotError};
pub use filter::{BuiltinEngine, FilterEngine};
pub use state::data::{ImageHandle, Mode, SourceKind, SLOT_COUNT};
pub use state::session::Session;
pub use state::settings::{FilterKind, FilterSettings};
