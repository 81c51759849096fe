/// Image filter module
///
/// This module handles:
/// - The `FilterEngine` contract the controller calls per slot
/// - The built-in engine that runs the filters on the CPU
///
/// Engines never mutate their input; they return a new image or an error.
/// The caller decides what happens to the slot on failure.

pub mod builtin;

pub use builtin::BuiltinEngine;

use crate::error::FilterError;
use crate::state::data::ImageHandle;
use crate::state::settings::FilterKind;

/// Applies one filter to one image
pub trait FilterEngine {
    /// Run `kind` at `intensity` (expected in [0, 1]) over `image`.
    ///
    /// - `None` must return the input unchanged, whatever the intensity.
    /// - `Sepia` must be monotonic in intensity, with 0 close to identity.
    /// - `Mono` ignores intensity.
    fn apply(
        &self,
        image: &ImageHandle,
        kind: FilterKind,
        intensity: f32,
    ) -> Result<ImageHandle, FilterError>;
}
