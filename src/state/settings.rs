/// Global filter settings
///
/// A single `FilterSettings` value applies to every slot. It is not
/// per-slot: changing it recomputes all populated slots.

use serde::{Deserialize, Serialize};

/// The filters a user can choose from
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Identity
    #[default]
    None,
    /// Sepia tone, strength controlled by intensity
    Sepia,
    /// Fixed monochrome; intensity has no effect
    Mono,
}

impl FilterKind {
    /// All filters, in the order the picker shows them
    pub const ALL: [FilterKind; 3] = [FilterKind::None, FilterKind::Sepia, FilterKind::Mono];

    /// Whether the intensity slider changes this filter's output
    pub fn uses_intensity(self) -> bool {
        matches!(self, FilterKind::Sepia)
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FilterKind::None => "None",
            FilterKind::Sepia => "Sepia",
            FilterKind::Mono => "Mono",
        };
        write!(f, "{label}")
    }
}

/// Intensity the slider starts at
pub const DEFAULT_INTENSITY: f32 = 0.5;

/// Filter kind + intensity
///
/// Intensity is kept inside [0.0, 1.0]. Values outside the range are
/// clamped; NaN and infinities are rejected and leave the settings as they
/// were.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(from = "RawFilterSettings")]
pub struct FilterSettings {
    kind: FilterKind,
    intensity: f32,
}

/// Unchecked wire form; converted through `FilterSettings::new`
#[derive(Deserialize)]
struct RawFilterSettings {
    kind: FilterKind,
    intensity: f32,
}

impl From<RawFilterSettings> for FilterSettings {
    fn from(raw: RawFilterSettings) -> Self {
        Self::new(raw.kind, raw.intensity)
    }
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            kind: FilterKind::None,
            intensity: DEFAULT_INTENSITY,
        }
    }
}

impl FilterSettings {
    /// Create settings, clamping intensity into range
    ///
    /// Non-finite intensity falls back to `DEFAULT_INTENSITY`.
    pub fn new(kind: FilterKind, intensity: f32) -> Self {
        let intensity = if intensity.is_finite() {
            intensity.clamp(0.0, 1.0)
        } else {
            DEFAULT_INTENSITY
        };
        Self { kind, intensity }
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Change the filter kind. Returns true if the value changed.
    pub fn set_kind(&mut self, kind: FilterKind) -> bool {
        let changed = self.kind != kind;
        self.kind = kind;
        changed
    }

    /// Change the intensity. Returns true if the stored value changed.
    pub fn set_intensity(&mut self, intensity: f32) -> bool {
        if !intensity.is_finite() {
            return false;
        }
        let clamped = intensity.clamp(0.0, 1.0);
        let changed = self.intensity != clamped;
        self.intensity = clamped;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = FilterSettings::default();
        assert_eq!(settings.kind(), FilterKind::None);
        assert_eq!(settings.intensity(), 0.5);
    }

    #[test]
    fn test_intensity_is_clamped() {
        let mut settings = FilterSettings::default();
        assert!(settings.set_intensity(3.0));
        assert_eq!(settings.intensity(), 1.0);
        assert!(settings.set_intensity(-1.0));
        assert_eq!(settings.intensity(), 0.0);
    }

    #[test]
    fn test_non_finite_intensity_is_rejected() {
        let mut settings = FilterSettings::new(FilterKind::Sepia, 0.3);
        assert!(!settings.set_intensity(f32::NAN));
        assert!(!settings.set_intensity(f32::INFINITY));
        assert_eq!(settings.intensity(), 0.3);
        assert_eq!(FilterSettings::new(FilterKind::Mono, f32::NAN).intensity(), DEFAULT_INTENSITY);
    }

    #[test]
    fn test_set_kind_reports_change() {
        let mut settings = FilterSettings::default();
        assert!(settings.set_kind(FilterKind::Sepia));
        assert!(!settings.set_kind(FilterKind::Sepia));
        assert_eq!(settings.kind(), FilterKind::Sepia);
    }

    #[test]
    fn test_deserialized_intensity_is_clamped() {
        let high: FilterSettings =
            serde_json::from_str(r#"{"kind":"sepia","intensity":5.0}"#).unwrap();
        assert_eq!(high.kind(), FilterKind::Sepia);
        assert!((0.0..=1.0).contains(&high.intensity()));
        assert_eq!(high.intensity(), 1.0);

        let low: FilterSettings =
            serde_json::from_str(r#"{"kind":"mono","intensity":-2.5}"#).unwrap();
        assert_eq!(low.intensity(), 0.0);
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&FilterKind::Mono).unwrap();
        assert_eq!(json, "\"mono\"");
        assert!(FilterKind::Sepia.uses_intensity());
        assert!(!FilterKind::Mono.uses_intensity());
    }
}
