//! Serializable generator configuration.
//!
//! A [`GeneratorConfig`] is the caller-owned tuple that drives generation
//! and export framing. It round-trips through JSON so a configuration can be
//! copied out of one session and pasted into another.
//!
//! # Example
//!
//! ```
//! use eightsix_renderer::GeneratorConfig;
//!
//! let mut config = GeneratorConfig::default();
//! let changes = config.apply_json(r#"{ "text": "86", "padding": 5 }"#).unwrap();
//!
//! assert!(changes.geometry);
//! assert_eq!(config.text, "86");
//! assert_eq!(config.padding, 5.0);
//!
//! // Malformed input is rejected and leaves the config alone.
//! assert!(config.apply_json("{ text: ").is_err());
//! assert_eq!(config.text, "86");
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dot::{Dot, Viewport};
use crate::error::ConfigError;
use crate::pattern::{self, coerce_seed};

/// Longest text accepted by [`GeneratorConfig::sanitized`], in UTF-16 units.
pub const MAX_TEXT_UNITS: usize = 250;

/// Slider range of `dotSize` (radius in thousandths).
pub const DOT_SIZE_RANGE: (f64, f64) = (20.0, 80.0);

/// Slider range of `spread` (outer ring radius).
pub const SPREAD_RANGE: (f64, f64) = (0.5, 1.2);

/// Slider range of `padding` (border percentage).
pub const PADDING_RANGE: (f64, f64) = (0.0, 100.0);

/// Exclusive upper bound of seeds picked by [`GeneratorConfig::randomize_seed`].
pub const RANDOM_SEED_LIMIT: i64 = 100_000;

// ============================================================================
// GeneratorConfig
// ============================================================================

/// Parameters of one pattern.
///
/// # JSON Format
///
/// ```json
/// {
///   "text": "Hello",
///   "dotSize": 45,
///   "spread": 0.85,
///   "padding": 20,
///   "seed": 12345
/// }
/// ```
///
/// Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    /// Text to encode.
    pub text: String,

    /// Dot radius in thousandths of a unit (20-80).
    pub dot_size: f64,

    /// Radius of the outer ring (0.5-1.2).
    pub spread: f64,

    /// Export border as a percentage of the unit radius (0-100).
    ///
    /// Only affects framing, never the dots themselves.
    pub padding: f64,

    /// Permutation seed. Wrapped modulo 2^32 before use.
    pub seed: i64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            dot_size: 45.0,
            spread: 0.85,
            padding: 20.0,
            seed: 12345,
        }
    }
}

impl GeneratorConfig {
    /// Creates a config with default parameters for the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_dot_size(mut self, dot_size: f64) -> Self {
        self.dot_size = dot_size;
        self
    }

    pub fn with_spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = seed;
        self
    }

    /// Dot radius in generator units (`dot_size / 1000`).
    pub fn dot_radius(&self) -> f64 {
        self.dot_size / 1000.0
    }

    /// The framing every renderer and exporter must use.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.spread, self.dot_radius(), self.padding)
    }

    /// Generates the dot pattern for this config.
    pub fn generate(&self) -> Vec<Dot> {
        pattern::generate(
            &self.text,
            self.dot_radius(),
            self.spread,
            coerce_seed(self.seed),
        )
    }

    /// Returns true if `other` would generate different dots.
    ///
    /// Padding is ignored: it only changes export framing.
    pub fn geometry_differs_from(&self, other: &Self) -> bool {
        self.text != other.text
            || self.dot_size != other.dot_size
            || self.spread != other.spread
            || coerce_seed(self.seed) != coerce_seed(other.seed)
    }

    /// Returns a copy clamped to the interactive ranges.
    ///
    /// Text is cut to [`MAX_TEXT_UNITS`] UTF-16 units without splitting a
    /// character. Non-finite numbers fall back to their defaults.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let clamp = |value: f64, (min, max): (f64, f64), fallback: f64| {
            if value.is_finite() {
                value.clamp(min, max)
            } else {
                fallback
            }
        };

        Self {
            text: truncate_utf16(&self.text, MAX_TEXT_UNITS).to_string(),
            dot_size: clamp(self.dot_size, DOT_SIZE_RANGE, defaults.dot_size),
            spread: clamp(self.spread, SPREAD_RANGE, defaults.spread),
            padding: clamp(self.padding, PADDING_RANGE, defaults.padding),
            seed: self.seed,
        }
    }

    /// Picks a fresh seed in `0..100_000`.
    pub fn randomize_seed<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.seed = rng.gen_range(0..RANDOM_SEED_LIMIT);
    }

    /// Serializes the config to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the config to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a complete config, strictly typed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Merges a JSON document into this config.
    ///
    /// Recognized keys with the right JSON type replace the current value;
    /// everything else is ignored. On error nothing is modified.
    pub fn apply_json(&mut self, json: &str) -> Result<ConfigChanges, ConfigError> {
        let value: Value = serde_json::from_str(json)?;
        let patch = ConfigPatch::from_value(&value)?;
        Ok(self.apply_patch(patch))
    }

    /// Applies a parsed patch and reports what changed.
    pub fn apply_patch(&mut self, patch: ConfigPatch) -> ConfigChanges {
        let before = self.clone();

        if let Some(text) = patch.text {
            self.text = text;
        }
        if let Some(dot_size) = patch.dot_size {
            self.dot_size = dot_size;
        }
        if let Some(spread) = patch.spread {
            self.spread = spread;
        }
        if let Some(padding) = patch.padding {
            self.padding = padding;
        }
        if let Some(seed) = patch.seed {
            self.seed = seed;
        }

        ConfigChanges {
            geometry: before.geometry_differs_from(self),
            framing: before.padding != self.padding,
        }
    }
}

/// Returns the longest prefix of `text` that fits in `max_units` UTF-16 units.
fn truncate_utf16(text: &str, max_units: usize) -> &str {
    let mut units = 0;
    for (offset, ch) in text.char_indices() {
        units += ch.len_utf16();
        if units > max_units {
            return &text[..offset];
        }
    }
    text
}

// ============================================================================
// ConfigPatch
// ============================================================================

/// A partial config read leniently from JSON.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigPatch {
    pub text: Option<String>,
    pub dot_size: Option<f64>,
    pub spread: Option<f64>,
    pub padding: Option<f64>,
    pub seed: Option<i64>,
}

impl ConfigPatch {
    /// Extracts the recognized keys from a JSON value.
    ///
    /// `null` is rejected. Other non-object values carry no keys and yield
    /// an empty patch.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let object = match value {
            Value::Null => return Err(ConfigError::NotAnObject),
            Value::Object(object) => object,
            _ => return Ok(Self::default()),
        };

        let number = |key: &str| object.get(key).and_then(Value::as_f64);

        Ok(Self {
            text: object.get("text").and_then(Value::as_str).map(str::to_string),
            dot_size: number("dotSize"),
            spread: number("spread"),
            padding: number("padding"),
            seed: object.get("seed").and_then(seed_from_value),
        })
    }

    /// Returns true if the patch sets nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// 2^32, the period of the permutation seed.
const SEED_MODULUS: f64 = 4_294_967_296.0;

/// Reads a seed, flooring fractional values.
///
/// Numbers that do not fit an `i64` are reduced modulo 2^32 first, so the
/// stored seed stays congruent to the one in the document.
fn seed_from_value(value: &Value) -> Option<i64> {
    if let Some(seed) = value.as_i64() {
        return Some(seed);
    }
    if let Some(seed) = value.as_u64() {
        return Some(i64::from(seed as u32));
    }

    value.as_f64().map(|seed| {
        let seed = seed.floor();
        if seed >= i64::MIN as f64 && seed < i64::MAX as f64 {
            seed as i64
        } else {
            seed.rem_euclid(SEED_MODULUS) as i64
        }
    })
}

/// What a config update touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigChanges {
    /// The dot list must be regenerated.
    pub geometry: bool,
    /// Only the export framing changed.
    pub framing: bool,
}

impl ConfigChanges {
    pub fn any(&self) -> bool {
        self.geometry || self.framing
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn config_serialization_roundtrip() {
        let config = GeneratorConfig::new("Biohybrid")
            .with_dot_size(60.0)
            .with_spread(1.1)
            .with_padding(0.0)
            .with_seed(-42);

        let json = config.to_json().unwrap();
        let restored = GeneratorConfig::from_json(&json).unwrap();

        assert_eq!(restored, config);
    }

    #[test]
    fn config_json_format() {
        let json = GeneratorConfig::default().to_json_pretty().unwrap();

        assert!(json.contains("\"text\""));
        assert!(json.contains("\"dotSize\""));
        assert!(json.contains("\"spread\""));
        assert!(json.contains("\"padding\""));
        assert!(json.contains("\"seed\": 12345"));
    }

    #[test]
    fn empty_config_deserializes() {
        let config = GeneratorConfig::from_json("{}").unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn partial_import_keeps_prior_values() {
        let mut config = GeneratorConfig::new("keep").with_seed(7);
        let changes = config.apply_json(r#"{ "spread": 1.0 }"#).unwrap();

        assert!(changes.geometry);
        assert!(!changes.framing);
        assert_eq!(config.text, "keep");
        assert_eq!(config.seed, 7);
        assert_eq!(config.spread, 1.0);
    }

    #[test]
    fn wrong_types_and_unknown_keys_are_ignored() {
        let mut config = GeneratorConfig::default();
        let changes = config
            .apply_json(r#"{ "text": 5, "dotSize": "big", "zoom": 2, "seed": null }"#)
            .unwrap();

        assert!(!changes.any());
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn malformed_json_leaves_config_untouched() {
        let mut config = GeneratorConfig::new("before");
        let err = config.apply_json(r#"{ "text": "after""#).unwrap_err();

        assert!(matches!(err, ConfigError::Json(_)));
        assert_eq!(config.text, "before");
    }

    #[test]
    fn null_is_rejected() {
        let mut config = GeneratorConfig::default();
        assert!(matches!(
            config.apply_json("null"),
            Err(ConfigError::NotAnObject)
        ));
    }

    #[test]
    fn scalar_json_changes_nothing() {
        let mut config = GeneratorConfig::default();
        let changes = config.apply_json("42").unwrap();
        assert!(!changes.any());
    }

    #[test]
    fn padding_only_changes_framing() {
        let mut config = GeneratorConfig::default();
        let changes = config.apply_json(r#"{ "padding": 50 }"#).unwrap();

        assert!(!changes.geometry);
        assert!(changes.framing);
    }

    #[test]
    fn fractional_seed_is_floored() {
        let mut config = GeneratorConfig::default();
        config.apply_json(r#"{ "seed": 12.9 }"#).unwrap();
        assert_eq!(config.seed, 12);

        config.apply_json(r#"{ "seed": -1.5 }"#).unwrap();
        assert_eq!(config.seed, -2);
    }

    #[test]
    fn oversized_seed_wraps_instead_of_saturating() {
        let mut config = GeneratorConfig::default();

        // 2^63 is one past i64::MAX and congruent to 0.
        config.apply_json(r#"{ "seed": 9223372036854775808 }"#).unwrap();
        assert_eq!(coerce_seed(config.seed), 0);
        assert_eq!(config.generate(), GeneratorConfig::default().with_seed(0).generate());

        config.apply_json(r#"{ "seed": 18446744073709551615 }"#).unwrap();
        assert_eq!(coerce_seed(config.seed), u32::MAX);

        config.apply_json(r#"{ "seed": 1e20 }"#).unwrap();
        assert_eq!(coerce_seed(config.seed), 1_661_992_960);

        config.apply_json(r#"{ "seed": -1e20 }"#).unwrap();
        assert_eq!(coerce_seed(config.seed), 2_632_974_336);
    }

    #[test]
    fn scalar_json_is_an_empty_patch() {
        let patch = ConfigPatch::from_value(&serde_json::json!(42)).unwrap();
        assert!(patch.is_empty());

        let patch = ConfigPatch::from_value(&serde_json::json!({ "seed": 3 })).unwrap();
        assert!(!patch.is_empty());
        assert_eq!(patch.seed, Some(3));
    }

    #[test]
    fn congruent_seed_is_not_a_geometry_change() {
        let a = GeneratorConfig::default().with_seed(-1);
        let b = GeneratorConfig::default().with_seed(4_294_967_295);
        assert!(!a.geometry_differs_from(&b));
        assert_eq!(a.generate(), b.generate());
    }

    #[test]
    fn sanitize_clamps_ranges() {
        let config = GeneratorConfig::new("x".repeat(300))
            .with_dot_size(500.0)
            .with_spread(f64::NAN)
            .with_padding(-5.0);

        let clean = config.sanitized();
        assert_eq!(clean.text.len(), MAX_TEXT_UNITS);
        assert_eq!(clean.dot_size, 80.0);
        assert_eq!(clean.spread, 0.85);
        assert_eq!(clean.padding, 0.0);
    }

    #[test]
    fn sanitize_keeps_surrogate_pairs_whole() {
        let text = format!("{}😀", "a".repeat(MAX_TEXT_UNITS - 1));
        let clean = GeneratorConfig::new(text).sanitized();

        assert_eq!(clean.text.encode_utf16().count(), MAX_TEXT_UNITS - 1);
        assert!(clean.text.chars().all(|c| c == 'a'));
    }

    #[test]
    fn randomized_seed_in_range() {
        let mut rng = StdRng::seed_from_u64(86);
        let mut config = GeneratorConfig::default();
        for _ in 0..100 {
            config.randomize_seed(&mut rng);
            assert!((0..RANDOM_SEED_LIMIT).contains(&config.seed));
        }
    }

    #[test]
    fn viewport_follows_config() {
        let config = GeneratorConfig::default()
            .with_spread(1.0)
            .with_dot_size(50.0)
            .with_padding(10.0);
        let expected = 1.0 + 50.0 / 1000.0 + 10.0 / 100.0;
        assert_eq!(config.viewport().total_radius, expected);
    }
}
