//! Character darkness hashing and gray-level color encoding.

use palette::Srgb;

/// Darkness used for empty text.
pub const DEFAULT_DARKNESS: f64 = 0.6;

/// Width of the darkness range above [`DEFAULT_DARKNESS`].
const DARKNESS_RANGE: f64 = 0.4;

/// Maps a UTF-16 code unit to a darkness in `[0.6, 1.0]`.
///
/// The unit is scattered by a multiply-mod hash so neighbouring characters
/// land far apart. `None` (no character to sample) yields the default.
pub fn darkness_for_unit(unit: Option<u16>) -> f64 {
    let Some(code) = unit else {
        return DEFAULT_DARKNESS;
    };

    let hash = (u32::from(code) * 37) % 51;
    let normalized = f64::from(hash) / 50.0;
    DEFAULT_DARKNESS + normalized * DARKNESS_RANGE
}

/// Encodes a darkness as a lowercase gray hex color.
///
/// Darkness is clamped to `[0, 1]`; 1.0 is `#000000`, 0.0 is `#ffffff`.
pub fn darkness_to_hex(darkness: f64) -> String {
    let d = darkness.clamp(0.0, 1.0);
    let level = (255.0 * (1.0 - d)).round() as u8;
    let gray: Srgb<u8> = Srgb::new(level, level, level);
    format!("#{gray:x}")
}
