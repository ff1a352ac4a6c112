//! Pattern generation: text and a seed in, 86 gray dots out.
//!
//! # Algorithm
//!
//! 1. A seeded [`Mulberry32`] drives a Fisher-Yates shuffle of `0..86`,
//!    producing the *spatial map*.
//! 2. Dots are laid out on six concentric rings holding
//!    `[1, 6, 12, 18, 24, 25]` dots. Ring/angle order is the draw order.
//! 3. The dot at draw position `i` samples the text at `spatial_map[i]`
//!    (wrapping), and hashes that UTF-16 code unit to a darkness.
//!
//! Generation is total: empty text, zero or negative radii and any seed
//! all produce a valid list of exactly [`DOT_COUNT`] dots.

pub mod color;
pub mod prng;

pub use color::{DEFAULT_DARKNESS, darkness_for_unit, darkness_to_hex};
pub use prng::{Mulberry32, coerce_seed, seeded_permutation};

use std::f64::consts::PI;

use crate::dot::Dot;

/// Number of dots in every pattern.
pub const DOT_COUNT: usize = 86;

/// Dots per ring, from the center outwards.
pub const RING_COUNTS: [usize; 6] = [1, 6, 12, 18, 24, 25];

/// Index of the outermost ring; its radius equals the radius scale.
const OUTER_RING: f64 = 5.0;

/// Yields the center of every ring slot in draw order.
///
/// Ring `k` sits at `k * radius_scale / 5`. The first slot of each ring is
/// at the top, and odd rings are rotated by half a slot.
pub fn ring_slots(radius_scale: f64) -> impl Iterator<Item = (f64, f64)> {
    let step = radius_scale / OUTER_RING;

    RING_COUNTS
        .into_iter()
        .enumerate()
        .flat_map(move |(ring, count)| {
            let r = ring as f64 * step;
            (0..count).map(move |i| {
                if ring == 0 {
                    return (0.0, 0.0);
                }

                let mut theta = (i as f64 / count as f64) * 2.0 * PI;
                theta -= PI / 2.0;
                if ring % 2 != 0 {
                    theta += PI / count as f64;
                }

                (r * theta.cos(), r * theta.sin())
            })
        })
}

/// Generates the dot pattern for `text`.
///
/// * `dot_radius` - radius shared by every dot
/// * `radius_scale` - radius of the outer ring
/// * `seed` - permutation seed, see [`coerce_seed`] for wider integers
///
/// Identical arguments always produce an identical list.
pub fn generate(text: &str, dot_radius: f64, radius_scale: f64, seed: u32) -> Vec<Dot> {
    let units: Vec<u16> = text.encode_utf16().collect();
    let spatial_map = seeded_permutation(DOT_COUNT, seed);

    ring_slots(radius_scale)
        .zip(spatial_map)
        .enumerate()
        .map(|(index, ((x, y), mapped))| {
            let unit = if units.is_empty() {
                None
            } else {
                Some(units[mapped % units.len()])
            };
            let value = darkness_for_unit(unit);

            Dot {
                index,
                x,
                y,
                r: dot_radius,
                value,
                color: darkness_to_hex(value),
            }
        })
        .collect()
}
