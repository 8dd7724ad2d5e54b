//! Table-driven Q12 sine and cosine.
//!
//! The table is built once from a quarter wave and mirrored, so
//! `isin(-a) == -isin(a)` and `icos(-a) == icos(a)` hold exactly.

use std::sync::OnceLock;

use crate::fixed::{FULL_TURN, ONE, wrap_angle};

const QUARTER: usize = (FULL_TURN / 4) as usize;

static SIN_TABLE: OnceLock<Box<[i32]>> = OnceLock::new();

fn table() -> &'static [i32] {
    SIN_TABLE.get_or_init(|| {
        let mut quarter = [0_i32; QUARTER + 1];
        for (i, slot) in quarter.iter_mut().enumerate() {
            let radians = i as f64 * std::f64::consts::TAU / f64::from(FULL_TURN);
            *slot = (radians.sin() * f64::from(ONE)).round() as i32;
        }
        quarter[0] = 0;
        quarter[QUARTER] = ONE;

        let mut full = vec![0_i32; FULL_TURN as usize];
        for (i, slot) in full.iter_mut().enumerate() {
            let q = i / QUARTER;
            let r = i % QUARTER;
            *slot = match q {
                0 => quarter[r],
                1 => quarter[QUARTER - r],
                2 => -quarter[r],
                _ => -quarter[QUARTER - r],
            };
        }
        full.into_boxed_slice()
    })
}

/// Q12 sine of an angle in 4096-per-turn units.
#[inline]
pub fn isin(angle: i32) -> i32 {
    table()[wrap_angle(angle) as usize]
}

/// Q12 cosine of an angle in 4096-per-turn units.
#[inline]
pub fn icos(angle: i32) -> i32 {
    isin(angle.wrapping_add(FULL_TURN / 4))
}
