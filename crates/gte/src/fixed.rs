//! Q12 fixed-point helpers.

use glam::IVec3;

/// Number of fractional bits in a Q12 value.
pub const FIXED_SHIFT: u32 = 12;

/// 1.0 in Q12.
pub const ONE: i32 = 1 << FIXED_SHIFT;

/// Angle units per full turn (360 degrees).
pub const FULL_TURN: i32 = 4096;

/// Q12 to grid space. Arithmetic shift, so negative values floor toward
/// negative infinity instead of rounding.
#[inline]
pub const fn to_grid(value: i32) -> i32 {
    value >> FIXED_SHIFT
}

/// Grid space to Q12.
#[inline]
pub const fn from_grid(value: i32) -> i32 {
    value * ONE
}

/// Component-wise [`to_grid`].
#[inline]
pub fn grid_vec(v: IVec3) -> IVec3 {
    IVec3::new(to_grid(v.x), to_grid(v.y), to_grid(v.z))
}

/// Component-wise [`from_grid`].
#[inline]
pub fn fixed_vec(v: IVec3) -> IVec3 {
    IVec3::new(from_grid(v.x), from_grid(v.y), from_grid(v.z))
}

/// Q12 multiply with a 64-bit intermediate.
#[inline]
pub const fn fixed_mul(a: i32, b: i32) -> i32 {
    ((a as i64 * b as i64) >> FIXED_SHIFT) as i32
}

/// Wrap an angle into `0..FULL_TURN`.
#[inline]
pub const fn wrap_angle(angle: i32) -> i32 {
    angle & (FULL_TURN - 1)
}

/// Length of the X/Z projection of `v`, in the same units as `v`.
pub fn horizontal_length(v: IVec3) -> i32 {
    let x = i64::from(v.x).unsigned_abs();
    let z = i64::from(v.z).unsigned_abs();
    let squared = x * x + z * z;
    i32::try_from(squared.isqrt()).unwrap_or(i32::MAX)
}
