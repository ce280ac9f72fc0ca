//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert a collection length to u32, saturating at `u32::MAX`.
#[must_use]
pub fn len_to_u32(value: usize) -> u32 {
    cast::<usize, u32>(value).unwrap_or(u32::MAX)
}

/// Integer mean of the given values, rounding toward zero. Returns 0 for an empty slice.
#[must_use]
pub fn mean_i32(values: &[i32]) -> i32 {
    if values.is_empty() {
        return 0;
    }
    let sum: i64 = values.iter().map(|v| i64::from(*v)).sum();
    let count = cast::<usize, i64>(values.len()).unwrap_or(i64::MAX);
    cast::<i64, i32>(sum / count).unwrap_or(0)
}

/// Saturating conversion from u128 milliseconds to u64.
#[must_use]
pub fn millis_to_u64(value: u128) -> u64 {
    cast::<u128, u64>(value).unwrap_or(u64::MAX)
}
