//! E-value transform used by the significance curve and the rescue pass
//!
//! Both stages compare alignments on the `-log10(e-value)` scale, which grows
//! with significance. A perfect or underflowed alignment is reported with an
//! e-value of exactly zero, so values are floored before taking the log.

/// Smallest e-value fed into the log transform.
pub const EVALUE_FLOOR: f64 = 1e-200;

/// Clamp an e-value to [`EVALUE_FLOOR`].
#[inline]
pub fn floor_evalue(e_value: f64) -> f64 {
    e_value.max(EVALUE_FLOOR)
}

/// Transformed significance: `-log10(max(e_value, 1e-200))`.
///
/// An e-value of 0 maps to 200.0, the same as 1e-200.
#[inline]
pub fn transform_evalue(e_value: f64) -> f64 {
    -floor_evalue(e_value).log10()
}
