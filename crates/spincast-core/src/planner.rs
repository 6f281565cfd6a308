// Rotation planner: computes the next cumulative wheel rotation so the
// selected slice's center settles under the pointer.
//
// Angles are degrees, measured clockwise in the pool's own frame: slice `i`
// spans `[i * slice, (i + 1) * slice)` starting at the pointer when the
// wheel rotation is 0. The renderer applies the fixed offset that puts the
// pool's 0° at the top of the screen.

use crate::error::SpinError;
use crate::selector::RandomSource;

/// Inclusive range of extra full turns added to every spin for effect.
///
/// This is a perceptual tunable only; the landing slice depends on the
/// modular residue of the target, never on the revolution count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevolutionRange {
    pub min: u32,
    pub max: u32,
}

impl RevolutionRange {
    /// Checked constructor. At least one full turn keeps every target
    /// strictly ahead of the current rotation.
    pub fn new(min: u32, max: u32) -> Result<Self, SpinError> {
        let range = RevolutionRange { min, max };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<(), SpinError> {
        if self.min == 0 || self.min > self.max {
            return Err(SpinError::InvalidRevolutions {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

impl Default for RevolutionRange {
    fn default() -> Self {
        RevolutionRange { min: 6, max: 9 }
    }
}

/// The intermediate values and final target of one planned rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationPlan {
    /// Center of the selected slice in the pool frame.
    pub center_angle: f64,
    /// Forward rotation in `[0, 360)` that aligns the center with the pointer.
    pub delta_to_align: f64,
    pub extra_revolutions: u32,
    /// New cumulative rotation; always greater than the current one.
    pub target: f64,
}

/// Reduce an angle to `[0, 360)`.
pub fn normalize(angle: f64) -> f64 {
    let r = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Angular center of slice `index` in the pool frame.
pub fn center_angle(index: usize, slice_angle: f64) -> f64 {
    index as f64 * slice_angle + slice_angle / 2.0
}

/// Compute the target rotation for a given number of extra revolutions.
pub fn plan_rotation(
    index: usize,
    slice_angle: f64,
    current_rotation: f64,
    extra_revolutions: u32,
) -> RotationPlan {
    let center_angle = center_angle(index, slice_angle);
    let current_normalized = normalize(current_rotation);
    let delta_to_align = normalize(360.0 - normalize(center_angle + current_normalized));
    let target = current_rotation + extra_revolutions as f64 * 360.0 + delta_to_align;

    RotationPlan {
        center_angle,
        delta_to_align,
        extra_revolutions,
        target,
    }
}

/// Plan a spin landing on `index`, drawing the revolution count from `rng`.
pub fn plan_spin(
    rng: &mut dyn RandomSource,
    index: usize,
    pool_len: usize,
    current_rotation: f64,
    revolutions: RevolutionRange,
) -> Result<RotationPlan, SpinError> {
    if pool_len == 0 {
        return Err(SpinError::EmptyPool);
    }
    if index >= pool_len {
        return Err(SpinError::IndexOutOfRange {
            index,
            len: pool_len,
        });
    }
    revolutions.validate()?;
    let slice_angle = 360.0 / pool_len as f64;
    let extra = rng.revolutions(revolutions.min, revolutions.max);
    Ok(plan_rotation(index, slice_angle, current_rotation, extra))
}

/// Index of the slice sitting under the pointer at `rotation`.
///
/// Inverse of the planner: after a spin settles on its target this returns
/// the selected index.
pub fn index_at_pointer(rotation: f64, pool_len: usize) -> Option<usize> {
    if pool_len == 0 {
        return None;
    }
    let slice_angle = 360.0 / pool_len as f64;
    let under_pointer = normalize(-rotation);
    let index = (under_pointer / slice_angle).floor() as usize;
    Some(index.min(pool_len - 1))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
