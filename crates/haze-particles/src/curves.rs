//! Opacity envelope over a particle's lifetime

/// Fraction of the lifetime spent fading in
pub const FADE_IN_END: f32 = 0.2;
/// Fraction of the lifetime after which fading out begins
pub const FADE_OUT_START: f32 = 0.8;

/// Linear interpolation between two floats
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Piecewise-linear fade multiplier for a life progress in [0, 1]:
/// ramps 0→1 over the first 20%, holds at 1, ramps 1→0 over the last 20%.
pub fn fade_factor(life_progress: f32) -> f32 {
    let t = life_progress.clamp(0.0, 1.0);
    let factor = if t < FADE_IN_END {
        lerp_f32(0.0, 1.0, t / FADE_IN_END)
    } else if t > FADE_OUT_START {
        lerp_f32(1.0, 0.0, (t - FADE_OUT_START) / (1.0 - FADE_OUT_START))
    } else {
        1.0
    };
    // f32 rounding at the ends can overshoot slightly
    factor.clamp(0.0, 1.0)
}
