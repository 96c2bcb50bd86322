//! One-sided Wilson score bounds.
//!
//! Picking z for a one-sided bound at confidence `1 - a`: the lower bound uses
//! the z-score with area `a` to its left, the upper bound the one with area
//! `1 - a` to its left.
//!
//! | confidence | lower z | upper z |
//! |------------|---------|---------|
//! | 0.80       | -0.845  | 0.845   |
//! | 0.85       | -1.035  | 1.035   |
//! | 0.90       | -1.285  | 1.285   |
//! | 0.95       | -1.645  | 1.645   |
//! | 0.99       | -2.325  | 2.325   |
//! | 0.999      | -3.1    | 3.1     |

/// z-score of the lower bound used by [`is_too_easy`] (85% confidence).
pub const TOO_EASY_Z: f64 = -1.035;

/// Success rate the lower bound has to beat.
pub const TOO_EASY_THRESHOLD: f64 = 0.85;

/// z-score of the upper bound used by [`is_too_hard`] (99.9% confidence).
pub const TOO_HARD_Z: f64 = 3.1;

/// Success rate the upper bound has to stay under.
pub const TOO_HARD_THRESHOLD: f64 = 0.8;

/// Boundary point of a Wilson score interval.
///
/// Negative `z` gives a lower bound, positive `z` an upper bound. With no
/// trials the result is the prior-only bound (0 or 1).
pub fn bound(successes: u32, failures: u32, z: f64) -> f64 {
    let ns = f64::from(successes);
    let nf = f64::from(failures);
    let n = ns + nf;
    let z2 = z * z;

    if n + z2 == 0.0 {
        return 0.5;
    }

    let spread = if n > 0.0 { ns * nf / n } else { 0.0 };
    let value = (ns + z2 / 2.0) / (n + z2) + (z / (n + z2)) * (spread + z2 / 4.0).sqrt();
    value.clamp(0.0, 1.0)
}

/// 85% confident that the true correct-rate is above 85%.
pub fn is_too_easy(correct: u32, incorrect: u32) -> bool {
    bound(correct, incorrect, TOO_EASY_Z) > TOO_EASY_THRESHOLD
}

/// 99.9% confident that the true correct-rate is below 80%.
pub fn is_too_hard(correct: u32, incorrect: u32) -> bool {
    bound(correct, incorrect, TOO_HARD_Z) < TOO_HARD_THRESHOLD
}
