//! Poll interval with jitter.
//!
//! Jitter is drawn in whole milliseconds from `[0, period_ms * ratio)`. Odd
//! draws are applied negatively, so intervals spread on both sides of the base
//! period instead of only extending it.

use std::time::Duration;

use rand::Rng;

/// Jittered poll interval for a base period in seconds.
///
/// Returns zero when the period is not positive, which disables polling.
pub fn next_poll_interval(poll_interval_sec: i64, jitter_ratio: f64) -> Duration {
    let jitter_ms = next_jitter_interval_ms(&mut rand::thread_rng(), poll_interval_sec, jitter_ratio);
    poll_interval_with_jitter(poll_interval_sec, jitter_ms)
}

/// Magnitude of a single jitter draw.
pub fn next_jitter_interval(poll_interval_sec: i64, jitter_ratio: f64) -> Duration {
    let jitter_ms = next_jitter_interval_ms(&mut rand::thread_rng(), poll_interval_sec, jitter_ratio);
    Duration::from_millis(jitter_ms)
}

/// Applies a drawn jitter magnitude to the base period, clamping at zero.
pub fn poll_interval_with_jitter(poll_interval_sec: i64, jitter_ms: u64) -> Duration {
    if poll_interval_sec <= 0 {
        return Duration::ZERO;
    }

    let base_ms = poll_interval_sec.saturating_mul(1000) as i128;
    let jitter_ms = if jitter_ms % 2 == 1 {
        -(jitter_ms as i128)
    } else {
        jitter_ms as i128
    };

    let interval_ms = base_ms + jitter_ms;
    if interval_ms < 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(interval_ms as u64)
}

/// Draws a jitter magnitude in milliseconds from `rng`.
pub fn next_jitter_interval_ms<R: Rng + ?Sized>(
    rng: &mut R,
    poll_interval_sec: i64,
    jitter_ratio: f64,
) -> u64 {
    if poll_interval_sec <= 0 || jitter_ratio.is_nan() || jitter_ratio <= 0.0 {
        return 0;
    }

    let poll_ms = poll_interval_sec.saturating_mul(1000);
    let jitter_range_ms = (poll_ms as f64 * jitter_ratio) as u64;
    if jitter_range_ms == 0 {
        return 0;
    }
    rng.gen_range(0..jitter_range_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct DurationRange {
        min: Duration,
        max: Duration,
    }

    impl DurationRange {
        fn must_contain(&self, d: Duration, name: &str) {
            assert!(
                d >= self.min && d <= self.max,
                "{:?} not in {}[{:?}, {:?}]",
                d,
                name,
                self.min,
                self.max
            );
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_poll_interval_ranges() {
        let runs = 100;
        let cases = [
            ("some poll interval, no jitter", 1, 0.0, (ms(1000), ms(1000)), (ms(0), ms(0))),
            ("with jitter, within jitter ratio", 1, 0.1, (ms(900), ms(1100)), (ms(0), ms(100))),
            ("jitter ratio above 1 is not negative", 1, 1.1, (ms(0), ms(2100)), (ms(0), ms(1100))),
            ("no poll interval", 0, 0.0, (ms(0), ms(0)), (ms(0), ms(0))),
            ("negative poll interval", -1, 0.0, (ms(0), ms(0)), (ms(0), ms(0))),
            ("no poll interval, some jitter", 0, 0.1, (ms(0), ms(0)), (ms(0), ms(0))),
            ("negative poll interval, some jitter", -1, 0.1, (ms(0), ms(0)), (ms(0), ms(0))),
            ("negative jitter ratio", 1, -0.1, (ms(1000), ms(1000)), (ms(0), ms(0))),
        ];

        for (desc, poll_sec, ratio, (poll_min, poll_max), (jitter_min, jitter_max)) in cases {
            let poll_range = DurationRange { min: poll_min, max: poll_max };
            let jitter_range = DurationRange { min: jitter_min, max: jitter_max };
            for _ in 0..runs {
                poll_range.must_contain(next_poll_interval(poll_sec, ratio), desc);
                jitter_range.must_contain(next_jitter_interval(poll_sec, ratio), desc);
            }
        }
    }

    #[test]
    fn test_odd_jitter_is_negative() {
        assert_eq!(poll_interval_with_jitter(10, 0), ms(10_000));
        assert_eq!(poll_interval_with_jitter(10, 250), ms(10_250));
        assert_eq!(poll_interval_with_jitter(10, 251), ms(9_749));
    }

    #[test]
    fn test_negative_result_clamps_to_zero() {
        assert_eq!(poll_interval_with_jitter(1, 1_501), Duration::ZERO);
        assert_eq!(poll_interval_with_jitter(0, 2), Duration::ZERO);
    }

    #[test]
    fn test_tiny_ratio_has_no_jitter() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(next_jitter_interval_ms(&mut rng, 1, 0.0001), 0);
        assert_eq!(next_jitter_interval_ms(&mut rng, 1, f64::NAN), 0);
    }

    #[test]
    fn test_jitter_below_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let jitter = next_jitter_interval_ms(&mut rng, 3, 0.5);
            assert!(jitter < 1500);
        }
    }
}
