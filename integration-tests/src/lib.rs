//! Shared fixtures for the cross-crate tests in `tests/`.

use cadence_wmr::{Arena, ControlConfig, WmrConfig};
use uom::si::{f64::Time, time::second};

/// A time in seconds.
#[must_use]
pub fn secs(value: f64) -> Time {
    Time::new::<second>(value)
}

/// The demo robot under proportional control, starting at rest on flat
/// ground.
#[must_use]
pub fn controlled_robot() -> WmrConfig {
    WmrConfig {
        angular_velocity: 0.0,
        control: Some(ControlConfig::default()),
        arena: Arena::flat(),
        ..WmrConfig::default()
    }
}

/// Splits `total` seconds into frames whose lengths cycle through `pattern`.
///
/// Every frame is a multiple of 1/64 s so the sums stay exact.
#[must_use]
pub fn dyadic_frames(total: f64, pattern: &[u32]) -> Vec<f64> {
    let mut frames = Vec::new();
    let mut elapsed = 0.0;
    for &n in pattern.iter().cycle() {
        let frame = f64::from(n) / 64.0;
        if elapsed + frame > total {
            break;
        }
        elapsed += frame;
        frames.push(frame);
    }
    if elapsed < total {
        frames.push(total - elapsed);
    }
    frames
}
