use std::{
    fmt,
    ops::{Add, Deref},
    time::Duration,
};

use thiserror::Error;
use uom::{
    Conversion,
    si::{f64::Time, time},
};

/// A unit-safe, strictly positive duration used as a fixed simulation step.
///
/// `TimeIncrement` wraps a [`Time`] value while enforcing that it is finite
/// and strictly greater than zero. A clock built on a zero or negative step
/// would either never drain or never terminate, so the check happens once at
/// construction.
///
/// # Construction
///
/// ```
/// use cadence_core::TimeIncrement;
/// use uom::si::time::millisecond;
///
/// let dt = TimeIncrement::new::<millisecond>(10.0).unwrap();
/// assert!((dt.seconds() - 0.01).abs() < 1e-15);
///
/// assert!(TimeIncrement::from_seconds(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeIncrement(Time);

/// Error returned when constructing an invalid [`TimeIncrement`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TimeIncrementError {
    #[error("time increment must be finite and greater than zero, got {0} s")]
    NotPositive(f64),
}

impl TimeIncrement {
    /// Constructs a `TimeIncrement` from a value in the unit `U`.
    ///
    /// # Errors
    ///
    /// Returns [`TimeIncrementError::NotPositive`] if `value` is zero,
    /// negative, or not finite.
    pub fn new<U>(value: f64) -> Result<Self, TimeIncrementError>
    where
        U: time::Unit + Conversion<f64, T = f64>,
    {
        Self::from_time(Time::new::<U>(value))
    }

    /// Constructs a `TimeIncrement` from a plain number of seconds.
    ///
    /// # Errors
    ///
    /// Returns [`TimeIncrementError::NotPositive`] if `seconds` is zero,
    /// negative, or not finite.
    pub fn from_seconds(seconds: f64) -> Result<Self, TimeIncrementError> {
        Self::new::<time::second>(seconds)
    }

    /// Constructs a `TimeIncrement` from an existing [`Time`] value.
    ///
    /// # Errors
    ///
    /// Returns [`TimeIncrementError::NotPositive`] if the time is zero,
    /// negative, or not finite.
    pub fn from_time(time: Time) -> Result<Self, TimeIncrementError> {
        let seconds = time.get::<time::second>();
        if seconds.is_finite() && seconds > 0.0 {
            Ok(Self(time))
        } else {
            Err(TimeIncrementError::NotPositive(seconds))
        }
    }

    /// Returns the increment in seconds.
    #[must_use]
    pub fn seconds(&self) -> f64 {
        self.0.get::<time::second>()
    }

    /// Returns the increment as a [`Duration`], rounded to whole nanoseconds.
    #[must_use]
    pub fn as_duration(&self) -> Duration {
        Duration::from_secs_f64(self.seconds())
    }

    /// Consumes the `TimeIncrement` and returns the underlying [`Time`].
    #[must_use]
    pub fn into_inner(self) -> Time {
        self.0
    }
}

impl TryFrom<Time> for TimeIncrement {
    type Error = TimeIncrementError;

    fn try_from(t: Time) -> Result<Self, Self::Error> {
        Self::from_time(t)
    }
}

impl Deref for TimeIncrement {
    type Target = Time;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Add<TimeIncrement> for Time {
    type Output = Time;

    fn add(self, rhs: TimeIncrement) -> Self::Output {
        self + rhs.0
    }
}

impl fmt::Display for TimeIncrement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} s", self.seconds())
    }
}

/// Returns a [`Time`] as a plain number of seconds.
#[must_use]
pub fn seconds(time: Time) -> f64 {
    time.get::<time::second>()
}

/// Counts the whole steps of size `step` that fit in `span`.
///
/// Quotients that land within a few ulps below an integer are rounded up to
/// it, so `0.3 / 0.1` counts three steps rather than two. Negative or NaN
/// spans count zero steps.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn whole_steps(span: f64, step: f64) -> usize {
    let ratio = span / step;
    if ratio.is_nan() || ratio <= 0.0 {
        return 0;
    }
    let nearest = ratio.round();
    let whole = if (ratio - nearest).abs() <= nearest * 4.0 * f64::EPSILON {
        nearest
    } else {
        ratio.floor()
    };
    whole as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::time::{millisecond, second};

    #[test]
    fn accepts_positive_increments_in_any_unit() {
        let dt = TimeIncrement::new::<millisecond>(250.0).unwrap();
        assert_relative_eq!(dt.seconds(), 0.25);

        let dt = TimeIncrement::from_seconds(0.25).unwrap();
        assert_eq!(dt.as_duration(), Duration::from_millis(250));
    }

    #[test]
    fn rejects_zero_negative_and_non_finite() {
        assert!(TimeIncrement::from_seconds(0.0).is_err());
        assert!(TimeIncrement::from_seconds(-0.1).is_err());
        assert!(TimeIncrement::from_seconds(f64::NAN).is_err());
        assert!(TimeIncrement::from_seconds(f64::INFINITY).is_err());
    }

    #[test]
    fn error_reports_the_offending_value() {
        let err = TimeIncrement::from_seconds(-2.0).unwrap_err();
        assert_eq!(err, TimeIncrementError::NotPositive(-2.0));
        assert_eq!(
            err.to_string(),
            "time increment must be finite and greater than zero, got -2 s"
        );
    }

    #[test]
    fn add_increment_to_a_time() {
        let t = Time::new::<second>(5.0);
        let dt = TimeIncrement::from_seconds(0.5).unwrap();
        assert_relative_eq!(seconds(t + dt), 5.5);
    }

    #[test]
    fn whole_steps_tolerates_representation_error() {
        assert_eq!(whole_steps(10.0, 0.1), 100);
        assert_eq!(whole_steps(0.3, 0.1), 3);
        assert_eq!(whole_steps(20.0, 0.01), 2000);
        assert_eq!(whole_steps(0.35, 0.1), 3);
        assert_eq!(whole_steps(0.0, 0.1), 0);
        assert_eq!(whole_steps(-1.0, 0.1), 0);
    }
}
