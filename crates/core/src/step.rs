/// A state that advances by `derivative * delta`.
///
/// Explicit-Euler steppers use this to update their primary state once per
/// fixed step, and closed-form evaluators use it to jump an arbitrary span
/// when the rate is constant over that span.
///
/// `Delta` is usually a duration, either plain seconds as `f64` or a
/// dimensioned `uom` time.
pub trait StepIntegrable<Delta> {
    /// The rate of change with respect to `Delta`.
    type Derivative;

    /// Returns the state after moving at `derivative` for `delta`.
    #[must_use]
    fn step(&self, derivative: Self::Derivative, delta: Delta) -> Self;
}

/// The derivative type of a [`StepIntegrable`] state.
pub type DerivativeOf<T, Delta> = <T as StepIntegrable<Delta>>::Derivative;
