//! Recording named traces from events.
//!
//! See [`SeriesRecorder`] and [`Plottable`] for usage.

use cadence_core::Observer;
use cadence_evolve::Generation;
use cadence_wmr::runner::Sample;

/// Extracts traces from an event.
///
/// Implement this on an event type to pass a [`SeriesRecorder`] (or, with
/// the `plot` feature, a `PlotObserver`) directly as the observer. Return
/// `None` from [`x`][Plottable::x] to skip the event entirely; return `None`
/// in a trace slot to skip that trace for the event.
pub trait Plottable<const N: usize> {
    /// The x-axis value for this event, or `None` to skip recording entirely.
    fn x(&self) -> Option<f64>;

    /// The y-axis values for each trace.
    fn traces(&self) -> [Option<f64>; N];
}

/// Location, speed and sensor distance against logical time.
impl Plottable<3> for Sample {
    fn x(&self) -> Option<f64> {
        Some(self.time)
    }

    fn traces(&self) -> [Option<f64>; 3] {
        [Some(self.location), Some(self.speed), Some(self.distance)]
    }
}

/// Best, average and worst objective against the generation index.
impl Plottable<3> for Generation {
    #[allow(clippy::cast_precision_loss)]
    fn x(&self) -> Option<f64> {
        Some(self.generation as f64)
    }

    fn traces(&self) -> [Option<f64>; 3] {
        let stats = &self.statistics;
        [
            Some(stats.best.objective),
            Some(stats.average.objective),
            Some(stats.worst.objective),
        ]
    }
}

/// Trace names for [`Sample`]'s [`Plottable`] impl.
pub const SAMPLE_TRACES: [&str; 3] = ["Location", "Speed", "Distance"];

/// Trace names for [`Generation`]'s [`Plottable`] impl.
pub const GENERATION_TRACES: [&str; 3] = ["Best", "Average", "Worst"];

/// An observer that keeps `N` named `(x, y)` traces.
///
/// Record either by passing `&mut SeriesRecorder` as the observer for a
/// [`Plottable`] event type, or by calling [`record`][SeriesRecorder::record]
/// from a closure.
///
/// ```
/// use cadence_observers::{SAMPLE_TRACES, SeriesRecorder};
/// use cadence_wmr::{Fidelity, Wmr, WmrConfig, runner};
///
/// let mut series = SeriesRecorder::new(SAMPLE_TRACES);
/// let mut wmr = Wmr::new(WmrConfig::default(), Fidelity::Numerical).unwrap();
/// runner::run(&mut wmr, 0.5, &mut series);
///
/// assert_eq!(series.trace(0).len(), 52);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRecorder<const N: usize> {
    names: [String; N],
    data: [Vec<[f64; 2]>; N],
}

impl<const N: usize> SeriesRecorder<N> {
    /// Creates an empty recorder with the given trace names.
    #[must_use]
    pub fn new(names: [&str; N]) -> Self {
        Self {
            names: names.map(str::to_owned),
            data: std::array::from_fn(|_| Vec::new()),
        }
    }

    /// Records a single data point across all traces.
    ///
    /// For each trace slot, `None` skips recording for that trace while
    /// leaving other traces unaffected.
    pub fn record(&mut self, x: f64, traces: [Option<f64>; N]) {
        for (i, y) in traces.into_iter().enumerate() {
            if let Some(y) = y {
                self.data[i].push([x, y]);
            }
        }
    }

    #[must_use]
    pub fn names(&self) -> &[String; N] {
        &self.names
    }

    /// Points recorded for trace `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= N`.
    #[must_use]
    pub fn trace(&self, index: usize) -> &[[f64; 2]] {
        &self.data[index]
    }

    /// Consumes the recorder, pairing each trace with its name.
    #[must_use]
    pub fn into_traces(self) -> Vec<(String, Vec<[f64; 2]>)> {
        self.names.into_iter().zip(self.data).collect()
    }
}

impl<const N: usize, E, A> Observer<E, A> for SeriesRecorder<N>
where
    E: Plottable<N>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        if let Some(x) = event.x() {
            self.record(x, event.traces());
        }
        None
    }
}

/// Allows `&mut SeriesRecorder<N>` to be passed to functions that take an
/// observer by value, so the traces can be read afterwards.
impl<const N: usize, E, A> Observer<E, A> for &mut SeriesRecorder<N>
where
    E: Plottable<N>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        (**self).observe(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy)]
    struct Event {
        x: Option<f64>,
        a: Option<f64>,
        b: Option<f64>,
    }

    impl Plottable<2> for Event {
        fn x(&self) -> Option<f64> {
            self.x
        }

        fn traces(&self) -> [Option<f64>; 2] {
            [self.a, self.b]
        }
    }

    // Calls observe without naming the action type at each call site.
    fn feed(series: &mut SeriesRecorder<2>, event: Event) {
        let _: Option<()> = series.observe(&event);
    }

    #[test]
    fn records_point_when_both_x_and_y_are_some() {
        let mut series = SeriesRecorder::new(["a", "b"]);
        feed(
            &mut series,
            Event {
                x: Some(1.0),
                a: Some(2.0),
                b: Some(3.0),
            },
        );
        assert_eq!(series.trace(0), [[1.0, 2.0]]);
        assert_eq!(series.trace(1), [[1.0, 3.0]]);
    }

    #[test]
    fn skips_all_traces_when_x_is_none() {
        let mut series = SeriesRecorder::new(["a", "b"]);
        feed(
            &mut series,
            Event {
                x: None,
                a: Some(1.0),
                b: Some(2.0),
            },
        );
        assert!(series.trace(0).is_empty());
        assert!(series.trace(1).is_empty());
    }

    #[test]
    fn skips_only_affected_trace_when_y_is_none() {
        let mut series = SeriesRecorder::new(["a", "b"]);
        series.record(1.0, [None, Some(3.0)]);
        series.record(2.0, [Some(4.0), Some(5.0)]);

        assert_eq!(series.trace(0), [[2.0, 4.0]]);
        assert_eq!(series.trace(1), [[1.0, 3.0], [2.0, 5.0]]);
    }

    #[test]
    fn samples_plot_against_time() {
        let sample = Sample {
            step: 3,
            time: 0.03,
            distance: 9.0,
            speed: 2.0,
            contact: false,
            location: 3.5,
        };
        let mut series = SeriesRecorder::new(SAMPLE_TRACES);
        let _: Option<()> = series.observe(&sample);

        assert_eq!(series.trace(0), [[0.03, 3.5]]);
        assert_eq!(series.trace(1), [[0.03, 2.0]]);
        assert_eq!(series.trace(2), [[0.03, 9.0]]);
    }

    #[test]
    fn into_traces_keeps_names_in_order() {
        let mut series = SeriesRecorder::new(["a", "b"]);
        series.record(0.0, [Some(1.0), Some(2.0)]);
        let traces = series.into_traces();

        assert_eq!(traces[0].0, "a");
        assert_eq!(traces[1], ("b".to_owned(), vec![[0.0, 2.0]]));
    }
}
