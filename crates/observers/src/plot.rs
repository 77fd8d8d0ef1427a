//! An egui window for recorded traces.
//!
//! See [`PlotObserver`] for usage.

use cadence_core::Observer;
use eframe::egui;
use egui_plot::{HLine, Legend, Line, Plot, PlotPoints};

use crate::{Plottable, SeriesRecorder};

/// Window options for [`PlotObserver::show`].
///
/// ```ignore
/// let options = ShowConfig::new()
///     .title("Wall approach")
///     .legend()
///     .reference("wall", 25.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShowConfig {
    title: Option<String>,
    legend: bool,
    references: Vec<(String, f64)>,
}

impl ShowConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Labels each trace by name.
    #[must_use]
    pub fn legend(mut self) -> Self {
        self.legend = true;
        self
    }

    /// Draws a named horizontal line at `y`, such as a wall position or a
    /// target objective.
    #[must_use]
    pub fn reference(mut self, name: impl Into<String>, y: f64) -> Self {
        self.references.push((name.into(), y));
        self
    }
}

/// A [`SeriesRecorder`] that can open its traces in a window.
///
/// ```ignore
/// let mut plot = PlotObserver::new(SAMPLE_TRACES);
/// runner::run(&mut wmr, 20.0, &mut plot);
/// plot.show(ShowConfig::new().title("Engine").legend())?;
/// ```
#[derive(Debug, Clone)]
pub struct PlotObserver<const N: usize> {
    series: SeriesRecorder<N>,
}

impl<const N: usize> PlotObserver<N> {
    #[must_use]
    pub fn new(names: [&str; N]) -> Self {
        Self {
            series: SeriesRecorder::new(names),
        }
    }

    pub fn record(&mut self, x: f64, traces: [Option<f64>; N]) {
        self.series.record(x, traces);
    }

    #[must_use]
    pub fn series(&self) -> &SeriesRecorder<N> {
        &self.series
    }

    /// Opens a window with every trace and blocks until it is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the native window cannot be created.
    pub fn show(self, config: ShowConfig) -> Result<(), eframe::Error> {
        let ShowConfig {
            title,
            legend,
            references,
        } = config;
        let app = TracesApp {
            traces: self.series.into_traces(),
            legend,
            references,
        };

        eframe::run_native(
            &title.unwrap_or_default(),
            eframe::NativeOptions::default(),
            Box::new(move |_cc| Ok(Box::new(app))),
        )
    }
}

impl<const N: usize> From<SeriesRecorder<N>> for PlotObserver<N> {
    fn from(series: SeriesRecorder<N>) -> Self {
        Self { series }
    }
}

impl<const N: usize, E, A> Observer<E, A> for PlotObserver<N>
where
    E: Plottable<N>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self.series.observe(event)
    }
}

impl<const N: usize, E, A> Observer<E, A> for &mut PlotObserver<N>
where
    E: Plottable<N>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        (**self).observe(event)
    }
}

struct TracesApp {
    traces: Vec<(String, Vec<[f64; 2]>)>,
    legend: bool,
    references: Vec<(String, f64)>,
}

impl eframe::App for TracesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let mut plot = Plot::new("cadence_traces");
            if self.legend {
                plot = plot.legend(Legend::default());
            }
            plot.show(ui, |plot_ui| {
                for (name, points) in &self.traces {
                    let points: PlotPoints = points.iter().copied().collect();
                    plot_ui.line(Line::new(points).name(name));
                }
                for (name, y) in &self.references {
                    plot_ui.hline(HLine::new(*y).name(name));
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use cadence_wmr::runner::Sample;

    use crate::SAMPLE_TRACES;

    #[test]
    fn forwards_samples_to_the_series() {
        let mut plot = PlotObserver::new(SAMPLE_TRACES);
        let sample = Sample {
            step: 1,
            time: 0.01,
            distance: 10.0,
            speed: 1.0,
            contact: false,
            location: 3.01,
        };
        let action: Option<()> = (&mut plot).observe(&sample);

        assert!(action.is_none());
        assert_eq!(plot.series().trace(0), [[0.01, 3.01]]);
        assert_eq!(plot.series().trace(2), [[0.01, 10.0]]);
    }

    #[test]
    fn wraps_an_existing_recording() {
        let mut series = SeriesRecorder::new(["a", "b"]);
        series.record(1.0, [Some(10.0), None]);

        let plot = PlotObserver::from(series);
        assert_eq!(plot.series().trace(0), [[1.0, 10.0]]);
        assert!(plot.series().trace(1).is_empty());
    }

    #[test]
    fn references_keep_their_order() {
        let config = ShowConfig::new()
            .title("Wall approach")
            .reference("target", 20.0)
            .reference("wall", 25.0);

        assert_eq!(config.title.as_deref(), Some("Wall approach"));
        assert_eq!(
            config.references,
            vec![("target".to_owned(), 20.0), ("wall".to_owned(), 25.0)]
        );
    }
}
