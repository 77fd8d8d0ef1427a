//! Reusable observers for Cadence runs and searches.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work across headless robot runs and evolutionary searches.
//!
//! # Modules
//!
//! - [`traits`]: capability traits for cross-crate observers
//!   ([`HasTime`], [`HasSpeed`], [`HasObjective`], [`CanStopEarly`])
//! - [`SeriesRecorder`]: named `(x, y)` traces from [`Plottable`] events
//! - [`Settled`], [`Deadline`] and [`GoodEnough`]: early-stop observers
//!
//! # Features
//!
//! - `plot`: enables `PlotObserver` for viewing traces in an egui window.
//!   This feature adds dependencies on `eframe` and `egui_plot`.
//!
//! [`Observer`]: cadence_core::Observer
//! [`HasTime`]: traits::HasTime
//! [`HasSpeed`]: traits::HasSpeed
//! [`HasObjective`]: traits::HasObjective
//! [`CanStopEarly`]: traits::CanStopEarly

pub mod traits;

mod series;
mod stop;

#[cfg(feature = "plot")]
mod plot;

pub use series::{GENERATION_TRACES, Plottable, SAMPLE_TRACES, SeriesRecorder};
pub use stop::{Deadline, GoodEnough, Settled};

#[cfg(feature = "plot")]
pub use plot::{PlotObserver, ShowConfig};
