//! Transport controls over a discretized timeline.
//!
//! A [`Transport`] owns play/pause/reset/scrub state for a timeline of
//! `num_steps` evenly spaced positions. The host calls [`Transport::tick`]
//! from its frame loop with a monotonic timestamp; while running, the
//! transport advances one position per fixed step of elapsed time and reports
//! the current timeline time to a [`Playback`] collaborator on every tick.
//!
//! ```
//! use std::time::Duration;
//!
//! use cadence_player::Transport;
//!
//! let mut transport = Transport::new(1.0, 0.25, ()).unwrap();
//! assert_eq!(transport.num_steps(), 5);
//!
//! transport.start();
//! transport.tick(Duration::ZERO);
//! transport.tick(Duration::from_millis(250));
//! assert_eq!(transport.position(), 1);
//! assert_eq!(transport.label(), "0.25");
//! ```

mod config;
mod playback;
mod transport;

pub use config::{ConfigError, DrainPolicy};
pub use playback::{FnPlayback, Playback};
pub use transport::{State, Transport};
