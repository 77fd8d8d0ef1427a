/// The collaborator a [`Transport`](crate::Transport) drives.
///
/// `update` receives the current timeline time in seconds on every tick and
/// after every seek. `reset` is called once when the transport is reset, after
/// the final `update` for position zero.
pub trait Playback {
    fn update(&mut self, time: f64);

    fn reset(&mut self) {}
}

/// Playback that ignores every notification.
impl Playback for () {
    fn update(&mut self, _time: f64) {}
}

impl<P: Playback + ?Sized> Playback for &mut P {
    fn update(&mut self, time: f64) {
        (**self).update(time);
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

impl<P: Playback + ?Sized> Playback for Box<P> {
    fn update(&mut self, time: f64) {
        (**self).update(time);
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

/// Adapts a pair of closures into a [`Playback`].
///
/// ```
/// use cadence_player::{FnPlayback, Playback};
///
/// let mut last = 0.0;
/// let mut playback = FnPlayback::new(|t| last = t, || {});
/// playback.update(1.5);
/// drop(playback);
/// assert_eq!(last, 1.5);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnPlayback<U, R> {
    update: U,
    reset: R,
}

impl<U, R> FnPlayback<U, R>
where
    U: FnMut(f64),
    R: FnMut(),
{
    pub fn new(update: U, reset: R) -> Self {
        Self { update, reset }
    }
}

impl<U, R> Playback for FnPlayback<U, R>
where
    U: FnMut(f64),
    R: FnMut(),
{
    fn update(&mut self, time: f64) {
        (self.update)(time);
    }

    fn reset(&mut self) {
        (self.reset)();
    }
}
