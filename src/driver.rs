//! Render loop driving
//!
//! The display calls back once per refresh with a timestamp in milliseconds.
//! `AnimationLoop` turns those timestamps into time steps (seconds, capped so
//! a backgrounded tab does not produce one giant step) and hands them to the
//! frame callback, which decides whether the loop keeps going.

use crate::consts::MAX_FRAME_DELTA_MS;

/// Returned by a frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Timestamp bookkeeping between display refreshes
#[derive(Debug, Clone, Default)]
pub struct AnimationLoop {
    last_time: Option<f64>,
    frames: u64,
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames handed to the callback so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Feed one refresh timestamp (ms)
    ///
    /// The first timestamp only primes the clock. Later ones call `frame`
    /// with `time - last` clamped to `[0, 100]` ms, in seconds; a clock that
    /// runs backwards yields a zero step. A stop from the callback
    /// is returned without recording the timestamp.
    pub fn frame<F>(&mut self, time_ms: f64, mut frame: F) -> LoopControl
    where
        F: FnMut(f64) -> LoopControl,
    {
        if let Some(last) = self.last_time {
            let time_step = (time_ms - last).clamp(0.0, MAX_FRAME_DELTA_MS) / 1000.0;
            self.frames += 1;
            if frame(time_step) == LoopControl::Stop {
                log::info!("Animation stopped after {} frames", self.frames);
                return LoopControl::Stop;
            }
        }
        self.last_time = Some(time_ms);
        LoopControl::Continue
    }
}

/// Something that can call back once per display refresh
pub trait Scheduler {
    /// Run `frame` with refresh timestamps (ms) until it returns `Stop`
    fn run<F>(&mut self, frame: F)
    where
        F: FnMut(f64) -> LoopControl + 'static;
}

/// Fixed-rate clock for running without a display
#[derive(Debug, Clone)]
pub struct HeadlessScheduler {
    /// Milliseconds between refreshes
    pub interval_ms: f64,
    /// Hard cap on refreshes; `None` runs until the callback stops
    pub max_refreshes: Option<u64>,
}

impl HeadlessScheduler {
    pub fn new(fps: f64, max_refreshes: Option<u64>) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 60.0 };
        Self {
            interval_ms: 1000.0 / fps,
            max_refreshes,
        }
    }
}

impl Scheduler for HeadlessScheduler {
    fn run<F>(&mut self, mut frame: F)
    where
        F: FnMut(f64) -> LoopControl + 'static,
    {
        let mut refresh = 0u64;
        loop {
            if self.max_refreshes.is_some_and(|max| refresh >= max) {
                break;
            }
            let time = refresh as f64 * self.interval_ms;
            refresh += 1;
            if frame(time) == LoopControl::Stop {
                break;
            }
        }
        log::debug!("Headless scheduler finished after {refresh} refreshes");
    }
}

/// Browser `requestAnimationFrame` clock
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationFrameScheduler;

#[cfg(target_arch = "wasm32")]
impl Scheduler for AnimationFrameScheduler {
    fn run<F>(&mut self, frame: F)
    where
        F: FnMut(f64) -> LoopControl + 'static,
    {
        request_animation_frame(std::rc::Rc::new(std::cell::RefCell::new(frame)));
    }
}

#[cfg(target_arch = "wasm32")]
fn request_animation_frame<F>(frame: std::rc::Rc<std::cell::RefCell<F>>)
where
    F: FnMut(f64) -> LoopControl + 'static,
{
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    let Some(window) = web_sys::window() else {
        log::error!("No window; animation not started");
        return;
    };
    let closure = Closure::once(move |time: f64| {
        let control = {
            let mut callback = frame.borrow_mut();
            (&mut *callback)(time)
        };
        if control == LoopControl::Continue {
            request_animation_frame(frame);
        }
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}
