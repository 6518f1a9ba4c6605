//! Ownership of self-rescheduling per-frame work.
//!
//! The browser side only knows how to ask for "one more repaint". Everything
//! that decides whether another repaint is wanted lives in [`AnimationLoop`],
//! which has a single [`AnimationLoop::stop`] that makes every later frame a
//! no-op. Host bindings cancel their pending repaint request when `stop` is
//! called and must not reschedule once [`AnimationLoop::on_frame`] returns
//! `false`.

use foundation::time::Millis;

use crate::frame::{Frame, FrameClock};

/// Whether an animation wants another frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Break,
}

/// Per-frame work driven by an [`AnimationLoop`].
pub trait Animation {
    fn frame(&mut self, frame: Frame) -> LoopControl;
}

impl<F> Animation for F
where
    F: FnMut(Frame) -> LoopControl,
{
    fn frame(&mut self, frame: Frame) -> LoopControl {
        self(frame)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Finished,
    Stopped,
}

#[derive(Debug)]
pub struct AnimationLoop<A> {
    animation: A,
    clock: FrameClock,
    state: LoopState,
}

impl<A: Animation> AnimationLoop<A> {
    pub fn new(animation: A) -> Self {
        Self {
            animation,
            clock: FrameClock::new(),
            state: LoopState::Running,
        }
    }

    /// Runs one frame. Returns `true` if another frame should be requested.
    pub fn on_frame(&mut self, now: Millis) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        let frame = self.clock.tick(now);
        match self.animation.frame(frame) {
            LoopControl::Continue => true,
            LoopControl::Break => {
                self.state = LoopState::Finished;
                false
            }
        }
    }

    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            self.state = LoopState::Stopped;
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn frames_run(&self) -> u64 {
        self.clock.frames_seen()
    }

    pub fn animation(&self) -> &A {
        &self.animation
    }

    pub fn animation_mut(&mut self) -> &mut A {
        &mut self.animation
    }
}
