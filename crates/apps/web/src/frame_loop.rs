//! `requestAnimationFrame` driver for [`runtime::AnimationLoop`].

use std::cell::RefCell;
use std::rc::Rc;

use foundation::time::Millis;
use runtime::animation_loop::{Animation, AnimationLoop};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

#[derive(Default)]
struct Binding {
    handle: Option<i32>,
    callback: Option<Closure<dyn FnMut(f64)>>,
    stopped: bool,
}

/// Owns a self-rescheduling repaint callback.
///
/// [`FrameLoop::stop`] cancels the pending request and releases the
/// callback; dropping the loop does the same.
pub struct FrameLoop {
    binding: Rc<RefCell<Binding>>,
    name: &'static str,
}

impl FrameLoop {
    pub fn start<A>(name: &'static str, animation: A) -> Result<Self, JsValue>
    where
        A: Animation + 'static,
    {
        let binding = Rc::new(RefCell::new(Binding::default()));
        let weak = Rc::downgrade(&binding);
        let mut driver = AnimationLoop::new(animation);

        let callback = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
            let Some(binding) = weak.upgrade() else {
                return;
            };
            binding.borrow_mut().handle = None;
            if binding.borrow().stopped {
                return;
            }
            if driver.on_frame(Millis(timestamp)) {
                if let Err(err) = schedule(&binding) {
                    tracing::warn!(loop_name = name, ?err, "could not schedule next frame");
                }
            } else {
                tracing::debug!(loop_name = name, frames = driver.frames_run(), "animation finished");
            }
        });
        binding.borrow_mut().callback = Some(callback);
        schedule(&binding)?;
        tracing::debug!(loop_name = name, "animation started");
        Ok(Self { binding, name })
    }

    pub fn is_running(&self) -> bool {
        let b = self.binding.borrow();
        !b.stopped && b.handle.is_some()
    }

    pub fn stop(&self) {
        let Ok(mut b) = self.binding.try_borrow_mut() else {
            return;
        };
        if b.stopped {
            return;
        }
        b.stopped = true;
        if let (Some(handle), Some(window)) = (b.handle.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(handle);
        }
        b.callback = None;
        tracing::debug!(loop_name = self.name, "animation stopped");
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn schedule(binding: &Rc<RefCell<Binding>>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let mut b = binding.borrow_mut();
    if b.stopped {
        return Ok(());
    }
    let Some(callback) = b.callback.as_ref() else {
        return Ok(());
    };
    let handle = window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    b.handle = Some(handle);
    Ok(())
}

