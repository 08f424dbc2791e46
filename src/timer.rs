//! Cooperative interval primitive: one periodic callback plus an explicit,
//! idempotent cancellation handle. Every recurring tick on the page (countdown,
//! quote rotations, typewriter, firework scheduler) runs through this.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

pub(crate) struct Interval {
    id: Option<i32>,
    // Retained (not forgotten) so cancellation can actually free the tick.
    _tick: Closure<dyn FnMut()>,
}

impl Interval {
    pub fn new(period_ms: i32, tick: impl FnMut() + 'static) -> Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(tick) as Box<dyn FnMut()>);
        let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
        let id = win.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            period_ms,
        )?;
        Ok(Self {
            id: Some(id),
            _tick: closure,
        })
    }

    /// Stops future ticks. Safe to call repeatedly or after the interval
    /// already stopped.
    pub fn cancel(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(win) = window() {
                win.clear_interval_with_handle(id);
            }
        }
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.cancel();
    }
}
