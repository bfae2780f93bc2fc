use anyhow::Result;

use crate::device::Gpu;
use crate::input::{log_event, InputEvent};

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the samples.
pub trait App {
    /// Called once, after the window and its GPU context exist.
    ///
    /// An error here is fatal: the runtime stops and returns it.
    fn on_init(&mut self, gpu: &Gpu<'_>) -> Result<()>;

    /// Called for every translated input event. Logs the event by default.
    fn on_input(&mut self, event: &InputEvent) -> AppControl {
        log_event(event);
        AppControl::Continue
    }

    /// Called once per redraw.
    ///
    /// An error drops the frame; the runtime logs it and keeps running.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl>;

    /// Called once before the window and its GPU context are torn down.
    fn on_shutdown(&mut self) {}
}
