use crate::error::RebinResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless usage.
///
/// It still validates frame content so tests can catch invalid output before
/// a real backend is wired in.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_mark_count: usize,
    pub last_tick_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> RebinResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_mark_count = frame.mark_count();
        self.last_tick_count = frame.tick_count();
        Ok(())
    }
}
