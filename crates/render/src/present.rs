/// Display-side hooks called once per frame, in this order:
/// draw-complete wait, vsync wait, buffer swap, then (after drawing) overlay flush.
pub trait Presenter {
    fn wait_draw_complete(&mut self);
    fn wait_vsync(&mut self);
    /// Flip the display and draw buffers. Returns the buffer now drawn into.
    fn swap_buffers(&mut self) -> usize;
    fn flush_overlay(&mut self, text: &str);
}

/// Call made on a [`HeadlessPresenter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentCall {
    DrawSync,
    VSync,
    Swap(usize),
    Overlay,
}

/// Presenter with no display: toggles a buffer index and counts frames.
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    draw_buffer: usize,
    frames: u64,
    overlay: String,
    calls: Vec<PresentCall>,
}

impl HeadlessPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw_buffer(&self) -> usize {
        self.draw_buffer
    }

    /// Number of completed swaps.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Overlay text from the most recent flush.
    pub fn overlay(&self) -> &str {
        &self.overlay
    }

    /// Calls made during the current frame.
    pub fn calls(&self) -> &[PresentCall] {
        &self.calls
    }
}

impl Presenter for HeadlessPresenter {
    fn wait_draw_complete(&mut self) {
        self.calls.clear();
        self.calls.push(PresentCall::DrawSync);
    }

    fn wait_vsync(&mut self) {
        self.calls.push(PresentCall::VSync);
    }

    fn swap_buffers(&mut self) -> usize {
        self.draw_buffer ^= 1;
        self.frames += 1;
        self.calls.push(PresentCall::Swap(self.draw_buffer));
        self.draw_buffer
    }

    fn flush_overlay(&mut self, text: &str) {
        self.overlay.clear();
        self.overlay.push_str(text);
        self.calls.push(PresentCall::Overlay);
    }
}
