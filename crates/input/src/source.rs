use crate::pad::PadReport;

/// Anything that yields one pad report per tick.
pub trait InputSource {
    fn poll(&mut self) -> PadReport;
}

/// Replays a fixed list of reports, wrapping at the end.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    reports: Vec<PadReport>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn new(reports: Vec<PadReport>) -> Self {
        Self { reports, cursor: 0 }
    }

    /// Idle report forever.
    pub fn idle() -> Self {
        Self::new(vec![PadReport::idle()])
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> PadReport {
        let Some(report) = self.reports.get(self.cursor).copied() else {
            return PadReport::idle();
        };
        self.cursor = (self.cursor + 1) % self.reports.len();
        report
    }
}
