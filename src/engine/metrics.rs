//! Parse run metrics.
//!
//! Small counters and timings collected by the parse driver (`api.rs`) for
//! every pass. They are cheap to collect and always returned inside
//! `ParseOutcome`, which makes them handy for the CLI report and for tests
//! asserting that a pass did (or skipped) what it should.

use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for the whole parse.
    pub total: Duration,
    /// One entry per pass that started.
    pub passes: Vec<PassMetrics>,
}

impl RunMetrics {
    pub fn executed(&self) -> usize {
        self.passes.iter().map(|p| p.executed).sum()
    }

    pub fn errors(&self) -> usize {
        self.passes.iter().map(|p| p.errors).sum()
    }
}

/// Counters for a single pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PassMetrics {
    /// 1-based pass number.
    pub pass: u32,
    pub duration: Duration,
    /// Commands whose action ran successfully.
    pub executed: usize,
    /// Commands matched but inactive on this pass.
    pub skipped: usize,
    /// Blank and comment lines passed over.
    pub ignored: usize,
    /// Dispatches that returned an error.
    pub errors: usize,
}
