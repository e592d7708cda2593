//! Multi-pass control.
//!
//! The same source is dispatched once per pass. Commands that need
//! information declared later in the file (forward references) are bound to a
//! later pass with [`Passes::From`]; commands that must only take effect once
//! are bound with [`Passes::Only`].
//!
//! ```text
//! pass 1: declare players      @WB (skipped)      WB is Idle (skipped)
//! pass 2: declare (skipped)    @WB -> resolved    WB is Idle -> recorded
//! ```
//!
//! Nothing is cached between passes; the diagram model accumulates whatever
//! each pass's active commands do.

use super::lines::LineBuffer;
use super::result::PassError;

/// Pass applicability of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Passes {
    #[default]
    Every,
    Only(u32),
    From(u32),
}

impl Passes {
    pub const fn is_active(self, pass: u32) -> bool {
        match self {
            Passes::Every => true,
            Passes::Only(p) => pass == p,
            Passes::From(p) => pass >= p,
        }
    }

    /// The pass number this applicability refers to, if any.
    pub const fn bound(self) -> Option<u32> {
        match self {
            Passes::Every => None,
            Passes::Only(p) | Passes::From(p) => Some(p),
        }
    }
}

/// Tracks the current pass of one parse run.
#[derive(Debug, Clone)]
pub struct PassController {
    current: u32,
    total: u32,
    aborted: bool,
}

impl PassController {
    /// A controller for `total` passes, starting at pass 1. `total` is at
    /// least 1.
    pub fn new(total: u32) -> Self {
        PassController { current: 1, total: total.max(1), aborted: false }
    }

    pub fn for_registry<D>(registry: &super::CommandRegistry<D>) -> Self {
        Self::new(registry.passes())
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn is_last(&self) -> bool {
        self.current == self.total
    }

    pub fn is_active(&self, passes: Passes) -> bool {
        passes.is_active(self.current)
    }

    /// Record a fatal error; no further pass may start.
    pub fn abort(&mut self) {
        self.aborted = true;
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Move to the next pass and rewind `buffer`.
    ///
    /// Only legal once the buffer is fully consumed and nothing fatal
    /// happened during the current pass.
    pub fn advance(&mut self, buffer: &mut LineBuffer) -> Result<u32, PassError> {
        if self.aborted {
            return Err(PassError::Aborted { pass: self.current });
        }
        if !buffer.is_exhausted() {
            return Err(PassError::ResidualInput { pass: self.current, remaining: buffer.remaining() });
        }
        if self.is_last() {
            return Err(PassError::Finished { total: self.total });
        }
        self.current += 1;
        buffer.rewind();
        tracing::debug!(pass = self.current, total = self.total, "starting pass");
        Ok(self.current)
    }
}
