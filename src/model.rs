//! Diagram models mutated by the bundled grammars.
//!
//! The engine itself never looks inside these types; they are the "diagram
//! model" argument threaded through every action.

mod common;
mod gantt;
mod timing;

pub use common::{DiagramCommon, HorizontalAlignment, LayoutEngine, Positioned, Titled};
pub use gantt::{GanttDiagram, Note, Task};
pub use timing::{Player, PlayerKind, StateChange, TimingDiagram};
