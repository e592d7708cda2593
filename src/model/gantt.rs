//! Minimal Gantt chart model: tasks, their durations and dependencies, and
//! notes attached below them.

use super::common::{DiagramCommon, Titled};
use crate::engine::{CommandError, CommandResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub name: String,
    pub duration_days: u32,
    /// Task this one starts after.
    pub starts_after: Option<String>,
    pub fill_color: Option<String>,
    pub line_color: Option<String>,
}

impl Task {
    fn new(name: &str) -> Self {
        Task { name: name.to_string(), duration_days: 0, starts_after: None, fill_color: None, line_color: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub lines: Vec<String>,
    /// Task the note sits under: the last task declared before it.
    pub task: Option<String>,
    pub tags: Vec<String>,
    pub stereotype: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GanttDiagram {
    common: DiagramCommon,
    tasks: Vec<Task>,
    notes: Vec<Note>,
    last_task: Option<usize>,
}

impl Titled for GanttDiagram {
    fn common(&self) -> &DiagramCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut DiagramCommon {
        &mut self.common
    }
}

impl GanttDiagram {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name == name)
    }

    fn task_index(&self, name: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.name == name)
    }

    fn get_or_create(&mut self, name: &str) -> usize {
        match self.task_index(name) {
            Some(idx) => idx,
            None => {
                self.tasks.push(Task::new(name));
                self.tasks.len() - 1
            }
        }
    }

    /// Declare `name` (or update it) with a duration; it becomes the last task.
    pub fn set_duration(&mut self, name: &str, days: u32) {
        let idx = self.get_or_create(name);
        self.tasks[idx].duration_days = days;
        self.last_task = Some(idx);
    }

    pub fn last_task(&self) -> Option<&Task> {
        self.last_task.map(|idx| &self.tasks[idx])
    }

    /// Add a note under the last declared task.
    pub fn add_note(&mut self, lines: Vec<String>, tags: Vec<String>, stereotype: Option<String>) -> CommandResult {
        if lines.is_empty() {
            return Err(CommandError::semantic("No note defined"));
        }
        let task = self.last_task().map(|t| t.name.clone());
        self.notes.push(Note { lines, task, tags, stereotype });
        Ok(())
    }

    /// `task` starts when `after` ends. Both must exist.
    pub fn set_starts_after(&mut self, task: &str, after: &str) -> CommandResult {
        let idx = self.task_index(task).ok_or_else(|| no_such_task(task))?;
        self.task_index(after).ok_or_else(|| no_such_task(after))?;
        self.tasks[idx].starts_after = Some(after.to_string());
        Ok(())
    }

    pub fn set_colors(&mut self, task: &str, fill: &str, line: Option<&str>) -> CommandResult {
        let idx = self.task_index(task).ok_or_else(|| no_such_task(task))?;
        let task = &mut self.tasks[idx];
        task.fill_color = Some(fill.to_string());
        task.line_color = line.map(str::to_string);
        Ok(())
    }

    /// Day offset at which `name` starts, following `starts_after` links.
    /// `None` for unknown tasks, cycles, and offsets past `u32::MAX` days.
    pub fn start_day(&self, name: &str) -> Option<u32> {
        let mut day: u32 = 0;
        let mut current = self.task(name)?;
        let mut hops = 0;
        while let Some(after) = &current.starts_after {
            current = self.task(after)?;
            day = day.checked_add(current.duration_days)?;
            hops += 1;
            if hops > self.tasks.len() {
                // cyclic dependency
                return None;
            }
        }
        Some(day)
    }

    pub fn summary(&self) -> Vec<String> {
        let mut out = Vec::new();
        for task in &self.tasks {
            let start = self.start_day(&task.name).map_or_else(|| "?".to_string(), |d| d.to_string());
            let mut line = format!("task [{}] day {} for {} day(s)", task.name, start, task.duration_days);
            if let Some(after) = &task.starts_after {
                line.push_str(&format!(" after [{after}]"));
            }
            if let Some(fill) = &task.fill_color {
                line.push_str(&format!(" colored {fill}"));
                if let Some(stroke) = &task.line_color {
                    line.push_str(&format!("/{stroke}"));
                }
            }
            out.push(line);
        }
        for note in &self.notes {
            let under = note.task.as_deref().unwrap_or("-");
            out.push(format!("note under [{under}]: {}", note.lines.join(" / ")));
        }
        out
    }
}

fn no_such_task(name: &str) -> CommandError {
    CommandError::semantic(format!("No such task {name}"))
}
