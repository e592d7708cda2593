//! Minimal timing diagram model: players, the current time tick, and state
//! changes recorded per player.

use super::common::{DiagramCommon, Titled};
use crate::engine::{CommandError, CommandResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerKind {
    Robust,
    Concise,
    Binary,
    Clock,
}

impl PlayerKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "robust" => Some(PlayerKind::Robust),
            "concise" => Some(PlayerKind::Concise),
            "binary" => Some(PlayerKind::Binary),
            "clock" => Some(PlayerKind::Clock),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    pub time: i64,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub code: String,
    pub display: String,
    pub kind: PlayerKind,
    pub states: Vec<StateChange>,
}

#[derive(Debug, Clone, Default)]
pub struct TimingDiagram {
    common: DiagramCommon,
    players: Vec<Player>,
    last_player: Option<usize>,
    now: i64,
}

impl Titled for TimingDiagram {
    fn common(&self) -> &DiagramCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut DiagramCommon {
        &mut self.common
    }
}

impl TimingDiagram {
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, code: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.code == code)
    }

    fn player_index(&self, code: &str) -> Option<usize> {
        self.players.iter().position(|p| p.code == code)
    }

    pub fn create_player(&mut self, kind: PlayerKind, display: &str, code: &str) -> CommandResult {
        if self.player(code).is_some() {
            return Err(CommandError::semantic(format!("Player {code} already exists")));
        }
        self.players.push(Player { code: code.to_string(), display: display.to_string(), kind, states: Vec::new() });
        Ok(())
    }

    /// Make `code` the player that player-relative commands refer to.
    pub fn set_last_player(&mut self, code: &str) -> CommandResult {
        let idx = self.player_index(code).ok_or_else(|| no_such_participant(code))?;
        self.last_player = Some(idx);
        Ok(())
    }

    pub fn last_player(&self) -> Option<&Player> {
        self.last_player.map(|idx| &self.players[idx])
    }

    pub fn set_now(&mut self, time: i64) {
        self.now = time;
    }

    pub fn now(&self) -> i64 {
        self.now
    }

    /// Record `state` for `code` at the current time.
    pub fn add_state(&mut self, code: &str, state: &str) -> CommandResult {
        let idx = self.player_index(code).ok_or_else(|| no_such_participant(code))?;
        let time = self.now;
        self.players[idx].states.push(StateChange { time, state: state.to_string() });
        Ok(())
    }

    /// Record `state` for the last referenced player at `time`.
    pub fn add_state_for_last(&mut self, time: i64, state: &str) -> CommandResult {
        let idx = self.last_player.ok_or_else(|| CommandError::semantic("No player selected"))?;
        self.players[idx].states.push(StateChange { time, state: state.to_string() });
        Ok(())
    }

    pub fn summary(&self) -> Vec<String> {
        self.players
            .iter()
            .map(|p| {
                let states: Vec<String> = p.states.iter().map(|s| format!("@{} {}", s.time, s.state)).collect();
                format!("{:?} {} \"{}\": {}", p.kind, p.code, p.display, states.join(", "))
            })
            .collect()
    }
}

fn no_such_participant(code: &str) -> CommandError {
    CommandError::semantic(format!("No such participant {code}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_player_is_rejected() {
        let mut t = TimingDiagram::default();
        t.create_player(PlayerKind::Robust, "Web", "WB").unwrap();
        let err = t.create_player(PlayerKind::Concise, "Web 2", "WB").unwrap_err();
        assert_eq!(err.message, "Player WB already exists");
    }

    #[test]
    fn states_use_current_time() {
        let mut t = TimingDiagram::default();
        t.create_player(PlayerKind::Concise, "User", "U").unwrap();
        t.set_now(100);
        t.add_state("U", "Waiting").unwrap();
        assert_eq!(t.player("U").unwrap().states, vec![StateChange { time: 100, state: "Waiting".into() }]);
    }

    #[test]
    fn relative_state_needs_a_selected_player() {
        let mut t = TimingDiagram::default();
        let err = t.add_state_for_last(0, "Idle").unwrap_err();
        assert_eq!(err.message, "No player selected");
    }
}
