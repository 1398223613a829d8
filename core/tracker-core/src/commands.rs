//! Command identifiers hosts can invoke.

use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerCommand {
    /// "Today's coding time" snapshot.
    ShowTime,
    /// Every day in the ledger, newest first.
    ShowStats,
}

/// Maps configured identifiers to commands.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    bindings: Vec<(String, TrackerCommand)>,
}

impl CommandRegistry {
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self {
            bindings: vec![
                (config.show_time_command.clone(), TrackerCommand::ShowTime),
                (config.show_stats_command.clone(), TrackerCommand::ShowStats),
            ],
        }
    }

    pub fn resolve(&self, command_id: &str) -> Result<TrackerCommand> {
        self.bindings
            .iter()
            .find(|(id, _)| id == command_id)
            .map(|(_, command)| *command)
            .ok_or_else(|| TrackerError::UnknownCommand(command_id.to_string()))
    }

    pub fn id_of(&self, command: TrackerCommand) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(_, c)| *c == command)
            .map(|(id, _)| id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_default_identifiers() {
        let registry = CommandRegistry::from_config(&TrackerConfig::default());
        assert_eq!(
            registry.resolve("cb-code-tracker.showTime").unwrap(),
            TrackerCommand::ShowTime
        );
        assert_eq!(
            registry.resolve("cb-code-tracker.showStats").unwrap(),
            TrackerCommand::ShowStats
        );
    }

    #[test]
    fn honors_configured_identifiers() {
        let config = TrackerConfig {
            show_stats_command: "tracker.stats".to_string(),
            ..TrackerConfig::default()
        };
        let registry = CommandRegistry::from_config(&config);
        assert_eq!(
            registry.resolve("tracker.stats").unwrap(),
            TrackerCommand::ShowStats
        );
        assert_eq!(registry.id_of(TrackerCommand::ShowStats), Some("tracker.stats"));
        assert!(registry.resolve("cb-code-tracker.showStats").is_err());
    }

    #[test]
    fn unknown_identifier_is_an_error() {
        let registry = CommandRegistry::from_config(&TrackerConfig::default());
        assert!(matches!(
            registry.resolve("nope"),
            Err(TrackerError::UnknownCommand(id)) if id == "nope"
        ));
    }
}
