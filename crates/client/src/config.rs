//! Client configuration loaded from the process environment.
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Which built-in input provider drives the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    Idle,
    #[default]
    Wander,
}

impl FromStr for InputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "idle" => Ok(InputMode::Idle),
            "wander" => Ok(InputMode::Wander),
            other => Err(format!("unknown input mode: {}", other)),
        }
    }
}

/// Configuration for one client invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub session_id: Option<String>,
    pub seed: Option<u64>,
    pub config_path: Option<PathBuf>,
    pub map_path: Option<PathBuf>,
    pub save_map_path: Option<PathBuf>,
    pub max_seconds: Option<f32>,
    pub realtime: bool,
    pub record_replay: bool,
    pub replay_dir: Option<PathBuf>,
    /// Re-run a stored replay instead of starting a new session.
    pub replay_id: Option<String>,
    pub input: InputMode,
    pub json_summary: bool,
    /// Variables that were set but could not be parsed, as `KEY=value`.
    pub ignored: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            session_id: None,
            seed: None,
            config_path: None,
            map_path: None,
            save_map_path: None,
            max_seconds: Some(120.0),
            realtime: false,
            record_replay: true,
            replay_dir: None,
            replay_id: None,
            input: InputMode::default(),
            json_summary: false,
            ignored: Vec::new(),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `PURSUIT_SESSION_ID` - Session identifier for logs and replays (default: timestamp)
    /// - `PURSUIT_SEED` - Session seed (default: random)
    /// - `PURSUIT_CONFIG` - Game config TOML file
    /// - `PURSUIT_MAP` - Map layout RON file used instead of generating one
    /// - `PURSUIT_SAVE_MAP` - Write the session's map layout to this file
    /// - `PURSUIT_MAX_SECONDS` - Simulated time limit, `0` for none (default: 120)
    /// - `PURSUIT_REALTIME` - Pace ticks against the wall clock (default: false)
    /// - `PURSUIT_RECORD` - Record and save a replay (default: true)
    /// - `PURSUIT_REPLAY_OUT` - Replay directory (default: platform data dir)
    /// - `PURSUIT_REPLAY` - Replay a stored session id and exit
    /// - `PURSUIT_INPUT` - `wander` or `idle` (default: wander)
    /// - `PURSUIT_JSON` - Print the final summary as JSON
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();
        let mut ignored = Vec::new();

        config.session_id = read("PURSUIT_SESSION_ID");
        config.seed = parse_value("PURSUIT_SEED", read("PURSUIT_SEED"), &mut ignored);
        config.config_path = read("PURSUIT_CONFIG").map(PathBuf::from);
        config.map_path = read("PURSUIT_MAP").map(PathBuf::from);
        config.save_map_path = read("PURSUIT_SAVE_MAP").map(PathBuf::from);
        let max_seconds = read("PURSUIT_MAX_SECONDS");
        if let Some(seconds) =
            parse_value::<f32>("PURSUIT_MAX_SECONDS", max_seconds, &mut ignored)
        {
            config.max_seconds = (seconds > 0.0).then_some(seconds);
        }
        let realtime = read("PURSUIT_REALTIME");
        if let Some(realtime) = parse_flag("PURSUIT_REALTIME", realtime, &mut ignored) {
            config.realtime = realtime;
        }
        if let Some(record) = parse_flag("PURSUIT_RECORD", read("PURSUIT_RECORD"), &mut ignored) {
            config.record_replay = record;
        }
        config.replay_dir = read("PURSUIT_REPLAY_OUT").map(PathBuf::from);
        config.replay_id = read("PURSUIT_REPLAY");
        if let Some(input) = parse_value("PURSUIT_INPUT", read("PURSUIT_INPUT"), &mut ignored) {
            config.input = input;
        }
        if let Some(json) = parse_flag("PURSUIT_JSON", read("PURSUIT_JSON"), &mut ignored) {
            config.json_summary = json;
        }

        config.ignored = ignored;
        config
    }

    /// Session id to use, generating one from the clock when unset.
    pub fn resolved_session_id(&self) -> String {
        self.session_id.clone().unwrap_or_else(|| {
            let timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or(0);
            format!("session_{}", timestamp)
        })
    }
}

fn parse_value<T: FromStr>(
    key: &str,
    value: Option<String>,
    ignored: &mut Vec<String>,
) -> Option<T> {
    let value = value?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            ignored.push(format!("{}={}", key, value));
            None
        }
    }
}

/// Accepts `true/false`, `1/0`, `yes/no` and `on/off`.
fn parse_flag(key: &str, value: Option<String>, ignored: &mut Vec<String>) -> Option<bool> {
    let value = value?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            ignored.push(format!("{}={}", key, value));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config_from(&[]), ClientConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = config_from(&[
            ("PURSUIT_SEED", "42"),
            ("PURSUIT_MAX_SECONDS", "0"),
            ("PURSUIT_REALTIME", "yes"),
            ("PURSUIT_RECORD", "off"),
            ("PURSUIT_INPUT", "Idle"),
            ("PURSUIT_MAP", "maps/farm.ron"),
            ("PURSUIT_SESSION_ID", "  "),
        ]);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_seconds, None);
        assert!(config.realtime);
        assert!(!config.record_replay);
        assert_eq!(config.input, InputMode::Idle);
        assert_eq!(config.map_path, Some(PathBuf::from("maps/farm.ron")));
        assert_eq!(config.session_id, None);
    }

    #[test]
    fn unparsable_values_are_ignored() {
        let config = config_from(&[
            ("PURSUIT_SEED", "soon"),
            ("PURSUIT_REALTIME", "maybe"),
            ("PURSUIT_INPUT", "run"),
        ]);
        assert_eq!(config.seed, None);
        assert!(!config.realtime);
        assert_eq!(config.input, InputMode::Wander);
        assert_eq!(
            config.ignored,
            vec!["PURSUIT_SEED=soon", "PURSUIT_REALTIME=maybe", "PURSUIT_INPUT=run"]
        );
    }

    #[test]
    fn session_id_is_generated_when_missing() {
        let config = config_from(&[]);
        assert!(config.resolved_session_id().starts_with("session_"));
        let named = config_from(&[("PURSUIT_SESSION_ID", "night-run")]);
        assert_eq!(named.resolved_session_id(), "night-run");
    }
}
