use std::path::PathBuf;

use serde::Serialize;
use which::which;

use crate::config::PlayerConfig;

/// Player binaries probed when none is configured.
pub const DEFAULT_CANDIDATES: &[&str] = &["mpv", "vlc", "ffplay"];

/// An external player binary and where (or whether) it was found.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerTool {
    pub name: String,
    pub path: Option<PathBuf>,
}

impl PlayerTool {
    pub fn available(&self) -> bool {
        self.path.is_some()
    }
}

fn candidates(config: &PlayerConfig) -> Vec<String> {
    match &config.external_player {
        Some(name) => vec![name.clone()],
        None => DEFAULT_CANDIDATES.iter().map(|s| s.to_string()).collect(),
    }
}

/// Probe every candidate player binary.
pub fn check_players(config: &PlayerConfig) -> Vec<PlayerTool> {
    candidates(config)
        .into_iter()
        .map(|name| {
            let path = which(&name).ok();
            PlayerTool { name, path }
        })
        .collect()
}

/// The first available player, honoring the configured preference.
pub fn resolve_player(config: &PlayerConfig) -> Option<PlayerTool> {
    check_players(config).into_iter().find(|tool| tool.available())
}
