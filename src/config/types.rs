use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub library: LibraryConfig,

    #[serde(default)]
    pub platform: PlatformConfig,

    #[serde(default)]
    pub player: PlayerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Directory the demo clip is staged into
    #[serde(default = "default_library_dir")]
    pub dir: PathBuf,

    /// Source clip copied into the library by `playdeck stage`
    #[serde(default = "default_source_clip")]
    pub source_clip: PathBuf,

    /// File name the staged clip gets inside the library
    #[serde(default = "default_staged_name")]
    pub staged_name: String,
}

fn default_library_dir() -> PathBuf {
    PathBuf::from("./library")
}
fn default_source_clip() -> PathBuf {
    PathBuf::from("./assets/music.mp4")
}
fn default_staged_name() -> String {
    "music.mp4".to_string()
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            dir: default_library_dir(),
            source_clip: default_source_clip(),
            staged_name: default_staged_name(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlatformConfig {
    /// Whether the platform supports runtime capability prompts.
    /// When false, every capability is implicitly granted and no prompt is
    /// ever shown (legacy platform behavior).
    #[serde(default = "default_runtime_prompts")]
    pub runtime_prompts: bool,

    /// Capabilities granted before any prompt
    #[serde(default)]
    pub granted: Vec<String>,

    /// Capabilities permanently revoked by policy; these deny without prompting
    #[serde(default)]
    pub revoked: Vec<String>,

    /// Capabilities for which an explanation should be shown before re-prompting
    #[serde(default)]
    pub rationale: Vec<String>,

    /// How prompts are answered: grant, deny, or ask on the terminal
    #[serde(default)]
    pub prompt: PromptPolicy,

    /// Artificial delay before a prompt completes, in milliseconds
    #[serde(default)]
    pub prompt_delay_ms: u64,
}

fn default_runtime_prompts() -> bool {
    true
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            runtime_prompts: default_runtime_prompts(),
            granted: Vec::new(),
            revoked: Vec::new(),
            rationale: Vec::new(),
            prompt: PromptPolicy::default(),
            prompt_delay_ms: 0,
        }
    }
}

/// How the simulated platform answers a capability prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptPolicy {
    /// Grant every prompted capability
    #[default]
    Grant,
    /// Deny every prompted capability
    Deny,
    /// Ask for each capability on the terminal
    Ask,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// Preferred external player binary; auto-detected when unset
    #[serde(default)]
    pub external_player: Option<String>,
}
