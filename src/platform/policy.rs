use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use playdeck_caps::{Platform, PromptCompletion};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::{PlatformConfig, PromptPolicy};

/// A [`Platform`] whose answers come from configuration.
///
/// Oracle queries consult the configured `granted` / `revoked` / `rationale`
/// lists; prompts are answered by the configured [`PromptPolicy`]. Prompt
/// decisions are remembered for the life of the process, so a capability
/// granted at a prompt reports as granted from then on and is never prompted
/// again.
pub struct PolicyPlatform {
    config: PlatformConfig,
    /// Outcomes of prompts answered earlier in this process.
    decisions: RwLock<HashMap<String, bool>>,
}

impl PolicyPlatform {
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            config,
            decisions: RwLock::new(HashMap::new()),
        }
    }

    async fn answer_prompt(&self, name: &str) -> bool {
        // Policy revocations win over any prompt answer.
        if self.is_revoked(name) {
            return false;
        }

        match self.config.prompt {
            PromptPolicy::Grant => true,
            PromptPolicy::Deny => false,
            PromptPolicy::Ask => ask_on_terminal(name).await,
        }
    }
}

#[async_trait]
impl Platform for PolicyPlatform {
    fn supports_runtime_prompts(&self) -> bool {
        self.config.runtime_prompts
    }

    fn is_granted(&self, name: &str) -> bool {
        self.config.granted.iter().any(|n| n == name)
            || self.decisions.read().get(name).copied() == Some(true)
    }

    fn is_revoked(&self, name: &str) -> bool {
        self.config.revoked.iter().any(|n| n == name)
    }

    fn should_show_rationale(&self, name: &str) -> bool {
        self.config.rationale.iter().any(|n| n == name)
    }

    async fn request_capabilities(&self, names: Vec<String>) -> PromptCompletion {
        if self.config.prompt_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.prompt_delay_ms)).await;
        }

        let mut completion = PromptCompletion::new();
        for name in names {
            let granted = self.answer_prompt(&name).await;
            tracing::debug!(capability = %name, granted, "prompt answered");
            self.decisions.write().insert(name.clone(), granted);
            completion.push(name, granted);
        }
        completion
    }
}

/// Ask the user to allow one capability on the terminal. Anything other than
/// an explicit yes counts as a denial.
async fn ask_on_terminal(name: &str) -> bool {
    print!("Allow capability '{}'? [y/N] ", name);
    if std::io::stdout().flush().is_err() {
        return false;
    }

    let mut line = String::new();
    let mut reader = BufReader::new(tokio::io::stdin());
    match reader.read_line(&mut line).await {
        Ok(_) => matches!(line.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}
