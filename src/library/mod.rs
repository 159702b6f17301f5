//! Staging of the demo clip into the media library.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::LibraryConfig;

/// Outcome of a staging attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The clip was copied into the library.
    Staged { path: PathBuf, bytes: u64 },
    /// The staged clip was already present and `force` was not set.
    AlreadyStaged { path: PathBuf },
}

/// Path the demo clip is staged at for this configuration.
pub fn staged_path(config: &LibraryConfig) -> PathBuf {
    config.dir.join(&config.staged_name)
}

/// Copy the configured source clip into the library directory, creating the
/// directory if needed. An existing staged clip is left alone unless `force`
/// is set.
pub fn stage_demo_clip(config: &LibraryConfig, force: bool) -> Result<StageOutcome> {
    let target = staged_path(config);

    if target.exists() && !force {
        tracing::debug!("Demo clip already staged at {:?}", target);
        return Ok(StageOutcome::AlreadyStaged { path: target });
    }

    if !config.source_clip.exists() {
        anyhow::bail!("Source clip does not exist: {:?}", config.source_clip);
    }

    std::fs::create_dir_all(&config.dir)
        .with_context(|| format!("Failed to create library directory: {:?}", config.dir))?;

    let bytes = std::fs::copy(&config.source_clip, &target).with_context(|| {
        format!(
            "Failed to copy {:?} to {:?}",
            config.source_clip, target
        )
    })?;

    tracing::info!("Staged demo clip at {:?} ({} bytes)", target, bytes);
    Ok(StageOutcome::Staged {
        path: target,
        bytes,
    })
}
