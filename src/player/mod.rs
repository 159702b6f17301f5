//! Built-in playback and external player hand-off.
//!
//! The built-in player streams the clip's bytes to completion and emits
//! lifecycle events over a broadcast channel, the way a playback surface
//! fires prepare/progress/completion callbacks. External playback hands the
//! clip to a system player binary and waits for it to exit.

mod external;

pub use external::{check_players, resolve_player, PlayerTool, DEFAULT_CANDIDATES};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tokio::sync::broadcast;
use uuid::Uuid;

const CHUNK_SIZE: usize = 64 * 1024;

/// Lifecycle events emitted while a clip plays.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlayerEvent {
    /// The clip was located and sized; playback is about to start.
    Prepared { session_id: Uuid, bytes: u64 },
    /// Playback started.
    Started { session_id: Uuid },
    /// Coarse playback position, in percent of the clip.
    Progress { session_id: Uuid, percent: u8 },
    /// Playback ran to completion.
    Completed { session_id: Uuid },
    /// Playback failed.
    Failed { session_id: Uuid, error: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Preparing,
    Playing,
    Completed,
    Failed,
}

/// Record of one playback attempt.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackSession {
    pub id: Uuid,
    pub clip: PathBuf,
    pub status: SessionStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub bytes_played: u64,
}

impl PlaybackSession {
    fn new(clip: &Path) -> Self {
        Self {
            id: Uuid::new_v4(),
            clip: clip.to_path_buf(),
            status: SessionStatus::Preparing,
            started_at: None,
            completed_at: None,
            bytes_played: 0,
        }
    }

    fn start(&mut self) {
        self.status = SessionStatus::Playing;
        self.started_at = Some(Utc::now());
    }

    fn complete(&mut self, bytes: u64) {
        self.status = SessionStatus::Completed;
        self.bytes_played = bytes;
        self.completed_at = Some(Utc::now());
    }

    fn fail(&mut self) {
        self.status = SessionStatus::Failed;
        self.completed_at = Some(Utc::now());
    }
}

/// Demo media player.
pub struct Player {
    event_tx: broadcast::Sender<PlayerEvent>,
}

impl Player {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self { event_tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.event_tx.subscribe()
    }

    fn emit(&self, event: PlayerEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::debug!("No subscribers for player event");
        }
    }

    /// Stream `clip` to completion with the built-in player.
    pub async fn play(&self, clip: &Path) -> Result<PlaybackSession> {
        let mut session = PlaybackSession::new(clip);

        let total = match tokio::fs::metadata(clip).await {
            Ok(meta) => meta.len(),
            Err(e) => {
                session.fail();
                self.emit(PlayerEvent::Failed {
                    session_id: session.id,
                    error: e.to_string(),
                });
                return Err(e).with_context(|| format!("Failed to prepare clip: {:?}", clip));
            }
        };
        self.emit(PlayerEvent::Prepared {
            session_id: session.id,
            bytes: total,
        });

        session.start();
        self.emit(PlayerEvent::Started {
            session_id: session.id,
        });
        tracing::info!("Playing {:?} ({} bytes)", clip, total);

        match self.stream_clip(clip, total, session.id).await {
            Ok(bytes) => {
                session.complete(bytes);
                self.emit(PlayerEvent::Completed {
                    session_id: session.id,
                });
                tracing::info!("Playback complete: {:?}", clip);
                Ok(session)
            }
            Err(e) => {
                session.fail();
                self.emit(PlayerEvent::Failed {
                    session_id: session.id,
                    error: e.to_string(),
                });
                Err(e).with_context(|| format!("Playback failed: {:?}", clip))
            }
        }
    }

    /// Hand `clip` to an external player process and wait for it to exit.
    pub async fn play_external(&self, tool: &PlayerTool, clip: &Path) -> Result<PlaybackSession> {
        let mut session = PlaybackSession::new(clip);

        let path = tool
            .path
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Player '{}' is not installed", tool.name))?;

        let total = tokio::fs::metadata(clip)
            .await
            .with_context(|| format!("Failed to prepare clip: {:?}", clip))?
            .len();
        self.emit(PlayerEvent::Prepared {
            session_id: session.id,
            bytes: total,
        });

        session.start();
        self.emit(PlayerEvent::Started {
            session_id: session.id,
        });
        tracing::info!("Launching {} for {:?}", tool.name, clip);

        let status = tokio::process::Command::new(path)
            .arg(clip)
            .status()
            .await
            .with_context(|| format!("Failed to launch player: {}", tool.name))?;

        if status.success() {
            session.complete(total);
            self.emit(PlayerEvent::Completed {
                session_id: session.id,
            });
            Ok(session)
        } else {
            session.fail();
            self.emit(PlayerEvent::Failed {
                session_id: session.id,
                error: format!("{} exited with {}", tool.name, status),
            });
            anyhow::bail!("{} exited with {}", tool.name, status)
        }
    }

    async fn stream_clip(
        &self,
        clip: &Path,
        total: u64,
        session_id: Uuid,
    ) -> std::io::Result<u64> {
        let file = tokio::fs::File::open(clip).await?;
        let mut reader = tokio::io::BufReader::new(file);
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut played: u64 = 0;
        let mut last_percent: u8 = 0;

        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            played += n as u64;

            // Coarse position callbacks at roughly 10% steps.
            let percent = if total == 0 {
                100
            } else {
                (played.min(total) * 100 / total) as u8
            };
            if percent / 10 > last_percent / 10 {
                last_percent = percent;
                self.emit(PlayerEvent::Progress {
                    session_id,
                    percent,
                });
            }
        }

        Ok(played)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}
