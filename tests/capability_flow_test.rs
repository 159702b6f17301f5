//! Integration tests wiring the broker, policy platform, library, and player
//! together the way the CLI does.

use std::sync::Arc;

use playdeck::config::{LibraryConfig, PlatformConfig, PromptPolicy};
use playdeck::library::{self, StageOutcome};
use playdeck::platform::{caps, PolicyPlatform};
use playdeck::player::{Player, SessionStatus};
use playdeck_caps::{CapabilityBroker, Platform};

fn broker_with(config: PlatformConfig) -> CapabilityBroker {
    CapabilityBroker::new(Arc::new(PolicyPlatform::new(config)))
}

#[tokio::test]
async fn grant_policy_allows_stage_and_play() {
    let tmp = tempfile::tempdir().unwrap();
    let source = tmp.path().join("source.mp4");
    std::fs::write(&source, vec![7u8; 4096]).unwrap();
    let library_config = LibraryConfig {
        dir: tmp.path().join("library"),
        source_clip: source,
        staged_name: "music.mp4".to_string(),
    };

    let broker = broker_with(PlatformConfig::default());

    assert!(broker.request_all(&[caps::STORAGE_WRITE]).await.unwrap());
    let staged = match library::stage_demo_clip(&library_config, false).unwrap() {
        StageOutcome::Staged { path, .. } => path,
        other => panic!("Expected Staged, got: {:?}", other),
    };

    assert!(broker.request_all(&[caps::STORAGE_READ]).await.unwrap());
    let player = Player::new();
    let session = player.play(&staged).await.unwrap();
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(session.bytes_played, 4096);
}

#[tokio::test]
async fn deny_policy_blocks_playback_capabilities() {
    let broker = broker_with(PlatformConfig {
        prompt: PromptPolicy::Deny,
        ..PlatformConfig::default()
    });

    let granted = broker
        .request_all(&[caps::STORAGE_READ, caps::PLAYER_EXTERNAL])
        .await
        .unwrap();
    assert!(!granted);

    // Each outcome is individually reported, in input order.
    let outcomes = broker
        .request_each(&[caps::STORAGE_READ, caps::PLAYER_EXTERNAL])
        .await
        .unwrap();
    assert_eq!(outcomes[0].name, caps::STORAGE_READ);
    assert!(!outcomes[0].granted);
    assert_eq!(outcomes[1].name, caps::PLAYER_EXTERNAL);
    assert!(!outcomes[1].granted);
}

#[tokio::test]
async fn granted_prompt_is_remembered_by_the_platform() {
    let platform = Arc::new(PolicyPlatform::new(PlatformConfig::default()));
    let broker = CapabilityBroker::new(platform.clone());

    assert!(!platform.is_granted(caps::STORAGE_READ));
    assert!(broker.request_all(&[caps::STORAGE_READ]).await.unwrap());

    // The second request short-circuits through the oracle and the table
    // stays empty.
    assert!(platform.is_granted(caps::STORAGE_READ));
    assert!(broker.request_all(&[caps::STORAGE_READ]).await.unwrap());
    assert_eq!(broker.pending_count(), 0);
}

#[tokio::test]
async fn revoked_capability_denies_its_batch() {
    let broker = broker_with(PlatformConfig {
        revoked: vec![caps::PLAYER_EXTERNAL.to_string()],
        ..PlatformConfig::default()
    });

    let outcomes = broker
        .request_each(&[caps::STORAGE_READ, caps::PLAYER_EXTERNAL])
        .await
        .unwrap();
    // storage.read is prompted and granted by policy; player.external is
    // revoked and denies without a prompt.
    assert!(outcomes[0].granted);
    assert!(!outcomes[1].granted);

    let granted = broker
        .request_all(&[caps::STORAGE_READ, caps::PLAYER_EXTERNAL])
        .await
        .unwrap();
    assert!(!granted);
}

#[tokio::test]
async fn legacy_platform_grants_without_prompts() {
    let broker = broker_with(PlatformConfig {
        runtime_prompts: false,
        // Even a deny policy is irrelevant when prompts don't exist.
        prompt: PromptPolicy::Deny,
        ..PlatformConfig::default()
    });

    let granted = broker
        .request_all(&[caps::STORAGE_WRITE, caps::STORAGE_READ])
        .await
        .unwrap();
    assert!(granted);
    assert!(!broker.should_explain_before_requesting(&[caps::STORAGE_WRITE]));
}

#[tokio::test]
async fn rationale_follows_configured_list() {
    let broker = broker_with(PlatformConfig {
        rationale: vec![caps::STORAGE_READ.to_string()],
        ..PlatformConfig::default()
    });

    assert!(broker.should_explain_before_requesting(&[caps::STORAGE_READ]));
    assert!(!broker.should_explain_before_requesting(&["camera"]));
}
