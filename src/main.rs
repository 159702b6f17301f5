mod cli;

use playdeck::{
    config, library,
    platform::{self, caps},
    player,
};
use playdeck_caps::CapabilityBroker;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "playdeck=trace,playdeck_caps=trace".to_string()
        } else {
            "playdeck=info,playdeck_caps=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Stage { force } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(stage(cli.config.as_deref(), force))
        }
        Commands::Play { file, external } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(play(cli.config.as_deref(), file, external))
        }
        Commands::Caps {
            names,
            rationale,
            json,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(request_caps(cli.config.as_deref(), names, rationale, json))
        }
        Commands::CheckPlayers => check_players(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("playdeck {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// One broker per process, shared by every flow that needs a capability.
fn broker_for(config: &config::Config) -> CapabilityBroker {
    let platform = Arc::new(platform::PolicyPlatform::new(config.platform.clone()));
    CapabilityBroker::new(platform)
}

fn print_denied_help(names: &[&str]) {
    println!("Capability request denied: {}", names.join(", "));
    println!("Grant capabilities in the [platform] section of your config file:");
    println!("add the name to `granted`, or set `prompt = \"grant\"`.");
}

async fn stage(config_path: Option<&Path>, force: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let broker = broker_for(&config);

    if !broker.request_all(&[caps::STORAGE_WRITE]).await? {
        print_denied_help(&[caps::STORAGE_WRITE]);
        anyhow::bail!("capability denied: {}", caps::STORAGE_WRITE);
    }

    match library::stage_demo_clip(&config.library, force)? {
        library::StageOutcome::Staged { path, bytes } => {
            println!("Staged demo clip: {} ({} bytes)", path.display(), bytes);
        }
        library::StageOutcome::AlreadyStaged { path } => {
            println!("Demo clip already staged: {}", path.display());
            println!("Use --force to re-copy it.");
        }
    }

    Ok(())
}

async fn play(config_path: Option<&Path>, file: Option<std::path::PathBuf>, external: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let broker = broker_for(&config);

    let clip = file.unwrap_or_else(|| library::staged_path(&config.library));
    if !clip.exists() {
        anyhow::bail!(
            "Clip does not exist: {:?} (run `playdeck stage` first)",
            clip
        );
    }

    let mut needed = vec![caps::STORAGE_READ];
    if external {
        needed.push(caps::PLAYER_EXTERNAL);
    }

    if broker.should_explain_before_requesting(&needed) {
        println!(
            "Playback needs the following capabilities to read the staged clip: {}",
            needed.join(", ")
        );
    }

    if !broker.request_all(&needed).await? {
        print_denied_help(&needed);
        anyhow::bail!("capability denied: {}", needed.join(", "));
    }

    let player = player::Player::new();
    let mut events = player.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                player::PlayerEvent::Prepared { bytes, .. } => {
                    println!("Prepared ({} bytes)", bytes);
                }
                player::PlayerEvent::Started { .. } => println!("Playing..."),
                player::PlayerEvent::Progress { percent, .. } => println!("  {}%", percent),
                player::PlayerEvent::Completed { .. } => println!("Playback complete"),
                player::PlayerEvent::Failed { error, .. } => {
                    println!("Playback failed: {}", error);
                }
            }
        }
    });

    let result = if external {
        match player::resolve_player(&config.player) {
            Some(tool) => player.play_external(&tool, &clip).await,
            None => {
                anyhow::bail!(
                    "No external player found (checked: {})",
                    player::DEFAULT_CANDIDATES.join(", ")
                )
            }
        }
    } else {
        player.play(&clip).await
    };

    // Dropping the player closes the event channel and ends the printer.
    drop(player);
    let _ = printer.await;

    let session = result?;
    println!("Session {} finished: {:?}", session.id, session.status);
    Ok(())
}

async fn request_caps(
    config_path: Option<&Path>,
    names: Vec<String>,
    rationale: bool,
    json: bool,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let broker = broker_for(&config);

    if rationale {
        let explain = broker.should_explain_before_requesting(&names);
        if json {
            println!("{}", serde_json::json!({ "show_rationale": explain }));
        } else {
            println!("Show rationale first: {}", explain);
        }
        return Ok(());
    }

    let outcomes = broker.request_each(&names).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        for cap in &outcomes {
            let mark = if cap.granted { "✓" } else { "✗" };
            println!("{} {}", mark, cap.name);
        }
        println!();
        if outcomes.iter().all(|cap| cap.granted) {
            println!("All capabilities granted.");
        } else {
            println!("Some capabilities were denied.");
        }
    }

    Ok(())
}

fn check_players(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    println!("Checking external players...\n");

    let tools = player::check_players(&config.player);
    let mut any = false;

    for tool in &tools {
        let status = if tool.available() {
            any = true;
            "✓"
        } else {
            "✗"
        };

        print!("{} {}", status, tool.name);
        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }
        println!();
    }

    println!();
    if any {
        println!("External playback is available.");
    } else {
        println!("No external players found. Built-in playback still works.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Library dir: {:?}", config.library.dir);
            println!("  Source clip: {:?}", config.library.source_clip);
            println!("  Runtime prompts: {}", config.platform.runtime_prompts);
            println!("  Pre-granted: {}", config.platform.granted.len());
            println!("  Revoked: {}", config.platform.revoked.len());
            println!("  Prompt policy: {:?}", config.platform.prompt);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Library dir: {:?}", config.library.dir);
            println!("  Prompt policy: {:?}", config.platform.prompt);
        }
    }

    Ok(())
}
