use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use initctx::{Script, Workbench};
use initctx_commons::{MemoryTelemetry, TelemetrySink};
use initctx_config::InitCtxConfig;
use initctx_core::ContextEvent;
use initctx_core::git_info::{parse_remote_url, workspace_remote};

#[derive(Debug, Default, Clone, Copy)]
pub struct ReplayOptions<'a> {
    /// Remote URL overriding the workspace's git remotes.
    pub remote: Option<&'a str>,
    pub json: bool,
    pub events: bool,
}

pub async fn handle_replay_command(
    config: &InitCtxConfig,
    workspace: &Path,
    script_path: &Path,
    options: ReplayOptions<'_>,
) -> Result<()> {
    let source = std::fs::read_to_string(script_path)
        .with_context(|| format!("Failed to read script {}", script_path.display()))?;
    let script: Script = source
        .parse()
        .with_context(|| format!("Invalid script {}", script_path.display()))?;

    let remote = match options.remote {
        Some(raw) => Some(
            parse_remote_url(raw)
                .ok_or_else(|| anyhow!("'{raw}' is not a remote URL with a host"))?,
        ),
        None => workspace_remote(workspace, &config.repository.preferred_remote)?,
    };

    let telemetry = Arc::new(MemoryTelemetry::<ContextEvent>::new());
    let mut bench = Workbench::start_with_telemetry(config, remote, telemetry.clone()).await?;

    let input = bench.last_chat_input();
    let mentions = bench.chat_input_mentions(input)?;
    if options.json {
        let start = serde_json::json!({
            "line": 0,
            "command": "(start)",
            "input": input.to_string(),
            "mentions": mentions,
        });
        println!("{start}");
    } else {
        println!("{:>3}  {:<24} {} [{}]", 0, "(start)", input, mentions.join(", "));
    }

    for step in script.run(&mut bench)? {
        if options.json {
            println!("{}", step.to_json());
        } else {
            println!("{step}");
        }
    }

    if options.events {
        for event in telemetry.events() {
            eprintln!("{}", serde_json::to_string(&event)?);
        }
    }
    telemetry.flush()?;
    Ok(())
}
