//! End-to-end initial context scenarios against a live mock backend.

use std::sync::Arc;

use anyhow::Result;
use initctx::Workbench;
use initctx_commons::MemoryTelemetry;
use initctx_config::InitCtxConfig;
use initctx_core::git_info::parse_remote_url;
use initctx_core::{ContextEvent, GitRemote, Key, MockServer, RepositorySource, ResolvedRepository};
use pretty_assertions::assert_eq;

const REMOTE: &str = "https://codehost.example/user/myrepo.git";

fn remote() -> GitRemote {
    parse_remote_url(REMOTE).unwrap()
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn enterprise_config(server: &MockServer) -> InitCtxConfig {
    let mut config = InitCtxConfig::default();
    config.server.endpoint = Some(server.url());
    config
}

async fn enterprise_workbench(server: &MockServer) -> Result<Workbench> {
    server.register_mapping("codehost.example/user/myrepo", "codehost.example/user/myrepo");
    Workbench::start(&enterprise_config(server), Some(remote())).await
}

#[tokio::test]
async fn self_serve_repo_is_initially_present() -> Result<()> {
    let mut config = InitCtxConfig::default();
    config.repository.self_serve_hosts = vec!["codehost.example".to_string()];
    // No backend configured: resolution must not need one.
    let bench = Workbench::start(&config, Some(remote())).await?;

    let input = bench.last_chat_input();
    assert_eq!(bench.chat_input_mentions(input)?, labels(&["myrepo"]));
    assert_eq!(
        bench.repository().map(|repo| repo.source),
        Some(RepositorySource::SelfServe)
    );
    Ok(())
}

#[tokio::test]
async fn enterprise_repo_is_initially_present() -> Result<()> {
    let server = MockServer::start().await?;
    let mut bench = enterprise_workbench(&server).await?;

    let input = bench.create_empty_chat_panel();
    assert_eq!(bench.chat_input_mentions(input)?, labels(&["myrepo"]));
    assert_eq!(server.lookup_count(), 1);

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn enterprise_repo_without_mapping_is_omitted() -> Result<()> {
    let server = MockServer::start().await?;
    let mut bench = Workbench::start(&enterprise_config(&server), Some(remote())).await?;

    let input = bench.create_empty_chat_panel();
    assert!(bench.chat_input_mentions(input)?.is_empty());

    bench.open_file_in_editor_tab("main.c")?;
    assert_eq!(bench.chat_input_mentions(input)?, labels(&["main.c"]));

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn file_selection_and_tab_switches_until_first_keystroke() -> Result<()> {
    let server = MockServer::start().await?;
    let mut bench = enterprise_workbench(&server).await?;

    bench.open_file_in_editor_tab("main.c")?;
    let input = bench.create_empty_chat_panel();
    assert_eq!(bench.chat_input_mentions(input)?, labels(&["main.c", "myrepo"]));

    bench.select_line_range_in_editor_tab(2, 4)?;
    assert_eq!(
        bench.chat_input_mentions(input)?,
        labels(&["main.c", "main.c:2-4", "myrepo"])
    );

    // A new selection replaces the previous one.
    bench.select_line_range_in_editor_tab(1, 3)?;
    assert_eq!(
        bench.chat_input_mentions(input)?,
        labels(&["main.c", "main.c:1-3", "myrepo"])
    );

    bench.open_file_in_editor_tab("README.md")?;
    assert_eq!(bench.chat_input_mentions(input)?, labels(&["README.md", "myrepo"]));

    // The selection is not restored when switching back.
    bench.click_editor_tab("main.c")?;
    assert_eq!(bench.chat_input_mentions(input)?, labels(&["main.c", "myrepo"]));

    bench.press(input, Key::Char('x'))?;
    bench.click_editor_tab("README.md")?;
    assert_eq!(bench.chat_input_mentions(input)?, labels(&["main.c", "myrepo"]));
    assert_eq!(bench.chat_input(input)?.text(), "x");

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn no_open_file_shows_only_the_repository() -> Result<()> {
    let server = MockServer::start().await?;
    let mut bench = enterprise_workbench(&server).await?;

    bench.open_file_in_editor_tab("main.c")?;
    bench.close_editor_tab("main.c")?;
    let input = bench.last_chat_input();
    assert_eq!(bench.chat_input_mentions(input)?, labels(&["myrepo"]));

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn clearing_typed_text_keeps_the_input_frozen() -> Result<()> {
    let server = MockServer::start().await?;
    let mut bench = enterprise_workbench(&server).await?;

    bench.open_file_in_editor_tab("main.c")?;
    let input = bench.last_chat_input();
    bench.type_text(input, "hi")?;
    bench.press(input, Key::Backspace)?;
    bench.press(input, Key::Backspace)?;
    bench.clear_chat_text(input)?;
    assert_eq!(bench.chat_input(input)?.text(), "");

    bench.open_file_in_editor_tab("README.md")?;
    assert_eq!(bench.chat_input_mentions(input)?, labels(&["main.c", "myrepo"]));

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn new_input_tracks_after_another_one_froze() -> Result<()> {
    let server = MockServer::start().await?;
    let mut bench = enterprise_workbench(&server).await?;

    bench.open_file_in_editor_tab("main.c")?;
    let sidebar = bench.sidebar_chat_input();
    bench.press(sidebar, Key::Char('x'))?;

    let fresh = bench.create_empty_chat_panel();
    bench.open_file_in_editor_tab("README.md")?;

    assert_eq!(bench.chat_input_mentions(sidebar)?, labels(&["main.c", "myrepo"]));
    assert_eq!(bench.chat_input_mentions(fresh)?, labels(&["README.md", "myrepo"]));

    server.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn late_repository_resolution_reaches_only_tracking_inputs() -> Result<()> {
    let telemetry = Arc::new(MemoryTelemetry::<ContextEvent>::new());
    let config = InitCtxConfig::default();
    let mut bench = Workbench::start_with_telemetry(&config, None, telemetry.clone()).await?;

    bench.open_file_in_editor_tab("main.c")?;
    let frozen = bench.sidebar_chat_input();
    bench.press(frozen, Key::Enter)?;
    let tracking = bench.create_empty_chat_panel();

    let updated = bench.set_repository(Some(ResolvedRepository {
        name: "codehost.example/user/myrepo".to_string(),
        remote_url: REMOTE.to_string(),
        source: RepositorySource::Enterprise,
    }));

    assert_eq!(updated, 1);
    assert_eq!(bench.chat_input_mentions(frozen)?, labels(&["main.c"]));
    assert_eq!(bench.chat_input_mentions(tracking)?, labels(&["main.c", "myrepo"]));

    let events = telemetry.events();
    assert!(events.contains(&ContextEvent::Latched { input: frozen }));
    assert!(events.contains(&ContextEvent::Skipped { input: frozen }));
    assert_eq!(
        events.last(),
        Some(&ContextEvent::Synced {
            input: tracking,
            labels: labels(&["main.c", "myrepo"]),
        })
    );
    Ok(())
}
