use anyhow::{Context, Result, bail};
use initctx_core::MockServer;

pub async fn handle_mock_server_command(port: u16, mappings: &[String]) -> Result<()> {
    let server = MockServer::start_on(port).await?;

    for raw in mappings {
        let Some((remote, name)) = raw.split_once('=') else {
            server.shutdown().await;
            bail!("Mapping `{raw}` must use the form REMOTE=NAME");
        };
        server.register_mapping(remote.trim(), name.trim());
    }

    println!("{}", server.url());
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    tracing::info!("stopping mock backend");
    server.shutdown().await;
    Ok(())
}
