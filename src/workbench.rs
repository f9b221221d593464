//! UI-automation style driver over the editor, the chat panel and the
//! initial-context synchronizer.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use initctx_commons::{NoopTelemetry, TelemetrySink};
use initctx_config::{ContextConfig, InitCtxConfig};
use initctx_core::{
    ChatInput, ChatInputId, ChatPanel, ContextEvent, EditorSurface, GitRemote, InitialContextSync,
    Key, LineRange, ResolvedRepository, resolver_from_config,
};
use tracing::debug;

/// One editor, one chat panel, one synchronizer. The panel always has the
/// sidebar input, created when the workbench is.
pub struct Workbench {
    editor: EditorSurface,
    panel: ChatPanel,
    sync: InitialContextSync,
    sidebar: ChatInputId,
}

impl Workbench {
    pub fn new(policy: ContextConfig) -> Self {
        Self::with_telemetry(policy, Arc::new(NoopTelemetry))
    }

    pub fn with_telemetry(
        policy: ContextConfig,
        telemetry: Arc<dyn TelemetrySink<ContextEvent>>,
    ) -> Self {
        Self::with_repository(policy, telemetry, None)
    }

    fn with_repository(
        policy: ContextConfig,
        telemetry: Arc<dyn TelemetrySink<ContextEvent>>,
        repository: Option<ResolvedRepository>,
    ) -> Self {
        let editor = EditorSurface::new();
        let mut panel = ChatPanel::new();
        let mut sync = InitialContextSync::with_telemetry(policy, telemetry);
        sync.set_repository(repository);
        let sidebar = sync.attach_input(&mut panel, &editor.focus_state());
        Self {
            editor,
            panel,
            sync,
            sidebar,
        }
    }

    /// Resolves `remote` with the resolvers `config` describes, then builds a
    /// workbench whose sidebar input already shows the repository.
    pub async fn start(config: &InitCtxConfig, remote: Option<GitRemote>) -> Result<Self> {
        Self::start_with_telemetry(config, remote, Arc::new(NoopTelemetry)).await
    }

    pub async fn start_with_telemetry(
        config: &InitCtxConfig,
        remote: Option<GitRemote>,
        telemetry: Arc<dyn TelemetrySink<ContextEvent>>,
    ) -> Result<Self> {
        config.validate().context("invalid initctx configuration")?;
        let repository = match remote {
            Some(remote) => resolver_from_config(config).resolve_or_none(&remote).await,
            None => None,
        };
        debug!(
            repository = repository.as_ref().map(|repo| repo.name.as_str()),
            "workbench starting"
        );
        Ok(Self::with_repository(config.context, telemetry, repository))
    }

    /// Delivers a late repository resolution. Returns how many inputs
    /// picked it up.
    pub fn set_repository(&mut self, repository: Option<ResolvedRepository>) -> usize {
        let focus = self.editor.focus_state();
        self.sync
            .on_repository_resolved(&mut self.panel, &focus, repository)
    }

    pub fn repository(&self) -> Option<&ResolvedRepository> {
        self.sync.repository()
    }

    pub fn editor(&self) -> &EditorSurface {
        &self.editor
    }

    fn refresh(&mut self) -> usize {
        let focus = self.editor.focus_state();
        self.sync.on_focus_changed(&mut self.panel, &focus)
    }

    pub fn open_file_in_editor_tab(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let event = self.editor.open_file(path)?;
        debug!(?event, "editor");
        self.refresh();
        Ok(())
    }

    pub fn click_editor_tab(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let event = self.editor.activate_tab(path)?;
        debug!(?event, "editor");
        self.refresh();
        Ok(())
    }

    /// Selects the 1-based inclusive range `start..=end` in the active tab.
    pub fn select_line_range_in_editor_tab(&mut self, start: u32, end: u32) -> Result<()> {
        let event = self.editor.select_lines(LineRange::new(start, end))?;
        debug!(?event, "editor");
        self.refresh();
        Ok(())
    }

    pub fn clear_selection(&mut self) -> Result<()> {
        let event = self.editor.clear_selection()?;
        debug!(?event, "editor");
        self.refresh();
        Ok(())
    }

    pub fn close_editor_tab(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let event = self.editor.close_tab(path)?;
        debug!(?event, "editor");
        self.refresh();
        Ok(())
    }

    /// Opens a new chat and returns its input, populated with the current
    /// context.
    pub fn create_empty_chat_panel(&mut self) -> ChatInputId {
        let focus = self.editor.focus_state();
        self.sync.attach_input(&mut self.panel, &focus)
    }

    pub fn sidebar_chat_input(&self) -> ChatInputId {
        self.sidebar
    }

    pub fn last_chat_input(&self) -> ChatInputId {
        self.panel
            .last_input()
            .map(ChatInput::id)
            .unwrap_or(self.sidebar)
    }

    pub fn press(&mut self, input: ChatInputId, key: Key) -> Result<()> {
        self.sync.on_keystroke(&mut self.panel, input, key)?;
        Ok(())
    }

    pub fn type_text(&mut self, input: ChatInputId, text: &str) -> Result<()> {
        for c in text.chars() {
            self.press(input, Key::Char(c))?;
        }
        Ok(())
    }

    pub fn remove_mention(&mut self, input: ChatInputId, label: &str) -> Result<bool> {
        Ok(self.sync.on_mention_removed(&mut self.panel, input, label)?)
    }

    pub fn clear_chat_text(&mut self, input: ChatInputId) -> Result<()> {
        self.panel.input_mut(input)?.clear_text();
        Ok(())
    }

    /// Mention labels as rendered in the input, e.g. `["main.c", "myrepo"]`.
    pub fn chat_input_mentions(&self, input: ChatInputId) -> Result<Vec<String>> {
        Ok(self.panel.input(input)?.mention_labels())
    }

    pub fn chat_input(&self, input: ChatInputId) -> Result<&ChatInput> {
        Ok(self.panel.input(input)?)
    }
}
