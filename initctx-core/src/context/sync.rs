use std::sync::Arc;

use initctx_commons::{NoopTelemetry, TelemetrySink};
use initctx_config::ContextConfig;
use serde::Serialize;
use tracing::{debug, warn};

use crate::chat::{ChatError, ChatInputId, ChatPanel, Key};
use crate::editor::EditorFocusState;
use crate::mention::ContextMention;
use crate::repository::ResolvedRepository;

/// Emitted for every decision the synchronizer makes about a chat input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ContextEvent {
    Synced {
        input: ChatInputId,
        labels: Vec<String>,
    },
    /// The input was left alone because the user already edited it.
    Skipped { input: ChatInputId },
    /// The user's first edit stopped tracking for the input.
    Latched { input: ChatInputId },
}

/// Projects editor focus and the resolved repository into mentions, ordered
/// `[file, selection, repository]`.
pub fn compute_initial_context(
    focus: &EditorFocusState,
    repository: Option<&ResolvedRepository>,
    policy: &ContextConfig,
) -> Vec<ContextMention> {
    let mut mentions = Vec::with_capacity(3);

    if let Some(path) = &focus.active_file {
        if policy.include_file {
            mentions.push(ContextMention::file(path.clone()));
        }
        if policy.include_selection {
            if let Some(range) = focus.selection {
                mentions.push(ContextMention::selection(path.clone(), range));
            }
        }
    }

    if policy.include_repository {
        if let Some(repository) = repository {
            mentions.push(ContextMention::repository(repository.name.clone()));
        }
    }

    mentions
}

/// Keeps the chat inputs of a panel in step with the editor until each one
/// is edited by the user.
pub struct InitialContextSync {
    policy: ContextConfig,
    repository: Option<ResolvedRepository>,
    telemetry: Arc<dyn TelemetrySink<ContextEvent>>,
}

impl InitialContextSync {
    pub fn new(policy: ContextConfig) -> Self {
        Self::with_telemetry(policy, Arc::new(NoopTelemetry))
    }

    pub fn with_telemetry(
        policy: ContextConfig,
        telemetry: Arc<dyn TelemetrySink<ContextEvent>>,
    ) -> Self {
        Self {
            policy,
            repository: None,
            telemetry,
        }
    }

    pub fn repository(&self) -> Option<&ResolvedRepository> {
        self.repository.as_ref()
    }

    pub fn policy(&self) -> &ContextConfig {
        &self.policy
    }

    pub fn compute(&self, focus: &EditorFocusState) -> Vec<ContextMention> {
        compute_initial_context(focus, self.repository.as_ref(), &self.policy)
    }

    /// Creates a new chat input already populated with the current context.
    pub fn attach_input(&self, panel: &mut ChatPanel, focus: &EditorFocusState) -> ChatInputId {
        let id = panel.create_input();
        let mentions = self.compute(focus);
        let labels: Vec<String> = mentions.iter().map(ContextMention::label).collect();
        if let Ok(input) = panel.input_mut(id) {
            input.sync_initial_context(mentions);
        }
        debug!(input = %id, ?labels, "attached chat input");
        self.emit(ContextEvent::Synced { input: id, labels });
        id
    }

    /// Recomputes the context for every input the user has not edited yet.
    /// Returns how many inputs were updated.
    pub fn on_focus_changed(&self, panel: &mut ChatPanel, focus: &EditorFocusState) -> usize {
        let mentions = self.compute(focus);
        let labels: Vec<String> = mentions.iter().map(ContextMention::label).collect();

        let mut events = Vec::new();
        for input in panel.inputs_mut() {
            if input.sync_initial_context(mentions.clone()) {
                events.push(ContextEvent::Synced {
                    input: input.id(),
                    labels: labels.clone(),
                });
            } else {
                events.push(ContextEvent::Skipped { input: input.id() });
            }
        }

        let updated = events
            .iter()
            .filter(|event| matches!(event, ContextEvent::Synced { .. }))
            .count();
        debug!(updated, skipped = events.len() - updated, ?labels, "focus changed");
        for event in events {
            self.emit(event);
        }
        updated
    }

    /// Stores a repository whose resolution finished after inputs were
    /// created, and re-syncs the inputs that are still tracking.
    pub fn on_repository_resolved(
        &mut self,
        panel: &mut ChatPanel,
        focus: &EditorFocusState,
        repository: Option<ResolvedRepository>,
    ) -> usize {
        self.set_repository(repository);
        self.on_focus_changed(panel, focus)
    }

    pub fn set_repository(&mut self, repository: Option<ResolvedRepository>) {
        debug!(
            repository = repository.as_ref().map(|repo| repo.name.as_str()),
            "repository updated"
        );
        self.repository = repository;
    }

    /// Delivers a key press to an input. The first one stops tracking.
    pub fn on_keystroke(
        &self,
        panel: &mut ChatPanel,
        id: ChatInputId,
        key: Key,
    ) -> Result<(), ChatError> {
        let input = panel.input_mut(id)?;
        let was_tracking = input.is_tracking();
        input.press_key(key);
        if was_tracking {
            debug!(input = %id, "user edited chat input; initial context frozen");
            self.emit(ContextEvent::Latched { input: id });
        }
        Ok(())
    }

    /// Removes a mention chip from an input on the user's behalf.
    pub fn on_mention_removed(
        &self,
        panel: &mut ChatPanel,
        id: ChatInputId,
        label: &str,
    ) -> Result<bool, ChatError> {
        let input = panel.input_mut(id)?;
        let was_tracking = input.is_tracking();
        let removed = input.remove_mention(label);
        if removed && was_tracking {
            self.emit(ContextEvent::Latched { input: id });
        }
        Ok(removed)
    }

    fn emit(&self, event: ContextEvent) {
        if let Err(error) = self.telemetry.record(&event) {
            warn!(%error, "failed to record context event");
        }
    }
}
