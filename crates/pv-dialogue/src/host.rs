use std::collections::HashMap;
use std::sync::Arc;

use pv_core::GraphDocument;

use crate::config::HostConfig;
use crate::engine::{EndReason, EngineState};
use crate::error::{DialogueError, DialogueResult};
use crate::session::{ConversationSession, ParticipantId, SessionId};

/// Keeps track of running conversations.
///
/// A listener can be in at most one active conversation at a time; a speaker
/// may talk to any number of listeners at once. As soon as a conversation
/// ends, by traversal or by [`end`](Self::end), its listener is free again.
/// Ended sessions stay queryable until [`prune`](Self::prune) drops them.
#[derive(Debug, Default)]
pub struct SessionHost {
    config: HostConfig,
    sessions: HashMap<SessionId, ConversationSession>,
    busy: HashMap<ParticipantId, SessionId>,
}

impl SessionHost {
    /// Create a host with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a host with the given configuration.
    pub fn with_config(config: HostConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Host configuration.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Start a conversation between `speaker` and `listener`.
    pub fn start(
        &mut self,
        speaker: impl Into<ParticipantId>,
        listener: impl Into<ParticipantId>,
        document: Arc<GraphDocument>,
    ) -> DialogueResult<SessionId> {
        let speaker = speaker.into();
        let listener = listener.into();

        if self.busy.contains_key(&listener) {
            return Err(DialogueError::AlreadyInConversation(listener));
        }
        let active = self.active_count();
        if !self.config.admits(active) {
            return Err(DialogueError::HostAtCapacity(active));
        }

        let session = ConversationSession::start(speaker, listener.clone(), document);
        let id = session.id();
        tracing::debug!(
            "Session {} started: {} speaks to {}",
            id,
            session.speaker(),
            listener
        );
        self.sessions.insert(id, session);
        self.busy.insert(listener, id);
        Ok(id)
    }

    /// Acknowledge the current line of a session.
    pub fn acknowledge(&mut self, id: SessionId) -> DialogueResult<EngineState> {
        self.drive(id, ConversationSession::acknowledge)
    }

    /// Pick a reply in a session.
    pub fn choose(&mut self, id: SessionId, index: usize) -> DialogueResult<EngineState> {
        self.drive(id, |session| session.choose(index))
    }

    /// End a session, dropping its engine. Ending twice is harmless.
    pub fn end(&mut self, id: SessionId) -> DialogueResult<EndReason> {
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(DialogueError::UnknownSession(id))?;
        let already_closed = session.is_closed();
        let reason = session.end();
        if !already_closed {
            tracing::debug!("Session {} ended ({})", id, reason);
        }
        self.release(id);
        Ok(reason)
    }

    /// Look up a session.
    pub fn session(&self, id: SessionId) -> DialogueResult<&ConversationSession> {
        self.sessions
            .get(&id)
            .ok_or(DialogueError::UnknownSession(id))
    }

    /// The active session a listener is in, if any.
    pub fn session_of(&self, listener: &ParticipantId) -> Option<&ConversationSession> {
        self.busy.get(listener).and_then(|id| self.sessions.get(id))
    }

    /// Whether a participant is speaking or listening in an active session.
    pub fn is_in_conversation(&self, participant: &ParticipantId) -> bool {
        self.busy.contains_key(participant)
            || self
                .sessions
                .values()
                .any(|s| s.is_active() && s.speaker() == participant)
    }

    /// Number of sessions still in progress.
    pub fn active_count(&self) -> usize {
        self.busy.len()
    }

    /// All known sessions, active and ended, in no particular order.
    pub fn sessions(&self) -> impl Iterator<Item = &ConversationSession> {
        self.sessions.values()
    }

    /// Forget every ended session. Returns how many were dropped.
    pub fn prune(&mut self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.is_active());
        before - self.sessions.len()
    }

    fn drive<F>(&mut self, id: SessionId, op: F) -> DialogueResult<EngineState>
    where
        F: FnOnce(&mut ConversationSession) -> DialogueResult<EngineState>,
    {
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(DialogueError::UnknownSession(id))?;
        let result = op(session);
        if let Ok(EngineState::Ended(reason)) = result {
            tracing::debug!("Session {} finished ({})", id, reason);
            self.release(id);
        }
        result
    }

    fn release(&mut self, id: SessionId) {
        let Some(session) = self.sessions.get(&id) else {
            return;
        };
        let listener = session.listener();
        if self.busy.get(listener) == Some(&id) {
            self.busy.remove(listener);
            tracing::debug!("Listener {} released from session {}", listener, id);
        }
    }
}
