use std::fmt;
use std::sync::Arc;

use pv_core::{Choice, GraphDocument};
use uuid::Uuid;

use crate::engine::{EndReason, EngineState, TraversalEngine};
use crate::error::{DialogueError, DialogueResult};

/// Unique identifier for a conversation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Someone taking part in conversations, named by the host game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create a participant ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone)]
enum Slot {
    Running(TraversalEngine),
    Closed(EndReason),
}

/// One conversation between a speaker and a listener.
///
/// The session owns its engine until [`end`](Self::end) is called, which
/// drops it. Ending is idempotent.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    id: SessionId,
    speaker: ParticipantId,
    listener: ParticipantId,
    slot: Slot,
}

impl ConversationSession {
    /// Begin a conversation at the document's entry node.
    pub fn start(
        speaker: impl Into<ParticipantId>,
        listener: impl Into<ParticipantId>,
        document: Arc<GraphDocument>,
    ) -> Self {
        Self {
            id: SessionId::new(),
            speaker: speaker.into(),
            listener: listener.into(),
            slot: Slot::Running(TraversalEngine::new(document)),
        }
    }

    /// Session ID.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The participant whose lines are spoken.
    pub fn speaker(&self) -> &ParticipantId {
        &self.speaker
    }

    /// The participant who acknowledges and chooses.
    pub fn listener(&self) -> &ParticipantId {
        &self.listener
    }

    /// The running engine, until the session is ended.
    pub fn engine(&self) -> Option<&TraversalEngine> {
        match &self.slot {
            Slot::Running(engine) => Some(engine),
            Slot::Closed(_) => None,
        }
    }

    /// Conversation state.
    pub fn state(&self) -> EngineState {
        match &self.slot {
            Slot::Running(engine) => engine.state(),
            Slot::Closed(reason) => EngineState::Ended(*reason),
        }
    }

    /// Whether the conversation is still going.
    pub fn is_active(&self) -> bool {
        !self.state().is_ended()
    }

    /// Whether [`end`](Self::end) has released the engine.
    pub fn is_closed(&self) -> bool {
        matches!(self.slot, Slot::Closed(_))
    }

    /// The current line, while the engine is held.
    pub fn speech(&self) -> Option<&str> {
        self.engine().map(TraversalEngine::speech)
    }

    /// Replies on offer. Empty unless a choice is awaited.
    pub fn choices(&self) -> &[Choice] {
        match self.engine() {
            Some(engine) => engine.choices(),
            None => &[],
        }
    }

    /// Acknowledge the current line.
    pub fn acknowledge(&mut self) -> DialogueResult<EngineState> {
        self.running("acknowledge")?.acknowledge()
    }

    /// Pick a reply.
    pub fn choose(&mut self, index: usize) -> DialogueResult<EngineState> {
        self.running("choose")?.choose(index)
    }

    /// Close the session and drop its engine.
    ///
    /// Returns why the conversation ended: the engine's own reason if it had
    /// already finished, [`EndReason::Aborted`] otherwise.
    pub fn end(&mut self) -> EndReason {
        let reason = match &mut self.slot {
            Slot::Running(engine) => engine.abort(),
            Slot::Closed(reason) => return *reason,
        };
        self.slot = Slot::Closed(reason);
        reason
    }

    fn running(&mut self, operation: &'static str) -> DialogueResult<&mut TraversalEngine> {
        match &mut self.slot {
            Slot::Running(engine) => Ok(engine),
            Slot::Closed(reason) => Err(DialogueError::InvalidOperation {
                operation,
                state: EngineState::Ended(*reason),
            }),
        }
    }
}
