//! Error types for the conversation runtime.

use pv_core::DocumentError;
use thiserror::Error;

use crate::engine::EngineState;
use crate::session::{ParticipantId, SessionId};

/// Result type for conversation operations.
pub type DialogueResult<T> = Result<T, DialogueError>;

/// Errors that can occur while running a conversation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DialogueError {
    /// The operation is not legal in the current state.
    #[error("cannot {operation} while {state}")]
    InvalidOperation {
        /// The rejected operation.
        operation: &'static str,
        /// The state the conversation was in.
        state: EngineState,
    },

    /// The chosen reply does not exist.
    #[error("invalid choice {index}: {available} available")]
    InvalidChoice {
        /// The requested index.
        index: usize,
        /// How many replies the current node offers.
        available: usize,
    },

    /// The listener is already in an active conversation.
    #[error("{0} is already in a conversation")]
    AlreadyInConversation(ParticipantId),

    /// No session with this id is known to the host.
    #[error("unknown session: {0}")]
    UnknownSession(SessionId),

    /// The host already runs as many sessions as it allows.
    #[error("session limit reached ({0} active)")]
    HostAtCapacity(usize),

    /// The document could not resolve a node.
    #[error(transparent)]
    Document(#[from] DocumentError),
}
