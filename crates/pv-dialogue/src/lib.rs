//! Conversation runtime for Palaver.
//!
//! A [`TraversalEngine`] walks one shared [`GraphDocument`](pv_core::GraphDocument)
//! from its entry node, waiting for the listener to acknowledge each line and
//! to pick a reply. A [`ConversationSession`] binds an engine to the two
//! participants, and a [`SessionHost`] keeps track of which listeners are
//! currently busy. Nothing here calls back into the presentation layer; the
//! caller reads the state after each operation.

/// Host configuration.
pub mod config;
/// The state machine that walks a conversation.
pub mod engine;
/// Error types for the conversation runtime.
pub mod error;
/// Registry of running sessions.
pub mod host;
/// A single conversation between two participants.
pub mod session;

pub use config::HostConfig;
pub use engine::{EndReason, EngineState, TraversalEngine};
pub use error::{DialogueError, DialogueResult};
pub use host::SessionHost;
pub use session::{ConversationSession, ParticipantId, SessionId};
