//! The traversal state machine.

use std::fmt;
use std::sync::Arc;

use pv_core::{Choice, GraphDocument, Node, NodeIndex};

use crate::error::{DialogueError, DialogueResult};

/// Why a conversation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndReason {
    /// A node without replies was acknowledged.
    Exhausted,
    /// The listener picked a reply that leads nowhere.
    ChoseExit,
    /// The session was ended from outside before the conversation finished.
    Aborted,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EndReason::Exhausted => "no replies left",
            EndReason::ChoseExit => "listener left",
            EndReason::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

/// Where a conversation currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// The current line is shown and waits to be acknowledged.
    AwaitingAcknowledgement,
    /// The current node's replies are shown and one must be picked.
    AwaitingChoice,
    /// The conversation is over.
    Ended(EndReason),
}

impl EngineState {
    /// Whether the conversation is over.
    pub fn is_ended(self) -> bool {
        matches!(self, EngineState::Ended(_))
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineState::AwaitingAcknowledgement => f.write_str("awaiting acknowledgement"),
            EngineState::AwaitingChoice => f.write_str("awaiting a choice"),
            EngineState::Ended(_) => f.write_str("ended"),
        }
    }
}

/// Walks one conversation from its entry node.
///
/// The document is shared; the engine only owns its position and state.
/// There is no history and no loop detection, so a cycle in the graph keeps
/// the conversation going for as long as the listener follows it.
#[derive(Debug, Clone)]
pub struct TraversalEngine {
    document: Arc<GraphDocument>,
    current: NodeIndex,
    state: EngineState,
}

impl TraversalEngine {
    /// Start at the document's entry node, awaiting acknowledgement.
    pub fn new(document: Arc<GraphDocument>) -> Self {
        let current = document.entry_index();
        Self {
            document,
            current,
            state: EngineState::AwaitingAcknowledgement,
        }
    }

    /// The document being walked.
    pub fn document(&self) -> &Arc<GraphDocument> {
        &self.document
    }

    /// Current state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Whether the conversation is over.
    pub fn is_ended(&self) -> bool {
        self.state.is_ended()
    }

    /// The node the conversation is at. After the end, the last node shown.
    pub fn current_node(&self) -> &Node {
        self.document.node(self.current)
    }

    /// The current line of speech.
    pub fn speech(&self) -> &str {
        &self.current_node().text
    }

    /// Who says the current line, if the node names a speaker.
    pub fn speaker(&self) -> Option<&str> {
        self.current_node().speaker.as_deref()
    }

    /// Replies on offer. Empty unless a choice is awaited.
    pub fn choices(&self) -> &[Choice] {
        match self.state {
            EngineState::AwaitingChoice => &self.current_node().choices,
            _ => &[],
        }
    }

    /// Acknowledge the current line.
    ///
    /// Ends the conversation when the node has no replies, otherwise presents
    /// them.
    pub fn acknowledge(&mut self) -> DialogueResult<EngineState> {
        if self.state != EngineState::AwaitingAcknowledgement {
            return Err(self.rejected("acknowledge"));
        }

        self.state = if self.current_node().is_terminal() {
            EngineState::Ended(EndReason::Exhausted)
        } else {
            EngineState::AwaitingChoice
        };
        Ok(self.state)
    }

    /// Pick the reply at `index`.
    ///
    /// A reply without a target ends the conversation; otherwise the
    /// conversation moves to the target node. Nothing changes on error.
    pub fn choose(&mut self, index: usize) -> DialogueResult<EngineState> {
        if self.state != EngineState::AwaitingChoice {
            return Err(self.rejected("choose"));
        }

        let node = self.current_node();
        let choice = node.choice(index).ok_or(DialogueError::InvalidChoice {
            index,
            available: node.choices.len(),
        })?;

        let next = match &choice.target {
            Some(target) => Some(self.document.index_of(target)?),
            None => None,
        };

        match next {
            Some(index) => {
                self.current = index;
                self.state = EngineState::AwaitingAcknowledgement;
            }
            None => self.state = EngineState::Ended(EndReason::ChoseExit),
        }
        Ok(self.state)
    }

    /// Stop the conversation from outside. No effect once ended.
    pub(crate) fn abort(&mut self) -> EndReason {
        match self.state {
            EngineState::Ended(reason) => reason,
            _ => {
                self.state = EngineState::Ended(EndReason::Aborted);
                EndReason::Aborted
            }
        }
    }

    fn rejected(&self, operation: &'static str) -> DialogueError {
        DialogueError::InvalidOperation {
            operation,
            state: self.state,
        }
    }
}
