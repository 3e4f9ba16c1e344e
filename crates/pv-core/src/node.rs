use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a node, unique within one document.
///
/// Persisted documents may write ids as strings or integers; both are kept
/// in their textual form, so `7` and `"7"` name the same node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node ID from its textual form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The textual form of the ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Integer(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => NodeId(s),
            RawId::Integer(n) => NodeId::from(n),
        })
    }
}

/// One line of dialogue plus the replies the player may pick from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier within the document.
    pub id: NodeId,
    /// Optional label for who speaks this line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    /// The line spoken.
    pub text: String,
    /// Player replies in presentation order. Empty means the node is terminal.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
}

impl Node {
    /// Create a terminal node with the given ID and text.
    pub fn new(id: impl Into<NodeId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            speaker: None,
            text: text.into(),
            choices: Vec::new(),
        }
    }

    /// Set the speaker.
    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    /// Add a choice.
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// A node with no choices ends the conversation once acknowledged.
    pub fn is_terminal(&self) -> bool {
        self.choices.is_empty()
    }

    /// Get the choice at `index`, if any.
    pub fn choice(&self, index: usize) -> Option<&Choice> {
        self.choices.get(index)
    }
}

/// A player-selectable reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// The text shown to the player.
    pub text: String,
    /// Node to continue with. `None` ends the conversation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<NodeId>,
}

impl Choice {
    /// Create a choice that ends the conversation.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target: None,
        }
    }

    /// Set the node this choice leads to.
    pub fn with_target(mut self, target: impl Into<NodeId>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Whether picking this choice ends the conversation.
    pub fn ends_conversation(&self) -> bool {
        self.target.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_builder() {
        let node = Node::new("greeting", "Well met, traveller.")
            .with_speaker("Brom")
            .with_choice(Choice::new("Who are you?").with_target("about"))
            .with_choice(Choice::new("Farewell."));

        assert_eq!(node.id.as_str(), "greeting");
        assert_eq!(node.speaker.as_deref(), Some("Brom"));
        assert_eq!(node.choices.len(), 2);
        assert!(!node.is_terminal());
        assert_eq!(node.choice(0).unwrap().target, Some(NodeId::new("about")));
        assert!(node.choice(1).unwrap().ends_conversation());
        assert!(node.choice(2).is_none());
    }

    #[test]
    fn node_without_choices_is_terminal() {
        assert!(Node::new("bye", "Safe travels.").is_terminal());
    }

    #[test]
    fn integer_and_string_ids_are_equivalent() {
        let from_int: NodeId = serde_json::from_str("7").unwrap();
        let from_str: NodeId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(from_int, from_str);
        assert_eq!(from_int, NodeId::from(7));
    }

    #[test]
    fn ids_serialize_as_strings() {
        let json = serde_json::to_string(&NodeId::from(12)).unwrap();
        assert_eq!(json, "\"12\"");
    }

    #[test]
    fn choice_target_defaults_to_none() {
        let choice: Choice = serde_json::from_str(r#"{"text": "Leave"}"#).unwrap();
        assert!(choice.ends_conversation());

        let choice: Choice = serde_json::from_str(r#"{"text": "Go on", "target": 3}"#).unwrap();
        assert_eq!(choice.target, Some(NodeId::new("3")));
    }
}
