//! JSON persistence for conversations.

use pv_core::{Choice, DocumentBuilder, DocumentMeta, GraphDocument, Layout, Node, NodeId};
use serde::{Deserialize, Serialize};

use crate::error::{LoadError, LoadResult};

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocumentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    nodes: Vec<NodeRecord>,
    #[serde(default, skip_serializing_if = "Layout::is_empty")]
    layout: Layout,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct NodeRecord {
    id: NodeId,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    entry: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    speaker: Option<String>,
    text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    choices: Vec<Choice>,
}

/// Load a document from its JSON form.
pub fn load_json(text: &str) -> LoadResult<GraphDocument> {
    let record: DocumentRecord =
        serde_json::from_str(text).map_err(|e| LoadError::MalformedPayload(e.to_string()))?;

    let mut builder = DocumentBuilder::new()
        .with_meta(DocumentMeta {
            title: record.title,
            description: record.description,
        })
        .with_layout(record.layout);

    for node in record.nodes {
        builder.add_node(
            Node {
                id: node.id,
                speaker: node.speaker,
                text: node.text,
                choices: node.choices,
            },
            node.entry,
        );
    }

    Ok(builder.build()?)
}

/// Write a document as pretty-printed JSON.
pub fn to_json(document: &GraphDocument) -> serde_json::Result<String> {
    let entry = document.entry_id();
    let record = DocumentRecord {
        title: document.meta().title.clone(),
        description: document.meta().description.clone(),
        nodes: document
            .nodes()
            .iter()
            .map(|node| NodeRecord {
                id: node.id.clone(),
                entry: &node.id == entry,
                speaker: node.speaker.clone(),
                text: node.text.clone(),
                choices: node.choices.clone(),
            })
            .collect(),
        layout: document.layout().clone(),
    };
    serde_json::to_string_pretty(&record)
}
