use std::fs;
use std::path::{Path, PathBuf};

use pv_core::{Choice, DocumentBuilder, Node};

const HEADER: &str = "\
-- Each node says one line. Choices with `-> node` lead on,
-- choices without a target end the conversation.
--
-- Check it with:  pv check <file>
-- Play it with:   pv play <file>

";

pub fn run(name: &str, file: Option<&Path>) -> Result<(), String> {
    let target = match file {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(format!("{}.talk", file_stem(name))),
    };

    if target.exists() {
        return Err(format!("file '{}' already exists", target.display()));
    }

    let content = format!("{HEADER}{}", template(name)?);
    fs::write(&target, content).map_err(|e| format!("cannot write {}: {e}", target.display()))?;

    println!("  Created conversation '{}' in {}", name, target.display());

    Ok(())
}

fn template(name: &str) -> Result<String, String> {
    let document = DocumentBuilder::new()
        .with_title(name)
        .entry(
            Node::new("greeting", "Well met, traveller.")
                .with_speaker("Stranger")
                .with_choice(Choice::new("Who are you?").with_target("about"))
                .with_choice(Choice::new("Farewell.")),
        )
        .node(
            Node::new("about", "Nobody you need to worry about.")
                .with_speaker("Stranger")
                .with_choice(Choice::new("Fair enough.").with_target("greeting")),
        )
        .build()
        .map_err(|e| e.to_string())?;

    Ok(pv_dsl::to_source(&document))
}

/// Lowercase alphanumerics with underscores between words.
fn file_stem(name: &str) -> String {
    let stem = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_");
    if stem.is_empty() {
        "conversation".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_from_titles() {
        assert_eq!(file_stem("The Old Smith"), "the_old_smith");
        assert_eq!(file_stem("  Gate--Guard! "), "gate_guard");
        assert_eq!(file_stem("???"), "conversation");
    }

    #[test]
    fn template_loads() {
        let source = template("Quote \"this\"").unwrap();
        let doc = pv_dsl::load_source(&format!("{HEADER}{source}")).unwrap();
        assert_eq!(doc.meta().title.as_deref(), Some("Quote \"this\""));
        assert_eq!(doc.node_count(), 2);
    }
}
