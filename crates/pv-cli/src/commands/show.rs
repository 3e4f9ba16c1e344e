use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use pv_core::Choice;

pub fn run(path: &Path, show_layout: bool) -> Result<(), String> {
    let document = super::load_document(path)?;

    println!("  {}", super::display_title(&document, path).bold());
    if let Some(description) = &document.meta().description {
        for line in description.lines() {
            println!("  {}", line.trim().dimmed());
        }
    }
    println!();

    let entry = document.entry_id();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Node", "Speaker", "Says", "Choices"]);

    for node in document.nodes() {
        let id = if &node.id == entry {
            format!("{} (entry)", node.id)
        } else {
            node.id.to_string()
        };
        let speaker = node.speaker.as_deref().unwrap_or("-");
        let choices = if node.is_terminal() {
            "(ends)".to_string()
        } else {
            node.choices
                .iter()
                .enumerate()
                .map(|(i, c)| describe_choice(i, c))
                .collect::<Vec<_>>()
                .join("\n")
        };

        table.add_row(vec![id, speaker.to_string(), super::truncate(&node.text, 60), choices]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} nodes, {} choices",
        document.node_count(),
        document.choice_count()
    );

    let unreachable = document.unreachable_nodes();
    if !unreachable.is_empty() {
        let ids: Vec<_> = unreachable.iter().map(|n| n.id.to_string()).collect();
        println!("  {} {}", "unreachable:".yellow(), ids.join(", "));
    }

    if show_layout {
        print_layout(&document);
    }

    Ok(())
}

fn describe_choice(index: usize, choice: &Choice) -> String {
    let text = super::truncate(&choice.text, 40);
    match &choice.target {
        Some(target) => format!("{}. {text} -> {target}", index + 1),
        None => format!("{}. {text} (ends)", index + 1),
    }
}

fn print_layout(document: &pv_core::GraphDocument) {
    let layout = document.layout();
    println!();
    if layout.is_empty() {
        println!("  No layout data.");
        return;
    }

    println!("  {}", "Layout".bold());
    for edge in &layout.edges {
        println!("  {} -> {}", edge.from, edge.to);
    }
    for (node, position) in &layout.positions {
        println!("  {node} at ({}, {})", position.0, position.1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_are_numbered_from_one() {
        assert_eq!(
            describe_choice(0, &Choice::new("Onward").with_target("next")),
            "1. Onward -> next"
        );
        assert_eq!(describe_choice(2, &Choice::new("Bye")), "3. Bye (ends)");
    }
}
