use std::path::Path;

use pv_dsl::{Diagnostic, Format};

pub fn run(path: &Path) -> Result<(), String> {
    let text = super::read_text(path)?;

    let document = match super::format_of(path, &text) {
        Format::Talk => {
            let diagnostics = pv_dsl::check_source(&text);
            super::print_diagnostics(&text, path, &diagnostics);
            if diagnostics.iter().any(Diagnostic::is_error) {
                return Err("check failed with errors".into());
            }
            pv_dsl::load_source(&text).map_err(|e| format!("{}: {e}", path.display()))?
        }
        Format::Json => {
            let document =
                pv_dsl::load_json(&text).map_err(|e| format!("{}: {e}", path.display()))?;
            for node in document.unreachable_nodes() {
                eprintln!("warning: node \"{}\" is never reached", node.id);
            }
            document
        }
    };

    println!(
        "  All checks passed for '{}'.",
        super::display_title(&document, path)
    );
    println!(
        "  {} nodes, {} choices, {} endings",
        document.node_count(),
        document.choice_count(),
        document.terminal_nodes().len()
    );

    Ok(())
}
