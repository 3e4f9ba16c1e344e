pub mod check;
pub mod convert;
pub mod new;
pub mod play;
pub mod show;

use std::fs;
use std::path::Path;

use pv_core::GraphDocument;
use pv_dsl::{Diagnostic, Format, Severity, render_diagnostics};

/// Read a conversation file as text, dropping a leading byte order mark.
fn read_text(path: &Path) -> Result<String, String> {
    let bytes = fs::read(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    pv_dsl::payload_text(&bytes)
        .map(str::to_string)
        .map_err(|e| format!("{}: {e}", path.display()))
}

/// The file extension decides the format; unknown extensions fall back to
/// looking at the contents.
fn format_of(path: &Path, text: &str) -> Format {
    Format::from_path(path).unwrap_or_else(|| Format::detect(text))
}

/// Load and validate a conversation file.
fn load_document(path: &Path) -> Result<GraphDocument, String> {
    let text = read_text(path)?;
    let format = format_of(path, &text);
    let document =
        pv_dsl::load_as(&text, format).map_err(|e| format!("{}: {e}", path.display()))?;

    tracing::info!(
        "Loaded {} ({}, {} nodes)",
        path.display(),
        format,
        document.node_count()
    );
    Ok(document)
}

/// Title to show for a document, falling back to the file name.
fn display_title(document: &GraphDocument, path: &Path) -> String {
    document.meta().title.clone().unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    })
}

/// Print diagnostics to stderr using ariadne.
fn print_diagnostics(source: &str, path: &Path, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }

    let filename = path.display().to_string();
    let rendered = render_diagnostics(source, &filename, diagnostics);
    eprint!("{rendered}");

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = diagnostics.len() - errors;

    if errors > 0 {
        eprintln!(
            "  {} error{}, {} warning{}",
            errors,
            plural(errors),
            warnings,
            plural(warnings),
        );
    } else {
        eprintln!("  {} warning{}", warnings, plural(warnings));
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Shorten text for table cells.
fn truncate(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() > max {
        let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        flat
    }
}
