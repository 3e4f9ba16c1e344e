use std::fs;
use std::path::Path;

use pv_dsl::Format;

pub fn run(path: &Path, format: &str, output: Option<&Path>) -> Result<(), String> {
    let target = Format::from_name(format)
        .ok_or_else(|| format!("unsupported format: {format} (expected json or talk)"))?;
    let document = super::load_document(path)?;

    let mut content =
        pv_dsl::save_as(&document, target).map_err(|e| format!("cannot write {target}: {e}"))?;
    if !content.ends_with('\n') {
        content.push('\n');
    }

    match output {
        Some(out) => {
            fs::write(out, &content)
                .map_err(|e| format!("cannot write {}: {e}", out.display()))?;
            println!("  Converted {} to {}", path.display(), out.display());
        }
        None => print!("{content}"),
    }

    Ok(())
}
