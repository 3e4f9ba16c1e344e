use std::fmt;
use std::path::Path;

/// The concrete syntaxes a conversation can be persisted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Structured JSON (`.json`).
    Json,
    /// The `.talk` text format.
    Talk,
}

impl Format {
    /// Guess the format from payload contents: JSON documents open with `{`.
    pub fn detect(text: &str) -> Self {
        if text.trim_start().starts_with('{') {
            Format::Json
        } else {
            Format::Talk
        }
    }

    /// Format implied by a file extension, if recognised.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_name)
    }

    /// Parse a format name such as `json` or `talk`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "talk" => Some(Format::Talk),
            _ => None,
        }
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Talk => "talk",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_by_first_character() {
        assert_eq!(Format::detect("  \n{\"nodes\": []}"), Format::Json);
        assert_eq!(Format::detect("entry node a {"), Format::Talk);
        assert_eq!(Format::detect(""), Format::Talk);
    }

    #[test]
    fn names_and_extensions() {
        assert_eq!(Format::from_name("JSON"), Some(Format::Json));
        assert_eq!(Format::from_name("talk"), Some(Format::Talk));
        assert_eq!(Format::from_name("xml"), None);
        assert_eq!(Format::from_path(Path::new("smith.talk")), Some(Format::Talk));
        assert_eq!(Format::from_path(Path::new("smith")), None);
        assert_eq!(Format::Json.to_string(), "json");
    }
}
