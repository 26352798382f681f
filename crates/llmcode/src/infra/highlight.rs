//! Terminal syntax highlighting for file display.

use std::path::Path;

use once_cell::sync::Lazy;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::{LinesWithEndings, as_24_bit_terminal_escaped};

const THEME: &str = "base16-ocean.dark";

static SYNTAXES: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEMES: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

/// Render `content` with ANSI colors when a syntax can be determined from
/// `path`. Returns `None` when the language is unknown or highlighting
/// fails, in which case the caller prints the text as-is.
pub fn render(path: &Path, content: &str) -> Option<String> {
    let syntax = SYNTAXES.find_syntax_for_file(path).ok().flatten()?;
    let theme = THEMES.themes.get(THEME)?;

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut out = String::with_capacity(content.len());
    for line in LinesWithEndings::from(content) {
        match highlighter.highlight_line(line, &SYNTAXES) {
            Ok(ranges) => out.push_str(&as_24_bit_terminal_escaped(&ranges, false)),
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "highlight failed");
                return None;
            }
        }
    }
    out.push_str("\x1b[0m");
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn highlights_recognized_source_files() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("sample.rs");
        fs::write(&file, "fn main() {}\n").unwrap();

        let rendered = render(&file, "fn main() {}\n").expect("rust is a known syntax");
        assert!(rendered.contains("\x1b["));
        assert!(rendered.contains("main"));
    }

    #[test]
    fn unknown_extension_falls_back_to_plain() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("data.zzz");
        fs::write(&file, "payload").unwrap();

        assert!(render(&file, "payload").is_none());
    }
}
