//! Input sanitizers for extracted text and generated filenames.

use once_cell::sync::Lazy;
use regex::Regex;

static UNSAFE_FILENAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s\-.]").unwrap());
static COLLAPSE_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_]+").unwrap());

/// Strip NUL and control characters (keeping `\n\r\t`), trim, and collapse
/// runs of blank lines to at most two.
pub fn sanitize_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let cleaned: String = text
        .chars()
        .filter(|c| matches!(c, '\n' | '\r' | '\t') || !c.is_control())
        .collect();

    let mut lines = Vec::new();
    let mut blank_run = 0usize;
    for line in cleaned.lines() {
        let line = line.trim();
        if line.is_empty() {
            blank_run += 1;
            if blank_run <= 2 {
                lines.push(line);
            }
        } else {
            blank_run = 0;
            lines.push(line);
        }
    }

    lines.join("\n").trim().to_string()
}

/// Reduce a filename to safe characters for generated output folders.
pub fn sanitize_filename(filename: &str) -> String {
    if filename.is_empty() {
        return "sem_nome".to_string();
    }

    let name = filename.replace(['/', '\\'], "_");
    let name = UNSAFE_FILENAME_CHARS.replace_all(&name, "");
    let name = COLLAPSE_SEPARATORS.replace_all(&name, "_");
    let name = name.trim_matches(|c| c == '.' || c == '_');

    if name.is_empty() {
        return "sem_nome".to_string();
    }

    if name.len() > 200 {
        match name.rsplit_once('.') {
            Some((stem, ext)) => {
                let stem: String = stem.chars().take(195).collect();
                format!("{stem}.{ext}")
            }
            None => name.chars().take(200).collect(),
        }
    } else {
        name.to_string()
    }
}
