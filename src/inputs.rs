//! Loading stanza text files and picking background images from a directory.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{ReelError, ReelResult};

/// File extensions accepted as background images (compared case-insensitively).
pub const BACKGROUND_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif"];

/// Split poem text into stanzas.
///
/// Stanzas are separated by one or more blank lines. A leading `Stanza N:` (or `Stanza N -`)
/// heading is dropped, and stanzas left empty are skipped.
pub fn parse_stanzas(text: &str) -> Vec<String> {
    let mut stanzas = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    let mut flush = |current: &mut Vec<&str>| {
        let joined = current.join("\n");
        current.clear();
        let body = strip_heading(joined.trim()).trim();
        if !body.is_empty() {
            stanzas.push(body.to_string());
        }
    };

    for line in text.lines() {
        if line.trim().is_empty() {
            flush(&mut current);
        } else {
            current.push(line.trim_end());
        }
    }
    flush(&mut current);
    stanzas
}

fn strip_heading(stanza: &str) -> &str {
    const WORD: &str = "stanza";
    let Some(head) = stanza.get(..WORD.len()) else {
        return stanza;
    };
    if !head.eq_ignore_ascii_case(WORD) {
        return stanza;
    }
    let rest = &stanza[WORD.len()..];
    let after_ws = rest.trim_start_matches([' ', '\t']);
    if after_ws.len() == rest.len() {
        return stanza;
    }
    let digits = after_ws.len() - after_ws.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return stanza;
    }
    let rest = after_ws[digits..].trim_start();
    let rest = rest.strip_prefix([':', '-']).unwrap_or(rest);
    rest.trim_start()
}

/// Read and split a stanza file.
pub fn read_stanza_file(path: &Path) -> ReelResult<Vec<String>> {
    if !path.is_file() {
        return Err(ReelError::resource_not_found("stanza file", path));
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read stanza file '{}'", path.display()))?;
    Ok(parse_stanzas(&text))
}

/// Image files directly inside `dir`, sorted by path.
pub fn list_backgrounds(dir: &Path) -> ReelResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ReelError::resource_not_found("background directory", dir));
    }
    let mut found = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("list directory '{}'", dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("list directory '{}'", dir.display()))?
            .path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| BACKGROUND_EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)));
        if is_image && path.is_file() {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// Pick `count` backgrounds from `dir` in sorted order, cycling when there are fewer images.
pub fn select_backgrounds(dir: &Path, count: usize) -> ReelResult<Vec<PathBuf>> {
    let images = list_backgrounds(dir)?;
    if images.is_empty() {
        return Err(ReelError::resource_not_found("background images", dir));
    }
    if images.len() < count {
        tracing::warn!(
            available = images.len(),
            needed = count,
            "not enough background images; some will be reused"
        );
    }
    Ok(images.iter().cycle().take(count).cloned().collect())
}

#[cfg(test)]
#[path = "../tests/unit/inputs.rs"]
mod tests;
