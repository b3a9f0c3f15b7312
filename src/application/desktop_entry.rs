//! Freedesktop `.desktop` file parser.

use crate::error::{QuarryError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

const MAIN_GROUP: &str = "[Desktop Entry]";

/// Parsed `[Desktop Entry]` group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DesktopEntry {
    /// Desktop file id (file name, e.g. `firefox.desktop`).
    pub id: String,
    pub name: String,
    pub generic_name: Option<String>,
    pub comment: Option<String>,
    pub exec: String,
    pub icon: Option<String>,
    pub mime_types: Vec<String>,
    pub terminal: bool,
    pub hidden: bool,
    pub no_display: bool,
    /// `Type` key.
    pub kind: String,
    /// Working directory (`Path` key).
    pub path: Option<PathBuf>,
}

impl DesktopEntry {
    /// Parses the `[Desktop Entry]` group of a desktop file.
    ///
    /// # Rules
    ///
    /// - Only the `[Desktop Entry]` group is read; other groups are ignored
    /// - Lines starting with `#` and blank lines are skipped
    /// - Localized keys (`Name[de]=...`) are ignored
    /// - `Name` is required; `Exec` is required for `Type=Application`
    pub fn parse(id: &str, content: &str) -> Result<Self> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let invalid = |message: &str| QuarryError::InvalidDesktopEntry {
            id: id.to_string(),
            message: message.to_string(),
        };

        let mut entry = DesktopEntry {
            id: id.to_string(),
            ..Default::default()
        };
        let mut in_main = false;
        let mut seen_main = false;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') {
                in_main = line == MAIN_GROUP;
                seen_main |= in_main;
                continue;
            }
            if !in_main {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.contains('[') {
                continue;
            }
            let value = unescape(value.trim());
            match key {
                "Name" => entry.name = value,
                "GenericName" => entry.generic_name = Some(value),
                "Comment" => entry.comment = Some(value),
                "Exec" => entry.exec = value,
                "Icon" => entry.icon = Some(value),
                "MimeType" => entry.mime_types = split_list(&value),
                "Terminal" => entry.terminal = value == "true",
                "Hidden" => entry.hidden = value == "true",
                "NoDisplay" => entry.no_display = value == "true",
                "Type" => entry.kind = value,
                "Path" if !value.is_empty() => entry.path = Some(PathBuf::from(value)),
                _ => {}
            }
        }

        if !seen_main {
            return Err(invalid("missing [Desktop Entry] group"));
        }
        if entry.name.is_empty() {
            return Err(invalid("missing Name"));
        }
        if entry.kind == "Application" && entry.exec.is_empty() {
            return Err(invalid("missing Exec"));
        }
        Ok(entry)
    }

    /// Whether this entry should appear as a launchable application.
    pub fn is_launchable(&self) -> bool {
        self.kind == "Application" && !self.hidden && !self.no_display
    }

    /// Whether this entry declares support for `mime`.
    ///
    /// `image/*` style wildcards in `MimeType` match any subtype.
    pub fn supports(&self, mime: &str) -> bool {
        self.mime_types.iter().any(|declared| {
            declared == mime
                || declared
                    .strip_suffix("/*")
                    .is_some_and(|major| mime.split('/').next() == Some(major))
        })
    }

    /// Builds the command lines to launch this entry with `files`.
    ///
    /// - `%F` / `%U` expand to all files
    /// - `%f` / `%u` expand to one file; several files give one command line each
    /// - `%%` becomes `%`; other field codes are dropped
    /// - Without any file field code, files are appended
    pub fn command_lines(&self, files: &[&Path]) -> Vec<Vec<String>> {
        let tokens = split_exec(&self.exec);
        let single = tokens.iter().any(|t| t == "%f" || t == "%u");
        let multi = tokens.iter().any(|t| t == "%F" || t == "%U");

        if single && files.len() > 1 {
            return files
                .iter()
                .map(|file| expand(&tokens, std::slice::from_ref(file), true))
                .collect();
        }
        vec![expand(&tokens, files, single || multi)]
    }
}

fn expand(tokens: &[String], files: &[&Path], has_file_code: bool) -> Vec<String> {
    let to_arg = |p: &&Path| p.display().to_string();
    let mut argv = Vec::new();
    for token in tokens {
        match token.as_str() {
            "%f" | "%u" => argv.extend(files.first().map(to_arg)),
            "%F" | "%U" => argv.extend(files.iter().map(to_arg)),
            code if code.len() == 2 && code.starts_with('%') && code != "%%" => {}
            other => argv.push(other.replace("%%", "%")),
        }
    }
    if !has_file_code {
        argv.extend(files.iter().map(to_arg));
    }
    argv
}

/// Splits an `Exec` value into arguments, honoring double quotes.
fn split_exec(exec: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;
    let mut chars = exec.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            '\\' if quoted => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_token {
        args.push(current);
    }
    args
}

/// Splits a `;`-separated list value.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Resolves `\s`, `\n`, `\t`, `\r` and `\\` escapes.
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
#[path = "desktop_entry_test.rs"]
mod tests;
