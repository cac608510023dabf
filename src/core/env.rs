//! Environment files.
//!
//! Parses the files `push` uploads (dotenv or a flat JSON object) and
//! renders the secrets `pull` downloads.

use std::fmt;
#[cfg(unix)]
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::backend::SecretData;
#[cfg(unix)]
use crate::core::constants::SECRET_FILE_MODE;
use crate::error::{Result, ValidationError};

/// Output format for pulled secrets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Dotenv,
    Json,
    /// `export KEY="value"` lines for `eval` in a POSIX shell.
    Shell,
}

impl FromStr for Format {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dotenv" | "env" => Ok(Format::Dotenv),
            "json" => Ok(Format::Json),
            "shell" | "sh" => Ok(Format::Shell),
            _ => Err(ValidationError::UnknownEnvFormat(s.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Dotenv => "dotenv",
            Format::Json => "json",
            Format::Shell => "shell",
        };
        f.write_str(name)
    }
}

/// A set of environment variables tied to a file on disk.
#[derive(Clone)]
pub struct Env {
    entries: SecretData,
    path: PathBuf,
}

impl Env {
    /// Parse an environment file from disk.
    ///
    /// A file whose content is a JSON object is read as JSON; non-string
    /// values are stored in their JSON text form. Anything else is read as
    /// dotenv: blank lines and `#` comments are skipped, an `export ` prefix
    /// is ignored, values may be single or double quoted.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let entries = match parse_json_object(&contents) {
            Some(entries) => entries,
            None => parse_dotenv(&contents),
        };

        Ok(Self {
            entries,
            path: path.to_path_buf(),
        })
    }

    pub fn from_data(entries: SecretData, path: PathBuf) -> Self {
        Self { entries, path }
    }

    pub fn data(&self) -> &SecretData {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the entries to the file in `format` with owner-only permissions.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub fn save(&self, format: Format) -> Result<()> {
        let content = render(&self.entries, format)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .mode(SECRET_FILE_MODE)
                .open(&self.path)?;
            file.write_all(content.as_bytes())?;
            file.flush()?;

            // Existing files keep their mode on open; reset it.
            std::fs::set_permissions(
                &self.path,
                std::fs::Permissions::from_mode(SECRET_FILE_MODE),
            )?;
        }

        #[cfg(not(unix))]
        {
            std::fs::write(&self.path, content)?;
        }

        Ok(())
    }
}

/// Render secrets in `format`. Every format ends with a newline.
pub fn render(data: &SecretData, format: Format) -> Result<String> {
    let mut output = String::new();

    match format {
        Format::Dotenv => {
            for (key, value) in data {
                if needs_quotes(value) {
                    output.push_str(&format!("{}=\"{}\"\n", key, escape_dotenv(value)));
                } else {
                    output.push_str(&format!("{}={}\n", key, value));
                }
            }
        }
        Format::Json => {
            output = serde_json::to_string_pretty(data)?;
            output.push('\n');
        }
        Format::Shell => {
            for (key, value) in data {
                output.push_str(&format!("export {}=\"{}\"\n", key, escape_shell(value)));
            }
        }
    }

    Ok(output)
}

fn parse_json_object(contents: &str) -> Option<SecretData> {
    if !contents.trim_start().starts_with('{') {
        return None;
    }

    let object: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(contents).ok()?;
    Some(
        object
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect(),
    )
}

fn parse_dotenv(contents: &str) -> SecretData {
    let mut entries = SecretData::new();

    for line in contents.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            entries.insert(key.to_string(), parse_value(value.trim()));
        }
    }

    entries
}

fn parse_value(raw: &str) -> String {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return unescape_double_quoted(&raw[1..raw.len() - 1]);
    }

    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return raw[1..raw.len() - 1].to_string();
    }

    // Unquoted values may carry a trailing comment.
    match raw.find(" #") {
        Some(idx) => raw[..idx].trim_end().to_string(),
        None => raw.to_string(),
    }
}

fn unescape_double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
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

fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || value.chars().any(char::is_whitespace)
        || value.contains(['#', '=', '"', '\'', '\\'])
}

fn escape_dotenv(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(ch),
        }
    }

    escaped
}

/// Escape for a double-quoted POSIX shell word.
fn escape_shell(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for ch in value.chars() {
        if matches!(ch, '\\' | '"' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }

    escaped
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Env")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .field("path", &self.path)
            .finish()
    }
}
