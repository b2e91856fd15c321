//! Output formatting for CLI commands.
//!
//! Provides abstraction layer for outputting results in text or JSON format.

use anyhow::Result;
use serde::Serialize;
use std::io::{self, Write};
use vtree_core::{Hash20, ObjectId, Platform, TreeEntry};

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Writer for command output with format abstraction.
pub struct OutputWriter {
    format: OutputFormat,
    stdout: io::Stdout,
}

impl OutputWriter {
    /// Create a new OutputWriter.
    pub fn new(json: bool) -> Self {
        Self {
            format: if json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            stdout: io::stdout(),
        }
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Write output using the configured format.
    ///
    /// The `text_fn` closure is called only in text mode to generate the
    /// human-readable output.
    pub fn write<T: Serialize>(
        &self,
        data: &T,
        text_fn: impl FnOnce() -> String,
    ) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                writeln!(&self.stdout, "{}", json)?;
            }
            OutputFormat::Text => {
                let text = text_fn();
                if !text.is_empty() {
                    write!(&self.stdout, "{}", text)?;
                }
            }
        }
        Ok(())
    }

    /// Write raw bytes to stdout, regardless of format.
    pub fn write_raw(&self, bytes: &[u8]) -> Result<()> {
        let mut handle = self.stdout.lock();
        handle.write_all(bytes)?;
        handle.flush()?;
        Ok(())
    }

    /// Write an error message to stderr.
    ///
    /// In JSON mode, writes a JSON error object with success=false.
    /// In text mode, writes the error and its context chain.
    pub fn write_error(&self, error: &anyhow::Error, result_code: u8) {
        match self.format {
            OutputFormat::Json => {
                let error_output = ErrorOutput {
                    success: false,
                    result_code,
                    error: format!("{:#}", error),
                };
                if let Ok(json) = serde_json::to_string_pretty(&error_output) {
                    let _ = writeln!(io::stderr(), "{}", json);
                }
            }
            OutputFormat::Text => {
                let _ = writeln!(io::stderr(), "Error: {:#}", error);
            }
        }
    }
}

// ============================================================================
// Data Transfer Objects (DTOs) for JSON output
// ============================================================================

/// Error output structure.
#[derive(Debug, Serialize)]
pub struct ErrorOutput {
    pub success: bool,
    pub result_code: u8,
    pub error: String,
}

/// One decoded or scanned tree entry.
#[derive(Debug, Clone, Serialize)]
pub struct EntryInfo {
    pub name: String,
    pub entry_type: String,
    pub mode: String,
    pub hash: ObjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha1: Option<Hash20>,
    #[serde(skip)]
    pub type_char: char,
}

impl EntryInfo {
    pub fn new(entry: &TreeEntry, platform: Platform) -> Self {
        Self {
            name: entry.name().to_string(),
            entry_type: entry.entry_type().to_string(),
            mode: format!("{:06o}", platform.mode_from_type(entry.entry_type())),
            hash: entry.hash().clone(),
            size: entry.size(),
            sha1: entry.content_sha1(),
            type_char: entry.entry_type().type_char(),
        }
    }

    /// One line of `ls -l` style text.
    pub fn to_line(&self) -> String {
        format!(
            "{} {} {} {} size={} sha1={}\n",
            self.type_char,
            self.mode,
            self.hash,
            self.name,
            self.size.map_or_else(|| "-".to_string(), |s| s.to_string()),
            self.sha1.map_or_else(|| "-".to_string(), |h| h.to_hex()),
        )
    }
}

/// Output for `decode` and `scan` commands.
#[derive(Debug, Serialize)]
pub struct EntriesOutput {
    pub success: bool,
    pub result_code: u8,
    pub entries: Vec<EntryInfo>,
}

/// Output for `encode` command in JSON mode.
#[derive(Debug, Serialize)]
pub struct EncodeOutput {
    pub success: bool,
    pub result_code: u8,
    pub entry_count: usize,
    pub length: usize,
    pub bytes: String,
}

/// Output for `mode` command.
#[derive(Debug, Serialize)]
pub struct ModeOutput {
    pub success: bool,
    pub result_code: u8,
    pub entry_type: String,
    pub mode: String,
}

/// Output for `type-of` command.
#[derive(Debug, Serialize)]
pub struct TypeOfOutput {
    pub success: bool,
    pub result_code: u8,
    pub mode: String,
    pub entry_type: String,
    pub type_char: char,
}
