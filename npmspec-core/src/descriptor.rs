//! Line-oriented editor for RPM spec files.
//!
//! Only the preamble is ever inspected: the lines before the first
//! `%package ` or `%description` marker. Sub-packages repeat tags such as
//! `Summary:` and `Version:`, so scanning past the boundary would edit the
//! wrong one.
//!
//! This is a linear scan with an early-exit predicate, not a parser. No
//! macros, conditionals or scriptlets are understood.

use std::fmt;
use std::path::Path;

use crate::error::{io_err, CoreError};

const SUBPACKAGE_MARKER: &str = "%package ";
const DESCRIPTION_MARKER: &str = "%description";

/// In-memory spec file: the exact line sequence of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecFile {
    lines: Vec<String>,
}

impl SpecFile {
    /// Split `text` on `\n`. Joining the result with `\n` reproduces `text`
    /// byte for byte, trailing newline included.
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_owned).collect(),
        }
    }

    /// Read and parse the spec file at `path`.
    pub fn read(path: &Path) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        Ok(Self::parse(&text))
    }

    /// Write the rendered document to `path`.
    ///
    /// Plain write, not atomic: an interrupted rewrite can truncate the file.
    pub fn write(&self, path: &Path) -> Result<(), CoreError> {
        std::fs::write(path, self.render()).map_err(|e| io_err(path, e))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Value of the first `tag` line in the preamble, trimmed.
    ///
    /// `tag` is capitalised before matching (`version` finds `Version:`),
    /// which also lower-cases the rest of it: CamelCase tags such as
    /// `BuildArch` are never found.
    pub fn get(&self, tag: &str) -> Option<&str> {
        let prefix = tag_prefix(tag);
        self.preamble()
            .iter()
            .find_map(|line| line.strip_prefix(prefix.as_str()))
            .map(str::trim)
    }

    /// Replace the value of the first `tag` line in the preamble.
    ///
    /// The whitespace between the `:` and the old value is kept verbatim.
    /// A missing tag is never inserted; returns whether a line was replaced.
    pub fn set(&mut self, tag: &str, value: &str) -> bool {
        let prefix = tag_prefix(tag);
        let end = self.preamble_len();
        let Some(line) = self.lines[..end]
            .iter_mut()
            .find(|line| line.starts_with(prefix.as_str()))
        else {
            return false;
        };

        let rest = &line[prefix.len()..];
        let spaces = &rest[..rest.len() - rest.trim_start().len()];
        let cr = if rest.ends_with('\r') { "\r" } else { "" };
        let replaced = format!("{prefix}{spaces}{value}{cr}");
        *line = replaced;
        true
    }

    /// Serialize back to text, lines joined by `\n`.
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    fn preamble(&self) -> &[String] {
        &self.lines[..self.preamble_len()]
    }

    fn preamble_len(&self) -> usize {
        self.lines
            .iter()
            .position(|line| is_boundary(line))
            .unwrap_or(self.lines.len())
    }
}

impl fmt::Display for SpecFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn is_boundary(line: &str) -> bool {
    line.starts_with(SUBPACKAGE_MARKER) || line.starts_with(DESCRIPTION_MARKER)
}

/// `version` -> `Version:`. Only the tag is case-normalised: the first
/// character is upper-cased and the rest lower-cased, so CamelCase tags
/// never match (`BuildArch` looks for `Buildarch:`). Callers can only address
/// single-word tags such as `Version`, `License` or `Source`.
fn tag_prefix(tag: &str) -> String {
    let mut chars = tag.chars();
    let mut out = String::with_capacity(tag.len() + 1);
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.extend(chars.flat_map(char::to_lowercase));
    }
    out.push(':');
    out
}
