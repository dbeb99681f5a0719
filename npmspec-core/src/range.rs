//! npm range -> RPM comparator translation.
//!
//! Only the caret and tilde forms are modelled, and both collapse to a lower
//! bound: `^1.2.3` and `~1.2.3` become `name >= 1.2.3`. No upper bound is
//! emitted. Everything else (intervals, x-ranges, `||` unions, bare pins) is
//! an error so a dependency is never silently dropped.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::npm::rpm_name_for;

/// Comparator operators in the supported subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    AtLeast,
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::AtLeast => f.write_str(">="),
        }
    }
}

/// One translated dependency, rendered as `name >= version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,
    pub op: Comparator,
    pub version: String,
}

impl Requirement {
    /// Distribution package this dependency resolves to.
    pub fn rpm_name(&self) -> String {
        rpm_name_for(&self.name)
    }

    /// The `Requires:` value: `nodejs-<name> >= <version>`.
    pub fn rpm_dependency(&self) -> String {
        format!("{} {} {}", self.rpm_name(), self.op, self.version)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.op, self.version)
    }
}

/// Translate a single npm range for dependency `name`.
pub fn translate(name: &str, range: &str) -> Result<Requirement, CoreError> {
    let unsupported = || CoreError::UnsupportedRange {
        dependency: name.to_string(),
        range: range.to_string(),
    };

    let rest = range.trim();
    let rest = rest.strip_prefix('=').unwrap_or(rest);
    let rest = rest.strip_prefix('v').unwrap_or(rest);
    let rest = rest
        .strip_prefix('^')
        .or_else(|| rest.strip_prefix('~'))
        .ok_or_else(unsupported)?;
    let bound = rest.strip_prefix('v').unwrap_or(rest);
    if !is_plain_version(bound) {
        return Err(unsupported());
    }

    Ok(Requirement {
        name: name.to_string(),
        op: Comparator::AtLeast,
        version: bound.to_string(),
    })
}

/// A single concrete version: no whitespace, operators, unions or
/// wildcard components such as `1.x`.
fn is_plain_version(bound: &str) -> bool {
    if bound.is_empty()
        || !bound
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+'))
    {
        return false;
    }
    let core = bound.split(['-', '+']).next().unwrap_or_default();
    !core.split('.').any(|part| matches!(part, "x" | "X" | ""))
}

/// Translate a whole dependency table, in name order.
///
/// Fails on the first unsupported range; a partial list is never returned.
pub fn translate_all(deps: &BTreeMap<String, String>) -> Result<Vec<Requirement>, CoreError> {
    deps.iter()
        .map(|(name, range)| translate(name, range))
        .collect()
}
