//! The raw parameter record supplied by the caller.
//!
//! `TidyParams` mirrors what an orchestration system hands over: strings for
//! age and size, an optional list of glob patterns and a handful of switches.
//! Nothing here is validated beyond its shape; [`crate::criteria::Criteria`]
//! does the parsing.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};

use crate::criteria::class_end;

/// Which timestamp of an entry decides its age.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, ValueEnum)]
pub enum TimestampKind {
    /// Last access time
    #[default]
    #[serde(rename = "atime")]
    #[value(name = "atime")]
    Access,
    /// Last modification time
    #[serde(rename = "mtime")]
    #[value(name = "mtime")]
    Modify,
    /// Last status change time
    #[serde(rename = "ctime")]
    #[value(name = "ctime")]
    Change,
}

/// Parameter record for one tidy run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TidyParams {
    /// File or directory to tidy
    #[serde(alias = "name")]
    pub path: PathBuf,

    /// Minimum age, e.g. "2d" or "3600"
    #[serde(default = "default_threshold", deserialize_with = "string_or_number")]
    pub age: String,

    /// Minimum size, e.g. "10m" or "512"
    #[serde(default = "default_threshold", deserialize_with = "string_or_number")]
    pub size: String,

    /// Basename glob patterns; absent means every name matches
    #[serde(default, deserialize_with = "pattern_list")]
    pub matches: Option<Vec<String>>,

    #[serde(default)]
    pub recurse: bool,

    #[serde(default)]
    pub rmdirs: bool,

    #[serde(default)]
    pub force: bool,

    #[serde(default)]
    pub silent: bool,

    #[serde(default)]
    pub timestamp: TimestampKind,

    /// Report what would be removed without removing it
    #[serde(default)]
    pub check_mode: bool,
}

fn default_threshold() -> String {
    String::from("0")
}

impl TidyParams {
    /// Parameters for `path` with every other option at its default.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TidyParams {
            path: path.into(),
            age: default_threshold(),
            size: default_threshold(),
            matches: None,
            recurse: false,
            rmdirs: false,
            force: false,
            silent: false,
            timestamp: TimestampKind::default(),
            check_mode: false,
        }
    }

    /// Parse a parameter record from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse tidy parameters")
    }

    /// Load a parameter record from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read parameter file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid parameter file {}", path.display()))
    }
}

/// Accepts `age = "2d"` as well as `age = 3600`.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// Accepts a list of patterns or a single comma-separated string.
fn pattern_list<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::List(list)) => Some(list),
        Some(Raw::Joined(joined)) => Some(split_patterns(&joined)),
    })
}

/// Split a comma-separated pattern string, dropping empty pieces.
///
/// Commas inside a character class such as `[,;]` do not split.
pub fn split_patterns(joined: &str) -> Vec<String> {
    let chars: Vec<char> = joined.chars().collect();
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            ',' => pieces.push(std::mem::take(&mut current)),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    current.extend(&chars[i..=end]);
                    i = end;
                }
                None => current.push('['),
            },
            c => current.push(c),
        }
        i += 1;
    }
    pieces.push(current);

    pieces
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
