//! Definition loading errors

use thiserror::Error;

/// A property definition rejected while loading a table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedEntry {
    #[error("entry {index}: empty property name")]
    EmptyName { index: usize },

    #[error("entry {index}: invalid character {character:?} in property name '{name}'")]
    InvalidName {
        index: usize,
        name: String,
        character: char,
    },

    #[error("entry {index}: property name '{name}' uses the reserved prefix '{prefix}'")]
    ReservedPrefix {
        index: usize,
        name: String,
        prefix: String,
    },

    #[error("entry {index}: property '{name}' has an empty syntax")]
    EmptySyntax { index: usize, name: String },

    #[error("entry {index}: duplicate property '{name}'")]
    Duplicate { index: usize, name: String },
}

/// Why a definitions table could not be loaded
#[derive(Debug, Error)]
pub enum DefinitionLoadError {
    #[error("{} malformed property definition(s): {}", .entries.len(), join_entries(.entries))]
    MalformedEntries { entries: Vec<MalformedEntry> },

    #[error("invalid definitions JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn join_entries(entries: &[MalformedEntry]) -> String {
    entries
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
