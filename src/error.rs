//! Error types for catalog loading, input validation and calculation

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalcError {
    #[error("invalid recipe: expected {expected} piece counts, got {actual}")]
    InvalidRecipe { expected: usize, actual: usize },

    #[error("quantity of {material} is too large to calculate")]
    Overflow { material: String },
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("{field} cannot be negative (got {value})")]
    Negative { field: String, value: i128 },

    #[error("{field} must be a whole number, got '{text}'")]
    NotInteger { field: String, text: String },

    #[error("{field} is too large: {value}")]
    TooLarge { field: String, value: i128 },

    #[error("expected NAME=QUANTITY, got '{0}'")]
    MalformedAssignment(String),

    #[error("unknown material '{0}'")]
    UnknownMaterial(String),

    #[error("unknown preset '{0}'")]
    UnknownPreset(String),

    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("catalog directory {0} has no catalog.ron")]
    MissingBase(PathBuf),

    #[error("catalog defines no materials")]
    NoMaterials,

    #[error("catalog defines no piece slots")]
    NoPieces,

    #[error("duplicate {kind} '{name}'")]
    Duplicate { kind: &'static str, name: String },

    #[error("{table} references unknown material '{material}'")]
    UnknownMaterial { table: &'static str, material: String },
}
