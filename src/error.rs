//! Error types for the rules engine.
//!
//! Illegal player actions are not errors: they leave the state unchanged
//! and return `Ok`. Errors are reserved for malformed effect programs,
//! invalid decks, and snapshot (de)serialization failures.

use thiserror::Error;

/// Failure to parse a `"q,r,s"` hex key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseHexError {
    #[error("malformed hex key: {0:?}")]
    Malformed(String),

    #[error("hex key is not on the q+r+s=0 plane: {0:?}")]
    NotOnPlane(String),
}

/// Interpreter errors raised while compiling or executing an effect program.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("parse error at offset {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),

    #[error("{name} expects {expected} argument(s), found {found}")]
    Arity {
        name: &'static str,
        expected: String,
        found: usize,
    },

    #[error("unbound variable: {0}")]
    UnboundVariable(String),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("{action} cannot target {found} (expected {expected})")]
    TargetKindMismatch {
        action: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{0} has side effects and cannot run while computing an attribute")]
    ImpureContext(&'static str),

    #[error("unknown card: {0}")]
    UnknownCard(String),

    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("unknown effect: {0}")]
    UnknownEffect(String),

    #[error("unknown property: {0}")]
    UnknownProperty(String),

    #[error("unknown card type: {0}")]
    UnknownCardType(String),

    #[error("program nesting too deep")]
    RecursionLimit,
}

/// Top-level engine error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("script error: {0}")]
    Script(#[from] ScriptError),

    #[error("invalid deck: {0}")]
    InvalidDeck(String),

    #[error("format error: {0}")]
    Format(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

impl From<bincode::Error> for GameError {
    fn from(err: bincode::Error) -> Self {
        GameError::Snapshot(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

/// Result alias for interpreter operations.
pub type ScriptResult<T> = std::result::Result<T, ScriptError>;
