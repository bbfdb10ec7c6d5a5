//! Effect interpreter.
//!
//! Card programs are written in a small expression language over a closed
//! vocabulary (`targets.*`, `conditions.*`, `actions.*`, `abilities.*`,
//! `triggers.*` and a few helpers). Programs are parsed with `nom` into an
//! AST, validated once by `Program::compile`, and evaluated by a
//! tree-walking interpreter that borrows the `GameState`.
//!
//! ## Key Types
//!
//! - `Program`: a compiled program
//! - `Value`: runtime values (numbers, collections, closures, abilities)
//! - `Frame`: the acting player/object and event bindings
//! - `Builtin`: the vocabulary table
//!
//! ## Entry points
//!
//! - `execute`: run a program
//! - `invoke`: call a stored closure (trigger actions, activated abilities)
//! - `eval_adjustment` / `eval_predicate`: side-effect-free evaluation
//!   while reading attributes

pub mod ast;
mod builtins;
mod interpreter;
mod parser;
pub mod program;
pub mod value;
pub mod vocabulary;

pub use interpreter::{eval_adjustment, eval_predicate, evaluate_targets, execute, invoke};
pub use program::Program;
pub use value::{AbilityDraft, Closure, Frame, Value};
pub use vocabulary::{Builtin, Signature};
