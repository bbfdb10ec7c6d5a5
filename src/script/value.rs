//! Runtime values of the effect interpreter.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::ast::{Expr, Lambda};
use crate::core::{AbilityTargets, EntityId, PassiveKind, PlayerColor, TriggerSpec};
use crate::error::{ScriptError, ScriptResult};
use crate::targeting::{Collection, Condition};

/// Who is acting and which event is being handled.
///
/// Captured by closures when they are created and re-bound when abilities
/// and triggers fire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// `targets.self()`
    pub player: PlayerColor,
    /// `targets.thisObject()`
    pub this_object: Option<EntityId>,
    /// `targets.it()`: the agent of the event being handled.
    pub it: Option<EntityId>,
    /// `targets.itP()`: the player the event concerns.
    pub it_player: Option<PlayerColor>,
    /// `targets.that()`: the undergoer of the event being handled.
    pub that: Option<EntityId>,
    /// Ability that is executing, used to tag anything it installs.
    pub source: Option<EntityId>,
}

impl Frame {
    #[must_use]
    pub fn for_player(player: PlayerColor) -> Self {
        Self {
            player,
            this_object: None,
            it: None,
            it_player: None,
            that: None,
            source: None,
        }
    }

    #[must_use]
    pub fn for_object(player: PlayerColor, object: EntityId) -> Self {
        Self {
            this_object: Some(object),
            ..Self::for_player(player)
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }
}

/// A lambda together with the locals and frame it closed over.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Closure {
    pub lambda: Arc<Lambda>,
    pub captured: Vec<(String, Value)>,
    pub frame: Frame,
}

impl Closure {
    /// A closure that ignores its arguments and returns `value`.
    #[must_use]
    pub fn constant(frame: Frame, value: i64) -> Self {
        Self {
            lambda: Arc::new(Lambda {
                params: Vec::new(),
                body: Expr::Int(value),
            }),
            captured: Vec::new(),
            frame,
        }
    }
}

/// An ability built by `abilities.*`, not yet installed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum AbilityDraft {
    Passive {
        kind: PassiveKind,
        targets: AbilityTargets,
    },
    Activated {
        action: Closure,
        text: String,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Value {
    Unit,
    Int(i64),
    Bool(bool),
    Str(String),
    List(Vec<Value>),
    Collection(Collection),
    Condition(Box<Condition>),
    Closure(Closure),
    Ability(Box<AbilityDraft>),
    Trigger(Box<TriggerSpec>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Collection(a), Value::Collection(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "nothing",
            Value::Int(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Collection(_) => "collection",
            Value::Condition(_) => "condition",
            Value::Closure(_) => "function",
            Value::Ability(_) => "ability",
            Value::Trigger(_) => "trigger",
        }
    }

    fn mismatch<T>(&self, expected: &'static str) -> ScriptResult<T> {
        Err(ScriptError::TypeMismatch {
            expected,
            found: self.type_name(),
        })
    }

    pub fn into_int(self) -> ScriptResult<i64> {
        match self {
            Value::Int(n) => Ok(n),
            other => other.mismatch("number"),
        }
    }

    /// Truthiness for `ifThen` and `&&`/`||`: only booleans qualify.
    pub fn into_bool(self) -> ScriptResult<bool> {
        match self {
            Value::Bool(b) => Ok(b),
            other => other.mismatch("boolean"),
        }
    }

    pub fn into_string(self) -> ScriptResult<String> {
        match self {
            Value::Str(s) => Ok(s),
            other => other.mismatch("string"),
        }
    }

    /// A string, or a list of strings.
    pub fn into_strings(self) -> ScriptResult<Vec<String>> {
        match self {
            Value::Str(s) => Ok(vec![s]),
            Value::List(items) => items.into_iter().map(Value::into_string).collect(),
            other => other.mismatch("string or list of strings"),
        }
    }

    pub fn into_collection(self) -> ScriptResult<Collection> {
        match self {
            Value::Collection(c) => Ok(c),
            other => other.mismatch("collection"),
        }
    }

    pub fn into_closure(self) -> ScriptResult<Closure> {
        match self {
            Value::Closure(c) => Ok(c),
            other => other.mismatch("function"),
        }
    }

    /// A list of conditions; a single condition is accepted as a list of one.
    pub fn into_conditions(self) -> ScriptResult<Vec<Condition>> {
        match self {
            Value::Condition(c) => Ok(vec![*c]),
            Value::List(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Condition(c) => Ok(*c),
                    other => other.mismatch("condition"),
                })
                .collect(),
            other => other.mismatch("list of conditions"),
        }
    }

    /// A closure evaluated later, or a collection fixed now.
    pub fn into_ability_targets(self) -> ScriptResult<AbilityTargets> {
        match self {
            Value::Closure(c) => Ok(AbilityTargets::Deferred(c)),
            Value::Collection(c) => Ok(AbilityTargets::Fixed(c)),
            other => other.mismatch("function or collection"),
        }
    }
}
