//! Tree-walking evaluator for compiled programs.
//!
//! An `Interpreter` borrows the game state either mutably (programs run by
//! cards, abilities and triggers) or read-only (attribute adjustments and
//! comparisons evaluated while *reading* an attribute). In read-only mode
//! any impure builtin fails with `ScriptError::ImpureContext`.
//!
//! Interpreter-local memory (`save(key, value)`) lives for one top-level
//! execution. The `duration` key makes attribute modifications temporary;
//! `oneShot` marks installed passive abilities as one-shot.

use rustc_hash::FxHashMap;

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::program::Program;
use super::value::{Closure, Frame, Value};
use super::vocabulary::Builtin;
use crate::core::{AbilityTargets, GameState};
use crate::error::{ScriptError, ScriptResult};
use crate::targeting::Collection;

/// Nested closure calls deeper than this abort the program.
const MAX_CALL_DEPTH: usize = 64;

pub(super) enum StateAccess<'s> {
    Mutable(&'s mut GameState),
    ReadOnly(&'s GameState),
}

/// Evaluation environment: the acting frame plus bound lambda parameters.
pub(super) struct Env {
    pub(super) frame: Frame,
    locals: Vec<(String, Value)>,
}

pub(super) struct Interpreter<'s> {
    state: StateAccess<'s>,
    pub(super) memory: FxHashMap<String, Value>,
    depth: usize,
}

impl<'s> Interpreter<'s> {
    pub(super) fn new(state: &'s mut GameState) -> Self {
        Self {
            state: StateAccess::Mutable(state),
            memory: FxHashMap::default(),
            depth: 0,
        }
    }

    pub(super) fn read_only(state: &'s GameState) -> Self {
        Self {
            state: StateAccess::ReadOnly(state),
            memory: FxHashMap::default(),
            depth: 0,
        }
    }

    pub(super) fn state(&self) -> &GameState {
        match &self.state {
            StateAccess::Mutable(state) => &**state,
            StateAccess::ReadOnly(state) => *state,
        }
    }

    /// Mutable state for an impure builtin.
    pub(super) fn state_mut(&mut self, builtin: Builtin) -> ScriptResult<&mut GameState> {
        match &mut self.state {
            StateAccess::Mutable(state) => Ok(&mut **state),
            StateAccess::ReadOnly(_) => Err(ScriptError::ImpureContext(builtin.name())),
        }
    }

    fn run(&mut self, program: &Program, frame: Frame) -> ScriptResult<Value> {
        let mut env = Env {
            frame,
            locals: Vec::new(),
        };
        let mut last = Value::Unit;
        for stmt in program.statements() {
            last = self.eval(stmt, &mut env)?;
        }
        Ok(last)
    }

    /// Call a closure. `frame` overrides the closure's captured frame.
    pub(super) fn call(
        &mut self,
        closure: &Closure,
        args: Vec<Value>,
        frame: Option<Frame>,
    ) -> ScriptResult<Value> {
        if self.depth >= MAX_CALL_DEPTH {
            return Err(ScriptError::RecursionLimit);
        }
        let mut locals = closure.captured.clone();
        let mut args = args.into_iter();
        for param in &closure.lambda.params {
            locals.push((param.clone(), args.next().unwrap_or(Value::Unit)));
        }
        let mut env = Env {
            frame: frame.unwrap_or_else(|| closure.frame.clone()),
            locals,
        };
        self.depth += 1;
        let result = self.eval(&closure.lambda.body, &mut env);
        self.depth -= 1;
        result
    }

    pub(super) fn eval(&mut self, expr: &Expr, env: &mut Env) -> ScriptResult<Value> {
        match expr {
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::List(items) => items
                .iter()
                .map(|item| self.eval(item, env))
                .collect::<ScriptResult<Vec<_>>>()
                .map(Value::List),
            Expr::Var(name) => env
                .locals
                .iter()
                .rev()
                .find(|(bound, _)| bound == name)
                .map(|(_, value)| value.clone())
                .ok_or_else(|| ScriptError::UnboundVariable(name.clone())),
            Expr::Lambda(lambda) => Ok(Value::Closure(Closure {
                lambda: lambda.clone(),
                captured: env.locals.clone(),
                frame: env.frame.clone(),
            })),
            Expr::Block(stmts) => {
                let mut last = Value::Unit;
                for stmt in stmts {
                    last = self.eval(stmt, env)?;
                }
                Ok(last)
            }
            Expr::Unary { op, operand } => {
                let value = self.eval(operand, env)?;
                match op {
                    UnaryOp::Neg => Ok(Value::Int(-value.into_int()?)),
                    UnaryOp::Not => Ok(Value::Bool(!value.into_bool()?)),
                }
            }
            Expr::Binary { op, lhs, rhs } => self.eval_binary(*op, lhs, rhs, env),
            Expr::Call { builtin, args } => {
                if !builtin.is_pure() {
                    if let StateAccess::ReadOnly(_) = self.state {
                        return Err(ScriptError::ImpureContext(builtin.name()));
                    }
                }
                log::trace!("calling {}", builtin.name());
                let values = args
                    .iter()
                    .map(|arg| self.eval(arg, env))
                    .collect::<ScriptResult<Vec<_>>>()?;
                self.call_builtin(*builtin, values, env)
            }
        }
    }

    fn eval_binary(
        &mut self,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
        env: &mut Env,
    ) -> ScriptResult<Value> {
        match op {
            BinaryOp::And => {
                if !self.eval(lhs, env)?.into_bool()? {
                    return Ok(Value::Bool(false));
                }
                return Ok(Value::Bool(self.eval(rhs, env)?.into_bool()?));
            }
            BinaryOp::Or => {
                if self.eval(lhs, env)?.into_bool()? {
                    return Ok(Value::Bool(true));
                }
                return Ok(Value::Bool(self.eval(rhs, env)?.into_bool()?));
            }
            _ => {}
        }

        let left = self.eval(lhs, env)?;
        let right = self.eval(rhs, env)?;
        match op {
            BinaryOp::Eq => return Ok(Value::Bool(left == right)),
            BinaryOp::Ne => return Ok(Value::Bool(left != right)),
            _ => {}
        }

        let (a, b) = (left.into_int()?, right.into_int()?);
        Ok(match op {
            BinaryOp::Add => Value::Int(a.saturating_add(b)),
            BinaryOp::Sub => Value::Int(a.saturating_sub(b)),
            BinaryOp::Mul => Value::Int(a.saturating_mul(b)),
            // Integer division; dividing by zero yields zero.
            BinaryOp::Div => Value::Int(a.checked_div(b).unwrap_or(0)),
            BinaryOp::Lt => Value::Bool(a < b),
            BinaryOp::Le => Value::Bool(a <= b),
            BinaryOp::Gt => Value::Bool(a > b),
            BinaryOp::Ge => Value::Bool(a >= b),
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::And | BinaryOp::Or => Value::Unit,
        })
    }
}

/// Run a program against the state.
///
/// ```
/// # use std::sync::Arc;
/// use hexbots::cards::CardRegistry;
/// use hexbots::core::{GameConfig, GameState, PlayerColor, PlayerMap};
/// use hexbots::script::{execute, Frame, Program, Value};
///
/// let mut state = GameState::new(
///     GameConfig::default(),
///     Arc::new(CardRegistry::new()),
///     PlayerMap::new(|c| c.name().to_string()),
///     7,
/// );
/// let program = Program::compile("count(allTiles()) * 2").unwrap();
/// let value = execute(&mut state, &program, Frame::for_player(PlayerColor::Orange)).unwrap();
/// assert_eq!(value, Value::Int(74));
/// ```
pub fn execute(state: &mut GameState, program: &Program, frame: Frame) -> ScriptResult<Value> {
    Interpreter::new(state).run(program, frame)
}

/// Call a stored closure (ability target, trigger action, ...) with an
/// explicit frame.
pub fn invoke(
    state: &mut GameState,
    closure: &Closure,
    args: Vec<Value>,
    frame: Frame,
) -> ScriptResult<Value> {
    Interpreter::new(state).call(closure, args, Some(frame))
}

/// Apply an attribute-adjustment closure to `value` without side effects.
pub fn eval_adjustment(state: &GameState, closure: &Closure, value: i64) -> ScriptResult<i64> {
    Interpreter::read_only(state)
        .call(closure, vec![Value::Int(value)], None)?
        .into_int()
}

/// Evaluate an attribute comparison closure without side effects.
pub fn eval_predicate(state: &GameState, closure: &Closure, value: i64) -> ScriptResult<bool> {
    Interpreter::read_only(state)
        .call(closure, vec![Value::Int(value)], None)?
        .into_bool()
}

/// Resolve an ability's target descriptor.
pub fn evaluate_targets(
    state: &mut GameState,
    targets: &AbilityTargets,
    frame: Frame,
) -> ScriptResult<Collection> {
    match targets {
        AbilityTargets::Fixed(collection) => Ok(collection.clone()),
        AbilityTargets::Deferred(closure) => {
            invoke(state, closure, Vec::new(), frame)?.into_collection()
        }
    }
}
