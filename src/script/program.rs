//! Compiled effect programs.
//!
//! `Program::compile` parses a program and validates it against the
//! vocabulary: call arity, variable scoping, and (recursively) every
//! literal program string handed to `giveAbility`. A program that
//! compiles can only fail at runtime on type or target-kind mismatches.

use serde::{Deserialize, Serialize};

use super::ast::Expr;
use super::parser::parse_program;
use crate::error::{ScriptError, ScriptResult};

/// Nested `giveAbility` program strings deeper than this are rejected.
const MAX_PROGRAM_NESTING: usize = 8;

/// A parsed and validated effect program.
///
/// ```
/// use hexbots::script::Program;
///
/// let program = Program::compile("actions.draw(targets.self(), 1)").unwrap();
/// assert_eq!(program.statements().len(), 1);
///
/// assert!(Program::compile("actions.draw(targets.self())").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    source: String,
    statements: Vec<Expr>,
}

impl Program {
    /// Parse and validate a program.
    pub fn compile(source: &str) -> ScriptResult<Self> {
        compile_nested(source, 0)
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn statements(&self) -> &[Expr] {
        &self.statements
    }
}

fn compile_nested(source: &str, depth: usize) -> ScriptResult<Program> {
    if depth > MAX_PROGRAM_NESTING {
        return Err(ScriptError::RecursionLimit);
    }
    let statements = parse_program(source)?;
    let mut scope = Vec::new();
    for stmt in &statements {
        check(stmt, &mut scope, depth)?;
    }
    Ok(Program {
        source: source.to_string(),
        statements,
    })
}

fn check(expr: &Expr, scope: &mut Vec<String>, depth: usize) -> ScriptResult<()> {
    match expr {
        Expr::Int(_) | Expr::Bool(_) | Expr::Str(_) => Ok(()),
        Expr::Var(name) => {
            if scope.iter().any(|bound| bound == name) {
                Ok(())
            } else {
                Err(ScriptError::UnboundVariable(name.clone()))
            }
        }
        Expr::List(items) | Expr::Block(items) => {
            items.iter().try_for_each(|item| check(item, scope, depth))
        }
        Expr::Unary { operand, .. } => check(operand, scope, depth),
        Expr::Binary { lhs, rhs, .. } => {
            check(lhs, scope, depth)?;
            check(rhs, scope, depth)
        }
        Expr::Lambda(lambda) => {
            let mark = scope.len();
            scope.extend(lambda.params.iter().cloned());
            let result = check(&lambda.body, scope, depth);
            scope.truncate(mark);
            result
        }
        Expr::Call { builtin, args } => {
            let sig = builtin.signature();
            if args.len() < sig.min_args || args.len() > sig.max_args {
                let expected = if sig.min_args == sig.max_args {
                    sig.min_args.to_string()
                } else {
                    format!("{}-{}", sig.min_args, sig.max_args)
                };
                return Err(ScriptError::Arity {
                    name: sig.name,
                    expected,
                    found: args.len(),
                });
            }
            if builtin.takes_program() {
                if let Some(Expr::Str(nested)) = args.get(1) {
                    compile_nested(nested, depth + 1)?;
                }
            }
            args.iter().try_for_each(|arg| check(arg, scope, depth))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_keeps_source() {
        let source = "actions.dealDamage(targets.opponent(), 2)";
        assert_eq!(Program::compile(source).unwrap().source(), source);
    }

    #[test]
    fn test_arity_errors() {
        assert_eq!(
            Program::compile("targets.self(1)"),
            Err(ScriptError::Arity {
                name: "targets.self",
                expected: "0".to_string(),
                found: 1
            })
        );
        assert_eq!(
            Program::compile("setTrigger(1)"),
            Err(ScriptError::Arity {
                name: "setTrigger",
                expected: "2-3".to_string(),
                found: 1
            })
        );
    }

    #[test]
    fn test_unbound_variable() {
        assert_eq!(
            Program::compile("actions.draw(targets.self(), n)"),
            Err(ScriptError::UnboundVariable("n".to_string()))
        );
        assert!(Program::compile("actions.forEach(allTiles(), (t) => count(t))").is_ok());
    }

    #[test]
    fn test_lambda_scope_ends_with_lambda() {
        assert_eq!(
            Program::compile("actions.ifThen(true, (x) => x); x"),
            Err(ScriptError::UnboundVariable("x".to_string()))
        );
    }

    #[test]
    fn test_nested_program_strings_are_validated() {
        let good = "actions.giveAbility(targets.thisObject(), \"actions.draw(targets.self(), 1)\")";
        assert!(Program::compile(good).is_ok());

        let bad = "abilities.giveAbility(() => targets.thisObject(), 'actions.fly()')";
        assert_eq!(
            Program::compile(bad),
            Err(ScriptError::UnknownIdentifier("actions.fly".to_string()))
        );
    }
}
