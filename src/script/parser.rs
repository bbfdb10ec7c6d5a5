//! nom grammar for effect programs.
//!
//! ```text
//! program    := statement (";" statement)* ";"*
//! statement  := ["return"] expr
//! expr       := or
//! or         := and ("||" and)*
//! and        := compare ("&&" compare)*
//! compare    := additive [("==" | "!=" | "<=" | ">=" | "<" | ">") additive]
//! additive   := term (("+" | "-") term)*
//! term       := unary (("*" | "/") unary)*
//! unary      := ("!" | "-") unary | primary
//! primary    := lambda | "(" expr ")" | string | int | bool | list | call | var
//! lambda     := ("(" params ")" | ident) "=>" ("{" program "}" | expr)
//! call       := path "(" args ")"
//! ```
//!
//! Call names are looked up in the vocabulary here; an unknown name is a
//! hard failure, never a fallback to a variable.

use std::sync::Arc;

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{
    alpha1, alphanumeric1, anychar, char, digit1, multispace0, multispace1, satisfy,
};
use nom::combinator::{cut, map, map_res, not, opt, recognize, value};
use nom::error::{ErrorKind, FromExternalError, ParseError};
use nom::multi::{many0, many0_count, separated_list0};
use nom::sequence::{delimited, pair, preceded, terminated};
use nom::IResult;

use super::ast::{BinaryOp, Expr, Lambda, UnaryOp};
use super::vocabulary::Builtin;
use crate::error::{ScriptError, ScriptResult};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Reason {
    Nom(ErrorKind),
    Expected(char),
    UnknownIdentifier(String),
    UnterminatedString,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SyntaxError<'a> {
    input: &'a str,
    reason: Reason,
}

impl<'a> ParseError<&'a str> for SyntaxError<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        Self {
            input,
            reason: Reason::Nom(kind),
        }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }

    fn from_char(input: &'a str, c: char) -> Self {
        Self {
            input,
            reason: Reason::Expected(c),
        }
    }

    // Keep whichever branch got further.
    fn or(self, other: Self) -> Self {
        if other.input.len() < self.input.len() {
            other
        } else {
            self
        }
    }
}

impl<'a, E> FromExternalError<&'a str, E> for SyntaxError<'a> {
    fn from_external_error(input: &'a str, kind: ErrorKind, _e: E) -> Self {
        Self::from_error_kind(input, kind)
    }
}

type PResult<'a, T> = IResult<&'a str, T, SyntaxError<'a>>;

/// Parse a whole program into its statements.
pub(crate) fn parse_program(source: &str) -> ScriptResult<Vec<Expr>> {
    match terminated(statements, multispace0)(source) {
        Ok(("", stmts)) => Ok(stmts),
        Ok((rest, _)) => Err(ScriptError::Parse {
            position: source.len() - rest.len(),
            message: format!("unexpected input {:?}", preview(rest)),
        }),
        Err(nom::Err::Error(err) | nom::Err::Failure(err)) => Err(to_script_error(source, err)),
        Err(nom::Err::Incomplete(_)) => Err(ScriptError::Parse {
            position: source.len(),
            message: "unexpected end of program".to_string(),
        }),
    }
}

fn to_script_error(source: &str, err: SyntaxError<'_>) -> ScriptError {
    let position = source.len() - err.input.len();
    match err.reason {
        Reason::UnknownIdentifier(name) => ScriptError::UnknownIdentifier(name),
        Reason::Expected(c) => ScriptError::Parse {
            position,
            message: format!("expected {c:?}"),
        },
        Reason::UnterminatedString => ScriptError::Parse {
            position,
            message: "unterminated string".to_string(),
        },
        Reason::Nom(kind) => ScriptError::Parse {
            position,
            message: if err.input.is_empty() {
                "unexpected end of program".to_string()
            } else {
                format!("unexpected {:?} ({})", preview(err.input), kind.description())
            },
        },
    }
}

fn preview(rest: &str) -> String {
    rest.chars().take(16).collect()
}

fn ws<'a, O>(
    inner: impl FnMut(&'a str) -> PResult<'a, O>,
) -> impl FnMut(&'a str) -> PResult<'a, O> {
    delimited(multispace0, inner, multispace0)
}

fn sym<'a>(token: &'static str) -> impl FnMut(&'a str) -> PResult<'a, &'a str> {
    ws(tag(token))
}

fn identifier(input: &str) -> PResult<'_, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn ident_char(input: &str) -> PResult<'_, char> {
    satisfy(|c| c.is_alphanumeric() || c == '_')(input)
}

fn statements(input: &str) -> PResult<'_, Vec<Expr>> {
    let (input, stmts) = separated_list0(sym(";"), statement)(input)?;
    let (input, _) = many0(sym(";"))(input)?;
    Ok((input, stmts))
}

fn statement(input: &str) -> PResult<'_, Expr> {
    preceded(ws(opt(terminated(tag("return"), multispace1))), expr)(input)
}

fn expr(input: &str) -> PResult<'_, Expr> {
    binary_chain(input, and_expr, &[("||", BinaryOp::Or)])
}

fn and_expr(input: &str) -> PResult<'_, Expr> {
    binary_chain(input, comparison, &[("&&", BinaryOp::And)])
}

fn comparison(input: &str) -> PResult<'_, Expr> {
    let (input, lhs) = additive(input)?;
    let op = alt((
        value(BinaryOp::Eq, sym("==")),
        value(BinaryOp::Ne, sym("!=")),
        value(BinaryOp::Le, sym("<=")),
        value(BinaryOp::Ge, sym(">=")),
        value(BinaryOp::Lt, sym("<")),
        value(BinaryOp::Gt, sym(">")),
    ));
    let (input, rhs) = opt(pair(op, cut(additive)))(input)?;
    Ok(match rhs {
        Some((op, rhs)) => (input, binary(op, lhs, rhs)),
        None => (input, lhs),
    })
}

fn additive(input: &str) -> PResult<'_, Expr> {
    binary_chain(input, term, &[("+", BinaryOp::Add), ("-", BinaryOp::Sub)])
}

fn term(input: &str) -> PResult<'_, Expr> {
    binary_chain(input, unary, &[("*", BinaryOp::Mul), ("/", BinaryOp::Div)])
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

/// Left-associative chain of `operand (op operand)*`.
fn binary_chain<'a>(
    input: &'a str,
    operand: fn(&'a str) -> PResult<'a, Expr>,
    ops: &[(&'static str, BinaryOp)],
) -> PResult<'a, Expr> {
    let (mut input, mut lhs) = operand(input)?;
    loop {
        let Some((rest, op)) = ops
            .iter()
            .find_map(|&(token, op)| sym(token)(input).ok().map(|(rest, _)| (rest, op)))
        else {
            return Ok((input, lhs));
        };
        let (rest, rhs) = cut(operand)(rest)?;
        lhs = binary(op, lhs, rhs);
        input = rest;
    }
}

fn unary(input: &str) -> PResult<'_, Expr> {
    alt((
        map(preceded(sym("!"), unary), |e| Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(e),
        }),
        map(preceded(sym("-"), unary), |e| Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(e),
        }),
        primary,
    ))(input)
}

fn primary(input: &str) -> PResult<'_, Expr> {
    ws(alt((
        lambda,
        delimited(sym("("), expr, cut(sym(")"))),
        map(string_literal, Expr::Str),
        map_res(digit1, |digits: &str| digits.parse::<i64>().map(Expr::Int)),
        boolean,
        list,
        call_or_variable,
    )))(input)
}

fn boolean(input: &str) -> PResult<'_, Expr> {
    terminated(
        alt((
            value(Expr::Bool(true), tag("true")),
            value(Expr::Bool(false), tag("false")),
        )),
        not(ident_char),
    )(input)
}

fn list(input: &str) -> PResult<'_, Expr> {
    map(
        preceded(
            sym("["),
            cut(terminated(
                separated_list0(sym(","), expr),
                pair(opt(sym(",")), sym("]")),
            )),
        ),
        Expr::List,
    )(input)
}

fn lambda(input: &str) -> PResult<'_, Expr> {
    let (input, params) = alt((
        delimited(sym("("), separated_list0(sym(","), ws(identifier)), sym(")")),
        map(ws(identifier), |p| vec![p]),
    ))(input)?;
    let (input, _) = sym("=>")(input)?;
    let block = map(delimited(sym("{"), statements, cut(sym("}"))), Expr::Block);
    let (input, body) = cut(alt((block, expr)))(input)?;
    let lambda = Lambda {
        params: params.into_iter().map(str::to_string).collect(),
        body,
    };
    Ok((input, Expr::Lambda(Arc::new(lambda))))
}

fn call_or_variable(input: &str) -> PResult<'_, Expr> {
    let dotted = many0_count(pair(char('.'), identifier));
    let (rest, path) = recognize(pair(identifier, dotted))(input)?;
    let (rest, open) = opt(sym("("))(rest)?;
    if open.is_some() {
        let (rest, args) = cut(terminated(
            separated_list0(sym(","), expr),
            pair(opt(sym(",")), sym(")")),
        ))(rest)?;
        return match Builtin::lookup(path) {
            Some(builtin) => Ok((rest, Expr::Call { builtin, args })),
            None => Err(unknown(input, path)),
        };
    }
    if path.contains('.') {
        return Err(unknown(input, path));
    }
    Ok((rest, Expr::Var(path.to_string())))
}

fn unknown<'a>(input: &'a str, name: &str) -> nom::Err<SyntaxError<'a>> {
    nom::Err::Failure(SyntaxError {
        input,
        reason: Reason::UnknownIdentifier(name.to_string()),
    })
}

/// Single- or double-quoted string with `\\`, `\'` and `\"` escapes.
fn string_literal(input: &str) -> PResult<'_, String> {
    let (mut rest, quote) = alt((char('\''), char('"')))(input)?;
    let mut out = String::new();
    loop {
        let Ok((after, c)) = anychar::<_, SyntaxError<'_>>(rest) else {
            return Err(nom::Err::Failure(SyntaxError {
                input,
                reason: Reason::UnterminatedString,
            }));
        };
        if c == quote {
            return Ok((after, out));
        }
        if c == '\\' {
            if let Ok((after_escape, escaped)) = anychar::<_, SyntaxError<'_>>(after) {
                out.push(escaped);
                rest = after_escape;
                continue;
            }
        }
        out.push(c);
        rest = after;
    }
}
