//! Parser and binder for component definitions.
//!
//! A definition has the form `OUTPUT = FORMULA`, where the formula follows the
//! grammar
//!
//! ```text
//! Expr := Var | And(Expr, Expr {, Expr}) | Or(Expr, Expr {, Expr}) | Not(Expr)
//! ```
//!
//! Identifiers are bound against a [`SymbolTable`] while parsing, so every
//! leaf of the resulting [`Expr`] is the shared [`Var`] of its name. The text
//! is never evaluated; anything outside the grammar, including formulas
//! nested deeper than [`MAX_DEPTH`] operators, is a
//! [`MalformedExpression`](Error::MalformedExpression) carrying the byte
//! offset where parsing stopped.
//!
//! # Examples
//!
//! ```
//! use circuit_proof::parser::parse_definition;
//! use circuit_proof::symbol::SymbolTable;
//!
//! let symbols: SymbolTable = ["A", "B", "Y"].into_iter().collect();
//! let def = parse_definition("Y = And(A, Not(B))", &symbols).unwrap();
//! assert_eq!(def.output.name(), "Y");
//! assert_eq!(def.formula.to_string(), "And(A, Not(B))");
//! ```

use log::debug;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{alpha1, alphanumeric1, char, multispace0};
use nom::combinator::{all_consuming, cut, eof, opt, recognize};
use nom::error::{context, ContextError, ErrorKind, ParseError};
use nom::multi::{many0_count, separated_list1};
use nom::sequence::{pair, preceded, terminated};
use nom::{Err, IResult};

use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::symbol::{SymbolTable, Var};

/// Maximum operator nesting of a formula.
pub const MAX_DEPTH: usize = 128;

/// A parsed `OUTPUT = FORMULA` definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub output: Var,
    pub formula: Expr,
}

#[derive(Debug)]
enum FormulaError<'a> {
    /// A combinator failed at `input`; `expected` names what should have been there.
    Syntax {
        input: &'a str,
        expected: Option<&'static str>,
    },
    Message {
        input: &'a str,
        message: String,
    },
    Unknown {
        name: &'a str,
    },
}

impl<'a> ParseError<&'a str> for FormulaError<'a> {
    fn from_error_kind(input: &'a str, _kind: ErrorKind) -> Self {
        FormulaError::Syntax { input, expected: None }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<'a> ContextError<&'a str> for FormulaError<'a> {
    fn add_context(_input: &'a str, ctx: &'static str, other: Self) -> Self {
        match other {
            // The innermost context is the most precise one.
            FormulaError::Syntax { input, expected: None } => FormulaError::Syntax {
                input,
                expected: Some(ctx),
            },
            other => other,
        }
    }
}

impl FormulaError<'_> {
    /// Converts to [`Error`]; `text` is the parsed input and starts at offset `base`.
    fn into_error(self, text: &str, base: usize) -> Error {
        let position = |input: &str| base + text.len() - input.len();
        match self {
            FormulaError::Unknown { name } => Error::UnknownVariable { name: name.to_string() },
            FormulaError::Message { input, message } => Error::malformed(message, position(input)),
            FormulaError::Syntax { input, expected } => {
                let found = match input.chars().next() {
                    None => "end of input".to_string(),
                    Some(c) if !is_token_char(c) => {
                        return Error::malformed(format!("unsupported operator `{}`", c), position(input));
                    }
                    Some(c) => match identifier(input) {
                        Ok((_, name)) => format!("`{}`", name),
                        Err(_) => format!("`{}`", c),
                    },
                };
                let message = match expected {
                    Some(expected) => format!("expected {}, found {}", expected, found),
                    None => format!("unexpected {}", found),
                };
                Error::malformed(message, position(input))
            }
        }
    }
}

type PResult<'a, O> = IResult<&'a str, O, FormulaError<'a>>;

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '(' | ')' | ',')
}

fn fail<O>(input: &str, message: String) -> PResult<'_, O> {
    Err(Err::Failure(FormulaError::Message { input, message }))
}

fn identifier(input: &str) -> PResult<'_, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))(input)
}

/// Punctuation, optionally preceded by whitespace.
fn token<'a>(c: char) -> impl FnMut(&'a str) -> PResult<'a, char> {
    preceded(multispace0, char(c))
}

fn end_of_formula(input: &str) -> PResult<'_, &str> {
    preceded(multispace0, context("end of formula", eof))(input)
}

/// `Var | Op(Expr, ..)` at nesting level `depth`.
fn expr<'a>(input: &'a str, symbols: &SymbolTable, depth: usize) -> PResult<'a, Expr> {
    let (start, _) = multispace0::<_, FormulaError>(input)?;
    if depth > MAX_DEPTH {
        return fail(start, format!("formula nested deeper than {} levels", MAX_DEPTH));
    }

    let (input, name) = context("a variable or operator", identifier)(start)?;
    let (input, paren) = opt(token('('))(input)?;
    if paren.is_none() {
        return match symbols.get(name) {
            Some(var) => Ok((input, Expr::Var(var.clone()))),
            None => Err(Err::Failure(FormulaError::Unknown { name })),
        };
    }

    let (input, args) = cut(terminated(
        separated_list1(token(','), cut(|i: &'a str| expr(i, symbols, depth + 1))),
        context("`,` or `)`", token(')')),
    ))(input)?;

    let node = match name {
        "And" | "Or" if args.len() < 2 => {
            return fail(start, format!("`{}` needs at least two arguments, found {}", name, args.len()));
        }
        "And" => Expr::And(args),
        "Or" => Expr::Or(args),
        "Not" => match <[Expr; 1]>::try_from(args) {
            Ok([arg]) => Expr::not(arg),
            Err(args) => {
                return fail(start, format!("`Not` takes exactly one argument, found {}", args.len()));
            }
        },
        other => return fail(start, format!("unsupported operator `{}`", other)),
    };
    Ok((input, node))
}

fn parse_at<'a>(text: &'a str, base: usize, symbols: &SymbolTable) -> Result<Expr> {
    match terminated(|i: &'a str| expr(i, symbols, 0), end_of_formula)(text) {
        Ok((_, e)) => Ok(e),
        Err(Err::Error(e) | Err::Failure(e)) => Err(e.into_error(text, base)),
        Err(Err::Incomplete(_)) => Err(Error::malformed("incomplete formula", base + text.len())),
    }
}

/// Parses a bare formula (the right-hand side of a definition).
pub fn parse_formula(text: &str, symbols: &SymbolTable) -> Result<Expr> {
    debug!("parse_formula(text = {:?})", text);
    parse_at(text, 0, symbols)
}

/// Parses an `OUTPUT = FORMULA` definition, splitting on the first `=`.
///
/// The output name must be a declared symbol, just like every identifier of
/// the formula.
pub fn parse_definition(text: &str, symbols: &SymbolTable) -> Result<Definition> {
    debug!("parse_definition(text = {:?})", text);

    let Some(eq) = text.find('=') else {
        return Err(Error::malformed("missing `=` in definition", text.len()));
    };
    let lhs = text[..eq].trim();
    if lhs.is_empty() {
        return Err(Error::malformed("missing output name before `=`", 0));
    }
    if all_consuming(identifier)(lhs).is_err() {
        return Err(Error::malformed(format!("invalid output name `{}`", lhs), 0));
    }
    let output = symbols.get(lhs).cloned().ok_or_else(|| Error::UnknownVariable { name: lhs.to_string() })?;

    let formula = parse_at(&text[eq + 1..], eq + 1, symbols)?;
    Ok(Definition { output, formula })
}
