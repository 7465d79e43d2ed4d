//! Expression Parser
//!
//! Parses Graphite target strings into [`Expr`] trees.
//!
//! # Supported Syntax
//!
//! ```text
//! expr    := call | string | bool | number | name
//! call    := ident '(' [arg (',' arg)*] ')'
//! arg     := ident '=' expr | expr
//! string  := '"' .* '"' | '\'' .* '\''
//! name    := (namechar+ | '{' [^}]* '}')+
//! ```
//!
//! `%` is accepted as a name character so rewrite templates can be checked
//! with their placeholders still in place.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::{map, not, opt, peek, recognize, value},
    error::ErrorKind,
    multi::{many1, separated_list0},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

use crate::expr::ast::Expr;
use crate::expr::error::{ExprError, ExprResult};

/// Parse a target string into an expression
pub fn parse_expr(input: &str) -> ExprResult<Expr> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ExprError::Parse("empty expression".to_string()));
    }

    match parse_expression(trimmed) {
        Ok((remaining, expr)) => {
            if remaining.trim().is_empty() {
                Ok(expr)
            } else {
                Err(ExprError::Parse(format!(
                    "Unexpected input after expression: '{}'",
                    remaining.trim()
                )))
            }
        }
        Err(e) => Err(ExprError::Parse(format!("{:?}", e))),
    }
}

fn parse_expression(input: &str) -> IResult<&str, Expr> {
    delimited(
        multispace0,
        alt((
            parse_call,
            map(parse_quoted_string, Expr::Str),
            parse_bool,
            parse_number,
            map(parse_name, |s: &str| Expr::Name(s.to_string())),
        )),
        multispace0,
    )(input)
}

/// Argument inside a call: either `key=value` or a plain expression
enum CallArg {
    Positional(Expr),
    Named(String, Expr),
}

fn parse_call(input: &str) -> IResult<&str, Expr> {
    let (input, target) = parse_identifier(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char('(')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, call_args) = separated_list0(char(','), parse_call_arg)(input)?;
    let (input, _) = multispace0(input)?;
    let (input, _) = char(')')(input)?;

    let mut args = Vec::new();
    let mut named = Vec::new();
    for arg in call_args {
        match arg {
            CallArg::Positional(expr) => args.push(expr),
            CallArg::Named(key, expr) => named.push((key, expr)),
        }
    }

    Ok((
        input,
        Expr::Call {
            target: target.to_string(),
            args,
            named,
        },
    ))
}

fn parse_call_arg(input: &str) -> IResult<&str, CallArg> {
    alt((
        map(
            pair(
                delimited(multispace0, parse_identifier, multispace0),
                preceded(terminated(char('='), not(char('='))), parse_expression),
            ),
            |(key, expr)| CallArg::Named(key.to_string(), expr),
        ),
        map(parse_expression, CallArg::Positional),
    ))(input)
}

fn parse_bool(input: &str) -> IResult<&str, Expr> {
    terminated(
        alt((
            value(Expr::Bool(true), alt((tag("true"), tag("True")))),
            value(Expr::Bool(false), alt((tag("false"), tag("False")))),
        )),
        not(peek(take_while1(is_name_char))),
    )(input)
}

/// Numbers must not run into name characters, so `1min.a` stays a name
fn parse_number(input: &str) -> IResult<&str, Expr> {
    let (rest, text) = terminated(
        recognize(tuple((
            opt(alt((char('-'), char('+')))),
            digit1,
            opt(pair(char('.'), digit1)),
            opt(tuple((
                alt((char('e'), char('E'))),
                opt(alt((char('-'), char('+')))),
                digit1,
            ))),
        ))),
        not(peek(take_while1(is_name_char))),
    )(input)?;

    if let Ok(v) = text.parse::<i64>() {
        return Ok((rest, Expr::Int(v)));
    }
    match text.parse::<f64>() {
        Ok(v) => Ok((rest, Expr::Float(v))),
        Err(_) => Err(nom::Err::Error(nom::error::Error::new(input, ErrorKind::Float))),
    }
}

fn parse_name(input: &str) -> IResult<&str, &str> {
    recognize(many1(alt((
        take_while1(is_name_char),
        recognize(delimited(char('{'), take_while(|c| c != '}'), char('}'))),
    ))))(input)
}

fn parse_identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))(input)
}

fn parse_quoted_string(input: &str) -> IResult<&str, String> {
    alt((
        map(
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
            |s: &str| s.to_string(),
        ),
        map(
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            |s: &str| s.to_string(),
        ),
    ))(input)
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric()
        || matches!(
            c,
            '.' | '_' | '-' | '*' | '?' | '[' | ']' | ':' | '#' | '$' | '%' | '^' | '~' | '@' | '!'
                | '|' | '+' | '<' | '>' | '&' | ';' | '/' | '\\'
        )
}
