//! Expression Abstract Syntax Tree
//!
//! Graphite render targets are nested function calls over metric paths:
//!
//! ```text
//! a.b.c.d
//! sumSeries(a.b.*.d)
//! seriesAbove(a.b,0)
//! alias(scale(a.b.c, 2.5), "scaled")
//! groupByNode(a.*.c, 1, func="sum")
//! ```

use crate::expr::error::{ExprError, ExprResult};
use std::fmt;

/// A parsed target expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Metric path, possibly containing glob characters
    Name(String),
    /// Function call with positional and named arguments
    Call {
        target: String,
        args: Vec<Expr>,
        named: Vec<(String, Expr)>,
    },
    /// Quoted string constant
    Str(String),
    /// Integer constant
    Int(i64),
    /// Floating point constant
    Float(f64),
    /// Boolean constant
    Bool(bool),
}

impl Expr {
    /// Create a call expression with positional arguments only
    pub fn call(target: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            target: target.into(),
            args,
            named: Vec::new(),
        }
    }

    /// Create a metric path expression
    pub fn name(path: impl Into<String>) -> Self {
        Expr::Name(path.into())
    }

    /// Create a string constant
    pub fn string(value: impl Into<String>) -> Self {
        Expr::Str(value.into())
    }

    /// Function name for calls, empty for everything else
    pub fn target(&self) -> &str {
        match self {
            Expr::Call { target, .. } => target,
            _ => "",
        }
    }

    /// Positional arguments; empty unless this is a call
    pub fn args(&self) -> &[Expr] {
        match self {
            Expr::Call { args, .. } => args,
            _ => &[],
        }
    }

    /// Named arguments; empty unless this is a call
    pub fn named_args(&self) -> &[(String, Expr)] {
        match self {
            Expr::Call { named, .. } => named,
            _ => &[],
        }
    }

    /// True for expressions that resolve to series (paths and calls)
    pub fn is_series(&self) -> bool {
        matches!(self, Expr::Name(_) | Expr::Call { .. })
    }

    /// Kind of node, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Name(_) => "name",
            Expr::Call { .. } => "function call",
            Expr::Str(_) => "string",
            Expr::Int(_) => "integer",
            Expr::Float(_) => "float",
            Expr::Bool(_) => "boolean",
        }
    }

    /// Positional argument `n`
    pub fn arg(&self, n: usize) -> ExprResult<&Expr> {
        self.args().get(n).ok_or_else(|| ExprError::MissingArgument {
            function: self.target().to_string(),
            position: n,
        })
    }

    /// Positional argument `n` as an integer
    ///
    /// Float constants are truncated toward zero.
    pub fn get_int_arg(&self, n: usize) -> ExprResult<i64> {
        match self.arg(n)? {
            Expr::Int(v) => Ok(*v),
            Expr::Float(v) if v.is_finite() => Ok(v.trunc() as i64),
            other => Err(self.wrong_type(n, "integer", other)),
        }
    }

    /// Positional argument `n` as a string
    pub fn get_string_arg(&self, n: usize) -> ExprResult<&str> {
        match self.arg(n)? {
            Expr::Str(v) => Ok(v),
            other => Err(self.wrong_type(n, "string", other)),
        }
    }

    /// Positional argument `n` as a float
    pub fn get_float_arg(&self, n: usize) -> ExprResult<f64> {
        match self.arg(n)? {
            Expr::Int(v) => Ok(*v as f64),
            Expr::Float(v) => Ok(*v),
            other => Err(self.wrong_type(n, "float", other)),
        }
    }

    fn wrong_type(&self, position: usize, expected: &'static str, found: &Expr) -> ExprError {
        ExprError::WrongArgumentType {
            function: self.target().to_string(),
            position,
            expected,
            found: found.kind(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Name(path) => write!(f, "{}", path),
            Expr::Call {
                target,
                args,
                named,
            } => {
                write!(f, "{}(", target)?;
                let mut first = true;
                for arg in args {
                    if !first {
                        write!(f, ",")?;
                    }
                    first = false;
                    write!(f, "{}", arg)?;
                }
                for (key, value) in named {
                    if !first {
                        write!(f, ",")?;
                    }
                    first = false;
                    write!(f, "{}={}", key, value)?;
                }
                write!(f, ")")
            }
            Expr::Str(s) if s.contains('"') => write!(f, "'{}'", s),
            Expr::Str(s) => write!(f, "\"{}\"", s),
            Expr::Int(v) => write!(f, "{}", v),
            Expr::Float(v) => write!(f, "{:?}", v),
            Expr::Bool(v) => write!(f, "{}", v),
        }
    }
}
