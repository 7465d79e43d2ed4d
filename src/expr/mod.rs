//! Target Expressions
//!
//! The query language the rewrite engine reads from and writes to:
//!
//! - **AST**: `Expr` with typed positional argument accessors
//! - **Parser**: Parse target strings into `Expr`
//!
//! ```rust
//! use graphite_alias::expr::parse_expr;
//!
//! let expr = parse_expr("myAlias(a.b.*, 2, \"seriesAbove(%,0)\")").unwrap();
//! assert_eq!(expr.target(), "myAlias");
//! assert_eq!(expr.get_int_arg(1).unwrap(), 2);
//! ```

mod ast;
mod error;
mod parser;

pub use ast::Expr;
pub use error::{ExprError, ExprResult};
pub use parser::parse_expr;
