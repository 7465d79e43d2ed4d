//! Argument and documentation types for alias functions
//!
//! - `ArgType` / `ArgumentSpec`: formal parameters as configured
//! - `FunctionParam` / `FunctionDescription`: the documentation projection
//!   served to function-listing consumers

use serde::{Deserialize, Serialize};

/// Type tag of a formal parameter
///
/// Names follow the parameter types graphite-web publishes in its
/// function listing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ArgType {
    /// A single series expression
    SeriesList,
    /// Several series expressions
    SeriesLists,
    /// Node index into a metric path
    Node,
    /// Node index or tag name
    NodeOrTag,
    /// Integer constant
    Integer,
    /// Integer or time interval
    IntOrInterval,
    /// Integer or `inf`
    IntOrInf,
    /// Floating point constant
    Float,
    /// String constant
    String,
    /// Boolean constant
    Boolean,
    /// Time interval such as `5min`
    Interval,
    /// Aggregation function name
    AggFunc,
    /// Aggregation function name or series function
    AggOrSeriesFunc,
    /// Tag expression
    Tag,
    /// Absolute or relative date
    Date,
    /// Anything
    #[default]
    Any,
}

impl std::fmt::Display for ArgType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SeriesList => "seriesList",
            Self::SeriesLists => "seriesLists",
            Self::Node => "node",
            Self::NodeOrTag => "nodeOrTag",
            Self::Integer => "integer",
            Self::IntOrInterval => "intOrInterval",
            Self::IntOrInf => "intOrInf",
            Self::Float => "float",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Interval => "interval",
            Self::AggFunc => "aggFunc",
            Self::AggOrSeriesFunc => "aggOrSeriesFunc",
            Self::Tag => "tag",
            Self::Date => "date",
            Self::Any => "any",
        };
        write!(f, "{}", s)
    }
}

/// One formal parameter of an alias
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArgumentSpec {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "type", default)]
    pub arg_type: ArgType,
}

impl ArgumentSpec {
    /// Create a parameter
    pub fn new(name: impl Into<String>, required: bool, arg_type: ArgType) -> Self {
        Self {
            name: name.into(),
            required,
            arg_type,
        }
    }
}

/// Documented parameter of a function
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionParam {
    pub name: String,
    #[serde(rename = "type")]
    pub arg_type: ArgType,
    pub required: bool,
}

impl From<&ArgumentSpec> for FunctionParam {
    fn from(spec: &ArgumentSpec) -> Self {
        Self {
            name: spec.name.clone(),
            arg_type: spec.arg_type,
            required: spec.required,
        }
    }
}

/// Documentation entry for one function
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionDescription {
    pub name: String,
    /// Positional signature, e.g. `myAlias(seriesList, nodes, callback)`
    pub function: String,
    pub description: String,
    pub module: String,
    pub group: String,
    pub params: Vec<FunctionParam>,
}
