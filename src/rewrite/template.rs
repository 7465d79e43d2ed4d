//! Placeholder templates
//!
//! A template is literal expression text in which every `%` stands for the
//! node computed from a series' metric path. Nothing else is interpreted.

use crate::expr::parse_expr;
use crate::rewrite::error::{TemplateError, TemplateResult};

/// Placeholder replaced by the node
pub const PLACEHOLDER: char = '%';

/// Node substituted when checking that a template expands to an expression
const PROBE_NODE: &str = "probe.node";

/// Replace every placeholder in `template` with `node`
pub fn substitute(template: &str, node: &str) -> String {
    template.replace(PLACEHOLDER, node)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder,
}

/// A template split into literal text and placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl CompiledTemplate {
    /// Compile a template
    ///
    /// Fails when the template is blank or when expanding it does not
    /// produce a parseable expression.
    pub fn compile(source: &str) -> TemplateResult<Self> {
        if source.trim().is_empty() {
            return Err(TemplateError::Empty);
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        for c in source.chars() {
            if c == PLACEHOLDER {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder);
            } else {
                literal.push(c);
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        let template = Self {
            source: source.to_string(),
            segments,
        };
        parse_expr(&template.render(PROBE_NODE))
            .map_err(|e| TemplateError::Syntax(e.to_string()))?;

        Ok(template)
    }

    /// Expand the template for `node`
    pub fn render(&self, node: &str) -> String {
        let mut out = String::with_capacity(self.source.len() + node.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder => out.push_str(node),
            }
        }
        out
    }

    /// The template text as configured
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of placeholders
    pub fn placeholders(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Placeholder))
            .count()
    }
}
