//! Filter expressions accepted by governance list endpoints.
//!
//! Only rendering is supported. Literals are always double-quoted with `"`
//! and `\` backslash-escaped.

use std::fmt::{Display, Formatter};

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Exact match.
    Eq,
    /// Prefix match.
    StartsWith,
    /// Substring match.
    Contains,
}

impl FilterOperator {
    /// Returns the operator keyword.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::StartsWith => "sw",
            Self::Contains => "co",
        }
    }
}

/// One node of a filter expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpression {
    /// `field op "value"`.
    Term {
        /// Backend field name.
        field: String,
        /// Operator.
        operator: FilterOperator,
        /// Unescaped literal.
        value: String,
    },
    /// Conjunction joined with ` AND `.
    All(Vec<FilterExpression>),
    /// Parenthesized disjunction joined with ` OR `.
    Any(Vec<FilterExpression>),
}

impl FilterExpression {
    /// Creates a single comparison.
    #[must_use]
    pub fn term(field: impl Into<String>, operator: FilterOperator, value: impl Into<String>) -> Self {
        Self::Term {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Creates an equality comparison.
    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::term(field, FilterOperator::Eq, value)
    }

    /// Returns true when the expression renders to nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Term { .. } => false,
            Self::All(terms) | Self::Any(terms) => terms.iter().all(Self::is_empty),
        }
    }

    /// Renders the expression; an empty tree renders to `""`.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Term {
                field,
                operator,
                value,
            } => format!("{field} {} {}", operator.as_str(), quote_literal(value)),
            Self::All(terms) => join_rendered(terms, " AND "),
            Self::Any(terms) => {
                let rendered: Vec<String> = terms
                    .iter()
                    .filter(|term| !term.is_empty())
                    .map(Self::render)
                    .collect();
                match rendered.len() {
                    0 => String::new(),
                    1 => rendered.concat(),
                    _ => format!("({})", rendered.join(" OR ")),
                }
            }
        }
    }
}

impl Display for FilterExpression {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.render())
    }
}

fn join_rendered(terms: &[FilterExpression], separator: &str) -> String {
    terms
        .iter()
        .filter(|term| !term.is_empty())
        .map(FilterExpression::render)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Quotes a literal, escaping `\` and `"`.
#[must_use]
pub fn quote_literal(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for character in value.chars() {
        if matches!(character, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(character);
    }
    quoted.push('"');
    quoted
}

/// Accumulates optional terms into a conjunction.
///
/// Unset inputs are skipped, so a builder with no inputs renders to `""`.
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    terms: Vec<FilterExpression>,
}

impl FilterBuilder {
    /// Starts an empty conjunction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `field eq "value"` when the value is present and non-blank.
    #[must_use]
    pub fn eq_if(self, field: &str, value: Option<&str>) -> Self {
        self.term_if(field, FilterOperator::Eq, value)
    }

    /// Adds `field sw "value"` when the value is present and non-blank.
    #[must_use]
    pub fn starts_with_if(self, field: &str, value: Option<&str>) -> Self {
        self.term_if(field, FilterOperator::StartsWith, value)
    }

    /// Adds `field co "value"` when the value is present and non-blank.
    #[must_use]
    pub fn contains_if(self, field: &str, value: Option<&str>) -> Self {
        self.term_if(field, FilterOperator::Contains, value)
    }

    /// Adds a comparison when the value is present and non-blank.
    #[must_use]
    pub fn term_if(mut self, field: &str, operator: FilterOperator, value: Option<&str>) -> Self {
        if let Some(value) = value
            && !value.trim().is_empty()
        {
            self.terms
                .push(FilterExpression::term(field, operator, value));
        }
        self
    }

    /// Adds `(field eq "a" OR field eq "b" ...)` for a non-empty value list.
    #[must_use]
    pub fn any_eq(mut self, field: &str, values: &[String]) -> Self {
        let alternatives: Vec<FilterExpression> = values
            .iter()
            .filter(|value| !value.trim().is_empty())
            .map(|value| FilterExpression::eq(field, value.as_str()))
            .collect();
        if !alternatives.is_empty() {
            self.terms.push(FilterExpression::Any(alternatives));
        }
        self
    }

    /// Returns true when no term was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the conjunction tree.
    #[must_use]
    pub fn build(self) -> FilterExpression {
        FilterExpression::All(self.terms)
    }

    /// Renders the conjunction; no terms renders to `""`.
    #[must_use]
    pub fn render(self) -> String {
        self.build().render()
    }
}

/// Returns the first non-empty rendering among candidates ordered from most to
/// least specific.
#[must_use]
pub fn most_specific(candidates: impl IntoIterator<Item = FilterBuilder>) -> String {
    candidates
        .into_iter()
        .find(|candidate| !candidate.is_empty())
        .map(FilterBuilder::render)
        .unwrap_or_default()
}
