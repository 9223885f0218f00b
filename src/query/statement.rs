//! Executable select-statement description
//!
//! [`SelectStatement`] is the query object the builder produces: an ordered
//! set of predicates, order clauses, an optional column projection and
//! eager-load directives. It performs no I/O itself — storage backends
//! execute it, either structurally (the in-memory store evaluates
//! [`Predicate::matches`] against each row) or by rendering it to their own
//! query language.

use std::cmp::Ordering;

use crate::core::model::Model;
use crate::query::operator::FilterOperator;
use crate::query::params::FilterValue;

/// Binary comparison kind for [`Predicate::Compare`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

/// Anchor for [`Predicate::Match`] pattern predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchAnchor {
    Contains,
    StartsWith,
    EndsWith,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One ordering directive
#[derive(Debug, Clone, PartialEq)]
pub struct OrderClause {
    pub column: String,
    pub order: SortOrder,
}

/// A single filter condition against one column.
///
/// Values are kept as the raw wire strings; coercion to the column's type
/// happens at evaluation time (or at bind time in a SQL backend).
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column <cmp> value`
    Compare {
        column: String,
        cmp: Comparison,
        value: String,
    },
    /// Substring/prefix/suffix match, optionally case-insensitive
    Match {
        column: String,
        anchor: MatchAnchor,
        case_insensitive: bool,
        pattern: String,
    },
    /// `column IN (values)` / `column NOT IN (values)`
    In {
        column: String,
        values: Vec<String>,
        negated: bool,
    },
    /// `column IS NULL` / `column IS NOT NULL`
    Null { column: String, is_null: bool },
    /// `column BETWEEN low AND high`, optionally negated
    Between {
        column: String,
        low: String,
        high: String,
        negated: bool,
    },
}

impl Predicate {
    /// Evaluate this predicate against one entity.
    ///
    /// A row without the referenced column never matches; neither does a
    /// value that cannot be coerced for comparison.
    pub fn matches<M: Model>(&self, row: &M) -> bool {
        match self {
            Predicate::Compare { column, cmp, value } => {
                let Some(field) = row.field_value(column) else {
                    return false;
                };
                let Some(ordering) = field.compare_str(value) else {
                    return false;
                };
                match cmp {
                    Comparison::Eq => ordering == Ordering::Equal,
                    Comparison::Ne => ordering != Ordering::Equal,
                    Comparison::Lt => ordering == Ordering::Less,
                    Comparison::Lte => ordering != Ordering::Greater,
                    Comparison::Gt => ordering == Ordering::Greater,
                    Comparison::Gte => ordering != Ordering::Less,
                }
            }
            Predicate::Match {
                column,
                anchor,
                case_insensitive,
                pattern,
            } => {
                let Some(field) = row.field_value(column) else {
                    return false;
                };
                let Some(text) = field.as_string() else {
                    return false;
                };
                let (text, pattern) = if *case_insensitive {
                    (text.to_lowercase(), pattern.to_lowercase())
                } else {
                    (text.to_string(), pattern.clone())
                };
                match anchor {
                    MatchAnchor::Contains => text.contains(&pattern),
                    MatchAnchor::StartsWith => text.starts_with(&pattern),
                    MatchAnchor::EndsWith => text.ends_with(&pattern),
                }
            }
            Predicate::In {
                column,
                values,
                negated,
            } => {
                let Some(field) = row.field_value(column) else {
                    return false;
                };
                let hit = values.iter().any(|value| field.equals_str(value));
                hit != *negated
            }
            Predicate::Null { column, is_null } => {
                let Some(field) = row.field_value(column) else {
                    return false;
                };
                field.is_null() == *is_null
            }
            Predicate::Between {
                column,
                low,
                high,
                negated,
            } => {
                let Some(field) = row.field_value(column) else {
                    return false;
                };
                let within = matches!(
                    field.compare_str(low),
                    Some(Ordering::Greater) | Some(Ordering::Equal)
                ) && matches!(
                    field.compare_str(high),
                    Some(Ordering::Less) | Some(Ordering::Equal)
                );
                within != *negated
            }
        }
    }
}

impl FilterOperator {
    /// Map this operator and a normalized value to a predicate.
    ///
    /// Returns `None` for shape mismatches — a scalar operator handed a
    /// list, a range without two bounds — which the builder skips silently.
    pub fn predicate(self, column: &str, value: &FilterValue) -> Option<Predicate> {
        use FilterOperator::*;

        let column = column.to_string();
        match self {
            Eq | Ne | Lt | Lte | Gt | Gte => {
                let cmp = match self {
                    Eq => Comparison::Eq,
                    Ne => Comparison::Ne,
                    Lt => Comparison::Lt,
                    Lte => Comparison::Lte,
                    Gt => Comparison::Gt,
                    _ => Comparison::Gte,
                };
                Some(Predicate::Compare {
                    column,
                    cmp,
                    value: value.as_scalar()?,
                })
            }
            Contains | Icontains | StartsWith | IstartsWith | EndsWith | IendsWith => {
                let anchor = match self {
                    Contains | Icontains => MatchAnchor::Contains,
                    StartsWith | IstartsWith => MatchAnchor::StartsWith,
                    _ => MatchAnchor::EndsWith,
                };
                Some(Predicate::Match {
                    column,
                    anchor,
                    case_insensitive: matches!(self, Icontains | IstartsWith | IendsWith),
                    pattern: value.as_scalar()?,
                })
            }
            In | Nin => Some(Predicate::In {
                column,
                values: value.as_list(),
                negated: self == Nin,
            }),
            IsNull | IsNotNull => {
                // The validator collapsed the value to a boolean; false
                // inverts the check
                let requested = match value {
                    FilterValue::Bool(b) => *b,
                    _ => return None,
                };
                let is_null = if self == IsNull { requested } else { !requested };
                Some(Predicate::Null { column, is_null })
            }
            Between | NotBetween => match value {
                FilterValue::Many(bounds) if bounds.len() >= 2 => Some(Predicate::Between {
                    column,
                    low: bounds[0].clone(),
                    high: bounds[1].clone(),
                    negated: self == NotBetween,
                }),
                _ => None,
            },
        }
    }
}

/// A composable, executable query description.
///
/// Constructed empty and chained, in the style of a select builder:
///
/// ```rust,ignore
/// let stmt = SelectStatement::new()
///     .filter(Predicate::Compare { .. })
///     .order_by("created_at", SortOrder::Desc);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectStatement {
    predicates: Vec<Predicate>,
    order: Vec<OrderClause>,
    columns: Option<Vec<String>>,
    includes: Vec<String>,
}

impl SelectStatement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter predicate (AND semantics)
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Add an ordering clause
    pub fn order_by(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.order.push(OrderClause {
            column: column.into(),
            order,
        });
        self
    }

    /// Restrict the selected columns
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Attach an eager-load directive for a relation.
    ///
    /// Relations load through a batched secondary fetch rather than a join,
    /// so one-to-many expansion never duplicates rows.
    pub fn include(mut self, relation: impl Into<String>) -> Self {
        self.includes.push(relation.into());
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn order(&self) -> &[OrderClause] {
        &self.order
    }

    /// The column projection; `None` means the full entity
    pub fn projection(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    /// True when every predicate matches the row
    pub fn matches<M: Model>(&self, row: &M) -> bool {
        self.predicates.iter().all(|p| p.matches(row))
    }

    /// Sort rows in place per the order clauses.
    ///
    /// Stable sorts applied in reverse clause order give multi-key
    /// ordering; incomparable values keep their relative order.
    pub fn sort_rows<M: Model>(&self, rows: &mut [M]) {
        for clause in self.order.iter().rev() {
            rows.sort_by(|a, b| {
                let ordering = match (
                    a.field_value(&clause.column),
                    b.field_value(&clause.column),
                ) {
                    (Some(va), Some(vb)) => va.compare_value(&vb).unwrap_or(Ordering::Equal),
                    _ => Ordering::Equal,
                };
                match clause.order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }
    }
}
