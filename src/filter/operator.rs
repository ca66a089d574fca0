//! # Filter Operators
//!
//! The fixed operator set and the static table of operators permitted per
//! field kind.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::FilterError;
use crate::schema::FieldKind;

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Equals
    Eq,
    /// Not equals
    Ne,
    /// Less than
    Lt,
    /// Less than or equal
    Le,
    /// Greater than
    Gt,
    /// Greater than or equal
    Ge,
    /// Value in list
    In,
    /// Literal prefix match
    Like,
}

impl Operator {
    /// All operators in a stable order
    pub const ALL: [Operator; 8] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Lt,
        Operator::Le,
        Operator::Gt,
        Operator::Ge,
        Operator::In,
        Operator::Like,
    ];

    /// Get the operator string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Lt => "lt",
            Operator::Le => "le",
            Operator::Gt => "gt",
            Operator::Ge => "ge",
            Operator::In => "in",
            Operator::Like => "like",
        }
    }

    /// Backend operator symbol emitted in query documents
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "$eq",
            Operator::Ne => "$ne",
            Operator::Lt => "$lt",
            Operator::Le => "$lte",
            Operator::Gt => "$gt",
            Operator::Ge => "$gte",
            Operator::In => "$in",
            Operator::Like => "$regex",
        }
    }

    /// Whether this operator is permitted on fields of `kind`
    pub fn permitted_for(&self, kind: FieldKind) -> bool {
        permitted_operators(kind).map_or(false, |ops| ops.contains(self))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| FilterError::UnknownOperation(s.to_string()))
    }
}

const STRING_OPS: &[Operator] = &[Operator::Eq, Operator::Ne, Operator::Like];

const INTEGER_OPS: &[Operator] = &[
    Operator::Eq,
    Operator::Ne,
    Operator::Lt,
    Operator::Le,
    Operator::Gt,
    Operator::Ge,
    Operator::In,
];

const FLOAT_OPS: &[Operator] = &[
    Operator::Eq,
    Operator::Ne,
    Operator::Lt,
    Operator::Le,
    Operator::Gt,
    Operator::Ge,
];

const OBJECT_ID_OPS: &[Operator] = &[Operator::Eq, Operator::Ne, Operator::In];

/// Operators permitted for a field kind, or `None` if the kind cannot be
/// filtered on at all.
pub fn permitted_operators(kind: FieldKind) -> Option<&'static [Operator]> {
    match kind {
        FieldKind::String => Some(STRING_OPS),
        FieldKind::Integer => Some(INTEGER_OPS),
        FieldKind::Float => Some(FLOAT_OPS),
        FieldKind::ObjectId => Some(OBJECT_ID_OPS),
        FieldKind::Boolean | FieldKind::DateTime => None,
    }
}
