//! Path addressing (§3.4).
//!
//! A `Path` is a struct-keyed, value-equal handle into the translation. Canonical
//! string serialization (tag + operands) is provided only for the wire boundary
//! (§4.7/§6) — in-memory lookups (the varying map, the resolver's memoization) use
//! the derived `Hash`/`Eq` directly, per the "Path keys" design note.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The index list of an `AccessPath`: one index into a vector, or two into a matrix.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessIndex {
    One(i64),
    Two(i64, i64),
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Path {
    Field {
        name: String,
        field: String,
    },
    Property {
        name: String,
        field: String,
        prop: String,
    },
    Access {
        inner: Box<Path>,
        index: AccessIndex,
    },
}

impl Path {
    pub fn field(name: impl Into<String>, field: impl Into<String>) -> Self {
        Path::Field {
            name: name.into(),
            field: field.into(),
        }
    }

    pub fn property(
        name: impl Into<String>,
        field: impl Into<String>,
        prop: impl Into<String>,
    ) -> Self {
        Path::Property {
            name: name.into(),
            field: field.into(),
            prop: prop.into(),
        }
    }

    pub fn access_one(inner: Path, i: i64) -> Self {
        Path::Access {
            inner: Box::new(inner),
            index: AccessIndex::One(i),
        }
    }

    pub fn access_two(inner: Path, i: i64, j: i64) -> Self {
        Path::Access {
            inner: Box::new(inner),
            index: AccessIndex::Two(i, j),
        }
    }

    /// The substance name, present on every path variant.
    pub fn substance_name(&self) -> &str {
        match self {
            Path::Field { name, .. } | Path::Property { name, .. } => name,
            Path::Access { inner, .. } => inner.substance_name(),
        }
    }

    /// Canonical string form (tag + operands) used at the wire boundary (§3.4).
    pub fn canonical(&self) -> String {
        match self {
            Path::Field { name, field } => format!("FieldPath({name}.{field})"),
            Path::Property { name, field, prop } => {
                format!("PropertyPath({name}.{field}.{prop})")
            }
            Path::Access { inner, index } => match index {
                AccessIndex::One(i) => format!("AccessPath({},[{i}])", inner.canonical()),
                AccessIndex::Two(i, j) => format!("AccessPath({},[{i},{j}])", inner.canonical()),
            },
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}
