//! The translation: a nested *substance name → field name → field entry* mapping
//! (§3.3). Property maps use `IndexMap` rather than a hash map so that
//! property-enumeration order (§5 "Ordering") is preserved and observable, matching
//! the order the upstream compiler declared properties in.

use indexmap::IndexMap;

use crate::tagexpr::TagExpr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A field entry: either a plain (possibly still unevaluated) expression, or a shape
/// (GPI) carrying its own ordered property map.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEntry {
    FExpr(TagExpr),
    FGPI(String, IndexMap<String, TagExpr>),
}

impl FieldEntry {
    pub fn is_gpi(&self) -> bool {
        matches!(self, FieldEntry::FGPI(..))
    }
}

/// The symbolic environment produced by the upstream style compiler.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Translation {
    substances: IndexMap<String, IndexMap<String, FieldEntry>>,
}

impl Translation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn substances(&self) -> impl Iterator<Item = (&str, &IndexMap<String, FieldEntry>)> {
        self.substances.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn substance(&self, name: &str) -> Option<&IndexMap<String, FieldEntry>> {
        self.substances.get(name)
    }

    pub fn field(&self, name: &str, field: &str) -> Option<&FieldEntry> {
        self.substances.get(name)?.get(field)
    }

    pub fn field_mut(&mut self, name: &str, field: &str) -> Option<&mut FieldEntry> {
        self.substances.get_mut(name)?.get_mut(field)
    }

    /// Insert (or overwrite) a field entry, creating the substance map if absent.
    pub fn set_field(&mut self, name: impl Into<String>, field: impl Into<String>, entry: FieldEntry) {
        self.substances
            .entry(name.into())
            .or_default()
            .insert(field.into(), entry);
    }
}
