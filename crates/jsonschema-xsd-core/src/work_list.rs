//! Per-node keyword bookkeeping.
//!
//! A [`WorkList`] tracks which keywords of one schema node are still
//! pending. Handlers either pull a keyword (consuming it) or mark its kind
//! as handled (declaring it intentionally ignored at this node). Whatever
//! remains afterwards is an unsupported construct.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;

use crate::keyword::{Keyword, KeywordKind, ValueType};
use crate::schema::JsonSchema;

/// Items that can be tracked by kind.
pub trait Keyed {
    type Kind: Copy + Eq + Hash + fmt::Debug;

    fn kind(&self) -> Self::Kind;
}

impl Keyed for Keyword {
    type Kind = KeywordKind;

    fn kind(&self) -> KeywordKind {
        Keyword::kind(self)
    }
}

/// Pending items of one node, in insertion order.
#[derive(Debug, Clone)]
pub struct WorkList<T: Keyed> {
    items: Vec<Option<T>>,
    marked: HashSet<T::Kind>,
}

impl<T: Keyed> WorkList<T> {
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: items.into_iter().map(Some).collect(),
            marked: HashSet::new(),
        }
    }

    /// Declare `kind` as intentionally ignored at this node.
    pub fn mark_handled(&mut self, kind: T::Kind) {
        self.marked.insert(kind);
    }

    pub fn is_marked(&self, kind: T::Kind) -> bool {
        self.marked.contains(&kind)
    }

    /// Whether an item of `kind` is still present (marked or not).
    pub fn contains(&self, kind: T::Kind) -> bool {
        self.items.iter().flatten().any(|item| item.kind() == kind)
    }

    /// Remove and return the item of `kind`, if present.
    ///
    /// Marking a kind does not prevent pulling it.
    pub fn pull(&mut self, kind: T::Kind) -> Option<T> {
        self.items
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|item| item.kind() == kind))
            .and_then(Option::take)
    }

    /// Items not yet pulled, in insertion order.
    ///
    /// Marked kinds are skipped unless `include_marked` is set.
    pub fn enumerate_unhandled(&self, include_marked: bool) -> impl Iterator<Item = &T> + '_ {
        self.items
            .iter()
            .flatten()
            .filter(move |item| include_marked || !self.marked.contains(&item.kind()))
    }

    /// Whether an item of `kind` is present and not marked.
    pub fn is_pending(&self, kind: T::Kind) -> bool {
        !self.is_marked(kind) && self.contains(kind)
    }
}

// ---------------------------------------------------------------------------
// Typed pulls
// ---------------------------------------------------------------------------

impl WorkList<Keyword> {
    pub fn pull_required(&mut self) -> Option<Vec<String>> {
        match self.pull(KeywordKind::Required)? {
            Keyword::Required(names) => Some(names),
            _ => None,
        }
    }

    pub fn pull_properties(&mut self) -> Option<IndexMap<String, JsonSchema>> {
        match self.pull(KeywordKind::Properties)? {
            Keyword::Properties(props) => Some(props),
            _ => None,
        }
    }

    pub fn pull_ref(&mut self) -> Option<String> {
        match self.pull(KeywordKind::Ref)? {
            Keyword::Ref(reference) => Some(reference),
            _ => None,
        }
    }

    pub fn pull_type(&mut self) -> Option<Vec<ValueType>> {
        match self.pull(KeywordKind::Type)? {
            Keyword::Type(types) => Some(types),
            _ => None,
        }
    }

    pub fn pull_xsd_attribute(&mut self) -> Option<bool> {
        match self.pull(KeywordKind::XsdAttribute)? {
            Keyword::XsdAttribute(flag) => Some(flag),
            _ => None,
        }
    }

    /// Names of every keyword left over, for error reporting.
    pub fn unhandled_names(&self) -> Vec<String> {
        self.enumerate_unhandled(false)
            .map(|kw| kw.name().to_string())
            .collect()
    }
}
