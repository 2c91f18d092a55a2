//! Subschema pointers and RFC 6901 segment escaping.
//!
//! A [`SchemaPointer`] identifies a node inside the source schema document.
//! It is the lookup key into the type classifier and the basis for building
//! child pointers while the converter descends.

use std::borrow::Cow;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// JSON Pointer escaping (RFC 6901)
// ---------------------------------------------------------------------------

/// Escape a single path segment per RFC 6901.
///
/// - `~` → `~0`
/// - `/` → `~1`
///
/// Returns `Cow::Borrowed` when no escaping is needed (the common case).
pub fn escape_pointer_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains('~') || segment.contains('/') {
        Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Unescape a single path segment per RFC 6901.
///
/// Order matters: unescape `~1` first to avoid double-unescaping.
pub fn unescape_pointer_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains("~0") || segment.contains("~1") {
        Cow::Owned(segment.replace("~1", "/").replace("~0", "~"))
    } else {
        Cow::Borrowed(segment)
    }
}

// ---------------------------------------------------------------------------
// SchemaPointer
// ---------------------------------------------------------------------------

/// Immutable path to a subschema, rendered as a URI fragment (`#/a/b`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaPointer {
    segments: Vec<String>,
}

impl SchemaPointer {
    /// The document root (`#`).
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a pointer in fragment (`#/a/b`) or plain (`/a/b`) form.
    ///
    /// Returns `None` for anything that is not a pointer, e.g. an anchor
    /// (`#foo`) or a relative URI (`other.json`).
    ///
    /// # Example
    /// ```
    /// use jsonschema_xsd_core::SchemaPointer;
    /// let ptr = SchemaPointer::parse("#/properties/a~1b").unwrap();
    /// assert_eq!(ptr.segments(), ["properties", "a/b"]);
    /// assert!(SchemaPointer::parse("#anchor").is_none());
    /// ```
    pub fn parse(path: &str) -> Option<Self> {
        let stripped = path.strip_prefix('#').unwrap_or(path);

        // An empty fragment refers to the whole document.
        if stripped.is_empty() {
            return Some(Self::root());
        }

        let rest = stripped.strip_prefix('/')?;
        let segments = rest
            .split('/')
            .map(|s| unescape_pointer_segment(s).into_owned())
            .collect();
        Some(Self { segments })
    }

    /// Build a child pointer by appending unescaped segments.
    pub fn combine(&self, segments: &[&str]) -> Self {
        let mut combined = self.segments.clone();
        combined.extend(segments.iter().map(|s| s.to_string()));
        Self { segments: combined }
    }

    /// Decoded segments, root first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for SchemaPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#")?;
        for segment in &self.segments {
            write!(f, "/{}", escape_pointer_segment(segment))?;
        }
        Ok(())
    }
}

impl Serialize for SchemaPointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SchemaPointer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        SchemaPointer::parse(&raw)
            .ok_or_else(|| D::Error::custom(format!("'{raw}' is not a JSON pointer")))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
