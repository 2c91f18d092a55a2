//! In-memory keyword tree for a JSON Schema document.

use serde_json::Value;

use crate::error::ConvertError;
use crate::keyword::{Keyword, KeywordKind};
use crate::pointer::SchemaPointer;
use crate::work_list::WorkList;

/// A schema node: its keywords in source order.
///
/// Keyword kinds are unique per node because the source is a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonSchema {
    keywords: Vec<Keyword>,
}

impl JsonSchema {
    /// Parse a full document.
    ///
    /// `true` is the empty schema; `false` and non-object values are
    /// rejected since no XSD construct expresses them.
    pub fn from_value(value: &Value) -> Result<Self, ConvertError> {
        Self::parse_at(value, &SchemaPointer::root())
    }

    pub(crate) fn parse_at(value: &Value, path: &SchemaPointer) -> Result<Self, ConvertError> {
        match value {
            Value::Object(obj) => {
                let keywords = obj
                    .iter()
                    .map(|(name, val)| Keyword::parse(name, val, path))
                    .collect::<Result<_, _>>()?;
                Ok(Self { keywords })
            }
            Value::Bool(true) => Ok(Self::default()),
            Value::Bool(false) => Err(ConvertError::unsupported_construct(
                path,
                "the `false` schema has no XSD equivalent",
            )),
            _ => Err(ConvertError::schema(path, "schema must be an object or boolean")),
        }
    }

    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    pub fn get(&self, kind: KeywordKind) -> Option<&Keyword> {
        self.keywords.iter().find(|kw| kw.kind() == kind)
    }

    /// A fresh work-list over this node's keywords.
    pub fn work_list(&self) -> WorkList<Keyword> {
        WorkList::new(self.keywords.iter().cloned())
    }

    /// Whether the root declares `name` under `$defs` or `definitions`.
    pub fn has_definition(&self, container: &str, name: &str) -> bool {
        self.definition(container, name).is_some()
    }

    /// The subschema declared as `name` under `container` at the root.
    pub fn definition(&self, container: &str, name: &str) -> Option<&JsonSchema> {
        match self.get_container(container)? {
            Keyword::Defs(defs) | Keyword::Definitions(defs) => defs.get(name),
            _ => None,
        }
    }

    fn get_container(&self, container: &str) -> Option<&Keyword> {
        match container {
            "$defs" => self.get(KeywordKind::Defs),
            "definitions" => self.get(KeywordKind::Definitions),
            _ => None,
        }
    }
}
