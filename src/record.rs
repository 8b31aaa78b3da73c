//! Extracted values and the records built from them

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Value of the fixed `type` field on every record
pub const RECORD_TYPE: &str = "transfer";

const FIXED_KEYS: [&str; 4] = ["type", "href", "parent", "competition_code"];

/// Link to another entity found in a cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Reference {
    /// Club fixtures page
    Club { href: String },
    /// Match report page
    Game { href: String },
}

/// Parsed content of one table cell
///
/// Serializes as a bare string or as `{"type": "club"|"game", "href": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Reference(Reference),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn club(href: impl Into<String>) -> Self {
        Self::Reference(Reference::Club { href: href.into() })
    }

    pub fn game(href: impl Into<String>) -> Self {
        Self::Reference(Reference::Game { href: href.into() })
    }

    /// The string content, if this is a plain value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Reference(_) => None,
        }
    }

    /// The linked href, if this is a club or game reference
    pub fn href(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Reference(Reference::Club { href } | Reference::Game { href }) => {
                Some(href.as_str())
            }
        }
    }
}

/// One transfer row tagged with its provenance
///
/// Records are built once per qualifying row and never mutated afterwards.
/// Serialization produces a flat object: the fixed fields first, then the
/// columns in header order. A column named like a fixed field replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    href: String,
    parent: Value,
    competition_code: String,
    fields: IndexMap<String, CellValue>,
}

impl Record {
    pub fn new(
        href: impl Into<String>,
        parent: Value,
        competition_code: impl Into<String>,
        fields: IndexMap<String, CellValue>,
    ) -> Self {
        Self {
            href: href.into(),
            parent,
            competition_code: competition_code.into(),
            fields,
        }
    }

    pub fn record_type(&self) -> &'static str {
        RECORD_TYPE
    }

    /// Path of the page the record was extracted from
    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn parent(&self) -> &Value {
        &self.parent
    }

    pub fn competition_code(&self) -> &str {
        &self.competition_code
    }

    /// Column values keyed by header identifier, in header order
    pub fn fields(&self) -> &IndexMap<String, CellValue> {
        &self.fields
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields.get(column)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = self
            .fields
            .keys()
            .filter(|key| !FIXED_KEYS.contains(&key.as_str()))
            .count();
        let mut map = serializer.serialize_map(Some(FIXED_KEYS.len() + extra))?;

        match self.fields.get("type") {
            Some(value) => map.serialize_entry("type", value)?,
            None => map.serialize_entry("type", RECORD_TYPE)?,
        }
        match self.fields.get("href") {
            Some(value) => map.serialize_entry("href", value)?,
            None => map.serialize_entry("href", &self.href)?,
        }
        match self.fields.get("parent") {
            Some(value) => map.serialize_entry("parent", value)?,
            None => map.serialize_entry("parent", &self.parent)?,
        }
        match self.fields.get("competition_code") {
            Some(value) => map.serialize_entry("competition_code", value)?,
            None => map.serialize_entry("competition_code", &self.competition_code)?,
        }

        for (key, value) in &self.fields {
            if !FIXED_KEYS.contains(&key.as_str()) {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cell_values_serialize_like_the_feed() {
        assert_eq!(serde_json::to_value(CellValue::text("22")).unwrap(), json!("22"));
        assert_eq!(
            serde_json::to_value(CellValue::club("/x/spielplan/verein/1")).unwrap(),
            json!({"type": "club", "href": "/x/spielplan/verein/1"})
        );
        assert_eq!(
            serde_json::to_value(CellValue::game("/spielbericht/1")).unwrap(),
            json!({"type": "game", "href": "/spielbericht/1"})
        );
    }

    #[test]
    fn record_serializes_flat_with_fixed_fields_first() {
        let mut fields = IndexMap::new();
        fields.insert("player".to_string(), CellValue::text("Haaland"));
        fields.insert("joined".to_string(), CellValue::club("/mc/spielplan/verein/281"));
        let record = Record::new("/detail/plus/1", json!({"code": "GB1"}), "Premier League", fields);

        let value = serde_json::to_value(&record).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();

        assert_eq!(
            value,
            json!({
                "type": "transfer",
                "href": "/detail/plus/1",
                "parent": {"code": "GB1"},
                "competition_code": "Premier League",
                "player": "Haaland",
                "joined": {"type": "club", "href": "/mc/spielplan/verein/281"}
            })
        );
        assert_eq!(keys.len(), 6);
    }

    #[test]
    fn column_named_like_fixed_field_overrides_it() {
        let mut fields = IndexMap::new();
        fields.insert("href".to_string(), CellValue::text("column"));
        let record = Record::new("/page", Value::Null, "Serie A", fields);

        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["href"], json!("column"));
        assert_eq!(value.as_object().unwrap().len(), 4);
    }

    #[test]
    fn cell_value_accessors() {
        assert_eq!(CellValue::text("x").as_text(), Some("x"));
        assert_eq!(CellValue::club("/c").href(), Some("/c"));
        assert_eq!(CellValue::game("/g").as_text(), None);
    }
}
