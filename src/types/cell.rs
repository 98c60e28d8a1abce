use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use super::option::{deserialize_scalar, DropdownOption};
use crate::error::Result;

/// Kind tag the host's dispatch table uses for dropdown cells.
pub const DROPDOWN_CELL_KIND: &str = "input-dropdown-cell";

/// Future returned by an option provider. Single-threaded, like the UI loop.
pub type FetchFuture = Pin<Box<dyn Future<Output = Result<Vec<DropdownOption>>>>>;

/// Asynchronous option provider: search text in, option list out.
pub type OptionFetcher = Rc<dyn Fn(&str) -> FetchFuture>;

/// Payload of a dropdown cell.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropdownCellData {
    /// Current selection. `None` and `""` both mean "no selection".
    #[serde(
        default,
        deserialize_with = "deserialize_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,
    /// Static option set offered before any fetch resolves.
    #[serde(default)]
    pub allowed_values: Vec<DropdownOption>,
    /// Optional provider queried with the editor's search text.
    #[serde(skip)]
    pub fetch_options: Option<OptionFetcher>,
}

impl DropdownCellData {
    pub fn new(value: Option<&str>, allowed_values: Vec<DropdownOption>) -> Self {
        Self {
            value: value.map(str::to_string),
            allowed_values,
            fetch_options: None,
        }
    }

    #[must_use]
    pub fn with_fetcher(mut self, fetcher: OptionFetcher) -> Self {
        self.fetch_options = Some(fetcher);
        self
    }

    /// The value to display, treating the empty string as absent.
    pub fn display_value(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.is_empty())
    }
}

impl fmt::Debug for DropdownCellData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropdownCellData")
            .field("value", &self.value)
            .field("allowed_values", &self.allowed_values)
            .field("fetch_options", &self.fetch_options.is_some())
            .finish()
    }
}

impl PartialEq for DropdownCellData {
    fn eq(&self, other: &Self) -> bool {
        let same_fetcher = match (&self.fetch_options, &other.fetch_options) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        self.value == other.value && self.allowed_values == other.allowed_values && same_fetcher
    }
}

/// Kind-specific payload of a custom grid cell.
///
/// Decoded once from the `kind` tag so renderers match on variants instead
/// of probing arbitrary shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellPayload {
    Dropdown(DropdownCellData),
    /// Any kind this crate does not own, kept verbatim.
    Other { kind: String, raw: Value },
}

impl CellPayload {
    pub fn kind(&self) -> &str {
        match self {
            Self::Dropdown(_) => DROPDOWN_CELL_KIND,
            Self::Other { kind, .. } => kind,
        }
    }

    /// Decode a payload by its `kind` tag.
    pub fn from_json(value: Value) -> Result<Self> {
        let kind = value
            .get("kind")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        if kind == DROPDOWN_CELL_KIND {
            Ok(Self::Dropdown(serde_json::from_value(value)?))
        } else {
            Ok(Self::Other { kind, raw: value })
        }
    }
}

impl Serialize for CellPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Tagged<'a> {
            kind: &'a str,
            #[serde(flatten)]
            data: &'a DropdownCellData,
        }

        match self {
            Self::Dropdown(data) => Tagged {
                kind: DROPDOWN_CELL_KIND,
                data,
            }
            .serialize(serializer),
            Self::Other { raw, .. } => raw.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for CellPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(value).map_err(serde::de::Error::custom)
    }
}

/// The host grid's envelope around a custom cell payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCell {
    pub data: CellPayload,
    /// Plain-text form used by the host's clipboard.
    #[serde(default)]
    pub copy_data: String,
    #[serde(default, rename = "readonly")]
    pub read_only: bool,
    #[serde(default = "default_allow_overlay")]
    pub allow_overlay: bool,
}

fn default_allow_overlay() -> bool {
    true
}

impl CustomCell {
    /// Wrap dropdown data; copy-data mirrors the value.
    pub fn dropdown(data: DropdownCellData) -> Self {
        Self {
            copy_data: data.value.clone().unwrap_or_default(),
            data: CellPayload::Dropdown(data),
            read_only: false,
            allow_overlay: true,
        }
    }

    #[must_use]
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn kind(&self) -> &str {
        self.data.kind()
    }

    pub fn as_dropdown(&self) -> Option<&DropdownCellData> {
        match &self.data {
            CellPayload::Dropdown(data) => Some(data),
            CellPayload::Other { .. } => None,
        }
    }

    /// Copy of this cell with only the dropdown value replaced.
    ///
    /// Non-dropdown payloads are returned unchanged.
    #[must_use]
    pub fn with_value(&self, value: Option<String>) -> Self {
        let mut next = self.clone();
        if let CellPayload::Dropdown(data) = &mut next.data {
            data.value = value;
        }
        next
    }
}

/// Clipboard paste: the pasted text becomes the value verbatim.
///
/// No validation against `allowed_values`; any string is accepted.
pub fn on_paste(pasted: &str, data: &DropdownCellData) -> DropdownCellData {
    DropdownCellData {
        value: Some(pasted.to_string()),
        ..data.clone()
    }
}

/// Deletion: value cleared to `""`, copy-data cleared.
pub fn deleted_value(cell: &CustomCell) -> CustomCell {
    let mut next = cell.with_value(Some(String::new()));
    next.copy_data.clear();
    next
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_dropdown_cell() {
        let cell: CustomCell = serde_json::from_value(json!({
            "data": {
                "kind": "input-dropdown-cell",
                "value": "b",
                "allowedValues": ["a", "b", {"value": "c", "label": "Charlie"}]
            },
            "copyData": "b",
            "readonly": false
        }))
        .unwrap();

        assert_eq!(cell.kind(), DROPDOWN_CELL_KIND);
        assert!(cell.allow_overlay);
        let data = cell.as_dropdown().unwrap();
        assert_eq!(data.value.as_deref(), Some("b"));
        assert_eq!(data.allowed_values.len(), 3);
        assert!(data.fetch_options.is_none());
    }

    #[test]
    fn test_decode_numeric_value() {
        let cell: CustomCell = serde_json::from_value(json!({
            "data": {"kind": "input-dropdown-cell", "value": 7}
        }))
        .unwrap();
        assert_eq!(cell.as_dropdown().unwrap().value.as_deref(), Some("7"));
    }

    #[test]
    fn test_unknown_kind_kept_verbatim() {
        let raw = json!({"kind": "star-cell", "rating": 4});
        let cell: CustomCell = serde_json::from_value(json!({"data": raw.clone()})).unwrap();
        assert_eq!(cell.kind(), "star-cell");
        assert!(cell.as_dropdown().is_none());
        assert_eq!(serde_json::to_value(&cell.data).unwrap(), raw);
    }

    #[test]
    fn test_serialize_carries_kind_tag() {
        let cell = CustomCell::dropdown(DropdownCellData::new(
            Some("a"),
            vec![DropdownOption::Value("a".into())],
        ));
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json["data"]["kind"], "input-dropdown-cell");
        assert_eq!(json["data"]["value"], "a");
        assert_eq!(json["copyData"], "a");
        assert_eq!(json["readonly"], false);
    }

    #[test]
    fn test_display_value_treats_empty_as_absent() {
        assert_eq!(DropdownCellData::new(Some(""), vec![]).display_value(), None);
        assert_eq!(DropdownCellData::new(None, vec![]).display_value(), None);
        assert_eq!(
            DropdownCellData::new(Some("x"), vec![]).display_value(),
            Some("x")
        );
    }

    #[test]
    fn test_with_value_touches_only_value() {
        let cell = CustomCell::dropdown(DropdownCellData::new(
            Some("a"),
            vec![DropdownOption::Value("a".into())],
        ));
        let next = cell.with_value(Some("b".into()));
        assert_eq!(next.copy_data, cell.copy_data);
        assert_eq!(next.as_dropdown().unwrap().value.as_deref(), Some("b"));
        assert_eq!(
            next.as_dropdown().unwrap().allowed_values,
            cell.as_dropdown().unwrap().allowed_values
        );
    }
}
