use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// One selectable entry as supplied by the host or an option provider.
///
/// Hosts send a bare identifier string, a `{value, label}` pair, or null.
/// Decoding is permissive: numbers and booleans become their string form,
/// anything else that is not recognizable becomes [`DropdownOption::None`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DropdownOption {
    /// No selection (null / undefined / malformed entry).
    #[default]
    None,
    /// Bare identifier; the label is the identifier itself.
    Value(String),
    /// Structured entry with an explicit label.
    Labeled {
        value: Option<String>,
        label: Option<String>,
    },
}

/// Uniform `{value, label}` pair handed to the selection widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: Option<String>,
    pub label: String,
}

impl SelectOption {
    /// Option whose value doubles as its label.
    pub fn simple(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value: Some(value),
        }
    }
}

impl DropdownOption {
    /// Structured entry with both parts present.
    pub fn labeled(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Labeled {
            value: Some(value.into()),
            label: Some(label.into()),
        }
    }

    /// The identifier this option selects, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Value(v) => Some(v.as_str()),
            Self::Labeled { value, .. } => value.as_deref(),
        }
    }

    /// Normalize to the widget's `{value, label}` shape.
    ///
    /// The label falls back to the value, then to the empty string.
    pub fn normalize(&self) -> SelectOption {
        match self {
            Self::None => SelectOption {
                value: None,
                label: String::new(),
            },
            Self::Value(v) => SelectOption::simple(v.as_str()),
            Self::Labeled { value, label } => SelectOption {
                value: value.clone(),
                label: label
                    .clone()
                    .or_else(|| value.clone())
                    .unwrap_or_default(),
            },
        }
    }

    /// Decode one entry from loosely-typed JSON.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::None,
            Value::String(s) => Self::Value(s.clone()),
            Value::Number(_) | Value::Bool(_) => scalar_string(value).map_or(Self::None, Self::Value),
            Value::Object(map) => {
                let value = map.get("value").and_then(scalar_string);
                let label = map.get("label").and_then(scalar_string);
                if value.is_none() && label.is_none() {
                    Self::None
                } else {
                    Self::Labeled { value, label }
                }
            }
            Value::Array(_) => Self::None,
        }
    }
}

/// Normalize a whole option list, preserving order.
pub fn normalize_options(options: &[DropdownOption]) -> Vec<SelectOption> {
    options.iter().map(DropdownOption::normalize).collect()
}

/// String form of a JSON scalar. Null, arrays and objects have none.
pub(crate) fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Deserialize an optional cell value, accepting any JSON scalar.
pub(crate) fn deserialize_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_string))
}

impl Serialize for DropdownOption {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Pair<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            value: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            label: Option<&'a str>,
        }

        match self {
            Self::None => serializer.serialize_none(),
            Self::Value(v) => serializer.serialize_str(v),
            Self::Labeled { value, label } => Pair {
                value: value.as_deref(),
                label: label.as_deref(),
            }
            .serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for DropdownOption {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
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
    fn test_normalize_bare_string() {
        let opt = DropdownOption::Value("apple".into());
        assert_eq!(opt.normalize(), SelectOption::simple("apple"));
    }

    #[test]
    fn test_normalize_label_defaults_to_value() {
        let opt = DropdownOption::Labeled {
            value: Some("a".into()),
            label: None,
        };
        let norm = opt.normalize();
        assert_eq!(norm.value.as_deref(), Some("a"));
        assert_eq!(norm.label, "a");
    }

    #[test]
    fn test_normalize_absent_has_empty_label() {
        let norm = DropdownOption::None.normalize();
        assert_eq!(norm.value, None);
        assert_eq!(norm.label, "");
    }

    #[test]
    fn test_decode_mixed_list() {
        let opts: Vec<DropdownOption> = serde_json::from_value(json!([
            "plain",
            {"value": "v", "label": "Label"},
            null,
            42,
            true,
            [1, 2],
            {"unrelated": 1}
        ]))
        .unwrap();

        assert_eq!(
            opts,
            vec![
                DropdownOption::Value("plain".into()),
                DropdownOption::labeled("v", "Label"),
                DropdownOption::None,
                DropdownOption::Value("42".into()),
                DropdownOption::Value("true".into()),
                DropdownOption::None,
                DropdownOption::None,
            ]
        );
    }

    #[test]
    fn test_serialize_shapes() {
        let opts = vec![
            DropdownOption::Value("x".into()),
            DropdownOption::labeled("y", "Why"),
            DropdownOption::None,
        ];
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json, json!(["x", {"value": "y", "label": "Why"}, null]));
    }
}
