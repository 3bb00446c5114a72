//! Category shapes attached to transactions and their canonical form.

use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize, Serializer};

use crate::lenient;

pub const DEFAULT_CATEGORY_ID: &str = "uncategorized";
pub const DEFAULT_CATEGORY_NAME: &str = "Uncategorized";
pub const DEFAULT_CATEGORY_TYPE: &str = "expense";
pub const DEFAULT_CATEGORY_COLOR: &str = "#888888";

/// Canonical category with every field populated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub color: String,
}

impl Category {
    pub fn uncategorized() -> Self {
        Self {
            id: DEFAULT_CATEGORY_ID.into(),
            name: DEFAULT_CATEGORY_NAME.into(),
            kind: DEFAULT_CATEGORY_TYPE.into(),
            color: DEFAULT_CATEGORY_COLOR.into(),
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::uncategorized()
    }
}

/// Category fields as they arrive from the backend; any of them may be
/// missing or malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialCategory {
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient::string",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl PartialCategory {
    /// Display name and color, falling back to the uncategorized defaults.
    pub fn label(&self) -> CategoryLabel {
        CategoryLabel {
            name: self
                .name
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY_NAME.into()),
            color: self
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.into()),
        }
    }
}

/// Name/color pair shown next to upcoming recurring expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLabel {
    pub name: String,
    pub color: String,
}

impl Default for CategoryLabel {
    fn default() -> Self {
        PartialCategory::default().label()
    }
}

/// The shapes a transaction's category may take on the wire.
///
/// Decoding is the single dispatch point over the raw shape; everything
/// downstream goes through [`CategoryInput::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryInput {
    #[default]
    Missing,
    Id(String),
    Record(PartialCategory),
}

impl CategoryInput {
    /// Builds an id reference; blank ids are treated as missing.
    pub fn from_id(id: impl Into<String>) -> Self {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            CategoryInput::Missing
        } else {
            CategoryInput::Id(trimmed.to_string())
        }
    }

    /// Total mapping onto the canonical shape. Never fails; missing fields
    /// take the uncategorized defaults.
    pub fn normalize(&self) -> Category {
        match self {
            CategoryInput::Missing => Category::uncategorized(),
            CategoryInput::Id(id) => Category {
                id: id.clone(),
                ..Category::uncategorized()
            },
            CategoryInput::Record(partial) => {
                let defaults = Category::uncategorized();
                Category {
                    id: partial.id.clone().unwrap_or(defaults.id),
                    name: partial.name.clone().unwrap_or(defaults.name),
                    kind: partial.kind.clone().unwrap_or(defaults.kind),
                    color: partial.color.clone().unwrap_or(defaults.color),
                }
            }
        }
    }
}

impl From<Category> for CategoryInput {
    fn from(category: Category) -> Self {
        CategoryInput::Record(PartialCategory {
            id: Some(category.id),
            name: Some(category.name),
            kind: Some(category.kind),
            color: Some(category.color),
        })
    }
}

impl<'de> Deserialize<'de> for CategoryInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Id(String),
            Record(PartialCategory),
            Other(IgnoredAny),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None | Some(Raw::Other(_)) => CategoryInput::Missing,
            Some(Raw::Id(id)) => CategoryInput::from_id(id),
            Some(Raw::Record(partial)) => CategoryInput::Record(partial),
        })
    }
}

impl Serialize for CategoryInput {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            CategoryInput::Missing => serializer.serialize_none(),
            CategoryInput::Id(id) => serializer.serialize_str(id),
            CategoryInput::Record(partial) => partial.serialize(serializer),
        }
    }
}
