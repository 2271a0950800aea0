use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One GIF as returned by the search API.
///
/// Only the title and the fixed-height rendition are read; everything else the
/// service sends is carried along untouched in `extra`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GifRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    pub images: Renditions,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The pre-sized variants of a GIF. Only `fixed_height` is used for display.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Renditions {
    pub fixed_height: Rendition,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Rendition {
    pub url: String,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Results of one request, in the order the service returned them.
pub type GifResultSet = Vec<GifRecord>;

// Untitled GIFs come back with `"title": null`; they still render, with empty alt text.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response envelope of both the search and trending endpoints.
#[derive(Deserialize, Debug)]
pub struct GiphyEnvelope {
    pub data: GifResultSet,
}

impl GifRecord {
    /// Minimal record carrying just what the page displays.
    pub fn new(title: impl Into<String>, fixed_height_url: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            images: Renditions {
                fixed_height: Rendition {
                    url: fixed_height_url.into(),
                    other: Map::new(),
                },
                other: Map::new(),
            },
            extra: Map::new(),
        }
    }

    pub fn fixed_height_url(&self) -> &str {
        &self.images.fixed_height.url
    }
}
