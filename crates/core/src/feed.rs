//! JSON wire format exchanged between the relay and the client.
//!
//! The relay flattens each upstream RSS `<item>` into one of these records
//! and returns `{ "items": [...] }`. Field names follow the Kuler XML element
//! names, so they are camelCase with upper-case `ID` suffixes.
//!
//! Deserialization is lenient about scalar types: XML-derived values may
//! arrive as strings or numbers, and a single swatch may arrive as an object
//! instead of a one-element array.

use serde::{Deserialize, Deserializer, Serialize};

/// Top-level relay response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedResponse<T> {
    pub items: Vec<T>,
}

impl<T> FeedResponse<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }
}

// ---------------------------------------------------------------------------
// Theme items
// ---------------------------------------------------------------------------

/// One theme as returned by the list and search feeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeItem {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub link: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "lenient_string")]
    pub pub_date: String,
    #[serde(rename = "themeID", deserialize_with = "lenient_string")]
    pub theme_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub theme_title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub theme_image: String,
    pub theme_author: ThemeAuthor,
    #[serde(deserialize_with = "lenient_string")]
    pub theme_tags: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub theme_rating: f64,
    #[serde(deserialize_with = "lenient_u64")]
    pub theme_download_count: u64,
    #[serde(deserialize_with = "lenient_string")]
    pub theme_created_at: String,
    #[serde(deserialize_with = "lenient_string")]
    pub theme_edited_at: String,
    pub theme_swatches: ThemeSwatches,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeAuthor {
    #[serde(rename = "authorID", deserialize_with = "lenient_string")]
    pub author_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub author_label: String,
}

/// Container element around a theme's swatches. `swatch` is absent when the
/// upstream item carried no swatch data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSwatches {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "one_or_many"
    )]
    pub swatch: Option<Vec<SwatchItem>>,
}

impl ThemeSwatches {
    pub fn new(swatches: Vec<SwatchItem>) -> Self {
        Self {
            swatch: Some(swatches),
        }
    }
}

/// One swatch entry. Channel values and index are kept as the text the XML
/// carried; [`crate::Swatch`] parses them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SwatchItem {
    #[serde(deserialize_with = "lenient_string")]
    pub swatch_hex_color: String,
    #[serde(deserialize_with = "lenient_string")]
    pub swatch_color_mode: String,
    #[serde(deserialize_with = "lenient_string")]
    pub swatch_channel1: String,
    #[serde(deserialize_with = "lenient_string")]
    pub swatch_channel2: String,
    #[serde(deserialize_with = "lenient_string")]
    pub swatch_channel3: String,
    #[serde(deserialize_with = "lenient_string")]
    pub swatch_channel4: String,
    #[serde(deserialize_with = "lenient_string")]
    pub swatch_index: String,
}

// ---------------------------------------------------------------------------
// Comment items
// ---------------------------------------------------------------------------

/// One comment as returned by the comments feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommentItem {
    #[serde(deserialize_with = "lenient_string")]
    pub comment: String,
    #[serde(deserialize_with = "lenient_string")]
    pub author: String,
    #[serde(deserialize_with = "lenient_string")]
    pub posted_at: String,
}

// ---------------------------------------------------------------------------
// Lenient scalar helpers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Str(s)) => s,
        Some(Scalar::Int(n)) => n.to_string(),
        Some(Scalar::Float(n)) => n.to_string(),
        Some(Scalar::Bool(b)) => b.to_string(),
        None => String::new(),
    })
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Str(s)) => s.trim().parse().unwrap_or_default(),
        Some(Scalar::Int(n)) => n as f64,
        Some(Scalar::Float(n)) => n,
        Some(Scalar::Bool(_)) | None => 0.0,
    })
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Str(s)) => s.trim().parse().unwrap_or_default(),
        Some(Scalar::Int(n)) => u64::try_from(n).unwrap_or_default(),
        Some(Scalar::Float(n)) if n >= 0.0 => n as u64,
        _ => 0,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(
        Option::<OneOrMany<T>>::deserialize(deserializer)?.map(|value| match value {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
