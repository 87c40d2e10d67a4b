//! Themes: named palettes with metadata and an ordered list of swatches.

use std::fmt;

use chrono::NaiveDate;
use rand::seq::IndexedRandom;
use serde::Serialize;

use crate::error::CoreError;
use crate::feed::ThemeItem;
use crate::swatch::Swatch;

/// Date format of `themeCreatedAt` / `themeEditedAt`.
const THEME_DATE_FORMAT: &str = "%Y%m%d";

/// A Kuler theme.
///
/// Always holds at least one swatch: [`Theme::from_item`] refuses items
/// without swatch data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    id: String,
    title: String,
    description: String,
    image: String,
    link: String,
    created_date: Option<NaiveDate>,
    edited_date: Option<NaiveDate>,
    tags: Vec<String>,
    rating: f64,
    download_count: u64,
    author: String,
    author_id: String,
    swatches: Vec<Swatch>,
}

impl Theme {
    /// Materialize a theme from its wire form.
    ///
    /// Fails when the item has no swatches or any swatch is malformed.
    pub fn from_item(item: ThemeItem) -> Result<Self, CoreError> {
        let raw_swatches = match item.theme_swatches.swatch {
            Some(list) if !list.is_empty() => list,
            _ => {
                return Err(CoreError::InvalidRecord(format!(
                    "Theme '{}' has no swatches",
                    item.theme_id
                )))
            }
        };
        let swatches = raw_swatches
            .iter()
            .enumerate()
            .map(|(position, raw)| Swatch::from_item(raw, position))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: item.theme_id,
            title: item.theme_title,
            description: item.description,
            image: item.theme_image,
            link: item.link,
            created_date: parse_theme_date(&item.theme_created_at),
            edited_date: parse_theme_date(&item.theme_edited_at),
            tags: parse_tags(&item.theme_tags),
            rating: item.theme_rating,
            download_count: item.theme_download_count,
            author: item.theme_author.author_label,
            author_id: item.theme_author.author_id,
            swatches,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// HTML description as published by the feed.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn created_date(&self) -> Option<NaiveDate> {
        self.created_date
    }

    pub fn edited_date(&self) -> Option<NaiveDate> {
        self.edited_date
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn download_count(&self) -> u64 {
        self.download_count
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn author_id(&self) -> &str {
        &self.author_id
    }

    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    pub fn swatch_count(&self) -> usize {
        self.swatches.len()
    }

    pub fn swatch_by_index(&self, index: usize) -> Option<&Swatch> {
        self.swatches.get(index)
    }

    pub fn random_swatch(&self) -> Option<&Swatch> {
        self.swatches.choose(&mut rand::rng())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.title)?;
        for (i, swatch) in self.swatches.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{swatch}")?;
        }
        f.write_str("]")
    }
}

/// Split a comma-separated tag field. Blank entries are dropped, so an empty
/// field yields no tags.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_theme_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    raw.get(..8)
        .and_then(|digits| NaiveDate::parse_from_str(digits, THEME_DATE_FORMAT).ok())
}
