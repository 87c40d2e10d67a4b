//! Kuler RSS → relay JSON records.
//!
//! The upstream feeds are RSS 2.0 documents whose `<item>`s carry a
//! `kuler:themeItem` or `kuler:commentItem` element. Elements are matched by
//! local name, so the namespace prefix does not matter. Missing elements map
//! to empty strings or zero, as the client tolerates sparse records.

use kuler_core::feed::{CommentItem, SwatchItem, ThemeAuthor, ThemeItem, ThemeSwatches};
use quick_xml::events::Event;
use quick_xml::Reader;

#[derive(Debug, thiserror::Error)]
pub enum FeedParseError {
    #[error("Malformed feed XML: {0}")]
    Xml(String),

    #[error("Feed has no <rss><channel> element")]
    MissingChannel,
}

#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn named(name: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(name).into_owned(),
            ..Default::default()
        }
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Trimmed text of the first child called `name`, or `""`.
    fn text_of(&self, name: &str) -> String {
        self.child(name)
            .map(|c| c.text.trim().to_string())
            .unwrap_or_default()
    }
}

/// Read a whole document into an element tree rooted at an unnamed node.
fn parse_document(xml: &str) -> Result<Element, FeedParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack = vec![Element::default()];
    loop {
        let event = reader
            .read_event()
            .map_err(|e| FeedParseError::Xml(e.to_string()))?;
        match event {
            Event::Start(e) => stack.push(Element::named(e.local_name().as_ref())),
            Event::Empty(e) => {
                let element = Element::named(e.local_name().as_ref());
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(element);
                }
            }
            Event::End(_) => {
                if stack.len() < 2 {
                    return Err(FeedParseError::Xml("unbalanced end tag".into()));
                }
                if let (Some(element), Some(parent)) = (stack.pop(), stack.last_mut()) {
                    parent.children.push(element);
                }
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| FeedParseError::Xml(e.to_string()))?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Event::CData(c) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(root), true) => Ok(root),
        _ => Err(FeedParseError::Xml("unexpected end of document".into())),
    }
}

fn channel_items(xml: &str) -> Result<Vec<Element>, FeedParseError> {
    let mut root = parse_document(xml)?;
    let rss = root
        .children
        .iter_mut()
        .find(|c| c.name == "rss")
        .ok_or(FeedParseError::MissingChannel)?;
    let channel = rss
        .children
        .iter_mut()
        .find(|c| c.name == "channel")
        .ok_or(FeedParseError::MissingChannel)?;

    Ok(std::mem::take(&mut channel.children)
        .into_iter()
        .filter(|c| c.name == "item")
        .collect())
}

/// Map the items of a theme list or search feed.
pub fn parse_theme_feed(xml: &str) -> Result<Vec<ThemeItem>, FeedParseError> {
    Ok(channel_items(xml)?.iter().map(theme_item).collect())
}

/// Map the items of a comments feed.
pub fn parse_comment_feed(xml: &str) -> Result<Vec<CommentItem>, FeedParseError> {
    Ok(channel_items(xml)?.iter().map(comment_item).collect())
}

fn theme_item(item: &Element) -> ThemeItem {
    let empty = Element::default();
    let data = item.child("themeItem").unwrap_or(&empty);

    let author = data.child("themeAuthor").unwrap_or(&empty);
    let swatches: Vec<SwatchItem> = data
        .child("themeSwatches")
        .map(|s| s.children_named("swatch").map(swatch_item).collect())
        .unwrap_or_default();

    // Kuler spells the element `themeDownLoadCount`.
    let downloads = data
        .child("themeDownLoadCount")
        .or_else(|| data.child("themeDownloadCount"))
        .map(|c| leading_integer(&c.text))
        .unwrap_or(0);

    ThemeItem {
        title: item.text_of("title"),
        link: item.text_of("link"),
        description: collapse_whitespace(&item.text_of("description")),
        pub_date: item.text_of("pubDate"),
        theme_id: data.text_of("themeID"),
        theme_title: data.text_of("themeTitle"),
        theme_image: data.text_of("themeImage"),
        theme_author: ThemeAuthor {
            author_id: author.text_of("authorID"),
            author_label: author.text_of("authorLabel"),
        },
        theme_tags: collapse_whitespace(&data.text_of("themeTags")),
        theme_rating: data.text_of("themeRating").parse().unwrap_or(0.0),
        theme_download_count: downloads,
        theme_created_at: data.text_of("themeCreatedAt"),
        theme_edited_at: data.text_of("themeEditedAt"),
        theme_swatches: if swatches.is_empty() {
            ThemeSwatches::default()
        } else {
            ThemeSwatches::new(swatches)
        },
    }
}

fn swatch_item(swatch: &Element) -> SwatchItem {
    SwatchItem {
        swatch_hex_color: swatch.text_of("swatchHexColor"),
        swatch_color_mode: swatch.text_of("swatchColorMode"),
        swatch_channel1: swatch.text_of("swatchChannel1"),
        swatch_channel2: swatch.text_of("swatchChannel2"),
        swatch_channel3: swatch.text_of("swatchChannel3"),
        swatch_channel4: swatch.text_of("swatchChannel4"),
        swatch_index: swatch.text_of("swatchIndex"),
    }
}

fn comment_item(item: &Element) -> CommentItem {
    let empty = Element::default();
    let data = item.child("commentItem").unwrap_or(&empty);
    CommentItem {
        comment: data.text_of("comment"),
        author: data.text_of("author"),
        posted_at: data.text_of("postedAt"),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Integer prefix of `text` (`"12 downloads"` → 12), or 0.
fn leading_integer(text: &str) -> u64 {
    let text = text.trim();
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text[..end].parse().unwrap_or(0)
}
