//! Support for creating the RSS 2.0 feed from a list of posts. One item per
//! post, newest first; the item description falls back through the post's
//! remark, subtitle, and title; each tag becomes a category.

use std::fmt;
use std::io::Write;

use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use rss::{Category, Channel, Guid, Item};
use url::Url;

use crate::config::Author;
use crate::post::Post;

/// Bundled configuration for creating a feed.
pub struct FeedConfig {
    pub title: String,
    pub description: String,
    pub link: Url,
    pub language: Option<String>,
    pub author: Option<Author>,
}

/// Creates a feed from some configuration ([`FeedConfig`]) and a list of
/// [`Post`]s and writes the result to a [`std::io::Write`]. This function
/// takes ownership of the provided [`FeedConfig`].
pub fn write_feed<W: Write>(config: FeedConfig, posts: &[Post], w: W) -> Result<()> {
    channel(config, posts)?.pretty_write_to(w, b' ', 2)?;
    Ok(())
}

fn channel(config: FeedConfig, posts: &[Post]) -> Result<Channel> {
    // Posts arrive sorted from the parser, but the feed re-sorts rather
    // than depend on callers remembering to.
    let mut sorted: Vec<&Post> = posts.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let mut channel = Channel::default();
    channel.set_title(config.title);
    channel.set_link(config.link.to_string());
    channel.set_description(config.description);
    channel.set_language(config.language);
    if let Some(author) = &config.author {
        channel.set_managing_editor(author.contact());
        channel.set_webmaster(author.contact());
    }
    channel.set_items(
        sorted
            .iter()
            .map(|post| item(post))
            .collect::<Result<Vec<Item>>>()?,
    );
    Ok(channel)
}

fn item(post: &Post) -> Result<Item> {
    // The frontmatter only carries a date, so the pubDate is pinned to
    // midnight UTC.
    let naive_date = NaiveDate::parse_from_str(&post.date, "%Y-%m-%d")?;
    let naive_date_time =
        NaiveDateTime::new(naive_date, NaiveTime::from_hms(0, 0, 0));
    let date = FixedOffset::east(0).from_utc_datetime(&naive_date_time);

    let mut item = Item::default();
    item.set_title(post.title.clone());
    item.set_link(post.url.to_string());
    item.set_pub_date(date.to_rfc2822());
    item.set_description(description(post));
    item.set_categories(
        post.tags
            .iter()
            .map(|tag| {
                let mut category = Category::default();
                category.set_name(tag.id.clone());
                category
            })
            .collect::<Vec<Category>>(),
    );

    let mut guid = Guid::default();
    guid.set_value(post.url.to_string());
    guid.set_permalink(true);
    item.set_guid(guid);
    Ok(item)
}

// The description falls back remark -> subtitle -> title, like the page's
// own post listing.
fn description(post: &Post) -> String {
    post.remark
        .clone()
        .or_else(|| post.subtitle.clone())
        .unwrap_or_else(|| post.title.clone())
}

/// The result of a fallible feed operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants include I/O, RSS, and
/// date parsing issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an RSS-related error.
    Rss(rss::Error),

    /// Returned when there is an issue parsing a post's date.
    DateTimeParse(chrono::ParseError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Rss(err) => err.fmt(f),
            Error::DateTimeParse(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Rss(err) => Some(err),
            Error::DateTimeParse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<rss::Error> for Error {
    /// Converts [`rss::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: rss::Error) -> Error {
        Error::Rss(err)
    }
}

impl From<chrono::ParseError> for Error {
    /// Converts [`chrono::ParseError`]s into [`Error`]. This allows us to
    /// use the `?` operator in fallible feed operations.
    fn from(err: chrono::ParseError) -> Error {
        Error::DateTimeParse(err)
    }
}
