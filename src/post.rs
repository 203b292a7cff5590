//! Defines the [`Post`] and [`Parser`] types and the logic for parsing
//! posts from the file system into memory. Each post file is structured as
//! follows:
//!
//! 1. Initial frontmatter fence (`---`)
//! 2. YAML frontmatter with fields `title`, `date`, and optionally `tags`
//!    (a space-separated string), `subtitle`, and `remark`
//! 3. Terminal frontmatter fence (`---`)
//! 4. Markdown post body
//!
//! For example:
//!
//! ```md
//! ---
//! title: Hello, world!
//! date: 2024-04-16
//! tags: life star
//! ---
//! # Hello
//!
//! World
//! ```

use std::{
    fmt,
    fs::File,
    path::{Path, PathBuf},
};

use pulldown_cmark::{html, Options};
use serde::Deserialize;
use url::Url;

use crate::tag::Tag;

/// A parsed blog post. The body has already been converted from Markdown to
/// HTML.
#[derive(Clone, Debug)]
pub struct Post {
    /// The post's identifier: its source path relative to the posts
    /// directory, less the `.md` extension.
    pub id: String,

    /// The post's title.
    pub title: String,

    /// An optional subtitle shown under the title.
    pub subtitle: Option<String>,

    /// An optional editorial remark, preferred over the subtitle as the
    /// feed description.
    pub remark: Option<String>,

    /// The post's date in `YYYY-MM-DD` form. Posts sort by this field,
    /// newest first.
    pub date: String,

    /// The post's page URL, `{blog_url}/{id}`.
    pub url: Url,

    /// The post's tags, in frontmatter order.
    pub tags: Vec<Tag>,

    /// The post body as HTML.
    pub body: String,
}

impl Post {
    /// Returns the post body above the fold marker (`<!-- more -->`) and
    /// whether the marker was present.
    pub fn summary(&self) -> (&str, bool) {
        const FOLD_TAG: &str = "<!-- more -->";
        match self.body.find(FOLD_TAG) {
            Some(i) => (&self.body[..i], true),
            None => (&self.body, false),
        }
    }

    /// Whether the post carries the tag with the given id.
    pub fn has_tag(&self, id: &str) -> bool {
        self.tags.iter().any(|tag| tag.id == id)
    }
}

/// The frontmatter fields of a post source file.
#[derive(Deserialize)]
struct Frontmatter {
    title: String,
    date: String,

    /// Tags as a single space-separated string, e.g. `life star`.
    #[serde(default)]
    tags: String,

    #[serde(default)]
    subtitle: Option<String>,

    #[serde(default)]
    remark: Option<String>,
}

/// Parses [`Post`] objects from source files.
pub struct Parser<'a> {
    /// The base URL for post pages; a post's URL is `{blog_url}/{id}`. Must
    /// end in a trailing slash or [`Url::join`] will drop the last path
    /// segment.
    blog_url: &'a Url,
}

impl<'a> Parser<'a> {
    /// Constructs a new parser. See fields on [`Parser`] for argument
    /// descriptions.
    pub fn new(blog_url: &'a Url) -> Parser<'a> {
        Parser { blog_url }
    }

    /// Searches `source_directory` recursively for post files (extension
    /// `.md`) and returns them sorted by date, most recent first.
    pub fn parse_posts(&self, source_directory: &Path) -> Result<Vec<Post>> {
        const MARKDOWN_EXTENSION: &str = ".md";

        let mut posts = Vec::new();
        for result in walkdir::WalkDir::new(source_directory) {
            let entry = result?;
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            if file_name.ends_with(MARKDOWN_EXTENSION) {
                posts.push(self.parse_post(
                    // strip_prefix() can't fail: every entry is under
                    // `source_directory`
                    entry.path(),
                    entry.path().strip_prefix(source_directory).unwrap(),
                )?);
            }
        }

        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(posts)
    }

    fn parse_post(&self, full_path: &Path, relative_path: &Path) -> Result<Post> {
        match self._parse_post(full_path, relative_path) {
            Ok(post) => Ok(post),
            Err(e) => Err(Error::Annotated(
                format!("parsing post `{:?}`", relative_path),
                Box::new(e),
            )),
        }
    }

    fn _parse_post(&self, full_path: &Path, relative_path: &Path) -> Result<Post> {
        use std::io::Read;
        let mut contents = String::new();
        File::open(full_path)?.read_to_string(&mut contents)?;
        let input: &str = &contents;

        let (yaml_start, yaml_stop, body_start) = frontmatter_indices(input)?;
        let frontmatter: Frontmatter = serde_yaml::from_str(&input[yaml_start..yaml_stop])?;

        let id = post_id(relative_path)?;
        let mut post = Post {
            url: self.blog_url.join(&id)?,
            id,
            title: frontmatter.title,
            subtitle: frontmatter.subtitle,
            remark: frontmatter.remark,
            date: frontmatter.date,
            tags: frontmatter.tags.split_whitespace().map(Tag::new).collect(),
            body: String::new(),
        };

        let mut options = Options::empty();
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_TASKLISTS);
        html::push_html(
            &mut post.body,
            pulldown_cmark::Parser::new_ext(&input[body_start..], options),
        );
        Ok(post)
    }
}

// Locates the YAML span and the body start within a post source file.
fn frontmatter_indices(input: &str) -> Result<(usize, usize, usize)> {
    const FENCE: &str = "---";
    if !input.starts_with(FENCE) {
        return Err(Error::FrontmatterMissingStartFence);
    }
    match input[FENCE.len()..].find(FENCE) {
        None => Err(Error::FrontmatterMissingEndFence),
        Some(offset) => Ok((
            FENCE.len(),                        // yaml_start
            FENCE.len() + offset,               // yaml_stop
            FENCE.len() + offset + FENCE.len(), // body_start
        )),
    }
}

// The post id is the relative source path, less the extension, with `/`
// separators regardless of platform.
fn post_id(relative_path: &Path) -> Result<String> {
    let mut segments = Vec::new();
    for component in relative_path.with_extension("").components() {
        match component.as_os_str().to_str() {
            Some(segment) => segments.push(segment.to_owned()),
            None => {
                return Err(Error::InvalidFileName(relative_path.to_owned()));
            }
        }
    }
    Ok(segments.join("/"))
}

/// Represents the result of a [`Post`]-parse operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error parsing a [`Post`] object.
#[derive(Debug)]
pub enum Error {
    /// Returned when a post source file is missing its starting frontmatter
    /// fence (`---`).
    FrontmatterMissingStartFence,

    /// Returned when a post source file is missing its terminal frontmatter
    /// fence (`---` i.e., the starting fence was found but the ending one
    /// was missing).
    FrontmatterMissingEndFence,

    /// Returned when there was an error parsing the frontmatter as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// Returned when there is a problem building a post's URL.
    UrlParse(url::ParseError),

    /// Returned when a source file name isn't valid UTF-8.
    InvalidFileName(PathBuf),

    /// Returned for other I/O errors.
    Io(std::io::Error),

    /// Returned for WalkDir I/O errors.
    WalkDir(walkdir::Error),

    /// An error with an annotation.
    Annotated(String, Box<Error>),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::FrontmatterMissingStartFence => {
                write!(f, "Post must begin with `---`")
            }
            Error::FrontmatterMissingEndFence => {
                write!(f, "Missing closing `---`")
            }
            Error::DeserializeYaml(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
            Error::InvalidFileName(path) => {
                write!(f, "invalid file name: {:?}", path)
            }
            Error::Io(err) => err.fmt(f),
            Error::WalkDir(err) => err.fmt(f),
            Error::Annotated(annotation, err) => {
                write!(f, "{}: {}", &annotation, err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FrontmatterMissingStartFence => None,
            Error::FrontmatterMissingEndFence => None,
            Error::DeserializeYaml(err) => Some(err),
            Error::UrlParse(err) => Some(err),
            Error::InvalidFileName(_) => None,
            Error::Io(err) => Some(err),
            Error::WalkDir(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<url::ParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`]. It allows us to use
    /// the `?` operator for URL parsing and joining functions.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts a [`serde_yaml::Error`] into an [`Error`]. It allows us to
    /// use the `?` operator for [`serde_yaml`] deserialization functions.
    fn from(err: serde_yaml::Error) -> Error {
        Error::DeserializeYaml(err)
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: walkdir::Error) -> Error {
        Error::WalkDir(err)
    }
}

impl From<std::io::Error> for Error {
    /// Converts a [`std::io::Error`] into an [`Error`]. It allows us to use
    /// the `?` operator for fallible I/O functions.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}
