//! Exports the [`build_site`] function which stitches together the
//! high-level steps of building the blog's output: parsing the posts
//! ([`crate::post`]), generating the RSS feed ([`crate::feed`]), and
//! copying the static source directory into the output directory.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::feed::{write_feed, Error as FeedError, FeedConfig};
use crate::post::{Error as ParseError, Parser as PostParser};

/// Builds the site output from a [`Config`] object: `feed.xml` plus a copy
/// of the static asset directory, when the project has one.
pub fn build_site(config: &Config) -> Result<()> {
    let parser = PostParser::new(&config.blog_url);
    let posts = parser.parse_posts(&config.posts_source_directory)?;
    tracing::info!(posts = posts.len(), "parsed posts");

    std::fs::create_dir_all(&config.output_directory)?;
    write_feed(
        FeedConfig {
            title: config.title.clone(),
            description: config.description.clone(),
            link: config.site_root.clone(),
            language: config.language.clone(),
            author: config.author.clone(),
        },
        &posts,
        File::create(config.output_directory.join("feed.xml"))?,
    )?;
    tracing::info!("wrote feed.xml");

    if config.static_source_directory.is_dir() {
        let static_output = config.output_directory.join("static");
        rmdir(&static_output)?;
        copy_dir(&config.static_source_directory, &static_output)?;
        tracing::info!("copied static assets");
    }

    Ok(())
}

fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            copy_dir(
                &src.join(entry.file_name()),
                &dst.join(entry.file_name()),
            )?;
        } else {
            std::fs::copy(src.join(entry.file_name()), dst.join(entry.file_name()))?;
        }
    }

    Ok(())
}

fn rmdir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(x) => Ok(x),
        Err(e) => match e.kind() {
            std::io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err: e,
            }),
        },
    }
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building the site. Errors can be during parsing,
/// feed generation, cleaning output directories, and other I/O.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors during parsing.
    Parse(ParseError),

    /// Returned for errors writing the feed.
    Feed(FeedError),

    /// Returned for I/O problems while cleaning output directories.
    Clean { path: PathBuf, err: std::io::Error },

    /// Returned for other I/O errors.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => err.fmt(f),
            Error::Feed(err) => err.fmt(f),
            Error::Clean { path, err } => {
                write!(f, "Cleaning directory '{}': {}", path.display(), err)
            }
            Error::Io(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Feed(err) => Some(err),
            Error::Clean { path: _, err } => Some(err),
            Error::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<ParseError> for Error {
    /// Converts [`ParseError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}
