//! Loads the project configuration from a `tagline.yaml` file, searching
//! upward from the working directory the way version-control tools find
//! their repository root.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

use crate::tag::Tag;

const PROJECT_FILE: &str = "tagline.yaml";

/// The site author, used for feed metadata.
#[derive(Clone, Debug, Deserialize)]
pub struct Author {
    pub name: String,

    #[serde(default)]
    pub email: Option<String>,
}

impl Author {
    /// The author as an RSS contact string: `email (name)` when an email is
    /// configured, else just the name.
    pub fn contact(&self) -> String {
        match &self.email {
            Some(email) => format!("{} ({})", email, self.name),
            None => self.name.clone(),
        }
    }
}

/// Which backend the theme toggle persists to.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeStorage {
    /// File-backed; the chosen theme survives restarts.
    Durable,

    /// In-memory; the chosen theme lasts for the session only.
    Session,
}

impl Default for ThemeStorage {
    fn default() -> Self {
        ThemeStorage::Durable
    }
}

#[derive(Deserialize)]
struct Project {
    site_root: Url,
    title: String,

    #[serde(default)]
    description: String,

    #[serde(default)]
    language: Option<String>,

    #[serde(default)]
    author: Option<Author>,

    #[serde(default = "default_blog_path")]
    blog_path: String,

    #[serde(default = "default_posts_directory")]
    posts_directory: PathBuf,

    #[serde(default)]
    tags: Vec<Tag>,

    #[serde(default)]
    quote_url: Option<Url>,

    #[serde(default)]
    theme_storage: ThemeStorage,
}

fn default_blog_path() -> String {
    "blog".to_owned()
}

fn default_posts_directory() -> PathBuf {
    PathBuf::from("posts")
}

/// The resolved project configuration.
pub struct Config {
    /// The site's root URL.
    pub site_root: Url,

    /// The base URL for post pages, `{site_root}/{blog_path}/`. Ends in a
    /// trailing slash so [`Url::join`] appends rather than replaces.
    pub blog_url: Url,

    pub title: String,
    pub description: String,
    pub language: Option<String>,
    pub author: Option<Author>,

    /// The directory containing post source files.
    pub posts_source_directory: PathBuf,

    /// The directory containing static assets to copy into the output, if
    /// it exists.
    pub static_source_directory: PathBuf,

    /// The directory build output lands in.
    pub output_directory: PathBuf,

    /// The tag catalog: one filter control per entry, in order.
    pub tags: Vec<Tag>,

    /// The daily-quote endpoint; `None` disables the quote feature.
    pub quote_url: Option<Url>,

    /// The theme-persistence backend.
    pub theme_storage: ThemeStorage,
}

impl Config {
    /// Finds the project file in `dir` or the nearest ancestor directory
    /// and loads it.
    pub fn from_directory(dir: &Path, output_directory: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path, output_directory)
        } else {
            match dir.parent() {
                Some(parent) => {
                    Config::from_directory(parent, output_directory)
                }
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE,
                )),
            }
        }
    }

    /// Loads the configuration from a specific project file.
    pub fn from_project_file(path: &Path, output_directory: &Path) -> Result<Config> {
        let file = std::fs::File::open(path).map_err(|e| {
            anyhow!("Opening project file `{}`: {}", path.display(), e)
        })?;
        let project: Project = serde_yaml::from_reader(file)?;
        let project_root = path.parent().ok_or_else(|| {
            anyhow!(
                "Can't get parent directory for provided project file path '{:?}'",
                path,
            )
        })?;

        Ok(Config {
            blog_url: project
                .site_root
                .join(&format!("{}/", project.blog_path))?,
            site_root: project.site_root,
            title: project.title,
            description: project.description,
            language: project.language,
            author: project.author,
            posts_source_directory: project_root.join(project.posts_directory),
            static_source_directory: project_root.join("static"),
            output_directory: output_directory.to_owned(),
            tags: project.tags,
            quote_url: project.quote_url,
            theme_storage: project.theme_storage,
        })
    }
}
