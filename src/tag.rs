//! Defines the [`Tag`] type, which labels a [`crate::post::Post`] and backs
//! the filter controls on the blog page.

use serde::Deserialize;
use std::hash::{Hash, Hasher};

/// The id of the tag marking a post as starred. Starred posts are rendered
/// into the page's starred section in addition to the timeline.
pub const STAR: &str = "star";

/// The id of the derived tag covering posts from the last half-year. It is
/// never written in frontmatter; [`crate::page::PageModel`] attaches it at
/// render time based on the post date.
pub const RECENT: &str = "recent";

/// Represents a content category. The `id` is the identifier carried in the
/// navigable URL and in item tag sets, so it must be a slug; `label` is the
/// human-readable text shown on the page's filter control (e.g. id `life`,
/// label `生活`).
#[derive(Clone, Debug, Deserialize)]
pub struct Tag {
    /// The slugified identifier. Filtering matches on this field by exact
    /// equality.
    pub id: String,

    /// The display text for the tag's filter control.
    pub label: String,
}

impl Tag {
    /// Builds a [`Tag`] from a raw frontmatter token. The id is the
    /// slugified token so e.g. `Life` and `life` resolve to the same value;
    /// the label keeps the original spelling.
    pub fn new(token: &str) -> Tag {
        Tag {
            id: slug::slugify(token),
            label: token.to_owned(),
        }
    }
}

impl Hash for Tag {
    /// Implements [`Hash`] for [`Tag`] by delegating directly to the `id`
    /// field.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl PartialEq for Tag {
    /// Implements [`PartialEq`] and [`Eq`] for [`Tag`] by delegating
    /// directly to the `id` field.
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl Eq for Tag {}
