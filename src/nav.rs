//! Reads and writes the one piece of UI state carried by the navigable URL:
//! the optional `tag` query parameter. Absence of the parameter means "no
//! filter". Unrelated query parameters pass through untouched so the filter
//! never clobbers state it doesn't own.

use url::Url;

const TAG_PARAM: &str = "tag";

/// Returns the active tag id encoded in `url`, if any.
pub fn tag_param(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == TAG_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Sets or removes the `tag` parameter on `url`. Passing `None` removes it;
/// every other query parameter is preserved as-is.
pub fn set_tag_param(url: &mut Url, tag: Option<&str>) {
    let others: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != TAG_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    // Clearing the query outright avoids leaving a dangling `?` when the
    // last pair is removed.
    url.set_query(None);
    if others.is_empty() && tag.is_none() {
        return;
    }

    let mut pairs = url.query_pairs_mut();
    for (key, value) in &others {
        pairs.append_pair(key, value);
    }
    if let Some(tag) = tag {
        pairs.append_pair(TAG_PARAM, tag);
    }
}
