//! An explicit model of the browser history stack the filter relies on.
//! Pushing a new entry discards any forward entries past the cursor, exactly
//! like `history.pushState`; going back or forward only moves the cursor.
//! Modeling this in memory is what lets the popstate scenarios run in tests
//! without a browser.

use url::Url;

/// A stack of visited URLs plus a cursor pointing at the current entry.
pub struct History {
    entries: Vec<Url>,
    cursor: usize,
}

impl History {
    /// Starts a history with a single entry: the URL the page was loaded
    /// with.
    pub fn new(initial: Url) -> History {
        History {
            entries: vec![initial],
            cursor: 0,
        }
    }

    /// The URL at the cursor.
    pub fn current(&self) -> &Url {
        &self.entries[self.cursor]
    }

    /// Pushes a new entry after the cursor, discarding any forward entries.
    pub fn push(&mut self, url: Url) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(url);
        self.cursor += 1;
    }

    /// Moves the cursor one entry back. Returns whether it moved.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Moves the cursor one entry forward. Returns whether it moved.
    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }
}
