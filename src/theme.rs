//! The light/dark theme toggle. The initial theme resolves as: stored
//! value, else the host's dark preference, else light; toggling flips the
//! theme and writes it back to the store. The storage backend is a
//! configuration choice: durable (survives restarts) or session-scoped
//! (lives only as long as the process).

use std::path::PathBuf;

/// A color theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// The stored representation of the theme.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parses a stored representation. Anything unrecognized reads as "no
    /// stored theme".
    pub fn parse(s: &str) -> Option<Theme> {
        match s {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// The other theme.
    pub fn flipped(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Where the chosen theme persists between views.
pub trait ThemeStore {
    /// The stored theme, if any.
    fn load(&self) -> Option<Theme>;

    /// Persists `theme`. Storage failures are not the user's problem;
    /// implementations log and move on.
    fn store(&mut self, theme: Theme);
}

/// A [`ThemeStore`] backed by a file, surviving restarts.
pub struct DurableStore {
    path: PathBuf,
}

impl DurableStore {
    /// Builds a store persisting to `path`.
    pub fn new(path: PathBuf) -> DurableStore {
        DurableStore { path }
    }
}

impl ThemeStore for DurableStore {
    fn load(&self) -> Option<Theme> {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|contents| Theme::parse(contents.trim()))
    }

    fn store(&mut self, theme: Theme) {
        if let Err(err) = std::fs::write(&self.path, theme.as_str()) {
            tracing::warn!(path = %self.path.display(), %err, "failed to store theme");
        }
    }
}

/// A [`ThemeStore`] scoped to the current session; nothing outlives the
/// process.
#[derive(Default)]
pub struct SessionStore {
    current: Option<Theme>,
}

impl ThemeStore for SessionStore {
    fn load(&self) -> Option<Theme> {
        self.current
    }

    fn store(&mut self, theme: Theme) {
        self.current = Some(theme);
    }
}

/// The toggle itself: holds the current theme and its store.
pub struct ThemeToggle<S> {
    store: S,
    current: Theme,
}

impl<S: ThemeStore> ThemeToggle<S> {
    /// Resolves the initial theme (stored, else dark preference, else
    /// light) and mirrors the result back into the store.
    pub fn new(mut store: S, prefers_dark: bool) -> ThemeToggle<S> {
        let current = store.load().unwrap_or(if prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        });
        store.store(current);
        ThemeToggle { store, current }
    }

    /// The active theme.
    pub fn current(&self) -> Theme {
        self.current
    }

    /// Flips the theme, persists the result, and returns it.
    pub fn toggle(&mut self) -> Theme {
        self.current = self.current.flipped();
        self.store.store(self.current);
        self.current
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_resolve_prefers_stored_theme() {
        let mut store = SessionStore::default();
        store.store(Theme::Dark);
        let toggle = ThemeToggle::new(store, false);
        assert_eq!(Theme::Dark, toggle.current());
    }

    #[test]
    fn test_resolve_falls_back_to_host_preference() {
        let toggle = ThemeToggle::new(SessionStore::default(), true);
        assert_eq!(Theme::Dark, toggle.current());
    }

    #[test]
    fn test_resolve_defaults_to_light() {
        let toggle = ThemeToggle::new(SessionStore::default(), false);
        assert_eq!(Theme::Light, toggle.current());
    }

    #[test]
    fn test_toggle_flips_and_persists() {
        let mut toggle = ThemeToggle::new(SessionStore::default(), false);
        assert_eq!(Theme::Dark, toggle.toggle());
        assert_eq!(Theme::Light, toggle.toggle());
        assert_eq!(Some(Theme::Light), toggle.store.load());
    }

    #[test]
    fn test_durable_store_round_trip() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("theme");

        let mut toggle =
            ThemeToggle::new(DurableStore::new(path.clone()), false);
        toggle.toggle();

        // A fresh toggle over the same file sees the stored theme.
        let reopened = ThemeToggle::new(DurableStore::new(path), false);
        assert_eq!(Theme::Dark, reopened.current());
        Ok(())
    }

    #[test]
    fn test_durable_store_ignores_garbage() -> std::io::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("theme");
        std::fs::write(&path, "solarized")?;

        let toggle = ThemeToggle::new(DurableStore::new(path), true);
        assert_eq!(Theme::Dark, toggle.current());
        Ok(())
    }
}
