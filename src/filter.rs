//! The tag-filter state machine for the blog page. The controller owns the
//! page model ([`crate::page`]) and the history stack ([`crate::history`]),
//! and keeps three things in lockstep: item visibility, the selected filter
//! control, and the navigable URL's `tag` parameter.
//!
//! The filter is single-select: at most one tag is active at a time.
//! Clicking the active tag's control clears the filter. Every user-driven
//! change pushes a history entry, so going back steps through prior filter
//! selections one at a time; going back or forward re-applies whatever the
//! now-current URL encodes.
//!
//! Nothing here can fail. Pages without section titles or a quote slot
//! simply skip the corresponding updates, and the daily-quote fetch — the
//! only I/O — logs its failure and leaves the page as it was.

use url::Url;

use crate::history::History;
use crate::nav;
use crate::page::PageModel;
use crate::quote::QuoteService;

/// Maintains the single-select tag filter and reflects it in the page model
/// and the navigable URL.
pub struct FilterController {
    page: PageModel,
    history: History,
    current_tag: Option<String>,
}

impl FilterController {
    /// Binds the controller to a page model and the URL the page was loaded
    /// with. No filter is applied; use [`FilterController::initialize`] for
    /// the full page-load sequence.
    pub fn new(page: PageModel, url: Url) -> FilterController {
        FilterController {
            page,
            history: History::new(url),
            current_tag: None,
        }
    }

    /// The full page-load sequence: bind the page model, apply the filter
    /// encoded in the URL's `tag` parameter, and populate the daily-quote
    /// slot from `quotes` when both a service and a slot are present. The
    /// quote fetch is best-effort: failures are logged and the slot is left
    /// unchanged.
    pub fn initialize(
        page: PageModel,
        url: Url,
        quotes: Option<&dyn QuoteService>,
    ) -> FilterController {
        let mut controller = FilterController::new(page, url);
        let tag = nav::tag_param(controller.history.current());
        controller.apply_filter(tag.as_deref());
        if let Some(quotes) = quotes {
            controller.load_daily_quote(quotes);
        }
        controller
    }

    /// The core state transition. Clears the "selected" flag from every
    /// control, then:
    ///
    /// * `None` — marks every item and each present section title visible.
    /// * `Some(tag)` — marks the control with that id selected (silently no
    ///   selection when no control matches; filtering still applies), sets
    ///   each item visible iff its tag set contains `tag`, and recomputes
    ///   section-title visibility.
    pub fn apply_filter(&mut self, tag: Option<&str>) {
        for control in self.page.controls.iter_mut() {
            control.selected = false;
        }
        self.current_tag = tag.map(str::to_owned);

        let tag = match tag {
            None => {
                self.page.show_all();
                return;
            }
            Some(tag) => tag,
        };

        if let Some(control) = self
            .page
            .controls
            .iter_mut()
            .find(|control| control.id == tag)
        {
            control.selected = true;
        }

        for item in self.page.items.iter_mut() {
            item.visible = item.has_tag(tag);
        }
        self.page.update_section_titles();
    }

    /// Handles a click on the control for `tag`. Clicking the active tag
    /// clears the filter; clicking any other tag makes it the active
    /// filter. Either way the new state is pushed onto the history stack so
    /// the back button steps through prior selections.
    pub fn handle_tag_click(&mut self, tag: &str) {
        let next = if self.current_tag.as_deref() == Some(tag) {
            None
        } else {
            Some(tag)
        };
        self.apply_filter(next);

        let mut url = self.history.current().clone();
        nav::set_tag_param(&mut url, next);
        self.history.push(url);
    }

    /// Handles a back/forward navigation: applies whatever the now-current
    /// URL encodes. The URL is not touched — it already reflects the target
    /// state.
    pub fn handle_pop_state(&mut self) {
        let tag = nav::tag_param(self.history.current());
        self.apply_filter(tag.as_deref());
    }

    /// Navigates one history entry back, as the browser back button would,
    /// and re-applies the filter. Returns whether there was an entry to go
    /// back to.
    pub fn back(&mut self) -> bool {
        if !self.history.back() {
            return false;
        }
        self.handle_pop_state();
        true
    }

    /// Navigates one history entry forward and re-applies the filter.
    /// Returns whether there was an entry to go forward to.
    pub fn forward(&mut self) -> bool {
        if !self.history.forward() {
            return false;
        }
        self.handle_pop_state();
        true
    }

    fn load_daily_quote(&mut self, quotes: &dyn QuoteService) {
        let slot = match self.page.quote.as_mut() {
            // No quote slot on this page; the feature simply isn't present.
            None => return,
            Some(slot) => slot,
        };
        match quotes.daily_quote() {
            Ok(quote) => slot.text = Some(quote.display_text()),
            Err(err) => tracing::warn!(%err, "failed to load the daily quote"),
        }
    }

    /// The active filter tag, if any.
    pub fn current_tag(&self) -> Option<&str> {
        self.current_tag.as_deref()
    }

    /// The current navigable URL.
    pub fn current_url(&self) -> &Url {
        self.history.current()
    }

    /// The page model the controller operates on.
    pub fn page(&self) -> &PageModel {
        &self.page
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::page::{ItemNode, QuoteSlot, Section, TagControl};
    use crate::quote::{self, Quote};
    use std::collections::HashSet;

    // Three items: tagged `life`, `programming`, and `life star`. The
    // starred item renders in the starred section, everything in the
    // timeline.
    fn page() -> PageModel {
        let items = vec![
            item("a", &["life"]),
            item("b", &["programming"]),
            item("c", &["life", "star"]),
        ];
        PageModel {
            items,
            controls: vec![
                control("life", "生活"),
                control("programming", "编程"),
                control("star", "精选"),
            ],
            star_section: Some(section("starred", &[2])),
            timeline_section: Some(section("timeline", &[0, 1, 2])),
            quote: Some(QuoteSlot::default()),
        }
    }

    fn item(post_id: &str, tags: &[&str]) -> ItemNode {
        ItemNode {
            post_id: post_id.to_owned(),
            title: post_id.to_owned(),
            tags: tags.iter().map(|tag| (*tag).to_owned()).collect::<HashSet<_>>(),
            visible: true,
        }
    }

    fn control(id: &str, label: &str) -> TagControl {
        TagControl {
            id: id.to_owned(),
            label: label.to_owned(),
            selected: false,
        }
    }

    fn section(title: &str, items: &[usize]) -> Section {
        Section {
            title: title.to_owned(),
            title_visible: true,
            items: items.to_vec(),
        }
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn blog_url() -> Url {
        url("https://example.org/blog")
    }

    fn visible_ids(controller: &FilterController) -> Vec<&str> {
        controller
            .page()
            .visible_items()
            .map(|item| item.post_id.as_str())
            .collect()
    }

    struct CannedQuotes(Quote);

    impl QuoteService for CannedQuotes {
        fn daily_quote(&self) -> quote::Result<Quote> {
            Ok(self.0.clone())
        }
    }

    struct NoQuotes;

    impl QuoteService for NoQuotes {
        fn daily_quote(&self) -> quote::Result<Quote> {
            Err(quote::Error::Unavailable("no network".to_owned()))
        }
    }

    #[test]
    fn test_apply_filter_matches_tag_sets() {
        let mut controller = FilterController::new(page(), blog_url());
        controller.apply_filter(Some("life"));

        // Visibility equals tag membership for every item.
        for item in controller.page().items.iter() {
            assert_eq!(item.has_tag("life"), item.visible);
        }
        assert_eq!(vec!["a", "c"], visible_ids(&controller));
        assert_eq!(
            Some("life"),
            controller.page().selected_control().map(|c| c.id.as_str()),
        );
    }

    #[test]
    fn test_apply_filter_unset_shows_everything() {
        let mut controller = FilterController::new(page(), blog_url());
        controller.apply_filter(Some("programming"));
        controller.apply_filter(None);

        assert!(controller.page().items.iter().all(|item| item.visible));
        assert!(controller.page().star_section.as_ref().unwrap().title_visible);
        assert!(
            controller
                .page()
                .timeline_section
                .as_ref()
                .unwrap()
                .title_visible
        );
        assert!(controller.page().selected_control().is_none());
    }

    #[test]
    fn test_apply_filter_is_idempotent() {
        let mut once = FilterController::new(page(), blog_url());
        once.apply_filter(Some("life"));
        let mut twice = FilterController::new(page(), blog_url());
        twice.apply_filter(Some("life"));
        twice.apply_filter(Some("life"));

        assert_eq!(visible_ids(&once), visible_ids(&twice));
        assert_eq!(
            Some("life"),
            twice.page().selected_control().map(|c| c.id.as_str()),
        );
    }

    #[test]
    fn test_untagged_item_hidden_under_any_filter() {
        let mut model = page();
        model.items.push(item("untagged", &[]));
        model
            .timeline_section
            .as_mut()
            .unwrap()
            .items
            .push(3);
        let mut controller = FilterController::new(model, blog_url());

        controller.apply_filter(Some("life"));
        assert!(!controller.page().items[3].visible);
        controller.apply_filter(Some("star"));
        assert!(!controller.page().items[3].visible);
        controller.apply_filter(None);
        assert!(controller.page().items[3].visible);
    }

    #[test]
    fn test_unknown_tag_filters_with_empty_selection() {
        let mut controller = FilterController::new(page(), blog_url());
        controller.apply_filter(Some("recent"));

        // No control matches `recent` on this page; selection is empty but
        // filtering still applies.
        assert!(controller.page().selected_control().is_none());
        assert!(visible_ids(&controller).is_empty());
    }

    #[test]
    fn test_section_titles_are_or_of_member_visibility() {
        let mut controller = FilterController::new(page(), blog_url());
        controller.apply_filter(Some("programming"));

        // Only item `b` is visible; it lives in the timeline, not the
        // starred section.
        let page = controller.page();
        assert!(!page.star_section.as_ref().unwrap().title_visible);
        assert!(page.timeline_section.as_ref().unwrap().title_visible);

        controller.apply_filter(Some("star"));
        let page = controller.page();
        assert!(page.star_section.as_ref().unwrap().title_visible);
        assert!(page.timeline_section.as_ref().unwrap().title_visible);
    }

    #[test]
    fn test_click_sets_filter_and_pushes_url() {
        let mut controller = FilterController::new(page(), blog_url());
        controller.handle_tag_click("life");

        assert_eq!(Some("life"), controller.current_tag());
        assert_eq!(
            "https://example.org/blog?tag=life",
            controller.current_url().as_str(),
        );
    }

    #[test]
    fn test_click_active_tag_clears_filter() {
        let mut controller = FilterController::new(page(), blog_url());
        controller.handle_tag_click("life");
        controller.handle_tag_click("life");

        // Toggle law: back to the unfiltered state, parameter removed.
        assert_eq!(None, controller.current_tag());
        assert!(controller.page().items.iter().all(|item| item.visible));
        assert_eq!(
            "https://example.org/blog",
            controller.current_url().as_str(),
        );
    }

    #[test]
    fn test_click_other_tag_replaces_filter() {
        let mut controller = FilterController::new(page(), blog_url());
        controller.handle_tag_click("life");
        controller.handle_tag_click("programming");

        assert_eq!(Some("programming"), controller.current_tag());
        assert_eq!(vec!["b"], visible_ids(&controller));
        assert_eq!(
            "https://example.org/blog?tag=programming",
            controller.current_url().as_str(),
        );
    }

    #[test]
    fn test_initialize_applies_url_tag() {
        let controller = FilterController::initialize(
            page(),
            url("https://example.org/blog?tag=programming"),
            None,
        );

        assert_eq!(vec!["b"], visible_ids(&controller));
        assert_eq!(
            Some("programming"),
            controller
                .page()
                .selected_control()
                .map(|c| c.id.as_str()),
        );
    }

    #[test]
    fn test_initialize_without_tag_leaves_page_unfiltered() {
        let controller =
            FilterController::initialize(page(), blog_url(), None);
        assert!(controller.page().items.iter().all(|item| item.visible));
        assert_eq!(None, controller.current_tag());
    }

    #[test]
    fn test_back_steps_through_prior_selections() {
        let mut controller = FilterController::new(page(), blog_url());
        controller.handle_tag_click("life");
        controller.handle_tag_click("programming");

        assert!(controller.back());
        assert_eq!(Some("life"), controller.current_tag());
        assert_eq!(vec!["a", "c"], visible_ids(&controller));

        // Back to a URL with no tag parameter: filter resets entirely.
        assert!(controller.back());
        assert_eq!(None, controller.current_tag());
        assert!(controller.page().items.iter().all(|item| item.visible));
        assert!(!controller.back());
    }

    #[test]
    fn test_forward_reapplies_undone_selection() {
        let mut controller = FilterController::new(page(), blog_url());
        controller.handle_tag_click("life");
        assert!(controller.back());
        assert!(controller.forward());

        assert_eq!(Some("life"), controller.current_tag());
        assert_eq!(vec!["a", "c"], visible_ids(&controller));
        assert!(!controller.forward());
    }

    #[test]
    fn test_initialize_populates_quote_slot() {
        let quotes = CannedQuotes(Quote {
            from: "书".to_owned(),
            hitokoto: "千里之行，始于足下。".to_owned(),
        });
        let controller =
            FilterController::initialize(page(), blog_url(), Some(&quotes));

        assert_eq!(
            Some("「书」千里之行，始于足下。"),
            controller
                .page()
                .quote
                .as_ref()
                .unwrap()
                .text
                .as_deref(),
        );
    }

    #[test]
    fn test_quote_failure_leaves_slot_unchanged() {
        let controller =
            FilterController::initialize(page(), blog_url(), Some(&NoQuotes));

        assert_eq!(None, controller.page().quote.as_ref().unwrap().text);
        // The failure never disturbs the filter state either.
        assert!(controller.page().items.iter().all(|item| item.visible));
    }

    #[test]
    fn test_missing_quote_slot_skips_fetch() {
        let mut model = page();
        model.quote = None;
        let quotes = CannedQuotes(Quote {
            from: "书".to_owned(),
            hitokoto: "x".to_owned(),
        });
        let controller =
            FilterController::initialize(model, blog_url(), Some(&quotes));
        assert!(controller.page().quote.is_none());
    }
}
