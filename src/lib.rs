//! The library code for the `tagline` blog engine. The interesting part is
//! the tag-filter state machine for the blog page, which keeps three things
//! in lockstep:
//!
//! 1. Which items and section titles are visible ([`crate::page`])
//! 2. Which filter control carries the "selected" state ([`crate::filter`])
//! 3. What the navigable URL's `tag` query parameter says ([`crate::nav`],
//!    [`crate::history`])
//!
//! The filter is single-select: clicking a tag filters the page down to
//! items carrying that tag, clicking it again clears the filter, and every
//! change pushes a history entry so back/forward steps through prior
//! selections one at a time.
//!
//! Around that core sit the pieces a blog engine needs anyway: parsing
//! posts from source files on disk ([`crate::post`]), generating the RSS
//! feed ([`crate::feed`]), the light/dark theme toggle ([`crate::theme`]),
//! the best-effort daily quote ([`crate::quote`]), and the build glue that
//! stitches them together ([`crate::build`]).

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod feed;
pub mod filter;
pub mod history;
pub mod nav;
pub mod page;
pub mod post;
pub mod quote;
pub mod tag;
pub mod theme;
