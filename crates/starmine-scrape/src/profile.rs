//! Selector strings for the forum's markup, kept together as data.
//!
//! A [`MarkupProfile`] names every CSS selector and text marker the extractor
//! relies on. [`Selectors`] is its compiled form.

use regex::Regex;
use scraper::Selector;

use crate::{Error, Result};

/// Every markup hook the extractor uses.
#[derive(Debug, Clone, Copy)]
pub struct MarkupProfile {
  /// The document title.
  pub title:        &'static str,
  /// Title prefix that marks a root question page.
  pub title_prefix: &'static str,
  /// Relative-time and last-edit markers, in document order.
  pub times:        &'static str,
  /// Substring of a time marker's text that marks it as an edit.
  pub edit_marker:  &'static str,
  /// Candidate author links.
  pub links:        &'static str,
  /// Pattern an author link's href must match; group 1 is the user id.
  pub author_href:  &'static str,
  /// Vote-count markers.
  pub votes:        &'static str,
  /// Tag links.
  pub tags:         &'static str,
}

/// Markup of biostars.org thread pages.
pub const BIOSTARS: MarkupProfile = MarkupProfile {
  title:        "title",
  title_prefix: "Question:",
  times:        "span.relativetime, div.lastedit",
  edit_marker:  "updated",
  links:        "a[href]",
  // Relative links only, so outbound links such as `dropbox.com/u/...` are
  // not mistaken for authors.
  author_href:  r"^/u/(\d+)/",
  votes:        "div.vote-count",
  tags:         "a.tag",
};

/// A compiled [`MarkupProfile`].
#[derive(Debug)]
pub struct Selectors {
  pub(crate) title:        Selector,
  pub(crate) title_prefix: String,
  pub(crate) times:        Selector,
  pub(crate) edit_marker:  String,
  pub(crate) links:        Selector,
  pub(crate) author_href:  Regex,
  pub(crate) votes:        Selector,
  pub(crate) tags:         Selector,
}

impl Selectors {
  pub fn compile(profile: &MarkupProfile) -> Result<Self> {
    Ok(Self {
      title:        selector(profile.title)?,
      title_prefix: profile.title_prefix.to_string(),
      times:        selector(profile.times)?,
      edit_marker:  profile.edit_marker.to_string(),
      links:        selector(profile.links)?,
      author_href:  Regex::new(profile.author_href)?,
      votes:        selector(profile.votes)?,
      tags:         selector(profile.tags)?,
    })
  }

  /// Compile the [`BIOSTARS`] profile.
  pub fn biostars() -> Result<Self> { Self::compile(&BIOSTARS) }
}

fn selector(css: &str) -> Result<Selector> {
  Selector::parse(css).map_err(|e| Error::Selector {
    selector: css.to_string(),
    reason:   e.to_string(),
  })
}
