//! Document → parallel sequences of typed fields.

use scraper::{ElementRef, Html};
use starmine_core::thread::AuthorRef;

use crate::{Error, Result, profile::Selectors};

/// A relative-time or last-edit marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeMark {
  /// Cleaned time text, e.g. `3 days ago`.
  pub text:    String,
  pub is_edit: bool,
}

/// The four sequences mined from a thread page, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSequences {
  pub times:        Vec<TimeMark>,
  pub author_links: Vec<AuthorRef>,
  /// `None` where the marker shows no numeric score (comments).
  pub votes:        Vec<Option<i64>>,
  pub tags:         Vec<String>,
}

/// The trimmed document title, if any.
pub fn title(doc: &Html, selectors: &Selectors) -> Option<String> {
  doc
    .select(&selectors.title)
    .next()
    .map(|el| node_text(el).trim().to_string())
}

/// Fail unless the page title marks a root question.
pub fn ensure_question(doc: &Html, selectors: &Selectors) -> Result<()> {
  match title(doc, selectors) {
    Some(t) if t.starts_with(&selectors.title_prefix) => Ok(()),
    other => Err(Error::NotAQuestion(other)),
  }
}

pub fn extract(doc: &Html, selectors: &Selectors) -> PageSequences {
  let times = doc
    .select(&selectors.times)
    .map(|el| {
      let raw = node_text(el);
      TimeMark {
        is_edit: raw.contains(&selectors.edit_marker),
        text:    clean_time(&raw),
      }
    })
    .collect();

  let author_links = doc
    .select(&selectors.links)
    .filter_map(|el| {
      let href = el.value().attr("href")?;
      let caps = selectors.author_href.captures(href)?;
      Some(AuthorRef {
        user_id: caps[1].parse().ok()?,
        name:    node_text(el).trim().to_string(),
      })
    })
    .collect();

  let votes = doc
    .select(&selectors.votes)
    .map(|el| parse_vote(&node_text(el)))
    .collect();

  let tags = doc
    .select(&selectors.tags)
    .map(|el| node_text(el).trim().to_string())
    .collect();

  PageSequences {
    times,
    author_links,
    votes,
    tags,
  }
}

/// Reduce a time marker's text to the time phrase: drop everything before
/// the first digit, keep the first line, and cut the trailing `by <user>`.
pub fn clean_time(raw: &str) -> String {
  let from_digit = raw.trim_start_matches(|c: char| !c.is_ascii_digit());
  let line = from_digit.lines().next().unwrap_or_default().trim();
  let line = line.split(" by ").next().unwrap_or_default();
  line.strip_suffix(" by").unwrap_or(line).trim().to_string()
}

/// A vote marker counts only when its text is purely numeric.
fn parse_vote(text: &str) -> Option<i64> {
  let text = text.trim();
  if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  text.parse().ok()
}

fn node_text(el: ElementRef<'_>) -> String { el.text().collect() }
