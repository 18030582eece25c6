//! The two pipelines: per-thread mining and the daily stats walk.
//!
//! Both loops are strictly sequential. A failure is confined to its unit of
//! work (one thread id, one day offset): it is logged, counted and skipped.
//! Only output errors abort a run.

use std::{
  io::{self, Write},
  ops::RangeInclusive,
};

use chrono::Local;
use starmine_api::{
  HistoryWalk, Reconciled,
  payload::{decode_post, decode_stats},
  reconcile,
};
use starmine_core::{
  fetch::{Endpoints, Fetch},
  stats::StatsSnapshot,
};
use starmine_scrape::Selectors;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::emit::{self, TsvLog};

// ─── Skips ───────────────────────────────────────────────────────────────────

/// Why one thread or one day produced no output.
#[derive(Debug, Error)]
pub enum SkipReason {
  #[error("fetch failed: {0}")]
  Fetch(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error(transparent)]
  Redirect(starmine_core::Error),

  #[error(transparent)]
  Scrape(#[from] starmine_scrape::Error),

  #[error(transparent)]
  Api(#[from] starmine_api::Error),
}

impl SkipReason {
  fn fetch(err: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Fetch(Box::new(err))
  }
}

fn log_skip(unit: &str, id: u64, reason: &SkipReason) {
  match reason {
    SkipReason::Redirect(_)
    | SkipReason::Scrape(starmine_scrape::Error::NotAQuestion(_)) => {
      debug!(unit, id, "skipped: {reason}");
    }
    SkipReason::Api(
      starmine_api::Error::ScoreMismatch { .. }
      | starmine_api::Error::OutOfOrder { .. },
    ) => {
      error!(unit, id, "discarded: {reason}");
    }
    _ => warn!(unit, id, "skipped: {reason}"),
  }
}

// ─── Threads ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ThreadTally {
  /// Threads whose records reached the log.
  pub emitted: usize,
  pub skipped: usize,
  /// Lines written.
  pub records: usize,
}

/// Fetch, mine and reconcile one thread.
pub async fn mine_thread<F: Fetch>(
  fetcher: &F,
  endpoints: &Endpoints,
  selectors: &Selectors,
  id: u64,
) -> Result<Reconciled, SkipReason> {
  let url = endpoints.thread_page(id);
  let page = fetcher.fetch(&url).await.map_err(SkipReason::fetch)?;
  page.ensure_canonical(&url).map_err(SkipReason::Redirect)?;

  let now = Local::now().naive_local();
  let records = starmine_scrape::mine(&page.text(), id, selectors, now)?;

  let api = fetcher
    .fetch(&endpoints.post_summary(id))
    .await
    .map_err(SkipReason::fetch)?;
  let summary = decode_post(&api.body)?;
  Ok(reconcile(id, records, &summary, now)?)
}

/// Mine every id in `ids`, ascending, appending each surviving thread to
/// `out`.
pub async fn crawl_threads<F: Fetch, W: Write>(
  fetcher: &F,
  endpoints: &Endpoints,
  selectors: &Selectors,
  ids: RangeInclusive<u64>,
  out: &mut TsvLog<W>,
) -> io::Result<ThreadTally> {
  let mut tally = ThreadTally::default();

  for id in ids {
    match mine_thread(fetcher, endpoints, selectors, id).await {
      Ok(reconciled) => {
        for record in &reconciled.records {
          out.write_line(&emit::thread_line(record))?;
        }
        tally.emitted += 1;
        tally.records += reconciled.records.len();
      }
      Err(reason) => {
        log_skip("thread", id, &reason);
        tally.skipped += 1;
      }
    }
  }

  Ok(tally)
}

// ─── History ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HistoryTally {
  pub written: usize,
  pub skipped: usize,
}

async fn mine_day<F: Fetch>(
  fetcher: &F,
  endpoints: &Endpoints,
  walk: &mut HistoryWalk,
  age: u32,
) -> Result<StatsSnapshot, SkipReason> {
  let fetched = fetcher
    .fetch(&endpoints.daily_stats(age))
    .await
    .map_err(SkipReason::fetch)?;
  let payload = decode_stats(&fetched.body)?;
  Ok(walk.fold(age, &payload, Local::now().naive_local())?)
}

/// Walk `days` in the order given, one snapshot line per day.
///
/// `days` should come from [`starmine_api::day_offsets`]; an offset that is
/// not strictly below its predecessor is refused by the walk and skipped.
pub async fn crawl_history<F: Fetch, W: Write>(
  fetcher: &F,
  endpoints: &Endpoints,
  days: impl IntoIterator<Item = u32>,
  out: &mut TsvLog<W>,
) -> io::Result<HistoryTally> {
  let mut walk = HistoryWalk::new();
  let mut tally = HistoryTally::default();

  for age in days {
    match mine_day(fetcher, endpoints, &mut walk, age).await {
      Ok(snap) => {
        out.write_line(&emit::stats_line(&snap))?;
        tally.written += 1;
      }
      Err(reason) => {
        log_skip("day", u64::from(age), &reason);
        tally.skipped += 1;
      }
    }
  }

  Ok(tally)
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use starmine_core::fetch::Fetched;

  use super::*;

  const BASE: &str = "http://forum.test";

  /// An in-memory site: URL to response. Unknown URLs fail with `NotFound`.
  #[derive(Default)]
  struct FakeForum {
    pages: HashMap<String, Fetched>,
  }

  impl FakeForum {
    fn serve(&mut self, url: String, body: &str) {
      self.redirect(url.clone(), url, body);
    }

    fn redirect(&mut self, url: String, resolved: String, body: &str) {
      self.pages.insert(url, Fetched {
        url:  resolved,
        body: body.as_bytes().to_vec(),
      });
    }
  }

  impl Fetch for FakeForum {
    type Error = io::Error;

    async fn fetch(&self, url: &str) -> io::Result<Fetched> {
      self
        .pages
        .get(url)
        .cloned()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, url.to_string()))
    }
  }

  fn endpoints() -> Endpoints { Endpoints::new(BASE) }

  fn selectors() -> Selectors { Selectors::biostars().unwrap() }

  fn post(vote: &str, verb: &str, days: u32, user: u64, name: &str) -> String {
    format!(
      "<div class=\"vote-count\">{vote}</div>\
       <span class=\"relativetime\">{verb} {days} days ago by</span>\
       <a href=\"/u/{user}/\">{name}</a>"
    )
  }

  fn comment(days: u32, user: u64, name: &str) -> String {
    format!(
      "<div class=\"vote-count\"></div>\
       <span class=\"relativetime\">written {days} days ago by</span>\
       <a href=\"/u/{user}/\">{name}</a>"
    )
  }

  /// Question (vote 4), one answer (vote 2), one comment.
  fn thread_page() -> String {
    format!(
      "<html><head><title>Question: Which aligner?</title></head><body>\
       {}{}{}<a href=\"/t/ngs/\" class=\"tag\">ngs</a></body></html>",
      post("4", "asked", 12, 1, "alice"),
      post("2", "answered", 11, 2, "bob"),
      comment(10, 1, "alice"),
    )
  }

  fn post_api(answer_count: u32, score: i64) -> String {
    format!(
      r#"{{"creation_date": "2014-03-08T10:00:00", "answer_count": {answer_count},
          "score": {score}, "type": "Question", "type_id": 1}}"#
    )
  }

  fn forum_with_thread(id: u64, api: &str) -> FakeForum {
    let mut forum = FakeForum::default();
    let ep = endpoints();
    forum.serve(ep.thread_page(id), &thread_page());
    forum.serve(ep.post_summary(id), api);
    forum
  }

  async fn crawl(forum: &FakeForum, ids: RangeInclusive<u64>) -> (ThreadTally, String) {
    let mut log = TsvLog::new(Vec::new());
    let tally = crawl_threads(forum, &endpoints(), &selectors(), ids, &mut log)
      .await
      .unwrap();
    (tally, String::from_utf8(log.finish().unwrap()).unwrap())
  }

  // ─── Threads ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn emits_one_line_per_action() {
    let forum = forum_with_thread(7, &post_api(1, 4));
    let (tally, out) = crawl(&forum, 7..=7).await;

    assert_eq!(tally, ThreadTally {
      emitted: 1,
      skipped: 0,
      records: 3,
    });
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 3);

    let actions: Vec<_> =
      lines.iter().map(|l| l.split('\t').nth(5).unwrap()).collect();
    assert_eq!(actions, ["asked", "answered", "commented"]);

    let first: Vec<_> = lines[0].split('\t').collect();
    assert_eq!(first[0], "7");
    assert_eq!(first[1], "12 days ago");
    assert_eq!(&first[6..8], ["1", "alice"]);
    assert_eq!(&first[8..13], ["4", "1", "2", "2", "2.0"]);
    assert_eq!(&first[13..], ["ngs", "Question", "1"]);
  }

  #[tokio::test]
  async fn answer_count_disagreement_still_emits_mined_count() {
    let forum = forum_with_thread(7, &post_api(5, 4));
    let (tally, out) = crawl(&forum, 7..=7).await;
    assert_eq!(tally.emitted, 1);
    assert!(out.lines().all(|l| l.split('\t').nth(9) == Some("1")));
  }

  #[tokio::test]
  async fn score_disagreement_discards_whole_thread() {
    let forum = forum_with_thread(7, &post_api(1, 9));
    let (tally, out) = crawl(&forum, 7..=7).await;
    assert_eq!(tally.skipped, 1);
    assert!(out.is_empty());
  }

  #[tokio::test]
  async fn redirected_thread_is_skipped() {
    let mut forum = FakeForum::default();
    let ep = endpoints();
    forum.redirect(ep.thread_page(8), ep.thread_page(3), &thread_page());
    forum.serve(ep.post_summary(8), &post_api(1, 4));

    let (tally, out) = crawl(&forum, 8..=8).await;
    assert_eq!(tally.skipped, 1);
    assert!(out.is_empty());
  }

  #[tokio::test]
  async fn failures_are_confined_to_their_thread() {
    let mut forum = forum_with_thread(2, &post_api(1, 4));
    let ep = endpoints();
    // 3: not a question
    forum.serve(
      ep.thread_page(3),
      "<html><head><title>Tool: samtools</title></head></html>",
    );
    // 4: page fine, API body garbage
    forum.serve(ep.thread_page(4), &thread_page());
    forum.serve(ep.post_summary(4), "<html>oops</html>");
    // 1 and 5: nothing served

    let (tally, out) = crawl(&forum, 1..=5).await;
    assert_eq!(tally, ThreadTally {
      emitted: 1,
      skipped: 4,
      records: 3,
    });
    assert!(out.lines().all(|l| l.starts_with("2\t")));
  }

  #[tokio::test]
  async fn empty_range_writes_nothing() {
    let forum = forum_with_thread(1, &post_api(1, 4));
    let (min_id, max_id) = (5, 1);
    let (tally, out) = crawl(&forum, min_id..=max_id).await;
    assert_eq!(tally, ThreadTally::default());
    assert!(out.is_empty());
  }

  // ─── History ───────────────────────────────────────────────────────────────

  fn history_forum() -> FakeForum {
    let mut forum = FakeForum::default();
    let ep = endpoints();
    forum.serve(
      ep.daily_stats(3),
      r#"{"date": "2014-03-17T00:00:00",
          "x_new_users": [{"id": 7}],
          "x_new_posts": [{"id": 70, "author_id": 7, "root_id": 70, "type_id": 1}]}"#,
    );
    forum.serve(
      ep.daily_stats(1),
      r#"{"date": "2014-03-19T00:00:00",
          "x_new_posts": [{"id": 71, "author_id": 7, "root_id": 70, "type_id": 2}],
          "x_new_votes": [{"post_id": 70, "type": "Upvote"}]}"#,
    );
    forum
  }

  async fn walk(forum: &FakeForum, days: Vec<u32>) -> (HistoryTally, Vec<String>) {
    let mut log = TsvLog::new(Vec::new());
    let tally = crawl_history(forum, &endpoints(), days, &mut log)
      .await
      .unwrap();
    let out = String::from_utf8(log.finish().unwrap()).unwrap();
    (tally, out.lines().map(String::from).collect())
  }

  #[tokio::test]
  async fn history_resolves_ages_from_earlier_days() {
    let (tally, lines) = walk(&history_forum(), vec![3, 2, 1]).await;

    // day 2 is not served
    assert_eq!(tally, HistoryTally {
      written: 2,
      skipped: 1,
    });
    let day_one: Vec<_> = lines[1].split('\t').collect();
    assert_eq!(&day_one[..5], ["1", "2014-03-19T00:00:00", "2014", "3", "19"]);
    assert_eq!(&day_one[28..], ["7", "3", "3", "3", "", ""]);
  }

  #[tokio::test]
  async fn history_refuses_increasing_offsets() {
    let (tally, lines) = walk(&history_forum(), vec![1, 3]).await;
    assert_eq!(tally, HistoryTally {
      written: 1,
      skipped: 1,
    });
    let only: Vec<_> = lines[0].split('\t').collect();
    assert_eq!(only[0], "1");
    assert_eq!(&only[28..], ["7", "", "", "", "", ""]);
  }
}
