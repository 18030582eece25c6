//! Thread event extraction for rendered forum pages.
//!
//! Turns the markup of a thread page into a validated, typed sequence of
//! [`ThreadRecord`]s. Pure synchronous; no HTTP dependencies.
//!
//! Pipeline:
//!   markup &str
//!     └─ Html::parse_document()
//!          └─ extract::ensure_question()  → title check
//!          └─ extract::extract()          → PageSequences
//!               └─ assemble::assemble()   → Vec<ThreadRecord>
//!
//! A page either yields its full set of records or an error; never a partial
//! set.
//!
//! # Quick start
//!
//! ```no_run
//! use starmine_scrape::{Selectors, mine};
//!
//! let selectors = Selectors::biostars().unwrap();
//! let markup = std::fs::read_to_string("p-1234.html").unwrap();
//! let now = chrono::Local::now().naive_local();
//! let records = mine(&markup, 1234, &selectors, now).unwrap();
//! println!("{} actions", records.len());
//! ```

mod assemble;
pub mod error;
pub mod extract;
pub mod profile;

use chrono::NaiveDateTime;
use scraper::Html;
use starmine_core::thread::ThreadRecord;

pub use error::{Error, Result};
pub use extract::{PageSequences, TimeMark};
pub use profile::{BIOSTARS, MarkupProfile, Selectors};

/// Mine the thread page `markup` for thread `thread_id`, resolving relative
/// times against `now`.
pub fn mine(
  markup: &str,
  thread_id: u64,
  selectors: &Selectors,
  now: NaiveDateTime,
) -> Result<Vec<ThreadRecord>> {
  let doc = Html::parse_document(markup);
  extract::ensure_question(&doc, selectors)?;
  let page = extract::extract(&doc, selectors);
  assemble::assemble(thread_id, page, now)
}
