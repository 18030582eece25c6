//! Tab-separated output: one line per thread action and one per stats day.

use std::{
  fmt::Display,
  fs::File,
  io::{self, BufWriter, Write},
  path::Path,
};

use starmine_core::{stats::StatsSnapshot, thread::ThreadRecord};

// ─── Writer ──────────────────────────────────────────────────────────────────

/// A line-oriented log that flushes after every line.
pub struct TsvLog<W: Write> {
  out: W,
}

impl TsvLog<BufWriter<File>> {
  /// Create (or truncate) the file at `path`.
  pub fn create(path: &Path) -> io::Result<Self> {
    Ok(Self::new(BufWriter::new(File::create(path)?)))
  }
}

impl<W: Write> TsvLog<W> {
  pub fn new(out: W) -> Self { Self { out } }

  pub fn write_line(&mut self, line: &str) -> io::Result<()> {
    writeln!(self.out, "{line}")?;
    self.out.flush()
  }

  /// Flush and hand back the underlying writer.
  pub fn finish(mut self) -> io::Result<W> {
    self.out.flush()?;
    Ok(self.out)
  }
}

// ─── Line formats ────────────────────────────────────────────────────────────

pub fn thread_line(record: &ThreadRecord) -> String {
  let votes = &record.votes;
  [
    record.thread_id.to_string(),
    field(&record.date_text),
    record.year().to_string(),
    record.month().to_string(),
    record.day().to_string(),
    record.action.to_string(),
    record.author.user_id.to_string(),
    field(&record.author.name),
    votes.question.to_string(),
    votes.answer_count.to_string(),
    opt(votes.answer_min),
    opt(votes.answer_max),
    votes.answer_avg.map(decimal).unwrap_or_default(),
    record.tags.iter().map(|t| field(t)).collect::<Vec<_>>().join(","),
    record.api_type.as_deref().map(field).unwrap_or_default(),
    opt(record.api_type_id),
  ]
  .join("\t")
}

pub fn stats_line(snap: &StatsSnapshot) -> String {
  let votes = &snap.votes_by_type;
  let mut cols = vec![
    snap.age_days.to_string(),
    field(&snap.date_text),
    snap.year().to_string(),
    snap.month().to_string(),
    snap.day().to_string(),
  ];
  cols.extend(snap.posts_by_category.iter().map(u32::to_string));
  cols.extend(
    [votes.accept, votes.bookmark, votes.downvote, votes.upvote]
      .map(|n| n.to_string()),
  );
  cols.extend(
    [snap.new_posts, snap.new_votes, snap.new_users].map(|n| n.to_string()),
  );
  cols.push(join(&snap.posters));
  cols.push(join(&snap.poster_ages));
  cols.push(join_opt(&snap.root_post_ages));
  cols.push(join_opt(&snap.vote_post_ages));
  cols.push(join(&snap.new_user_ids));
  // Every column is tab-terminated, the last one included.
  let mut line = cols.join("\t");
  line.push('\t');
  line
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Keep free text from breaking the column layout.
fn field(text: &str) -> String {
  text.replace(['\t', '\n', '\r'], " ")
}

fn opt<T: Display>(value: Option<T>) -> String {
  value.map(|v| v.to_string()).unwrap_or_default()
}

/// At least one decimal: `3.0`, `2.5`.
fn decimal(value: f64) -> String {
  if value.fract() == 0.0 {
    format!("{value:.1}")
  } else {
    value.to_string()
  }
}

fn join<T: Display>(items: &[T]) -> String {
  items.iter().map(T::to_string).collect::<Vec<_>>().join(",")
}

fn join_opt<T: Display>(items: &[Option<T>]) -> String {
  items.iter().map(|v| opt(v.as_ref())).collect::<Vec<_>>().join(",")
}
