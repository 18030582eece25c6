//! Date normalization for the forum's human-readable timestamps.
//!
//! The site renders most ages relatively ("5 days ago", "8 months ago") and
//! multi-year ages with one decimal digit ("3.4 years ago"). The API reports
//! absolute timestamps. Everything resolves to a local [`NaiveDateTime`]
//! relative to a caller-supplied "now".
//!
//! Fractional years are resolved in two steps: the integer part is an exact
//! anchor (`N years ago`), then the tenths are converted into weeks at
//! [`WEEKS_PER_TENTH_YEAR`] and subtracted from the anchor.

use std::sync::LazyLock;

use chrono::{
  DateTime, Local, Months, NaiveDate, NaiveDateTime, TimeDelta,
};
use regex::Regex;

/// Weeks per tenth of a year when resolving "`N.F` years ago".
pub const WEEKS_PER_TENTH_YEAR: f64 = 5.2;

static FRACTIONAL_YEARS: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(\d+)\.(\d+) years? ago").expect("fractional-year regex")
});

static AGO: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"^(\d+|an?)\s+(second|sec|minute|min|hour|day|week|fortnight|month|year)s?\s+ago$",
  )
  .expect("relative-past regex")
});

static AHEAD: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"^in\s+(\d+|an?)\s+(second|sec|minute|min|hour|day|week|fortnight|month|year)s?$",
  )
  .expect("relative-future regex")
});

const DATETIME_FORMATS: &[&str] = &[
  "%Y-%m-%dT%H:%M:%S",
  "%Y-%m-%d %H:%M:%S",
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%d %H:%M:%S%.f",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
  "%Y-%m-%d",
  "%Y/%m/%d",
  "%b %d, %Y",
  "%B %d, %Y",
  "%b %d %Y",
  "%B %d %Y",
  "%d %b %Y",
  "%d %B %Y",
];

// ─── Public API ──────────────────────────────────────────────────────────────

/// Normalize `text` against the current wall-clock time.
pub fn normalize(text: &str) -> Option<NaiveDateTime> {
  normalize_at(text, Local::now().naive_local())
}

/// Normalize `text` against `now`. Returns `None` when the phrase cannot be
/// resolved.
pub fn normalize_at(text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
  if let Some(caps) = FRACTIONAL_YEARS.captures(text) {
    let years: u32 = caps[1].parse().ok()?;
    let tenths: u32 = caps[2].parse().ok()?;
    let anchor = now.checked_sub_months(Months::new(years.checked_mul(12)?))?;
    return anchor.checked_sub_signed(fraction_as_weeks(tenths)?);
  }
  resolve_phrase(text, now)
}

/// Convert the digits after the decimal point of a fractional-year age into
/// the week offset applied to the anchor.
pub fn fraction_as_weeks(tenths: u32) -> Option<TimeDelta> {
  let weeks = (f64::from(tenths) * WEEKS_PER_TENTH_YEAR).round() as i64;
  TimeDelta::try_weeks(weeks)
}

// ─── General resolver ────────────────────────────────────────────────────────

enum Span {
  Exact(TimeDelta),
  Calendar(Months),
}

fn resolve_phrase(text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
  let trimmed = text.trim();
  let phrase = trimmed.to_ascii_lowercase();

  match phrase.as_str() {
    "now" | "just now" | "today" => return Some(now),
    "yesterday" => return now.checked_sub_signed(TimeDelta::try_days(1)?),
    "tomorrow" => return now.checked_add_signed(TimeDelta::try_days(1)?),
    _ => {}
  }

  if let Some(caps) = AGO.captures(&phrase) {
    return match span(amount(&caps[1])?, &caps[2])? {
      Span::Exact(delta) => now.checked_sub_signed(delta),
      Span::Calendar(months) => now.checked_sub_months(months),
    };
  }

  if let Some(caps) = AHEAD.captures(&phrase) {
    return match span(amount(&caps[1])?, &caps[2])? {
      Span::Exact(delta) => now.checked_add_signed(delta),
      Span::Calendar(months) => now.checked_add_months(months),
    };
  }

  absolute(trimmed)
}

fn amount(token: &str) -> Option<i64> {
  match token {
    "a" | "an" => Some(1),
    digits => digits.parse().ok(),
  }
}

fn span(amount: i64, unit: &str) -> Option<Span> {
  let span = match unit {
    "second" | "sec" => Span::Exact(TimeDelta::try_seconds(amount)?),
    "minute" | "min" => Span::Exact(TimeDelta::try_minutes(amount)?),
    "hour" => Span::Exact(TimeDelta::try_hours(amount)?),
    "day" => Span::Exact(TimeDelta::try_days(amount)?),
    "week" => Span::Exact(TimeDelta::try_weeks(amount)?),
    "fortnight" => Span::Exact(TimeDelta::try_weeks(amount.checked_mul(2)?)?),
    "month" => Span::Calendar(Months::new(u32::try_from(amount).ok()?)),
    "year" => {
      Span::Calendar(Months::new(u32::try_from(amount.checked_mul(12)?).ok()?))
    }
    _ => return None,
  };
  Some(span)
}

/// Absolute timestamps. Date-only phrases resolve to noon of that day.
fn absolute(text: &str) -> Option<NaiveDateTime> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
    return Some(dt.with_timezone(&Local).naive_local());
  }
  if let Some(dt) = DATETIME_FORMATS
    .iter()
    .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
  {
    return Some(dt);
  }
  DATE_FORMATS
    .iter()
    .find_map(|f| NaiveDate::parse_from_str(text, f).ok())
    .and_then(|d| d.and_hms_opt(12, 0, 0))
}

#[cfg(test)]
mod tests {
  use chrono::{Datelike, NaiveDate, Timelike};

  use super::*;

  fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2014, 3, 20)
      .unwrap()
      .and_hms_opt(15, 30, 0)
      .unwrap()
  }

  fn ymd(y: i32, m: u32, d: u32) -> (i32, u32, u32) { (y, m, d) }

  fn parts(dt: NaiveDateTime) -> (i32, u32, u32) {
    (dt.year(), dt.month(), dt.day())
  }

  #[test]
  fn days_ago() {
    let dt = normalize_at("5 days ago", now()).unwrap();
    assert_eq!(parts(dt), ymd(2014, 3, 15));
    assert_eq!(dt.hour(), 15);
  }

  #[test]
  fn months_ago_uses_calendar_months() {
    let dt = normalize_at("8 months ago", now()).unwrap();
    assert_eq!(parts(dt), ymd(2013, 7, 20));
  }

  #[test]
  fn singular_article_forms() {
    assert_eq!(
      normalize_at("an hour ago", now()).unwrap(),
      now() - TimeDelta::hours(1)
    );
    assert_eq!(
      parts(normalize_at("a year ago", now()).unwrap()),
      ymd(2013, 3, 20)
    );
    assert_eq!(
      parts(normalize_at("1 week ago", now()).unwrap()),
      ymd(2014, 3, 13)
    );
  }

  #[test]
  fn keywords() {
    assert_eq!(normalize_at("just now", now()), Some(now()));
    assert_eq!(normalize_at("Today", now()), Some(now()));
    assert_eq!(
      parts(normalize_at("yesterday", now()).unwrap()),
      ymd(2014, 3, 19)
    );
  }

  #[test]
  fn future_phrase() {
    assert_eq!(
      parts(normalize_at("in 2 days", now()).unwrap()),
      ymd(2014, 3, 22)
    );
  }

  #[test]
  fn fractional_years_anchor_then_weeks() {
    let dt = normalize_at("3.5 years ago", now()).unwrap();
    let anchor = NaiveDate::from_ymd_opt(2011, 3, 20)
      .unwrap()
      .and_hms_opt(15, 30, 0)
      .unwrap();
    assert_eq!(dt, anchor - TimeDelta::weeks(26));
  }

  #[test]
  fn fractional_weeks_are_rounded() {
    // 0.3 years -> 15.6 weeks -> 16
    let dt = normalize_at("1.3 years ago", now()).unwrap();
    let anchor = now().checked_sub_months(Months::new(12)).unwrap();
    assert_eq!(dt, anchor - TimeDelta::weeks(16));
    assert_eq!(fraction_as_weeks(5), Some(TimeDelta::weeks(26)));
    assert_eq!(fraction_as_weeks(1), Some(TimeDelta::weeks(5)));
  }

  #[test]
  fn absolute_timestamps() {
    let dt = normalize_at("2013-11-02T08:15:00", now()).unwrap();
    assert_eq!(parts(dt), ymd(2013, 11, 2));
    assert_eq!(dt.hour(), 8);

    let dt = normalize_at("2013-11-02 08:15:00.250", now()).unwrap();
    assert_eq!(dt.minute(), 15);

    let dt = normalize_at("Mar 4, 2012", now()).unwrap();
    assert_eq!(parts(dt), ymd(2012, 3, 4));
    assert_eq!(dt.hour(), 12);

    let dt = normalize_at("2012-03-04", now()).unwrap();
    assert_eq!(parts(dt), ymd(2012, 3, 4));
  }

  #[test]
  fn garbage_is_unresolved() {
    assert_eq!(normalize_at("sometime last spring", now()), None);
    assert_eq!(normalize_at("", now()), None);
    assert_eq!(normalize_at("5 parsecs ago", now()), None);
  }

  #[test]
  fn wall_clock_results_are_sane() {
    let lower = NaiveDate::from_ymd_opt(1990, 1, 1)
      .unwrap()
      .and_hms_opt(0, 0, 0)
      .unwrap();
    let shape = Regex::new(r"^\d{4}-\d+-\d+ \d+:\d+:\d+.*").unwrap();
    for phrase in ["3.5 years ago", "5 days ago", "8 months ago"] {
      let dt = normalize(phrase).unwrap();
      assert!(dt < Local::now().naive_local(), "{phrase} not in the past");
      assert!(dt > lower, "{phrase} before 1990");
      assert!(shape.is_match(&dt.to_string()), "{phrase} -> {dt}");
    }
  }
}
