//! Typed views of the API's JSON payloads.
//!
//! Fields the API may omit are `Option`s; the stats lists are absent on days
//! with no activity of that kind.

use serde::Deserialize;
use starmine_core::stats::VoteType;

use crate::Result;

// ─── Post summary ────────────────────────────────────────────────────────────

/// `GET /api/post/{id}/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostSummary {
  #[serde(default)]
  pub creation_date: Option<String>,
  #[serde(default)]
  pub answer_count:  Option<u32>,
  #[serde(default)]
  pub score:         Option<i64>,
  #[serde(default, rename = "type")]
  pub kind:          Option<String>,
  #[serde(default)]
  pub type_id:       Option<u32>,
}

// ─── Daily stats ─────────────────────────────────────────────────────────────

/// `GET /api/stats/{age}/`
#[derive(Debug, Clone, Deserialize)]
pub struct DailyStats {
  pub date:        String,
  #[serde(default)]
  pub x_new_users: Option<Vec<NewUser>>,
  #[serde(default)]
  pub x_new_posts: Option<Vec<NewPost>>,
  #[serde(default)]
  pub x_new_votes: Option<Vec<NewVote>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
  pub id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
  pub id:        u64,
  pub author_id: u64,
  /// Equal to `id` for root posts.
  pub root_id:   u64,
  pub type_id:   u32,
}

impl NewPost {
  pub fn is_root(&self) -> bool { self.root_id == self.id }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewVote {
  pub post_id: u64,
  #[serde(rename = "type")]
  pub kind:    VoteKind,
}

/// A vote type as reported; unrecognised names are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum VoteKind {
  Known(VoteType),
  Other(String),
}

// ─── Decoding ────────────────────────────────────────────────────────────────

pub fn decode_post(body: &[u8]) -> Result<PostSummary> {
  Ok(serde_json::from_slice(body)?)
}

pub fn decode_stats(body: &[u8]) -> Result<DailyStats> {
  Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn post_summary_fields() {
    let body = br#"{
      "id": 7542, "creation_date": "2011-03-10T14:22:01.123",
      "answer_count": 4, "score": 6, "type": "Question", "type_id": 1,
      "title": "ignored"
    }"#;
    let p = decode_post(body).unwrap();
    assert_eq!(p.answer_count, Some(4));
    assert_eq!(p.score, Some(6));
    assert_eq!(p.kind.as_deref(), Some("Question"));
    assert_eq!(p.type_id, Some(1));
  }

  #[test]
  fn post_summary_tolerates_missing_fields() {
    let p = decode_post(b"{}").unwrap();
    assert!(p.score.is_none());
    assert!(p.creation_date.is_none());
  }

  #[test]
  fn stats_lists_are_optional() {
    let s = decode_stats(br#"{"date": "2014-03-19T00:00:00"}"#).unwrap();
    assert!(s.x_new_posts.is_none());
    assert!(s.x_new_users.is_none());
    assert!(s.x_new_votes.is_none());
  }

  #[test]
  fn vote_kinds() {
    let s = decode_stats(
      br#"{"date": "2014-03-19", "x_new_votes": [
        {"post_id": 1, "type": "Upvote"},
        {"post_id": 2, "type": "Bookmark"},
        {"post_id": 3, "type": "Sidegrade"}
      ]}"#,
    )
    .unwrap();
    let kinds: Vec<_> =
      s.x_new_votes.unwrap().into_iter().map(|v| v.kind).collect();
    assert_eq!(
      kinds,
      [
        VoteKind::Known(VoteType::Upvote),
        VoteKind::Known(VoteType::Bookmark),
        VoteKind::Other("Sidegrade".into()),
      ]
    );
  }

  #[test]
  fn malformed_body_is_a_decode_error() {
    assert!(matches!(
      decode_stats(b"<html>503</html>"),
      Err(crate::Error::Decode(_))
    ));
  }
}
