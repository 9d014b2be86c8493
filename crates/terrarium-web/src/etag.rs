//! ETags for rendered chart images.
//!
//! A chart's ETag is the SHA-256 of its PNG bytes, so it changes exactly when
//! the rendered image does.

use axum::http::HeaderValue;
use sha2::{Digest, Sha256};

/// Strong ETag (quoted hex digest) for `body`.
pub fn compute_etag(body: &[u8]) -> String {
  let hash = Sha256::digest(body);
  format!("\"{}\"", hex::encode(hash))
}

/// `true` when an `If-None-Match` header value matches `etag`.
///
/// Accepts `*`, comma-separated lists, weak validators (`W/"…"`) and bare
/// unquoted tags.
pub fn if_none_match(header: Option<&HeaderValue>, etag: &str) -> bool {
  let Some(value) = header.and_then(|v| v.to_str().ok()) else {
    return false;
  };
  let wanted = strip_etag_quotes(etag);
  value.split(',').map(str::trim).any(|candidate| {
    candidate == "*"
      || strip_etag_quotes(candidate.trim_start_matches("W/")) == wanted
  })
}

fn strip_etag_quotes(s: &str) -> &str { s.trim_matches('"') }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn same_bytes_same_etag() {
    assert_eq!(compute_etag(b"png"), compute_etag(b"png"));
    assert_ne!(compute_etag(b"png"), compute_etag(b"png2"));
  }

  #[test]
  fn etag_is_quoted_hex() {
    let etag = compute_etag(b"");
    assert!(etag.starts_with('"') && etag.ends_with('"'));
    assert_eq!(etag.len(), 64 + 2);
  }

  #[test]
  fn if_none_match_variants() {
    let etag = compute_etag(b"chart");
    let bare = etag.trim_matches('"').to_string();
    let weak = format!("W/{etag}");
    let list = format!("\"other\", {etag}");

    for value in [etag.as_str(), bare.as_str(), weak.as_str(), list.as_str(), "*"] {
      let header = HeaderValue::from_str(value).unwrap();
      assert!(if_none_match(Some(&header), &etag), "{value}");
    }

    let stale = HeaderValue::from_static("\"stale\"");
    assert!(!if_none_match(Some(&stale), &etag));
    assert!(!if_none_match(None, &etag));
  }
}
