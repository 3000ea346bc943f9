// /////////////////////////////////////////////////////////////////////////////
// Sas Ingestion Core
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pending Route
//!
//! A delivery attempt in flight, created once a piece turns ready. The
//! `carried_token` field is the one place a post-cutoff identity token is
//! allowed to live, and only ever non-empty for `jwt_passthru` routes — the
//! Router boundary, not this type, enforces that at the moment of dispatch,
//! but construction here is still the place that decides what gets stored.

use crate::value_objects::{AuthMode, DossierId, RouteUrl, Sha256Digest};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const MAX_ATTEMPTS: u32 = 5;
const MAX_BACKOFF_SECS: i64 = 300;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRoute {
    pub piece_sha256: Sha256Digest,
    pub dossier_id: DossierId,
    pub target_url: RouteUrl,
    pub auth_mode: AuthMode,
    pub require_review: bool,
    pub reviewed: bool,
    pub attempts: u32,
    pub last_error: Option<String>,
    pub next_retry_at: DateTime<Utc>,
    /// Non-empty only when `auth_mode = jwt_passthru`. Never included in
    /// `Debug`-derived log lines by callers; redaction is the caller's job,
    /// this type just carries the invariant.
    pub carried_token: Option<String>,
    /// HMAC key copied from the originating `RouteSpec` at enqueue time, so
    /// the dispatcher can sign a delivery attempt without a join back to the
    /// dossier's route list (which may since have changed).
    pub secret: Option<String>,
    /// Piece size and MIME type, copied from the `Piece` row at enqueue
    /// time so the dispatcher can fill out the `piece.ready` payload
    /// without a repository join on every delivery attempt.
    pub size_bytes: u64,
    pub mime: Option<String>,
}

impl PendingRoute {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        piece_sha256: Sha256Digest,
        dossier_id: DossierId,
        target_url: RouteUrl,
        auth_mode: AuthMode,
        require_review: bool,
        carried_token: Option<String>,
        secret: Option<String>,
        size_bytes: u64,
        mime: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let carried_token = match auth_mode {
            AuthMode::JwtPassthru => carried_token,
            AuthMode::OpaqueOnly => None,
        };
        Self {
            piece_sha256,
            dossier_id,
            target_url,
            auth_mode,
            require_review,
            reviewed: false,
            attempts: 0,
            last_error: None,
            next_retry_at: now,
            carried_token,
            secret,
            size_bytes,
            mime,
        }
    }

    pub fn is_poisoned(&self) -> bool {
        self.attempts >= MAX_ATTEMPTS
    }

    /// Whether this route should be picked up by a delivery worker right
    /// now, mirroring `list_routes_due`'s selection predicate.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        !self.is_poisoned() && (!self.require_review || self.reviewed) && self.next_retry_at <= now
    }

    /// Records a failed delivery attempt and computes the next backoff
    /// deadline: `min(2^attempts seconds, 5 minutes)`.
    pub fn record_failure(&mut self, error: impl Into<String>, now: DateTime<Utc>) {
        self.attempts += 1;
        self.last_error = Some(error.into());
        let backoff_secs = 2i64
            .checked_pow(self.attempts)
            .unwrap_or(MAX_BACKOFF_SECS)
            .min(MAX_BACKOFF_SECS);
        self.next_retry_at = now + Duration::seconds(backoff_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(auth_mode: AuthMode, token: Option<String>) -> PendingRoute {
        PendingRoute::new(
            Sha256Digest::of_bytes(b"x"),
            DossierId::parse("dos_a").unwrap(),
            RouteUrl::parse("https://hooks.example.com/sas").unwrap(),
            auth_mode,
            false,
            token,
            None,
            4096,
            Some("application/octet-stream".to_string()),
            Utc::now(),
        )
    }

    #[test]
    fn opaque_only_never_carries_a_token() {
        let r = route(AuthMode::OpaqueOnly, Some("leaked".to_string()));
        assert!(r.carried_token.is_none());
    }

    #[test]
    fn jwt_passthru_carries_the_token() {
        let r = route(AuthMode::JwtPassthru, Some("tok".to_string()));
        assert_eq!(r.carried_token.as_deref(), Some("tok"));
    }

    #[test]
    fn poisons_at_max_attempts() {
        let mut r = route(AuthMode::OpaqueOnly, None);
        let now = Utc::now();
        for _ in 0..5 {
            r.record_failure("boom", now);
        }
        assert!(r.is_poisoned());
        assert!(!r.is_due(now + Duration::hours(1)));
    }

    #[test]
    fn backoff_grows_exponentially_and_caps() {
        let mut r = route(AuthMode::OpaqueOnly, None);
        let now = Utc::now();
        r.record_failure("e1", now);
        assert_eq!(r.next_retry_at, now + Duration::seconds(2));
        r.record_failure("e2", now);
        assert_eq!(r.next_retry_at, now + Duration::seconds(4));
        for _ in 0..10 {
            r.record_failure("e", now);
        }
        assert_eq!(r.next_retry_at, now + Duration::seconds(MAX_BACKOFF_SECS));
    }

    #[test]
    fn require_review_blocks_until_reviewed() {
        let mut r = route(AuthMode::OpaqueOnly, None);
        r.require_review = true;
        let now = Utc::now();
        assert!(!r.is_due(now));
        r.reviewed = true;
        assert!(r.is_due(now));
    }
}
