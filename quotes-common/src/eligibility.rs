//! Per-viewer vote eligibility tokens
//!
//! Serving a quote to a viewer issues a token for that (session, quote) pair;
//! a vote consumes it. Viewing the same quote again overwrites the token and
//! re-enables voting. Tokens older than the session TTL count as absent.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Opaque viewer session identifier (UUID v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Vote eligibility for one viewer and one quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityToken {
    pub can_vote: bool,
    pub voted: bool,
    issued_at: Instant,
}

impl EligibilityToken {
    fn fresh(now: Instant) -> Self {
        Self {
            can_vote: true,
            voted: false,
            issued_at: now,
        }
    }

    pub fn is_eligible(&self) -> bool {
        self.can_vote && !self.voted
    }
}

/// Longest gap between two sweeps of expired tokens
pub const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct TokenTable {
    tokens: HashMap<(SessionId, i64), EligibilityToken>,
    last_sweep: Instant,
}

/// In-process token store keyed by (session, quote id)
#[derive(Debug)]
pub struct EligibilityStore {
    ttl: Duration,
    sweep_interval: Duration,
    table: Mutex<TokenTable>,
}

impl EligibilityStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sweep_interval: ttl.min(MAX_SWEEP_INTERVAL),
            table: Mutex::new(TokenTable {
                tokens: HashMap::new(),
                last_sweep: Instant::now(),
            }),
        }
    }

    /// Issue a fresh token, replacing any earlier one for the same pair.
    ///
    /// Expired tokens are dropped here too, but at most once per sweep
    /// interval; between sweeps they linger and read as absent.
    pub fn issue(&self, session: SessionId, quote_id: i64) {
        let now = Instant::now();
        let mut table = self.lock();

        if now.duration_since(table.last_sweep) >= self.sweep_interval {
            let ttl = self.ttl;
            table.tokens.retain(|_, token| now.duration_since(token.issued_at) < ttl);
            table.last_sweep = now;
        }

        table.tokens.insert((session, quote_id), EligibilityToken::fresh(now));
    }

    /// Current token for the pair, if one exists and has not expired
    pub fn token(&self, session: SessionId, quote_id: i64) -> Option<EligibilityToken> {
        let table = self.lock();
        table
            .tokens
            .get(&(session, quote_id))
            .copied()
            .filter(|token| !self.is_expired(token))
    }

    pub fn can_vote(&self, session: SessionId, quote_id: i64) -> bool {
        self.token(session, quote_id)
            .map(|token| token.is_eligible())
            .unwrap_or(false)
    }

    /// Check eligibility and mark the token consumed in one step.
    ///
    /// Returns false (and changes nothing) when the viewer may not vote.
    pub fn try_consume(&self, session: SessionId, quote_id: i64) -> bool {
        let mut table = self.lock();
        match table.tokens.get_mut(&(session, quote_id)) {
            Some(token) if token.is_eligible() && !self.is_expired(token) => {
                token.voted = true;
                token.can_vote = false;
                true
            }
            _ => false,
        }
    }

    /// Number of stored tokens, expired ones included
    pub fn len(&self) -> usize {
        self.lock().tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_expired(&self, token: &EligibilityToken) -> bool {
        token.issued_at.elapsed() >= self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, TokenTable> {
        // A panic while holding the lock cannot leave a token half-written
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
