use crate::error::MatchError;
use crate::models::UserId;

/// Order-independent key for two distinct users, `low < high`
///
/// "A requests B" and "B requests A" resolve to the same key, so the store
/// never holds more than one record per unordered pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalPair {
    low: UserId,
    high: UserId,
}

impl CanonicalPair {
    pub fn low(&self) -> UserId {
        self.low
    }

    pub fn high(&self) -> UserId {
        self.high
    }

    pub fn contains(&self, id: UserId) -> bool {
        self.low == id || self.high == id
    }
}

/// Canonicalize two user identifiers
///
/// Fails with `InvalidIdentifier` for non-positive ids and with
/// `SelfReference` when both ids are equal.
pub fn canonicalize(a: UserId, b: UserId) -> Result<CanonicalPair, MatchError> {
    for id in [a, b] {
        if id <= 0 {
            return Err(MatchError::InvalidIdentifier(id.to_string()));
        }
    }

    if a == b {
        return Err(MatchError::SelfReference);
    }

    Ok(CanonicalPair {
        low: a.min(b),
        high: a.max(b),
    })
}

/// Parse a raw identifier taken from a path, query or token claim
pub fn parse_user_id(raw: Option<&str>) -> Result<UserId, MatchError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| MatchError::InvalidIdentifier("missing".to_string()))?;

    match raw.parse::<UserId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(MatchError::InvalidIdentifier(raw.to_string())),
    }
}
