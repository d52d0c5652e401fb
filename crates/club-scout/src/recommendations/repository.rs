use std::future::Future;
use std::time::Duration;

use super::domain::{ClubId, ClubNeed, Player, PlayerId};

/// Data-access collaborator supplying the candidate pool for a need.
///
/// Implementations own any I/O and retry policy; the engine calls this once per request.
pub trait PlayerSource: Send + Sync {
    fn fetch_candidates(
        &self,
        need: &ClubNeed,
    ) -> impl Future<Output = Result<Vec<Player>, SourceError>> + Send;

    /// Single player lookup backing the signals view.
    fn find_player(
        &self,
        player_id: &PlayerId,
    ) -> impl Future<Output = Result<Option<Player>, SourceError>> + Send;
}

/// Lookup of the active need profile registered for a club.
pub trait ClubNeedDirectory: Send + Sync {
    fn need_for(
        &self,
        club_id: &ClubId,
    ) -> impl Future<Output = Result<Option<ClubNeed>, SourceError>> + Send;
}

/// Error enumeration for collaborator failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("source did not respond within {0:?}")]
    Timeout(Duration),
    #[error("source unavailable: {0}")]
    Unavailable(String),
}
