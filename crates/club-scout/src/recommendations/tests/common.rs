use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::recommendations::domain::{
    AgeRange, ClubId, ClubNeed, NewsMention, Player, PlayerId, Position, PreferredFoot,
};
use crate::recommendations::explanation::Explanation;
use crate::recommendations::ranker::ScoredCandidate;
use crate::recommendations::repository::{ClubNeedDirectory, PlayerSource, SourceError};
use crate::recommendations::scoring::{Factor, FactorScores, ScoringConfig};
use crate::recommendations::service::RecommendationService;

pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date")
}

pub(super) fn forward_need() -> ClubNeed {
    ClubNeed {
        club_id: ClubId("club-001".to_string()),
        club_name: Some("Riverside FC".to_string()),
        positions: vec![Position::Forward],
        age_range: Some(AgeRange { min: 20, max: 30 }),
        budget_max_eur: None,
        preferred_foot: None,
        priorities: None,
    }
}

pub(super) fn player(id: &str, position: Position, age: u8, rating: f32) -> Player {
    Player {
        id: PlayerId(id.to_string()),
        name: format!("Player {id}"),
        position,
        secondary_positions: Vec::new(),
        age,
        current_club: Some("Harbour Town".to_string()),
        rating: Some(rating),
        market_value_eur: None,
        preferred_foot: Some(PreferredFoot::Right),
        available: true,
        availability_window: None,
        signals: Vec::new(),
        news: Vec::new(),
    }
}

pub(super) fn mention(sentiment: f32, confidence: f32, days_ago: i64) -> NewsMention {
    NewsMention {
        sentiment,
        confidence,
        published_on: as_of() - chrono::Duration::days(days_ago),
    }
}

/// Pool used by most service and routing tests.
pub(super) fn pool() -> Vec<Player> {
    let mut striker = player("p-striker", Position::Forward, 25, 9.0);
    striker.news = vec![mention(0.6, 0.9, 1)];
    let mut winger = player("p-winger", Position::Midfielder, 24, 8.0);
    winger.secondary_positions = vec![Position::Forward];
    let veteran = player("p-veteran", Position::Forward, 34, 8.5);
    let playmaker = player("p-playmaker", Position::Midfielder, 25, 9.5);
    let keeper = player("p-keeper", Position::Goalkeeper, 27, 7.0);
    vec![striker, winger, veteran, playmaker, keeper]
}

pub(super) fn candidate(id: &str, match_score: f32, fit: f32, performance: f32) -> ScoredCandidate {
    ScoredCandidate {
        player: player(id, Position::Forward, 25, 7.0),
        scores: FactorScores {
            fit,
            performance,
            availability: 100.0,
            news_impact: 50.0,
            risk: 0.0,
            news_confidence: None,
        },
        match_score,
        explanation: Explanation {
            summary: String::new(),
            dominant_factor: Factor::Fit,
            confidence: None,
            top_reasons: Vec::new(),
        },
    }
}

#[derive(Default)]
pub(super) struct MemoryPlayers {
    pub(super) players: Vec<Player>,
    pub(super) calls: AtomicUsize,
}

impl MemoryPlayers {
    pub(super) fn with(players: Vec<Player>) -> Self {
        Self {
            players,
            calls: AtomicUsize::new(0),
        }
    }
}

impl PlayerSource for MemoryPlayers {
    async fn fetch_candidates(&self, _need: &ClubNeed) -> Result<Vec<Player>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.players.clone())
    }

    async fn find_player(&self, player_id: &PlayerId) -> Result<Option<Player>, SourceError> {
        Ok(self.players.iter().find(|player| &player.id == player_id).cloned())
    }
}

pub(super) struct SlowPlayers {
    pub(super) delay: Duration,
}

impl PlayerSource for SlowPlayers {
    async fn fetch_candidates(&self, _need: &ClubNeed) -> Result<Vec<Player>, SourceError> {
        tokio::time::sleep(self.delay).await;
        Ok(pool())
    }

    async fn find_player(&self, player_id: &PlayerId) -> Result<Option<Player>, SourceError> {
        tokio::time::sleep(self.delay).await;
        Ok(pool().into_iter().find(|player| &player.id == player_id))
    }
}

pub(super) struct FailingPlayers;

impl PlayerSource for FailingPlayers {
    async fn fetch_candidates(&self, _need: &ClubNeed) -> Result<Vec<Player>, SourceError> {
        Err(SourceError::Unavailable("player store offline".to_string()))
    }

    async fn find_player(&self, _player_id: &PlayerId) -> Result<Option<Player>, SourceError> {
        Err(SourceError::Unavailable("player store offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryClubs {
    needs: Mutex<HashMap<ClubId, ClubNeed>>,
}

impl MemoryClubs {
    pub(super) fn with(needs: Vec<ClubNeed>) -> Self {
        let map = needs
            .into_iter()
            .map(|need| (need.club_id.clone(), need))
            .collect();
        Self {
            needs: Mutex::new(map),
        }
    }
}

impl ClubNeedDirectory for MemoryClubs {
    async fn need_for(&self, club_id: &ClubId) -> Result<Option<ClubNeed>, SourceError> {
        let guard = self.needs.lock().expect("club mutex poisoned");
        Ok(guard.get(club_id).cloned())
    }
}

pub(super) const FETCH_TIMEOUT: Duration = Duration::from_millis(200);

pub(super) fn build_service(
    players: Vec<Player>,
) -> RecommendationService<MemoryPlayers, MemoryClubs> {
    RecommendationService::new(
        Arc::new(MemoryPlayers::with(players)),
        Arc::new(MemoryClubs::with(vec![forward_need()])),
        ScoringConfig::default(),
        FETCH_TIMEOUT,
    )
    .expect("default config is valid")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}
