use chrono::NaiveDate;
use club_scout::error::AppError;
use club_scout::recommendations::{
    ClubId, ClubNeed, ClubNeedDirectory, Player, PlayerId, PlayerSource, SourceError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

const SEED_FIXTURE: &str = include_str!("../fixtures/seed.json");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Debug, Deserialize)]
struct FixtureFile {
    players: Vec<Player>,
    #[serde(default)]
    needs: Vec<ClubNeed>,
}

/// Read-only player pool and club needs loaded from a JSON fixture.
#[derive(Debug, Default, Clone)]
pub(crate) struct FixtureStore {
    players: Vec<Player>,
    needs: HashMap<ClubId, ClubNeed>,
}

impl FixtureStore {
    pub(crate) fn seeded() -> Result<Self, AppError> {
        Self::from_json(SEED_FIXTURE)
    }

    pub(crate) fn from_path(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Uses the configured fixture when present, otherwise the bundled seed.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let store = match path {
            Some(path) => Self::from_path(path)?,
            None => Self::seeded()?,
        };
        info!(
            players = store.players.len(),
            clubs = store.needs.len(),
            source = %path.map(|p| p.display().to_string()).unwrap_or_else(|| "seed".to_string()),
            "player pool loaded"
        );
        Ok(store)
    }

    fn from_json(raw: &str) -> Result<Self, AppError> {
        let file: FixtureFile = serde_json::from_str(raw)?;
        let needs = file
            .needs
            .into_iter()
            .map(|need| (need.club_id.clone(), need))
            .collect();
        Ok(Self {
            players: file.players,
            needs,
        })
    }

    pub(crate) fn players(&self) -> &[Player] {
        &self.players
    }

    pub(crate) fn need(&self, club_id: &ClubId) -> Option<&ClubNeed> {
        self.needs.get(club_id)
    }

    pub(crate) fn club_ids(&self) -> Vec<&ClubId> {
        let mut ids: Vec<&ClubId> = self.needs.keys().collect();
        ids.sort_by(|a, b| a.0.cmp(&b.0));
        ids
    }
}

impl PlayerSource for FixtureStore {
    async fn fetch_candidates(&self, need: &ClubNeed) -> Result<Vec<Player>, SourceError> {
        Ok(self
            .players
            .iter()
            .filter(|player| {
                player
                    .positions()
                    .any(|position| need.positions.contains(&position))
            })
            .cloned()
            .collect())
    }

    async fn find_player(&self, player_id: &PlayerId) -> Result<Option<Player>, SourceError> {
        Ok(self
            .players
            .iter()
            .find(|player| &player.id == player_id)
            .cloned())
    }
}

impl ClubNeedDirectory for FixtureStore {
    async fn need_for(&self, club_id: &ClubId) -> Result<Option<ClubNeed>, SourceError> {
        Ok(self.needs.get(club_id).cloned())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
