use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::confidence::ConfidenceTier;
use super::domain::{ClubId, NewsMention, Player, PlayerId, PlayerSignal, Position};
use super::ranker::Recommendation;
use super::scoring::FactorScores;
use super::service::RecommendationSet;

/// Sub-scores exposed for display, one decimal each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub fit: f32,
    pub performance: f32,
    pub availability: f32,
    pub news_impact: f32,
    pub risk: f32,
}

impl From<&FactorScores> for FactorBreakdown {
    fn from(scores: &FactorScores) -> Self {
        Self {
            fit: one_decimal(scores.fit),
            performance: one_decimal(scores.performance),
            availability: one_decimal(scores.availability),
            news_impact: one_decimal(scores.news_impact),
            risk: one_decimal(scores.risk),
        }
    }
}

/// Caller-facing representation of a single recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationView {
    pub rank: usize,
    pub player_id: PlayerId,
    pub player_name: String,
    pub position: Position,
    pub current_club: Option<String>,
    pub age: u8,
    pub match_score: f32,
    pub fit_score: f32,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<ConfidenceTier>,
    pub top_reasons: Vec<String>,
    pub factors: FactorBreakdown,
}

impl From<&Recommendation> for RecommendationView {
    fn from(recommendation: &Recommendation) -> Self {
        let player = &recommendation.player;
        Self {
            rank: recommendation.rank,
            player_id: player.id.clone(),
            player_name: player.name.clone(),
            position: player.position,
            current_club: player.current_club.clone(),
            age: player.age,
            match_score: one_decimal(recommendation.match_score),
            fit_score: one_decimal(recommendation.fit_score),
            explanation: recommendation.explanation.summary.clone(),
            confidence: recommendation.explanation.confidence,
            top_reasons: recommendation.explanation.top_reasons.clone(),
            factors: FactorBreakdown::from(&recommendation.scores),
        }
    }
}

/// Response body for recommendation endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub club_id: ClubId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub club_name: Option<String>,
    pub as_of: NaiveDate,
    pub count: usize,
    pub recommendations: Vec<RecommendationView>,
}

impl From<&RecommendationSet> for RecommendationResponse {
    fn from(set: &RecommendationSet) -> Self {
        let recommendations: Vec<RecommendationView> = set
            .recommendations
            .iter()
            .map(RecommendationView::from)
            .collect();
        Self {
            club_id: set.need.club_id.clone(),
            club_name: set.need.club_name.clone(),
            as_of: set.as_of,
            count: recommendations.len(),
            recommendations,
        }
    }
}

/// Active signals and recent news attached to a single player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSignalReport {
    pub player_id: PlayerId,
    pub player_name: String,
    pub as_of: NaiveDate,
    pub count: usize,
    pub signals: Vec<PlayerSignal>,
    /// Mentions inside the news window, newest first.
    pub news: Vec<NewsMention>,
}

impl PlayerSignalReport {
    pub fn build(player: &Player, news_window_days: u16, as_of: NaiveDate) -> Self {
        let signals: Vec<PlayerSignal> = player
            .signals
            .iter()
            .filter(|signal| signal.is_active(as_of))
            .cloned()
            .collect();

        let mut news: Vec<NewsMention> = player
            .news
            .iter()
            .filter(|mention| {
                let age_days = (as_of - mention.published_on).num_days();
                (0..i64::from(news_window_days)).contains(&age_days)
            })
            .cloned()
            .collect();
        news.sort_by(|a, b| b.published_on.cmp(&a.published_on));

        Self {
            player_id: player.id.clone(),
            player_name: player.name.clone(),
            as_of,
            count: signals.len(),
            signals,
            news,
        }
    }
}

pub(crate) fn one_decimal(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}
