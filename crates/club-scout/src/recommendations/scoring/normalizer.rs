use chrono::NaiveDate;

use super::super::domain::{AgeRange, ClubNeed, Player, PreferredFoot};
use super::config::{RatingScale, ScoringConfig};
use super::FactorScores;

/// Neutral value used whenever a source datum is missing.
pub(crate) const NEUTRAL: f32 = 50.0;
const FULL: f32 = 100.0;
/// Position component for a player who only covers the need as a secondary role.
const SECONDARY_POSITION_FIT: f32 = 87.5;
const BLOCKING_SIGNAL_PENALTY: f32 = 30.0;
const RISK_PER_SIGNAL: f32 = 10.0;
const RISK_PER_SEVERITY: f32 = 20.0;
const RISK_CAP: f32 = 40.0;

pub(crate) fn normalize(
    player: &Player,
    need: &ClubNeed,
    config: &ScoringConfig,
    as_of: NaiveDate,
) -> FactorScores {
    let (news_impact, news_confidence) = news_signal(player, config.news_window_days, as_of);

    FactorScores {
        fit: fit_score(player, need),
        performance: performance_score(player.rating, &config.rating_scale),
        availability: availability_score(player, as_of),
        news_impact,
        risk: risk_score(player, as_of),
        news_confidence,
    }
}

pub(crate) fn fit_score(player: &Player, need: &ClubNeed) -> f32 {
    let position = if need.positions.contains(&player.position) {
        FULL
    } else if player
        .secondary_positions
        .iter()
        .any(|position| need.positions.contains(position))
    {
        SECONDARY_POSITION_FIT
    } else {
        return 0.0;
    };

    let age = need
        .age_range
        .map(|range| age_fit(player.age, range))
        .unwrap_or(FULL);
    let budget = match need.budget_max_eur {
        None => FULL,
        Some(ceiling) => player
            .market_value_eur
            .map(|value| budget_fit(value, ceiling))
            .unwrap_or(NEUTRAL),
    };
    let foot = match (need.preferred_foot, player.preferred_foot) {
        (None, _) => FULL,
        (Some(_), None) => NEUTRAL,
        (Some(_), Some(PreferredFoot::Both)) => FULL,
        (Some(wanted), Some(actual)) if wanted == actual => FULL,
        (Some(PreferredFoot::Both), Some(_)) => FULL,
        _ => 0.0,
    };

    let priorities = need.priorities();
    let total = priorities.total();
    if total <= 0.0 {
        return position;
    }

    let weighted = priorities.position * position
        + priorities.age * age
        + priorities.budget * budget
        + priorities.foot * foot;
    // A matching position always leaves a non-zero fit so only mismatches are excluded.
    (weighted / total).clamp(f32::MIN_POSITIVE, FULL)
}

/// Centre of the band scores 100, the inclusive edges 50, anything outside 0.
pub(crate) fn age_fit(age: u8, range: AgeRange) -> f32 {
    if !range.contains(age) {
        return 0.0;
    }
    let half_width = (f32::from(range.max) - f32::from(range.min)) / 2.0;
    if half_width <= 0.0 {
        return FULL;
    }
    let centre = (f32::from(range.min) + f32::from(range.max)) / 2.0;
    let distance = (f32::from(age) - centre).abs();
    FULL - NEUTRAL * (distance / half_width)
}

/// Up to half the ceiling scores 100, falling to 50 at the ceiling, 0 above it.
pub(crate) fn budget_fit(value: u64, ceiling: u64) -> f32 {
    if ceiling == 0 || value > ceiling {
        return 0.0;
    }
    let ratio = value as f64 / ceiling as f64;
    if ratio <= 0.5 {
        return FULL;
    }
    (f64::from(FULL) - f64::from(NEUTRAL) * ((ratio - 0.5) / 0.5)) as f32
}

pub(crate) fn performance_score(rating: Option<f32>, scale: &RatingScale) -> f32 {
    match rating.filter(|value| value.is_finite()) {
        Some(rating) => ((rating - scale.min) / (scale.max - scale.min) * FULL).clamp(0.0, FULL),
        None => NEUTRAL,
    }
}

pub(crate) fn availability_score(player: &Player, as_of: NaiveDate) -> f32 {
    if !player.available {
        return 0.0;
    }

    let window = player
        .availability_window
        .filter(|fraction| fraction.is_finite())
        .map(|fraction| fraction.clamp(0.0, 1.0))
        .unwrap_or(1.0);

    let penalty: f32 = player
        .signals
        .iter()
        .filter(|signal| signal.kind.blocks_selection() && signal.is_active(as_of))
        .map(|signal| clamp_unit(signal.severity) * BLOCKING_SIGNAL_PENALTY)
        .sum();

    (window * FULL - penalty).clamp(0.0, FULL)
}

/// Returns the impact score and, when any mention counted, the mean confidence.
pub(crate) fn news_signal(
    player: &Player,
    window_days: u16,
    as_of: NaiveDate,
) -> (f32, Option<f32>) {
    let mentions: Vec<(f32, f32)> = player
        .news
        .iter()
        .filter(|mention| {
            let age_days = (as_of - mention.published_on).num_days();
            (0..i64::from(window_days)).contains(&age_days)
        })
        .filter(|mention| mention.sentiment.is_finite())
        .map(|mention| {
            let confidence = if mention.confidence.is_finite() {
                clamp_unit(mention.confidence)
            } else {
                0.0
            };
            (mention.sentiment.clamp(-1.0, 1.0), confidence)
        })
        .collect();

    if mentions.is_empty() {
        return (NEUTRAL, None);
    }

    let count = mentions.len() as f32;
    let total_confidence: f32 = mentions.iter().map(|(_, confidence)| confidence).sum();
    let sentiment = if total_confidence > 0.0 {
        mentions
            .iter()
            .map(|(sentiment, confidence)| sentiment * confidence)
            .sum::<f32>()
            / total_confidence
    } else {
        mentions.iter().map(|(sentiment, _)| sentiment).sum::<f32>() / count
    };

    let impact = (NEUTRAL + NEUTRAL * sentiment).clamp(0.0, FULL);
    (impact, Some(total_confidence / count))
}

pub(crate) fn risk_score(player: &Player, as_of: NaiveDate) -> f32 {
    let severities: Vec<f32> = player
        .signals
        .iter()
        .filter(|signal| signal.is_active(as_of))
        .map(|signal| clamp_unit(signal.severity))
        .collect();

    if severities.is_empty() {
        return 0.0;
    }

    let count = severities.len() as f32;
    let mean = severities.iter().sum::<f32>() / count;
    (RISK_PER_SIGNAL * count + RISK_PER_SEVERITY * mean).min(RISK_CAP)
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
