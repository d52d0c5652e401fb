use serde::{Deserialize, Serialize};

use super::confidence::ConfidenceTier;
use super::domain::{ClubNeed, Player, SignalKind};
use super::scoring::{Factor, FactorScores, ScoringEngine};
use chrono::NaiveDate;

/// Human-readable account of why a player was recommended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub summary: String,
    pub dominant_factor: Factor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<ConfidenceTier>,
    pub top_reasons: Vec<String>,
}

pub(crate) fn explain(
    engine: &ScoringEngine,
    player: &Player,
    need: &ClubNeed,
    scores: &FactorScores,
    as_of: NaiveDate,
) -> Explanation {
    let dominant = engine.dominant_factor(scores);
    let confidence = scores.news_confidence.map(ConfidenceTier::classify);

    let mut summary = format!(
        "Strongest factor: {} ({:.1} pts)",
        dominant.factor.label(),
        dominant.points
    );
    if let Some(tier) = confidence {
        summary.push_str(&format!("; {}-confidence news signal", tier.label()));
    }
    if scores.risk > 0.0 {
        summary.push_str(&format!("; {} penalty {:.0}", Factor::Risk.label(), scores.risk));
    }

    Explanation {
        summary,
        dominant_factor: dominant.factor,
        confidence,
        top_reasons: top_reasons(player, need, scores, as_of),
    }
}

fn top_reasons(player: &Player, need: &ClubNeed, scores: &FactorScores, as_of: NaiveDate) -> Vec<String> {
    let mut reasons = Vec::new();

    if need.positions.contains(&player.position) {
        reasons.push(format!("Position match: {}", player.position));
    } else if let Some(position) = player
        .secondary_positions
        .iter()
        .find(|position| need.positions.contains(position))
    {
        reasons.push(format!("Covers {} as a secondary position", position));
    }

    match need.age_range {
        Some(range) => reasons.push(format!(
            "Age fit: {} (target: {}-{})",
            player.age, range.min, range.max
        )),
        None => reasons.push(format!("Age: {}", player.age)),
    }

    reasons.push(format!("Performance score: {:.0}%", scores.performance));

    match player.market_value_eur {
        Some(value) => reasons.push(format!("Market value: EUR {}", group_thousands(value))),
        None => reasons.push("Market value: N/A".to_string()),
    }

    for signal in player.signals.iter().filter(|signal| signal.is_active(as_of)) {
        let label = match signal.kind {
            SignalKind::Injury => "Injury",
            SignalKind::Suspension => "Suspension",
            SignalKind::Disciplinary => "Disciplinary",
            SignalKind::Volatility => "Form volatility",
        };
        reasons.push(format!("{} signal (severity {:.1})", label, signal.severity));
    }

    reasons
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
