use crate::infra::FixtureStore;
use chrono::{Local, NaiveDate};
use clap::Args;
use club_scout::config::AppConfig;
use club_scout::error::AppError;
use club_scout::recommendations::{
    parse_positions, ClubId, RecommendationRequest, RecommendationResponse,
    RecommendationService, RecommendationView, DEFAULT_LIMIT,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Club identifier whose registered need should be scored
    pub(crate) club_id: String,
    /// Maximum number of players to return
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub(crate) limit: usize,
    /// Restrict results to these primary positions (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub(crate) positions: Vec<String>,
    /// Evaluation date for signal expiry and news recency (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// JSON fixture to load instead of the configured or bundled pool
    #[arg(long)]
    pub(crate) fixture: Option<PathBuf>,
    /// Print the HTTP response body instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation date for signal expiry and news recency (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Shortlist length per club
    #[arg(long, default_value_t = 3)]
    pub(crate) limit: usize,
    /// JSON fixture to load instead of the configured or bundled pool
    #[arg(long)]
    pub(crate) fixture: Option<PathBuf>,
    /// Print the top reasons under each recommendation
    #[arg(long)]
    pub(crate) reasons: bool,
}

type FixtureService = RecommendationService<FixtureStore, FixtureStore>;

fn build_service(fixture: Option<PathBuf>) -> Result<(FixtureService, Arc<FixtureStore>), AppError> {
    let config = AppConfig::load()?;
    let fixture = fixture.or(config.data.fixture_path.clone());
    let store = Arc::new(FixtureStore::load(fixture.as_deref())?);
    let service = RecommendationService::new(
        store.clone(),
        store.clone(),
        config.scoring,
        config.data.fetch_timeout,
    )?;
    Ok((service, store))
}

pub(crate) async fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        club_id,
        limit,
        positions,
        as_of,
        fixture,
        json,
    } = args;

    let (service, _) = build_service(fixture)?;
    let mut request = RecommendationRequest::for_club(club_id);
    request.limit = Some(limit);
    request.as_of = Some(as_of.unwrap_or_else(|| Local::now().date_naive()));
    if !positions.is_empty() {
        request.positions = Some(parse_positions(&positions)?);
    }

    let set = service.recommend(request).await?;
    let response = RecommendationResponse::from(&set);

    if json {
        println!("{}", render_json(&response)?);
    } else {
        render_shortlist(&response, true);
    }
    Ok(())
}

fn render_json(response: &RecommendationResponse) -> Result<String, AppError> {
    serde_json::to_string_pretty(response).map_err(AppError::Render)
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        as_of,
        limit,
        fixture,
        reasons,
    } = args;

    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
    let (service, store) = build_service(fixture)?;

    println!("Club scout recommendation demo");
    println!(
        "- {} players in pool | {} club needs | evaluated as of {}",
        store.players().len(),
        store.club_ids().len(),
        as_of
    );
    let weights = &service.engine().config().weights;
    println!(
        "- weights: fit {:.2} | performance {:.2} | availability {:.2} | news {:.2} | risk penalty {:.2}",
        weights.fit, weights.performance, weights.availability, weights.news_impact, weights.risk_penalty
    );

    for club_id in store.club_ids() {
        let mut request = RecommendationRequest::for_club(club_id.0.clone());
        request.limit = Some(limit);
        request.as_of = Some(as_of);

        let set = service.recommend(request).await?;
        let response = RecommendationResponse::from(&set);
        println!();
        describe_need(&store, club_id);
        render_shortlist(&response, reasons);
    }

    Ok(())
}

fn describe_need(store: &FixtureStore, club_id: &ClubId) {
    let Some(need) = store.need(club_id) else {
        return;
    };
    let positions: Vec<&str> = need.positions.iter().map(|position| position.label()).collect();
    let ages = need
        .age_range
        .map(|range| format!("{}-{}", range.min, range.max))
        .unwrap_or_else(|| "any".to_string());
    let budget = need
        .budget_max_eur
        .map(|value| format!("EUR {:.0}m", value as f64 / 1_000_000.0))
        .unwrap_or_else(|| "open".to_string());
    println!(
        "{} needs {} | ages {} | budget {}",
        need.club_name.as_deref().unwrap_or(&need.club_id.0),
        positions.join("/"),
        ages,
        budget
    );
}

fn render_shortlist(response: &RecommendationResponse, reasons: bool) {
    if response.recommendations.is_empty() {
        println!("  no candidates fit {}", response.club_id);
        return;
    }

    println!(
        "  {:<4} {:<32} {:<11} {:>3} {:>6} {:>6}  {}",
        "rank", "player", "position", "age", "match", "fit", "explanation"
    );
    for view in &response.recommendations {
        println!("  {}", format_row(view));
        if reasons {
            for reason in &view.top_reasons {
                println!("         - {reason}");
            }
        }
    }
}

fn format_row(view: &RecommendationView) -> String {
    format!(
        "{:<4} {:<32} {:<11} {:>3} {:>6.1} {:>6.1}  {}",
        view.rank,
        truncate(&view.player_name, 32),
        view.position.label(),
        view.age,
        view.match_score,
        view.fit_score,
        view.explanation
    )
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut shortened: String = value.chars().take(width.saturating_sub(3)).collect();
    shortened.push_str("...");
    shortened
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_names_are_truncated_to_column_width() {
        let name = "Vinicius Jose Paixao de Oliveira Junior";
        let shortened = truncate(name, 32);

        assert_eq!(shortened.chars().count(), 32);
        assert!(shortened.ends_with("..."));
        assert_eq!(truncate("Rodri", 32), "Rodri");
    }

    #[test]
    fn json_output_round_trips_the_response() {
        let response = RecommendationResponse {
            club_id: ClubId("barca_1".to_string()),
            club_name: Some("FC Barcelona".to_string()),
            as_of: NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid date"),
            count: 0,
            recommendations: Vec::new(),
        };

        let rendered = render_json(&response).expect("response renders");
        let parsed: RecommendationResponse = serde_json::from_str(&rendered).expect("parses");
        assert_eq!(parsed, response);
    }

    #[tokio::test]
    async fn seeded_pool_ranks_every_club() {
        let store = Arc::new(FixtureStore::seeded().expect("seed fixture is valid json"));
        let service = RecommendationService::new(
            store.clone(),
            store.clone(),
            Default::default(),
            std::time::Duration::from_millis(500),
        )
        .expect("default config is valid");
        let as_of = NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid date");

        for club_id in store.club_ids() {
            let mut request = RecommendationRequest::for_club(club_id.0.clone());
            request.as_of = Some(as_of);
            let set = service.recommend(request).await.expect("seeded need ranks");
            let response = RecommendationResponse::from(&set);
            assert!(!response.recommendations.is_empty(), "{club_id} shortlist");
            assert!(format_row(&response.recommendations[0]).starts_with("1 "));
        }
    }
}
