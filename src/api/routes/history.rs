use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::assets::CardIcons;
use crate::fetch::PlayerPage;
use crate::models::{MatchCard, PlayerProfile, PlayerStats, RiotId};
use crate::view_state::is_day_expanded;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Day to expand, `YYYY-MM-DD`.
    pub expanded: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: PlayerProfile,
    pub tier_label: String,
    pub icon_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: PlayerStats,
    pub winrate_label: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardResponse {
    #[serde(flatten)]
    pub card: MatchCard,
    pub icons: CardIcons,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayResponse {
    pub date: NaiveDate,
    pub match_count: usize,
    pub expanded: bool,
    pub matches: Vec<CardResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub player: RiotId,
    pub profile: ProfileResponse,
    pub stats: StatsResponse,
    pub expanded: Option<NaiveDate>,
    pub total_matches: usize,
    pub days: Vec<DayResponse>,
}

fn parse_expanded(raw: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("Invalid expanded day: {:?}", s))),
    }
}

pub async fn player_history(
    State(state): State<AppState>,
    Path((game_name, tag_line)): Path<(String, String)>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let riot_id = RiotId::new(&game_name, &tag_line)?;
    let expanded = parse_expanded(query.expanded.as_deref())?;

    let page = PlayerPage::load(state.source.as_ref(), &riot_id).await?;
    let view = state.projector.project(&page.history, &riot_id.game_name);
    let total_matches = view.total_matches();

    let days = view
        .days
        .into_iter()
        .map(|day| DayResponse {
            expanded: is_day_expanded(expanded, day.date),
            date: day.date,
            match_count: day.match_count,
            matches: day
                .matches
                .into_iter()
                .map(|card| CardResponse {
                    icons: state.assets.card_icons(&card.view),
                    card,
                })
                .collect(),
        })
        .collect();

    let PlayerPage { profile, stats, .. } = page;
    Ok(Json(HistoryResponse {
        player: riot_id,
        profile: ProfileResponse {
            tier_label: profile.tier().to_string(),
            icon_url: state.assets.profile_icon(profile.summoner_icon_id),
            profile,
        },
        stats: StatsResponse {
            winrate_label: stats.winrate_label(),
            stats,
        },
        expanded,
        total_matches,
        days,
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::assets::AssetResolver;
    use crate::fetch::tests::MockSource;
    use crate::models::{MatchHistory, PlayerProfile};
    use crate::projector::{HistoryProjector, ViewerZone};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn state(source: MockSource) -> AppState {
        AppState::new(
            Arc::new(source),
            HistoryProjector::new(ViewerZone::utc()),
            AssetResolver::default(),
        )
    }

    fn melon_source() -> MockSource {
        MockSource {
            profile: Some(PlayerProfile {
                summoner_icon_id: Some(4568),
                summoner_level: Some(212),
                ..PlayerProfile::default()
            }),
            stats: None,
            history: Some(MatchHistory::from_json(json!({
                "NA1_1": {
                    "gameCreation": "2024-05-01 09:15:00",
                    "gameDuration": "28:12",
                    "participants": [
                        {"player": "melon", "teamId": 100, "champion": "Ahri", "outcome": 1,
                         "kda": {"kills": 5, "deaths": 2, "assists": 3, "kda": 4.0}},
                        {"player": "rival", "teamId": 300, "champion": "Zed"}
                    ]
                },
                "NA1_2": {
                    "gameCreation": "2024-05-03 12:00:00",
                    "participants": []
                }
            }))),
        }
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(state(MockSource::default()));
        let (status, body) = get_json(app, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_history_projects_days() {
        let app = build_router(state(melon_source()));
        let (status, body) = get_json(
            app,
            "/api/players/melon/NA1/history?expanded=2024-05-01",
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(body["player"], json!({"gameName": "melon", "tagLine": "NA1"}));
        assert_eq!(body["profile"]["tierLabel"], "Unranked");
        assert_eq!(body["profile"]["iconUrl"], "/assets/profileicon/4568.png");
        assert_eq!(body["stats"]["winrateLabel"], "None");
        assert_eq!(body["expanded"], "2024-05-01");
        assert_eq!(body["totalMatches"], 2);

        let days = body["days"].as_array().unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0]["date"], "2024-05-03");
        assert_eq!(days[0]["expanded"], false);
        assert_eq!(days[0]["matches"][0]["playerFound"], false);
        assert_eq!(days[0]["matches"][0]["kdaLabel"], "N/A");

        assert_eq!(days[1]["expanded"], true);
        let card = &days[1]["matches"][0];
        assert_eq!(card["id"], "NA1_1");
        assert_eq!(card["outcomeText"], "Victory");
        assert_eq!(card["durationText"], "28min 12sec");
        assert_eq!(card["kdaLabel"], "4 KDA");
        assert_eq!(card["unassigned"], 1);
        assert_eq!(card["team1"][0]["displayName"], "melon");
        assert_eq!(card["icons"]["champion"], "/assets/champion/tiles/Ahri_0.jpg");
    }

    #[tokio::test]
    async fn test_unknown_player_is_404() {
        let app = build_router(state(MockSource::default()));
        let (status, body) = get_json(app, "/api/players/ghost/NA1/history").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_blank_riot_id_is_400() {
        let app = build_router(state(melon_source()));
        let (status, body) = get_json(app, "/api/players/melon/%20/history").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_bad_expanded_day_is_400() {
        let app = build_router(state(melon_source()));
        let (status, _) = get_json(app, "/api/players/melon/NA1/history?expanded=yesterday").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
