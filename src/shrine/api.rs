//! Shrine API parsing
//!
//! Detects and parses the two observed upstream shapes:
//!
//! * wrapper: `{status, error, data: {start, end, week, perks: [...]}}` with
//!   ISO-ish date strings and fully-described perks;
//! * flat: `{id, perks: [{id, bloodpoints, shards}], start, end}` with
//!   Unix-second timestamps and identifier-only perks.
//!
//! Anything else is [`FogError::InvalidShape`]; the caller keeps the prior
//! cached rotation.

use crate::client::fetch_json;
use crate::shrine::perks::resolve_perk;
use crate::shrine::{PerkRole, ShrinePerk, ShrineSnapshot, UsageTier};
use crate::FogError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// Upstream ids arrive as either numbers or strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum UpstreamId {
    Num(i64),
    Text(String),
}

impl UpstreamId {
    fn into_string(self) -> String {
        match self {
            UpstreamId::Num(n) => n.to_string(),
            UpstreamId::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WrappedResponse {
    status: String,
    #[serde(default)]
    #[allow(dead_code)]
    error: Option<String>,
    #[serde(default)]
    data: Option<WrappedData>,
}

#[derive(Debug, Deserialize)]
struct WrappedData {
    start: String,
    end: String,
    week: i64,
    perks: Vec<WrappedPerk>,
}

#[derive(Debug, Deserialize)]
struct WrappedPerk {
    id: UpstreamId,
    bloodpoints: i64,
    shards: i64,
    name: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    character: Option<String>,
    #[serde(default)]
    usage_tier: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FlatResponse {
    id: UpstreamId,
    perks: Vec<FlatPerk>,
    start: i64,
    end: i64,
}

#[derive(Debug, Deserialize)]
struct FlatPerk {
    id: String,
    bloodpoints: i64,
    shards: i64,
}

/// Fetches the shrine API and parses whichever shape it returns
pub async fn fetch_shrine(client: &Client, url: &str) -> Result<ShrineSnapshot, FogError> {
    let body: Value = fetch_json(client, url).await?;
    let snapshot = parse_shrine(body, url)?;

    tracing::info!(
        rotation = %snapshot.id,
        perks = snapshot.perks.len(),
        "fetched shrine rotation"
    );

    Ok(snapshot)
}

/// Parses a shrine API response body, detecting the upstream variant
pub fn parse_shrine(body: Value, url: &str) -> Result<ShrineSnapshot, FogError> {
    if body.get("status").is_some() || body.get("data").is_some() {
        return parse_wrapped(body, url);
    }

    if body.get("perks").is_some() {
        return parse_flat(body, url);
    }

    Err(invalid(url, "neither wrapper nor flat shrine shape"))
}

fn parse_wrapped(body: Value, url: &str) -> Result<ShrineSnapshot, FogError> {
    let response: WrappedResponse =
        serde_json::from_value(body).map_err(|e| invalid(url, &e.to_string()))?;

    if response.status != "success" {
        return Err(invalid(
            url,
            &format!("status '{}' is not success", response.status),
        ));
    }

    let data = response
        .data
        .ok_or_else(|| invalid(url, "missing data container"))?;

    let start = parse_upstream_datetime(&data.start)
        .ok_or_else(|| invalid(url, &format!("unparseable start date '{}'", data.start)))?;
    let end = parse_upstream_datetime(&data.end)
        .ok_or_else(|| invalid(url, &format!("unparseable end date '{}'", data.end)))?;

    let perks = data.perks.into_iter().map(wrapped_perk).collect();

    Ok(ShrineSnapshot {
        id: data.week.to_string(),
        week: Some(data.week),
        perks,
        start,
        end,
        fetched_at: Utc::now(),
    })
}

fn wrapped_perk(raw: WrappedPerk) -> ShrinePerk {
    // Killer characters are rendered with a definite article upstream.
    let role = match &raw.character {
        Some(character) if character.starts_with("The ") => PerkRole::Killer,
        Some(_) => PerkRole::Survivor,
        None => crate::shrine::perks::guess_role(&raw.name),
    };

    ShrinePerk {
        id: raw.id.into_string(),
        name: raw.name,
        bloodpoints: raw.bloodpoints,
        shards: raw.shards,
        image: raw.image,
        character: raw.character,
        role,
        usage_tier: raw.usage_tier.as_deref().and_then(parse_usage_tier),
    }
}

fn parse_flat(body: Value, url: &str) -> Result<ShrineSnapshot, FogError> {
    let response: FlatResponse =
        serde_json::from_value(body).map_err(|e| invalid(url, &e.to_string()))?;

    let start = DateTime::from_timestamp(response.start, 0)
        .ok_or_else(|| invalid(url, "start timestamp out of range"))?;
    let end = DateTime::from_timestamp(response.end, 0)
        .ok_or_else(|| invalid(url, "end timestamp out of range"))?;

    let perks = response
        .perks
        .into_iter()
        .map(|raw| {
            let resolved = resolve_perk(&raw.id);
            ShrinePerk {
                id: raw.id,
                name: resolved.name,
                bloodpoints: raw.bloodpoints,
                shards: raw.shards,
                image: None,
                character: resolved.character,
                role: resolved.role,
                usage_tier: None,
            }
        })
        .collect();

    Ok(ShrineSnapshot {
        id: response.id.into_string(),
        week: None,
        perks,
        start,
        end,
        fetched_at: Utc::now(),
    })
}

fn parse_usage_tier(raw: &str) -> Option<UsageTier> {
    match raw {
        "high" => Some(UsageTier::High),
        "low" => Some(UsageTier::Low),
        _ => None,
    }
}

/// Parses the date formats the wrapper variant has been seen emitting
fn parse_upstream_datetime(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return parsed.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    None
}

fn invalid(url: &str, message: &str) -> FogError {
    FogError::InvalidShape {
        url: url.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const URL: &str = "https://api.example.com/v1/shrine";

    fn wrapped_body() -> Value {
        json!({
            "status": "success",
            "error": null,
            "data": {
                "start": "2025-08-19T00:00:00Z",
                "end": "2025-08-26T00:00:00Z",
                "week": 412,
                "perks": [
                    {
                        "id": 101,
                        "bloodpoints": 150000,
                        "shards": 2000,
                        "name": "Hex: Ruin",
                        "image": "https://cdn.example.com/ruin.png",
                        "character": "The Hag",
                        "usage_tier": "high"
                    },
                    {
                        "id": 102,
                        "bloodpoints": 150000,
                        "shards": 2000,
                        "name": "Dead Hard",
                        "image": "https://cdn.example.com/deadhard.png",
                        "character": "David King",
                        "usage_tier": "low"
                    }
                ]
            }
        })
    }

    #[test]
    fn test_parse_wrapped_variant() {
        let snapshot = parse_shrine(wrapped_body(), URL).unwrap();

        assert_eq!(snapshot.id, "412");
        assert_eq!(snapshot.week, Some(412));
        assert_eq!(snapshot.perks.len(), 2);

        let ruin = &snapshot.perks[0];
        assert_eq!(ruin.id, "101");
        assert_eq!(ruin.role, PerkRole::Killer);
        assert_eq!(ruin.usage_tier, Some(UsageTier::High));

        let dead_hard = &snapshot.perks[1];
        assert_eq!(dead_hard.role, PerkRole::Survivor);
    }

    #[test]
    fn test_parse_flat_variant() {
        let body = json!({
            "id": "2025-34",
            "start": 1755561600,
            "end": 1756166400,
            "perks": [
                {"id": "Hex_Ruin", "bloodpoints": 150000, "shards": 2000},
                {"id": "spineChill", "bloodpoints": 150000, "shards": 2000}
            ]
        });

        let snapshot = parse_shrine(body, URL).unwrap();

        assert_eq!(snapshot.id, "2025-34");
        assert_eq!(snapshot.week, None);

        let ruin = &snapshot.perks[0];
        assert_eq!(ruin.name, "Hex: Ruin");
        assert_eq!(ruin.character.as_deref(), Some("The Hag"));
        assert_eq!(ruin.role, PerkRole::Killer);
        assert_eq!(ruin.image, None);

        let spine_chill = &snapshot.perks[1];
        assert_eq!(spine_chill.name, "Spine Chill");
        assert_eq!(spine_chill.role, PerkRole::Survivor);
    }

    #[test]
    fn test_wrapped_failure_status_is_invalid_shape() {
        let body = json!({"status": "error", "error": "down", "data": null});
        let result = parse_shrine(body, URL);
        assert!(matches!(result, Err(FogError::InvalidShape { .. })));
    }

    #[test]
    fn test_unrecognized_shape_is_invalid() {
        let body = json!({"unexpected": true});
        assert!(matches!(
            parse_shrine(body, URL),
            Err(FogError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_unknown_usage_tier_dropped() {
        let mut body = wrapped_body();
        body["data"]["perks"][0]["usage_tier"] = json!("mid");
        let snapshot = parse_shrine(body, URL).unwrap();
        assert_eq!(snapshot.perks[0].usage_tier, None);
    }

    #[test]
    fn test_datetime_formats() {
        assert!(parse_upstream_datetime("2025-08-19T00:00:00Z").is_some());
        assert!(parse_upstream_datetime("2025-08-19T00:00:00").is_some());
        assert!(parse_upstream_datetime("2025-08-19 00:00:00").is_some());
        assert!(parse_upstream_datetime("2025-08-19").is_some());
        assert!(parse_upstream_datetime("next tuesday").is_none());
    }
}
