//! Snapshot schema migrations.
//!
//! Version 0 is every file written before `schemaVersion` existed. Those files
//! differ from the canonical shape in a handful of ways:
//!
//! - id sets (`teamIds`, `playerIds`, `matchIds`) are objects of `{id: true}`
//! - the user's hash lives under `password` rather than `passwordHash`
//! - players carry an unused `matchIds` set
//! - game entries may lack `isVarsity`, and `Wood`/`Score` may be floats or strings
//! - top-level collections may be missing or `null`
//!
//! Upgrades operate on raw JSON so typed deserialization only ever sees the
//! current shape.

use serde_json::{Map, Value};

use crate::error::LedgerError;
use crate::model::{Snapshot, GAME_SLOTS};

/// The schema version this build reads and writes.
pub const SCHEMA_VERSION: u32 = 1;

const COLLECTIONS: [&str; 4] = ["users", "teams", "players", "matches"];

/// Decode a snapshot of any supported version into the canonical shape.
pub fn upgrade(mut value: Value) -> Result<Snapshot, LedgerError> {
    let Some(root) = value.as_object_mut() else {
        return Err(LedgerError::Malformed(
            "snapshot root is not an object".to_string(),
        ));
    };

    let version = root
        .get("schemaVersion")
        .and_then(Value::as_u64)
        .unwrap_or(0);

    if version > u64::from(SCHEMA_VERSION) {
        return Err(LedgerError::UnsupportedVersion {
            found: version,
            supported: SCHEMA_VERSION,
        });
    }

    if version == 0 {
        tracing::info!("Upgrading unversioned snapshot to schema v{}", SCHEMA_VERSION);
        v0_to_v1(root);
    }

    Ok(serde_json::from_value(value)?)
}

fn v0_to_v1(root: &mut Map<String, Value>) {
    for name in COLLECTIONS {
        let entry = root.entry(name).or_insert(Value::Null);
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
    }

    for user in entities_mut(root, "users") {
        if !user.contains_key("passwordHash") {
            let hash = user.remove("password").unwrap_or(Value::String(String::new()));
            user.insert("passwordHash".to_string(), hash);
        }
        if !user.get("displayName").is_some_and(Value::is_string) {
            let fallback = user.get("username").cloned().unwrap_or_default();
            user.insert("displayName".to_string(), fallback);
        }
        normalize_id_set(user, "teamIds");
    }

    for team in entities_mut(root, "teams") {
        normalize_id_set(team, "playerIds");
        normalize_id_set(team, "matchIds");
        let awards = match team.remove("awardsList") {
            Some(Value::Array(items)) => items,
            Some(Value::Object(map)) => map.into_iter().map(|(k, _)| Value::String(k)).collect(),
            _ => Vec::new(),
        };
        team.insert("awardsList".to_string(), Value::Array(awards));
    }

    for player in entities_mut(root, "players") {
        player.remove("matchIds");
        let year = player
            .get("graduationYear")
            .and_then(number_of)
            .map(|y| Value::from(y.trunc() as i64))
            .unwrap_or(Value::Null);
        player.insert("graduationYear".to_string(), year);
    }

    for game_match in entities_mut(root, "matches") {
        let date = game_match.get("date").and_then(number_of).unwrap_or(0.0);
        game_match.insert("date".to_string(), Value::from(date.trunc() as i64));
        for key in ["opposingTeamName", "comment"] {
            if !game_match.get(key).is_some_and(Value::is_string) {
                game_match.insert(key.to_string(), Value::String(String::new()));
            }
        }

        let records = match game_match.remove("perPlayerData") {
            Some(Value::Object(records)) => records,
            _ => Map::new(),
        };
        let records = records
            .into_iter()
            .map(|(player_id, record)| (player_id, upgrade_record(record)))
            .collect();
        game_match.insert("perPlayerData".to_string(), Value::Object(records));
    }

    root.insert("schemaVersion".to_string(), Value::from(SCHEMA_VERSION));
}

/// Every entity object in a top-level collection.
fn entities_mut<'a>(
    root: &'a mut Map<String, Value>,
    collection: &str,
) -> impl Iterator<Item = &'a mut Map<String, Value>> {
    root.get_mut(collection)
        .and_then(Value::as_object_mut)
        .into_iter()
        .flat_map(|entities| entities.values_mut())
        .filter_map(Value::as_object_mut)
}

/// `{id: true}` objects become arrays of ids; arrays pass through.
fn normalize_id_set(entity: &mut Map<String, Value>, key: &str) {
    let ids = match entity.remove(key) {
        Some(Value::Object(map)) => map
            .into_iter()
            .filter(|(_, member)| !matches!(member, Value::Bool(false) | Value::Null))
            .map(|(id, _)| Value::String(id))
            .collect(),
        Some(Value::Array(items)) => items.into_iter().filter(Value::is_string).collect(),
        _ => Vec::new(),
    };
    entity.insert(key.to_string(), Value::Array(ids));
}

fn upgrade_record(record: Value) -> Value {
    let games = match record {
        Value::Object(mut map) => match map.remove("games") {
            Some(Value::Object(games)) => games,
            _ => Map::new(),
        },
        _ => Map::new(),
    };

    let mut upgraded = Map::new();
    for slot in GAME_SLOTS {
        let Some(Value::Object(entry)) = games.get(&slot.to_string()) else {
            continue;
        };
        let stat = |name: &str| {
            entry
                .get(name)
                .and_then(number_of)
                .map(|n| n.trunc() as i64)
                .unwrap_or(0)
        };
        let is_varsity = entry
            .get("isVarsity")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        upgraded.insert(
            slot.to_string(),
            serde_json::json!({
                "Wood": stat("Wood"),
                "Score": stat("Score"),
                "isVarsity": is_varsity,
            }),
        );
    }

    serde_json::json!({ "games": upgraded })
}

/// Numeric value of a JSON number or numeric string.
fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_current_version_passes_through() {
        let snapshot = Snapshot::default();
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(upgrade(value).unwrap(), snapshot);
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let err = upgrade(json!({"schemaVersion": 99})).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::UnsupportedVersion { found: 99, .. }
        ));
    }

    #[test]
    fn test_non_object_root_is_malformed() {
        assert!(matches!(
            upgrade(json!([1, 2, 3])),
            Err(LedgerError::Malformed(_))
        ));
    }

    #[test]
    fn test_empty_legacy_document() {
        let snapshot = upgrade(json!({"users": null})).unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_legacy_graph_upgrades() {
        let legacy = json!({
            "users": {
                "u1": {
                    "userId": "u1",
                    "email": "coach@example.com",
                    "password": "$2b$10$abcdefghijklmnopqrstuv",
                    "username": "coach",
                    "displayName": "Coach",
                    "teamIds": {"t1": true}
                }
            },
            "teams": {
                "t1": {
                    "teamId": "t1",
                    "ownerId": "u1",
                    "displayName": "Varsity",
                    "playerIds": {"p1": true, "p2": true},
                    "awardsList": [],
                    "matchIds": {"m1": true}
                }
            },
            "players": {
                "p1": {"playerId": "p1", "displayName": "Pat", "teamId": "t1", "matchIds": {}, "graduationYear": 2026},
                "p2": {"playerId": "p2", "displayName": "Sam", "teamId": "t1", "matchIds": {}, "graduationYear": null}
            },
            "matches": {
                "m1": {
                    "matchId": "m1",
                    "teamId": "t1",
                    "date": 1700000000000.0,
                    "opposingTeamName": "Rivals",
                    "comment": "",
                    "perPlayerData": {
                        "p1": {"games": {
                            "1": {"Wood": 5.0, "Score": "150", "isVarsity": true},
                            "2": {"Wood": 0, "Score": 0}
                        }}
                    }
                }
            }
        });

        let snapshot = upgrade(legacy).unwrap();

        let user = &snapshot.users["u1"];
        assert_eq!(user.password_hash, "$2b$10$abcdefghijklmnopqrstuv");
        assert!(user.team_ids.contains("t1"));

        let team = &snapshot.teams["t1"];
        assert_eq!(team.player_ids.iter().collect::<Vec<_>>(), vec!["p1", "p2"]);
        assert!(team.match_ids.contains("m1"));

        assert_eq!(snapshot.players["p1"].graduation_year, Some(2026));
        assert_eq!(snapshot.players["p2"].graduation_year, None);

        let game_match = &snapshot.matches["m1"];
        assert_eq!(game_match.date, 1_700_000_000_000);
        let record = &game_match.per_player_data["p1"];
        let first = record.game(1);
        assert_eq!((first.wood, first.score, first.is_varsity), (5, 150, true));
        assert!(!record.game(2).is_varsity);
        // Slot 3 was never written; it stays absent until filled on read
        assert!(!record.games.contains_key(&3));
    }

    #[test]
    fn test_missing_display_name_falls_back_to_username() {
        let snapshot = upgrade(json!({
            "users": {"u1": {
                "userId": "u1", "email": "a@b.co", "password": "h", "username": "ann", "teamIds": {}
            }}
        }))
        .unwrap();
        assert_eq!(snapshot.users["u1"].display_name, "ann");
    }
}
