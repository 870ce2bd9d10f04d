use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// ESPN session cookies required for private leagues (and every season from 2018 on)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EspnAuth {
    pub espn_s2: String,
    pub swid: String,
}

impl EspnAuth {
    /// Build auth only when both tokens are present and non-blank
    pub fn from_parts(espn_s2: Option<&str>, swid: Option<&str>) -> Option<Self> {
        match (espn_s2.map(str::trim), swid.map(str::trim)) {
            (Some(s2), Some(swid)) if !s2.is_empty() && !swid.is_empty() => {
                Some(Self { espn_s2: s2.to_string(), swid: swid.to_string() })
            }
            _ => None,
        }
    }

    /// Value for the `Cookie` request header
    pub fn cookie_header(&self) -> String {
        format!("espn_s2={}; SWID={}", self.espn_s2, self.swid)
    }
}

/// One season's worth of league data to request
#[derive(Debug, Clone)]
pub struct SeasonRequest {
    pub league_id: u64,
    pub year: i32,
    pub auth: Option<EspnAuth>,
}

/// Loosely-typed attribute bag.
///
/// Which attributes are present varies by season and API version, so every
/// read goes through a get-with-default accessor instead of a typed field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Value);

impl Attributes {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(Value::Object(map))
    }

    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Integer attribute, `0` when absent. Floats are rounded.
    pub fn int(&self, key: &str) -> i64 {
        self.get(key).map(value_as_i64).unwrap_or(0)
    }

    /// Float attribute, `0.0` when absent
    pub fn float(&self, key: &str) -> f64 {
        self.get(key).and_then(Value::as_f64).unwrap_or(0.0)
    }

    /// Text attribute, empty when absent. Numbers are rendered as text.
    pub fn text(&self, key: &str) -> String {
        match self.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Boolean attribute, `None` when absent or not a boolean
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }
}

fn value_as_i64(value: &Value) -> i64 {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f.round() as i64))
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .unwrap_or(0)
}

/// Upstream team object for one season
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTeam(Attributes);

impl RawTeam {
    pub fn new(value: Value) -> Self {
        Self(Attributes::new(value))
    }

    pub fn attrs(&self) -> &Attributes {
        &self.0
    }

    /// Named stat total from the team's `stats` mapping, `0` when absent
    pub fn stat(&self, name: &str) -> i64 {
        self.0
            .get("stats")
            .and_then(|stats| stats.get(name))
            .map(value_as_i64)
            .unwrap_or(0)
    }

    /// The raw `owners` attribute, whatever shape it has
    pub fn owners(&self) -> Option<&Value> {
        self.0.get("owners")
    }
}

impl std::ops::Deref for RawTeam {
    type Target = Attributes;

    fn deref(&self) -> &Attributes {
        &self.0
    }
}

/// Upstream box-score object for one game in one week
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawGame(Attributes);

impl RawGame {
    pub fn new(value: Value) -> Self {
        Self(Attributes::new(value))
    }

    pub fn home_team(&self) -> Option<String> {
        non_empty(self.0.text("home_team"))
    }

    pub fn away_team(&self) -> Option<String> {
        non_empty(self.0.text("away_team"))
    }

    pub fn home_score(&self) -> f64 {
        self.0.float("home_score")
    }

    pub fn away_score(&self) -> f64 {
        self.0.float("away_score")
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Everything fetched for one season of a league
#[derive(Debug, Clone, Default)]
pub struct LeagueSnapshot {
    pub year: i32,
    pub teams: Vec<RawTeam>,
    /// Latest matchup period reached, `0` when unknown
    pub current_week: u32,
    /// Number of playoff teams, `0` when unknown
    pub playoff_team_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attribute_defaults() {
        let attrs = Attributes::new(json!({ "wins": 10, "points_for": 1500.5, "name": "Sharks" }));
        assert_eq!(attrs.int("wins"), 10);
        assert_eq!(attrs.int("losses"), 0);
        assert_eq!(attrs.float("points_for"), 1500.5);
        assert_eq!(attrs.float("points_against"), 0.0);
        assert_eq!(attrs.text("name"), "Sharks");
        assert_eq!(attrs.text("abbrev"), "");
        assert_eq!(attrs.flag("made_playoffs"), None);
    }

    #[test]
    fn test_null_counts_as_absent() {
        let attrs = Attributes::new(json!({ "wins": null }));
        assert!(!attrs.has("wins"));
        assert_eq!(attrs.int("wins"), 0);
    }

    #[test]
    fn test_non_object_reads_default() {
        let team = RawTeam::new(json!("not a team"));
        assert!(!team.is_object());
        assert_eq!(team.int("wins"), 0);
        assert_eq!(team.stat("passingTouchdowns"), 0);
        assert!(team.owners().is_none());
    }

    #[test]
    fn test_stat_lookup_rounds_floats() {
        let team = RawTeam::new(json!({ "stats": { "rushingYards": 1234.0, "passingTouchdowns": 31 } }));
        assert_eq!(team.stat("rushingYards"), 1234);
        assert_eq!(team.stat("passingTouchdowns"), 31);
        assert_eq!(team.stat("receivingYards"), 0);
    }

    #[test]
    fn test_game_sides() {
        let game = RawGame::new(json!({ "home_team": "Sharks", "home_score": 101.4 }));
        assert_eq!(game.home_team().as_deref(), Some("Sharks"));
        assert_eq!(game.away_team(), None);
        assert_eq!(game.away_score(), 0.0);
    }

    #[test]
    fn test_auth_requires_both_tokens() {
        assert!(EspnAuth::from_parts(Some("s2"), None).is_none());
        assert!(EspnAuth::from_parts(Some(" "), Some("{SWID}")).is_none());
        let auth = EspnAuth::from_parts(Some("s2"), Some("{SWID}")).unwrap();
        assert_eq!(auth.cookie_header(), "espn_s2=s2; SWID={SWID}");
    }
}
