use geofeat_geo::ProximityPlan;
use serde::Serialize;
use tabled::Tabled;

/// Output for near command
#[derive(Debug, Serialize)]
pub struct NearOutput<'a> {
    pub plan: &'a ProximityPlan,
    /// Rendered bounding-box predicate
    pub predicate: String,
    /// Rendered distance expression
    pub distance_sql: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<CandidateMatch>>,
}

/// One candidate feature that passed the plan
#[derive(Debug, Serialize, Tabled)]
pub struct CandidateMatch {
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[tabled(rename = "Feature")]
    pub feature_index: usize,
    #[tabled(rename = "Id")]
    pub id: String,
    #[tabled(rename = "Distance (km)", display_with = "format_km")]
    pub distance_km: f64,
}

fn format_km(km: &f64) -> String {
    format!("{:.3}", km)
}

/// One row of the config command
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigEntry {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}
