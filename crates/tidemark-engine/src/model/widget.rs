use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use super::Item;
use crate::error::IdentifiableError;

#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Trend(TrendWidget),
}

/// Likelihood-over-time visualization decoded from an embedded JSON payload.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendWidget {
    #[serde(default)]
    pub risk_scenario_name: Option<String>,
    #[serde(default)]
    pub trend_data: Option<Vec<TrendPoint>>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    #[serde(default)]
    pub event_likelihood: Option<f64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// The stream may truncate or mangle timestamps mid-flight; an unreadable
/// one is absent, not a decode failure.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

/// A run of widgets rendered together; per-child errors collect here before
/// being lifted onto the document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContainerWidget {
    pub widgets: Vec<Item<Widget>>,
    pub errors: Vec<IdentifiableError>,
}
