// Ensaio (route) domain models as served by the backend
use super::error::ValidationError;
use super::kpi::Kpis;
use super::map::LatLng;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type RouteId = i64;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteSummary {
    pub id: RouteId,
    pub name: String,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl RouteSummary {
    pub fn created_on(&self) -> Option<NaiveDate> {
        parse_date(self.created_at.as_deref()?.trim())
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(time) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(time.date_naive());
    }
    // SQLite writes "2024-05-01 12:34:56.123456"
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|time| time.date())
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

/// X-axis label: the backend sends sample indices, but timestamps are accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Index(i64),
    Text(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Index(index) => write!(f, "{}", index),
            Label::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteDetails {
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub route_info: Option<String>,
}

impl RouteDetails {
    pub fn is_empty(&self) -> bool {
        self.supplier.is_none() && self.product.is_none() && self.route_info.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteSeries {
    #[serde(rename = "coordenadas", default)]
    pub coordinates: Vec<LatLng>,
    #[serde(rename = "temperatura", default)]
    pub temperature: Vec<f64>,
    #[serde(rename = "vibracao", default)]
    pub vibration: Vec<f64>,
    #[serde(rename = "umidade", default)]
    pub humidity: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteData {
    pub labels: Vec<Label>,
    pub datasets: RouteSeries,
    #[serde(default)]
    pub kpis: Kpis,
    #[serde(default)]
    pub details: Option<RouteDetails>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComparisonDataset {
    pub name: String,
    #[serde(default)]
    pub kpis: Kpis,
    #[serde(rename = "temperatura", default)]
    pub temperature: Vec<f64>,
    #[serde(rename = "vibracao", default)]
    pub vibration: Vec<f64>,
    #[serde(rename = "umidade", default)]
    pub humidity: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComparisonData {
    /// `null` when none of the requested routes could be read
    #[serde(default)]
    pub labels: Option<Vec<Label>>,
    #[serde(default)]
    pub all_coords: Vec<Vec<LatLng>>,
    #[serde(default)]
    pub datasets: Vec<ComparisonDataset>,
}

/// Upload form for a new ensaio.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewRoute {
    pub name: String,
    pub supplier: String,
    pub product: String,
    pub route_info: String,
    pub file_name: String,
    pub file: Vec<u8>,
}

impl NewRoute {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("name", &self.name),
            ("supplier", &self.supplier),
            ("product", &self.product),
            ("route_info", &self.route_info),
            ("file", &self.file_name),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ValidationError::MissingField(*field));
        }
        if self.file.is_empty() {
            return Err(ValidationError::MissingField("file"));
        }
        Ok(())
    }
}
