// KPI values and the side-by-side comparison table
use super::route::ComparisonDataset;
use serde::{Deserialize, Serialize};

const MISSING: &str = "--";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    /// Kilometres travelled
    #[serde(default)]
    pub distance: Option<f64>,
    /// Samples above the severe-impact threshold
    #[serde(default)]
    pub impacts: Option<u64>,
    #[serde(default)]
    pub max_vibration: Option<f64>,
}

impl Kpis {
    pub fn distance_text(&self) -> String {
        self.distance.map_or_else(|| MISSING.to_string(), |v| v.to_string())
    }

    pub fn impacts_text(&self) -> String {
        self.impacts.map_or_else(|| MISSING.to_string(), |v| v.to_string())
    }

    pub fn max_vibration_text(&self) -> String {
        self.max_vibration.map_or_else(|| MISSING.to_string(), |v| v.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiRow {
    pub indicator: String,
    pub values: Vec<String>,
}

/// One column per route, one row per indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiTable {
    pub columns: Vec<String>,
    pub rows: Vec<KpiRow>,
}

impl KpiTable {
    pub fn new<'a>(routes: impl IntoIterator<Item = (&'a str, &'a Kpis)>) -> Self {
        let (columns, kpis): (Vec<String>, Vec<&Kpis>) = routes
            .into_iter()
            .map(|(name, kpis)| (name.to_string(), kpis))
            .unzip();

        let row = |indicator: &str, value: fn(&Kpis) -> String| KpiRow {
            indicator: indicator.to_string(),
            values: kpis.iter().map(|k| value(k)).collect(),
        };

        Self {
            rows: vec![
                row("Distância (km)", Kpis::distance_text),
                row("Impactos Severos", Kpis::impacts_text),
                row("Vibração Máxima (m/s²)", Kpis::max_vibration_text),
            ],
            columns,
        }
    }

    pub fn for_comparison(datasets: &[ComparisonDataset]) -> Self {
        Self::new(datasets.iter().map(|d| (d.name.as_str(), &d.kpis)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_kpis_display_dashes() {
        let kpis = Kpis::default();
        assert_eq!(kpis.distance_text(), "--");
        assert_eq!(kpis.impacts_text(), "--");
        assert_eq!(kpis.max_vibration_text(), "--");
    }

    #[test]
    fn test_table_has_one_column_per_route() {
        let a = Kpis {
            distance: Some(12.5),
            impacts: Some(3),
            max_vibration: Some(9.87),
        };
        let b = Kpis {
            distance: Some(4.0),
            impacts: Some(0),
            max_vibration: None,
        };
        let table = KpiTable::new([("A", &a), ("B", &b)]);

        assert_eq!(table.columns, vec!["A", "B"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].values, vec!["12.5", "4"]);
        assert_eq!(table.rows[1].values, vec!["3", "0"]);
        assert_eq!(table.rows[2].values, vec!["9.87", "--"]);
    }
}
