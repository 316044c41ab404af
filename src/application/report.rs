// Report composition - what goes into the exported PDF
use crate::domain::chart::Dataset;
use crate::domain::kpi::KpiTable;
use chrono::NaiveDateTime;

pub const COMPARISON_REPORT_NAME: &str = "Comparacao de Ensaios";

const Y_GRACE: f64 = 0.05;

/// One chart block of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFigure {
    pub title: &'static str,
    pub sample_count: usize,
    pub datasets: Vec<Dataset>,
}

impl ChartFigure {
    /// Value range over every dataset, widened by 5% on both ends.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        let mut values = self
            .datasets
            .iter()
            .flat_map(|d| d.data.iter().copied())
            .filter(|v| v.is_finite());
        let first = values.next()?;
        let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

        let span = max - min;
        let grace = if span > 0.0 {
            span * Y_GRACE
        } else {
            max.abs().max(1.0) * Y_GRACE
        };
        Some((min - grace, max + grace))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportContent {
    pub name: String,
    pub generated_at: NaiveDateTime,
    pub kpi_table: KpiTable,
    pub charts: Vec<ChartFigure>,
}

impl ReportContent {
    pub fn title(&self) -> String {
        format!("Relatório de Análise: {}", self.name)
    }

    pub fn generated_line(&self) -> String {
        format!("Gerado em: {}", self.generated_at.format("%d/%m/%Y %H:%M:%S"))
    }

    pub fn file_name(&self) -> String {
        let name: Vec<&str> = self.name.split_whitespace().collect();
        format!("relatorio_{}.pdf", name.join("_"))
    }
}
