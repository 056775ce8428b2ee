//! Dashboard composition.
//!
//! The composer always charts the first column of each kind. It is a default view, not a
//! query interface: callers cannot pick columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::charts::ChartDescriptor;
use super::grouping::{count_by, row_series, sum_by};
use super::metrics::kpis;
use super::profile::{profile_dataset, ColumnProfile};
use crate::dataset::Dataset;

/// Rows plotted by line charts.
pub const LINE_ROW_LIMIT: usize = 20;

pub const KPI_TITLE: &str = "Key Performance Indicators";

/// Templates offered by the chat flow. All of them currently compose the same dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardTemplate {
    Sales,
    Finance,
    School,
}

impl DashboardTemplate {
    pub const ALL: [DashboardTemplate; 3] = [
        DashboardTemplate::Sales,
        DashboardTemplate::Finance,
        DashboardTemplate::School,
    ];

    pub fn compose(self, dataset: &Dataset) -> Vec<ChartDescriptor> {
        compose_dashboard(dataset)
    }
}

impl fmt::Display for DashboardTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardTemplate::Sales => write!(f, "sales"),
            DashboardTemplate::Finance => write!(f, "finance"),
            DashboardTemplate::School => write!(f, "school"),
        }
    }
}

impl FromStr for DashboardTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sales" => Ok(DashboardTemplate::Sales),
            "finance" => Ok(DashboardTemplate::Finance),
            "school" => Ok(DashboardTemplate::School),
            other => Err(format!("unknown dashboard template: {}", other)),
        }
    }
}

/// Profiles `dataset` and composes its dashboard.
pub fn compose_dashboard(dataset: &Dataset) -> Vec<ChartDescriptor> {
    let profile = profile_dataset(dataset);
    compose(&profile, dataset)
}

/// KPI, bar, pie and line charts, each emitted only when the column kinds it needs exist.
pub fn compose(profile: &ColumnProfile, dataset: &Dataset) -> Vec<ChartDescriptor> {
    let mut charts = Vec::new();
    if dataset.is_empty() {
        return charts;
    }

    let numeric = profile.first_numeric();
    let categorical = profile.first_categorical();

    if let Some(num) = numeric {
        charts.push(ChartDescriptor::Kpi {
            title: KPI_TITLE.to_string(),
            data: kpis(dataset, num),
        });
    }

    if let (Some(num), Some(cat)) = (numeric, categorical) {
        charts.push(ChartDescriptor::Bar {
            title: format!("{} by {}", num, cat),
            x_label: cat.to_string(),
            y_label: num.to_string(),
            data: sum_by(dataset, cat, num),
        });
    }

    if let Some(cat) = categorical {
        charts.push(ChartDescriptor::Pie {
            title: format!("{} Distribution", cat),
            data: count_by(dataset, cat),
        });
    }

    if let Some(num) = numeric {
        let x = categorical.unwrap_or(num);
        charts.push(ChartDescriptor::Line {
            title: format!("{} Trend Over Time", num),
            x_label: x.to_string(),
            y_label: num.to_string(),
            data: row_series(dataset, x, num, LINE_ROW_LIMIT),
        });
    }

    info!(
        rows = dataset.len(),
        charts = charts.len(),
        "Composed dashboard"
    );
    charts
}

/// Bar chart of the second schema column summed per value of the first.
pub fn bar_chart(dataset: &Dataset) -> Option<ChartDescriptor> {
    let columns = dataset.columns();
    let (cat, val) = (*columns.first()?, *columns.get(1)?);
    Some(ChartDescriptor::Bar {
        title: format!("{} by {}", val, cat),
        x_label: cat.to_string(),
        y_label: val.to_string(),
        data: sum_by(dataset, cat, val),
    })
}

/// Distribution of the first schema column.
pub fn pie_chart(dataset: &Dataset) -> Option<ChartDescriptor> {
    let columns = dataset.columns();
    let cat = *columns.first()?;
    Some(ChartDescriptor::Pie {
        title: format!("{} Distribution", cat),
        data: count_by(dataset, cat),
    })
}

/// Second schema column per row over the first [`LINE_ROW_LIMIT`] rows.
pub fn line_chart(dataset: &Dataset) -> Option<ChartDescriptor> {
    let columns = dataset.columns();
    let (x, y) = (*columns.first()?, *columns.get(1)?);
    Some(ChartDescriptor::Line {
        title: format!("{} Trend Over Time", y),
        x_label: x.to_string(),
        y_label: y.to_string(),
        data: row_series(dataset, x, y, LINE_ROW_LIMIT),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::charts::{Kpi, SeriesPoint};
    use crate::dataset::{CellValue, Record};

    fn sales() -> Dataset {
        [("East", 5.0), ("West", 3.0), ("East", 2.0)]
            .iter()
            .map(|(region, amount)| {
                let mut r = Record::new();
                r.insert("region".to_string(), CellValue::from(*region));
                r.insert("amount".to_string(), CellValue::Number(*amount));
                r
            })
            .collect()
    }

    fn kinds(charts: &[ChartDescriptor]) -> Vec<&'static str> {
        charts.iter().map(ChartDescriptor::kind).collect()
    }

    #[test]
    fn test_full_dashboard_order() {
        let charts = compose_dashboard(&sales());
        assert_eq!(kinds(&charts), vec!["kpi", "bar", "pie", "line"]);

        match &charts[0] {
            ChartDescriptor::Kpi { title, data } => {
                assert_eq!(title, KPI_TITLE);
                assert_eq!(data[0], Kpi::new("Total amount", "10"));
                assert_eq!(data[3], Kpi::new("Records", "3"));
            }
            other => panic!("expected kpi, got {:?}", other),
        }
        match &charts[1] {
            ChartDescriptor::Bar { title, x_label, y_label, data } => {
                assert_eq!(title, "amount by region");
                assert_eq!(x_label, "region");
                assert_eq!(y_label, "amount");
                assert_eq!(
                    data,
                    &vec![SeriesPoint::new("East", 7.0), SeriesPoint::new("West", 3.0)]
                );
            }
            other => panic!("expected bar, got {:?}", other),
        }
        assert_eq!(charts[2].title(), "region Distribution");
        match &charts[3] {
            ChartDescriptor::Line { x_label, data, .. } => {
                assert_eq!(x_label, "region");
                assert_eq!(data.len(), 3);
                assert_eq!(data[0], SeriesPoint::new("East", 5.0));
            }
            other => panic!("expected line, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_only_dashboard() {
        let ds: Dataset = (1..=3)
            .map(|i| {
                let mut r = Record::new();
                r.insert("score".to_string(), CellValue::Number(i as f64));
                r
            })
            .collect();
        let charts = compose_dashboard(&ds);
        assert_eq!(kinds(&charts), vec!["kpi", "line"]);
        match &charts[1] {
            ChartDescriptor::Line { x_label, data, .. } => {
                assert_eq!(x_label, "score");
                assert_eq!(data[2], SeriesPoint::new("3", 3.0));
            }
            other => panic!("expected line, got {:?}", other),
        }
    }

    #[test]
    fn test_categorical_only_dashboard() {
        let mut r = Record::new();
        r.insert("city".to_string(), CellValue::from("Oslo"));
        let charts = compose_dashboard(&Dataset::new(vec![r]));
        assert_eq!(kinds(&charts), vec!["pie"]);
    }

    #[test]
    fn test_date_only_dataset_has_no_charts() {
        let mut r = Record::new();
        r.insert("ordered".to_string(), CellValue::from("2024-05-01"));
        assert!(compose_dashboard(&Dataset::new(vec![r])).is_empty());
        assert!(compose_dashboard(&Dataset::default()).is_empty());
    }

    #[test]
    fn test_pipeline_is_repeatable() {
        let ds = sales();
        let before = ds.clone();
        let first = compose_dashboard(&ds);
        let second = compose_dashboard(&ds);
        assert_eq!(first, second);
        assert_eq!(ds, before);
        assert_eq!(DashboardTemplate::Finance.compose(&ds), first);
    }

    #[test]
    fn test_single_charts_use_schema_order() {
        let ds = sales();
        assert_eq!(bar_chart(&ds).unwrap().title(), "amount by region");
        assert_eq!(pie_chart(&ds).unwrap().kind(), "pie");
        assert_eq!(line_chart(&ds).unwrap().series().unwrap().len(), 3);

        let mut r = Record::new();
        r.insert("only".to_string(), CellValue::from("x"));
        let narrow = Dataset::new(vec![r]);
        assert!(bar_chart(&narrow).is_none());
        assert!(line_chart(&narrow).is_none());
        assert!(pie_chart(&narrow).is_some());
        assert!(pie_chart(&Dataset::default()).is_none());
    }

    #[test]
    fn test_template_parsing() {
        assert_eq!("Sales".parse::<DashboardTemplate>(), Ok(DashboardTemplate::Sales));
        assert!("retail".parse::<DashboardTemplate>().is_err());
    }
}
