//! Chart model handed to the rendering layer.

use serde::{Deserialize, Serialize};

/// A labelled, pre-formatted metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub label: String,
    pub value: String,
}

impl Kpi {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One point of a chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub name: String,
    pub value: f64,
    /// Share of all rows, one decimal (`"50.0"`). Only set for distributions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<String>,
}

impl SeriesPoint {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            percentage: None,
        }
    }
}

pub type ChartSeries = Vec<SeriesPoint>;

/// One chart or KPI block of a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChartDescriptor {
    Kpi {
        title: String,
        data: Vec<Kpi>,
    },
    Bar {
        title: String,
        #[serde(rename = "xLabel")]
        x_label: String,
        #[serde(rename = "yLabel")]
        y_label: String,
        data: ChartSeries,
    },
    Pie {
        title: String,
        data: ChartSeries,
    },
    Line {
        title: String,
        #[serde(rename = "xLabel")]
        x_label: String,
        #[serde(rename = "yLabel")]
        y_label: String,
        data: ChartSeries,
    },
}

impl ChartDescriptor {
    pub fn title(&self) -> &str {
        match self {
            ChartDescriptor::Kpi { title, .. }
            | ChartDescriptor::Bar { title, .. }
            | ChartDescriptor::Pie { title, .. }
            | ChartDescriptor::Line { title, .. } => title,
        }
    }

    /// The `type` tag used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            ChartDescriptor::Kpi { .. } => "kpi",
            ChartDescriptor::Bar { .. } => "bar",
            ChartDescriptor::Pie { .. } => "pie",
            ChartDescriptor::Line { .. } => "line",
        }
    }

    pub fn series(&self) -> Option<&ChartSeries> {
        match self {
            ChartDescriptor::Kpi { .. } => None,
            ChartDescriptor::Bar { data, .. }
            | ChartDescriptor::Pie { data, .. }
            | ChartDescriptor::Line { data, .. } => Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let chart = ChartDescriptor::Bar {
            title: "sales by region".into(),
            x_label: "region".into(),
            y_label: "sales".into(),
            data: vec![SeriesPoint::new("East", 7.0)],
        };
        let json = serde_json::to_value(&chart).unwrap();
        assert_eq!(json["type"], "bar");
        assert_eq!(json["xLabel"], "region");
        assert_eq!(json["data"][0]["name"], "East");
        assert!(json["data"][0].get("percentage").is_none());

        let back: ChartDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(back, chart);
    }
}
