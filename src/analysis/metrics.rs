//! Numeric summaries and KPI blocks.

use serde::{Deserialize, Serialize};

use super::charts::Kpi;
use crate::dataset::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub total: f64,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub count: usize,
}

impl MetricSummary {
    pub const EMPTY: MetricSummary = MetricSummary {
        total: 0.0,
        average: 0.0,
        max: 0.0,
        min: 0.0,
        count: 0,
    };
}

/// Coerced value of `column` for every row. Missing and non-numeric cells become 0.
pub fn column_values(dataset: &Dataset, column: &str) -> Vec<f64> {
    dataset
        .column(column)
        .map(|cell| cell.map(|c| c.coerce_number()).unwrap_or(0.0))
        .collect()
}

/// Summarises `column` over every row, blanks counted as 0.
///
/// The average divides by the full row count, so blanks pull it down.
pub fn summarize(dataset: &Dataset, column: &str) -> MetricSummary {
    let values = column_values(dataset, column);
    if values.is_empty() {
        return MetricSummary::EMPTY;
    }

    let total: f64 = values.iter().sum();
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    MetricSummary {
        total,
        average: total / values.len() as f64,
        max,
        min,
        count: values.len(),
    }
}

/// Total, average, max and record count for one numeric column.
pub fn kpis(dataset: &Dataset, column: &str) -> Vec<Kpi> {
    let summary = summarize(dataset, column);
    vec![
        Kpi::new(format!("Total {}", column), format_grouped(summary.total)),
        Kpi::new(format!("Average {}", column), format_fixed(summary.average, 2)),
        Kpi::new(format!("Max {}", column), format_grouped(summary.max)),
        Kpi::new("Records", dataset.len().to_string()),
    ]
}

/// Fixed-point rendering with ties rounded away from zero (`1.125` -> `"1.13"`).
pub fn format_fixed(n: f64, digits: usize) -> String {
    let scale = 10f64.powi(digits as i32);
    format!("{:.*}", digits, (n * scale).round() / scale)
}

/// en-US style number: thousands separators, at most three fraction digits.
pub fn format_grouped(n: f64) -> String {
    let rounded = format_fixed(n, 3);
    let trimmed = if rounded.contains('.') {
        rounded.trim_end_matches('0').trim_end_matches('.')
    } else {
        rounded.as_str()
    };

    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", trimmed),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if grouped == "0" && frac_part.is_none() { "" } else { sign };
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{CellValue, Record};

    fn dataset(values: Vec<CellValue>) -> Dataset {
        values
            .into_iter()
            .map(|v| {
                let mut r = Record::new();
                r.insert("amount".to_string(), v);
                r
            })
            .collect()
    }

    #[test]
    fn test_blank_cells_count_as_zero() {
        let ds = dataset(vec![
            CellValue::Number(10.0),
            CellValue::Number(20.0),
            CellValue::from(""),
            CellValue::Number(30.0),
        ]);
        let summary = summarize(&ds, "amount");
        assert_eq!(summary.total, 60.0);
        assert_eq!(summary.count, 4);
        assert_eq!(summary.average, 15.0);
        assert_eq!(summary.max, 30.0);
        assert_eq!(summary.min, 0.0);
    }

    #[test]
    fn test_all_missing_column() {
        let ds = dataset(vec![CellValue::Null, CellValue::from("n/a")]);
        let summary = summarize(&ds, "amount");
        assert_eq!(summary.max, 0.0);
        assert_eq!(summary.min, 0.0);
        assert_eq!(summary.average, 0.0);
    }

    #[test]
    fn test_empty_dataset_summary() {
        assert_eq!(summarize(&Dataset::default(), "amount"), MetricSummary::EMPTY);
    }

    #[test]
    fn test_kpi_block() {
        let ds = dataset(vec![
            CellValue::Number(1200.5),
            CellValue::Number(800.0),
            CellValue::Number(1000.0),
        ]);
        let kpis = kpis(&ds, "amount");
        assert_eq!(
            kpis,
            vec![
                Kpi::new("Total amount", "3,000.5"),
                Kpi::new("Average amount", "1000.17"),
                Kpi::new("Max amount", "1,200.5"),
                Kpi::new("Records", "3"),
            ]
        );
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(1234567.0), "1,234,567");
        assert_eq!(format_grouped(-4321.25), "-4,321.25");
        assert_eq!(format_grouped(1.23456), "1.235");
        assert_eq!(format_grouped(-0.0001), "0");
        assert_eq!(format_grouped(0.0625), "0.063");
        assert_eq!(format_grouped(-2.0625), "-2.063");
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(format_fixed(1.125, 2), "1.13");
        assert_eq!(format_fixed(6.25, 1), "6.3");
        assert_eq!(format_fixed(-6.25, 1), "-6.3");
        assert_eq!(format_fixed(2.0, 2), "2.00");

        let ds = dataset(vec![CellValue::Number(1.0), CellValue::Number(1.25)]);
        assert_eq!(kpis(&ds, "amount")[1], Kpi::new("Average amount", "1.13"));
    }
}
