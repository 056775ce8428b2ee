//! Group-by aggregation into chart series.

use indexmap::IndexMap;

use super::charts::{ChartSeries, SeriesPoint};
use super::metrics::format_fixed;
use crate::dataset::{CellValue, Dataset};

/// String key of a grouping cell. Missing cells group with nulls under the empty key.
fn group_key(cell: Option<&CellValue>) -> String {
    cell.map(|c| c.to_string()).unwrap_or_default()
}

/// Sums `value_column` per distinct `group_by` value, in first-seen order.
pub fn sum_by(dataset: &Dataset, group_by: &str, value_column: &str) -> ChartSeries {
    let mut groups: IndexMap<String, f64> = IndexMap::new();
    for record in dataset.records() {
        let value = record
            .get(value_column)
            .map(CellValue::coerce_number)
            .unwrap_or(0.0);
        *groups.entry(group_key(record.get(group_by))).or_insert(0.0) += value;
    }

    groups
        .into_iter()
        .map(|(name, value)| SeriesPoint::new(name, value))
        .collect()
}

/// Row count per distinct `group_by` value, in first-seen order, with each group's share
/// of all rows as a one-decimal percentage.
pub fn count_by(dataset: &Dataset, group_by: &str) -> ChartSeries {
    let mut groups: IndexMap<String, usize> = IndexMap::new();
    for record in dataset.records() {
        *groups.entry(group_key(record.get(group_by))).or_insert(0) += 1;
    }

    let total = dataset.len();
    groups
        .into_iter()
        .map(|(name, count)| SeriesPoint {
            name,
            value: count as f64,
            percentage: Some(format_fixed(count as f64 / total as f64 * 100.0, 1)),
        })
        .collect()
}

/// [`sum_by`] when a value column is given, [`count_by`] otherwise.
pub fn group(dataset: &Dataset, group_by: &str, value_column: Option<&str>) -> ChartSeries {
    match value_column {
        Some(value_column) => sum_by(dataset, group_by, value_column),
        None => count_by(dataset, group_by),
    }
}

/// Raw coerced `y` per row for the first `limit` rows, labelled by `x`.
pub fn row_series(dataset: &Dataset, x: &str, y: &str, limit: usize) -> ChartSeries {
    dataset
        .records()
        .iter()
        .take(limit)
        .map(|record| {
            SeriesPoint::new(
                group_key(record.get(x)),
                record.get(y).map(CellValue::coerce_number).unwrap_or(0.0),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;

    fn rows(pairs: &[(&str, CellValue)]) -> Dataset {
        pairs
            .iter()
            .map(|(cat, val)| {
                let mut r = Record::new();
                r.insert("cat".to_string(), CellValue::from(*cat));
                r.insert("val".to_string(), val.clone());
                r
            })
            .collect()
    }

    #[test]
    fn test_count_distribution() {
        let ds = rows(&[
            ("A", CellValue::Null),
            ("B", CellValue::Null),
            ("A", CellValue::Null),
            ("C", CellValue::Null),
        ]);
        let series = count_by(&ds, "cat");
        let got: Vec<(&str, f64, Option<&str>)> = series
            .iter()
            .map(|p| (p.name.as_str(), p.value, p.percentage.as_deref()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("A", 2.0, Some("50.0")),
                ("B", 1.0, Some("25.0")),
                ("C", 1.0, Some("25.0")),
            ]
        );
    }

    #[test]
    fn test_share_ties_round_up() {
        let mut pairs = vec![("A", CellValue::Null)];
        pairs.extend(std::iter::repeat(("B", CellValue::Null)).take(15));
        let series = count_by(&rows(&pairs), "cat");
        assert_eq!(series[0].percentage.as_deref(), Some("6.3"));
        assert_eq!(series[1].percentage.as_deref(), Some("93.8"));
    }

    #[test]
    fn test_sum_per_group() {
        let ds = rows(&[
            ("A", CellValue::Number(5.0)),
            ("B", CellValue::Number(3.0)),
            ("A", CellValue::Number(2.0)),
        ]);
        assert_eq!(
            sum_by(&ds, "cat", "val"),
            vec![SeriesPoint::new("A", 7.0), SeriesPoint::new("B", 3.0)]
        );
    }

    #[test]
    fn test_first_seen_order_not_sorted() {
        let ds = rows(&[
            ("zeta", CellValue::Number(1.0)),
            ("alpha", CellValue::Number(100.0)),
            ("zeta", CellValue::from("oops")),
        ]);
        let names: Vec<String> = group(&ds, "cat", Some("val"))
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_row_series_limit() {
        let ds: Dataset = (0..30)
            .map(|i| {
                let mut r = Record::new();
                r.insert("day".to_string(), CellValue::from(format!("d{}", i)));
                r.insert("sales".to_string(), CellValue::Number(i as f64));
                r
            })
            .collect();
        let series = row_series(&ds, "day", "sales", 20);
        assert_eq!(series.len(), 20);
        assert_eq!(series[19], SeriesPoint::new("d19", 19.0));
    }
}
