use super::intent::MetricQuery;
use crate::analysis::metrics::{format_fixed, format_grouped, summarize};
use crate::analysis::profile_dataset;
use crate::dataset::Dataset;

/// Locally computed answer over the first numeric column, or `None` when the dataset
/// has no numeric column.
pub fn metric_answer(dataset: &Dataset, query: MetricQuery) -> Option<String> {
    let profile = profile_dataset(dataset);
    let column = profile.first_numeric()?;
    let summary = summarize(dataset, column);

    let answer = match query {
        MetricQuery::Total => format!("Total {}: {}", column, format_grouped(summary.total)),
        MetricQuery::Average => {
            format!("Average {}: {}", column, format_fixed(summary.average, 2))
        }
        MetricQuery::Maximum => format!("Maximum {}: {}", column, format_grouped(summary.max)),
        MetricQuery::Minimum => format!("Minimum {}: {}", column, format_grouped(summary.min)),
        MetricQuery::Count => format!("Total records: {}", dataset.len()),
    };
    Some(answer)
}
