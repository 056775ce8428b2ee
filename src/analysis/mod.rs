//! Profiling → aggregation → chart-model pipeline.
//!
//! Everything here is synchronous and side-effect free: functions read a [`Dataset`]
//! and return fresh values.
//!
//! [`Dataset`]: crate::dataset::Dataset

pub mod charts;
pub mod dashboard;
pub mod grouping;
pub mod metrics;
pub mod profile;

pub use charts::{ChartDescriptor, ChartSeries, Kpi, SeriesPoint};
pub use dashboard::{compose, compose_dashboard, DashboardTemplate};
pub use grouping::{count_by, group, sum_by};
pub use metrics::{kpis, summarize, MetricSummary};
pub use profile::{profile_dataset, ColumnKind, ColumnProfile};
