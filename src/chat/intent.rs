//! Keyword routing for chat questions. First match wins.

const AI_KEYWORDS: &[&str] = &[
    "highest",
    "lowest",
    "top",
    "average",
    "total",
    "best",
    "worst",
    "month",
    "customer",
    "category",
    "trend",
    "growth",
    "performance",
];

const SUMMARY_KEYWORDS: &[&str] = &["summary", "overview", "insight"];

const DASHBOARD_KEYWORDS: &[&str] = &["dashboard", "create charts", "create dashboard"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricQuery {
    Total,
    Average,
    Maximum,
    Minimum,
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    AskAi,
    Summary,
    DashboardPicker,
    Metric(MetricQuery),
    Chart(ChartKind),
    Unknown,
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

impl MetricQuery {
    pub fn detect(lower: &str) -> Option<Self> {
        if contains_any(lower, &["total", "sum"]) {
            Some(MetricQuery::Total)
        } else if contains_any(lower, &["average", "avg", "mean"]) {
            Some(MetricQuery::Average)
        } else if contains_any(lower, &["maximum", "max"]) {
            Some(MetricQuery::Maximum)
        } else if contains_any(lower, &["minimum", "min"]) {
            Some(MetricQuery::Minimum)
        } else if contains_any(lower, &["count", "number of"]) {
            Some(MetricQuery::Count)
        } else {
            None
        }
    }
}

impl ChartKind {
    pub fn detect(lower: &str) -> Option<Self> {
        if lower.contains("bar") {
            Some(ChartKind::Bar)
        } else if lower.contains("pie") {
            Some(ChartKind::Pie)
        } else if contains_any(lower, &["line", "trend"]) {
            Some(ChartKind::Line)
        } else {
            None
        }
    }
}

impl Intent {
    pub fn classify(question: &str) -> Self {
        let lower = question.to_lowercase();
        if contains_any(&lower, AI_KEYWORDS) {
            Intent::AskAi
        } else if contains_any(&lower, SUMMARY_KEYWORDS) {
            Intent::Summary
        } else if contains_any(&lower, DASHBOARD_KEYWORDS) {
            Intent::DashboardPicker
        } else if let Some(metric) = MetricQuery::detect(&lower) {
            Intent::Metric(metric)
        } else if let Some(kind) = ChartKind::detect(&lower) {
            Intent::Chart(kind)
        } else {
            Intent::Unknown
        }
    }
}
