//! Conversation about a loaded dataset.
//!
//! A [`ChatSession`] owns the dataset, the growing message list and the current view
//! (one chart or a whole dashboard). Questions are routed by keyword to the AI backend,
//! the summary backend, the dashboard template picker, a local metric, or a chart.

pub mod answers;
pub mod intent;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::dashboard::{bar_chart, line_chart, pie_chart};
use crate::analysis::{ChartDescriptor, DashboardTemplate};
use crate::backend::InsightBackend;
use crate::dataset::Dataset;
use crate::types::{AppError, AppResult};

pub use answers::metric_answer;
pub use intent::{ChartKind, Intent, MetricQuery};

pub const GREETING: &str = "Dataset loaded successfully 📊 Ask me anything about your data.";
pub const AI_FALLBACK: &str = "I couldn't analyze that from the current dataset.";
pub const SUMMARY_FALLBACK: &str = "Unable to generate summary.";
pub const TEMPLATE_PROMPT: &str = "Choose a dashboard template: Sales, Finance, or School.";
pub const CHART_REPLY: &str = "Chart generated based on your data 📈";
pub const DASHBOARD_REPLY: &str = "Dashboard created successfully 📊";
pub const HELP_REPLY: &str =
    "Try asking for a summary, a dashboard, a sum or mean, or a bar, pie or line chart.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub from: Speaker,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            from: Speaker::User,
            text: text.into(),
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            from: Speaker::Ai,
            text: text.into(),
        }
    }
}

/// What the chart panel currently shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ChatView {
    #[default]
    Empty,
    Chart { chart: ChartDescriptor },
    Dashboard { charts: Vec<ChartDescriptor> },
}

pub struct ChatSession {
    dataset: Dataset,
    messages: Vec<ChatMessage>,
    view: ChatView,
    template_picker: bool,
}

impl ChatSession {
    /// Starts a conversation. The dataset must have at least one record.
    pub fn new(dataset: Dataset) -> AppResult<Self> {
        if dataset.is_empty() {
            return Err(AppError::InvalidInput("Upload a dataset first".to_string()));
        }
        Ok(Self {
            dataset,
            messages: vec![ChatMessage::ai(GREETING)],
            view: ChatView::Empty,
            template_picker: false,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn view(&self) -> &ChatView {
        &self.view
    }

    pub fn is_template_picker_open(&self) -> bool {
        self.template_picker
    }

    /// Handles one question and returns the messages it added. Blank questions add none.
    pub async fn ask(&mut self, question: &str, backend: &dyn InsightBackend) -> &[ChatMessage] {
        let start = self.messages.len();
        if question.trim().is_empty() {
            return &self.messages[start..];
        }
        self.messages.push(ChatMessage::user(question));

        let intent = Intent::classify(question);
        info!(?intent, "Routing chat question");
        let reply = match intent {
            Intent::AskAi => match backend.ask(question, &self.dataset).await {
                Ok(Some(answer)) => answer,
                Ok(None) => AI_FALLBACK.to_string(),
                Err(e) => {
                    warn!(error = %e, "AI question failed");
                    AI_FALLBACK.to_string()
                }
            },
            Intent::Summary => match backend.summary(&self.dataset).await {
                Ok(Some(summary)) if !summary.is_empty() => summary,
                Ok(_) => SUMMARY_FALLBACK.to_string(),
                Err(e) => {
                    warn!(error = %e, "Summary request failed");
                    SUMMARY_FALLBACK.to_string()
                }
            },
            Intent::DashboardPicker => {
                self.template_picker = true;
                TEMPLATE_PROMPT.to_string()
            }
            Intent::Metric(query) => match metric_answer(&self.dataset, query) {
                Some(answer) => answer,
                None => self.chart_reply(ChartKind::detect(&question.to_lowercase())),
            },
            Intent::Chart(kind) => self.chart_reply(Some(kind)),
            Intent::Unknown => HELP_REPLY.to_string(),
        };

        self.messages.push(ChatMessage::ai(reply));
        &self.messages[start..]
    }

    fn chart_reply(&mut self, kind: Option<ChartKind>) -> String {
        let chart = match kind {
            Some(ChartKind::Bar) => bar_chart(&self.dataset),
            Some(ChartKind::Pie) => pie_chart(&self.dataset),
            Some(ChartKind::Line) => line_chart(&self.dataset),
            None => None,
        };
        match chart {
            Some(chart) => {
                self.view = ChatView::Chart { chart };
                CHART_REPLY.to_string()
            }
            None => HELP_REPLY.to_string(),
        }
    }

    /// Builds the dashboard for the chosen template and switches to dashboard mode.
    pub fn select_template(&mut self, template: DashboardTemplate) -> &[ChatMessage] {
        let start = self.messages.len();
        self.template_picker = false;
        let charts = template.compose(&self.dataset);
        info!(%template, charts = charts.len(), "Dashboard template selected");
        self.view = ChatView::Dashboard { charts };
        self.messages.push(ChatMessage::ai(DASHBOARD_REPLY));
        &self.messages[start..]
    }
}
