//! Column type profiling.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::{CellValue, Dataset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Date,
    Categorical,
}

impl ColumnKind {
    /// Classifies a single sample value: numeric wins over date, anything else is
    /// categorical. Null and blank samples are categorical.
    pub fn of(sample: &CellValue) -> Self {
        if sample.as_number().is_some() {
            ColumnKind::Numeric
        } else if sample.as_date().is_some() {
            ColumnKind::Date
        } else {
            ColumnKind::Categorical
        }
    }
}

/// Partition of a dataset's columns by inferred kind, each list in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
    pub date: Vec<String>,
}

impl ColumnProfile {
    pub fn first_numeric(&self) -> Option<&str> {
        self.numeric.first().map(String::as_str)
    }

    pub fn first_categorical(&self) -> Option<&str> {
        self.categorical.first().map(String::as_str)
    }

    pub fn kind_of(&self, column: &str) -> Option<ColumnKind> {
        if self.numeric.iter().any(|c| c == column) {
            Some(ColumnKind::Numeric)
        } else if self.categorical.iter().any(|c| c == column) {
            Some(ColumnKind::Categorical)
        } else if self.date.iter().any(|c| c == column) {
            Some(ColumnKind::Date)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.numeric.len() + self.categorical.len() + self.date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Profiles columns from the first record only. An empty dataset yields an empty profile.
pub fn profile_dataset(dataset: &Dataset) -> ColumnProfile {
    let mut profile = ColumnProfile::default();
    let Some(sample) = dataset.first() else {
        return profile;
    };

    for (column, value) in sample {
        match ColumnKind::of(value) {
            ColumnKind::Numeric => profile.numeric.push(column.clone()),
            ColumnKind::Date => profile.date.push(column.clone()),
            ColumnKind::Categorical => profile.categorical.push(column.clone()),
        }
    }

    debug!(
        numeric = profile.numeric.len(),
        categorical = profile.categorical.len(),
        date = profile.date.len(),
        "Profiled dataset columns"
    );
    profile
}
