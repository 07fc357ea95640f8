use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record_amount;

/// Chronological log of expense records.
///
/// Each record has amount/date/description-like fields owned by the UI
/// layer; this layer treats them as opaque JSON and keeps round trips
/// lossless.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseLog(Vec<Value>);

impl ExpenseLog {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a record to the log.
    pub fn push(&mut self, record: Value) {
        self.0.push(record);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    /// Sum of the numeric `amount` fields across all records that carry one.
    pub fn total_amount(&self) -> f64 {
        self.0.iter().filter_map(record_amount).sum()
    }
}

impl From<Vec<Value>> for ExpenseLog {
    fn from(records: Vec<Value>) -> Self {
        Self(records)
    }
}

impl<'a> IntoIterator for &'a ExpenseLog {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
