use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::record_amount;

/// Donations keyed by donor identifier.
///
/// Record shape belongs to the UI layer; each value is passed through as
/// opaque JSON so a parse/serialize round trip is lossless. A donor may map
/// to a single record or to a list of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DonationData(Map<String, Value>);

impl DonationData {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The record(s) filed under a donor, if any.
    pub fn get(&self, donor: &str) -> Option<&Value> {
        self.0.get(donor)
    }

    /// File a record under a donor, returning the previous entry if present.
    pub fn insert(&mut self, donor: impl Into<String>, record: Value) -> Option<Value> {
        self.0.insert(donor.into(), record)
    }

    pub fn donors(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Sum of the numeric `amount` fields across all records that carry one.
    /// Records without an amount are skipped rather than treated as errors.
    pub fn total_amount(&self) -> f64 {
        self.0
            .values()
            .map(|entry| match entry {
                Value::Array(records) => records.iter().filter_map(record_amount).sum(),
                record => record_amount(record).unwrap_or(0.0),
            })
            .sum()
    }
}

impl From<Map<String, Value>> for DonationData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip_is_exact() {
        let text = "{\n  \"alice\": {\n    \"amount\": 50\n  }\n}";
        let data: DonationData = serde_json::from_str(text).unwrap();
        assert_eq!(serde_json::to_string_pretty(&data).unwrap(), text);
    }

    #[test]
    fn test_total_amount_single_records() {
        let mut data = DonationData::new();
        data.insert("alice", json!({"amount": 50, "date": "2024-01-05"}));
        data.insert("bob", json!({"amount": 12.5}));
        data.insert("carol", json!({"note": "pledge only"}));
        assert_eq!(data.total_amount(), 62.5);
    }

    #[test]
    fn test_total_amount_record_lists() {
        let mut data = DonationData::new();
        data.insert("alice", json!([{"amount": 10}, {"amount": 15}]));
        data.insert("bob", json!({"amount": 5}));
        assert_eq!(data.total_amount(), 30.0);
    }

    #[test]
    fn test_accessors() {
        let mut data = DonationData::new();
        assert!(data.is_empty());
        data.insert("alice", json!({"amount": 1}));
        assert_eq!(data.len(), 1);
        assert!(data.get("alice").is_some());
        assert!(data.get("bob").is_none());
        assert_eq!(data.donors().collect::<Vec<_>>(), vec!["alice"]);
    }
}
