use std::fmt;

/// The two synced datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Donations,
    Expenses,
}

impl Collection {
    /// Key under which this collection is stored in the local cache.
    pub fn cache_key(self) -> &'static str {
        match self {
            Collection::Donations => "donations",
            Collection::Expenses => "expenses",
        }
    }

    /// Last-resort payload compiled into the crate, used when both the
    /// published endpoint and the local cache miss.
    pub fn bundled_json(self) -> &'static str {
        match self {
            Collection::Donations => include_str!("../../data/donations.json"),
            Collection::Expenses => include_str!("../../data/expenses.json"),
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cache_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DonationData, ExpenseLog};

    #[test]
    fn test_cache_keys() {
        assert_eq!(Collection::Donations.cache_key(), "donations");
        assert_eq!(Collection::Expenses.cache_key(), "expenses");
        assert_eq!(Collection::Donations.to_string(), "donations");
    }

    #[test]
    fn test_bundled_defaults_parse() {
        let donations: DonationData =
            serde_json::from_str(Collection::Donations.bundled_json()).unwrap();
        assert!(donations.is_empty());

        let expenses: ExpenseLog =
            serde_json::from_str(Collection::Expenses.bundled_json()).unwrap();
        assert!(expenses.is_empty());
    }
}
