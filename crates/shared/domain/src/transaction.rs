use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single income or expense entry owned by a user.
///
/// `IsRecurring` is kept as a string because that is how existing documents store it;
/// use [`Transaction::recurring`] for a boolean view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transaction {
    #[serde(rename = "UUID")]
    pub uuid: String,
    pub username: String,
    #[serde(rename = "Type")]
    pub kind: String,
    pub amount: f64,
    pub category: String,
    pub date: DateTime<Utc>,
    pub description: String,
    pub is_recurring: String,
    pub frequency: String,
}

impl Transaction {
    /// Interprets the stored `IsRecurring` flag.
    ///
    /// Returns `None` when the stored value is neither `"true"` nor `"false"` (any case).
    #[must_use]
    pub fn recurring(&self) -> Option<bool> {
        let flag = self.is_recurring.trim();
        if flag.eq_ignore_ascii_case("true") {
            Some(true)
        } else if flag.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction(flag: &str) -> Transaction {
        Transaction {
            uuid: "t-1".to_owned(),
            username: "bob".to_owned(),
            kind: "expense".to_owned(),
            amount: 12.5,
            category: "food".to_owned(),
            date: DateTime::<Utc>::UNIX_EPOCH,
            description: "lunch".to_owned(),
            is_recurring: flag.to_owned(),
            frequency: String::new(),
        }
    }

    #[test]
    fn recurring_flag_is_parsed_leniently() {
        assert_eq!(transaction("true").recurring(), Some(true));
        assert_eq!(transaction(" FALSE ").recurring(), Some(false));
        assert_eq!(transaction("monthly").recurring(), None);
        assert_eq!(transaction("").recurring(), None);
    }
}
