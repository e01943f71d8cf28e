//! The closed set of fruits a harvest can record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The seven fruits the farm tracks. Stored as TEXT in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum Fruit {
    Strawberry,
    Cherry,
    Raspberry,
    Apple,
    Blackcurrant,
    Redcurrant,
    Apricot,
}

impl Fruit {
    pub const ALL: [Fruit; 7] = [
        Fruit::Strawberry,
        Fruit::Cherry,
        Fruit::Raspberry,
        Fruit::Apple,
        Fruit::Blackcurrant,
        Fruit::Redcurrant,
        Fruit::Apricot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Fruit::Strawberry => "strawberry",
            Fruit::Cherry => "cherry",
            Fruit::Raspberry => "raspberry",
            Fruit::Apple => "apple",
            Fruit::Blackcurrant => "blackcurrant",
            Fruit::Redcurrant => "redcurrant",
            Fruit::Apricot => "apricot",
        }
    }
}

impl fmt::Display for Fruit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Fruit {
    type Err = CoreError;

    /// Case-insensitive parse, matching the original query-param handling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        Fruit::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == lowered)
            .ok_or_else(|| CoreError::Validation(format!("'{s}' is not a valid fruit")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_fruits_case_insensitively() {
        assert_eq!("raspberry".parse::<Fruit>().unwrap(), Fruit::Raspberry);
        assert_eq!("Apricot".parse::<Fruit>().unwrap(), Fruit::Apricot);
    }

    #[test]
    fn rejects_unknown_fruit() {
        let err = "kasztan".parse::<Fruit>().unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn display_round_trips() {
        for fruit in Fruit::ALL {
            assert_eq!(fruit.to_string().parse::<Fruit>().unwrap(), fruit);
        }
    }
}
