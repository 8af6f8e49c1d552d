//! Breeder domain types
//!
//! [`Breeder`] is the stored record; [`NewBreeder`] is the create payload
//! (also used for delayed submissions); [`BreederUpdate`] is a partial update
//! where every absent field is left untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::BreederId;
use crate::responses::ValidationError;

/// Longest accepted value for any text field
pub const MAX_TEXT_LEN: usize = 255;

/// Relative price tier of a breeder, from 1 (cheapest) to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PriceLevel(u8);

impl PriceLevel {
    /// Lowest accepted level
    pub const MIN: u8 = 1;
    /// Highest accepted level
    pub const MAX: u8 = 5;

    /// Returns the numeric level.
    pub fn get(self) -> u8 {
        self.0
    }
}

/// Rejected price level value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("price_level must be between 1 and 5, got {0}")]
pub struct PriceLevelError(pub i64);

impl TryFrom<i64> for PriceLevel {
    type Error = PriceLevelError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(PriceLevelError(value))
        }
    }
}

impl From<PriceLevel> for i64 {
    fn from(level: PriceLevel) -> Self {
        i64::from(level.0)
    }
}

impl From<PriceLevel> for i16 {
    fn from(level: PriceLevel) -> Self {
        i16::from(level.0)
    }
}

impl fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted breeder record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breeder {
    pub id: BreederId,
    pub name: String,
    pub breeder_city: String,
    pub breeder_country: String,
    pub price_level: PriceLevel,
    pub breeder_address: String,
}

impl Breeder {
    /// Build a record from a validated create payload.
    pub fn from_new(id: BreederId, data: NewBreeder) -> Self {
        Self {
            id,
            name: data.name,
            breeder_city: data.breeder_city,
            breeder_country: data.breeder_country,
            price_level: data.price_level,
            breeder_address: data.breeder_address,
        }
    }

    /// Merge the supplied fields of `changes` into this record.
    pub fn apply(&mut self, changes: BreederUpdate) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(city) = changes.breeder_city {
            self.breeder_city = city;
        }
        if let Some(country) = changes.breeder_country {
            self.breeder_country = country;
        }
        if let Some(level) = changes.price_level {
            self.price_level = level;
        }
        if let Some(address) = changes.breeder_address {
            self.breeder_address = address;
        }
    }
}

/// Payload for creating a breeder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBreeder {
    pub name: String,
    pub breeder_city: String,
    pub breeder_country: String,
    pub price_level: PriceLevel,
    pub breeder_address: String,
}

impl NewBreeder {
    /// Check field contents that the type system cannot.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new("Breeder payload failed validation");
        check_name(&mut errors, &self.name);
        check_len(&mut errors, "breeder_city", &self.breeder_city);
        check_len(&mut errors, "breeder_country", &self.breeder_country);
        check_len(&mut errors, "breeder_address", &self.breeder_address);

        if errors.has_errors() {
            Err(errors)
        } else {
            Ok(())
        }
    }
}

/// Partial update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreederUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breeder_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breeder_country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_level: Option<PriceLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breeder_address: Option<String>,
}

impl BreederUpdate {
    /// Check the supplied fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new("Breeder update failed validation");
        if let Some(ref name) = self.name {
            check_name(&mut errors, name);
        }
        if let Some(ref city) = self.breeder_city {
            check_len(&mut errors, "breeder_city", city);
        }
        if let Some(ref country) = self.breeder_country {
            check_len(&mut errors, "breeder_country", country);
        }
        if let Some(ref address) = self.breeder_address {
            check_len(&mut errors, "breeder_address", address);
        }

        if errors.has_errors() {
            Err(errors)
        } else {
            Ok(())
        }
    }
}

fn check_name(errors: &mut ValidationError, name: &str) {
    if name.trim().is_empty() {
        errors.add_field_error("name", "REQUIRED", "name must not be empty");
    }
    check_len(errors, "name", name);
}

fn check_len(errors: &mut ValidationError, field: &str, value: &str) {
    if value.chars().count() > MAX_TEXT_LEN {
        errors.add_field_error(
            field,
            "TOO_LONG",
            format!("{} must be at most {} characters", field, MAX_TEXT_LEN),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> NewBreeder {
        NewBreeder {
            name: "Acme Kennels".into(),
            breeder_city: "Lyon".into(),
            breeder_country: "France".into(),
            price_level: PriceLevel::try_from(3).unwrap(),
            breeder_address: "1 Rue de la Paix".into(),
        }
    }

    #[test]
    fn test_price_level_bounds() {
        assert!(PriceLevel::try_from(0).is_err());
        assert_eq!(PriceLevel::try_from(1).unwrap().get(), 1);
        assert_eq!(PriceLevel::try_from(5).unwrap().get(), 5);
        assert_eq!(PriceLevel::try_from(6), Err(PriceLevelError(6)));
    }

    #[test]
    fn test_price_level_rejected_during_deserialization() {
        let payload = json!({
            "name": "A",
            "breeder_city": "B",
            "breeder_country": "C",
            "price_level": 9,
            "breeder_address": "D"
        });
        let err = serde_json::from_value::<NewBreeder>(payload).unwrap_err();
        assert!(err.to_string().contains("between 1 and 5"));
    }

    #[test]
    fn test_blank_name_fails_validation() {
        let mut data = sample();
        data.name = "   ".into();
        let errors = data.validate().unwrap_err();
        assert_eq!(errors.errors["name"][0].code, "REQUIRED");
    }

    #[test]
    fn test_overlong_address_fails_validation() {
        let mut data = sample();
        data.breeder_address = "x".repeat(MAX_TEXT_LEN + 1);
        let errors = data.validate().unwrap_err();
        assert!(errors.errors.contains_key("breeder_address"));
    }

    #[test]
    fn test_valid_payload_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_update_changes_only_supplied_fields() {
        let mut breeder = Breeder::from_new(BreederId::from("b-1"), sample());
        breeder.apply(BreederUpdate {
            name: Some("X".into()),
            ..Default::default()
        });

        assert_eq!(breeder.name, "X");
        assert_eq!(breeder.breeder_city, "Lyon");
        assert_eq!(breeder.price_level.get(), 3);
    }

    #[test]
    fn test_update_deserializes_missing_fields_as_none() {
        let update: BreederUpdate = serde_json::from_value(json!({"name": "X"})).unwrap();
        assert_eq!(update.name.as_deref(), Some("X"));
        assert!(update.breeder_city.is_none());
    }

    #[test]
    fn test_update_with_empty_name_fails_validation() {
        let update = BreederUpdate {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
