//! Gift listings as stored and served by the API.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::error::DomainError;

/// A stored gift listing. Field names are part of the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GiftRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    pub condition: String,
    pub posted_by: String,
    pub zipcode: String,
    /// Unix seconds.
    pub date_added: i64,
    pub age_days: i32,
    pub age_years: f64,
    pub description: String,
    pub image: String,
}

/// Payload accepted when posting a gift or seeding the collection.
///
/// Every field except `name` may be omitted; unknown fields are ignored so
/// documents exported from other stores load unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NewGift {
    pub id: Option<String>,
    pub name: String,
    pub category: String,
    pub condition: String,
    pub posted_by: String,
    pub zipcode: String,
    pub date_added: Option<i64>,
    pub age_days: i32,
    pub age_years: f64,
    pub description: String,
    pub image: String,
}

impl NewGift {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::BlankGiftName);
        }
        if let Some(id) = self.id.as_deref()
            && id.trim().is_empty()
        {
            return Err(DomainError::BlankGiftId);
        }
        if self.age_days < 0 || self.age_years < 0.0 || !self.age_years.is_finite() {
            return Err(DomainError::InvalidGiftAge);
        }
        Ok(())
    }

    /// Fill generated fields. `now` supplies `date_added` when absent.
    pub fn into_record(self, now: OffsetDateTime) -> GiftRecord {
        GiftRecord {
            id: self
                .id
                .map(|id| id.trim().to_string())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: self.name.trim().to_string(),
            category: self.category,
            condition: self.condition,
            posted_by: self.posted_by,
            zipcode: self.zipcode,
            date_added: self.date_added.unwrap_or_else(|| now.unix_timestamp()),
            age_days: self.age_days,
            age_years: self.age_years,
            description: self.description,
            image: self.image,
        }
    }
}
