use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

/// A promotional discount code. Read-only from the booking engine's
/// perspective; the admin dashboard manages the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promo {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub description: String,
    pub discount_type: DiscountType,
    /// Percentage points for `Percentage`, sen for `Fixed`.
    pub discount_value: i64,
    pub expiry_date: DateTime<Utc>,
    pub is_active: bool,
    /// When present, the promo only applies to this concept.
    pub package_id: Option<String>,
}

impl Promo {
    /// Post-discount price in sen, floored at zero.
    pub fn apply(&self, price_cents: i64) -> i64 {
        let discounted = match self.discount_type {
            DiscountType::Percentage => price_cents - price_cents * self.discount_value / 100,
            DiscountType::Fixed => price_cents - self.discount_value,
        };
        discounted.max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn promo(discount_type: DiscountType, value: i64) -> Promo {
        Promo {
            id: Uuid::new_v4(),
            code: "SAVE20".to_string(),
            title: "Raya saver".to_string(),
            description: String::new(),
            discount_type,
            discount_value: value,
            expiry_date: Utc::now() + Duration::days(7),
            is_active: true,
            package_id: None,
        }
    }

    #[test]
    fn test_percentage_discount() {
        assert_eq!(promo(DiscountType::Percentage, 20).apply(15000), 12000);
    }

    #[test]
    fn test_fixed_discount_floors_at_zero() {
        assert_eq!(promo(DiscountType::Fixed, 5000).apply(15000), 10000);
        assert_eq!(promo(DiscountType::Fixed, 20000).apply(15000), 0);
    }
}
