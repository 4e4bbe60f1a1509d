use std::sync::Arc;

use chrono::{DateTime, Utc};

use raya_core::repository::{PromoRepository, StoreError};
use raya_shared::Promo;

/// Match a code against the promo collection. Codes compare
/// case-insensitively; the promo must be active, unexpired at `now`, and
/// its concept scope (when present) must match. Any failure is `None`,
/// never an error; the caller renders the user-facing message.
pub fn match_promo(
    promos: &[Promo],
    code: &str,
    concept_id: &str,
    now: DateTime<Utc>,
) -> Option<Promo> {
    let found = promos
        .iter()
        .find(|p| p.code.eq_ignore_ascii_case(code) && p.is_active)?;
    if found.expiry_date <= now {
        return None;
    }
    if let Some(package_id) = &found.package_id {
        if package_id != concept_id {
            return None;
        }
    }
    Some(found.clone())
}

#[derive(Clone)]
pub struct PromoValidator {
    promos: Arc<dyn PromoRepository>,
}

impl PromoValidator {
    pub fn new(promos: Arc<dyn PromoRepository>) -> Self {
        Self { promos }
    }

    pub async fn validate(
        &self,
        code: &str,
        concept_id: &str,
    ) -> Result<Option<Promo>, StoreError> {
        let promos = self.promos.list_all().await?;
        Ok(match_promo(&promos, code, concept_id, Utc::now()))
    }
}
