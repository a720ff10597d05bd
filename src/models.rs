// src/models.rs

pub mod crm;
pub mod dashboard;
pub mod finance;
pub mod operations;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

// =========================================================================
//  HELPERS DE FRONTEIRA (dados legados do snapshot / payloads antigos)
// =========================================================================

/// Valores monetários nulos viram zero em vez de falhar.
pub(crate) fn nullable_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Decimal>::deserialize(deserializer)?.unwrap_or(Decimal::ZERO))
}

/// Datas ausentes ou ilegíveis viram `None` (o registro sai dos agregados mensais).
pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        let s = s.trim();
        // Aceita "2024-11-20" e também timestamps "2024-11-20T10:00:00Z"
        let day = s.get(..10).unwrap_or(s);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }))
}
