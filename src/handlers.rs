// src/handlers.rs

pub mod crm;
pub mod dashboard;
pub mod documents;
pub mod finance;
pub mod operations;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use validator::ValidationError;

// Valores monetários nunca negativos (o sinal vem do tipo do movimento)
pub(crate) fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("O valor não pode ser negativo".into());
        return Err(err);
    }
    Ok(())
}

// Data ausente no formulário = hoje
pub(crate) fn today_or(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| chrono::Local::now().date_naive())
}
