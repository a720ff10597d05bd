// src/store/ledger.rs

use rust_decimal::Decimal;

use crate::{
    models::finance::{Account, Movement},
    store::RecordStore,
};

/// Saldo derivado: soma das entradas menos as saídas da conta.
/// Nunca é guardado como fonte de verdade.
pub fn balance_of(movements: &[Movement], account: Account) -> Decimal {
    movements
        .iter()
        .filter(|m| m.account == account)
        .map(Movement::signed_amount)
        .sum()
}

impl RecordStore {
    pub fn balance_of(&self, account: Account) -> Decimal {
        balance_of(&self.movements, account)
    }

    /// Acrescenta o movimento ao livro. Lançamentos anteriores nunca são alterados;
    /// `balance_after` é apenas a foto do saldo naquele momento.
    pub fn record_movement(&mut self, mut movement: Movement) -> Movement {
        movement.balance_after = Some(self.balance_of(movement.account) + movement.signed_amount());
        self.movements.push(movement.clone());
        movement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::finance::MovementKind;
    use uuid::Uuid;

    fn movement(kind: MovementKind, account: Account, amount: i64) -> Movement {
        Movement {
            id: Uuid::new_v4(),
            date: chrono::NaiveDate::from_ymd_opt(2024, 11, 1),
            kind,
            payer_name: "Acme".into(),
            client_id: None,
            amount: Decimal::new(amount, 0),
            account,
            invoice_id: None,
            campaign_id: None,
            details: None,
            balance_after: None,
        }
    }

    #[test]
    fn empty_account_has_zero_balance() {
        let store = RecordStore::default();
        assert_eq!(store.balance_of(Account::CorporateAccount), Decimal::ZERO);
        assert_eq!(store.balance_of(Account::PayPal), Decimal::ZERO);
    }

    #[test]
    fn balance_is_collections_minus_payments() {
        let mut store = RecordStore::default();
        store.record_movement(movement(MovementKind::Collection, Account::CorporateAccount, 1452));
        store.record_movement(movement(MovementKind::Payment, Account::CorporateAccount, 300));
        store.record_movement(movement(MovementKind::Collection, Account::CorporateAccount, 48));

        assert_eq!(store.balance_of(Account::CorporateAccount), Decimal::new(1200, 0));
    }

    #[test]
    fn other_accounts_never_move_the_balance() {
        let mut store = RecordStore::default();
        store.record_movement(movement(MovementKind::Collection, Account::CorporateAccount, 500));
        let before = store.balance_of(Account::CorporateAccount);

        store.record_movement(movement(MovementKind::Collection, Account::PayPal, 80));
        store.record_movement(movement(MovementKind::Payment, Account::PayPal, 20));

        assert_eq!(store.balance_of(Account::CorporateAccount), before);
        assert_eq!(store.balance_of(Account::PayPal), Decimal::new(60, 0));
    }

    #[test]
    fn recorded_movements_carry_a_balance_snapshot() {
        let mut store = RecordStore::default();
        store.record_movement(movement(MovementKind::Collection, Account::PayPal, 100));
        let second = store.record_movement(movement(MovementKind::Payment, Account::PayPal, 30));

        assert_eq!(second.balance_after, Some(Decimal::new(70, 0)));
        // O primeiro lançamento continua igual
        assert_eq!(store.movements[0].balance_after, Some(Decimal::new(100, 0)));
    }

    #[test]
    fn null_amounts_from_storage_count_as_zero() {
        let raw = r#"{
            "id": "7d444840-9dc0-11d1-b245-5ffdce74fad2",
            "date": "2024-11-01",
            "kind": "COLLECTION",
            "payerName": "Acme",
            "clientId": null,
            "amount": null,
            "account": "PAYPAL",
            "invoiceId": null,
            "campaignId": null,
            "details": null,
            "balanceAfter": null
        }"#;
        let legacy: Movement = serde_json::from_str(raw).unwrap();
        assert_eq!(balance_of(&[legacy], Account::PayPal), Decimal::ZERO);
    }
}
