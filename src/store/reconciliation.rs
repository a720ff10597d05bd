// src/store/reconciliation.rs

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    models::finance::{Account, CollectionStatus, Invoice, Movement, MovementKind},
    store::RecordStore,
};

/// Resultado da cobrança de uma fatura.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionOutcome {
    pub invoice: Invoice,
    pub movement: Movement,
    pub campaign_ids: Vec<Uuid>,
    // Já estava cobrada antes desta chamada (duplo clique)
    pub was_collected: bool,
}

impl RecordStore {
    /// Marca a fatura como cobrada, lança a entrada no caixa e propaga o
    /// status para as campanhas vinculadas a ela.
    ///
    /// Fatura inexistente: não faz nada. Chamar duas vezes gera dois
    /// lançamentos (cada chamada é um evento de cobrança).
    pub fn mark_invoice_collected(
        &mut self,
        invoice_id: Uuid,
        account: Account,
        today: NaiveDate,
    ) -> Option<CollectionOutcome> {
        let invoice = self.invoices.iter_mut().find(|i| i.id == invoice_id)?;
        let was_collected = invoice.is_collected();
        invoice.collection_status = CollectionStatus::Collected;
        invoice.collection_date = Some(today);
        let invoice = invoice.clone();

        let movement = self.record_movement(Movement {
            id: Uuid::new_v4(),
            date: Some(today),
            kind: MovementKind::Collection,
            payer_name: invoice.payer_name.clone(),
            client_id: Some(invoice.client_id),
            amount: invoice.total(),
            account,
            invoice_id: Some(invoice.id),
            campaign_id: None,
            details: Some(format!("Cobro factura {}", invoice.reference)),
            balance_after: None,
        });

        let mut campaign_ids = Vec::new();
        for campaign in self.campaigns.iter_mut().filter(|c| c.invoice_id == Some(invoice_id)) {
            campaign.collection_status = CollectionStatus::Collected;
            campaign.collection_date = Some(today);
            campaign_ids.push(campaign.id);
        }

        Some(CollectionOutcome { invoice, movement, campaign_ids, was_collected })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::*;
    use rust_decimal::Decimal;

    #[test]
    fn unknown_invoice_is_a_no_op() {
        let mut store = RecordStore::default();
        store.insert_client(client("Acme"));
        let before = store.clone();

        let outcome = store.mark_invoice_collected(Uuid::new_v4(), Account::PayPal, day(2024, 11, 30));

        assert!(outcome.is_none());
        assert_eq!(store, before);
    }

    #[test]
    fn collecting_emits_a_movement_and_updates_linked_campaigns() {
        let mut store = RecordStore::default();
        let acme = store.insert_client(client("Acme"));
        let linked = store.insert_campaign(Uuid::new_v4(), campaign_draft(acme.id, 1200)).unwrap();
        let other = store.insert_campaign(Uuid::new_v4(), campaign_draft(acme.id, 400)).unwrap();
        let mut draft = invoice_draft(acme.id, "2024-017", 1200, day(2024, 11, 20));
        draft.campaign_ids = vec![linked.id];
        let invoice = store.issue_invoice(Uuid::new_v4(), draft).unwrap();

        let today = day(2024, 11, 30);
        let outcome = store
            .mark_invoice_collected(invoice.id, Account::CorporateAccount, today)
            .unwrap();

        assert_eq!(outcome.invoice.collection_status, CollectionStatus::Collected);
        assert_eq!(outcome.invoice.collection_date, Some(today));
        assert_eq!(outcome.movement.amount, Decimal::new(1452, 0));
        assert_eq!(outcome.movement.kind, MovementKind::Collection);
        assert_eq!(outcome.movement.payer_name, "Acme S.L.");
        assert_eq!(outcome.movement.invoice_id, Some(invoice.id));
        assert_eq!(outcome.campaign_ids, vec![linked.id]);
        assert!(!outcome.was_collected);

        assert_eq!(store.campaign(linked.id).unwrap().collection_status, CollectionStatus::Collected);
        assert_eq!(store.campaign(other.id).unwrap().collection_status, CollectionStatus::NotCollected);
        assert_eq!(store.balance_of(Account::CorporateAccount), Decimal::new(1452, 0));
    }

    #[test]
    fn campaigns_are_matched_by_id_not_by_reference_text() {
        let mut store = RecordStore::default();
        let acme = store.insert_client(client("Acme"));
        let invoice = store
            .issue_invoice(Uuid::new_v4(), invoice_draft(acme.id, "2024-020", 100, day(2024, 5, 1)))
            .unwrap();
        // Campanha com o mesmo número escrito no comentário, mas sem vínculo
        let mut draft = campaign_draft(acme.id, 100);
        draft.comments = Some("2024-020".into());
        let loose = store.insert_campaign(Uuid::new_v4(), draft).unwrap();

        store.mark_invoice_collected(invoice.id, Account::PayPal, day(2024, 5, 2));

        assert_eq!(store.campaign(loose.id).unwrap().collection_status, CollectionStatus::NotCollected);
    }

    #[test]
    fn double_submission_appends_two_ledger_entries() {
        let mut store = RecordStore::default();
        let acme = store.insert_client(client("Acme"));
        let invoice = store
            .issue_invoice(Uuid::new_v4(), invoice_draft(acme.id, "2024-030", 1000, day(2024, 6, 1)))
            .unwrap();

        let first = store.mark_invoice_collected(invoice.id, Account::PayPal, day(2024, 6, 2)).unwrap();
        let second = store.mark_invoice_collected(invoice.id, Account::PayPal, day(2024, 6, 2)).unwrap();

        assert_eq!(first.invoice.collection_status, CollectionStatus::Collected);
        assert_eq!(second.invoice.collection_status, CollectionStatus::Collected);
        assert!(second.was_collected);
        assert_eq!(store.movements.len(), 2);
        assert_eq!(store.balance_of(Account::PayPal), Decimal::new(2420, 0));
    }
}
