// src/store.rs

//! Estado em memória do escritório: clientes, campanhas, faturas,
//! movimentos de caixa e pagamentos ao colaborador.
//!
//! Tudo aqui é síncrono e puro. Quem fala com o banco são os serviços,
//! que aplicam a mudança numa cópia (`clone`), persistem o `ChangeSet`
//! resultante e só então trocam o estado.

pub mod changes;
pub mod dashboard;
pub mod ledger;
pub mod reconciliation;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    common::error::{AppError, Entity},
    models::{
        crm::{Client, LegalEntity, PayerIdentity},
        finance::{tax_for, Account, CollaboratorPayment, CollectionStatus, Invoice, Movement, MovementKind},
        operations::{ActionCounts, BillingMethod, Campaign, CampaignStatus, InvoicingStatus},
    },
};

pub use changes::{ChangeSet, Record, TableChanges};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordStore {
    pub clients: Vec<Client>,
    pub legal_entities: Vec<LegalEntity>,
    pub campaigns: Vec<Campaign>,
    pub invoices: Vec<Invoice>,
    pub movements: Vec<Movement>,
    pub collaborator_payments: Vec<CollaboratorPayment>,
}

// --- Entradas dos comandos (o ID é gerado por quem chama) ---

#[derive(Debug, Clone)]
pub struct ClientDraft {
    pub display_name: String,
    pub payer_legal_name: String,
    pub tax_id: Option<String>,
    pub address: Option<String>,
}

impl ClientDraft {
    pub fn into_client(self, id: Uuid) -> Client {
        Client {
            id,
            display_name: self.display_name.trim().to_string(),
            payer_legal_name: self.payer_legal_name.trim().to_string(),
            tax_id: self.tax_id,
            address: self.address,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LegalEntityDraft {
    pub legal_name: String,
    pub tax_id: Option<String>,
    pub address: Option<String>,
}

impl LegalEntityDraft {
    pub fn into_legal_entity(self, id: Uuid, client_id: Uuid) -> LegalEntity {
        LegalEntity {
            id,
            client_id,
            legal_name: self.legal_name.trim().to_string(),
            tax_id: self.tax_id,
            address: self.address,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CampaignDraft {
    pub creation_date: NaiveDate,
    pub client_id: Uuid,
    pub actions: ActionCounts,
    pub price: Decimal,
    pub collaborator_fee: Decimal,
    pub comments: Option<String>,
    pub status: CampaignStatus,
    pub billing_method: BillingMethod,
    // Edição manual pode forçar qualquer status
    pub invoicing_status: Option<InvoicingStatus>,
    pub collection_status: Option<CollectionStatus>,
    pub collection_date: Option<NaiveDate>,
    pub invoice_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    pub date: NaiveDate,
    pub reference: String,
    pub client_id: Uuid,
    // Fatura emitida em nome de outra razão social do cliente
    pub legal_entity_id: Option<Uuid>,
    pub base_price: Decimal,
    pub description: Option<String>,
    pub campaign_ids: Vec<Uuid>,
    pub collection_status: Option<CollectionStatus>,
    pub collection_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct MovementDraft {
    pub date: NaiveDate,
    pub kind: MovementKind,
    pub payer_name: String,
    pub client_id: Option<Uuid>,
    pub amount: Decimal,
    pub account: Account,
    pub invoice_id: Option<Uuid>,
    pub campaign_id: Option<Uuid>,
    pub details: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CollaboratorPaymentDraft {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub reference: Option<String>,
    pub payment_method: Option<String>,
    pub campaign_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct CampaignFilter {
    pub client_id: Option<Uuid>,
    pub unpaid_collaborator: Option<bool>,
}

impl RecordStore {
    // =========================================================================
    //  CONSULTAS
    // =========================================================================

    pub fn client(&self, id: Uuid) -> Result<&Client, AppError> {
        self.clients
            .iter()
            .find(|c| c.id == id)
            .ok_or(AppError::not_found(Entity::Client, id))
    }

    pub fn campaign(&self, id: Uuid) -> Result<&Campaign, AppError> {
        self.campaigns
            .iter()
            .find(|c| c.id == id)
            .ok_or(AppError::not_found(Entity::Campaign, id))
    }

    pub fn invoice(&self, id: Uuid) -> Result<&Invoice, AppError> {
        self.invoices
            .iter()
            .find(|i| i.id == id)
            .ok_or(AppError::not_found(Entity::Invoice, id))
    }

    pub fn collaborator_payment(&self, id: Uuid) -> Result<&CollaboratorPayment, AppError> {
        self.collaborator_payments
            .iter()
            .find(|p| p.id == id)
            .ok_or(AppError::not_found(Entity::CollaboratorPayment, id))
    }

    pub fn legal_entities_of(&self, client_id: Uuid) -> Vec<LegalEntity> {
        self.legal_entities
            .iter()
            .filter(|e| e.client_id == client_id)
            .cloned()
            .collect()
    }

    /// Campanha só conta como paga ao colaborador depois de associada a um pagamento.
    pub fn is_paid_to_collaborator(&self, campaign_id: Uuid) -> bool {
        self.collaborator_payments
            .iter()
            .any(|p| p.campaign_ids.contains(&campaign_id))
    }

    pub fn filter_campaigns(&self, filter: &CampaignFilter) -> Vec<Campaign> {
        self.campaigns
            .iter()
            .filter(|c| filter.client_id.is_none_or(|id| c.client_id == id))
            .filter(|c| {
                filter
                    .unpaid_collaborator
                    .is_none_or(|unpaid| unpaid != self.is_paid_to_collaborator(c.id))
            })
            .cloned()
            .collect()
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub fn insert_client(&mut self, client: Client) -> Client {
        self.clients.push(client.clone());
        client
    }

    pub fn update_client(&mut self, client: Client) -> Result<Client, AppError> {
        let slot = self
            .clients
            .iter_mut()
            .find(|c| c.id == client.id)
            .ok_or(AppError::not_found(Entity::Client, client.id))?;
        *slot = client.clone();
        Ok(client)
    }

    /// Bloqueia a exclusão enquanto houver campanhas apontando para o cliente.
    pub fn ensure_client_deletable(&self, id: Uuid) -> Result<(), AppError> {
        self.client(id)?;
        let campaigns = self.campaigns.iter().filter(|c| c.client_id == id).count();
        if campaigns > 0 {
            return Err(AppError::ClientHasCampaigns { client_id: id, campaigns });
        }
        Ok(())
    }

    pub fn delete_client(&mut self, id: Uuid) -> Result<Client, AppError> {
        self.ensure_client_deletable(id)?;
        self.legal_entities.retain(|e| e.client_id != id);
        let position = self
            .clients
            .iter()
            .position(|c| c.id == id)
            .ok_or(AppError::not_found(Entity::Client, id))?;
        Ok(self.clients.remove(position))
    }

    pub fn insert_legal_entity(&mut self, entity: LegalEntity) -> Result<LegalEntity, AppError> {
        self.client(entity.client_id)?;
        self.legal_entities.push(entity.clone());
        Ok(entity)
    }

    pub fn update_legal_entity(&mut self, entity: LegalEntity) -> Result<LegalEntity, AppError> {
        let slot = self
            .legal_entities
            .iter_mut()
            .find(|e| e.id == entity.id && e.client_id == entity.client_id)
            .ok_or(AppError::not_found(Entity::LegalEntity, entity.id))?;
        *slot = entity.clone();
        Ok(entity)
    }

    pub fn delete_legal_entity(&mut self, client_id: Uuid, id: Uuid) -> Result<LegalEntity, AppError> {
        let position = self
            .legal_entities
            .iter()
            .position(|e| e.id == id && e.client_id == client_id)
            .ok_or(AppError::not_found(Entity::LegalEntity, id))?;
        Ok(self.legal_entities.remove(position))
    }

    fn payer_for(&self, client_id: Uuid, legal_entity_id: Option<Uuid>) -> Result<PayerIdentity, AppError> {
        let client = self.client(client_id)?;
        match legal_entity_id {
            None => Ok(PayerIdentity::from(client)),
            Some(entity_id) => self
                .legal_entities
                .iter()
                .find(|e| e.id == entity_id && e.client_id == client_id)
                .map(PayerIdentity::from)
                .ok_or(AppError::not_found(Entity::LegalEntity, entity_id)),
        }
    }

    // =========================================================================
    //  CAMPANHAS
    // =========================================================================

    fn build_campaign(&self, id: Uuid, draft: CampaignDraft) -> Result<Campaign, AppError> {
        self.client(draft.client_id)?;
        if let Some(invoice_id) = draft.invoice_id {
            self.invoice(invoice_id)?;
        }

        let invoicing_status = draft.invoicing_status.unwrap_or(match draft.invoice_id {
            Some(_) => InvoicingStatus::Invoiced,
            None => InvoicingStatus::NotInvoiced,
        });

        Ok(Campaign {
            id,
            creation_date: Some(draft.creation_date),
            client_id: draft.client_id,
            actions: draft.actions,
            price: draft.price,
            collaborator_fee: draft.collaborator_fee,
            comments: draft.comments,
            status: draft.status,
            billing_method: draft.billing_method,
            invoicing_status,
            collection_status: draft.collection_status.unwrap_or(CollectionStatus::NotCollected),
            collection_date: draft.collection_date,
            invoice_id: draft.invoice_id,
        })
    }

    pub fn insert_campaign(&mut self, id: Uuid, draft: CampaignDraft) -> Result<Campaign, AppError> {
        let campaign = self.build_campaign(id, draft)?;
        self.campaigns.push(campaign.clone());
        Ok(campaign)
    }

    pub fn update_campaign(&mut self, id: Uuid, draft: CampaignDraft) -> Result<Campaign, AppError> {
        let current = self.campaign(id)?.clone();
        let keep_collection = draft.collection_status.is_none();
        let mut campaign = self.build_campaign(id, draft)?;
        // Sem status explícito, a cobrança registrada permanece
        if keep_collection {
            campaign.collection_status = current.collection_status;
            campaign.collection_date = current.collection_date;
        }
        if let Some(slot) = self.campaigns.iter_mut().find(|c| c.id == id) {
            *slot = campaign.clone();
        }
        Ok(campaign)
    }

    pub fn delete_campaign(&mut self, id: Uuid) -> Result<Campaign, AppError> {
        let position = self
            .campaigns
            .iter()
            .position(|c| c.id == id)
            .ok_or(AppError::not_found(Entity::Campaign, id))?;
        for payment in &mut self.collaborator_payments {
            payment.campaign_ids.retain(|c| *c != id);
        }
        Ok(self.campaigns.remove(position))
    }

    // =========================================================================
    //  FATURAS
    // =========================================================================

    fn ensure_unique_reference(&self, reference: &str, except: Option<Uuid>) -> Result<(), AppError> {
        let taken = self
            .invoices
            .iter()
            .any(|i| i.reference == reference && Some(i.id) != except);
        if taken {
            return Err(AppError::DuplicateInvoiceReference(reference.to_string()));
        }
        Ok(())
    }

    fn link_campaigns(&mut self, invoice_id: Uuid, campaign_ids: &[Uuid]) -> Result<(), AppError> {
        for campaign_id in campaign_ids {
            self.campaign(*campaign_id)?;
        }

        for campaign in &mut self.campaigns {
            let wanted = campaign_ids.contains(&campaign.id);
            if wanted && campaign.invoice_id != Some(invoice_id) {
                campaign.invoice_id = Some(invoice_id);
                campaign.invoicing_status = InvoicingStatus::Invoiced;
            } else if !wanted && campaign.invoice_id == Some(invoice_id) {
                campaign.invoice_id = None;
                campaign.invoicing_status = InvoicingStatus::NotInvoiced;
            }
        }
        Ok(())
    }

    fn build_invoice(&self, id: Uuid, draft: &InvoiceDraft) -> Result<Invoice, AppError> {
        let reference = draft.reference.trim().to_string();
        self.ensure_unique_reference(&reference, Some(id))?;
        let payer = self.payer_for(draft.client_id, draft.legal_entity_id)?;

        Ok(Invoice {
            id,
            date: Some(draft.date),
            reference,
            client_id: draft.client_id,
            payer_name: payer.name,
            payer_tax_id: payer.tax_id,
            payer_address: payer.address,
            base_price: draft.base_price,
            // Imposto sempre recalculado quando o formulário é reenviado
            tax_amount: tax_for(draft.base_price),
            collection_status: draft.collection_status.unwrap_or(CollectionStatus::NotCollected),
            collection_date: draft.collection_date,
            description: draft.description.clone(),
        })
    }

    /// Emite a fatura, copia o pagador e marca as campanhas como faturadas.
    pub fn issue_invoice(&mut self, id: Uuid, draft: InvoiceDraft) -> Result<Invoice, AppError> {
        let invoice = self.build_invoice(id, &draft)?;
        self.link_campaigns(id, &draft.campaign_ids)?;
        self.invoices.push(invoice.clone());
        Ok(invoice)
    }

    pub fn revise_invoice(&mut self, id: Uuid, draft: InvoiceDraft) -> Result<Invoice, AppError> {
        let current = self.invoice(id)?.clone();
        let mut invoice = self.build_invoice(id, &draft)?;
        // Sem status explícito, a revisão não desfaz uma cobrança
        if draft.collection_status.is_none() {
            invoice.collection_status = current.collection_status;
            invoice.collection_date = draft.collection_date.or(current.collection_date);
        }
        self.link_campaigns(id, &draft.campaign_ids)?;
        if let Some(slot) = self.invoices.iter_mut().find(|i| i.id == id) {
            *slot = invoice.clone();
        }
        Ok(invoice)
    }

    pub fn delete_invoice(&mut self, id: Uuid) -> Result<Invoice, AppError> {
        let position = self
            .invoices
            .iter()
            .position(|i| i.id == id)
            .ok_or(AppError::not_found(Entity::Invoice, id))?;
        self.link_campaigns(id, &[])?;
        Ok(self.invoices.remove(position))
    }

    // =========================================================================
    //  MOVIMENTOS
    // =========================================================================

    /// Lançamento manual: valida os vínculos e, se for recebimento via PayPal
    /// de uma campanha, já a marca como cobrada.
    pub fn register_movement(&mut self, id: Uuid, draft: MovementDraft) -> Result<Movement, AppError> {
        if let Some(client_id) = draft.client_id {
            self.client(client_id)?;
        }
        if let Some(invoice_id) = draft.invoice_id {
            self.invoice(invoice_id)?;
        }
        if let Some(campaign_id) = draft.campaign_id {
            self.campaign(campaign_id)?;
        }

        let movement = self.record_movement(Movement {
            id,
            date: Some(draft.date),
            kind: draft.kind,
            payer_name: draft.payer_name,
            client_id: draft.client_id,
            amount: draft.amount,
            account: draft.account,
            invoice_id: draft.invoice_id,
            campaign_id: draft.campaign_id,
            details: draft.details,
            balance_after: None,
        });

        let settles_campaign =
            movement.kind == MovementKind::Collection && movement.account == Account::PayPal;
        if let (true, Some(campaign_id)) = (settles_campaign, movement.campaign_id) {
            if let Some(campaign) = self.campaigns.iter_mut().find(|c| c.id == campaign_id) {
                campaign.collection_status = CollectionStatus::Collected;
                campaign.collection_date = movement.date;
            }
        }

        Ok(movement)
    }

    // =========================================================================
    //  PAGAMENTOS AO COLABORADOR
    // =========================================================================

    pub fn insert_collaborator_payment(
        &mut self,
        id: Uuid,
        draft: CollaboratorPaymentDraft,
    ) -> Result<CollaboratorPayment, AppError> {
        for campaign_id in &draft.campaign_ids {
            self.campaign(*campaign_id)?;
        }
        let mut campaign_ids = draft.campaign_ids;
        campaign_ids.sort();
        campaign_ids.dedup();

        let payment = CollaboratorPayment {
            id,
            date: Some(draft.date),
            amount: draft.amount,
            reference: draft.reference,
            payment_method: draft.payment_method,
            campaign_ids,
        };
        self.collaborator_payments.push(payment.clone());
        Ok(payment)
    }

    /// Associação explícita pagamento ↔ campanhas (idempotente).
    pub fn associate_campaigns(
        &mut self,
        payment_id: Uuid,
        campaign_ids: &[Uuid],
    ) -> Result<CollaboratorPayment, AppError> {
        self.collaborator_payment(payment_id)?;
        for campaign_id in campaign_ids {
            self.campaign(*campaign_id)?;
        }

        let payment = self
            .collaborator_payments
            .iter_mut()
            .find(|p| p.id == payment_id)
            .ok_or(AppError::not_found(Entity::CollaboratorPayment, payment_id))?;
        for campaign_id in campaign_ids {
            if !payment.campaign_ids.contains(campaign_id) {
                payment.campaign_ids.push(*campaign_id);
            }
        }
        payment.campaign_ids.sort();
        Ok(payment.clone())
    }

    pub fn delete_collaborator_payment(&mut self, id: Uuid) -> Result<CollaboratorPayment, AppError> {
        let position = self
            .collaborator_payments
            .iter()
            .position(|p| p.id == id)
            .ok_or(AppError::not_found(Entity::CollaboratorPayment, id))?;
        Ok(self.collaborator_payments.remove(position))
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn client_with_campaigns_cannot_be_deleted() {
        let mut store = RecordStore::default();
        let acme = store.insert_client(client("Acme"));
        store.insert_campaign(Uuid::new_v4(), campaign_draft(acme.id, 850)).unwrap();

        let err = store.delete_client(acme.id).unwrap_err();
        assert!(matches!(err, AppError::ClientHasCampaigns { campaigns: 1, .. }));
        assert_eq!(store.clients.len(), 1);
    }

    #[test]
    fn deleting_a_client_drops_its_legal_entities() {
        let mut store = RecordStore::default();
        let acme = store.insert_client(client("Acme"));
        store
            .insert_legal_entity(LegalEntity {
                id: Uuid::new_v4(),
                client_id: acme.id,
                legal_name: "Acme Records".into(),
                tax_id: None,
                address: None,
            })
            .unwrap();

        store.delete_client(acme.id).unwrap();
        assert!(store.clients.is_empty());
        assert!(store.legal_entities.is_empty());
    }

    #[test]
    fn issuing_an_invoice_snapshots_the_payer_and_computes_tax() {
        let mut store = RecordStore::default();
        let acme = store.insert_client(client("Acme"));
        let invoice = store
            .issue_invoice(Uuid::new_v4(), invoice_draft(acme.id, "2024-001", 1000, day(2024, 11, 20)))
            .unwrap();

        assert_eq!(invoice.tax_amount, Decimal::new(21000, 2));
        assert_eq!(invoice.total(), Decimal::new(121000, 2));
        assert_eq!(invoice.payer_name, "Acme S.L.");

        // Mudar o cliente depois não mexe na fatura emitida
        let mut renamed = acme.clone();
        renamed.payer_legal_name = "Otra S.L.".into();
        store.update_client(renamed).unwrap();
        assert_eq!(store.invoice(invoice.id).unwrap().payer_name, "Acme S.L.");
    }

    #[test]
    fn invoice_can_be_billed_to_another_legal_entity() {
        let mut store = RecordStore::default();
        let acme = store.insert_client(client("Acme"));
        let label = store
            .insert_legal_entity(LegalEntity {
                id: Uuid::new_v4(),
                client_id: acme.id,
                legal_name: "Acme Records".into(),
                tax_id: Some("B99999999".into()),
                address: None,
            })
            .unwrap();

        let mut draft = invoice_draft(acme.id, "2024-002", 500, day(2024, 11, 21));
        draft.legal_entity_id = Some(label.id);
        let invoice = store.issue_invoice(Uuid::new_v4(), draft).unwrap();

        assert_eq!(invoice.payer_name, "Acme Records");
        assert_eq!(invoice.payer_tax_id.as_deref(), Some("B99999999"));
    }

    #[test]
    fn duplicate_references_are_rejected() {
        let mut store = RecordStore::default();
        let acme = store.insert_client(client("Acme"));
        store
            .issue_invoice(Uuid::new_v4(), invoice_draft(acme.id, "2024-001", 100, day(2024, 1, 1)))
            .unwrap();

        let err = store
            .issue_invoice(Uuid::new_v4(), invoice_draft(acme.id, " 2024-001 ", 100, day(2024, 1, 2)))
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateInvoiceReference(r) if r == "2024-001"));
        assert_eq!(store.invoices.len(), 1);
    }

    #[test]
    fn invoice_links_and_unlinks_campaigns_by_id() {
        let mut store = RecordStore::default();
        let acme = store.insert_client(client("Acme"));
        let first = store.insert_campaign(Uuid::new_v4(), campaign_draft(acme.id, 850)).unwrap();
        let second = store.insert_campaign(Uuid::new_v4(), campaign_draft(acme.id, 400)).unwrap();

        let mut draft = invoice_draft(acme.id, "2024-010", 1250, day(2024, 11, 20));
        draft.campaign_ids = vec![first.id, second.id];
        let invoice_id = Uuid::new_v4();
        store.issue_invoice(invoice_id, draft.clone()).unwrap();
        assert!(store.campaigns.iter().all(|c| c.invoice_id == Some(invoice_id)));
        assert!(store.campaigns.iter().all(|c| c.invoicing_status == InvoicingStatus::Invoiced));

        draft.campaign_ids = vec![first.id];
        store.revise_invoice(invoice_id, draft).unwrap();
        assert_eq!(store.campaign(second.id).unwrap().invoice_id, None);
        assert_eq!(
            store.campaign(second.id).unwrap().invoicing_status,
            InvoicingStatus::NotInvoiced
        );

        store.delete_invoice(invoice_id).unwrap();
        assert!(store.campaigns.iter().all(|c| c.invoice_id.is_none()));
    }

    #[test]
    fn revising_recomputes_tax_but_keeps_collection() {
        let mut store = RecordStore::default();
        let acme = store.insert_client(client("Acme"));
        let id = Uuid::new_v4();
        store
            .issue_invoice(id, invoice_draft(acme.id, "2024-003", 1000, day(2024, 3, 1)))
            .unwrap();
        store.mark_invoice_collected(id, Account::CorporateAccount, day(2024, 3, 10));

        let revised = store
            .revise_invoice(id, invoice_draft(acme.id, "2024-003", 2000, day(2024, 3, 1)))
            .unwrap();
        assert_eq!(revised.tax_amount, Decimal::new(42000, 2));
        assert_eq!(revised.collection_status, CollectionStatus::Collected);
        assert_eq!(revised.collection_date, Some(day(2024, 3, 10)));
    }

    #[test]
    fn editing_a_collected_campaign_keeps_its_collection() {
        let mut store = RecordStore::default();
        let acme = store.insert_client(client("Acme"));
        let campaign = store.insert_campaign(Uuid::new_v4(), campaign_draft(acme.id, 1000)).unwrap();
        let invoice_id = Uuid::new_v4();
        let mut draft = invoice_draft(acme.id, "2024-020", 1000, day(2024, 11, 20));
        draft.campaign_ids = vec![campaign.id];
        store.issue_invoice(invoice_id, draft).unwrap();
        store.mark_invoice_collected(invoice_id, Account::CorporateAccount, day(2024, 11, 30));

        let mut edit = campaign_draft(acme.id, 1000);
        edit.comments = Some("Segunda ronda de radio".into());
        edit.invoice_id = Some(invoice_id);
        let edited = store.update_campaign(campaign.id, edit).unwrap();

        assert_eq!(edited.comments.as_deref(), Some("Segunda ronda de radio"));
        assert_eq!(edited.collection_status, CollectionStatus::Collected);
        assert_eq!(edited.collection_date, Some(day(2024, 11, 30)));
        assert_eq!(
            store.invoice(invoice_id).unwrap().collection_status,
            CollectionStatus::Collected
        );
    }

    #[test]
    fn explicit_status_on_campaign_update_wins() {
        let mut store = RecordStore::default();
        let acme = store.insert_client(client("Acme"));
        let mut draft = campaign_draft(acme.id, 500);
        draft.collection_status = Some(CollectionStatus::Collected);
        draft.collection_date = Some(day(2024, 10, 2));
        let campaign = store.insert_campaign(Uuid::new_v4(), draft).unwrap();

        let mut edit = campaign_draft(acme.id, 500);
        edit.collection_status = Some(CollectionStatus::NotCollected);
        let edited = store.update_campaign(campaign.id, edit).unwrap();
        assert_eq!(edited.collection_status, CollectionStatus::NotCollected);
        assert_eq!(edited.collection_date, None);
    }

    #[test]
    fn legal_entity_is_updated_only_under_its_client() {
        let mut store = RecordStore::default();
        let acme = store.insert_client(client("Acme"));
        let other = store.insert_client(client("Globex"));
        let label = store
            .insert_legal_entity(LegalEntity {
                id: Uuid::new_v4(),
                client_id: acme.id,
                legal_name: "Acme Records S.L.".into(),
                tax_id: None,
                address: None,
            })
            .unwrap();

        let mut renamed = label.clone();
        renamed.legal_name = "Acme Music S.L.".into();
        store.update_legal_entity(renamed).unwrap();
        assert_eq!(store.legal_entities[0].legal_name, "Acme Music S.L.");

        let mut foreign = label.clone();
        foreign.client_id = other.id;
        assert!(matches!(
            store.update_legal_entity(foreign),
            Err(AppError::NotFound { .. })
        ));
    }

    #[test]
    fn paypal_collection_settles_the_linked_campaign() {
        let mut store = RecordStore::default();
        let acme = store.insert_client(client("Acme"));
        let mut draft = campaign_draft(acme.id, 300);
        draft.billing_method = BillingMethod::PayPal;
        let campaign = store.insert_campaign(Uuid::new_v4(), draft).unwrap();

        store
            .register_movement(
                Uuid::new_v4(),
                MovementDraft {
                    date: day(2024, 11, 5),
                    kind: MovementKind::Collection,
                    payer_name: "Acme".into(),
                    client_id: Some(acme.id),
                    amount: Decimal::new(300, 0),
                    account: Account::PayPal,
                    invoice_id: None,
                    campaign_id: Some(campaign.id),
                    details: None,
                },
            )
            .unwrap();

        let settled = store.campaign(campaign.id).unwrap();
        assert_eq!(settled.collection_status, CollectionStatus::Collected);
        assert_eq!(settled.collection_date, Some(day(2024, 11, 5)));
    }

    #[test]
    fn movement_with_unknown_campaign_is_rejected() {
        let mut store = RecordStore::default();
        let err = store
            .register_movement(
                Uuid::new_v4(),
                MovementDraft {
                    date: day(2024, 11, 5),
                    kind: MovementKind::Payment,
                    payer_name: "Colaborador".into(),
                    client_id: None,
                    amount: Decimal::new(50, 0),
                    account: Account::CorporateAccount,
                    invoice_id: None,
                    campaign_id: Some(Uuid::new_v4()),
                    details: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { entity: Entity::Campaign, .. }));
        assert!(store.movements.is_empty());
    }

    #[test]
    fn collaborator_association_is_explicit() {
        let mut store = RecordStore::default();
        let acme = store.insert_client(client("Acme"));
        let campaign = store.insert_campaign(Uuid::new_v4(), campaign_draft(acme.id, 850)).unwrap();
        let payment = store
            .insert_collaborator_payment(
                Uuid::new_v4(),
                CollaboratorPaymentDraft {
                    date: day(2024, 12, 1),
                    amount: Decimal::new(150, 0),
                    reference: None,
                    payment_method: Some("Bizum".into()),
                    campaign_ids: Vec::new(),
                },
            )
            .unwrap();
        assert!(!store.is_paid_to_collaborator(campaign.id));

        let unpaid = CampaignFilter { unpaid_collaborator: Some(true), ..Default::default() };
        assert_eq!(store.filter_campaigns(&unpaid).len(), 1);

        store.associate_campaigns(payment.id, &[campaign.id, campaign.id]).unwrap();
        assert!(store.is_paid_to_collaborator(campaign.id));
        assert_eq!(store.collaborator_payment(payment.id).unwrap().campaign_ids, vec![campaign.id]);
        assert!(store.filter_campaigns(&unpaid).is_empty());

        store.delete_campaign(campaign.id).unwrap();
        assert!(store.collaborator_payment(payment.id).unwrap().campaign_ids.is_empty());
    }
}
