// src/services/ledger_service.rs

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::RecordBackend,
    models::{
        crm::{Client, LegalEntity},
        dashboard::{AccountBalances, DashboardSummary},
        finance::{Account, CollaboratorPayment, Invoice, Movement},
        operations::Campaign,
    },
    store::{
        dashboard::{account_balances, compute_dashboard, Period},
        reconciliation::CollectionOutcome,
        CampaignDraft, CampaignFilter, ChangeSet, ClientDraft, CollaboratorPaymentDraft, InvoiceDraft,
        LegalEntityDraft, MovementDraft, Record, RecordStore,
    },
};

/// Dono do estado em memória. Todo comando passa pelo mesmo mutex
/// (um escritor por vez) e só troca o estado depois que o backend confirma.
#[derive(Clone)]
pub struct LedgerService {
    state: Arc<Mutex<RecordStore>>,
    backend: Arc<dyn RecordBackend>,
}

impl LedgerService {
    /// Carrega o estado inicial do backend.
    pub async fn bootstrap(backend: Arc<dyn RecordBackend>) -> Result<Self, AppError> {
        let records = backend.load().await?;
        tracing::info!(
            "📒 Estado carregado do backend '{}': {} clientes, {} campanhas, {} faturas, {} movimentos",
            backend.name(),
            records.clients.len(),
            records.campaigns.len(),
            records.invoices.len(),
            records.movements.len(),
        );

        Ok(Self { state: Arc::new(Mutex::new(records)), backend })
    }

    async fn read<T>(&self, view: impl FnOnce(&RecordStore) -> T) -> T {
        let store = self.state.lock().await;
        view(&store)
    }

    /// Aplica o comando numa cópia, persiste a diferença chamada a chamada e
    /// só então substitui o estado. Qualquer erro deixa o estado como estava.
    async fn commit<T, F>(&self, operation: &'static str, change: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut RecordStore) -> Result<T, AppError>,
    {
        let mut store = self.state.lock().await;
        let mut draft = store.clone();
        let out = change(&mut draft)?;

        let changes = ChangeSet::between(&store, &draft);
        if changes.is_empty() {
            return Ok(out);
        }

        tracing::debug!(operation, calls = changes.call_count(), "Persistindo alterações");
        if let Err(e) = self.persist(&changes, &mut draft).await {
            tracing::error!(
                operation,
                backend = self.backend.name(),
                "Falha ao persistir, estado mantido: {}",
                e
            );
            return Err(e);
        }

        *store = draft;
        Ok(out)
    }

    // Inserções e atualizações primeiro (pais antes dos filhos), exclusões no fim
    // (filhos antes dos pais). Sem transação: cada chamada é independente.
    async fn persist(&self, changes: &ChangeSet, draft: &mut RecordStore) -> Result<(), AppError> {
        let backend = self.backend.as_ref();

        for row in &changes.clients.inserted {
            confirm(&mut draft.clients, backend.insert_client(row).await?);
        }
        for row in &changes.clients.updated {
            confirm(&mut draft.clients, backend.update_client(row).await?);
        }
        for row in &changes.legal_entities.inserted {
            confirm(&mut draft.legal_entities, backend.insert_legal_entity(row).await?);
        }
        for row in &changes.legal_entities.updated {
            confirm(&mut draft.legal_entities, backend.update_legal_entity(row).await?);
        }
        for row in &changes.invoices.inserted {
            confirm(&mut draft.invoices, backend.insert_invoice(row).await?);
        }
        for row in &changes.invoices.updated {
            confirm(&mut draft.invoices, backend.update_invoice(row).await?);
        }
        for row in &changes.movements {
            confirm(&mut draft.movements, backend.insert_movement(row).await?);
        }
        for row in &changes.campaigns.inserted {
            confirm(&mut draft.campaigns, backend.insert_campaign(row).await?);
        }
        for row in &changes.campaigns.updated {
            confirm(&mut draft.campaigns, backend.update_campaign(row).await?);
        }
        for row in &changes.collaborator_payments.inserted {
            confirm(&mut draft.collaborator_payments, backend.insert_collaborator_payment(row).await?);
        }
        for row in &changes.collaborator_payments.updated {
            confirm(&mut draft.collaborator_payments, backend.update_collaborator_payment(row).await?);
        }

        for id in &changes.collaborator_payments.deleted {
            backend.delete_collaborator_payment(*id).await?;
        }
        for id in &changes.campaigns.deleted {
            backend.delete_campaign(*id).await?;
        }
        for id in &changes.invoices.deleted {
            backend.delete_invoice(*id).await?;
        }
        for id in &changes.legal_entities.deleted {
            backend.delete_legal_entity(*id).await?;
        }
        for id in &changes.clients.deleted {
            backend.delete_client(*id).await?;
        }
        Ok(())
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub async fn list_clients(&self) -> Vec<Client> {
        self.read(|s| s.clients.clone()).await
    }

    pub async fn get_client(&self, id: Uuid) -> Result<Client, AppError> {
        self.read(|s| s.client(id).cloned()).await
    }

    pub async fn create_client(&self, draft: ClientDraft) -> Result<Client, AppError> {
        let client = draft.into_client(Uuid::new_v4());
        self.commit("create_client", |s| Ok(s.insert_client(client))).await
    }

    pub async fn update_client(&self, id: Uuid, draft: ClientDraft) -> Result<Client, AppError> {
        self.commit("update_client", |s| s.update_client(draft.into_client(id))).await
    }

    /// Recusa (409) antes de qualquer chamada ao backend se houver campanhas.
    pub async fn delete_client(&self, id: Uuid) -> Result<(), AppError> {
        self.commit("delete_client", |s| s.delete_client(id).map(|_| ())).await
    }

    pub async fn list_legal_entities(&self, client_id: Uuid) -> Result<Vec<LegalEntity>, AppError> {
        self.read(|s| {
            s.client(client_id)?;
            Ok(s.legal_entities_of(client_id))
        })
        .await
    }

    pub async fn create_legal_entity(
        &self,
        client_id: Uuid,
        draft: LegalEntityDraft,
    ) -> Result<LegalEntity, AppError> {
        let entity = draft.into_legal_entity(Uuid::new_v4(), client_id);
        self.commit("create_legal_entity", |s| s.insert_legal_entity(entity)).await
    }

    pub async fn update_legal_entity(
        &self,
        client_id: Uuid,
        id: Uuid,
        draft: LegalEntityDraft,
    ) -> Result<LegalEntity, AppError> {
        let entity = draft.into_legal_entity(id, client_id);
        self.commit("update_legal_entity", |s| s.update_legal_entity(entity)).await
    }

    pub async fn delete_legal_entity(&self, client_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.commit("delete_legal_entity", |s| s.delete_legal_entity(client_id, id).map(|_| ()))
            .await
    }

    // =========================================================================
    //  CAMPANHAS
    // =========================================================================

    pub async fn list_campaigns(&self, filter: CampaignFilter) -> Vec<Campaign> {
        self.read(|s| s.filter_campaigns(&filter)).await
    }

    pub async fn get_campaign(&self, id: Uuid) -> Result<Campaign, AppError> {
        self.read(|s| s.campaign(id).cloned()).await
    }

    pub async fn create_campaign(&self, draft: CampaignDraft) -> Result<Campaign, AppError> {
        self.commit("create_campaign", |s| s.insert_campaign(Uuid::new_v4(), draft)).await
    }

    pub async fn update_campaign(&self, id: Uuid, draft: CampaignDraft) -> Result<Campaign, AppError> {
        self.commit("update_campaign", |s| s.update_campaign(id, draft)).await
    }

    pub async fn delete_campaign(&self, id: Uuid) -> Result<(), AppError> {
        self.commit("delete_campaign", |s| s.delete_campaign(id).map(|_| ())).await
    }

    // =========================================================================
    //  FATURAS
    // =========================================================================

    pub async fn list_invoices(&self) -> Vec<Invoice> {
        self.read(|s| s.invoices.clone()).await
    }

    pub async fn get_invoice(&self, id: Uuid) -> Result<Invoice, AppError> {
        self.read(|s| s.invoice(id).cloned()).await
    }

    /// Fatura + nome de exibição do cliente, para o PDF.
    pub async fn invoice_with_client_name(&self, id: Uuid) -> Result<(Invoice, Option<String>), AppError> {
        self.read(|s| {
            let invoice = s.invoice(id)?.clone();
            let client_name = s.client(invoice.client_id).ok().map(|c| c.display_name.clone());
            Ok((invoice, client_name))
        })
        .await
    }

    pub async fn create_invoice(&self, draft: InvoiceDraft) -> Result<Invoice, AppError> {
        self.commit("create_invoice", |s| s.issue_invoice(Uuid::new_v4(), draft)).await
    }

    pub async fn update_invoice(&self, id: Uuid, draft: InvoiceDraft) -> Result<Invoice, AppError> {
        self.commit("update_invoice", |s| s.revise_invoice(id, draft)).await
    }

    pub async fn delete_invoice(&self, id: Uuid) -> Result<(), AppError> {
        self.commit("delete_invoice", |s| s.delete_invoice(id).map(|_| ())).await
    }

    /// Cobrança de fatura. `None` quando a fatura não existe (nada acontece).
    pub async fn collect_invoice(
        &self,
        invoice_id: Uuid,
        account: Account,
        on: NaiveDate,
    ) -> Result<Option<CollectionOutcome>, AppError> {
        let outcome = self
            .commit("collect_invoice", |s| Ok(s.mark_invoice_collected(invoice_id, account, on)))
            .await?;

        match &outcome {
            None => tracing::debug!(%invoice_id, "Cobrança ignorada: fatura inexistente"),
            Some(o) if o.was_collected => tracing::warn!(
                %invoice_id,
                "Fatura {} já estava cobrada; novo lançamento registrado",
                o.invoice.reference
            ),
            Some(o) => tracing::info!(
                %invoice_id,
                campaigns = o.campaign_ids.len(),
                "Fatura {} cobrada",
                o.invoice.reference
            ),
        }
        Ok(outcome)
    }

    // =========================================================================
    //  MOVIMENTOS
    // =========================================================================

    pub async fn list_movements(&self) -> Vec<Movement> {
        self.read(|s| s.movements.clone()).await
    }

    pub async fn record_movement(&self, draft: MovementDraft) -> Result<Movement, AppError> {
        self.commit("record_movement", |s| s.register_movement(Uuid::new_v4(), draft)).await
    }

    pub async fn balances(&self) -> AccountBalances {
        self.read(account_balances).await
    }

    // =========================================================================
    //  PAGAMENTOS AO COLABORADOR
    // =========================================================================

    pub async fn list_collaborator_payments(&self) -> Vec<CollaboratorPayment> {
        self.read(|s| s.collaborator_payments.clone()).await
    }

    pub async fn create_collaborator_payment(
        &self,
        draft: CollaboratorPaymentDraft,
    ) -> Result<CollaboratorPayment, AppError> {
        self.commit("create_collaborator_payment", |s| {
            s.insert_collaborator_payment(Uuid::new_v4(), draft)
        })
        .await
    }

    pub async fn associate_campaigns(
        &self,
        payment_id: Uuid,
        campaign_ids: Vec<Uuid>,
    ) -> Result<CollaboratorPayment, AppError> {
        self.commit("associate_campaigns", |s| s.associate_campaigns(payment_id, &campaign_ids))
            .await
    }

    pub async fn delete_collaborator_payment(&self, id: Uuid) -> Result<(), AppError> {
        self.commit("delete_collaborator_payment", |s| {
            s.delete_collaborator_payment(id).map(|_| ())
        })
        .await
    }

    // =========================================================================
    //  PAINEL
    // =========================================================================

    pub async fn dashboard(&self, period: Period) -> DashboardSummary {
        self.read(|s| compute_dashboard(s, period)).await
    }
}

// A linha devolvida pelo backend substitui a que foi enviada
fn confirm<T: Record>(rows: &mut [T], saved: T) {
    if let Some(slot) = rows.iter_mut().find(|r| r.id() == saved.id()) {
        *slot = saved;
    }
}
