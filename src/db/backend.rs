// src/db/backend.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        crm::{Client, LegalEntity},
        finance::{CollaboratorPayment, Invoice, Movement},
        operations::Campaign,
    },
    store::RecordStore,
};

/// O armazenamento de linhas por tabela (CRUD simples, sem transação entre tabelas).
///
/// Cada método de escrita devolve a linha confirmada pelo backend; é ela que
/// entra no estado em memória.
#[async_trait]
pub trait RecordBackend: Send + Sync {
    /// Nome curto para logs.
    fn name(&self) -> &'static str;

    /// Carrega tudo (usado no startup).
    async fn load(&self) -> Result<RecordStore, AppError>;

    // --- Clientes ---
    async fn insert_client(&self, client: &Client) -> Result<Client, AppError>;
    async fn update_client(&self, client: &Client) -> Result<Client, AppError>;
    async fn delete_client(&self, id: Uuid) -> Result<(), AppError>;

    // --- Razões sociais ---
    async fn insert_legal_entity(&self, entity: &LegalEntity) -> Result<LegalEntity, AppError>;
    async fn update_legal_entity(&self, entity: &LegalEntity) -> Result<LegalEntity, AppError>;
    async fn delete_legal_entity(&self, id: Uuid) -> Result<(), AppError>;

    // --- Campanhas ---
    async fn insert_campaign(&self, campaign: &Campaign) -> Result<Campaign, AppError>;
    async fn update_campaign(&self, campaign: &Campaign) -> Result<Campaign, AppError>;
    async fn delete_campaign(&self, id: Uuid) -> Result<(), AppError>;

    // --- Faturas ---
    async fn insert_invoice(&self, invoice: &Invoice) -> Result<Invoice, AppError>;
    async fn update_invoice(&self, invoice: &Invoice) -> Result<Invoice, AppError>;
    async fn delete_invoice(&self, id: Uuid) -> Result<(), AppError>;

    // --- Movimentos (só acréscimo) ---
    async fn insert_movement(&self, movement: &Movement) -> Result<Movement, AppError>;

    // --- Pagamentos ao colaborador (inclui a tabela de associação) ---
    async fn insert_collaborator_payment(
        &self,
        payment: &CollaboratorPayment,
    ) -> Result<CollaboratorPayment, AppError>;
    async fn update_collaborator_payment(
        &self,
        payment: &CollaboratorPayment,
    ) -> Result<CollaboratorPayment, AppError>;
    async fn delete_collaborator_payment(&self, id: Uuid) -> Result<(), AppError>;
}
