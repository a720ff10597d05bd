// src/db/snapshot_repo.rs

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    common::error::{AppError, Entity},
    db::RecordBackend,
    models::{
        crm::{Client, LegalEntity},
        finance::{CollaboratorPayment, Invoice, Movement},
        operations::Campaign,
    },
    store::{Record, RecordStore},
};

/// "Slot" local chave-valor: o conjunto inteiro de registros serializado
/// como JSON num único arquivo, reescrito a cada alteração.
/// Sem caminho, fica só em memória (testes e modo demo).
pub struct SnapshotBackend {
    path: Option<PathBuf>,
    slot: Mutex<RecordStore>,
}

impl SnapshotBackend {
    pub fn in_memory() -> Self {
        Self { path: None, slot: Mutex::new(RecordStore::default()) }
    }

    pub fn with_records(records: RecordStore) -> Self {
        Self { path: None, slot: Mutex::new(records) }
    }

    /// Abre (ou cria vazio) o arquivo do snapshot.
    pub async fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("snapshot ilegível em {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("Snapshot {} ainda não existe, começando vazio", path.display());
                RecordStore::default()
            }
            Err(e) => return Err(e).with_context(|| format!("falha ao ler {}", path.display())),
        };

        Ok(Self { path: Some(path), slot: Mutex::new(records) })
    }

    async fn flush(&self, records: &RecordStore) -> Result<(), AppError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(records).context("falha ao serializar o snapshot")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("falha ao criar {}", parent.display()))?;
        }
        // Escreve ao lado e troca, para nunca deixar um arquivo pela metade
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .with_context(|| format!("falha ao gravar {}", tmp.display()))?;
        tokio::fs::rename(&tmp, path)
            .await
            .with_context(|| format!("falha ao substituir {}", path.display()))?;
        Ok(())
    }

    async fn write<T, F>(&self, change: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut RecordStore) -> Result<T, AppError>,
    {
        let mut slot = self.slot.lock().await;
        let mut next = slot.clone();
        let out = change(&mut next)?;
        self.flush(&next).await?;
        *slot = next;
        Ok(out)
    }
}

impl Default for SnapshotBackend {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn upsert<T: Record>(rows: &mut Vec<T>, row: &T) -> T {
    match rows.iter_mut().find(|r| r.id() == row.id()) {
        Some(slot) => *slot = row.clone(),
        None => rows.push(row.clone()),
    }
    row.clone()
}

fn replace<T: Record>(rows: &mut [T], row: &T, entity: Entity) -> Result<T, AppError> {
    let slot = rows
        .iter_mut()
        .find(|r| r.id() == row.id())
        .ok_or(AppError::not_found(entity, row.id()))?;
    *slot = row.clone();
    Ok(row.clone())
}

fn remove<T: Record>(rows: &mut Vec<T>, id: Uuid) {
    rows.retain(|r| r.id() != id);
}

#[async_trait]
impl RecordBackend for SnapshotBackend {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    async fn load(&self) -> Result<RecordStore, AppError> {
        Ok(self.slot.lock().await.clone())
    }

    async fn insert_client(&self, client: &Client) -> Result<Client, AppError> {
        self.write(|s| Ok(upsert(&mut s.clients, client))).await
    }

    async fn update_client(&self, client: &Client) -> Result<Client, AppError> {
        self.write(|s| replace(&mut s.clients, client, Entity::Client)).await
    }

    async fn delete_client(&self, id: Uuid) -> Result<(), AppError> {
        self.write(|s| {
            remove(&mut s.clients, id);
            s.legal_entities.retain(|e| e.client_id != id);
            Ok(())
        })
        .await
    }

    async fn insert_legal_entity(&self, entity: &LegalEntity) -> Result<LegalEntity, AppError> {
        self.write(|s| Ok(upsert(&mut s.legal_entities, entity))).await
    }

    async fn update_legal_entity(&self, entity: &LegalEntity) -> Result<LegalEntity, AppError> {
        self.write(|s| replace(&mut s.legal_entities, entity, Entity::LegalEntity)).await
    }

    async fn delete_legal_entity(&self, id: Uuid) -> Result<(), AppError> {
        self.write(|s| {
            remove(&mut s.legal_entities, id);
            Ok(())
        })
        .await
    }

    async fn insert_campaign(&self, campaign: &Campaign) -> Result<Campaign, AppError> {
        self.write(|s| Ok(upsert(&mut s.campaigns, campaign))).await
    }

    async fn update_campaign(&self, campaign: &Campaign) -> Result<Campaign, AppError> {
        self.write(|s| replace(&mut s.campaigns, campaign, Entity::Campaign)).await
    }

    async fn delete_campaign(&self, id: Uuid) -> Result<(), AppError> {
        self.write(|s| {
            remove(&mut s.campaigns, id);
            for payment in &mut s.collaborator_payments {
                payment.campaign_ids.retain(|c| *c != id);
            }
            Ok(())
        })
        .await
    }

    async fn insert_invoice(&self, invoice: &Invoice) -> Result<Invoice, AppError> {
        self.write(|s| {
            if s.invoices.iter().any(|i| i.reference == invoice.reference && i.id != invoice.id) {
                return Err(AppError::DuplicateInvoiceReference(invoice.reference.clone()));
            }
            Ok(upsert(&mut s.invoices, invoice))
        })
        .await
    }

    async fn update_invoice(&self, invoice: &Invoice) -> Result<Invoice, AppError> {
        self.write(|s| replace(&mut s.invoices, invoice, Entity::Invoice)).await
    }

    async fn delete_invoice(&self, id: Uuid) -> Result<(), AppError> {
        self.write(|s| {
            remove(&mut s.invoices, id);
            Ok(())
        })
        .await
    }

    async fn insert_movement(&self, movement: &Movement) -> Result<Movement, AppError> {
        self.write(|s| {
            s.movements.push(movement.clone());
            Ok(movement.clone())
        })
        .await
    }

    async fn insert_collaborator_payment(
        &self,
        payment: &CollaboratorPayment,
    ) -> Result<CollaboratorPayment, AppError> {
        self.write(|s| Ok(upsert(&mut s.collaborator_payments, payment))).await
    }

    async fn update_collaborator_payment(
        &self,
        payment: &CollaboratorPayment,
    ) -> Result<CollaboratorPayment, AppError> {
        self.write(|s| replace(&mut s.collaborator_payments, payment, Entity::CollaboratorPayment))
            .await
    }

    async fn delete_collaborator_payment(&self, id: Uuid) -> Result<(), AppError> {
        self.write(|s| {
            remove(&mut s.collaborator_payments, id);
            Ok(())
        })
        .await
    }
}
