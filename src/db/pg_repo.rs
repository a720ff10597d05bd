// src/db/pg_repo.rs

use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    common::error::{AppError, Entity},
    db::RecordBackend,
    models::{
        crm::{Client, LegalEntity},
        finance::{CollaboratorPayment, Invoice, Movement},
        operations::Campaign,
    },
    store::RecordStore,
};

const CLIENT_COLUMNS: &str = "id, display_name, payer_legal_name, tax_id, address";
const LEGAL_ENTITY_COLUMNS: &str = "id, client_id, legal_name, tax_id, address";
const CAMPAIGN_COLUMNS: &str = "id, creation_date, client_id, actions, price, collaborator_fee, comments, \
     status, billing_method, invoicing_status, collection_status, collection_date, invoice_id";
const INVOICE_COLUMNS: &str = "id, date, reference, client_id, payer_name, payer_tax_id, payer_address, \
     base_price, tax_amount, collection_status, collection_date, description";
const MOVEMENT_COLUMNS: &str = "id, date, kind, payer_name, client_id, amount, account, invoice_id, \
     campaign_id, details, balance_after";
const PAYMENT_COLUMNS: &str = "id, date, amount, reference, payment_method";

// Backend remoto: uma tabela por entidade, chamadas independentes
#[derive(Clone)]
pub struct PgBackend {
    pool: PgPool,
}

impl PgBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn replace_payment_links(&self, payment: &CollaboratorPayment) -> Result<(), AppError> {
        sqlx::query("DELETE FROM collaborator_payment_campaigns WHERE payment_id = $1")
            .bind(payment.id)
            .execute(&self.pool)
            .await?;

        for campaign_id in &payment.campaign_ids {
            sqlx::query(
                "INSERT INTO collaborator_payment_campaigns (payment_id, campaign_id) VALUES ($1, $2)",
            )
            .bind(payment.id)
            .bind(campaign_id)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn payment_links(&self, payment_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT campaign_id FROM collaborator_payment_campaigns WHERE payment_id = $1 ORDER BY campaign_id",
        )
        .bind(payment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}

fn map_invoice_error(e: sqlx::Error, reference: &str) -> AppError {
    // Violação do índice único de `reference`
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::DuplicateInvoiceReference(reference.to_string());
        }
    }
    e.into()
}

#[async_trait]
impl RecordBackend for PgBackend {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn load(&self) -> Result<RecordStore, AppError> {
        let clients = sqlx::query_as::<_, Client>(&format!(
            "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY display_name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        let legal_entities = sqlx::query_as::<_, LegalEntity>(&format!(
            "SELECT {LEGAL_ENTITY_COLUMNS} FROM client_legal_entities ORDER BY legal_name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        let campaigns = sqlx::query_as::<_, Campaign>(&format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM campaigns ORDER BY creation_date DESC NULLS LAST"
        ))
        .fetch_all(&self.pool)
        .await?;

        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices ORDER BY date DESC NULLS LAST, reference DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        // Ordem de inserção: o livro-caixa é lido na ordem em que foi escrito
        let movements = sqlx::query_as::<_, Movement>(&format!(
            "SELECT {MOVEMENT_COLUMNS} FROM movements ORDER BY seq ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut collaborator_payments = sqlx::query_as::<_, CollaboratorPayment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM collaborator_payments ORDER BY date DESC NULLS LAST"
        ))
        .fetch_all(&self.pool)
        .await?;

        let links = sqlx::query_as::<_, (Uuid, Uuid)>(
            "SELECT payment_id, campaign_id FROM collaborator_payment_campaigns ORDER BY campaign_id",
        )
        .fetch_all(&self.pool)
        .await?;

        for payment in &mut collaborator_payments {
            payment.campaign_ids = links
                .iter()
                .filter(|(payment_id, _)| *payment_id == payment.id)
                .map(|(_, campaign_id)| *campaign_id)
                .collect();
        }

        Ok(RecordStore {
            clients,
            legal_entities,
            campaigns,
            invoices,
            movements,
            collaborator_payments,
        })
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    async fn insert_client(&self, client: &Client) -> Result<Client, AppError> {
        let row = sqlx::query_as::<_, Client>(&format!(
            "INSERT INTO clients ({CLIENT_COLUMNS}) VALUES ($1, $2, $3, $4, $5) RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(client.id)
        .bind(&client.display_name)
        .bind(&client.payer_legal_name)
        .bind(&client.tax_id)
        .bind(&client.address)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_client(&self, client: &Client) -> Result<Client, AppError> {
        sqlx::query_as::<_, Client>(&format!(
            r#"
            UPDATE clients
            SET display_name = $2, payer_legal_name = $3, tax_id = $4, address = $5
            WHERE id = $1
            RETURNING {CLIENT_COLUMNS}
            "#
        ))
        .bind(client.id)
        .bind(&client.display_name)
        .bind(&client.payer_legal_name)
        .bind(&client.tax_id)
        .bind(&client.address)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::not_found(Entity::Client, client.id))
    }

    async fn delete_client(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // =========================================================================
    //  RAZÕES SOCIAIS
    // =========================================================================

    async fn insert_legal_entity(&self, entity: &LegalEntity) -> Result<LegalEntity, AppError> {
        let row = sqlx::query_as::<_, LegalEntity>(&format!(
            r#"
            INSERT INTO client_legal_entities ({LEGAL_ENTITY_COLUMNS})
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {LEGAL_ENTITY_COLUMNS}
            "#
        ))
        .bind(entity.id)
        .bind(entity.client_id)
        .bind(&entity.legal_name)
        .bind(&entity.tax_id)
        .bind(&entity.address)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_legal_entity(&self, entity: &LegalEntity) -> Result<LegalEntity, AppError> {
        sqlx::query_as::<_, LegalEntity>(&format!(
            r#"
            UPDATE client_legal_entities
            SET legal_name = $2, tax_id = $3, address = $4
            WHERE id = $1
            RETURNING {LEGAL_ENTITY_COLUMNS}
            "#
        ))
        .bind(entity.id)
        .bind(&entity.legal_name)
        .bind(&entity.tax_id)
        .bind(&entity.address)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::not_found(Entity::LegalEntity, entity.id))
    }

    async fn delete_legal_entity(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM client_legal_entities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // =========================================================================
    //  CAMPANHAS
    // =========================================================================

    async fn insert_campaign(&self, campaign: &Campaign) -> Result<Campaign, AppError> {
        let row = sqlx::query_as::<_, Campaign>(&format!(
            r#"
            INSERT INTO campaigns ({CAMPAIGN_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {CAMPAIGN_COLUMNS}
            "#
        ))
        .bind(campaign.id)
        .bind(campaign.creation_date)
        .bind(campaign.client_id)
        .bind(Json(&campaign.actions))
        .bind(campaign.price)
        .bind(campaign.collaborator_fee)
        .bind(&campaign.comments)
        .bind(campaign.status)
        .bind(campaign.billing_method)
        .bind(campaign.invoicing_status)
        .bind(campaign.collection_status)
        .bind(campaign.collection_date)
        .bind(campaign.invoice_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_campaign(&self, campaign: &Campaign) -> Result<Campaign, AppError> {
        sqlx::query_as::<_, Campaign>(&format!(
            r#"
            UPDATE campaigns SET
                creation_date = $2, client_id = $3, actions = $4, price = $5,
                collaborator_fee = $6, comments = $7, status = $8, billing_method = $9,
                invoicing_status = $10, collection_status = $11, collection_date = $12,
                invoice_id = $13
            WHERE id = $1
            RETURNING {CAMPAIGN_COLUMNS}
            "#
        ))
        .bind(campaign.id)
        .bind(campaign.creation_date)
        .bind(campaign.client_id)
        .bind(Json(&campaign.actions))
        .bind(campaign.price)
        .bind(campaign.collaborator_fee)
        .bind(&campaign.comments)
        .bind(campaign.status)
        .bind(campaign.billing_method)
        .bind(campaign.invoicing_status)
        .bind(campaign.collection_status)
        .bind(campaign.collection_date)
        .bind(campaign.invoice_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::not_found(Entity::Campaign, campaign.id))
    }

    async fn delete_campaign(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // =========================================================================
    //  FATURAS
    // =========================================================================

    async fn insert_invoice(&self, invoice: &Invoice) -> Result<Invoice, AppError> {
        sqlx::query_as::<_, Invoice>(&format!(
            r#"
            INSERT INTO invoices ({INVOICE_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(invoice.id)
        .bind(invoice.date)
        .bind(&invoice.reference)
        .bind(invoice.client_id)
        .bind(&invoice.payer_name)
        .bind(&invoice.payer_tax_id)
        .bind(&invoice.payer_address)
        .bind(invoice.base_price)
        .bind(invoice.tax_amount)
        .bind(invoice.collection_status)
        .bind(invoice.collection_date)
        .bind(&invoice.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_invoice_error(e, &invoice.reference))
    }

    async fn update_invoice(&self, invoice: &Invoice) -> Result<Invoice, AppError> {
        sqlx::query_as::<_, Invoice>(&format!(
            r#"
            UPDATE invoices SET
                date = $2, reference = $3, client_id = $4, payer_name = $5,
                payer_tax_id = $6, payer_address = $7, base_price = $8, tax_amount = $9,
                collection_status = $10, collection_date = $11, description = $12
            WHERE id = $1
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(invoice.id)
        .bind(invoice.date)
        .bind(&invoice.reference)
        .bind(invoice.client_id)
        .bind(&invoice.payer_name)
        .bind(&invoice.payer_tax_id)
        .bind(&invoice.payer_address)
        .bind(invoice.base_price)
        .bind(invoice.tax_amount)
        .bind(invoice.collection_status)
        .bind(invoice.collection_date)
        .bind(&invoice.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_invoice_error(e, &invoice.reference))?
        .ok_or(AppError::not_found(Entity::Invoice, invoice.id))
    }

    async fn delete_invoice(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // =========================================================================
    //  MOVIMENTOS
    // =========================================================================

    async fn insert_movement(&self, movement: &Movement) -> Result<Movement, AppError> {
        let row = sqlx::query_as::<_, Movement>(&format!(
            r#"
            INSERT INTO movements ({MOVEMENT_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {MOVEMENT_COLUMNS}
            "#
        ))
        .bind(movement.id)
        .bind(movement.date)
        .bind(movement.kind)
        .bind(&movement.payer_name)
        .bind(movement.client_id)
        .bind(movement.amount)
        .bind(movement.account)
        .bind(movement.invoice_id)
        .bind(movement.campaign_id)
        .bind(&movement.details)
        .bind(movement.balance_after)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    // =========================================================================
    //  PAGAMENTOS AO COLABORADOR
    // =========================================================================

    async fn insert_collaborator_payment(
        &self,
        payment: &CollaboratorPayment,
    ) -> Result<CollaboratorPayment, AppError> {
        let mut row = sqlx::query_as::<_, CollaboratorPayment>(&format!(
            r#"
            INSERT INTO collaborator_payments ({PAYMENT_COLUMNS})
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(payment.id)
        .bind(payment.date)
        .bind(payment.amount)
        .bind(&payment.reference)
        .bind(&payment.payment_method)
        .fetch_one(&self.pool)
        .await?;

        self.replace_payment_links(payment).await?;
        row.campaign_ids = self.payment_links(payment.id).await?;
        Ok(row)
    }

    async fn update_collaborator_payment(
        &self,
        payment: &CollaboratorPayment,
    ) -> Result<CollaboratorPayment, AppError> {
        let mut row = sqlx::query_as::<_, CollaboratorPayment>(&format!(
            r#"
            UPDATE collaborator_payments
            SET date = $2, amount = $3, reference = $4, payment_method = $5
            WHERE id = $1
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(payment.id)
        .bind(payment.date)
        .bind(payment.amount)
        .bind(&payment.reference)
        .bind(&payment.payment_method)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::not_found(Entity::CollaboratorPayment, payment.id))?;

        self.replace_payment_links(payment).await?;
        row.campaign_ids = self.payment_links(payment.id).await?;
        Ok(row)
    }

    async fn delete_collaborator_payment(&self, id: Uuid) -> Result<(), AppError> {
        // As associações caem junto (ON DELETE CASCADE)
        sqlx::query("DELETE FROM collaborator_payments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
