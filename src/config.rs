// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    common::i18n::I18nStore,
    db::{PgBackend, RecordBackend, SnapshotBackend},
    services::{DocumentService, IssuerProfile, LedgerService},
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Config {
    /// Presente = Postgres; ausente = snapshot JSON local
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub snapshot_path: PathBuf,
    pub bind_addr: String,
    pub fonts_dir: PathBuf,
    pub issuer: IssuerProfile,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        // Variáveis vazias contam como ausentes
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let db_max_connections = match var("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: {raw}"))?,
            None => 5,
        };

        Ok(Self {
            database_url: var("DATABASE_URL"),
            db_max_connections,
            snapshot_path: var("SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data/ledger.json")),
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            fonts_dir: var("FONTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./fonts")),
            issuer: IssuerProfile {
                name: var("ISSUER_NAME").unwrap_or_else(|| "Promo Ledger".to_string()),
                tax_id: var("ISSUER_TAX_ID"),
                address: var("ISSUER_ADDRESS"),
                iban: var("ISSUER_IBAN"),
            },
        })
    }

    /// Escolhe o backend: Postgres (com migrações) ou o snapshot local.
    pub async fn connect_backend(&self) -> anyhow::Result<Arc<dyn RecordBackend>> {
        let Some(database_url) = &self.database_url else {
            let backend = SnapshotBackend::open(&self.snapshot_path).await?;
            tracing::info!("✅ Usando snapshot local em {}", self.snapshot_path.display());
            return Ok(Arc::new(backend));
        };

        let db_pool = PgPoolOptions::new()
            .max_connections(self.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;
        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // Faz o app rodar as migrações do SQLx na inicialização
        sqlx::migrate!()
            .run(&db_pool)
            .await
            .context("Falha ao rodar as migrações do banco de dados")?;
        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

        Ok(Arc::new(PgBackend::new(db_pool)))
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub ledger_service: LedgerService,
    pub document_service: DocumentService,
    pub i18n_store: Arc<I18nStore>,
}

impl AppState {
    pub fn new(ledger_service: LedgerService, document_service: DocumentService) -> Self {
        Self {
            ledger_service,
            document_service,
            i18n_store: Arc::new(I18nStore::new()),
        }
    }

    /// Monta o gráfico de dependências a partir da configuração.
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let backend = config.connect_backend().await?;
        let ledger_service = LedgerService::bootstrap(backend)
            .await
            .context("Falha ao carregar o estado inicial")?;
        let document_service = DocumentService::new(&config.fonts_dir, config.issuer.clone());

        Ok(Self::new(ledger_service, document_service))
    }
}
