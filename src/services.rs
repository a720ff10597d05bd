// src/services.rs

pub mod document_service;
pub use document_service::{DocumentService, IssuerProfile};
pub mod ledger_service;
pub use ledger_service::LedgerService;
