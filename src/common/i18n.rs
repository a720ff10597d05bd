// src/common/i18n.rs

use std::collections::HashMap;

const DEFAULT_LANG: &str = "es";

// (chave, es, en, pt)
const MESSAGES: &[(&str, &str, &str, &str)] = &[
    (
        "validation",
        "Uno o más campos no son válidos.",
        "One or more fields are invalid.",
        "Um ou mais campos são inválidos.",
    ),
    (
        "invalid_period",
        "Mes o año fuera de rango.",
        "Month or year out of range.",
        "Mês ou ano fora do intervalo.",
    ),
    (
        "not_found.client",
        "Cliente no encontrado.",
        "Client not found.",
        "Cliente não encontrado.",
    ),
    (
        "not_found.legal_entity",
        "Razón social no encontrada.",
        "Legal entity not found.",
        "Razão social não encontrada.",
    ),
    (
        "not_found.campaign",
        "Campaña no encontrada.",
        "Campaign not found.",
        "Campanha não encontrada.",
    ),
    (
        "not_found.invoice",
        "Factura no encontrada.",
        "Invoice not found.",
        "Fatura não encontrada.",
    ),
    (
        "not_found.collaborator_payment",
        "Pago al colaborador no encontrado.",
        "Collaborator payment not found.",
        "Pagamento ao colaborador não encontrado.",
    ),
    (
        "client_has_campaigns",
        "No se puede eliminar un cliente con campañas asociadas.",
        "A client with campaigns cannot be deleted.",
        "Não é possível excluir um cliente com campanhas vinculadas.",
    ),
    (
        "duplicate_invoice_reference",
        "Ya existe una factura con ese número.",
        "An invoice with this reference already exists.",
        "Já existe uma fatura com esse número.",
    ),
    (
        "internal",
        "Ha ocurrido un error inesperado.",
        "An unexpected error occurred.",
        "Ocorreu um erro inesperado.",
    ),
];

/// Catálogo de mensagens por idioma, montado uma vez no startup.
#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut messages: HashMap<&'static str, HashMap<&'static str, &'static str>> = HashMap::new();
        for &(key, es, en, pt) in MESSAGES {
            messages.entry("es").or_default().insert(key, es);
            messages.entry("en").or_default().insert(key, en);
            messages.entry("pt").or_default().insert(key, pt);
        }
        Self { messages }
    }

    /// Idioma desconhecido cai no espanhol; chave desconhecida volta como está.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.messages
            .get(lang)
            .and_then(|m| m.get(key))
            .or_else(|| self.messages.get(DEFAULT_LANG).and_then(|m| m.get(key)))
            .map(|msg| msg.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}
