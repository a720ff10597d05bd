// src/store/changes.rs

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    models::{
        crm::{Client, LegalEntity},
        finance::{CollaboratorPayment, Invoice, Movement},
        operations::Campaign,
    },
    store::RecordStore,
};

/// Qualquer linha identificada por UUID.
pub trait Record: Clone + PartialEq {
    fn id(&self) -> Uuid;
}

macro_rules! impl_record {
    ($($ty:ty),* $(,)?) => {
        $(impl Record for $ty {
            fn id(&self) -> Uuid {
                self.id
            }
        })*
    };
}

impl_record!(Client, LegalEntity, Campaign, Invoice, Movement, CollaboratorPayment);

#[derive(Debug, Clone, PartialEq)]
pub struct TableChanges<T> {
    pub inserted: Vec<T>,
    pub updated: Vec<T>,
    pub deleted: Vec<Uuid>,
}

impl<T> Default for TableChanges<T> {
    fn default() -> Self {
        Self { inserted: Vec::new(), updated: Vec::new(), deleted: Vec::new() }
    }
}

impl<T: Record> TableChanges<T> {
    pub fn between(before: &[T], after: &[T]) -> Self {
        let old: HashMap<Uuid, &T> = before.iter().map(|r| (r.id(), r)).collect();
        let new: HashMap<Uuid, &T> = after.iter().map(|r| (r.id(), r)).collect();

        let mut changes = Self::default();
        // Mantém a ordem de `after` para que as chamadas sigam a ordem de criação
        for row in after {
            match old.get(&row.id()) {
                None => changes.inserted.push(row.clone()),
                Some(previous) if *previous != row => changes.updated.push(row.clone()),
                Some(_) => {}
            }
        }
        changes.deleted = before
            .iter()
            .map(Record::id)
            .filter(|id| !new.contains_key(id))
            .collect();
        changes
    }

    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }

    fn len(&self) -> usize {
        self.inserted.len() + self.updated.len() + self.deleted.len()
    }
}

/// O que precisa ir para o backend depois de um comando.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    pub clients: TableChanges<Client>,
    pub legal_entities: TableChanges<LegalEntity>,
    pub invoices: TableChanges<Invoice>,
    // Livro-caixa é só de acréscimo
    pub movements: Vec<Movement>,
    pub campaigns: TableChanges<Campaign>,
    pub collaborator_payments: TableChanges<CollaboratorPayment>,
}

impl ChangeSet {
    pub fn between(before: &RecordStore, after: &RecordStore) -> Self {
        Self {
            clients: TableChanges::between(&before.clients, &after.clients),
            legal_entities: TableChanges::between(&before.legal_entities, &after.legal_entities),
            invoices: TableChanges::between(&before.invoices, &after.invoices),
            movements: TableChanges::between(&before.movements, &after.movements).inserted,
            campaigns: TableChanges::between(&before.campaigns, &after.campaigns),
            collaborator_payments: TableChanges::between(
                &before.collaborator_payments,
                &after.collaborator_payments,
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
            && self.legal_entities.is_empty()
            && self.invoices.is_empty()
            && self.movements.is_empty()
            && self.campaigns.is_empty()
            && self.collaborator_payments.is_empty()
    }

    /// Quantidade de chamadas ao backend que este conjunto gera.
    pub fn call_count(&self) -> usize {
        self.clients.len()
            + self.legal_entities.len()
            + self.invoices.len()
            + self.movements.len()
            + self.campaigns.len()
            + self.collaborator_payments.len()
    }
}
