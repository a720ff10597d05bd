// src/store/dashboard.rs

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::{
        dashboard::{AccountBalances, DashboardSummary, MonthRollup},
        finance::{Account, CollectionStatus, MovementKind},
    },
    store::RecordStore,
};

/// Mês/ano selecionado no painel (comparação por calendário, não janela de 30 dias).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    month: u32,
    year: i32,
}

impl Period {
    pub fn new(month: u32, year: i32) -> Result<Self, AppError> {
        if !(1..=12).contains(&month) || !(2000..=2100).contains(&year) {
            return Err(AppError::InvalidPeriod { month, year });
        }
        Ok(Self { month, year })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self { month: date.month(), year: date.year() }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Datas ausentes nunca caem em mês nenhum.
    fn contains(&self, date: Option<NaiveDate>) -> bool {
        date.is_some_and(|d| d.month() == self.month && d.year() == self.year)
    }
}

pub fn account_balances(store: &RecordStore) -> AccountBalances {
    AccountBalances {
        corporate_balance: store.balance_of(Account::CorporateAccount),
        paypal_balance: store.balance_of(Account::PayPal),
    }
}

pub fn compute_dashboard(store: &RecordStore, period: Period) -> DashboardSummary {
    let balances = account_balances(store);

    // Totais só consideram registros com alguma data válida
    let dated_invoices = || {
        store
            .invoices
            .iter()
            .filter(|i| i.date.is_some() || i.collection_date.is_some())
    };
    let dated_movements = || store.movements.iter().filter(|m| m.date.is_some());
    let dated_campaigns = || store.campaigns.iter().filter(|c| c.creation_date.is_some());

    let pending_collection_total: Decimal = dated_invoices()
        .filter(|i| i.collection_status == CollectionStatus::NotCollected)
        .map(|i| i.total())
        .sum();

    // Independe do método de cobrança: conta qualquer campanha sem fatura
    let pending_invoicing_total: Decimal = dated_campaigns()
        .filter(|c| !c.is_invoiced())
        .map(|c| c.price)
        .sum();

    let historical_invoiced_total: Decimal = dated_invoices().map(|i| i.total()).sum();
    let historical_collected_total: Decimal = dated_movements()
        .filter(|m| m.kind == MovementKind::Collection)
        .map(|m| m.amount)
        .sum();

    DashboardSummary {
        corporate_balance: balances.corporate_balance,
        paypal_balance: balances.paypal_balance,
        pending_collection_total,
        pending_invoicing_total,
        historical_invoiced_total,
        historical_collected_total,
        month: month_rollup(store, period),
    }
}

fn month_rollup(store: &RecordStore, period: Period) -> MonthRollup {
    let invoices: Vec<_> = store.invoices.iter().filter(|i| period.contains(i.date)).collect();
    let movements: Vec<_> = store.movements.iter().filter(|m| period.contains(m.date)).collect();
    let campaigns: Vec<_> = store
        .campaigns
        .iter()
        .filter(|c| period.contains(c.creation_date))
        .collect();

    let collected_on = |account: Account| -> Decimal {
        movements
            .iter()
            .filter(|m| m.kind == MovementKind::Collection && m.account == account)
            .map(|m| m.amount)
            .sum()
    };
    let collected_corporate = collected_on(Account::CorporateAccount);
    let collected_paypal = collected_on(Account::PayPal);

    MonthRollup {
        month: period.month,
        year: period.year,
        total_invoiced: invoices.iter().map(|i| i.total()).sum(),
        collected_corporate,
        collected_paypal,
        total_collected: collected_corporate + collected_paypal,
        total_paid_out: movements
            .iter()
            .filter(|m| m.kind == MovementKind::Payment)
            .map(|m| m.amount)
            .sum(),
        invoice_count: invoices.len(),
        campaign_count: campaigns.len(),
        action_count: campaigns.iter().map(|c| c.actions.total()).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::finance::{Invoice, Movement};
    use crate::store::fixtures::*;
    use uuid::Uuid;

    fn invoice(date: Option<NaiveDate>, base: i64, tax: i64) -> Invoice {
        Invoice {
            id: Uuid::new_v4(),
            date,
            reference: Uuid::new_v4().to_string(),
            client_id: Uuid::new_v4(),
            payer_name: "Acme S.L.".into(),
            payer_tax_id: None,
            payer_address: None,
            base_price: Decimal::new(base, 0),
            tax_amount: Decimal::new(tax, 0),
            collection_status: CollectionStatus::NotCollected,
            collection_date: None,
            description: None,
        }
    }

    fn movement(date: Option<NaiveDate>, kind: MovementKind, account: Account, amount: i64) -> Movement {
        Movement {
            id: Uuid::new_v4(),
            date,
            kind,
            payer_name: "Acme".into(),
            client_id: None,
            amount: Decimal::new(amount, 0),
            account,
            invoice_id: None,
            campaign_id: None,
            details: None,
            balance_after: None,
        }
    }

    fn november() -> Period {
        Period::new(11, 2024).unwrap()
    }

    #[test]
    fn month_view_only_counts_the_selected_month() {
        let store = RecordStore {
            invoices: vec![
                invoice(Some(day(2024, 11, 20)), 1200, 252),
                invoice(Some(day(2024, 12, 10)), 650, 0),
            ],
            ..Default::default()
        };

        let summary = compute_dashboard(&store, november());

        assert_eq!(summary.month.total_invoiced, Decimal::new(1452, 0));
        assert_eq!(summary.month.invoice_count, 1);
        assert_eq!(summary.historical_invoiced_total, Decimal::new(2102, 0));
    }

    #[test]
    fn same_month_of_another_year_is_excluded() {
        let store = RecordStore {
            invoices: vec![invoice(Some(day(2023, 11, 20)), 1200, 252)],
            ..Default::default()
        };
        assert_eq!(compute_dashboard(&store, november()).month.invoice_count, 0);
    }

    #[test]
    fn pending_invoicing_drops_once_an_invoice_is_linked() {
        let mut store = RecordStore::default();
        let acme = store.insert_client(client("Acme"));
        let campaign = store.insert_campaign(Uuid::new_v4(), campaign_draft(acme.id, 850)).unwrap();
        assert_eq!(
            compute_dashboard(&store, november()).pending_invoicing_total,
            Decimal::new(850, 0)
        );

        let mut draft = invoice_draft(acme.id, "2024-040", 850, day(2024, 11, 20));
        draft.campaign_ids = vec![campaign.id];
        store.issue_invoice(Uuid::new_v4(), draft).unwrap();

        assert_eq!(compute_dashboard(&store, november()).pending_invoicing_total, Decimal::ZERO);
    }

    #[test]
    fn pending_collection_ignores_collected_invoices() {
        let mut collected = invoice(Some(day(2024, 11, 1)), 100, 21);
        collected.collection_status = CollectionStatus::Collected;
        let store = RecordStore {
            invoices: vec![collected, invoice(Some(day(2024, 11, 2)), 1000, 210)],
            ..Default::default()
        };

        assert_eq!(compute_dashboard(&store, november()).pending_collection_total, Decimal::new(1210, 0));
    }

    #[test]
    fn month_view_splits_collections_by_account_and_sums_payouts() {
        let store = RecordStore {
            movements: vec![
                movement(Some(day(2024, 11, 3)), MovementKind::Collection, Account::CorporateAccount, 1452),
                movement(Some(day(2024, 11, 4)), MovementKind::Collection, Account::PayPal, 300),
                movement(Some(day(2024, 11, 5)), MovementKind::Payment, Account::CorporateAccount, 150),
                movement(Some(day(2024, 10, 5)), MovementKind::Payment, Account::PayPal, 99),
            ],
            ..Default::default()
        };

        let summary = compute_dashboard(&store, november());

        assert_eq!(summary.month.collected_corporate, Decimal::new(1452, 0));
        assert_eq!(summary.month.collected_paypal, Decimal::new(300, 0));
        assert_eq!(summary.month.total_collected, Decimal::new(1752, 0));
        assert_eq!(summary.month.total_paid_out, Decimal::new(150, 0));
        assert_eq!(summary.corporate_balance, Decimal::new(1302, 0));
        assert_eq!(summary.paypal_balance, Decimal::new(201, 0));
        assert_eq!(summary.historical_collected_total, Decimal::new(1752, 0));
    }

    #[test]
    fn undated_records_stay_out_of_totals_but_not_out_of_balances() {
        let mut collected_only = invoice(None, 500, 105);
        collected_only.collection_date = Some(day(2024, 11, 9));
        let store = RecordStore {
            invoices: vec![invoice(None, 999, 0), collected_only],
            movements: vec![movement(None, MovementKind::Collection, Account::PayPal, 40)],
            ..Default::default()
        };

        let summary = compute_dashboard(&store, november());

        // Sem data de emissão: fora do mês, mas a data de cobrança mantém no histórico
        assert_eq!(summary.month.invoice_count, 0);
        assert_eq!(summary.historical_invoiced_total, Decimal::new(605, 0));
        assert_eq!(summary.historical_collected_total, Decimal::ZERO);
        assert_eq!(summary.paypal_balance, Decimal::new(40, 0));
    }

    #[test]
    fn campaigns_and_actions_are_counted_per_month() {
        let mut store = RecordStore::default();
        let acme = store.insert_client(client("Acme"));
        store.insert_campaign(Uuid::new_v4(), campaign_draft(acme.id, 100)).unwrap();
        store.insert_campaign(Uuid::new_v4(), campaign_draft(acme.id, 200)).unwrap();

        let rollup = compute_dashboard(&store, november()).month;
        assert_eq!(rollup.campaign_count, 2);
        assert_eq!(rollup.action_count, 10);
    }

    #[test]
    fn out_of_range_periods_are_rejected() {
        assert!(matches!(Period::new(0, 2024), Err(AppError::InvalidPeriod { .. })));
        assert!(matches!(Period::new(13, 2024), Err(AppError::InvalidPeriod { .. })));
        assert!(Period::new(12, 1999).is_err());
        assert_eq!(Period::containing(day(2024, 2, 29)), Period::new(2, 2024).unwrap());
    }
}
