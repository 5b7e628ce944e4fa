use anyhow::Result;
use chrono::{DateTime, Utc};
use url::Url;

use crate::activity::{filter_transactions, ActivityFilter, PeriodFilter, SignFilter, Transaction};
use crate::book::{self, AdvisorStats, PlanTypeSummary};
use crate::catalog::{FundCatalog, FundProduct};
use crate::client::{ClientRecord, ClientWizard};
use crate::form::FieldError;
use crate::logging::{log, obj, v_str, Domain, Level};
use crate::order::{OrderConfirmation, OrderTicket, DEFAULT_SETTLED_BALANCE};
use crate::plan::{Plan, PlanWizard};
use crate::routes::{ClientsRoute, DEFAULT_CLIENTS_BASE};
use crate::trades::{trades_for_view, Trade, TradesView};
use crate::wizard::{Advance, Submitter};

#[derive(Debug, Clone)]
pub struct Config {
    pub submit_delay_ms: u64,
    pub settled_balance: f64,
    /// JSON catalog replacing the built-in one.
    pub catalog_path: Option<String>,
    pub activity_sign: SignFilter,
    pub activity_period: PeriodFilter,
    pub trades_view: TradesView,
    pub clients_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_vars(|_| None)
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparseable values fall back to
    /// the defaults.
    pub fn from_vars<F: Fn(&str) -> Option<String>>(var: F) -> Self {
        Self {
            submit_delay_ms: var("SUBMIT_DELAY_MS").and_then(|v| v.parse().ok()).unwrap_or(500),
            settled_balance: var("SETTLED_BALANCE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SETTLED_BALANCE),
            catalog_path: var("FUND_CATALOG").filter(|p| !p.is_empty()),
            activity_sign: var("ACTIVITY_SIGN").and_then(|v| v.parse().ok()).unwrap_or_default(),
            activity_period: var("ACTIVITY_PERIOD").and_then(|v| v.parse().ok()).unwrap_or_default(),
            trades_view: var("TRADES_VIEW").and_then(|v| v.parse().ok()).unwrap_or_default(),
            clients_base_url: var("CLIENTS_BASE_URL").unwrap_or_else(|| DEFAULT_CLIENTS_BASE.to_string()),
        }
    }
}

/// Page-level state: both wizards, the order ticket, the feed filter and the
/// trade board selection.
pub struct Dashboard {
    pub config: Config,
    catalog: FundCatalog,
    transactions: Vec<Transaction>,
    trades: Vec<Trade>,
    summaries: Vec<PlanTypeSummary>,
    pub activity_filter: ActivityFilter,
    pub trades_view: TradesView,
    pub plans_expanded: bool,

    plan_dialog_open: bool,
    plan_wizard: PlanWizard,
    order_ticket: OrderTicket,
    last_order: Option<OrderConfirmation>,

    client_dialog_open: bool,
    client_wizard: ClientWizard,
    client_confirmation: Option<ClientRecord>,
}

impl Dashboard {
    pub fn new(config: Config, catalog: FundCatalog) -> Self {
        Self {
            activity_filter: ActivityFilter::new(config.activity_sign, config.activity_period),
            trades_view: config.trades_view,
            config,
            catalog,
            transactions: book::sample_transactions(),
            trades: book::sample_trades(),
            summaries: book::plan_type_summaries(),
            plans_expanded: true,
            plan_dialog_open: false,
            plan_wizard: PlanWizard::new(),
            order_ticket: OrderTicket::default(),
            last_order: None,
            client_dialog_open: false,
            client_wizard: ClientWizard::new(),
            client_confirmation: None,
        }
    }

    /// Loads the configured catalog, if any.
    pub fn from_config(config: Config) -> Result<Self> {
        let catalog = FundCatalog::from_path_or_builtin(config.catalog_path.as_deref())?;
        Ok(Self::new(config, catalog))
    }

    pub fn catalog(&self) -> &FundCatalog {
        &self.catalog
    }

    pub fn stats(&self) -> AdvisorStats {
        book::advisor_stats()
    }

    pub fn plan_summaries(&self) -> &[PlanTypeSummary] {
        &self.summaries
    }

    pub fn total_plans(&self) -> u32 {
        book::total_plans(&self.summaries)
    }

    pub fn toggle_plans(&mut self) -> bool {
        self.plans_expanded = !self.plans_expanded;
        self.plans_expanded
    }

    // ==========================================================================
    // Activity feed and trade board
    // ==========================================================================

    pub fn set_sign_filter(&mut self, sign: SignFilter) {
        self.activity_filter.sign = sign;
    }

    pub fn set_period_filter(&mut self, period: PeriodFilter) {
        self.activity_filter.period = period;
    }

    pub fn clear_filters(&mut self) {
        self.activity_filter = ActivityFilter::default();
    }

    pub fn visible_transactions(&self) -> Vec<&Transaction> {
        filter_transactions(&self.transactions, &self.activity_filter)
    }

    pub fn select_trades_view(&mut self, view: TradesView) {
        self.trades_view = view;
    }

    pub fn visible_trades(&self) -> Vec<&Trade> {
        trades_for_view(&self.trades, self.trades_view)
    }

    /// Clients view, optionally narrowed to one plan type.
    pub fn clients_route(&self, plan_type: Option<&str>) -> Result<Url> {
        let route = match plan_type {
            Some(t) => ClientsRoute::for_plan_type(t),
            None => ClientsRoute::all(),
        };
        let url = route.to_url(&self.config.clients_base_url)?;
        log(Level::Info, Domain::System, "navigate", obj(&[("url", v_str(url.as_str()))]));
        Ok(url)
    }

    // ==========================================================================
    // Plan dialog
    // ==========================================================================

    pub fn open_plan_wizard(&mut self) {
        self.plan_wizard.cancel();
        self.order_ticket = OrderTicket::default();
        self.plan_dialog_open = true;
    }

    pub fn close_plan_dialog(&mut self) {
        self.plan_dialog_open = false;
        self.plan_wizard.cancel();
        self.order_ticket = OrderTicket::default();
    }

    pub fn is_plan_dialog_open(&self) -> bool {
        self.plan_dialog_open
    }

    pub fn plan_wizard(&self) -> &PlanWizard {
        &self.plan_wizard
    }

    pub fn plan_wizard_mut(&mut self) -> &mut PlanWizard {
        &mut self.plan_wizard
    }

    pub fn set_plan_field(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        self.plan_wizard.draft_mut().set_field(name, value)
    }

    pub async fn advance_plan<S>(&mut self, submitter: &S) -> Advance<Plan>
    where
        S: Submitter<crate::plan::PlanFlow> + ?Sized,
    {
        self.plan_wizard.advance(submitter).await
    }

    pub fn retreat_plan(&mut self) -> usize {
        self.plan_wizard.retreat()
    }

    pub fn created_plan(&self) -> Option<&Plan> {
        self.plan_wizard.outcome()
    }

    // ==========================================================================
    // Order ticket (plan success step)
    // ==========================================================================

    pub fn order_ticket(&self) -> &OrderTicket {
        &self.order_ticket
    }

    pub fn select_fund_company(&mut self, company: &str) {
        self.order_ticket.selection.select_company(company);
    }

    pub fn select_product(&mut self, product: &str) {
        self.order_ticket.selection.select_product(product);
    }

    pub fn set_investment_amount(&mut self, amount: &str) {
        self.order_ticket.amount = amount.to_string();
    }

    pub fn offered_products(&self) -> &[FundProduct] {
        self.order_ticket.selection.offered(&self.catalog)
    }

    pub fn order_exceeds_balance(&self) -> bool {
        self.order_ticket.exceeds(self.config.settled_balance)
    }

    /// Place the ticket for the plan just created. Closes the plan dialog
    /// and keeps the confirmation until dismissed.
    pub fn place_order(&mut self, now: DateTime<Utc>) -> Result<OrderConfirmation, FieldError> {
        if self.plan_wizard.outcome().is_none() {
            return Err(FieldError::new("plan", "no plan has been created"));
        }
        let confirmation = self
            .order_ticket
            .place(&self.catalog, self.config.settled_balance, now)?;
        self.close_plan_dialog();
        self.last_order = Some(confirmation.clone());
        Ok(confirmation)
    }

    pub fn last_order(&self) -> Option<&OrderConfirmation> {
        self.last_order.as_ref()
    }

    pub fn dismiss_order_confirmation(&mut self) {
        self.last_order = None;
    }

    // ==========================================================================
    // Client dialog
    // ==========================================================================

    pub fn open_client_wizard(&mut self) {
        self.client_wizard.cancel();
        self.client_dialog_open = true;
    }

    pub fn close_client_dialog(&mut self) {
        self.client_dialog_open = false;
        self.client_wizard.cancel();
    }

    pub fn is_client_dialog_open(&self) -> bool {
        self.client_dialog_open
    }

    pub fn client_wizard(&self) -> &ClientWizard {
        &self.client_wizard
    }

    pub fn set_client_field(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        self.client_wizard.draft_mut().set_field(name, value)
    }

    /// Submitting the beneficiary step closes the dialog and surfaces the
    /// new client as a confirmation.
    pub async fn advance_client<S>(&mut self, submitter: &S) -> Advance<ClientRecord>
    where
        S: Submitter<crate::client::ClientFlow> + ?Sized,
    {
        let outcome = self.client_wizard.advance(submitter).await;
        if let Advance::Submitted(record) = &outcome {
            self.client_dialog_open = false;
            self.client_confirmation = Some(record.clone());
        }
        outcome
    }

    pub fn retreat_client(&mut self) -> usize {
        self.client_wizard.retreat()
    }

    pub fn client_confirmation(&self) -> Option<&ClientRecord> {
        self.client_confirmation.as_ref()
    }

    pub fn dismiss_client_confirmation(&mut self) {
        self.client_confirmation = None;
    }
}
