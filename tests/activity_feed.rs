//! Recent-activity feed and trade board over the sample book.

use advisorbook::activity::{filter_transactions, ActivityFilter, PeriodFilter, Recency, SignFilter};
use advisorbook::book::sample_transactions;
use advisorbook::catalog::FundCatalog;
use advisorbook::state::{Config, Dashboard};
use advisorbook::trades::TradesView;

#[test]
fn negative_today_returns_only_same_day_debits() {
    let txs = sample_transactions();
    let hits = filter_transactions(&txs, &ActivityFilter::new(SignFilter::Negative, PeriodFilter::Today));
    assert_eq!(hits.len(), 1);
    for tx in hits {
        assert!(tx.is_negative);
        assert!(tx.amount < 0.0);
        assert_eq!(tx.recency(), Recency::Today);
    }
}

#[test]
fn default_filter_keeps_everything_in_order() {
    let txs = sample_transactions();
    let hits = filter_transactions(&txs, &ActivityFilter::default());
    assert_eq!(hits.len(), txs.len());
    for (a, b) in hits.iter().zip(txs.iter()) {
        assert_eq!(a.description, b.description);
    }
}

#[test]
fn week_and_month_buckets() {
    let txs = sample_transactions();
    let week = filter_transactions(&txs, &ActivityFilter::new(SignFilter::All, PeriodFilter::Week));
    // today(2) + yesterday(2) + 2..7 days ago(10)
    assert_eq!(week.len(), 14);
    assert!(week.iter().all(|t| !matches!(t.recency(), Recency::DaysAgo(n) if n > 7)));

    let month = filter_transactions(&txs, &ActivityFilter::new(SignFilter::All, PeriodFilter::Month));
    assert_eq!(month.len(), txs.len());

    let positive_yesterday =
        filter_transactions(&txs, &ActivityFilter::new(SignFilter::Positive, PeriodFilter::Yesterday));
    assert_eq!(positive_yesterday.len(), 1);
    assert_eq!(positive_yesterday[0].description, "Brown Emergency - Deposit");
}

#[test]
fn dashboard_filters_and_boards() {
    let mut d = Dashboard::new(Config::default(), FundCatalog::builtin());
    assert!(!d.activity_filter.is_active());
    d.set_sign_filter(SignFilter::Negative);
    d.set_period_filter(PeriodFilter::Yesterday);
    assert!(d.activity_filter.is_active());
    let visible = d.visible_transactions();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].description, "Williams Account - Rebalance");
    d.clear_filters();
    assert_eq!(d.visible_transactions().len(), 24);

    assert_eq!(d.visible_trades().len(), 10);
    d.select_trades_view(TradesView::Rejected);
    assert!(d.visible_trades().iter().all(|t| t.rejection_reason().is_some()));
    assert_eq!(d.visible_trades().len(), 4);
    d.select_trades_view(TradesView::Confirmed);
    assert_eq!(d.visible_trades().len(), 5);
}

#[test]
fn plan_type_cards_route_to_clients() {
    let d = Dashboard::new(Config::default(), FundCatalog::builtin());
    let url = d.clients_route(Some("Non-Registered")).unwrap();
    assert_eq!(url.as_str(), "app://advisor/clients?planType=Non-Registered");
    assert_eq!(d.clients_route(None).unwrap().as_str(), "app://advisor/clients");
    assert_eq!(d.total_plans(), 39);
}
