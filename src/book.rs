//! Static book-of-business sample data: advisor stats, plan summaries,
//! recent transactions and the trade boards.

use serde::Serialize;

use crate::activity::Transaction;
use crate::trades::{Progress, Side, Trade, TradeState};

#[derive(Debug, Clone, Serialize)]
pub struct AdvisorStats {
    pub assets_under_administration: f64,
    pub clients: u32,
}

/// One plan-type card. The type is free text: the book holds kinds
/// (RDSP) that the plan wizard does not open.
#[derive(Debug, Clone, Serialize)]
pub struct PlanTypeSummary {
    pub plan_type: String,
    pub count: u32,
    pub aua: f64,
}

pub fn advisor_stats() -> AdvisorStats {
    AdvisorStats {
        assets_under_administration: 1_055_611.55,
        clients: 27,
    }
}

pub fn plan_type_summaries() -> Vec<PlanTypeSummary> {
    [
        ("TFSA", 8, 245_000.0),
        ("RRIF", 5, 185_000.0),
        ("RRSP", 12, 385_000.0),
        ("RESP", 4, 125_000.0),
        ("Non-Registered", 6, 285_000.0),
        ("LIRA", 2, 95_000.0),
        ("LIF", 1, 45_000.0),
        ("RDSP", 1, 35_000.0),
    ]
    .into_iter()
    .map(|(t, count, aua)| PlanTypeSummary {
        plan_type: t.to_string(),
        count,
        aua,
    })
    .collect()
}

pub fn total_plans(summaries: &[PlanTypeSummary]) -> u32 {
    summaries.iter().map(|s| s.count).sum()
}

pub fn sample_transactions() -> Vec<Transaction> {
    [
        ("Smith Trust - Fund Purchase", "Today • 2:45 PM", -25_000.00),
        ("Johnson Fund - Dividend", "Today • 9:00 AM", 1_250.00),
        ("Williams Account - Rebalance", "Yesterday", -5_500.00),
        ("Brown Emergency - Deposit", "Yesterday", 10_000.00),
        ("Davis Account - Fee Payment", "2 days ago", -150.00),
        ("Smith Trust - Capital Gain", "3 days ago", 3_200.00),
        ("Hamilton Family - New Account Setup", "3 days ago", 50_000.00),
        ("Sunrise Portfolio - Switch Order", "4 days ago", -12_750.00),
        ("Evergreen Wealth - Distribution", "4 days ago", 2_480.00),
        ("Maple Leaf Holdings - Redemption", "5 days ago", -18_600.00),
        ("Aurora RESP - Contribution", "6 days ago", 6_000.00),
        ("Harper Estate - Advisory Fee", "6 days ago", -325.00),
        ("Taylor Investment - Fund Purchase", "7 days ago", -8_500.00),
        ("Roberts Family - Dividend Payment", "7 days ago", 950.00),
        ("Mitchell Account - Rebalance", "8 days ago", -3_200.00),
        ("Campbell Trust - Deposit", "8 days ago", 15_000.00),
        ("Stewart Portfolio - Fee Payment", "9 days ago", -200.00),
        ("Morris Account - Capital Gain", "9 days ago", 4_500.00),
        ("Ward Family - New Account", "10 days ago", 30_000.00),
        ("Turner Investment - Switch", "10 days ago", -7_800.00),
        ("Phillips Wealth - Distribution", "11 days ago", 1_800.00),
        ("Cooper Holdings - Redemption", "11 days ago", -22_000.00),
        ("Richardson RESP - Contribution", "12 days ago", 5_500.00),
        ("Cox Estate - Advisory Fee", "12 days ago", -450.00),
    ]
    .into_iter()
    .map(|(d, t, a)| Transaction::new(d, t, a))
    .collect()
}

struct Row(&'static str, &'static str, Side, f64, &'static str, &'static str, &'static str);

fn trade(row: Row, state: TradeState) -> Trade {
    let Row(symbol, company, side, amount, client, plan, time) = row;
    Trade {
        symbol: symbol.to_string(),
        company: company.to_string(),
        side,
        amount,
        client: client.to_string(),
        plan: plan.to_string(),
        time: time.to_string(),
        state,
    }
}

fn in_progress(row: Row, status: Progress) -> Trade {
    trade(row, TradeState::InProgress { status })
}

fn rejected(row: Row, reason: &str) -> Trade {
    trade(row, TradeState::Rejected { reason: reason.to_string() })
}

fn confirmed(row: Row, number: &str) -> Trade {
    trade(row, TradeState::Confirmed { confirmation_number: number.to_string() })
}

pub fn sample_trades() -> Vec<Trade> {
    use Progress::{Pending, Processing};
    use Side::{Buy, Sell};

    vec![
        in_progress(Row("AGF Balanced Fund", "AGF Investments", Buy, 25_000.0, "Smith Family Trust", "RRSP - Account: RRSP-984512", "Today • 2:45 PM"), Pending),
        in_progress(Row("TD Canadian Equity Fund", "TD Asset Management", Sell, 15_000.0, "Johnson Retirement Fund", "TFSA - Account: TFSA-984512", "Today • 1:30 PM"), Processing),
        in_progress(Row("RBC Global Bond Fund", "RBC Global Asset Management", Buy, 10_000.0, "Williams Education Savings", "RESP - Account: RESP-782341", "Yesterday • 4:20 PM"), Pending),
        in_progress(Row("Mackenzie Growth Fund", "Mackenzie Investments", Buy, 30_000.0, "Martinez Investment Group", "RRIF - Account: RRIF-456789", "Yesterday • 3:15 PM"), Processing),
        in_progress(Row("CIBC Dividend Fund", "CIBC Asset Management", Sell, 12_500.0, "Brown Family Trust", "Non-Registered - Account: NR-984512", "Yesterday • 11:30 AM"), Pending),
        in_progress(Row("BMO Balanced Fund", "BMO Global Asset Management", Buy, 18_000.0, "Davis Tax-Free Account", "TFSA - Account: TFSA-123456", "2 days ago • 5:00 PM"), Processing),
        in_progress(Row("Scotia Global Equity Fund", "Scotia Asset Management", Buy, 22_000.0, "Hamilton Family Trust", "RRSP - Account: RRSP-789012", "2 days ago • 2:15 PM"), Pending),
        in_progress(Row("Fidelity Canadian Fund", "Fidelity Investments", Sell, 8_500.0, "Sunrise Portfolio", "LIRA - Account: LIRA-345678", "3 days ago • 10:45 AM"), Processing),
        in_progress(Row("Invesco Balanced Fund", "Invesco Canada", Buy, 20_000.0, "Evergreen Wealth", "RRSP - Account: RRSP-234567", "3 days ago • 9:20 AM"), Pending),
        in_progress(Row("Manulife Bond Fund", "Manulife Investment Management", Buy, 14_000.0, "Maple Leaf Holdings", "LIF - Account: LIF-901234", "4 days ago • 3:30 PM"), Processing),
        rejected(
            Row("CIBC Global Equity Fund", "CIBC Asset Management", Buy, 35_000.0, "Anderson Family Trust", "RRSP - Account: RRSP-567890", "Today • 11:20 AM"),
            "Insufficient funds in account. Required: $35,000.00, Available: $28,500.00",
        ),
        rejected(
            Row("BMO International Fund", "BMO Global Asset Management", Sell, 20_000.0, "Thompson Retirement", "RRIF - Account: RRIF-789012", "Yesterday • 3:45 PM"),
            "Trade rejected due to compliance restrictions. Please contact compliance team.",
        ),
        rejected(
            Row("Fidelity Growth Fund", "Fidelity Investments", Buy, 15_000.0, "Wilson Education Fund", "RESP - Account: RESP-345678", "2 days ago • 10:15 AM"),
            "Please submit required documents before placing a trade.",
        ),
        rejected(
            Row("Scotia Dividend Fund", "Scotia Asset Management", Buy, 12_000.0, "Miller Investment Group", "TFSA - Account: TFSA-456789", "3 days ago • 2:30 PM"),
            "Account status inactive. Please reactivate account before trading.",
        ),
        confirmed(Row("AGF Balanced Fund", "AGF Investments", Buy, 25_000.0, "Smith Family Trust", "RRSP - Account: RRSP-984512", "Today • 3:15 PM"), "CONF-2024-001234"),
        confirmed(Row("TD Canadian Equity Fund", "TD Asset Management", Sell, 15_000.0, "Johnson Retirement Fund", "TFSA - Account: TFSA-984512", "Today • 1:45 PM"), "CONF-2024-001189"),
        confirmed(Row("RBC Global Bond Fund", "RBC Global Asset Management", Buy, 10_000.0, "Williams Education Savings", "RESP - Account: RESP-782341", "Yesterday • 5:20 PM"), "CONF-2024-001156"),
        confirmed(Row("Mackenzie Growth Fund", "Mackenzie Investments", Buy, 30_000.0, "Martinez Investment Group", "RRIF - Account: RRIF-456789", "Yesterday • 4:10 PM"), "CONF-2024-001098"),
        confirmed(Row("CIBC Dividend Fund", "CIBC Asset Management", Sell, 12_500.0, "Brown Family Trust", "Non-Registered - Account: NR-984512", "2 days ago • 2:30 PM"), "CONF-2024-001045"),
    ]
}
