use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::logging::{log, obj, v_str, Domain, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "Buy Order")]
    Buy,
    #[serde(rename = "Sell Order")]
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Progress {
    Pending,
    Processing,
}

/// Which of the three boards a trade belongs on, with the one field that
/// only that board shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TradeState {
    InProgress { status: Progress },
    Rejected { reason: String },
    Confirmed { confirmation_number: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Fund name as shown on the board.
    pub symbol: String,
    pub company: String,
    pub side: Side,
    pub amount: f64,
    pub client: String,
    pub plan: String,
    pub time: String,
    #[serde(flatten)]
    pub state: TradeState,
}

impl Trade {
    pub fn view(&self) -> TradesView {
        match self.state {
            TradeState::InProgress { .. } => TradesView::Progress,
            TradeState::Rejected { .. } => TradesView::Rejected,
            TradeState::Confirmed { .. } => TradesView::Confirmed,
        }
    }

    pub fn rejection_reason(&self) -> Option<&str> {
        match &self.state {
            TradeState::Rejected { reason } => Some(reason.as_str()),
            _ => None,
        }
    }

    pub fn confirmation_number(&self) -> Option<&str> {
        match &self.state {
            TradeState::Confirmed { confirmation_number } => Some(confirmation_number.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradesView {
    #[default]
    Progress,
    Rejected,
    Confirmed,
}

impl TradesView {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradesView::Progress => "progress",
            TradesView::Rejected => "rejected",
            TradesView::Confirmed => "confirmed",
        }
    }
}

impl FromStr for TradesView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "progress" => Ok(TradesView::Progress),
            "rejected" => Ok(TradesView::Rejected),
            "confirmed" => Ok(TradesView::Confirmed),
            other => Err(format!("unknown trades view '{}'", other)),
        }
    }
}

/// Trades on `view`'s board, in source order.
pub fn trades_for_view(trades: &[Trade], view: TradesView) -> Vec<&Trade> {
    let out: Vec<&Trade> = trades.iter().filter(|t| t.view() == view).collect();
    log(
        Level::Debug,
        Domain::Trades,
        "trades.view",
        obj(&[("view", v_str(view.as_str())), ("count", serde_json::json!(out.len()))]),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(state: TradeState) -> Trade {
        Trade {
            symbol: "AGF Balanced Fund".into(),
            company: "AGF Investments".into(),
            side: Side::Buy,
            amount: 25_000.0,
            client: "Smith Family Trust".into(),
            plan: "RRSP - Account: RRSP-984512".into(),
            time: "Today • 2:45 PM".into(),
            state,
        }
    }

    #[test]
    fn test_variant_decides_board() {
        let trades = vec![
            trade(TradeState::InProgress { status: Progress::Pending }),
            trade(TradeState::Rejected { reason: "Insufficient funds".into() }),
            trade(TradeState::Confirmed { confirmation_number: "CONF-1".into() }),
            trade(TradeState::InProgress { status: Progress::Processing }),
        ];
        assert_eq!(trades_for_view(&trades, TradesView::Progress).len(), 2);
        let rejected = trades_for_view(&trades, TradesView::Rejected);
        assert_eq!(rejected[0].rejection_reason(), Some("Insufficient funds"));
        assert_eq!(rejected[0].confirmation_number(), None);
        assert_eq!(trades_for_view(&trades, TradesView::Confirmed)[0].confirmation_number(), Some("CONF-1"));
    }

    #[test]
    fn test_state_serializes_flat() {
        let t = trade(TradeState::Confirmed { confirmation_number: "CONF-9".into() });
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["state"], "confirmed");
        assert_eq!(v["confirmation_number"], "CONF-9");
        assert_eq!(v["side"], "Buy Order");
    }
}
