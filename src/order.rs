//! Order ticket shown on the plan success step.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{FundCatalog, ProductSelection};
use crate::form::FieldError;
use crate::logging::log_order;

/// Settled balance of a freshly opened trust account, in CAD.
pub const DEFAULT_SETTLED_BALANCE: f64 = 1250.0;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderTicket {
    pub selection: ProductSelection,
    /// Raw amount input.
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub company: String,
    pub product: String,
    pub symbol: String,
    pub amount: f64,
    pub time: String,
    pub exceeds_settled_balance: bool,
}

impl OrderTicket {
    /// Parsed amount; unparseable input reads as zero.
    pub fn amount_value(&self) -> f64 {
        self.amount.trim().parse().unwrap_or(0.0)
    }

    /// Non-blocking warning: the order is larger than the settled cash.
    pub fn exceeds(&self, settled_balance: f64) -> bool {
        self.amount_value() > settled_balance
    }

    /// The "place order" button is enabled.
    pub fn is_ready(&self) -> bool {
        self.selection.company().is_some()
            && self.selection.product().is_some()
            && !self.amount.trim().is_empty()
    }

    pub fn place(
        &self,
        catalog: &FundCatalog,
        settled_balance: f64,
        now: DateTime<Utc>,
    ) -> Result<OrderConfirmation, FieldError> {
        let company = self
            .selection
            .company()
            .ok_or_else(|| FieldError::new("company", "select a fund company"))?;
        let product = self
            .selection
            .product()
            .ok_or_else(|| FieldError::new("product", "select a product"))?;
        let raw = self.amount.trim();
        if raw.is_empty() {
            return Err(FieldError::new("amount", "enter an amount"));
        }
        let amount: f64 = raw
            .parse()
            .map_err(|_| FieldError::new("amount", format!("'{}' is not a number", raw)))?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(FieldError::new("amount", "must be greater than zero"));
        }
        // an unknown product still places with an empty symbol
        let symbol = catalog
            .product(company, product)
            .map(|p| p.code.clone())
            .unwrap_or_default();
        let exceeds_settled_balance = amount > settled_balance;
        log_order(company, product, amount, exceeds_settled_balance);

        Ok(OrderConfirmation {
            company: company.to_string(),
            product: product.to_string(),
            symbol,
            amount,
            time: now.format("%m/%d/%Y, %I:%M:%S %p").to_string(),
            exceeds_settled_balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ticket(amount: &str) -> OrderTicket {
        let mut t = OrderTicket::default();
        t.selection.select_company("CIBC Asset Management");
        t.selection.select_product("CIBC Dividend Fund");
        t.amount = amount.to_string();
        t
    }

    #[test]
    fn test_place_fills_symbol_and_time() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        let conf = ticket("500").place(&FundCatalog::builtin(), DEFAULT_SETTLED_BALANCE, now).unwrap();
        assert_eq!(conf.symbol, "CIB583");
        assert_eq!(conf.time, "03/05/2024, 02:07:09 PM");
        assert!(!conf.exceeds_settled_balance);
    }

    #[test]
    fn test_rejects_incomplete_ticket() {
        let cat = FundCatalog::builtin();
        let now = Utc::now();
        assert_eq!(ticket("").place(&cat, 1250.0, now).unwrap_err().field, "amount");
        assert_eq!(ticket("-5").place(&cat, 1250.0, now).unwrap_err().field, "amount");
        assert_eq!(ticket("abc").place(&cat, 1250.0, now).unwrap_err().field, "amount");
        let mut t = ticket("100");
        t.selection.select_company("TD Asset Management");
        assert!(!t.is_ready());
        assert_eq!(t.place(&cat, 1250.0, now).unwrap_err().field, "product");
    }

    #[test]
    fn test_exceeding_settled_balance_warns_only() {
        let t = ticket("1250.01");
        assert!(t.exceeds(DEFAULT_SETTLED_BALANCE));
        let conf = t.place(&FundCatalog::builtin(), DEFAULT_SETTLED_BALANCE, Utc::now()).unwrap();
        assert!(conf.exceeds_settled_balance);
        assert!(!ticket("1250").exceeds(DEFAULT_SETTLED_BALANCE));
    }
}
