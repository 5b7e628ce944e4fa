//! Recent-activity feed filtering.
//!
//! Transactions carry a human-readable relative time ("Today • 2:45 PM",
//! "Yesterday", "3 days ago"); the period filter works from that label.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::logging::log_filter;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub description: String,
    pub time: String,
    /// Signed amount in dollars.
    pub amount: f64,
    pub is_negative: bool,
}

impl Transaction {
    pub fn new(description: &str, time: &str, amount: f64) -> Self {
        Self {
            description: description.to_string(),
            time: time.to_string(),
            amount,
            is_negative: amount < 0.0,
        }
    }

    pub fn recency(&self) -> Recency {
        Recency::parse(&self.time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignFilter {
    #[default]
    All,
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodFilter {
    #[default]
    All,
    Today,
    Yesterday,
    Week,
    Month,
}

impl SignFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignFilter::All => "all",
            SignFilter::Positive => "positive",
            SignFilter::Negative => "negative",
        }
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        match self {
            SignFilter::All => true,
            SignFilter::Positive => !tx.is_negative,
            SignFilter::Negative => tx.is_negative,
        }
    }
}

impl PeriodFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodFilter::All => "all",
            PeriodFilter::Today => "today",
            PeriodFilter::Yesterday => "yesterday",
            PeriodFilter::Week => "week",
            PeriodFilter::Month => "month",
        }
    }

    /// Today and yesterday match their keyword anywhere in the label; week
    /// and month go by the "N day(s) ago" count when the label has one.
    pub fn matches(&self, label: &str) -> bool {
        let lower = label.to_lowercase();
        let keyword_day = || lower.contains("today") || lower.contains("yesterday");
        match self {
            PeriodFilter::All => true,
            PeriodFilter::Today => lower.contains("today"),
            PeriodFilter::Yesterday => lower.contains("yesterday"),
            PeriodFilter::Week => match days_ago(&lower) {
                Some(n) => n <= 7,
                None => keyword_day(),
            },
            PeriodFilter::Month => days_ago(&lower).map_or(true, |n| n <= 30),
        }
    }
}

impl FromStr for SignFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(SignFilter::All),
            "positive" => Ok(SignFilter::Positive),
            "negative" => Ok(SignFilter::Negative),
            other => Err(format!("unknown sign filter '{}'", other)),
        }
    }
}

impl FromStr for PeriodFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(PeriodFilter::All),
            "today" => Ok(PeriodFilter::Today),
            "yesterday" => Ok(PeriodFilter::Yesterday),
            "week" => Ok(PeriodFilter::Week),
            "month" => Ok(PeriodFilter::Month),
            other => Err(format!("unknown period filter '{}'", other)),
        }
    }
}

/// Relative time recovered from a transaction label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recency {
    Today,
    Yesterday,
    DaysAgo(u32),
    Unknown,
}

impl Recency {
    /// Case-insensitive. An "N day(s) ago" phrase wins over the keywords.
    pub fn parse(label: &str) -> Self {
        let lower = label.to_lowercase();
        if let Some(days) = days_ago(&lower) {
            return Recency::DaysAgo(days);
        }
        if lower.contains("today") {
            Recency::Today
        } else if lower.contains("yesterday") {
            Recency::Yesterday
        } else {
            Recency::Unknown
        }
    }
}

impl fmt::Display for Recency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recency::Today => f.write_str("today"),
            Recency::Yesterday => f.write_str("yesterday"),
            Recency::DaysAgo(n) => write!(f, "{} days ago", n),
            Recency::Unknown => f.write_str("unknown"),
        }
    }
}

/// Find `<digits><ws>*day[s]<ws>*ago` anywhere in a lowercased label.
fn days_ago(lower: &str) -> Option<u32> {
    let bytes = lower.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let digits = &lower[start..i];
        let rest = lower[i..].trim_start();
        if let Some(after_day) = rest.strip_prefix("day") {
            let after_day = after_day.strip_prefix('s').unwrap_or(after_day);
            if after_day.trim_start().starts_with("ago") {
                if let Ok(n) = digits.parse() {
                    return Some(n);
                }
            }
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivityFilter {
    pub sign: SignFilter,
    pub period: PeriodFilter,
}

impl ActivityFilter {
    pub fn new(sign: SignFilter, period: PeriodFilter) -> Self {
        Self { sign, period }
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        self.sign.matches(tx) && self.period.matches(&tx.time)
    }

    pub fn is_active(&self) -> bool {
        *self != ActivityFilter::default()
    }
}

/// Matching transactions in source order.
pub fn filter_transactions<'a>(txs: &'a [Transaction], filter: &ActivityFilter) -> Vec<&'a Transaction> {
    let out: Vec<&Transaction> = txs.iter().filter(|tx| filter.matches(tx)).collect();
    log_filter(filter.sign.as_str(), filter.period.as_str(), out.len(), txs.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recency_labels() {
        assert_eq!(Recency::parse("Today • 2:45 PM"), Recency::Today);
        assert_eq!(Recency::parse("Yesterday"), Recency::Yesterday);
        assert_eq!(Recency::parse("2 days ago"), Recency::DaysAgo(2));
        assert_eq!(Recency::parse("1 day ago"), Recency::DaysAgo(1));
        assert_eq!(Recency::parse("12 DAYS AGO • 9:00 AM"), Recency::DaysAgo(12));
        assert_eq!(Recency::parse("3days ago"), Recency::DaysAgo(3));
        assert_eq!(Recency::parse("Mar 3 • 10:00 AM"), Recency::Unknown);
        assert_eq!(Recency::parse("2:45 PM"), Recency::Unknown);
    }

    #[test]
    fn test_week_and_month_boundaries() {
        assert!(PeriodFilter::Week.matches("7 days ago"));
        assert!(!PeriodFilter::Week.matches("8 days ago"));
        assert!(PeriodFilter::Week.matches("Yesterday • 4:10 PM"));
        assert!(!PeriodFilter::Week.matches("Mar 3 • 10:00 AM"));
        assert!(PeriodFilter::Month.matches("30 days ago"));
        assert!(!PeriodFilter::Month.matches("31 days ago"));
        assert!(PeriodFilter::Month.matches("Mar 3 • 10:00 AM"));
    }

    #[test]
    fn test_keyword_matches_even_with_day_count() {
        let tx = Transaction::new("Transfer", "Today (3 days ago posted)", -1.0);
        assert!(ActivityFilter::new(SignFilter::Negative, PeriodFilter::Today).matches(&tx));
        assert!(!PeriodFilter::Yesterday.matches(&tx.time));
        assert!(PeriodFilter::Week.matches(&tx.time));
        assert!(PeriodFilter::Yesterday.matches("yesterday, 12 days ago"));
        assert!(!PeriodFilter::Week.matches("yesterday, 12 days ago"));
    }

    #[test]
    fn test_sign_uses_direction_flag() {
        let mut tx = Transaction::new("Fee", "Today", -10.0);
        assert!(SignFilter::Negative.matches(&tx));
        tx.is_negative = false;
        assert!(SignFilter::Positive.matches(&tx));
        assert!(!SignFilter::Negative.matches(&tx));
    }

    #[test]
    fn test_filters_parse_case_insensitively() {
        assert_eq!("Negative".parse::<SignFilter>().unwrap(), SignFilter::Negative);
        assert_eq!("WEEK".parse::<PeriodFilter>().unwrap(), PeriodFilter::Week);
        assert!("fortnight".parse::<PeriodFilter>().is_err());
    }
}
