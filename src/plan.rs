//! Plan creation: draft, resulting plan record and the plan wizard flow.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::form::{parse_optional, truncate_chars, FieldError};
use crate::wizard::{Completion, Flow, Wizard};

pub const CODE_MAX_LEN: usize = 10;
pub const TIME_HORIZON_YEARS: std::ops::RangeInclusive<u8> = 1..=50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanType {
    #[serde(rename = "OPEN")]
    Open,
    #[serde(rename = "RRSP")]
    Rrsp,
    #[serde(rename = "RESP")]
    Resp,
    #[serde(rename = "TFSA")]
    Tfsa,
    #[serde(rename = "RRIF")]
    Rrif,
    #[serde(rename = "Non-Registered")]
    NonRegistered,
    #[serde(rename = "LIRA")]
    Lira,
    #[serde(rename = "LIF")]
    Lif,
}

impl PlanType {
    pub const ALL: [PlanType; 8] = [
        PlanType::Open,
        PlanType::Rrsp,
        PlanType::Resp,
        PlanType::Tfsa,
        PlanType::Rrif,
        PlanType::NonRegistered,
        PlanType::Lira,
        PlanType::Lif,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Open => "OPEN",
            PlanType::Rrsp => "RRSP",
            PlanType::Resp => "RESP",
            PlanType::Tfsa => "TFSA",
            PlanType::Rrif => "RRIF",
            PlanType::NonRegistered => "Non-Registered",
            PlanType::Lira => "LIRA",
            PlanType::Lif => "LIF",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlanType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown plan type '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
    #[serde(rename = "Very Aggressive")]
    VeryAggressive,
}

impl RiskTolerance {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTolerance::Conservative => "Conservative",
            RiskTolerance::Moderate => "Moderate",
            RiskTolerance::Aggressive => "Aggressive",
            RiskTolerance::VeryAggressive => "Very Aggressive",
        }
    }
}

impl FromStr for RiskTolerance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Conservative" => Ok(RiskTolerance::Conservative),
            "Moderate" => Ok(RiskTolerance::Moderate),
            "Aggressive" => Ok(RiskTolerance::Aggressive),
            "Very Aggressive" => Ok(RiskTolerance::VeryAggressive),
            _ => Err(format!("unknown risk tolerance '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDraft {
    #[serde(rename = "type")]
    pub plan_type: Option<PlanType>,
    pub owner_name: String,
    pub beneficiary_name: String,
    pub intermediary_code: String,
    pub intermediary_account_code: String,
    pub notes: String,
    pub objectives: String,
    pub risk_tolerance: Option<RiskTolerance>,
    pub time_horizon: Option<u8>,
}

impl PlanDraft {
    pub fn set_intermediary_code(&mut self, code: &str) {
        self.intermediary_code = truncate_chars(code, CODE_MAX_LEN);
    }

    pub fn set_intermediary_account_code(&mut self, code: &str) {
        self.intermediary_account_code = truncate_chars(code, CODE_MAX_LEN);
    }

    /// Years, 1 to 50. Empty input clears the field.
    pub fn set_time_horizon(&mut self, value: &str) -> Result<(), FieldError> {
        let value = value.trim();
        if value.is_empty() {
            self.time_horizon = None;
            return Ok(());
        }
        let years: u8 = value
            .parse()
            .map_err(|_| FieldError::new("timeHorizon", format!("'{}' is not a whole number of years", value)))?;
        if !TIME_HORIZON_YEARS.contains(&years) {
            return Err(FieldError::new("timeHorizon", "must be between 1 and 50 years"));
        }
        self.time_horizon = Some(years);
        Ok(())
    }

    /// Set a field by its form name. On error the draft is left unchanged.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        match name {
            "type" => self.plan_type = parse_optional(name, value)?,
            "ownerName" => self.owner_name = value.to_string(),
            "beneficiaryName" => self.beneficiary_name = value.to_string(),
            "intermediaryCode" => self.set_intermediary_code(value),
            "intermediaryAccountCode" => self.set_intermediary_account_code(value),
            "notes" => self.notes = value.to_string(),
            "objectives" => self.objectives = value.to_string(),
            "riskTolerance" => self.risk_tolerance = parse_optional(name, value)?,
            "timeHorizon" => self.set_time_horizon(value)?,
            _ => return Err(FieldError::unknown_field(name)),
        }
        Ok(())
    }

    /// The complete application, or `None` while a required field is empty.
    pub fn application(&self) -> Option<PlanApplication> {
        let required = [
            &self.owner_name,
            &self.beneficiary_name,
            &self.intermediary_code,
            &self.intermediary_account_code,
            &self.objectives,
        ];
        if required.iter().any(|v| v.is_empty()) {
            return None;
        }
        Some(PlanApplication {
            plan_type: self.plan_type?,
            owner_name: self.owner_name.clone(),
            beneficiary_name: self.beneficiary_name.clone(),
            intermediary_code: self.intermediary_code.clone(),
            intermediary_account_code: self.intermediary_account_code.clone(),
            notes: (!self.notes.is_empty()).then(|| self.notes.clone()),
            objectives: self.objectives.clone(),
            risk_tolerance: self.risk_tolerance?,
            time_horizon: self.time_horizon?,
        })
    }
}

/// A plan draft with every required field present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanApplication {
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    pub owner_name: String,
    pub beneficiary_name: String,
    pub intermediary_code: String,
    pub intermediary_account_code: String,
    pub notes: Option<String>,
    pub objectives: String,
    pub risk_tolerance: RiskTolerance,
    pub time_horizon: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    pub account_number: String,
    pub client_name: String,
}

const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub(crate) fn base36_suffix<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

impl Plan {
    /// Plan record for a submitted application: `PLN-<ms>-<10 base-36 chars>`
    /// and a ten-digit account number.
    pub fn synthesize<R: Rng>(app: &PlanApplication, now_ms: u64, rng: &mut R) -> Self {
        let account: u64 = rng.gen_range(1_000_000_000..10_000_000_000);
        Self {
            id: format!("PLN-{}-{}", now_ms, base36_suffix(rng, 10)),
            plan_type: app.plan_type,
            account_number: account.to_string(),
            client_name: app.owner_name.clone(),
        }
    }
}

/// Plan wizard: type, owner/beneficiary, intermediary codes, objectives, then
/// a success step.
#[derive(Debug, Clone, Copy)]
pub struct PlanFlow;

pub type PlanWizard = Wizard<PlanFlow>;

impl Flow for PlanFlow {
    type Draft = PlanDraft;
    type Submission = PlanApplication;
    type Output = Plan;

    const NAME: &'static str = "plan";
    const ENTRY_STEPS: usize = 4;
    const COMPLETION: Completion = Completion::SuccessStep;

    fn missing_fields(draft: &PlanDraft, step: usize) -> Vec<&'static str> {
        let checks: Vec<(&'static str, bool)> = match step {
            0 => vec![("type", draft.plan_type.is_some())],
            1 => vec![
                ("ownerName", !draft.owner_name.is_empty()),
                ("beneficiaryName", !draft.beneficiary_name.is_empty()),
            ],
            2 => vec![
                ("intermediaryCode", !draft.intermediary_code.is_empty()),
                ("intermediaryAccountCode", !draft.intermediary_account_code.is_empty()),
            ],
            3 => vec![
                ("objectives", !draft.objectives.is_empty()),
                ("riskTolerance", draft.risk_tolerance.is_some()),
                ("timeHorizon", draft.time_horizon.is_some()),
            ],
            _ => Vec::new(),
        };
        checks
            .into_iter()
            .filter(|(_, filled)| !filled)
            .map(|(name, _)| name)
            .collect()
    }

    fn submission(draft: &PlanDraft) -> Option<PlanApplication> {
        draft.application()
    }

    fn describe(plan: &Plan) -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("plan_id".to_string(), json!(plan.id));
        m.insert("plan_type".to_string(), json!(plan.plan_type.as_str()));
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_plan_type_names_round_trip() {
        for t in PlanType::ALL {
            assert_eq!(t.as_str().parse::<PlanType>().unwrap(), t);
        }
        assert!("RDSP".parse::<PlanType>().is_err());
    }

    #[test]
    fn test_codes_truncate_to_ten() {
        let mut d = PlanDraft::default();
        d.set_field("intermediaryCode", "ABCDEFGHIJKLMNOP").unwrap();
        assert_eq!(d.intermediary_code, "ABCDEFGHIJ");
    }

    #[test]
    fn test_time_horizon_bounds() {
        let mut d = PlanDraft::default();
        assert!(d.set_time_horizon("0").is_err());
        assert!(d.set_time_horizon("51").is_err());
        assert!(d.set_time_horizon("ten").is_err());
        assert_eq!(d.time_horizon, None);
        d.set_time_horizon("50").unwrap();
        assert_eq!(d.time_horizon, Some(50));
        d.set_time_horizon("").unwrap();
        assert_eq!(d.time_horizon, None);
    }

    #[test]
    fn test_bad_enum_leaves_draft_unchanged() {
        let mut d = PlanDraft::default();
        d.set_field("riskTolerance", "Moderate").unwrap();
        let err = d.set_field("riskTolerance", "Reckless").unwrap_err();
        assert_eq!(err.field, "riskTolerance");
        assert_eq!(d.risk_tolerance, Some(RiskTolerance::Moderate));
        assert!(d.set_field("colour", "red").is_err());
    }

    #[test]
    fn test_required_fields_per_step() {
        let mut d = PlanDraft::default();
        assert_eq!(PlanFlow::missing_fields(&d, 0), vec!["type"]);
        assert_eq!(PlanFlow::missing_fields(&d, 1), vec!["ownerName", "beneficiaryName"]);
        d.owner_name = "A".into();
        assert_eq!(PlanFlow::missing_fields(&d, 1), vec!["beneficiaryName"]);
        // notes are optional
        assert_eq!(PlanFlow::missing_fields(&d, 3).len(), 3);
        assert!(PlanFlow::missing_fields(&d, 4).is_empty());
    }

    fn filled() -> PlanDraft {
        let mut d = PlanDraft::default();
        for (k, v) in [
            ("type", "RRSP"),
            ("ownerName", "Jane"),
            ("beneficiaryName", "Sam"),
            ("intermediaryCode", "X1"),
            ("intermediaryAccountCode", "Y2"),
            ("objectives", "income"),
            ("riskTolerance", "Conservative"),
            ("timeHorizon", "5"),
        ] {
            d.set_field(k, v).unwrap();
        }
        d
    }

    #[test]
    fn test_application_requires_every_field_but_notes() {
        let d = filled();
        let app = d.application().unwrap();
        assert_eq!(app.notes, None);
        assert_eq!(app.time_horizon, 5);

        let mut d2 = d.clone();
        d2.set_field("notes", "call first").unwrap();
        assert_eq!(d2.application().unwrap().notes.as_deref(), Some("call first"));

        let mut d3 = d;
        d3.set_field("beneficiaryName", "").unwrap();
        assert!(d3.application().is_none());
    }

    #[test]
    fn test_synthesized_identifiers() {
        let mut rng = StdRng::seed_from_u64(7);
        let app = filled().application().unwrap();
        let plan = Plan::synthesize(&app, 1_700_000_000_000, &mut rng);
        assert!(plan.id.starts_with("PLN-1700000000000-"));
        let suffix = plan.id.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), 10);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        assert_eq!(plan.account_number.len(), 10);
        assert!(!plan.account_number.starts_with('0'));
        assert_eq!(plan.client_name, "Jane");
        assert_eq!(plan.plan_type, PlanType::Rrsp);
    }
}
