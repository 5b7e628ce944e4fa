//! Client onboarding: client and beneficiary identities.

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::str::FromStr;

use crate::form::{parse_date, parse_optional, truncate_chars, FieldError};
use crate::plan::base36_suffix;
use crate::wizard::{Completion, Flow, Wizard};

pub const SIN_MAX_LEN: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relationship {
    Spouse,
    Child,
    Parent,
    Sibling,
    Other,
}

impl FromStr for Relationship {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Spouse" => Ok(Relationship::Spouse),
            "Child" => Ok(Relationship::Child),
            "Parent" => Ok(Relationship::Parent),
            "Sibling" => Ok(Relationship::Sibling),
            "Other" => Ok(Relationship::Other),
            _ => Err(format!("unknown relationship '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub first_name: String,
    pub last_name: String,
    pub sin: String,
    pub phone: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeneficiaryIdentity {
    #[serde(flatten)]
    pub identity: Identity,
    pub relationship: Option<Relationship>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDraft {
    pub client: Identity,
    pub beneficiary: BeneficiaryIdentity,
}

impl ClientDraft {
    /// Set a field by its form name; beneficiary fields carry a
    /// `beneficiary` prefix (`beneficiaryFirstName`, ...).
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), FieldError> {
        if name == "beneficiaryRelationship" {
            self.beneficiary.relationship = parse_optional(name, value)?;
            return Ok(());
        }
        let (target, field) = match name.strip_prefix("beneficiary") {
            Some(rest) if !rest.is_empty() => (&mut self.beneficiary.identity, rest),
            _ => (&mut self.client, name),
        };
        match field {
            "firstName" | "FirstName" => target.first_name = value.to_string(),
            "lastName" | "LastName" => target.last_name = value.to_string(),
            "sin" | "SIN" => target.sin = truncate_chars(value, SIN_MAX_LEN),
            "phone" | "Phone" => target.phone = value.to_string(),
            "email" | "Email" => target.email = value.to_string(),
            "dateOfBirth" | "DateOfBirth" => target.date_of_birth = parse_date(name, value)?,
            "address" | "Address" => target.address = value.to_string(),
            _ => return Err(FieldError::unknown_field(name)),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub id: String,
    pub client: Identity,
    pub beneficiary: BeneficiaryIdentity,
}

impl ClientRecord {
    pub fn synthesize<R: Rng>(draft: &ClientDraft, now_ms: u64, rng: &mut R) -> Self {
        Self {
            id: format!("CLT-{}-{}", now_ms, base36_suffix(rng, 6)),
            client: draft.client.clone(),
            beneficiary: draft.beneficiary.clone(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.client.first_name, self.client.last_name)
    }
}

/// Two steps: client details, then beneficiary details. Submitting the
/// second step closes the dialog.
#[derive(Debug, Clone, Copy)]
pub struct ClientFlow;

pub type ClientWizard = Wizard<ClientFlow>;

fn empty(v: &str) -> bool {
    v.is_empty()
}

impl Flow for ClientFlow {
    type Draft = ClientDraft;
    type Submission = ClientDraft;
    type Output = ClientRecord;

    const NAME: &'static str = "client";
    const ENTRY_STEPS: usize = 2;
    const COMPLETION: Completion = Completion::CloseDialog;

    fn missing_fields(draft: &ClientDraft, step: usize) -> Vec<&'static str> {
        let c = &draft.client;
        let b = &draft.beneficiary;
        let checks: Vec<(&'static str, bool)> = match step {
            0 => vec![
                ("firstName", empty(&c.first_name)),
                ("lastName", empty(&c.last_name)),
                ("sin", empty(&c.sin)),
                ("phone", empty(&c.phone)),
                ("email", empty(&c.email)),
                ("dateOfBirth", c.date_of_birth.is_none()),
                ("address", empty(&c.address)),
            ],
            // beneficiary SIN and phone are optional
            1 => vec![
                ("beneficiaryFirstName", empty(&b.identity.first_name)),
                ("beneficiaryLastName", empty(&b.identity.last_name)),
                ("beneficiaryRelationship", b.relationship.is_none()),
                ("beneficiaryEmail", empty(&b.identity.email)),
                ("beneficiaryDateOfBirth", b.identity.date_of_birth.is_none()),
                ("beneficiaryAddress", empty(&b.identity.address)),
            ],
            _ => Vec::new(),
        };
        checks
            .into_iter()
            .filter(|(_, missing)| *missing)
            .map(|(name, _)| name)
            .collect()
    }

    fn submission(draft: &ClientDraft) -> Option<ClientDraft> {
        let complete = (0..Self::ENTRY_STEPS).all(|step| Self::missing_fields(draft, step).is_empty());
        complete.then(|| draft.clone())
    }

    fn describe(record: &ClientRecord) -> Map<String, Value> {
        let mut m = Map::new();
        m.insert("client_id".to_string(), json!(record.id));
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beneficiary_prefix_routes_fields() {
        let mut d = ClientDraft::default();
        d.set_field("firstName", "Ana").unwrap();
        d.set_field("beneficiaryFirstName", "Luis").unwrap();
        d.set_field("beneficiaryRelationship", "Spouse").unwrap();
        d.set_field("beneficiarySIN", "123-456-789-000").unwrap();
        assert_eq!(d.client.first_name, "Ana");
        assert_eq!(d.beneficiary.identity.first_name, "Luis");
        assert_eq!(d.beneficiary.relationship, Some(Relationship::Spouse));
        assert_eq!(d.beneficiary.identity.sin, "123-456-789");
        assert!(d.client.sin.is_empty());
    }

    #[test]
    fn test_unknown_and_malformed_fields() {
        let mut d = ClientDraft::default();
        assert!(d.set_field("beneficiary", "x").is_err());
        assert!(d.set_field("nickname", "x").is_err());
        let err = d.set_field("dateOfBirth", "31/12/1980").unwrap_err();
        assert_eq!(err.field, "dateOfBirth");
        assert!(d.client.date_of_birth.is_none());
    }

    #[test]
    fn test_beneficiary_sin_not_required() {
        let mut d = ClientDraft::default();
        for (k, v) in [
            ("beneficiaryFirstName", "Luis"),
            ("beneficiaryLastName", "Diaz"),
            ("beneficiaryRelationship", "Child"),
            ("beneficiaryEmail", "l@d.ca"),
            ("beneficiaryDateOfBirth", "2010-05-01"),
            ("beneficiaryAddress", "1 Main St"),
        ] {
            d.set_field(k, v).unwrap();
        }
        assert!(ClientFlow::missing_fields(&d, 1).is_empty());
        assert_eq!(ClientFlow::missing_fields(&d, 0).len(), 7);
        assert!(ClientFlow::submission(&d).is_none());
    }
}
