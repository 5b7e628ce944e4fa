use anyhow::{Context, Result};
use url::Url;

pub const DEFAULT_CLIENTS_BASE: &str = "app://advisor/clients";

/// Navigation target for the clients view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientsRoute {
    pub plan_type: Option<String>,
}

impl ClientsRoute {
    pub fn all() -> Self {
        Self { plan_type: None }
    }

    pub fn for_plan_type(plan_type: &str) -> Self {
        Self {
            plan_type: Some(plan_type.to_string()),
        }
    }

    pub fn to_url(&self, base: &str) -> Result<Url> {
        let mut url = Url::parse(base).with_context(|| format!("invalid clients base url '{}'", base))?;
        url.set_query(None);
        if let Some(t) = &self.plan_type {
            url.query_pairs_mut().append_pair("planType", t);
        }
        Ok(url)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw).with_context(|| format!("invalid route '{}'", raw))?;
        let plan_type = url
            .query_pairs()
            .find(|(k, _)| k == "planType")
            .map(|(_, v)| v.into_owned());
        Ok(Self { plan_type })
    }
}
