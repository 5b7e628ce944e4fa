//! Drive client onboarding from a JSON object of form fields.
//!
//! Usage: client_wizard [fields.json]   (stdin when no file is given)

use anyhow::{bail, Context, Result};
use serde_json::{json, Value};
use std::io::Read;

use advisorbook::form::field_text;
use advisorbook::state::{Config, Dashboard};
use advisorbook::submit::SimulatedSubmitter;
use advisorbook::wizard::Advance;

#[tokio::main]
async fn main() -> Result<()> {
    let raw = match std::env::args().nth(1) {
        Some(p) => std::fs::read_to_string(&p).with_context(|| format!("reading {}", p))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let Value::Object(fields) = serde_json::from_str::<Value>(&raw)? else {
        bail!("expected a JSON object of form fields");
    };

    let cfg = Config::from_env();
    let submitter = SimulatedSubmitter::from_config(&cfg);
    let mut dashboard = Dashboard::from_config(cfg)?;
    dashboard.open_client_wizard();
    for (name, value) in fields {
        dashboard.set_client_field(&name, &field_text(value))?;
    }

    loop {
        match dashboard.advance_client(&submitter).await {
            Advance::Moved { .. } => continue,
            Advance::Submitted(_) => break,
            Advance::Blocked { missing } => bail!(
                "step {} is missing: {}",
                dashboard.client_wizard().step(),
                missing.join(", ")
            ),
            Advance::Idle => bail!("client wizard is not accepting input"),
        }
    }

    let record = dashboard
        .client_confirmation()
        .context("client submission produced no confirmation")?;
    println!("{}", serde_json::to_string_pretty(&json!({ "client": record }))?);
    Ok(())
}
