//! Drive the plan wizard from a JSON object of form fields.
//!
//! Usage: plan_wizard [fields.json] [--company NAME --product NAME --amount N]
//! Reads stdin when no file is given.

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use serde_json::{json, Map, Value};
use std::io::Read;

use advisorbook::form::field_text;
use advisorbook::state::{Config, Dashboard};
use advisorbook::submit::SimulatedSubmitter;
use advisorbook::wizard::Advance;

struct Args {
    input: Option<String>,
    company: Option<String>,
    product: Option<String>,
    amount: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        input: None,
        company: None,
        product: None,
        amount: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        let mut value = |flag: &str| it.next().ok_or_else(|| anyhow!("{} needs a value", flag));
        match arg.as_str() {
            "--company" => args.company = Some(value("--company")?),
            "--product" => args.product = Some(value("--product")?),
            "--amount" => args.amount = Some(value("--amount")?),
            _ if arg.starts_with("--") => bail!("unknown flag {}", arg),
            _ => args.input = Some(arg),
        }
    }
    Ok(args)
}

fn read_fields(path: Option<&str>) -> Result<Map<String, Value>> {
    let raw = match path {
        Some(p) => std::fs::read_to_string(p).with_context(|| format!("reading {}", p))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    match serde_json::from_str::<Value>(&raw)? {
        Value::Object(map) => Ok(map),
        _ => bail!("expected a JSON object of form fields"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;
    let cfg = Config::from_env();
    let submitter = SimulatedSubmitter::from_config(&cfg);
    let mut dashboard = Dashboard::from_config(cfg)?;

    dashboard.open_plan_wizard();
    for (name, value) in read_fields(args.input.as_deref())? {
        dashboard.set_plan_field(&name, &field_text(value))?;
    }

    let plan = loop {
        match dashboard.advance_plan(&submitter).await {
            Advance::Moved { .. } => continue,
            Advance::Submitted(plan) => break plan,
            Advance::Blocked { missing } => bail!(
                "step {} is missing: {}",
                dashboard.plan_wizard().step(),
                missing.join(", ")
            ),
            Advance::Idle => bail!("plan wizard is not accepting input"),
        }
    };

    let mut out = json!({ "plan": plan });
    if let Some(company) = &args.company {
        dashboard.select_fund_company(company);
        if let Some(product) = &args.product {
            dashboard.select_product(product);
        }
        dashboard.set_investment_amount(args.amount.as_deref().unwrap_or(""));
        let order = dashboard.place_order(Utc::now())?;
        out["order"] = json!(order);
    }
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
