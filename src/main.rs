use anyhow::Result;
use serde_json::json;

use advisorbook::logging::{log, obj, v_num, v_str, Domain, Level};
use advisorbook::state::{Config, Dashboard};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[
            ("catalog", v_str(cfg.catalog_path.as_deref().unwrap_or("builtin"))),
            ("settled_balance", v_num(cfg.settled_balance)),
            ("sign", v_str(cfg.activity_sign.as_str())),
            ("period", v_str(cfg.activity_period.as_str())),
            ("trades_view", v_str(cfg.trades_view.as_str())),
        ]),
    );

    let dashboard = Dashboard::from_config(cfg)?;

    let mut plans = Vec::new();
    for summary in dashboard.plan_summaries() {
        plans.push(json!({
            "type": summary.plan_type,
            "count": summary.count,
            "aua": summary.aua,
            "clients_url": dashboard.clients_route(Some(summary.plan_type.as_str()))?.as_str(),
        }));
    }

    let snapshot = json!({
        "stats": dashboard.stats(),
        "clients_url": dashboard.clients_route(None)?.as_str(),
        "total_plans": dashboard.total_plans(),
        "plans": plans,
        "activity": {
            "filter": dashboard.activity_filter,
            "transactions": dashboard.visible_transactions(),
        },
        "trades": {
            "view": dashboard.trades_view,
            "items": dashboard.visible_trades(),
        },
        "fund_companies": dashboard.catalog().companies(),
    });
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
