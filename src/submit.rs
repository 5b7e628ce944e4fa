use async_trait::async_trait;
use tokio::time::{sleep, Duration};

use crate::client::{ClientDraft, ClientFlow, ClientRecord};
use crate::logging::ts_epoch_ms;
use crate::plan::{Plan, PlanApplication, PlanFlow};
use crate::state::Config;
use crate::wizard::Submitter;

/// Stands in for a back office: waits a fixed delay, then mints identifiers.
/// Never fails.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedSubmitter {
    pub delay: Duration,
}

impl SimulatedSubmitter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(Duration::from_millis(cfg.submit_delay_ms))
    }

    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }
}

#[async_trait]
impl Submitter<PlanFlow> for SimulatedSubmitter {
    async fn submit(&self, app: &PlanApplication) -> Plan {
        sleep(self.delay).await;
        Plan::synthesize(app, ts_epoch_ms(), &mut rand::thread_rng())
    }
}

#[async_trait]
impl Submitter<ClientFlow> for SimulatedSubmitter {
    async fn submit(&self, draft: &ClientDraft) -> ClientRecord {
        sleep(self.delay).await;
        ClientRecord::synthesize(draft, ts_epoch_ms(), &mut rand::thread_rng())
    }
}
