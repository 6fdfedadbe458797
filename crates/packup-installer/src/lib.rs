mod fetch_apply;
mod planner;

pub use fetch_apply::fetch_and_apply;
pub use planner::{collect_plan, plan_upgrades, UpgradeEnv};
