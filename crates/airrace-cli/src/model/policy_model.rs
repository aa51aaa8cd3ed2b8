use std::path::Path;

use airrace_evaluator::policy::Policy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util;

/// A trained policy saved as JSON.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PolicyModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    /// Scenario fitness of `policy` in seconds (lower is better).
    pub final_fitness: f64,
    pub generations: u64,
    pub policy: Policy,
}

impl PolicyModel {
    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let model: Self = util::read_json_file("policy model", path)?;
        if !model.policy.is_within_bounds() {
            tracing::warn!(name = %model.name, "policy model has out-of-range fields; clamping");
        }
        Ok(Self {
            policy: model.policy.clamped(),
            ..model
        })
    }
}
