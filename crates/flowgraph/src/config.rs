use crate::error::{Error, Result};
use crate::metrics::NodeMetrics;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning of the relaxation loop. Every field has a default, so partial JSON is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationOptions {
    /// The loop stops itself once alpha drops below this.
    pub alpha_min: f64,
    /// Per-tick relaxation rate of alpha toward its target. Derived from `alpha_min` and
    /// `cooling_ticks` when unset.
    pub alpha_decay: Option<f64>,
    /// Ticks for alpha to cool from 1 to `alpha_min` with a zero target.
    pub cooling_ticks: u32,
    /// Fraction of velocity kept on each tick (friction).
    pub velocity_decay: f64,
    pub tick_interval_ms: u64,
    pub collision_strength: f64,
    /// Alpha target used while a node is being dragged.
    pub drag_alpha_target: f64,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            alpha_min: 0.001,
            alpha_decay: None,
            cooling_ticks: 300,
            velocity_decay: 0.6,
            tick_interval_ms: 20,
            collision_strength: 10.0,
            drag_alpha_target: 0.3,
        }
    }
}

impl SimulationOptions {
    pub fn alpha_decay(&self) -> f64 {
        self.alpha_decay
            .unwrap_or_else(|| 1.0 - self.alpha_min.powf(1.0 / f64::from(self.cooling_ticks)))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        fn check(key: &'static str, ok: bool, v: impl std::fmt::Display) -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(Error::InvalidConfig {
                    key,
                    message: format!("out of range: {v}"),
                })
            }
        }

        check(
            "alphaMin",
            self.alpha_min.is_finite() && self.alpha_min > 0.0 && self.alpha_min < 1.0,
            self.alpha_min,
        )?;
        check("coolingTicks", self.cooling_ticks > 0, self.cooling_ticks)?;
        let decay = self.alpha_decay();
        check("alphaDecay", decay > 0.0 && decay <= 1.0, decay)?;
        check(
            "velocityDecay",
            (0.0..=1.0).contains(&self.velocity_decay),
            self.velocity_decay,
        )?;
        check("tickIntervalMs", self.tick_interval_ms > 0, self.tick_interval_ms)?;
        check(
            "collisionStrength",
            self.collision_strength.is_finite() && self.collision_strength >= 0.0,
            self.collision_strength,
        )?;
        check(
            "dragAlphaTarget",
            (0.0..=1.0).contains(&self.drag_alpha_target),
            self.drag_alpha_target,
        )?;
        Ok(())
    }
}

/// Top-level configuration, as read from a JSON file.
///
/// ```json
/// { "metrics": { "nodeWidth": 200 }, "simulation": { "velocityDecay": 0.5 } }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub metrics: NodeMetrics,
    pub simulation: SimulationOptions,
}

impl FlowConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let cfg: FlowConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.metrics.validate()?;
        self.simulation.validate()
    }
}
