//! Timer-driven relaxation loop.
//!
//! The simulation owns its nodes for as long as it runs. Renderers read them between ticks
//! through [`Simulation::nodes`] (or the tick callback) and move a node only while they hold a
//! drag on it.

use crate::config::SimulationOptions;
use crate::error::Result;
use crate::force::{BBoxCollide, Force};
use crate::graph::Node;
use crate::metrics::NodeMetrics;
use std::time::Duration;

type TickFn = dyn FnMut(&[Node]);

/// Periodic timer handle. Dropping it (see [`Simulation::stop`]) cancels the schedule.
#[derive(Debug, Clone, Copy)]
struct Ticker {
    interval: Duration,
    pending: Duration,
}

impl Ticker {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: Duration::ZERO,
        }
    }

    fn feed(&mut self, elapsed: Duration) {
        self.pending = self.pending.saturating_add(elapsed);
    }

    /// Fires at most once. Whole intervals missed while the host was away are dropped; only
    /// the phase inside the current interval is kept.
    fn take_due(&mut self) -> bool {
        if self.interval.is_zero() || self.pending < self.interval {
            return false;
        }
        let phase = self.pending.as_nanos() % self.interval.as_nanos();
        self.pending = Duration::from_nanos(u64::try_from(phase).unwrap_or(0));
        true
    }
}

pub struct Simulation<F: Force = BBoxCollide> {
    nodes: Vec<Node>,
    force: F,
    on_tick: Option<Box<TickFn>>,
    alpha: f64,
    alpha_target: f64,
    alpha_min: f64,
    alpha_decay: f64,
    velocity_decay: f64,
    drag_alpha_target: f64,
    interval: Duration,
    ticker: Option<Ticker>,
    ticks: u64,
}

impl<F: Force + std::fmt::Debug> std::fmt::Debug for Simulation<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("nodes", &self.nodes)
            .field("force", &self.force)
            .field("alpha", &self.alpha)
            .field("alpha_target", &self.alpha_target)
            .field("running", &self.is_running())
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

impl Simulation<BBoxCollide> {
    /// Collision-only simulation using `metrics` for node boxes.
    pub fn with_metrics(
        nodes: Vec<Node>,
        metrics: &NodeMetrics,
        options: &SimulationOptions,
    ) -> Result<Self> {
        metrics.validate()?;
        let force = BBoxCollide::new(metrics.box_fn()).with_strength(options.collision_strength);
        Self::new(nodes, force, options)
    }
}

impl<F: Force> Simulation<F> {
    /// Takes ownership of `nodes` and starts cooling immediately (`alpha = 1`, target `0`).
    pub fn new(nodes: Vec<Node>, force: F, options: &SimulationOptions) -> Result<Self> {
        Self::build(nodes, force, options, None)
    }

    /// Like [`Simulation::new`], with a callback run once at construction and after every tick.
    pub fn with_callback(
        nodes: Vec<Node>,
        force: F,
        options: &SimulationOptions,
        on_tick: impl FnMut(&[Node]) + 'static,
    ) -> Result<Self> {
        Self::build(nodes, force, options, Some(Box::new(on_tick)))
    }

    fn build(
        mut nodes: Vec<Node>,
        mut force: F,
        options: &SimulationOptions,
        on_tick: Option<Box<TickFn>>,
    ) -> Result<Self> {
        options.validate()?;
        for n in nodes.iter_mut() {
            n.vx = 0.0;
            n.vy = 0.0;
        }
        force.initialize(&nodes)?;

        let mut sim = Self {
            nodes,
            force,
            on_tick,
            alpha: 1.0,
            alpha_target: 0.0,
            alpha_min: options.alpha_min,
            alpha_decay: options.alpha_decay(),
            velocity_decay: options.velocity_decay,
            drag_alpha_target: options.drag_alpha_target,
            interval: options.tick_interval(),
            ticker: None,
            ticks: 0,
        };
        sim.render();
        sim.start(0.0);
        Ok(sim)
    }

    /// Sets the alpha target and (re)arms the tick timer.
    pub fn start(&mut self, alpha_target: f64) {
        self.alpha_target = alpha_target;
        self.ticker = Some(Ticker::new(self.interval));
        tracing::debug!(alpha = self.alpha, alpha_target, "simulation started");
    }

    /// Cancels the tick timer. Alpha is kept.
    pub fn stop(&mut self) {
        if self.ticker.take().is_some() {
            tracing::debug!(alpha = self.alpha, ticks = self.ticks, "simulation stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f64 {
        self.alpha_target
    }

    pub fn alpha_min(&self) -> f64 {
        self.alpha_min
    }

    /// Ticks run since construction.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }

    pub fn force(&self) -> &F {
        &self.force
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    /// One step: cool alpha, accumulate forces, integrate with friction, render, and stop once
    /// alpha falls below `alpha_min`.
    pub fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

        // Forces land in velocities before any position moves.
        self.force.apply(&mut self.nodes, self.alpha);

        for n in self.nodes.iter_mut() {
            if n.dragging {
                n.vx = 0.0;
                n.vy = 0.0;
                continue;
            }
            n.vx *= self.velocity_decay;
            n.x += n.vx;
            n.vy *= self.velocity_decay;
            n.y += n.vy;
        }
        self.ticks += 1;
        tracing::trace!(tick = self.ticks, alpha = self.alpha, "simulation tick");

        self.render();
        if self.alpha < self.alpha_min {
            self.stop();
        }
    }

    /// Feeds host time into the tick timer and runs the tick if one became due.
    ///
    /// Returns the number of ticks run, `0` or `1`. A long stall does not replay the missed
    /// intervals. Does nothing while stopped; time spent stopped is not carried over into the
    /// next `start`.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let Some(ticker) = self.ticker.as_mut() else {
            return 0;
        };
        ticker.feed(elapsed);
        if !ticker.take_due() {
            return 0;
        }
        self.tick();
        1
    }

    /// Ticks until the loop stops itself or `max_ticks` is reached; returns the ticks run.
    pub fn run_until_idle(&mut self, max_ticks: usize) -> usize {
        let mut ran = 0usize;
        while self.is_running() && ran < max_ticks {
            self.tick();
            ran += 1;
        }
        ran
    }

    /// Pins a node for dragging and reheats the simulation.
    pub fn drag_start(&mut self, index: usize) -> bool {
        let Some(n) = self.nodes.get_mut(index) else {
            return false;
        };
        n.dragging = true;
        self.start(self.drag_alpha_target);
        true
    }

    /// Moves a pinned node. Ignored for nodes that are not being dragged.
    pub fn drag_to(&mut self, index: usize, x: f64, y: f64) -> bool {
        match self.nodes.get_mut(index) {
            Some(n) if n.dragging => {
                n.x = x;
                n.y = y;
                true
            }
            _ => false,
        }
    }

    /// Releases a pinned node and lets the simulation cool back to rest.
    pub fn drag_end(&mut self, index: usize) -> bool {
        let Some(n) = self.nodes.get_mut(index) else {
            return false;
        };
        n.dragging = false;
        self.start(0.0);
        true
    }

    /// Replaces a node's slots and re-derives every box. On failure the old slots are restored.
    pub fn set_slots(
        &mut self,
        index: usize,
        inputs: Vec<String>,
        outputs: Vec<String>,
    ) -> Result<bool> {
        let Some(n) = self.nodes.get_mut(index) else {
            return Ok(false);
        };
        let old_inputs = std::mem::replace(&mut n.inputs, inputs);
        let old_outputs = std::mem::replace(&mut n.outputs, outputs);

        if let Err(err) = self.force.initialize(&self.nodes) {
            let n = &mut self.nodes[index];
            n.inputs = old_inputs;
            n.outputs = old_outputs;
            return Err(err);
        }
        Ok(true)
    }

    fn render(&mut self) {
        if let Some(cb) = self.on_tick.as_mut() {
            cb(&self.nodes);
        }
    }
}
