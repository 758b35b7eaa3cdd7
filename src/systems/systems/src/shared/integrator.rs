use std::time::Duration;

/// A forward Euler integrator whose state is clamped to `[lower_limit, upper_limit]`.
#[derive(Clone, Copy, Debug)]
pub struct DiscreteTimeIntegrator {
    lower_limit: f64,
    upper_limit: f64,
    state: Option<f64>,
}

impl DiscreteTimeIntegrator {
    pub fn new(lower_limit: f64, upper_limit: f64) -> Self {
        Self {
            lower_limit,
            upper_limit,
            state: None,
        }
    }

    /// Integrates `gain * input` over `delta`. On the first call or while `reset` is set, the state
    /// is loaded with the (clamped) `initial_condition` instead.
    pub fn update(
        &mut self,
        input: f64,
        gain: f64,
        delta: Duration,
        initial_condition: f64,
        reset: bool,
    ) -> f64 {
        let state = match self.state {
            Some(state) if !reset => state + gain * input * delta.as_secs_f64(),
            _ => initial_condition,
        }
        .max(self.lower_limit)
        .min(self.upper_limit);

        self.state = Some(state);
        state
    }

    pub fn output(&self) -> Option<f64> {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = None;
    }
}
