use std::time::Duration;

/// Limits the rate of change of a signal. The rising rate `up` and the falling rate `lo` are
/// independent and given in units per second. Only their magnitudes are used, so a falling rate
/// may be written either as `-2.0` or `2.0`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RateLimiter {
    output: Option<f64>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// On the first call or while `reset` is set the output snaps to the input.
    pub fn update(&mut self, input: f64, up: f64, lo: f64, delta: Duration, reset: bool) -> f64 {
        self.update_with_initial_condition(input, up, lo, delta, input, reset)
    }

    /// On the first call or while `reset` is set the output snaps to `initial_condition`.
    pub fn update_with_initial_condition(
        &mut self,
        input: f64,
        up: f64,
        lo: f64,
        delta: Duration,
        initial_condition: f64,
        reset: bool,
    ) -> f64 {
        let output = match self.output {
            Some(previous) if !reset => {
                let dt = delta.as_secs_f64();
                previous + (input - previous).min(up.abs() * dt).max(-lo.abs() * dt)
            }
            _ => initial_condition,
        };

        self.output = Some(output);
        output
    }

    pub fn output(&self) -> Option<f64> {
        self.output
    }

    pub fn reset(&mut self) {
        self.output = None;
    }
}
