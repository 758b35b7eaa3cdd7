use std::time::Duration;

/// A backward difference derivative `gain * (u[n] - u[n-1]) / dt`. The first call after
/// construction or reset only records the input and outputs zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct DerivativeNode {
    previous_input: Option<f64>,
}

impl DerivativeNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, input: f64, gain: f64, delta: Duration) -> f64 {
        let previous_input = self.previous_input.replace(input);
        let dt = delta.as_secs_f64();

        match previous_input {
            Some(previous) if dt > 0. => gain * (input - previous) / dt,
            _ => 0.,
        }
    }

    pub fn reset(&mut self) {
        self.previous_input = None;
    }
}
