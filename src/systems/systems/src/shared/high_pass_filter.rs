use std::time::Duration;

/// A washout (first order high pass) filter `T s / (T s + 1)`, discretised with the bilinear
/// transform. The first call after construction or reset outputs zero and only records the input.
#[derive(Clone, Copy, Debug, Default)]
pub struct WashoutFilter {
    previous_output: Option<f64>,
    previous_input: Option<f64>,
}

impl WashoutFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, input: f64, time_constant: f64, delta: Duration) -> f64 {
        let (previous_output, previous_input) = match (self.previous_output, self.previous_input) {
            (Some(output), Some(previous_input)) => (output, previous_input),
            _ => {
                self.previous_output = Some(0.);
                self.previous_input = Some(input);
                return 0.;
            }
        };
        self.previous_input = Some(input);

        let dt = delta.as_secs_f64();
        let denominator = 2. * time_constant + dt;

        let output = if denominator > 0. {
            let ca = 2. * time_constant / denominator;
            let cb = (2. * time_constant - dt) / denominator;

            (input - previous_input) * ca + previous_output * cb
        } else {
            0.
        };

        self.previous_output = Some(output);
        output
    }

    pub fn reset(&mut self) {
        self.previous_output = None;
        self.previous_input = None;
    }
}
