use num_traits::AsPrimitive;
use std::time::Duration;

/// A first order lag, discretised with the bilinear (Tustin) transform:
///
/// `y[n] = (u[n] + u[n-1]) * dt / (2T + dt) + y[n-1] * (2T - dt) / (2T + dt)`
///
/// The filter is generic over its storage width. The coefficients are always evaluated in double
/// precision, so a `LagFilter<f32>` only differs from a `LagFilter<f64>` in how the state is
/// rounded between frames.
#[derive(Clone, Copy, Debug, Default)]
pub struct LagFilter<T> {
    previous_output: Option<T>,
    previous_input: Option<T>,
}

impl<T> LagFilter<T>
where
    T: AsPrimitive<f64>,
    f64: AsPrimitive<T>,
{
    pub fn new() -> Self {
        Self {
            previous_output: None,
            previous_input: None,
        }
    }

    /// Filters `input` with the time constant `time_constant` (in seconds). The first call after
    /// construction or [`Self::reset`] passes the input through.
    pub fn update(&mut self, input: T, time_constant: f64, delta: Duration) -> T {
        let (previous_output, previous_input) = match (self.previous_output, self.previous_input) {
            (Some(output), Some(previous_input)) => (output, previous_input),
            _ => {
                self.previous_output = Some(input);
                self.previous_input = Some(input);
                return input;
            }
        };
        self.previous_input = Some(input);

        let dt = delta.as_secs_f64();
        let denominator = 2. * time_constant + dt;

        let output: T = if denominator > 0. {
            let ca = dt / denominator;
            let cb = (2. * time_constant - dt) / denominator;

            ((input.as_() + previous_input.as_()) * ca + previous_output.as_() * cb).as_()
        } else {
            input
        };

        self.previous_output = Some(output);
        output
    }

    pub fn output(&self) -> Option<T> {
        self.previous_output
    }

    pub fn reset(&mut self) {
        self.previous_output = None;
        self.previous_input = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELTA: Duration = Duration::from_millis(20);

    #[test]
    fn first_update_passes_input_through() {
        let mut filter = LagFilter::<f64>::new();

        assert_eq!(filter.update(12.5, 1., DELTA), 12.5);
    }

    #[test]
    fn step_response_follows_the_discretised_lag() {
        let mut filter = LagFilter::<f64>::new();
        filter.update(0., 1., DELTA);

        let output = filter.update(10., 1., DELTA);

        let dt = DELTA.as_secs_f64();
        let expected = 10. * dt / (2. + dt);
        assert!((output - expected).abs() < 1e-12);
    }

    #[test]
    fn converges_monotonically_to_a_constant_input() {
        let mut filter = LagFilter::<f64>::new();
        filter.update(0., 0.5, DELTA);

        let mut previous = 0.;
        for _ in 0..1000 {
            let output = filter.update(100., 0.5, DELTA);
            assert!(output >= previous - 1e-9);
            assert!(output <= 100. + 1e-9);
            previous = output;
        }

        assert!((previous - 100.).abs() < 1e-6);
    }

    #[test]
    fn response_after_one_time_constant_is_close_to_the_continuous_lag() {
        let mut filter = LagFilter::<f64>::new();
        filter.update(0., 1., DELTA);

        let mut output = 0.;
        for _ in 0..50 {
            output = filter.update(1., 1., DELTA);
        }

        let continuous = 1. - (-1.0f64).exp();
        assert!((output - continuous).abs() < 0.01);
    }

    #[test]
    fn reset_restarts_from_the_next_input() {
        let mut filter = LagFilter::<f64>::new();
        filter.update(0., 1., DELTA);
        filter.update(10., 1., DELTA);

        filter.reset();

        assert_eq!(filter.output(), None);
        assert_eq!(filter.update(-3., 1., DELTA), -3.);
    }

    #[test]
    fn zero_time_constant_and_zero_delta_pass_input_through() {
        let mut filter = LagFilter::<f64>::new();
        filter.update(0., 0., Duration::ZERO);

        assert_eq!(filter.update(5., 0., Duration::ZERO), 5.);
    }

    #[test]
    fn single_precision_variant_tracks_double_precision_variant() {
        let mut single = LagFilter::<f32>::new();
        let mut double = LagFilter::<f64>::new();

        for step in 0..200 {
            let input = (step as f64 * 0.1).sin() * 10.;
            let s = single.update(input as f32, 0.3, DELTA);
            let d = double.update(input, 0.3, DELTA);
            assert!((s as f64 - d).abs() < 1e-3);
        }
    }
}
