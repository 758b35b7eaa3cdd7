pub mod arinc429;
pub mod derivative;
pub mod high_pass_filter;
pub mod integrator;
pub mod interpolation;
pub mod logic_nodes;
pub mod low_pass_filter;
pub mod rate_limiter;

pub use interpolation::interpolation;

#[derive(Clone, Copy, Default, PartialEq, PartialOrd, Debug)]
pub struct MachNumber(pub f64);

impl MachNumber {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<f64> for MachNumber {
    fn from(value: f64) -> Self {
        MachNumber(value)
    }
}

impl From<MachNumber> for f64 {
    fn from(value: MachNumber) -> Self {
        value.0
    }
}
