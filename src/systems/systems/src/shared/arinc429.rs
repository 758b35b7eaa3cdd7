/// The sign status matrix (SSM) of an ARINC 429 word. The SSM encodes how the receiver is
/// expected to interpret the accompanied value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignStatus {
    /// The data is most likely faulty.
    FailureWarning,
    /// The data has been artificially forced to a certain value.
    FunctionalTest,
    /// No failure has been detected, but no data is available. For example, the radio altimeter
    /// in cruise won't return any valid data even if it has not failed.
    NoComputedData,
    /// The data is considered valid.
    NormalOperation,
}

impl Default for SignStatus {
    fn default() -> Self {
        SignStatus::FailureWarning
    }
}

impl From<SignStatus> for u32 {
    fn from(value: SignStatus) -> Self {
        match value {
            SignStatus::FailureWarning => 0b00,
            SignStatus::FunctionalTest => 0b01,
            SignStatus::NoComputedData => 0b10,
            SignStatus::NormalOperation => 0b11,
        }
    }
}

impl From<u32> for SignStatus {
    /// Only the two least significant bits are considered.
    fn from(value: u32) -> Self {
        match value & 0b11 {
            0b00 => SignStatus::FailureWarning,
            0b01 => SignStatus::FunctionalTest,
            0b10 => SignStatus::NoComputedData,
            _ => SignStatus::NormalOperation,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Arinc429Word<T: Copy> {
    value: T,
    ssm: SignStatus,
}

impl<T: Copy> Arinc429Word<T> {
    pub fn new(value: T, ssm: SignStatus) -> Self {
        Self { value, ssm }
    }

    pub fn new_norm(value: T) -> Self {
        Self::new(value, SignStatus::NormalOperation)
    }

    /// The raw value, regardless of the sign status. Callers must check the SSM before trusting
    /// it.
    pub fn value(&self) -> T {
        self.value
    }

    pub fn ssm(&self) -> SignStatus {
        self.ssm
    }

    /// Returns the value only when the word is in normal operation.
    pub fn normal_value(&self) -> Option<T> {
        if self.is_normal_operation() {
            Some(self.value)
        } else {
            None
        }
    }

    pub fn is_failure_warning(&self) -> bool {
        matches!(self.ssm, SignStatus::FailureWarning)
    }

    pub fn is_functional_test(&self) -> bool {
        matches!(self.ssm, SignStatus::FunctionalTest)
    }

    pub fn is_no_computed_data(&self) -> bool {
        matches!(self.ssm, SignStatus::NoComputedData)
    }

    pub fn is_normal_operation(&self) -> bool {
        matches!(self.ssm, SignStatus::NormalOperation)
    }
}

impl<T: Copy + Default> Arinc429Word<T> {
    /// Returns the value when the word is in normal operation, the type's default otherwise.
    pub fn value_or_default(&self) -> T {
        self.normal_value().unwrap_or_default()
    }

    pub fn value_or(&self, substitute: T) -> T {
        self.normal_value().unwrap_or(substitute)
    }
}

impl Arinc429Word<u32> {
    /// Reads a single bit of a discrete word. Bits are numbered from 1 to 32 as on the wire, so
    /// that the data field of a discrete word spans bits 11 to 29. Bits outside that range read as
    /// `false`.
    ///
    /// The bit is returned regardless of the SSM; use [`Self::bit_if_normal`] when the consumer
    /// must not act on unreliable data.
    pub fn bit(&self, bit: u8) -> bool {
        if (1..=32).contains(&bit) {
            (self.value >> (bit - 1)) & 1 == 1
        } else {
            false
        }
    }

    /// Reads a bit only when the word is in normal operation.
    pub fn bit_if_normal(&self, bit: u8) -> Option<bool> {
        self.normal_value().map(|_| self.bit(bit))
    }

    /// Extracts an unsigned fixed point field of `length` bits starting at `first_bit` and scales
    /// it by `resolution`.
    pub fn fixed_point_value(&self, first_bit: u8, length: u8, resolution: f64) -> f64 {
        if first_bit == 0 || length == 0 || first_bit as u32 + length as u32 > 33 {
            return 0.;
        }

        let mask = if length >= 32 {
            u32::MAX
        } else {
            (1u32 << length) - 1
        };

        (((self.value >> (first_bit - 1)) & mask) as f64) * resolution
    }
}

/// Assembles a discrete word out of the 19 data bits 11 to 29.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiscreteWordBuilder {
    value: u32,
}

impl DiscreteWordBuilder {
    const FIRST_DATA_BIT: u8 = 11;
    const LAST_DATA_BIT: u8 = 29;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, bit: u8, value: bool) -> &mut Self {
        if (Self::FIRST_DATA_BIT..=Self::LAST_DATA_BIT).contains(&bit) {
            if value {
                self.value |= 1 << (bit - 1);
            } else {
                self.value &= !(1 << (bit - 1));
            }
        }

        self
    }

    /// Packs the 19 data bits in order, `values[0]` ending up in bit 11.
    pub fn from_data_bits(values: [bool; 19]) -> Self {
        let mut builder = Self::new();
        for (offset, value) in values.iter().enumerate() {
            builder.set(Self::FIRST_DATA_BIT + offset as u8, *value);
        }

        builder
    }

    pub fn build(&self, ssm: SignStatus) -> Arinc429Word<u32> {
        Arinc429Word::new(self.value, ssm)
    }
}
