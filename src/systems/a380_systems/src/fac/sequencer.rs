use log::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TakeoffConfigMemory {
    Cleared,
    Captured { flap_handle_index: u8 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlphaFloorLatch {
    Inactive,
    Active,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FacMode {
    Disengaged,
    Engaged {
        takeoff_config: TakeoffConfigMemory,
        alpha_floor: AlphaFloorLatch,
    },
}

impl FacMode {
    pub fn is_engaged(&self) -> bool {
        matches!(self, FacMode::Engaged { .. })
    }

    pub fn takeoff_config_captured(&self) -> bool {
        matches!(
            self,
            FacMode::Engaged {
                takeoff_config: TakeoffConfigMemory::Captured { .. },
                ..
            }
        )
    }

    pub fn alpha_floor_active(&self) -> bool {
        matches!(
            self,
            FacMode::Engaged {
                alpha_floor: AlphaFloorLatch::Active,
                ..
            }
        )
    }
}

/// The confirmed conditions a transition is evaluated against. None of these may be raw bus
/// discretes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SequencerInputs {
    pub engage_request: bool,
    pub on_ground: bool,
    pub flap_handle_index: Option<u8>,
    pub alpha_floor_trigger: bool,
    pub alpha_floor_reset: bool,
    pub alpha_floor_inhibit: bool,
}

const TAKEOFF_FLAP_HANDLE_INDICES: std::ops::RangeInclusive<u8> = 1..=3;

/// Computes the mode of the next frame.
pub fn transition(mode: FacMode, inputs: &SequencerInputs) -> FacMode {
    match mode {
        FacMode::Disengaged if inputs.engage_request => FacMode::Engaged {
            takeoff_config: next_takeoff_config(TakeoffConfigMemory::Cleared, inputs),
            alpha_floor: AlphaFloorLatch::Inactive,
        },
        FacMode::Disengaged => FacMode::Disengaged,
        FacMode::Engaged { .. } if !inputs.engage_request => FacMode::Disengaged,
        FacMode::Engaged {
            takeoff_config,
            alpha_floor,
        } => FacMode::Engaged {
            takeoff_config: next_takeoff_config(takeoff_config, inputs),
            alpha_floor: next_alpha_floor(alpha_floor, inputs),
        },
    }
}

fn next_takeoff_config(
    memory: TakeoffConfigMemory,
    inputs: &SequencerInputs,
) -> TakeoffConfigMemory {
    match (inputs.on_ground, inputs.flap_handle_index, memory) {
        (true, Some(index), _) if TAKEOFF_FLAP_HANDLE_INDICES.contains(&index) => {
            TakeoffConfigMemory::Captured {
                flap_handle_index: index,
            }
        }
        (true, _, _) => TakeoffConfigMemory::Cleared,
        (false, Some(index), TakeoffConfigMemory::Captured { flap_handle_index })
            if index == flap_handle_index =>
        {
            memory
        }
        (false, None, TakeoffConfigMemory::Captured { .. }) => memory,
        (false, _, _) => TakeoffConfigMemory::Cleared,
    }
}

fn next_alpha_floor(latch: AlphaFloorLatch, inputs: &SequencerInputs) -> AlphaFloorLatch {
    match latch {
        AlphaFloorLatch::Inactive if inputs.alpha_floor_trigger && !inputs.alpha_floor_inhibit => {
            AlphaFloorLatch::Active
        }
        AlphaFloorLatch::Active if inputs.alpha_floor_reset || inputs.alpha_floor_inhibit => {
            AlphaFloorLatch::Inactive
        }
        _ => latch,
    }
}

/// Holds the mode across frames. The first update only enters the default state.
#[derive(Clone, Copy, Debug)]
pub(super) struct FacSequencer {
    is_active: bool,
    mode: FacMode,
}

impl FacSequencer {
    pub fn new() -> Self {
        Self {
            is_active: false,
            mode: FacMode::Disengaged,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn mode(&self) -> FacMode {
        self.mode
    }

    pub fn update(&mut self, inputs: &SequencerInputs) -> FacMode {
        if !self.is_active {
            self.is_active = true;
            self.mode = FacMode::Disengaged;
            return self.mode;
        }

        let next = transition(self.mode, inputs);
        log_transition(self.mode, next);
        self.mode = next;

        self.mode
    }
}

fn log_transition(previous: FacMode, next: FacMode) {
    if previous.is_engaged() != next.is_engaged() {
        debug!(
            "FAC {}",
            if next.is_engaged() {
                "engaged"
            } else {
                "disengaged"
            }
        );
    }

    if let (
        FacMode::Engaged {
            takeoff_config: previous_takeoff_config,
            alpha_floor: previous_alpha_floor,
        },
        FacMode::Engaged {
            takeoff_config,
            alpha_floor,
        },
    ) = (previous, next)
    {
        if previous_takeoff_config != takeoff_config {
            debug!("Takeoff configuration memory {:?}", takeoff_config);
        }
        if previous_alpha_floor != alpha_floor {
            debug!("Alpha floor {:?}", alpha_floor);
        }
    }
}
