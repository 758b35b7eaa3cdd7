use std::time::Duration;

/// A confirmation node delays one edge of a boolean signal. A rising node only sets its output
/// once the input has been `true` for at least the time delay, while a falling input is passed
/// through immediately. A falling node does the opposite.
#[derive(Clone, Copy, Debug)]
pub struct ConfirmationNode {
    rising: bool,
    time_delay: Duration,
    condition_since: Duration,
    output: bool,
}

impl ConfirmationNode {
    pub fn new(rising: bool, time_delay: Duration) -> Self {
        Self {
            rising,
            time_delay,
            condition_since: Duration::ZERO,
            output: false,
        }
    }

    pub fn new_leading(time_delay: Duration) -> Self {
        Self::new(true, time_delay)
    }

    pub fn new_falling(time_delay: Duration) -> Self {
        Self::new(false, time_delay)
    }

    pub fn update(&mut self, value: bool, delta: Duration) -> bool {
        if value == self.rising {
            self.condition_since += delta;
            if self.condition_since >= self.time_delay {
                self.output = value;
            }
        } else {
            self.condition_since = Duration::ZERO;
            self.output = value;
        }

        self.output
    }

    pub fn get_output(&self) -> bool {
        self.output
    }

    pub fn reset(&mut self) {
        self.condition_since = Duration::ZERO;
        self.output = false;
    }
}

/// A pulse node outputs `true` for exactly one update when its input changes in the configured
/// direction. The very first update never pulses.
#[derive(Clone, Copy, Debug)]
pub struct PulseNode {
    rising: bool,
    previous_input: Option<bool>,
    output: bool,
}

impl PulseNode {
    pub fn new(rising: bool) -> Self {
        Self {
            rising,
            previous_input: None,
            output: false,
        }
    }

    pub fn new_rising() -> Self {
        Self::new(true)
    }

    pub fn new_falling() -> Self {
        Self::new(false)
    }

    pub fn update(&mut self, value: bool) -> bool {
        let previous = self.previous_input.replace(value).unwrap_or(value);

        self.output = if self.rising {
            value && !previous
        } else {
            !value && previous
        };

        self.output
    }

    pub fn get_output(&self) -> bool {
        self.output
    }

    pub fn reset(&mut self) {
        self.previous_input = None;
        self.output = false;
    }
}

/// A set/reset flip-flop. When both inputs are active at the same time, the node resolves the
/// conflict according to its priority.
#[derive(Clone, Copy, Debug)]
pub struct MemoryNode {
    set_has_priority: bool,
    initial_output: bool,
    output: bool,
}

impl MemoryNode {
    pub fn new(set_has_priority: bool) -> Self {
        Self::new_with_initial_output(set_has_priority, false)
    }

    pub fn new_with_initial_output(set_has_priority: bool, initial_output: bool) -> Self {
        Self {
            set_has_priority,
            initial_output,
            output: initial_output,
        }
    }

    pub fn update(&mut self, set: bool, reset: bool) -> bool {
        self.output = if self.set_has_priority {
            set || (!reset && self.output)
        } else {
            !reset && (set || self.output)
        };

        self.output
    }

    pub fn get_output(&self) -> bool {
        self.output
    }

    pub fn reset(&mut self) {
        self.output = self.initial_output;
    }
}
