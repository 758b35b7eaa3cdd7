use super::acquisition::AcquiredData;
use super::parameters::FacParameterTable;
use std::time::Duration;
use systems::shared::{
    high_pass_filter::WashoutFilter,
    integrator::DiscreteTimeIntegrator,
    logic_nodes::{MemoryNode, PulseNode},
    rate_limiter::RateLimiter,
};

/// Surface commands in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LawCommands {
    pub yaw_damper_command: f64,
    pub rudder_trim_command: f64,
    pub rudder_trim_reset_active: bool,
    pub rudder_travel_lim_command: f64,
}

/// Damps the dutch roll by washing out the yaw rate. While disengaged or tracking, the command
/// follows the actual actuator position so that engagement is bumpless.
pub(super) struct YawDamperLaw {
    yaw_rate_washout: WashoutFilter,
    command_limiter: RateLimiter,
}

impl YawDamperLaw {
    pub fn new() -> Self {
        Self {
            yaw_rate_washout: WashoutFilter::new(),
            command_limiter: RateLimiter::new(),
        }
    }

    pub fn reset(&mut self) {
        self.yaw_rate_washout.reset();
        self.command_limiter.reset();
    }

    pub fn update(
        &mut self,
        delta: Duration,
        parameters: &FacParameterTable,
        acquired: &AcquiredData,
        active: bool,
        position: f64,
    ) -> f64 {
        let yaw_rate = acquired
            .inertial_data
            .map(|data| data.yaw_rate)
            .unwrap_or_default();
        let washed_out_yaw_rate = self.yaw_rate_washout.update(
            yaw_rate,
            parameters.yaw_damper_washout_time_constant,
            delta,
        );

        // Without airspeed the lowest gain of the schedule applies.
        let gain = parameters.yaw_damper_gain.interpolate(
            acquired
                .air_data
                .map(|data| data.computed_airspeed)
                .unwrap_or(f64::INFINITY),
        );
        let order = (-gain * washed_out_yaw_rate + acquired.fmgc_delta_r.unwrap_or_default())
            .max(-parameters.yaw_damper_authority)
            .min(parameters.yaw_damper_authority);

        self.command_limiter.update_with_initial_condition(
            if active { order } else { position },
            parameters.yaw_damper_rate_limit,
            parameters.yaw_damper_rate_limit,
            delta,
            position,
            !active,
        )
    }
}

/// Integrates the pilot's trim switches. A press of the reset button drives the trim back to
/// neutral until it is reached or a switch is used.
pub(super) struct RudderTrimLaw {
    reset_button_pulse: PulseNode,
    reset_memory: MemoryNode,
    integrator: DiscreteTimeIntegrator,
}

impl RudderTrimLaw {
    pub fn new(parameters: &FacParameterTable) -> Self {
        Self {
            reset_button_pulse: PulseNode::new_rising(),
            reset_memory: MemoryNode::new(false),
            integrator: DiscreteTimeIntegrator::new(
                -parameters.rudder_trim_authority,
                parameters.rudder_trim_authority,
            ),
        }
    }

    pub fn reset(&mut self) {
        self.reset_button_pulse.reset();
        self.reset_memory.reset();
        self.integrator.reset();
    }

    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        delta: Duration,
        parameters: &FacParameterTable,
        switch_left: bool,
        switch_right: bool,
        reset_button: bool,
        active: bool,
        position: f64,
    ) -> (f64, bool) {
        let reset_pressed = self.reset_button_pulse.update(reset_button);
        let current = self.integrator.output().unwrap_or(position);

        let reset_active = self.reset_memory.update(
            reset_pressed && active,
            !active
                || switch_left
                || switch_right
                || current.abs() < parameters.rudder_trim_reset_threshold,
        );

        let rate = if reset_active {
            -current.signum() * parameters.rudder_trim_reset_rate
        } else {
            match (switch_left, switch_right) {
                (true, false) => -parameters.rudder_trim_rate,
                (false, true) => parameters.rudder_trim_rate,
                _ => 0.,
            }
        };

        let command = self.integrator.update(rate, 1., delta, position, !active);

        (command, reset_active)
    }
}

/// Schedules the rudder travel with airspeed. Without airspeed the last limit is held. An
/// emergency reset drives the limiter to full travel even when no FAC has it engaged.
pub(super) struct RudderTravelLimiterLaw {
    command_limiter: RateLimiter,
}

impl RudderTravelLimiterLaw {
    pub fn new() -> Self {
        Self {
            command_limiter: RateLimiter::new(),
        }
    }

    pub fn reset(&mut self) {
        self.command_limiter.reset();
    }

    pub fn update(
        &mut self,
        delta: Duration,
        parameters: &FacParameterTable,
        acquired: &AcquiredData,
        active: bool,
        emergency_reset: bool,
        position: f64,
    ) -> f64 {
        let target = if emergency_reset {
            parameters.rudder_travel_limit.interpolate(f64::NEG_INFINITY)
        } else {
            match acquired.air_data {
                Some(data) => parameters
                    .rudder_travel_limit
                    .interpolate(data.computed_airspeed),
                None => self.command_limiter.output().unwrap_or(position),
            }
        };

        let driven = active || emergency_reset;
        self.command_limiter.update_with_initial_condition(
            if driven { target } else { position },
            parameters.rudder_travel_limit_rate,
            parameters.rudder_travel_limit_rate,
            delta,
            position,
            !driven,
        )
    }
}
