use acquisition::InputAcquisition;
use bus_outputs::ComputedFrame;
use flight_envelope::FlightEnvelopeComputation;
use laws::{LawCommands, RudderTravelLimiterLaw, RudderTrimLaw, YawDamperLaw};
use log::info;
use logic::{function_engagement, AlphaFloorConfirmation, EngagementLogic};
use sequencer::{FacSequencer, SequencerInputs};
use std::sync::Arc;
use std::time::Duration;
use uom::si::angle::degree;

pub use bus::{FacInputs, FacOutputs};
pub use parameters::{FacParameterTable, ParameterTableError};

pub mod acquisition;
pub mod bus;
pub mod bus_outputs;
pub mod flight_envelope;
pub mod laws;
pub mod logic;
pub mod parameters;
pub mod sequencer;

/// This struct represents a simulation of the software runtime that is executed on an A380
/// Flight Augmentation Computer. It acquires data from the surrounding systems, computes the
/// flight envelope and drives the yaw damper, the rudder trim and the rudder travel limiter.
///
/// The host supplies a new set of inputs through [`Self::set_external_inputs`] before every
/// [`Self::step`] and reads the results back with [`Self::external_outputs`]. A computer must be
/// initialized before it is stepped.
pub struct A380FacComputer {
    parameters: Arc<FacParameterTable>,
    inputs: FacInputs,
    outputs: FacOutputs,

    acquisition: InputAcquisition,
    engagement_logic: EngagementLogic,
    flight_envelope: FlightEnvelopeComputation,
    alpha_floor_confirmation: AlphaFloorConfirmation,
    sequencer: FacSequencer,
    yaw_damper: YawDamperLaw,
    rudder_trim: RudderTrimLaw,
    rudder_travel_limiter: RudderTravelLimiterLaw,
}

impl A380FacComputer {
    pub fn new(parameters: Arc<FacParameterTable>) -> Result<Self, ParameterTableError> {
        parameters.validate()?;

        Ok(Self {
            inputs: FacInputs::default(),
            outputs: FacOutputs::default(),

            acquisition: InputAcquisition::new(),
            engagement_logic: EngagementLogic::new(&parameters),
            flight_envelope: FlightEnvelopeComputation::new(),
            alpha_floor_confirmation: AlphaFloorConfirmation::new(&parameters),
            sequencer: FacSequencer::new(),
            yaw_damper: YawDamperLaw::new(),
            rudder_trim: RudderTrimLaw::new(&parameters),
            rudder_travel_limiter: RudderTravelLimiterLaw::new(),

            parameters,
        })
    }

    /// Returns every stage to its power-up state.
    pub fn initialize(&mut self) {
        info!("Initializing FAC");

        self.outputs = FacOutputs::default();
        self.acquisition.reset();
        self.engagement_logic.reset();
        self.flight_envelope.reset();
        self.alpha_floor_confirmation.reset();
        self.sequencer.reset();
        self.yaw_damper.reset();
        self.rudder_trim.reset();
        self.rudder_travel_limiter.reset();
    }

    pub fn set_external_inputs(&mut self, inputs: FacInputs) {
        self.inputs = inputs;
    }

    pub fn external_outputs(&self) -> &FacOutputs {
        &self.outputs
    }

    /// Runs one frame. While the simulation is paused no time elapses.
    pub fn step(&mut self) {
        let parameters = self.parameters.as_ref();
        let inputs = &self.inputs;
        let discretes = &inputs.discrete_inputs;
        let delta = if inputs.sim_data.pause_on {
            Duration::from_secs(0)
        } else {
            inputs.delta
        };

        let acquired = self.acquisition.update(parameters, inputs);
        let confirmed = self.engagement_logic.update(delta, inputs, &acquired);

        let envelope = self.flight_envelope.update(
            delta,
            parameters,
            &acquired,
            discretes,
            &confirmed,
            self.sequencer.mode().takeoff_config_captured(),
        );
        let alpha_floor = self
            .alpha_floor_confirmation
            .update(delta, &envelope.alpha_floor);

        let mode = self.sequencer.update(&SequencerInputs {
            engage_request: confirmed.engage_request,
            on_ground: confirmed.on_ground,
            flap_handle_index: acquired.flap_handle_index,
            alpha_floor_trigger: alpha_floor.trigger,
            alpha_floor_reset: alpha_floor.reset,
            alpha_floor_inhibit: alpha_floor.inhibit,
        });

        let engagement = function_engagement(mode.is_engaged(), discretes, &acquired);
        let tracking = confirmed.tracking_mode_on;
        let positions = &inputs.analog_inputs;
        let rudder_trim_position = positions.rudder_trim_position.get::<degree>();

        let yaw_damper_command = self.yaw_damper.update(
            delta,
            parameters,
            &acquired,
            engagement.yaw_damper_engaged && !tracking,
            positions.yaw_damper_position.get::<degree>(),
        );
        let (rudder_trim_command, rudder_trim_reset_active) = self.rudder_trim.update(
            delta,
            parameters,
            discretes.rudder_trim_switch_left,
            discretes.rudder_trim_switch_right,
            discretes.rudder_trim_reset_button,
            engagement.rudder_trim_engaged && !tracking,
            rudder_trim_position,
        );
        let rudder_travel_lim_command = self.rudder_travel_limiter.update(
            delta,
            parameters,
            &acquired,
            engagement.rudder_travel_lim_engaged && !tracking,
            engagement.rudder_travel_lim_emergency_reset && !tracking,
            positions.rudder_travel_lim_position.get::<degree>(),
        );

        self.outputs = bus_outputs::assemble(&ComputedFrame {
            acquired: &acquired,
            confirmed: &confirmed,
            envelope: &envelope,
            mode,
            engagement: &engagement,
            laws: &LawCommands {
                yaw_damper_command,
                rudder_trim_command,
                rudder_trim_reset_active,
                rudder_travel_lim_command,
            },
            rudder_trim_position,
        });
    }

    pub fn terminate(&mut self) {
        info!("Terminating FAC");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fac::test::*;
    use rand::Rng;
    use uom::si::{f64::*, length::foot, velocity::knot};

    fn computer() -> A380FacComputer {
        computer_with(Arc::new(FacParameterTable::a380().unwrap()))
    }

    fn computer_with(parameters: Arc<FacParameterTable>) -> A380FacComputer {
        let mut computer = A380FacComputer::new(parameters).unwrap();
        computer.initialize();
        computer
    }

    fn run(computer: &mut A380FacComputer, inputs: &FacInputs, frames: usize) -> FacOutputs {
        for _ in 0..frames {
            computer.set_external_inputs(*inputs);
            computer.step();
        }
        *computer.external_outputs()
    }

    #[test]
    fn rejects_invalid_parameters() {
        let mut parameters = FacParameterTable::a380().unwrap();
        parameters.vmo = 0.;

        assert!(matches!(
            A380FacComputer::new(Arc::new(parameters)),
            Err(ParameterTableError::InvalidLimit { name: "vmo", .. })
        ));
    }

    #[test]
    fn outputs_fail_before_power_up_test_completes() {
        let mut computer = computer();

        let outputs = run(&mut computer, test_bed_with().in_flight().inputs(), 1);

        assert!(!outputs.discrete_outputs.fac_healthy);
        assert!(!outputs.logic.fac_engaged);
        assert!(outputs.bus_outputs.v_ls.is_failure_warning());
        assert!(outputs.bus_outputs.discrete_word_2.is_failure_warning());
    }

    #[test]
    fn engages_after_power_up_test() {
        let mut computer = computer();

        let outputs = run(&mut computer, test_bed_with().in_flight().inputs(), 40);

        assert!(outputs.discrete_outputs.fac_healthy);
        assert!(outputs.logic.fac_engaged);
        assert!(outputs.discrete_outputs.yaw_damper_engaged);
        assert!(outputs.discrete_outputs.rudder_trim_engaged);
        assert!(outputs.discrete_outputs.rudder_travel_lim_engaged);
        assert!(outputs.bus_outputs.v_ls.is_normal_operation());
    }

    #[test]
    fn engage_switch_off_disengages() {
        let mut computer = computer();
        run(&mut computer, test_bed_with().in_flight().inputs(), 40);

        let outputs = run(
            &mut computer,
            test_bed_with().in_flight().fac_switch_off().inputs(),
            2,
        );

        assert!(!outputs.logic.fac_engaged);
        assert!(!outputs.discrete_outputs.yaw_damper_engaged);
    }

    #[test]
    fn no_time_elapses_while_paused() {
        let mut computer = computer();

        let outputs = run(&mut computer, test_bed_with().in_flight().paused().inputs(), 100);

        assert!(!outputs.discrete_outputs.fac_healthy);
    }

    #[test]
    fn initialize_restarts_the_power_up_test() {
        let mut computer = computer();
        run(&mut computer, test_bed_with().in_flight().inputs(), 40);

        computer.initialize();
        let outputs = run(&mut computer, test_bed_with().in_flight().inputs(), 1);

        assert!(!outputs.discrete_outputs.fac_healthy);
        computer.terminate();
    }

    #[test]
    fn speed_protections_are_not_computed_without_air_data() {
        let mut computer = computer();

        let outputs = run(
            &mut computer,
            test_bed_with()
                .in_flight()
                .flap_lever(2, true)
                .adr_own_failed()
                .adr_opp_failed()
                .inputs(),
            40,
        );

        assert!(outputs.logic.all_adr_lost);
        assert!(outputs.bus_outputs.v_alpha_prot.is_no_computed_data());
        assert!(outputs.bus_outputs.v_max.is_no_computed_data());
        assert!(outputs.bus_outputs.v_ls.is_normal_operation());
    }

    fn high_alpha_in_full() -> FacTestBed {
        test_bed_with()
            .in_flight()
            .flap_lever(4, true)
            .angle_of_attack(Angle::new::<degree>(14.))
    }

    #[test]
    fn alpha_floor_latch_survives_single_frame_air_data_loss() {
        let mut computer = computer();
        let outputs = run(&mut computer, high_alpha_in_full().inputs(), 60);
        assert!(outputs.flight_envelope.alpha_floor_condition);

        let outputs = run(
            &mut computer,
            high_alpha_in_full()
                .adr_own_failed()
                .and()
                .adr_opp_failed()
                .inputs(),
            1,
        );
        assert!(outputs.flight_envelope.alpha_floor_condition);

        for _ in 0..5 {
            let outputs = run(&mut computer, high_alpha_in_full().inputs(), 1);
            assert!(outputs.flight_envelope.alpha_floor_condition);
        }
    }

    #[test]
    fn alpha_floor_latch_released_by_lasting_air_data_loss() {
        let mut computer = computer();
        run(&mut computer, high_alpha_in_full().inputs(), 60);

        let outputs = run(
            &mut computer,
            high_alpha_in_full()
                .adr_own_failed()
                .and()
                .adr_opp_failed()
                .inputs(),
            15,
        );

        assert!(!outputs.flight_envelope.alpha_floor_condition);
    }

    #[test]
    fn alpha_floor_latch_released_below_minimum_radio_altitude() {
        let mut computer = computer();
        run(&mut computer, high_alpha_in_full().inputs(), 60);

        let outputs = run(
            &mut computer,
            high_alpha_in_full()
                .radio_altitude(Length::new::<foot>(50.))
                .inputs(),
            15,
        );

        assert!(!outputs.flight_envelope.alpha_floor_condition);
    }

    #[test]
    fn vls_is_valid_at_once_after_flap_data_returns() {
        let mut computer = computer();
        let expected = run(&mut computer, test_bed_with().flap_lever(4, true).inputs(), 40)
            .bus_outputs
            .v_ls
            .value()
            .get::<knot>();

        run(
            &mut computer,
            test_bed_with()
                .flap_lever(4, true)
                .sfcc_own_failed()
                .and()
                .sfcc_opp_failed()
                .inputs(),
            1,
        );
        let outputs = run(&mut computer, test_bed_with().flap_lever(4, true).inputs(), 1);

        assert!(outputs.bus_outputs.v_ls.is_normal_operation());
        assert!((outputs.bus_outputs.v_ls.value().get::<knot>() - expected).abs() < 1e-6);
    }

    #[test]
    fn yaw_damper_is_lost_without_inertial_data() {
        let mut computer = computer();

        let outputs = run(
            &mut computer,
            test_bed_with()
                .in_flight()
                .ir_own_failed()
                .ir_opp_failed()
                .inputs(),
            40,
        );

        assert!(outputs.logic.all_ir_lost);
        assert!(!outputs.discrete_outputs.yaw_damper_engaged);
        assert!(!outputs.discrete_outputs.yaw_damper_avail_for_norm_law);
        assert!(outputs.bus_outputs.delta_r_yaw_damper.is_no_computed_data());
        assert!(outputs.bus_outputs.estimated_sideslip.is_no_computed_data());
    }

    #[test]
    fn tracking_mode_follows_actuator_positions() {
        let mut computer = computer();
        let mut bed = test_bed_with().in_flight().slewing();
        bed.inputs_mut().analog_inputs.yaw_damper_position = Angle::new::<degree>(3.);
        bed.inputs_mut().analog_inputs.rudder_trim_position = Angle::new::<degree>(-2.);

        let outputs = run(&mut computer, bed.inputs(), 40);

        assert!(outputs.logic.tracking_mode_on);
        assert!((outputs.analog_outputs.yaw_damper_order.get::<degree>() - 3.).abs() < 1e-9);
        assert!((outputs.analog_outputs.rudder_trim_order.get::<degree>() + 2.).abs() < 1e-9);
    }

    #[test]
    fn trim_switch_moves_the_rudder_trim() {
        let mut computer = computer();
        run(&mut computer, test_bed_with().in_flight().inputs(), 40);

        let outputs = run(
            &mut computer,
            test_bed_with()
                .in_flight()
                .rudder_trim_switch_right()
                .inputs(),
            50,
        );

        assert!((outputs.analog_outputs.rudder_trim_order.get::<degree>() - 1.).abs() < 1e-6);
        assert!(outputs.bus_outputs.delta_r_rudder_trim.is_normal_operation());
    }

    #[test]
    fn reset_button_centers_the_rudder_trim() {
        let mut computer = computer();
        run(&mut computer, test_bed_with().in_flight().inputs(), 40);
        run(
            &mut computer,
            test_bed_with()
                .in_flight()
                .and()
                .rudder_trim_switch_right()
                .inputs(),
            100,
        );

        let outputs = run(
            &mut computer,
            test_bed_with()
                .in_flight()
                .and()
                .rudder_trim_reset_pressed()
                .inputs(),
            1,
        );
        assert!(outputs
            .bus_outputs
            .discrete_word_2
            .bit(bus_outputs::discrete_word_2::RUDDER_TRIM_RESET_ACTIVE));

        let outputs = run(
            &mut computer,
            test_bed_with()
                .in_flight()
                .and()
                .rudder_trim_reset_pressed()
                .inputs(),
            150,
        );
        assert!(outputs.analog_outputs.rudder_trim_order.get::<degree>().abs() < 0.1);
    }

    #[test]
    fn only_one_fac_holds_each_function() {
        let parameters = Arc::new(FacParameterTable::a380().unwrap());
        let mut fac_1 = computer_with(Arc::clone(&parameters));
        let mut fac_2 = computer_with(Arc::clone(&parameters));
        assert_eq!(Arc::strong_count(&parameters), 3);

        let fac_1_outputs = run(&mut fac_1, test_bed_with().in_flight().inputs(), 40);

        let mut bed = test_bed_with().in_flight();
        let discretes = &mut bed.inputs_mut().discrete_inputs;
        discretes.is_unit_1 = false;
        discretes.yaw_damper_opp_engaged = fac_1_outputs.discrete_outputs.yaw_damper_engaged;
        discretes.rudder_trim_opp_engaged = fac_1_outputs.discrete_outputs.rudder_trim_engaged;
        discretes.rudder_travel_lim_opp_engaged =
            fac_1_outputs.discrete_outputs.rudder_travel_lim_engaged;
        let fac_2_outputs = run(&mut fac_2, bed.inputs(), 40);

        assert!(fac_1_outputs.discrete_outputs.yaw_damper_engaged);
        assert!(fac_2_outputs.logic.fac_engaged);
        assert!(!fac_2_outputs.discrete_outputs.yaw_damper_engaged);
        assert!(!fac_2_outputs.discrete_outputs.rudder_trim_engaged);
        assert!(!fac_2_outputs.discrete_outputs.rudder_travel_lim_engaged);
    }

    #[test]
    fn deceleration_is_reproducible() {
        let frames = 100;
        let inputs: Vec<FacInputs> = (0..frames)
            .map(|frame| {
                let airspeed = 250. - 100. * frame as f64 / (frames - 1) as f64;
                *test_bed_with()
                    .in_flight()
                    .flap_lever(2, true)
                    .computed_airspeed(Velocity::new::<knot>(airspeed))
                    .inputs()
            })
            .collect();

        let simulate = || {
            let mut computer = computer();
            inputs
                .iter()
                .map(|inputs| run(&mut computer, inputs, 1))
                .collect::<Vec<_>>()
        };
        let first = simulate();
        let second = simulate();

        assert_eq!(first, second);
        let last = first.last().unwrap();
        assert!(last.bus_outputs.v_ls.is_normal_operation());
        assert!(last.bus_outputs.v_alpha_prot.is_normal_operation());
    }

    #[test]
    fn random_inputs_are_reproducible() {
        let mut rng = rand::thread_rng();
        let inputs: Vec<FacInputs> = (0..200)
            .map(|_| {
                let mut bed = test_bed_with()
                    .in_flight()
                    .flap_lever(rng.gen_range(0..5), rng.gen_bool(0.5))
                    .computed_airspeed(Velocity::new::<knot>(rng.gen_range(120.0..320.0)))
                    .angle_of_attack(Angle::new::<degree>(rng.gen_range(-2.0..16.0)))
                    .lateral_load_factor(rng.gen_range(-0.1..0.1));
                bed.inputs_mut().discrete_inputs.rudder_trim_switch_left = rng.gen_bool(0.2);
                *bed.inputs()
            })
            .collect();

        let simulate = || {
            let mut computer = computer();
            inputs
                .iter()
                .map(|inputs| run(&mut computer, inputs, 1))
                .collect::<Vec<_>>()
        };

        assert_eq!(simulate(), simulate());
    }
}
