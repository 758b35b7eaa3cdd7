use super::acquisition::AcquiredData;
use super::bus::{FacDiscreteInputs, FacInputs};
use super::parameters::FacParameterTable;
use std::time::Duration;
use systems::shared::logic_nodes::ConfirmationNode;

/// Debounced discretes the sequencer and the laws act on.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConfirmedDiscretes {
    pub fac_healthy: bool,
    pub engage_request: bool,
    pub on_ground: bool,
    pub tracking_mode_on: bool,
}

pub(super) struct EngagementLogic {
    power_up_test: ConfirmationNode,
    engage_confirmation: ConfirmationNode,
    liftoff_confirmation: ConfirmationNode,
}

impl EngagementLogic {
    pub fn new(parameters: &FacParameterTable) -> Self {
        Self {
            power_up_test: ConfirmationNode::new_leading(parameters.power_up_test_duration),
            engage_confirmation: ConfirmationNode::new_leading(
                parameters.engage_confirmation_delay,
            ),
            liftoff_confirmation: ConfirmationNode::new_falling(
                parameters.liftoff_confirmation_delay,
            ),
        }
    }

    pub fn reset(&mut self) {
        self.power_up_test.reset();
        self.engage_confirmation.reset();
        self.liftoff_confirmation.reset();
    }

    pub fn update(
        &mut self,
        delta: Duration,
        inputs: &FacInputs,
        acquired: &AcquiredData,
    ) -> ConfirmedDiscretes {
        let fac_healthy = self.power_up_test.update(true, delta);

        let engage_request = self.engage_confirmation.update(
            inputs.discrete_inputs.fac_engaged_from_switch && fac_healthy,
            delta,
        );

        // Touchdown is recognized at once, liftoff only once both main gears stay extended.
        let on_ground = self.liftoff_confirmation.update(
            acquired.left_main_gear_pressed && acquired.right_main_gear_pressed,
            delta,
        );

        ConfirmedDiscretes {
            fac_healthy,
            engage_request,
            on_ground,
            tracking_mode_on: inputs.sim_data.slew_on || inputs.sim_data.tracking_mode_on_override,
        }
    }
}

/// The raw alpha floor conditions computed by the flight envelope.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AlphaFloorConditions {
    pub above_threshold: bool,
    pub below_reset_threshold: bool,
    pub inhibited: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConfirmedAlphaFloor {
    pub trigger: bool,
    pub reset: bool,
    pub inhibit: bool,
}

pub(super) struct AlphaFloorConfirmation {
    trigger: ConfirmationNode,
    reset: ConfirmationNode,
    inhibit: ConfirmationNode,
}

impl AlphaFloorConfirmation {
    pub fn new(parameters: &FacParameterTable) -> Self {
        Self {
            trigger: ConfirmationNode::new_leading(parameters.alpha_floor_trigger_delay),
            reset: ConfirmationNode::new_leading(parameters.alpha_floor_reset_delay),
            inhibit: ConfirmationNode::new_leading(parameters.alpha_floor_inhibit_delay),
        }
    }

    pub fn reset(&mut self) {
        self.trigger.reset();
        self.reset.reset();
        self.inhibit.reset();
    }

    /// A raw inhibit only holds back the trigger. Releasing the latch takes a confirmed inhibit.
    pub fn update(
        &mut self,
        delta: Duration,
        conditions: &AlphaFloorConditions,
    ) -> ConfirmedAlphaFloor {
        ConfirmedAlphaFloor {
            trigger: self
                .trigger
                .update(conditions.above_threshold && !conditions.inhibited, delta),
            reset: self.reset.update(conditions.below_reset_threshold, delta),
            inhibit: self.inhibit.update(conditions.inhibited, delta),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FunctionEngagement {
    pub yaw_damper_engaged: bool,
    pub yaw_damper_avail_for_norm_law: bool,
    pub rudder_trim_engaged: bool,
    pub rudder_travel_lim_engaged: bool,
    pub rudder_travel_lim_emergency_reset: bool,
}

/// Decides which of its functions this FAC drives. FAC 1 has priority; FAC 2 only takes a
/// function the opposite unit does not currently hold. The engaged discretes of an unhealthy
/// opposite unit are ignored.
pub(super) fn function_engagement(
    fac_engaged: bool,
    discretes: &FacDiscreteInputs,
    acquired: &AcquiredData,
) -> FunctionEngagement {
    let opp_holds = |opp_engaged: bool| opp_engaged && discretes.fac_opp_healthy;
    let has_priority = |opp_engaged: bool| discretes.is_unit_1 || !opp_holds(opp_engaged);

    let yaw_damper_avail_for_norm_law =
        fac_engaged && discretes.yaw_damper_has_hyd_press && !acquired.all_ir_lost;
    let yaw_damper_engaged =
        yaw_damper_avail_for_norm_law && has_priority(discretes.yaw_damper_opp_engaged);

    let rudder_trim_engaged = fac_engaged
        && discretes.rudder_trim_actuator_healthy
        && has_priority(discretes.rudder_trim_opp_engaged);

    let rudder_travel_lim_engaged = fac_engaged
        && discretes.rudder_travel_lim_actuator_healthy
        && has_priority(discretes.rudder_travel_lim_opp_engaged);

    // Without any limiter, extending the slats drives the limiter back to full travel.
    let rudder_travel_lim_emergency_reset = !rudder_travel_lim_engaged
        && !opp_holds(discretes.rudder_travel_lim_opp_engaged)
        && discretes.slats_extended;

    FunctionEngagement {
        yaw_damper_engaged,
        yaw_damper_avail_for_norm_law,
        rudder_trim_engaged,
        rudder_travel_lim_engaged,
        rudder_travel_lim_emergency_reset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fac::test::*;

    const DELTA: Duration = Duration::from_millis(20);

    fn run(logic: &mut EngagementLogic, inputs: &FacInputs, frames: usize) -> ConfirmedDiscretes {
        let acquired = acquire(inputs);
        let mut discretes = ConfirmedDiscretes::default();
        for _ in 0..frames {
            discretes = logic.update(DELTA, inputs, &acquired);
        }
        discretes
    }

    #[cfg(test)]
    mod engagement_logic_tests {
        use super::*;

        #[test]
        fn healthy_after_power_up_test() {
            let parameters = FacParameterTable::a380().unwrap();
            let mut logic = EngagementLogic::new(&parameters);
            let bed = test_bed_with().in_flight();

            assert!(!run(&mut logic, bed.inputs(), 24).fac_healthy);
            assert!(run(&mut logic, bed.inputs(), 1).fac_healthy);
        }

        #[test]
        fn engage_request_waits_for_health_and_confirmation() {
            let parameters = FacParameterTable::a380().unwrap();
            let mut logic = EngagementLogic::new(&parameters);
            let bed = test_bed_with().in_flight();

            assert!(!run(&mut logic, bed.inputs(), 25).engage_request);
            assert!(!run(&mut logic, bed.inputs(), 3).engage_request);
            assert!(run(&mut logic, bed.inputs(), 1).engage_request);
        }

        #[test]
        fn engage_switch_off_disengages_immediately() {
            let parameters = FacParameterTable::a380().unwrap();
            let mut logic = EngagementLogic::new(&parameters);
            run(&mut logic, test_bed_with().in_flight().inputs(), 50);

            let discretes = run(
                &mut logic,
                test_bed_with().in_flight().fac_switch_off().inputs(),
                1,
            );

            assert!(!discretes.engage_request);
        }

        #[test]
        fn touchdown_is_immediate_and_liftoff_is_confirmed() {
            let parameters = FacParameterTable::a380().unwrap();
            let mut logic = EngagementLogic::new(&parameters);

            assert!(run(&mut logic, test_bed_with().on_ground().inputs(), 1).on_ground);
            assert!(run(&mut logic, test_bed_with().in_flight().inputs(), 49).on_ground);
            assert!(!run(&mut logic, test_bed_with().in_flight().inputs(), 1).on_ground);
            assert!(run(&mut logic, test_bed_with().on_ground().inputs(), 1).on_ground);
        }

        #[test]
        fn single_gear_bounce_is_not_ground() {
            let parameters = FacParameterTable::a380().unwrap();
            let mut logic = EngagementLogic::new(&parameters);
            let bed = test_bed_with().in_flight().left_main_gear_pressed();

            assert!(!run(&mut logic, bed.inputs(), 1).on_ground);
        }

        #[test]
        fn slew_enables_tracking_mode() {
            let parameters = FacParameterTable::a380().unwrap();
            let mut logic = EngagementLogic::new(&parameters);

            assert!(run(&mut logic, test_bed_with().slewing().inputs(), 1).tracking_mode_on);
            assert!(!run(&mut logic, test_bed_with().inputs(), 1).tracking_mode_on);
        }
    }

    #[cfg(test)]
    mod alpha_floor_confirmation_tests {
        use super::*;

        fn conditions(above: bool, below: bool, inhibited: bool) -> AlphaFloorConditions {
            AlphaFloorConditions {
                above_threshold: above,
                below_reset_threshold: below,
                inhibited,
            }
        }

        #[test]
        fn trigger_requires_confirmation() {
            let parameters = FacParameterTable::a380().unwrap();
            let mut confirmation = AlphaFloorConfirmation::new(&parameters);

            for _ in 0..4 {
                assert!(
                    !confirmation
                        .update(DELTA, &conditions(true, false, false))
                        .trigger
                );
            }
            assert!(
                confirmation
                    .update(DELTA, &conditions(true, false, false))
                    .trigger
            );
        }

        #[test]
        fn inhibit_blocks_trigger() {
            let parameters = FacParameterTable::a380().unwrap();
            let mut confirmation = AlphaFloorConfirmation::new(&parameters);

            for _ in 0..20 {
                let confirmed = confirmation.update(DELTA, &conditions(true, false, true));
                assert!(!confirmed.trigger);
            }
        }

        #[test]
        fn inhibit_requires_confirmation() {
            let parameters = FacParameterTable::a380().unwrap();
            let mut confirmation = AlphaFloorConfirmation::new(&parameters);

            for _ in 0..9 {
                assert!(
                    !confirmation
                        .update(DELTA, &conditions(false, false, true))
                        .inhibit
                );
            }
            assert!(
                confirmation
                    .update(DELTA, &conditions(false, false, true))
                    .inhibit
            );
        }

        #[test]
        fn single_frame_inhibit_is_not_confirmed() {
            let parameters = FacParameterTable::a380().unwrap();
            let mut confirmation = AlphaFloorConfirmation::new(&parameters);

            for _ in 0..10 {
                let confirmed = confirmation.update(DELTA, &conditions(false, false, true));
                assert!(!confirmed.inhibit);
                let confirmed = confirmation.update(DELTA, &conditions(true, false, false));
                assert!(!confirmed.inhibit);
            }
        }

        #[test]
        fn single_frame_glitch_does_not_trigger() {
            let parameters = FacParameterTable::a380().unwrap();
            let mut confirmation = AlphaFloorConfirmation::new(&parameters);

            for _ in 0..10 {
                confirmation.update(DELTA, &conditions(true, false, false));
                let confirmed = confirmation.update(DELTA, &conditions(false, false, false));
                assert!(!confirmed.trigger);
            }
        }

        #[test]
        fn reset_requires_confirmation() {
            let parameters = FacParameterTable::a380().unwrap();
            let mut confirmation = AlphaFloorConfirmation::new(&parameters);

            for _ in 0..49 {
                assert!(
                    !confirmation
                        .update(DELTA, &conditions(false, true, false))
                        .reset
                );
            }
            assert!(
                confirmation
                    .update(DELTA, &conditions(false, true, false))
                    .reset
            );
        }
    }

    #[cfg(test)]
    mod function_engagement_tests {
        use super::*;
        use rstest::rstest;

        #[rstest]
        #[case(true, false, true)]
        #[case(true, true, true)]
        #[case(false, false, true)]
        #[case(false, true, false)]
        fn unit_priority(
            #[case] is_unit_1: bool,
            #[case] opp_engaged: bool,
            #[case] expected: bool,
        ) {
            let mut bed = test_bed_with().in_flight();
            let discretes = &mut bed.inputs_mut().discrete_inputs;
            discretes.is_unit_1 = is_unit_1;
            discretes.yaw_damper_opp_engaged = opp_engaged;
            discretes.rudder_trim_opp_engaged = opp_engaged;
            discretes.rudder_travel_lim_opp_engaged = opp_engaged;

            let engagement = function_engagement(
                true,
                &bed.inputs().discrete_inputs,
                &acquire(bed.inputs()),
            );

            assert_eq!(engagement.yaw_damper_engaged, expected);
            assert_eq!(engagement.rudder_trim_engaged, expected);
            assert_eq!(engagement.rudder_travel_lim_engaged, expected);
            assert!(engagement.yaw_damper_avail_for_norm_law);
        }

        #[test]
        fn unhealthy_opposite_unit_does_not_hold_functions() {
            let mut bed = test_bed_with().in_flight();
            let discretes = &mut bed.inputs_mut().discrete_inputs;
            discretes.is_unit_1 = false;
            discretes.fac_opp_healthy = false;
            discretes.yaw_damper_opp_engaged = true;
            discretes.rudder_trim_opp_engaged = true;
            discretes.rudder_travel_lim_opp_engaged = true;

            let engagement = function_engagement(
                true,
                &bed.inputs().discrete_inputs,
                &acquire(bed.inputs()),
            );

            assert!(engagement.yaw_damper_engaged);
            assert!(engagement.rudder_trim_engaged);
            assert!(engagement.rudder_travel_lim_engaged);
        }

        #[test]
        fn emergency_reset_ignores_unhealthy_opposite_limiter() {
            let mut bed = test_bed_with().in_flight();
            let discretes = &mut bed.inputs_mut().discrete_inputs;
            discretes.slats_extended = true;
            discretes.rudder_travel_lim_actuator_healthy = false;
            discretes.rudder_travel_lim_opp_engaged = true;
            discretes.fac_opp_healthy = false;

            let engagement = function_engagement(
                true,
                &bed.inputs().discrete_inputs,
                &acquire(bed.inputs()),
            );

            assert!(engagement.rudder_travel_lim_emergency_reset);
        }

        #[test]
        fn nothing_engaged_when_fac_disengaged() {
            let bed = test_bed_with().in_flight();

            let engagement = function_engagement(
                false,
                &bed.inputs().discrete_inputs,
                &acquire(bed.inputs()),
            );

            assert!(!engagement.yaw_damper_engaged);
            assert!(!engagement.rudder_trim_engaged);
            assert!(!engagement.rudder_travel_lim_engaged);
        }

        #[test]
        fn yaw_damper_needs_hydraulics_and_an_ir() {
            let mut bed = test_bed_with().in_flight();
            bed.inputs_mut().discrete_inputs.yaw_damper_has_hyd_press = false;
            let engagement = function_engagement(
                true,
                &bed.inputs().discrete_inputs,
                &acquire(bed.inputs()),
            );
            assert!(!engagement.yaw_damper_engaged);

            let bed = test_bed_with().in_flight().ir_own_failed().ir_opp_failed();
            let engagement = function_engagement(
                true,
                &bed.inputs().discrete_inputs,
                &acquire(bed.inputs()),
            );
            assert!(!engagement.yaw_damper_engaged);
            assert!(engagement.rudder_trim_engaged);
        }

        #[test]
        fn emergency_reset_when_no_limiter_and_slats_out() {
            let mut bed = test_bed_with().in_flight();
            bed.inputs_mut().discrete_inputs.slats_extended = true;
            bed.inputs_mut()
                .discrete_inputs
                .rudder_travel_lim_actuator_healthy = false;

            let engagement = function_engagement(
                true,
                &bed.inputs().discrete_inputs,
                &acquire(bed.inputs()),
            );

            assert!(engagement.rudder_travel_lim_emergency_reset);
        }
    }
}
