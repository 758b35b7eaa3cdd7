use std::time::Duration;
use systems::shared::{arinc429::Arinc429Word, MachNumber};
use uom::si::f64::*;

#[derive(Clone, Copy, Debug, Default)]
pub struct FacSimData {
    pub slew_on: bool,
    pub pause_on: bool,
    pub tracking_mode_on_override: bool,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FacDiscreteInputs {
    pub ap_own_engaged: bool,
    pub ap_opp_engaged: bool,
    pub yaw_damper_opp_engaged: bool,
    pub rudder_trim_opp_engaged: bool,
    pub rudder_travel_lim_opp_engaged: bool,
    pub engine_1_stopped: bool,
    pub engine_2_stopped: bool,
    pub rudder_trim_switch_left: bool,
    pub rudder_trim_switch_right: bool,
    pub rudder_trim_reset_button: bool,
    pub fac_engaged_from_switch: bool,
    pub fac_opp_healthy: bool,
    pub is_unit_1: bool,
    pub rudder_trim_actuator_healthy: bool,
    pub rudder_travel_lim_actuator_healthy: bool,
    pub slats_extended: bool,
    pub nose_gear_pressed: bool,
    pub ir_3_switch: bool,
    pub adr_3_switch: bool,
    pub yaw_damper_has_hyd_press: bool,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FacAnalogInputs {
    pub yaw_damper_position: Angle,
    pub rudder_trim_position: Angle,
    pub rudder_travel_lim_position: Angle,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AirDataReferenceBus {
    pub altitude_standard: Arinc429Word<Length>,
    pub mach: Arinc429Word<MachNumber>,
    pub computed_airspeed: Arinc429Word<Velocity>,
    pub true_airspeed: Arinc429Word<Velocity>,
    pub vertical_speed: Arinc429Word<Velocity>,
    pub corrected_angle_of_attack: Arinc429Word<Angle>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct InertialReferenceBus {
    pub body_yaw_rate: Arinc429Word<AngularVelocity>,
    /// Lateral load factor, in g.
    pub body_lateral_acceleration: Arinc429Word<Ratio>,
    /// Normal load factor, in g.
    pub body_normal_acceleration: Arinc429Word<Ratio>,
    pub flight_path_angle: Arinc429Word<Angle>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FmgcBus {
    pub fac_weight: Arinc429Word<Mass>,
    pub fac_center_of_gravity: Arinc429Word<Ratio>,
    pub delta_r_command: Arinc429Word<Angle>,
    pub ats_discrete_word: Arinc429Word<u32>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SlatFlapControlComputerBus {
    pub slat_flap_system_status_word: Arinc429Word<u32>,
    pub slat_flap_actual_position_word: Arinc429Word<u32>,
    pub slat_actual_position: Arinc429Word<Angle>,
    pub flap_actual_position: Arinc429Word<Angle>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LandingGearControlInterfaceUnitBus {
    pub discrete_word_1: Arinc429Word<u32>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RadioAltimeterBus {
    pub radio_altitude: Arinc429Word<Length>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PrimaryFlightControlBus {
    pub left_spoiler_position: Arinc429Word<Angle>,
    pub right_spoiler_position: Arinc429Word<Angle>,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FacBusInputs {
    pub adr_own: AirDataReferenceBus,
    pub adr_opp: AirDataReferenceBus,
    pub adr_3: AirDataReferenceBus,
    pub ir_own: InertialReferenceBus,
    pub ir_opp: InertialReferenceBus,
    pub ir_3: InertialReferenceBus,
    pub fmgc_own: FmgcBus,
    pub fmgc_opp: FmgcBus,
    pub sfcc_own: SlatFlapControlComputerBus,
    pub sfcc_opp: SlatFlapControlComputerBus,
    pub lgciu_own: LandingGearControlInterfaceUnitBus,
    pub lgciu_opp: LandingGearControlInterfaceUnitBus,
    pub ra_1: RadioAltimeterBus,
    pub ra_2: RadioAltimeterBus,
    pub prim_own: PrimaryFlightControlBus,
}

/// One frame worth of FAC inputs, supplied by the host before each step.
#[derive(Clone, Copy, Debug, Default)]
pub struct FacInputs {
    pub delta: Duration,
    pub sim_data: FacSimData,
    pub discrete_inputs: FacDiscreteInputs,
    pub analog_inputs: FacAnalogInputs,
    pub bus_inputs: FacBusInputs,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FacDiscreteOutputs {
    pub fac_healthy: bool,
    pub yaw_damper_engaged: bool,
    pub rudder_trim_engaged: bool,
    pub rudder_travel_lim_engaged: bool,
    pub rudder_travel_lim_emergency_reset: bool,
    pub yaw_damper_avail_for_norm_law: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FacAnalogOutputs {
    pub yaw_damper_order: Angle,
    pub rudder_trim_order: Angle,
    pub rudder_travel_limit_order: Angle,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FacLogicOutputs {
    pub adr_own_valid: bool,
    pub all_adr_lost: bool,
    pub ir_own_valid: bool,
    pub all_ir_lost: bool,
    pub lgciu_own_valid: bool,
    pub all_lgciu_lost: bool,
    pub sfcc_own_valid: bool,
    pub all_sfcc_lost: bool,
    pub left_main_gear_pressed: bool,
    pub right_main_gear_pressed: bool,
    pub main_gear_out: bool,
    pub on_ground: bool,
    pub flap_handle_index: u8,
    pub takeoff_config_captured: bool,
    pub fac_engaged: bool,
    pub tracking_mode_on: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FacFlightEnvelopeOutputs {
    pub estimated_beta: Angle,
    pub beta_target: Angle,
    pub beta_target_visible: bool,
    pub alpha_floor_condition: bool,
    pub alpha_filtered: Angle,
    pub computed_weight: Mass,
    pub computed_cg: Ratio,
    pub v_alpha_max: Velocity,
    pub v_alpha_prot: Velocity,
    pub v_stall_warn: Velocity,
    pub v_ls: Velocity,
    pub v_stall: Velocity,
    pub v_mcl: Velocity,
    pub v_3: Velocity,
    pub v_3_visible: bool,
    pub v_4: Velocity,
    pub v_4_visible: bool,
    pub v_man: Velocity,
    pub v_man_visible: bool,
    pub v_max: Velocity,
    pub v_fe_next: Velocity,
    pub v_c_trend: Velocity,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FacLawOutputs {
    pub yaw_damper_command: Angle,
    pub rudder_trim_command: Angle,
    pub rudder_travel_lim_command: Angle,
}

/// The labeled words the FAC transmits to displays and other computers.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FacBus {
    pub discrete_word_1: Arinc429Word<u32>,
    pub discrete_word_2: Arinc429Word<u32>,
    pub discrete_word_3: Arinc429Word<u32>,
    pub discrete_word_4: Arinc429Word<u32>,
    pub discrete_word_5: Arinc429Word<u32>,
    pub gamma_a: Arinc429Word<Angle>,
    pub gamma_t: Arinc429Word<Angle>,
    pub total_weight: Arinc429Word<Mass>,
    pub center_of_gravity_pos: Arinc429Word<Ratio>,
    pub sideslip_target: Arinc429Word<Angle>,
    pub fac_slat_angle: Arinc429Word<Angle>,
    pub fac_flap_angle: Arinc429Word<Angle>,
    pub rudder_travel_limit_command: Arinc429Word<Angle>,
    pub delta_r_yaw_damper: Arinc429Word<Angle>,
    pub estimated_sideslip: Arinc429Word<Angle>,
    pub v_alpha_lim: Arinc429Word<Velocity>,
    pub v_ls: Arinc429Word<Velocity>,
    pub v_stall: Arinc429Word<Velocity>,
    pub v_alpha_prot: Arinc429Word<Velocity>,
    pub v_stall_warn: Arinc429Word<Velocity>,
    pub speed_trend: Arinc429Word<Velocity>,
    pub v_3: Arinc429Word<Velocity>,
    pub v_4: Arinc429Word<Velocity>,
    pub v_man: Arinc429Word<Velocity>,
    pub v_max: Arinc429Word<Velocity>,
    pub v_fe_next: Arinc429Word<Velocity>,
    pub delta_r_rudder_trim: Arinc429Word<Angle>,
    pub rudder_trim_pos: Arinc429Word<Angle>,
}

/// Everything the FAC produces in one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FacOutputs {
    pub discrete_outputs: FacDiscreteOutputs,
    pub analog_outputs: FacAnalogOutputs,
    pub logic: FacLogicOutputs,
    pub flight_envelope: FacFlightEnvelopeOutputs,
    pub laws: FacLawOutputs,
    pub bus_outputs: FacBus,
}
