use super::bus::{
    AirDataReferenceBus, FacInputs, FmgcBus, InertialReferenceBus,
    LandingGearControlInterfaceUnitBus, SlatFlapControlComputerBus,
};
use super::parameters::FacParameterTable;
use log::warn;
use systems::shared::{arinc429::Arinc429Word, logic_nodes::PulseNode};
use uom::si::{
    angle::degree, angular_velocity::degree_per_second, f64::*, length::foot, mass::kilogram,
    ratio::percent, ratio::ratio, velocity::foot_per_minute, velocity::knot,
};

/// Air data of the selected ADR, in knots, degrees, feet and feet per minute.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AirData {
    pub computed_airspeed: f64,
    pub true_airspeed: f64,
    pub mach: f64,
    pub alpha: f64,
    pub altitude: f64,
    pub vertical_speed: f64,
}

/// Inertial data of the selected IR, in degrees, degrees per second and g.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InertialData {
    pub yaw_rate: f64,
    pub lateral_load_factor: f64,
    pub normal_load_factor: f64,
    pub flight_path_angle: f64,
}

/// The decoded, source-selected view of one frame of inputs. Anything derived from an
/// unreliable word is `None` and must gate whatever depends on it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AcquiredData {
    pub adr_own_valid: bool,
    pub all_adr_lost: bool,
    pub air_data: Option<AirData>,

    pub ir_own_valid: bool,
    pub all_ir_lost: bool,
    pub inertial_data: Option<InertialData>,

    pub lgciu_own_valid: bool,
    pub all_lgciu_lost: bool,
    pub left_main_gear_pressed: bool,
    pub right_main_gear_pressed: bool,
    pub main_gear_out: bool,

    pub sfcc_own_valid: bool,
    pub all_sfcc_lost: bool,
    pub flap_handle_index: Option<u8>,
    pub slat_angle: Option<f64>,
    pub flap_angle: Option<f64>,

    /// Tonnes.
    pub weight: Option<f64>,
    /// Percent of MAC.
    pub center_of_gravity: Option<f64>,
    pub radio_altitude: Option<f64>,
    /// Alpha floor inhibit requested by the autothrust of either FMGC.
    pub ats_alpha_floor_inhibited: bool,
    /// Mean deflection of the monitored spoilers, zero when unknown.
    pub spoiler_deflection: f64,
    pub fmgc_delta_r: Option<f64>,
}

pub(super) struct InputAcquisition {
    all_adr_lost_pulse: PulseNode,
    all_ir_lost_pulse: PulseNode,
}

impl InputAcquisition {
    pub fn new() -> Self {
        Self {
            all_adr_lost_pulse: PulseNode::new_rising(),
            all_ir_lost_pulse: PulseNode::new_rising(),
        }
    }

    pub fn reset(&mut self) {
        self.all_adr_lost_pulse.reset();
        self.all_ir_lost_pulse.reset();
    }

    pub fn update(&mut self, parameters: &FacParameterTable, inputs: &FacInputs) -> AcquiredData {
        let discretes = &inputs.discrete_inputs;
        let buses = &inputs.bus_inputs;

        let adr_primary = if discretes.adr_3_switch {
            &buses.adr_3
        } else {
            &buses.adr_own
        };
        let adr_primary_data = air_data(adr_primary);
        let adr_opp_data = air_data(&buses.adr_opp);
        let all_adr_lost = adr_primary_data.is_none() && adr_opp_data.is_none();

        let ir_primary = if discretes.ir_3_switch {
            &buses.ir_3
        } else {
            &buses.ir_own
        };
        let ir_primary_data = inertial_data(ir_primary);
        let ir_opp_data = inertial_data(&buses.ir_opp);
        let all_ir_lost = ir_primary_data.is_none() && ir_opp_data.is_none();

        if self.all_adr_lost_pulse.update(all_adr_lost) {
            warn!("All ADRs lost, speed protections unavailable");
        }
        if self.all_ir_lost_pulse.update(all_ir_lost) {
            warn!("All IRs lost, yaw damping unavailable");
        }

        let lgciu_own_valid = buses.lgciu_own.discrete_word_1.is_normal_operation();
        let lgciu_opp_valid = buses.lgciu_opp.discrete_word_1.is_normal_operation();
        let lgciu = select(
            lgciu_own_valid,
            &buses.lgciu_own,
            lgciu_opp_valid,
            &buses.lgciu_opp,
        );
        let (left_main_gear_pressed, right_main_gear_pressed, main_gear_out) = lgciu
            .map(|lgciu| landing_gear(parameters, lgciu))
            .unwrap_or((
                discretes.nose_gear_pressed,
                discretes.nose_gear_pressed,
                false,
            ));

        let sfcc_own_index = flap_handle_index(parameters, &buses.sfcc_own);
        let sfcc_opp_index = flap_handle_index(parameters, &buses.sfcc_opp);
        let sfcc = select(
            sfcc_own_index.is_some(),
            &buses.sfcc_own,
            sfcc_opp_index.is_some(),
            &buses.sfcc_opp,
        );

        let fmgc_weight = first_normal(&buses.fmgc_own.fac_weight, &buses.fmgc_opp.fac_weight);
        let fmgc_cg = first_normal(
            &buses.fmgc_own.fac_center_of_gravity,
            &buses.fmgc_opp.fac_center_of_gravity,
        );

        AcquiredData {
            adr_own_valid: adr_primary_data.is_some(),
            all_adr_lost,
            air_data: adr_primary_data.or(adr_opp_data),

            ir_own_valid: ir_primary_data.is_some(),
            all_ir_lost,
            inertial_data: ir_primary_data.or(ir_opp_data),

            lgciu_own_valid,
            all_lgciu_lost: lgciu.is_none(),
            left_main_gear_pressed,
            right_main_gear_pressed,
            main_gear_out,

            sfcc_own_valid: sfcc_own_index.is_some(),
            all_sfcc_lost: sfcc.is_none(),
            flap_handle_index: sfcc_own_index.or(sfcc_opp_index),
            slat_angle: sfcc
                .and_then(|sfcc| sfcc.slat_actual_position.normal_value())
                .map(|angle| angle.get::<degree>()),
            flap_angle: sfcc
                .and_then(|sfcc| sfcc.flap_actual_position.normal_value())
                .map(|angle| angle.get::<degree>()),

            weight: fmgc_weight.map(|weight| weight.get::<kilogram>() / 1000.),
            center_of_gravity: fmgc_cg.map(|cg| cg.get::<percent>()),
            radio_altitude: first_normal(&buses.ra_1.radio_altitude, &buses.ra_2.radio_altitude)
                .map(|altitude| altitude.get::<foot>()),
            ats_alpha_floor_inhibited: [&buses.fmgc_own, &buses.fmgc_opp].iter().any(|fmgc| {
                fmgc.ats_discrete_word
                    .bit_if_normal(parameters.fmgc_ats_alpha_floor_inhibit_bit)
                    .unwrap_or(false)
            }),
            spoiler_deflection: spoiler_deflection(
                &buses.prim_own.left_spoiler_position,
                &buses.prim_own.right_spoiler_position,
            ),
            fmgc_delta_r: fmgc_delta_r(
                discretes.ap_own_engaged,
                &buses.fmgc_own,
                discretes.ap_opp_engaged,
                &buses.fmgc_opp,
            ),
        }
    }
}

fn air_data(adr: &AirDataReferenceBus) -> Option<AirData> {
    let computed_airspeed = adr.computed_airspeed.normal_value()?;
    let mach = adr.mach.normal_value()?;
    let alpha = adr.corrected_angle_of_attack.normal_value()?;

    Some(AirData {
        computed_airspeed: computed_airspeed.get::<knot>(),
        true_airspeed: adr
            .true_airspeed
            .value_or(computed_airspeed)
            .get::<knot>(),
        mach: mach.value(),
        alpha: alpha.get::<degree>(),
        altitude: adr.altitude_standard.value_or_default().get::<foot>(),
        vertical_speed: adr
            .vertical_speed
            .value_or_default()
            .get::<foot_per_minute>(),
    })
}

fn inertial_data(ir: &InertialReferenceBus) -> Option<InertialData> {
    let yaw_rate = ir.body_yaw_rate.normal_value()?;
    let lateral_load_factor = ir.body_lateral_acceleration.normal_value()?;

    Some(InertialData {
        yaw_rate: yaw_rate.get::<degree_per_second>(),
        lateral_load_factor: lateral_load_factor.get::<ratio>(),
        normal_load_factor: ir
            .body_normal_acceleration
            .value_or(Ratio::new::<ratio>(1.))
            .get::<ratio>(),
        flight_path_angle: ir.flight_path_angle.value_or_default().get::<degree>(),
    })
}

fn select<'a, T>(own_valid: bool, own: &'a T, opp_valid: bool, opp: &'a T) -> Option<&'a T> {
    if own_valid {
        Some(own)
    } else if opp_valid {
        Some(opp)
    } else {
        None
    }
}

fn first_normal<T: Copy>(own: &Arinc429Word<T>, opp: &Arinc429Word<T>) -> Option<T> {
    own.normal_value().or_else(|| opp.normal_value())
}

fn landing_gear(
    parameters: &FacParameterTable,
    lgciu: &LandingGearControlInterfaceUnitBus,
) -> (bool, bool, bool) {
    let word = &lgciu.discrete_word_1;

    (
        word.bit(parameters.lgciu_left_main_gear_compressed_bit),
        word.bit(parameters.lgciu_right_main_gear_compressed_bit),
        word.bit(parameters.lgciu_main_gear_downlocked_bit),
    )
}

/// Decodes the flap handle position from the lever bits of an SFCC: 0 for lever 0, 1 and 2
/// for lever 1 without and with flaps extended, then 3, 4 and 5 for levers 2, 3 and FULL.
pub(super) fn flap_handle_index(
    parameters: &FacParameterTable,
    sfcc: &SlatFlapControlComputerBus,
) -> Option<u8> {
    let status = &sfcc.slat_flap_system_status_word;
    if !status.is_normal_operation() {
        return None;
    }

    let [lever_0, lever_1, lever_2, lever_3, lever_full] = parameters.sfcc_flap_lever_bits;
    if status.bit(lever_full) {
        Some(5)
    } else if status.bit(lever_3) {
        Some(4)
    } else if status.bit(lever_2) {
        Some(3)
    } else if status.bit(lever_1) {
        let flaps_extended = sfcc
            .slat_flap_actual_position_word
            .bit_if_normal(parameters.sfcc_flaps_extended_bit)
            .unwrap_or(false);

        Some(if flaps_extended { 2 } else { 1 })
    } else if status.bit(lever_0) {
        Some(0)
    } else {
        None
    }
}

fn spoiler_deflection(left: &Arinc429Word<Angle>, right: &Arinc429Word<Angle>) -> f64 {
    match (left.normal_value(), right.normal_value()) {
        (Some(left), Some(right)) => (left.get::<degree>() + right.get::<degree>()) / 2.,
        (Some(only), None) | (None, Some(only)) => only.get::<degree>(),
        (None, None) => 0.,
    }
}

fn fmgc_delta_r(
    ap_own_engaged: bool,
    fmgc_own: &FmgcBus,
    ap_opp_engaged: bool,
    fmgc_opp: &FmgcBus,
) -> Option<f64> {
    let command = if ap_own_engaged {
        fmgc_own.delta_r_command.normal_value()
    } else if ap_opp_engaged {
        fmgc_opp.delta_r_command.normal_value()
    } else {
        None
    };

    command.map(|angle| angle.get::<degree>())
}
