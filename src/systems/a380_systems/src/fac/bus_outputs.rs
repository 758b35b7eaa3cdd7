use super::acquisition::AcquiredData;
use super::bus::*;
use super::flight_envelope::FlightEnvelope;
use super::laws::LawCommands;
use super::logic::{ConfirmedDiscretes, FunctionEngagement};
use super::sequencer::FacMode;
use systems::shared::arinc429::{Arinc429Word, DiscreteWordBuilder, SignStatus};
use uom::si::{angle::degree, f64::*, mass::kilogram, ratio::percent, velocity::knot};

/// Envelope and speed scale status.
pub mod discrete_word_1 {
    pub const ALPHA_FLOOR_ACTIVE: u8 = 11;
    pub const ALPHA_FLOOR_CONDITION: u8 = 12;
    pub const V_3_VISIBLE: u8 = 13;
    pub const V_4_VISIBLE: u8 = 14;
    pub const V_MAN_VISIBLE: u8 = 15;
    pub const BETA_TARGET_VISIBLE: u8 = 16;
}

/// Function engagement.
pub mod discrete_word_2 {
    pub const FAC_ENGAGED: u8 = 11;
    pub const YAW_DAMPER_ENGAGED: u8 = 12;
    pub const RUDDER_TRIM_ENGAGED: u8 = 13;
    pub const RUDDER_TRAVEL_LIM_ENGAGED: u8 = 14;
    pub const RUDDER_TRAVEL_LIM_EMERGENCY_RESET: u8 = 15;
    pub const YAW_DAMPER_AVAIL_FOR_NORM_LAW: u8 = 16;
    pub const RUDDER_TRIM_RESET_ACTIVE: u8 = 17;
}

/// Flap handle position, one bit per index starting with index 0.
pub mod discrete_word_3 {
    pub const FLAP_HANDLE_INDEX_0: u8 = 11;
    pub const TAKEOFF_CONFIG_CAPTURED: u8 = 17;
}

/// Ground and tracking state.
pub mod discrete_word_4 {
    pub const ON_GROUND: u8 = 11;
    pub const LEFT_MAIN_GEAR_PRESSED: u8 = 12;
    pub const RIGHT_MAIN_GEAR_PRESSED: u8 = 13;
    pub const MAIN_GEAR_OUT: u8 = 14;
    pub const TRACKING_MODE_ON: u8 = 15;
}

/// Source monitoring.
pub mod discrete_word_5 {
    pub const ADR_OWN_VALID: u8 = 11;
    pub const ALL_ADR_LOST: u8 = 12;
    pub const IR_OWN_VALID: u8 = 13;
    pub const ALL_IR_LOST: u8 = 14;
    pub const LGCIU_OWN_VALID: u8 = 15;
    pub const ALL_LGCIU_LOST: u8 = 16;
    pub const SFCC_OWN_VALID: u8 = 17;
    pub const ALL_SFCC_LOST: u8 = 18;
}

/// The results of all stages of one frame.
pub(super) struct ComputedFrame<'a> {
    pub acquired: &'a AcquiredData,
    pub confirmed: &'a ConfirmedDiscretes,
    pub envelope: &'a FlightEnvelope,
    pub mode: FacMode,
    pub engagement: &'a FunctionEngagement,
    pub laws: &'a LawCommands,
    pub rudder_trim_position: f64,
}

pub(super) fn assemble(frame: &ComputedFrame) -> FacOutputs {
    FacOutputs {
        discrete_outputs: discrete_outputs(frame),
        analog_outputs: FacAnalogOutputs {
            yaw_damper_order: degrees(frame.laws.yaw_damper_command),
            rudder_trim_order: degrees(frame.laws.rudder_trim_command),
            rudder_travel_limit_order: degrees(frame.laws.rudder_travel_lim_command),
        },
        logic: logic_outputs(frame),
        flight_envelope: flight_envelope_outputs(frame),
        laws: FacLawOutputs {
            yaw_damper_command: degrees(frame.laws.yaw_damper_command),
            rudder_trim_command: degrees(frame.laws.rudder_trim_command),
            rudder_travel_lim_command: degrees(frame.laws.rudder_travel_lim_command),
        },
        bus_outputs: bus(frame),
    }
}

fn discrete_outputs(frame: &ComputedFrame) -> FacDiscreteOutputs {
    let engagement = frame.engagement;

    FacDiscreteOutputs {
        fac_healthy: frame.confirmed.fac_healthy,
        yaw_damper_engaged: engagement.yaw_damper_engaged,
        rudder_trim_engaged: engagement.rudder_trim_engaged,
        rudder_travel_lim_engaged: engagement.rudder_travel_lim_engaged,
        rudder_travel_lim_emergency_reset: engagement.rudder_travel_lim_emergency_reset,
        yaw_damper_avail_for_norm_law: engagement.yaw_damper_avail_for_norm_law,
    }
}

fn logic_outputs(frame: &ComputedFrame) -> FacLogicOutputs {
    let acquired = frame.acquired;

    FacLogicOutputs {
        adr_own_valid: acquired.adr_own_valid,
        all_adr_lost: acquired.all_adr_lost,
        ir_own_valid: acquired.ir_own_valid,
        all_ir_lost: acquired.all_ir_lost,
        lgciu_own_valid: acquired.lgciu_own_valid,
        all_lgciu_lost: acquired.all_lgciu_lost,
        sfcc_own_valid: acquired.sfcc_own_valid,
        all_sfcc_lost: acquired.all_sfcc_lost,
        left_main_gear_pressed: acquired.left_main_gear_pressed,
        right_main_gear_pressed: acquired.right_main_gear_pressed,
        main_gear_out: acquired.main_gear_out,
        on_ground: frame.confirmed.on_ground,
        flap_handle_index: acquired.flap_handle_index.unwrap_or_default(),
        takeoff_config_captured: frame.mode.takeoff_config_captured(),
        fac_engaged: frame.mode.is_engaged(),
        tracking_mode_on: frame.confirmed.tracking_mode_on,
    }
}

fn flight_envelope_outputs(frame: &ComputedFrame) -> FacFlightEnvelopeOutputs {
    let envelope = frame.envelope;
    let speed = |value: Option<f64>| knots(value.unwrap_or_default());

    FacFlightEnvelopeOutputs {
        estimated_beta: degrees(envelope.estimated_beta.unwrap_or_default()),
        beta_target: degrees(envelope.beta_target),
        beta_target_visible: envelope.beta_target_visible,
        alpha_floor_condition: frame.mode.alpha_floor_active(),
        alpha_filtered: degrees(envelope.alpha_filtered.unwrap_or_default()),
        computed_weight: tonnes(envelope.weight.unwrap_or_default()),
        computed_cg: Ratio::new::<percent>(envelope.center_of_gravity.unwrap_or_default()),
        v_alpha_max: speed(envelope.v_alpha_max),
        v_alpha_prot: speed(envelope.v_alpha_prot),
        v_stall_warn: speed(envelope.v_stall_warn),
        v_ls: speed(envelope.v_ls),
        v_stall: speed(envelope.v_stall),
        v_mcl: speed(envelope.v_mcl),
        v_3: speed(envelope.v_3),
        v_3_visible: envelope.v_3_visible,
        v_4: speed(envelope.v_4),
        v_4_visible: envelope.v_4_visible,
        v_man: speed(envelope.v_man),
        v_man_visible: envelope.v_man_visible,
        v_max: speed(envelope.v_max),
        v_fe_next: speed(envelope.v_fe_next),
        v_c_trend: speed(envelope.v_c_trend),
    }
}

/// Encodes values with the status policy of the FAC: everything fails while the computer is
/// unhealthy, values that are not computed or not applicable are sent as NCD.
struct WordEncoder {
    healthy: bool,
}

impl WordEncoder {
    fn encode<T: Copy + Default>(&self, value: Option<T>) -> Arinc429Word<T> {
        match (self.healthy, value) {
            (false, value) => {
                Arinc429Word::new(value.unwrap_or_default(), SignStatus::FailureWarning)
            }
            (true, Some(value)) => Arinc429Word::new_norm(value),
            (true, None) => Arinc429Word::new(T::default(), SignStatus::NoComputedData),
        }
    }

    fn discrete(&self, builder: &DiscreteWordBuilder) -> Arinc429Word<u32> {
        builder.build(if self.healthy {
            SignStatus::NormalOperation
        } else {
            SignStatus::FailureWarning
        })
    }
}

fn bus(frame: &ComputedFrame) -> FacBus {
    let encoder = WordEncoder {
        healthy: frame.confirmed.fac_healthy,
    };
    let envelope = frame.envelope;
    let engagement = frame.engagement;
    let in_flight = !frame.confirmed.on_ground;
    let speed = |value: Option<f64>| encoder.encode(value.map(knots));
    let angle = |value: Option<f64>| encoder.encode(value.map(degrees));

    FacBus {
        discrete_word_1: encoder.discrete(
            DiscreteWordBuilder::new()
                .set(
                    discrete_word_1::ALPHA_FLOOR_ACTIVE,
                    frame.mode.alpha_floor_active(),
                )
                .set(
                    discrete_word_1::ALPHA_FLOOR_CONDITION,
                    envelope.alpha_floor.above_threshold,
                )
                .set(discrete_word_1::V_3_VISIBLE, envelope.v_3_visible)
                .set(discrete_word_1::V_4_VISIBLE, envelope.v_4_visible)
                .set(discrete_word_1::V_MAN_VISIBLE, envelope.v_man_visible)
                .set(
                    discrete_word_1::BETA_TARGET_VISIBLE,
                    envelope.beta_target_visible,
                ),
        ),
        discrete_word_2: encoder.discrete(
            DiscreteWordBuilder::new()
                .set(discrete_word_2::FAC_ENGAGED, frame.mode.is_engaged())
                .set(
                    discrete_word_2::YAW_DAMPER_ENGAGED,
                    engagement.yaw_damper_engaged,
                )
                .set(
                    discrete_word_2::RUDDER_TRIM_ENGAGED,
                    engagement.rudder_trim_engaged,
                )
                .set(
                    discrete_word_2::RUDDER_TRAVEL_LIM_ENGAGED,
                    engagement.rudder_travel_lim_engaged,
                )
                .set(
                    discrete_word_2::RUDDER_TRAVEL_LIM_EMERGENCY_RESET,
                    engagement.rudder_travel_lim_emergency_reset,
                )
                .set(
                    discrete_word_2::YAW_DAMPER_AVAIL_FOR_NORM_LAW,
                    engagement.yaw_damper_avail_for_norm_law,
                )
                .set(
                    discrete_word_2::RUDDER_TRIM_RESET_ACTIVE,
                    frame.laws.rudder_trim_reset_active,
                ),
        ),
        discrete_word_3: encoder.discrete(&flap_handle_word(frame)),
        discrete_word_4: encoder.discrete(
            DiscreteWordBuilder::new()
                .set(discrete_word_4::ON_GROUND, frame.confirmed.on_ground)
                .set(
                    discrete_word_4::LEFT_MAIN_GEAR_PRESSED,
                    frame.acquired.left_main_gear_pressed,
                )
                .set(
                    discrete_word_4::RIGHT_MAIN_GEAR_PRESSED,
                    frame.acquired.right_main_gear_pressed,
                )
                .set(discrete_word_4::MAIN_GEAR_OUT, frame.acquired.main_gear_out)
                .set(
                    discrete_word_4::TRACKING_MODE_ON,
                    frame.confirmed.tracking_mode_on,
                ),
        ),
        discrete_word_5: encoder.discrete(&source_word(frame.acquired)),

        gamma_a: angle(envelope.gamma_a),
        gamma_t: angle(envelope.gamma_t),
        total_weight: encoder.encode(envelope.weight.map(tonnes)),
        center_of_gravity_pos: encoder.encode(envelope.center_of_gravity.map(Ratio::new::<percent>)),
        sideslip_target: angle(Some(envelope.beta_target).filter(|_| envelope.beta_target_visible)),
        fac_slat_angle: angle(frame.acquired.slat_angle),
        fac_flap_angle: angle(frame.acquired.flap_angle),
        rudder_travel_limit_command: angle(
            Some(frame.laws.rudder_travel_lim_command).filter(|_| {
                engagement.rudder_travel_lim_engaged || engagement.rudder_travel_lim_emergency_reset
            }),
        ),
        delta_r_yaw_damper: angle(
            Some(frame.laws.yaw_damper_command).filter(|_| engagement.yaw_damper_engaged),
        ),
        estimated_sideslip: angle(envelope.estimated_beta),

        v_alpha_lim: speed(envelope.v_alpha_max),
        v_ls: speed(envelope.v_ls.filter(|_| in_flight)),
        v_stall: speed(envelope.v_stall.filter(|_| in_flight)),
        v_alpha_prot: speed(envelope.v_alpha_prot),
        v_stall_warn: speed(envelope.v_stall_warn),
        speed_trend: speed(envelope.v_c_trend),
        v_3: speed(envelope.v_3.filter(|_| envelope.v_3_visible)),
        v_4: speed(envelope.v_4.filter(|_| envelope.v_4_visible)),
        v_man: speed(envelope.v_man.filter(|_| envelope.v_man_visible)),
        v_max: speed(envelope.v_max),
        v_fe_next: speed(envelope.v_fe_next.filter(|_| in_flight)),

        delta_r_rudder_trim: angle(
            Some(frame.laws.rudder_trim_command).filter(|_| engagement.rudder_trim_engaged),
        ),
        rudder_trim_pos: angle(Some(frame.rudder_trim_position)),
    }
}

fn flap_handle_word(frame: &ComputedFrame) -> DiscreteWordBuilder {
    let mut builder = DiscreteWordBuilder::new();
    if let Some(index) = frame.acquired.flap_handle_index {
        builder.set(discrete_word_3::FLAP_HANDLE_INDEX_0 + index, true);
    }
    builder.set(
        discrete_word_3::TAKEOFF_CONFIG_CAPTURED,
        frame.mode.takeoff_config_captured(),
    );

    builder
}

fn source_word(acquired: &AcquiredData) -> DiscreteWordBuilder {
    let mut builder = DiscreteWordBuilder::new();
    builder
        .set(discrete_word_5::ADR_OWN_VALID, acquired.adr_own_valid)
        .set(discrete_word_5::ALL_ADR_LOST, acquired.all_adr_lost)
        .set(discrete_word_5::IR_OWN_VALID, acquired.ir_own_valid)
        .set(discrete_word_5::ALL_IR_LOST, acquired.all_ir_lost)
        .set(discrete_word_5::LGCIU_OWN_VALID, acquired.lgciu_own_valid)
        .set(discrete_word_5::ALL_LGCIU_LOST, acquired.all_lgciu_lost)
        .set(discrete_word_5::SFCC_OWN_VALID, acquired.sfcc_own_valid)
        .set(discrete_word_5::ALL_SFCC_LOST, acquired.all_sfcc_lost);

    builder
}

fn degrees(value: f64) -> Angle {
    Angle::new::<degree>(value)
}

fn knots(value: f64) -> Velocity {
    Velocity::new::<knot>(value)
}

fn tonnes(value: f64) -> Mass {
    Mass::new::<kilogram>(value * 1000.)
}
