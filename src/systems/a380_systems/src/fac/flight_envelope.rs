use super::acquisition::AcquiredData;
use super::bus::FacDiscreteInputs;
use super::logic::{AlphaFloorConditions, ConfirmedDiscretes};
use super::parameters::{FacParameterTable, FLAP_HANDLE_POSITIONS};
use std::time::Duration;
use systems::shared::{
    derivative::DerivativeNode, interpolation::BreakpointTable2D, low_pass_filter::LagFilter,
    rate_limiter::RateLimiter,
};

/// Knots per foot per minute.
const FEET_PER_MINUTE_TO_KNOTS: f64 = 60. / 6076.12;

/// Airspeed below which the sideslip estimate stops scaling with dynamic pressure.
const MIN_SIDESLIP_AIRSPEED: f64 = 60.;

/// Mach number below which the MMO limit is not evaluated.
const MIN_MACH_FOR_MMO: f64 = 0.1;

/// Lowest load factor the alpha speeds are normalized with.
const MIN_LOAD_FACTOR: f64 = 0.5;

/// The airspeed at which the aircraft would fly at `alpha_target` in 1g flight, given that it
/// currently flies at `alpha` with `v_ias`. Lift is modelled as proportional to `V² (α - α0)`.
/// At or below the zero lift angle there is no positive lift to scale, and the speed is 0.
pub fn calculate_v_alpha_max(v_ias: f64, alpha: f64, alpha_0: f64, alpha_target: f64) -> f64 {
    let target_margin = alpha_target - alpha_0;
    if target_margin <= 0. {
        return 0.;
    }

    v_ias * ((alpha - alpha_0).max(0.) / target_margin).sqrt()
}

/// Derives the 1g stall speed of the current flap handle position from the VLS of the clean and
/// the current configuration.
pub fn vs1g_from_vls(
    vls_conf_0: f64,
    vls_conf_other: f64,
    flap_handle_index: u8,
    parameters: &FacParameterTable,
) -> f64 {
    if flap_handle_index == 0 {
        vls_conf_0 / parameters.vls_to_vs1g_clean
    } else {
        vls_conf_other / parameters.vls_to_vs1g_extended
    }
}

/// Everything the envelope protection computes in one frame, in knots and degrees. A `None`
/// speed could not be computed from the available sources.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlightEnvelope {
    pub estimated_beta: Option<f64>,
    pub beta_target: f64,
    pub beta_target_visible: bool,
    pub alpha_filtered: Option<f64>,
    pub alpha_floor: AlphaFloorConditions,
    pub weight: Option<f64>,
    pub center_of_gravity: Option<f64>,

    pub v_alpha_max: Option<f64>,
    pub v_alpha_prot: Option<f64>,
    pub v_stall_warn: Option<f64>,
    pub v_ls: Option<f64>,
    pub v_stall: Option<f64>,
    pub v_mcl: Option<f64>,
    pub v_3: Option<f64>,
    pub v_3_visible: bool,
    pub v_4: Option<f64>,
    pub v_4_visible: bool,
    pub v_man: Option<f64>,
    pub v_man_visible: bool,
    pub v_max: Option<f64>,
    pub v_fe_next: Option<f64>,
    pub v_c_trend: Option<f64>,

    pub gamma_a: Option<f64>,
    pub gamma_t: Option<f64>,
}

pub(super) struct FlightEnvelopeComputation {
    alpha_filter: LagFilter<f64>,
    alpha_floor_filter: LagFilter<f32>,
    airspeed_filter: LagFilter<f64>,
    speed_trend_derivative: DerivativeNode,
    speed_trend_filter: LagFilter<f64>,
    sideslip_filter: LagFilter<f64>,
    beta_target_limiter: RateLimiter,
    vls_limiter: RateLimiter,
}

impl FlightEnvelopeComputation {
    pub fn new() -> Self {
        Self {
            alpha_filter: LagFilter::new(),
            alpha_floor_filter: LagFilter::new(),
            airspeed_filter: LagFilter::new(),
            speed_trend_derivative: DerivativeNode::new(),
            speed_trend_filter: LagFilter::new(),
            sideslip_filter: LagFilter::new(),
            beta_target_limiter: RateLimiter::new(),
            vls_limiter: RateLimiter::new(),
        }
    }

    pub fn reset(&mut self) {
        self.alpha_filter.reset();
        self.alpha_floor_filter.reset();
        self.airspeed_filter.reset();
        self.speed_trend_derivative.reset();
        self.speed_trend_filter.reset();
        self.sideslip_filter.reset();
        self.beta_target_limiter.reset();
        self.vls_limiter.reset();
    }

    /// `takeoff_config_captured` is the memory of the previous frame, as the sequencer only
    /// runs once the envelope is known.
    pub fn update(
        &mut self,
        delta: Duration,
        parameters: &FacParameterTable,
        acquired: &AcquiredData,
        discretes: &FacDiscreteInputs,
        confirmed: &ConfirmedDiscretes,
        takeoff_config_captured: bool,
    ) -> FlightEnvelope {
        let air_data = acquired.air_data;
        let on_ground = confirmed.on_ground;
        let flap_handle_index = acquired.flap_handle_index;
        let position = flap_handle_index.map(f64::from);

        let alpha = self.alpha_filter.update(
            or_hold(air_data.map(|data| data.alpha), self.alpha_filter.output()),
            parameters.alpha_lag_time_constant,
            delta,
        );
        let alpha_floor_alpha = self.alpha_floor_filter.update(
            or_hold(
                air_data.map(|data| data.alpha as f32),
                self.alpha_floor_filter.output(),
            ),
            parameters.alpha_floor_lag_time_constant,
            delta,
        );
        let airspeed = self.airspeed_filter.update(
            or_hold(
                air_data.map(|data| data.computed_airspeed),
                self.airspeed_filter.output(),
            ),
            parameters.airspeed_lag_time_constant,
            delta,
        );
        let airspeed_rate =
            self.speed_trend_derivative
                .update(airspeed, parameters.speed_trend_gain, delta);
        let speed_trend = self.speed_trend_filter.update(
            airspeed_rate,
            parameters.speed_trend_lag_time_constant,
            delta,
        );

        let raw_beta = match (air_data, acquired.inertial_data) {
            (Some(air_data), Some(inertial_data)) => {
                let airspeed = air_data.computed_airspeed.max(MIN_SIDESLIP_AIRSPEED);
                Some(
                    parameters.sideslip_gain
                        * inertial_data.lateral_load_factor
                        * (parameters.sideslip_reference_airspeed / airspeed).powi(2),
                )
            }
            _ => None,
        };
        let estimated_beta = self.sideslip_filter.update(
            or_hold(raw_beta, self.sideslip_filter.output()),
            parameters.sideslip_lag_time_constant,
            delta,
        );

        let beta_target_visible = discretes.engine_1_stopped != discretes.engine_2_stopped
            && !on_ground
            && acquired.inertial_data.is_some();
        let beta_target_raw = match (beta_target_visible, discretes.engine_1_stopped) {
            (false, _) => 0.,
            (true, true) => parameters.beta_target_engine_out,
            (true, false) => -parameters.beta_target_engine_out,
        };
        let beta_target = self.beta_target_limiter.update(
            beta_target_raw,
            parameters.beta_target_rate_limit,
            parameters.beta_target_rate_limit,
            delta,
            !beta_target_visible,
        );

        // The current alpha is flown at the current load factor, the speeds are for 1g flight.
        let load_factor = acquired
            .inertial_data
            .map_or(1., |data| data.normal_load_factor)
            .max(MIN_LOAD_FACTOR);
        let alpha_speeds = match (air_data, position) {
            (Some(air_data), Some(position)) if !on_ground => {
                let alpha_0 = parameters.alpha_zero_lift.interpolate(position);
                let airspeed_1g = airspeed / load_factor.sqrt();
                let v_alpha = |alpha_table: &BreakpointTable2D| {
                    calculate_v_alpha_max(
                        airspeed_1g,
                        alpha,
                        alpha_0,
                        alpha_table.interpolate(air_data.mach, position),
                    )
                };

                Some((
                    v_alpha(&parameters.alpha_max),
                    v_alpha(&parameters.alpha_protection),
                    v_alpha(&parameters.alpha_stall_warning),
                ))
            }
            _ => None,
        };

        let below_min_radio_altitude = acquired
            .radio_altitude
            .map_or(false, |altitude| altitude < parameters.alpha_floor_min_radio_altitude);
        let alpha_floor = match (air_data, position) {
            (Some(air_data), Some(position)) => {
                let threshold = parameters.alpha_floor.interpolate(air_data.mach, position);
                let alpha = f64::from(alpha_floor_alpha);

                AlphaFloorConditions {
                    above_threshold: alpha > threshold,
                    below_reset_threshold: alpha < threshold - parameters.alpha_floor_hysteresis,
                    inhibited: on_ground
                        || below_min_radio_altitude
                        || acquired.ats_alpha_floor_inhibited,
                }
            }
            _ => AlphaFloorConditions {
                above_threshold: false,
                below_reset_threshold: false,
                inhibited: true,
            },
        };

        let config_speeds = match (acquired.weight, flap_handle_index) {
            (Some(weight), Some(index)) => Some(ConfigurationSpeeds::new(
                parameters,
                weight,
                index,
                takeoff_config_captured,
                acquired.spoiler_deflection,
            )),
            _ => None,
        };

        // The limiter restarts from the table value once the configuration is known again.
        let v_ls = match config_speeds {
            Some(speeds) => Some(self.vls_limiter.update(
                speeds.vls,
                parameters.vls_rate_limit,
                parameters.vls_rate_limit,
                delta,
                false,
            )),
            None => {
                self.vls_limiter.reset();
                None
            }
        };

        let green_dot = match (acquired.weight, air_data) {
            (Some(weight), Some(air_data)) => Some(
                parameters
                    .green_dot_speed
                    .interpolate(weight, air_data.altitude),
            ),
            _ => None,
        };

        FlightEnvelope {
            estimated_beta: raw_beta.map(|_| estimated_beta),
            beta_target,
            beta_target_visible,
            alpha_filtered: air_data.map(|_| f64::from(alpha_floor_alpha)),
            alpha_floor,
            weight: acquired.weight,
            center_of_gravity: acquired.center_of_gravity,

            v_alpha_max: alpha_speeds.map(|speeds| speeds.0),
            v_alpha_prot: alpha_speeds.map(|speeds| speeds.1),
            v_stall_warn: alpha_speeds.map(|speeds| speeds.2),
            v_ls,
            v_stall: config_speeds.map(|speeds| speeds.v_stall),
            v_mcl: config_speeds.map(|speeds| speeds.v_mcl),
            v_3: config_speeds.map(|speeds| speeds.v_3),
            v_3_visible: !on_ground && matches!(flap_handle_index, Some(3) | Some(4)),
            v_4: config_speeds.map(|speeds| speeds.v_4),
            v_4_visible: !on_ground && matches!(flap_handle_index, Some(1) | Some(2)),
            v_man: green_dot,
            v_man_visible: !on_ground && flap_handle_index == Some(0),
            v_max: air_data.map(|air_data| {
                maximum_speed(
                    parameters,
                    air_data.computed_airspeed,
                    air_data.mach,
                    flap_handle_index,
                    acquired.main_gear_out,
                )
            }),
            v_fe_next: flap_handle_index
                .map(usize::from)
                .filter(|&index| index + 1 < FLAP_HANDLE_POSITIONS)
                .map(|index| parameters.vfe[index + 1]),
            v_c_trend: air_data.map(|_| speed_trend),

            gamma_a: air_data
                .map(|air_data| air_path_angle(air_data.true_airspeed, air_data.vertical_speed)),
            gamma_t: acquired.inertial_data.map(|data| data.flight_path_angle),
        }
    }
}

/// Routes a signal to its filter, or holds the filter at its last output while the signal is
/// unavailable.
fn or_hold<T: Copy + Default>(signal: Option<T>, held: Option<T>) -> T {
    signal.or(held).unwrap_or_default()
}

/// Speeds that only depend on weight and configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ConfigurationSpeeds {
    vls: f64,
    v_stall: f64,
    v_mcl: f64,
    v_3: f64,
    v_4: f64,
}

impl ConfigurationSpeeds {
    fn new(
        parameters: &FacParameterTable,
        weight: f64,
        flap_handle_index: u8,
        takeoff_config_captured: bool,
        spoiler_deflection: f64,
    ) -> Self {
        let position = f64::from(flap_handle_index);
        let takeoff = if takeoff_config_captured { 1. } else { 0. };
        let clean_vls = parameters.vls.interpolate(weight, 0., 0.);
        let landing_vls = |position: f64| parameters.vls.interpolate(weight, 0., position);

        let spoiler_ratio = if spoiler_deflection > 0. {
            (spoiler_deflection / parameters.spoiler_max_deflection.interpolate(position))
                .max(0.)
                .min(1.)
        } else {
            0.
        };
        let vls_increase =
            spoiler_ratio * parameters.vls_increase_max_deflection.interpolate(position);

        let v_mcl = parameters.vmcl[usize::from(flap_handle_index).min(FLAP_HANDLE_POSITIONS - 1)];
        let vls = (parameters.vls.interpolate(weight, takeoff, position) + vls_increase).max(v_mcl);

        Self {
            vls,
            v_stall: vs1g_from_vls(
                clean_vls,
                landing_vls(position),
                flap_handle_index,
                parameters,
            ),
            v_mcl,
            v_3: parameters.f_speed_factor * vs1g_from_vls(clean_vls, landing_vls(2.), 2, parameters),
            v_4: parameters.s_speed_factor * vs1g_from_vls(clean_vls, clean_vls, 0, parameters),
        }
    }
}

fn maximum_speed(
    parameters: &FacParameterTable,
    computed_airspeed: f64,
    mach: f64,
    flap_handle_index: Option<u8>,
    main_gear_out: bool,
) -> f64 {
    let mut v_max = parameters.vmo;

    if mach > MIN_MACH_FOR_MMO {
        v_max = v_max.min(computed_airspeed * parameters.mmo / mach);
    }

    if let Some(index) = flap_handle_index.filter(|&index| index > 0) {
        v_max = v_max.min(parameters.vfe[usize::from(index).min(FLAP_HANDLE_POSITIONS - 1)]);
    }

    if main_gear_out {
        v_max = v_max.min(parameters.vle);
    }

    v_max
}

/// The aerodynamic flight path angle in degrees.
fn air_path_angle(true_airspeed: f64, vertical_speed: f64) -> f64 {
    if true_airspeed <= 0. {
        return 0.;
    }

    (vertical_speed * FEET_PER_MINUTE_TO_KNOTS / true_airspeed)
        .max(-1.)
        .min(1.)
        .asin()
        .to_degrees()
}
