use std::time::Duration;
use systems::shared::interpolation::{
    BreakpointTable1D, BreakpointTable2D, BreakpointTable3D, TableError,
};
use thiserror::Error;

/// Number of flap handle positions: 0, 1, 1+F, 2, 3 and FULL.
pub const FLAP_HANDLE_POSITIONS: usize = 6;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParameterTableError {
    #[error("invalid breakpoint table: {0}")]
    Table(#[from] TableError),
    #[error("time constant `{name}` must be finite and not negative, got {value}")]
    InvalidTimeConstant { name: &'static str, value: f64 },
    #[error("limit `{name}` must be finite and positive, got {value}")]
    InvalidLimit { name: &'static str, value: f64 },
    #[error("bit `{name}` must lie within the data field of a discrete word, got {bit}")]
    InvalidBitPosition { name: &'static str, bit: u8 },
}

/// The constants of the FAC computation graph. Built once, optionally adjusted, validated and
/// then shared between any number of computers.
///
/// Speeds are in knots, angles in degrees, weights in tonnes, altitudes in feet and rates per
/// second. Tables indexed by flap handle position use the order 0, 1, 1+F, 2, 3, FULL.
#[derive(Clone, Debug, PartialEq)]
pub struct FacParameterTable {
    pub power_up_test_duration: Duration,
    pub engage_confirmation_delay: Duration,
    pub liftoff_confirmation_delay: Duration,
    pub alpha_floor_trigger_delay: Duration,
    pub alpha_floor_reset_delay: Duration,
    pub alpha_floor_inhibit_delay: Duration,

    pub lgciu_left_main_gear_compressed_bit: u8,
    pub lgciu_right_main_gear_compressed_bit: u8,
    pub lgciu_main_gear_downlocked_bit: u8,
    /// Lever position bits of the SFCC system status word, in the order 0, 1, 2, 3, FULL.
    pub sfcc_flap_lever_bits: [u8; 5],
    /// Bit of the SFCC actual position word that separates 1+F from 1.
    pub sfcc_flaps_extended_bit: u8,
    /// Bit of the FMGC ATS discrete word by which the autothrust inhibits alpha floor.
    pub fmgc_ats_alpha_floor_inhibit_bit: u8,

    pub alpha_lag_time_constant: f64,
    pub alpha_floor_lag_time_constant: f64,
    pub airspeed_lag_time_constant: f64,
    pub speed_trend_lag_time_constant: f64,
    pub speed_trend_gain: f64,
    pub sideslip_lag_time_constant: f64,
    pub sideslip_gain: f64,
    pub sideslip_reference_airspeed: f64,
    pub beta_target_engine_out: f64,
    pub beta_target_rate_limit: f64,

    pub alpha_max: BreakpointTable2D,
    pub alpha_protection: BreakpointTable2D,
    pub alpha_stall_warning: BreakpointTable2D,
    pub alpha_floor: BreakpointTable2D,
    pub alpha_floor_hysteresis: f64,
    /// Radio altitude below which alpha floor is inhibited.
    pub alpha_floor_min_radio_altitude: f64,
    pub alpha_zero_lift: BreakpointTable1D,

    pub vls: BreakpointTable3D,
    pub vls_rate_limit: f64,
    pub spoiler_max_deflection: BreakpointTable1D,
    pub vls_increase_max_deflection: BreakpointTable1D,
    pub vmcl: [f64; FLAP_HANDLE_POSITIONS],
    pub vls_to_vs1g_clean: f64,
    pub vls_to_vs1g_extended: f64,
    pub f_speed_factor: f64,
    pub s_speed_factor: f64,
    pub green_dot_speed: BreakpointTable2D,

    pub vmo: f64,
    pub mmo: f64,
    pub vle: f64,
    /// Placard speed per flap handle position. The clean entry is unused.
    pub vfe: [f64; FLAP_HANDLE_POSITIONS],

    pub yaw_damper_washout_time_constant: f64,
    pub yaw_damper_gain: BreakpointTable1D,
    pub yaw_damper_authority: f64,
    pub yaw_damper_rate_limit: f64,

    pub rudder_trim_rate: f64,
    pub rudder_trim_reset_rate: f64,
    pub rudder_trim_reset_threshold: f64,
    pub rudder_trim_authority: f64,

    pub rudder_travel_limit: BreakpointTable1D,
    pub rudder_travel_limit_rate: f64,
}

const FLAP_HANDLE_BREAKPOINTS: [f64; FLAP_HANDLE_POSITIONS] = [0., 1., 2., 3., 4., 5.];

const WEIGHT_BREAKPOINTS: [f64; 8] = [250., 300., 350., 400., 450., 500., 550., 600.];

/// 1g stall speed at 400 t per flap handle position.
const VS1G_AT_400_TONNES: [f64; FLAP_HANDLE_POSITIONS] = [158., 135., 128., 122., 118., 112.];

const VLS_FACTOR_CLEAN: f64 = 1.28;
const VLS_FACTOR_EXTENDED: f64 = 1.23;
const VLS_FACTOR_TAKEOFF: f64 = 1.13;

impl FacParameterTable {
    pub fn a380() -> Result<Self, ParameterTableError> {
        let alpha_mach_breakpoints = vec![0., 0.5, 0.7, 0.9];
        let flap_handle = FLAP_HANDLE_BREAKPOINTS.to_vec();

        Ok(Self {
            power_up_test_duration: Duration::from_millis(500),
            engage_confirmation_delay: Duration::from_millis(100),
            liftoff_confirmation_delay: Duration::from_secs(1),
            alpha_floor_trigger_delay: Duration::from_millis(100),
            alpha_floor_reset_delay: Duration::from_secs(1),
            alpha_floor_inhibit_delay: Duration::from_millis(200),

            lgciu_left_main_gear_compressed_bit: 23,
            lgciu_right_main_gear_compressed_bit: 24,
            lgciu_main_gear_downlocked_bit: 25,
            sfcc_flap_lever_bits: [17, 18, 19, 20, 21],
            sfcc_flaps_extended_bit: 19,
            fmgc_ats_alpha_floor_inhibit_bit: 26,

            alpha_lag_time_constant: 0.2,
            alpha_floor_lag_time_constant: 0.1,
            airspeed_lag_time_constant: 0.5,
            speed_trend_lag_time_constant: 1.5,
            speed_trend_gain: 10.,
            sideslip_lag_time_constant: 0.5,
            sideslip_gain: -18.,
            sideslip_reference_airspeed: 200.,
            beta_target_engine_out: 2.5,
            beta_target_rate_limit: 2.,

            alpha_max: BreakpointTable2D::new(
                alpha_mach_breakpoints.clone(),
                flap_handle.clone(),
                vec![
                    10.0, 10.0,  8.0,  5.5,
                    15.0, 15.0, 12.5, 10.0,
                    15.0, 15.0, 12.5, 10.0,
                    14.5, 14.5, 12.0,  9.5,
                    14.0, 14.0, 11.5,  9.0,
                    13.5, 13.5, 11.0,  8.5,
                ],
            )?,
            alpha_protection: BreakpointTable2D::new(
                alpha_mach_breakpoints.clone(),
                flap_handle.clone(),
                vec![
                     7.5,  7.5,  5.5,  3.0,
                    12.5, 12.5, 10.0,  7.5,
                    12.5, 12.5, 10.0,  7.5,
                    12.0, 12.0,  9.5,  7.0,
                    11.5, 11.5,  9.0,  6.5,
                    11.0, 11.0,  8.5,  6.0,
                ],
            )?,
            alpha_stall_warning: BreakpointTable2D::new(
                alpha_mach_breakpoints,
                flap_handle.clone(),
                vec![
                     9.0,  9.0,  7.0,  4.5,
                    14.0, 14.0, 11.5,  9.0,
                    14.0, 14.0, 11.5,  9.0,
                    13.5, 13.5, 11.0,  8.5,
                    13.0, 13.0, 10.5,  8.0,
                    12.5, 12.5, 10.0,  7.5,
                ],
            )?,
            alpha_floor: BreakpointTable2D::new(
                vec![0., 0.5, 0.6, 0.7, 0.8],
                flap_handle.clone(),
                vec![
                     8.5,  8.5,  7.5,  6.5,  5.25,
                    13.5, 13.5, 12.25, 11.0, 9.75,
                    13.5, 13.5, 12.25, 11.0, 9.75,
                    13.0, 13.0, 11.75, 10.5, 9.25,
                    12.5, 12.5, 11.25, 10.0, 8.75,
                    12.0, 12.0, 10.75,  9.5, 8.25,
                ],
            )?,
            alpha_floor_hysteresis: 2.,
            alpha_floor_min_radio_altitude: 100.,
            alpha_zero_lift: BreakpointTable1D::new(
                flap_handle.clone(),
                vec![-1.5, -3.5, -4., -5., -6., -7.],
            )?,

            vls: BreakpointTable3D::new(
                WEIGHT_BREAKPOINTS.to_vec(),
                vec![0., 1.],
                flap_handle.clone(),
                vls_table_data(),
            )?,
            vls_rate_limit: 5.,
            spoiler_max_deflection: BreakpointTable1D::new(
                flap_handle.clone(),
                vec![45., 45., 45., 40., 35., 30.],
            )?,
            vls_increase_max_deflection: BreakpointTable1D::new(
                flap_handle.clone(),
                vec![25., 20., 18., 15., 12., 10.],
            )?,
            vmcl: [0., 122., 122., 120., 120., 118.],
            vls_to_vs1g_clean: VLS_FACTOR_CLEAN,
            vls_to_vs1g_extended: VLS_FACTOR_EXTENDED,
            f_speed_factor: 1.26,
            s_speed_factor: 1.23,
            green_dot_speed: BreakpointTable2D::new(
                WEIGHT_BREAKPOINTS.to_vec(),
                (0..12).map(|step| step as f64 * 4000.).collect(),
                green_dot_table_data(),
            )?,

            vmo: 340.,
            mmo: 0.89,
            vle: 250.,
            vfe: [340., 263., 222., 220., 196., 182.],

            yaw_damper_washout_time_constant: 1.,
            yaw_damper_gain: BreakpointTable1D::new(
                vec![120., 200., 300., 400.],
                vec![3., 2.2, 1.4, 1.],
            )?,
            yaw_damper_authority: 10.,
            yaw_damper_rate_limit: 25.,

            rudder_trim_rate: 1.,
            rudder_trim_reset_rate: 1.5,
            rudder_trim_reset_threshold: 0.1,
            rudder_trim_authority: 20.,

            rudder_travel_limit: BreakpointTable1D::new(
                vec![160., 190., 220., 260., 300., 340., 380.],
                vec![25., 18.8, 13.5, 9.4, 6.8, 4.9, 3.4],
            )?,
            rudder_travel_limit_rate: 2.,
        })
    }

    /// Checks the scalar constants. Breakpoint tables validate themselves on construction.
    pub fn validate(&self) -> Result<(), ParameterTableError> {
        for (name, value) in [
            ("alpha_lag_time_constant", self.alpha_lag_time_constant),
            (
                "alpha_floor_lag_time_constant",
                self.alpha_floor_lag_time_constant,
            ),
            ("airspeed_lag_time_constant", self.airspeed_lag_time_constant),
            (
                "speed_trend_lag_time_constant",
                self.speed_trend_lag_time_constant,
            ),
            ("sideslip_lag_time_constant", self.sideslip_lag_time_constant),
            (
                "yaw_damper_washout_time_constant",
                self.yaw_damper_washout_time_constant,
            ),
        ] {
            if !value.is_finite() || value < 0. {
                return Err(ParameterTableError::InvalidTimeConstant { name, value });
            }
        }

        for (name, value) in [
            ("vls_rate_limit", self.vls_rate_limit),
            (
                "alpha_floor_min_radio_altitude",
                self.alpha_floor_min_radio_altitude,
            ),
            ("beta_target_rate_limit", self.beta_target_rate_limit),
            ("yaw_damper_authority", self.yaw_damper_authority),
            ("yaw_damper_rate_limit", self.yaw_damper_rate_limit),
            ("rudder_trim_rate", self.rudder_trim_rate),
            ("rudder_trim_reset_rate", self.rudder_trim_reset_rate),
            ("rudder_trim_authority", self.rudder_trim_authority),
            ("rudder_travel_limit_rate", self.rudder_travel_limit_rate),
            ("vls_to_vs1g_clean", self.vls_to_vs1g_clean),
            ("vls_to_vs1g_extended", self.vls_to_vs1g_extended),
            ("vmo", self.vmo),
            ("mmo", self.mmo),
            ("vle", self.vle),
        ] {
            if !value.is_finite() || value <= 0. {
                return Err(ParameterTableError::InvalidLimit { name, value });
            }
        }

        let bits = [
            (
                "lgciu_left_main_gear_compressed_bit",
                self.lgciu_left_main_gear_compressed_bit,
            ),
            (
                "lgciu_right_main_gear_compressed_bit",
                self.lgciu_right_main_gear_compressed_bit,
            ),
            (
                "lgciu_main_gear_downlocked_bit",
                self.lgciu_main_gear_downlocked_bit,
            ),
            ("sfcc_flaps_extended_bit", self.sfcc_flaps_extended_bit),
            (
                "fmgc_ats_alpha_floor_inhibit_bit",
                self.fmgc_ats_alpha_floor_inhibit_bit,
            ),
        ];
        let lever_bits = self
            .sfcc_flap_lever_bits
            .iter()
            .map(|&bit| ("sfcc_flap_lever_bits", bit));

        for (name, bit) in bits.iter().copied().chain(lever_bits) {
            if !(11..=29).contains(&bit) {
                return Err(ParameterTableError::InvalidBitPosition { name, bit });
            }
        }

        Ok(())
    }
}

/// VLS by weight, takeoff configuration and flap handle position, with the weight varying
/// fastest. In takeoff configuration the positions 1, 1+F and 2 use the reduced takeoff margin.
fn vls_table_data() -> Vec<f64> {
    let mut data = Vec::with_capacity(WEIGHT_BREAKPOINTS.len() * 2 * FLAP_HANDLE_POSITIONS);
    for (position, vs1g) in VS1G_AT_400_TONNES.iter().enumerate() {
        for takeoff in [false, true] {
            let factor = match position {
                0 => VLS_FACTOR_CLEAN,
                1..=3 if takeoff => VLS_FACTOR_TAKEOFF,
                _ => VLS_FACTOR_EXTENDED,
            };

            for weight in WEIGHT_BREAKPOINTS {
                data.push(vs1g * (weight / 400.).sqrt() * factor);
            }
        }
    }

    data
}

/// Green dot speed by weight and pressure altitude, with the weight varying fastest.
fn green_dot_table_data() -> Vec<f64> {
    let mut data = Vec::with_capacity(WEIGHT_BREAKPOINTS.len() * 12);
    for step in 0..12 {
        let altitude_kft = step as f64 * 4.;
        for weight in WEIGHT_BREAKPOINTS {
            data.push(2. * weight / 5. + 90. + altitude_kft);
        }
    }

    data
}
