//! # PathBot Executable Parameters
//!
//! This module provides the parameters for the compiler executable. The
//! whole parameter set is loaded once from a single TOML file (via
//! [`util::params::load`]) and passed by reference into each component, so
//! there is no global configuration state.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;
use std::collections::BTreeMap;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for the compiler executable.
#[derive(Deserialize, Debug, Clone)]
pub struct PathbotParams {
    /// Path to the calibration image of the mat. Only its pixel dimensions
    /// are read.
    pub mat_image_path: String,

    /// Path to the waypoint handoff file produced by the capture tool.
    pub waypoints_path: String,

    /// Directory the generated motion programs are written into.
    pub output_dir: String,

    /// Physical robot parameters.
    pub robot: RobotParams,

    /// Physical mat parameters.
    pub mat: MatParams,

    /// Interactive nudge steps used by the capture tool.
    pub steps: StepParams,

    /// PID gains and dead-band used by the emitted routines.
    pub pid: PidParams,

    /// Motor port map. Keys are `port_a` to `port_d`, values are `"large"`,
    /// `"medium"` or empty for an unbound port.
    pub robot_motors: BTreeMap<String, String>,

    /// Sensor port map. Keys are `port_1` to `port_4`, values are `"gyro"`,
    /// `"color"` or empty for an unbound port.
    pub robot_sensors: BTreeMap<String, String>,
}

/// Physical robot parameters.
#[derive(Deserialize, Debug, Clone)]
pub struct RobotParams {
    /// Robot footprint length along the x axis, in studs.
    pub length_x_studs: f64,

    /// Robot footprint width along the y axis, in studs.
    pub width_y_studs: f64,

    /// Drive wheel diameter in millimeters.
    pub wheel_diameter_mm: f64,
}

/// Physical mat parameters.
#[derive(Deserialize, Debug, Clone)]
pub struct MatParams {
    /// Mat length along the x axis (image width direction), in millimeters.
    pub length_x_mm: f64,

    /// Mat width along the y axis (image height direction), in millimeters.
    pub width_y_mm: f64,
}

/// Interactive nudge steps for the capture tool.
///
/// The compiler itself only validates their presence, the capture
/// collaborator consumes the values.
#[derive(Deserialize, Debug, Clone)]
pub struct StepParams {
    /// Position nudge in pixels.
    pub delta_pixels: i32,

    /// Heading nudge in degrees.
    pub delta_theta_deg: f64,

    /// Auxiliary motor offset nudge in motor degrees.
    pub additional_motor_step: i32,

    /// Drive speed nudge in degrees per second.
    pub speed_step: i32,
}

/// PID gains and dead-band.
#[derive(Deserialize, Debug, Clone)]
pub struct PidParams {
    /// Proportional gain
    pub k_p: f64,

    /// Integral gain
    pub k_i: f64,

    /// Derivative gain
    pub k_d: f64,

    /// Errors with a magnitude below this value are treated as converged.
    pub accepted_error: f64,
}

#[cfg(test)]
mod test {
    use super::*;

    const PARAMS_TOML: &str = r#"
        mat_image_path = "assets/mat.png"
        waypoints_path = "captures/waypoints.json"
        output_dir = "programs"

        [robot]
        length_x_studs = 20.0
        width_y_studs = 15.0
        wheel_diameter_mm = 56.0

        [mat]
        length_x_mm = 2362.0
        width_y_mm = 1143.0

        [steps]
        delta_pixels = 5
        delta_theta_deg = 1.0
        additional_motor_step = 10
        speed_step = 50

        [pid]
        k_p = 12.0
        k_i = 0.0
        k_d = 0.0
        accepted_error = 2.0

        [robot_motors]
        port_a = "large"
        port_b = "medium"
        port_c = ""
        port_d = "large"

        [robot_sensors]
        port_1 = "color"
        port_2 = "gyro"
        port_3 = ""
        port_4 = ""
    "#;

    fn write_params_file(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("pathbot_params_{}_{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_params() {
        let path = write_params_file("full.toml", PARAMS_TOML);
        let params: PathbotParams = util::params::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(params.robot.wheel_diameter_mm, 56.0);
        assert_eq!(params.mat.length_x_mm, 2362.0);
        assert_eq!(params.steps.delta_pixels, 5);
        assert_eq!(params.pid.k_p, 12.0);
        assert_eq!(params.robot_motors["port_a"], "large");
        assert_eq!(params.robot_sensors["port_2"], "gyro");
    }

    #[test]
    fn test_missing_steps_is_fatal() {
        // Drop the [steps] section, the load must fail rather than default
        let without_steps: String = PARAMS_TOML
            .lines()
            .filter({
                let mut in_steps = false;
                move |line| {
                    let trimmed = line.trim();
                    if trimmed.starts_with('[') {
                        in_steps = trimmed == "[steps]";
                    }
                    !in_steps
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        let path = write_params_file("nosteps.toml", &without_steps);
        let result: Result<PathbotParams, _> = util::params::load(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            result,
            Err(util::params::LoadError::DeserialiseError(_))
        ));
    }
}
