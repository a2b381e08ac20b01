//! # Port bindings
//!
//! Builds the read-only map from logical ports to drive motors, auxiliary
//! motors, the gyro sensor and any color sensors, scanning the configured
//! port maps once. All binding problems are caught here, before any
//! compilation output can be produced.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::warn;
use std::collections::BTreeMap;
use thiserror::Error;

// Internal
use crate::params::PathbotParams;

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// Possible errors raised while building the port bindings.
#[derive(Debug, Error)]
pub enum PortError {
    #[error("Unknown motor type \"{value}\" bound to {port}")]
    UnknownMotorType { port: String, value: String },

    #[error("Unknown sensor type \"{value}\" bound to {port}")]
    UnknownSensorType { port: String, value: String },

    #[error("Invalid port name: {0}")]
    InvalidPortName(String),

    #[error("Expected exactly 2 drive (large) motors, found {0}")]
    WrongDriveMotorCount(usize),

    #[error("At most 2 auxiliary (medium) motors are supported, found {0}")]
    TooManyAuxMotors(usize),

    #[error("No gyro sensor is bound")]
    NoGyro,

    #[error("At most 2 color sensors are supported, found {0}")]
    TooManyColorSensors(usize),
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The resolved motor and sensor bindings.
///
/// Built once from configuration, read-only for the rest of compilation.
#[derive(Debug, Clone)]
pub struct PortBindings {
    /// Output ports of the two drive motors, in scan order.
    pub drive_ports: [char; 2],

    /// Output ports of the auxiliary motors, in scan order (0 to 2).
    pub aux_ports: Vec<char>,

    /// Input port of the gyro sensor.
    pub gyro_port: u8,

    /// Input ports of the color sensors, in scan order (0 to 2).
    pub color_ports: Vec<u8>,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl PortBindings {
    /// Build the bindings from the loaded parameters.
    pub fn from_params(params: &PathbotParams) -> Result<Self, PortError> {
        Self::new(&params.robot_motors, &params.robot_sensors)
    }

    /// Build the bindings from the motor and sensor port maps.
    ///
    /// Empty values are unbound ports. More than one gyro is tolerated:
    /// the last scanned port wins and a warning is logged.
    pub fn new(
        motors: &BTreeMap<String, String>,
        sensors: &BTreeMap<String, String>,
    ) -> Result<Self, PortError> {
        let mut drive_ports = Vec::new();
        let mut aux_ports = Vec::new();

        for (port, motor) in motors {
            if motor.is_empty() {
                continue;
            }

            let id = motor_port_char(port)?;

            match motor.to_lowercase().as_str() {
                "large" => drive_ports.push(id),
                "medium" => aux_ports.push(id),
                _ => {
                    return Err(PortError::UnknownMotorType {
                        port: port.clone(),
                        value: motor.clone(),
                    })
                }
            }
        }

        if drive_ports.len() != 2 {
            return Err(PortError::WrongDriveMotorCount(drive_ports.len()));
        }
        if aux_ports.len() > 2 {
            return Err(PortError::TooManyAuxMotors(aux_ports.len()));
        }

        let mut gyro_port = None;
        let mut color_ports = Vec::new();

        for (port, sensor) in sensors {
            if sensor.is_empty() {
                continue;
            }

            let id = sensor_port_num(port)?;

            match sensor.to_lowercase().as_str() {
                "gyro" => {
                    if gyro_port.is_some() {
                        warn!(
                            "More than one gyro sensor is bound, the last one \
                             scanned will be used (input {})",
                            id
                        );
                    }
                    gyro_port = Some(id);
                }
                "color" => color_ports.push(id),
                _ => {
                    return Err(PortError::UnknownSensorType {
                        port: port.clone(),
                        value: sensor.clone(),
                    })
                }
            }
        }

        let gyro_port = gyro_port.ok_or(PortError::NoGyro)?;

        if color_ports.len() > 2 {
            return Err(PortError::TooManyColorSensors(color_ports.len()));
        }

        Ok(Self {
            drive_ports: [drive_ports[0], drive_ports[1]],
            aux_ports,
            gyro_port,
            color_ports,
        })
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Parse a motor port key like `port_a` into its output letter `A`.
fn motor_port_char(port: &str) -> Result<char, PortError> {
    let tail = port.rsplit('_').next().unwrap_or("");
    let mut chars = tail.chars();

    match (chars.next(), chars.next()) {
        (Some(c), None) if ('a'..='d').contains(&c.to_ascii_lowercase()) => {
            Ok(c.to_ascii_uppercase())
        }
        _ => Err(PortError::InvalidPortName(port.to_string())),
    }
}

/// Parse a sensor port key like `port_1` into its input number.
fn sensor_port_num(port: &str) -> Result<u8, PortError> {
    let tail = port.rsplit('_').next().unwrap_or("");

    match tail.parse::<u8>() {
        Ok(n) if (1..=4).contains(&n) => Ok(n),
        _ => Err(PortError::InvalidPortName(port.to_string())),
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
