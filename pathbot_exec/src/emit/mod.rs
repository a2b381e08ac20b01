//! # Program emission module
//!
//! Deterministic construction of the target motion program from the port
//! bindings, the PID configuration and the compiled segment list. The
//! emitter is a pure function of its inputs: rendering twice from the same
//! compiled state yields byte-identical text. The only external
//! variability is the output file's sequence number.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod instr;
mod routines;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal
pub use instr::Instruction;

use crate::params::PidParams;
use crate::path_compile::{AuxMode, MotionSegment, MovementAction};
use crate::ports::PortBindings;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Interpreter marker and imports opening every emitted program.
const PROGRAM_HEADER: &str = "\
#!/usr/bin/env python3

from ev3dev2.motor import LargeMotor, MediumMotor, SpeedDPS, \
OUTPUT_A, OUTPUT_B, OUTPUT_C, OUTPUT_D
from ev3dev2.sensor import INPUT_1, INPUT_2, INPUT_3, INPUT_4
from ev3dev2.sensor.lego import GyroSensor, ColorSensor
";

/// Prefix of every generated program filename.
const PROGRAM_FILE_PREFIX: &str = "program_";

/// Extension of every generated program filename.
const PROGRAM_FILE_SUFFIX: &str = ".py";

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// Errors raised while allocating the output program file.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("Cannot scan the output directory: {0}")]
    OutputDirUnreadable(#[from] std::io::Error),
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Renders compiled motion segments into the target motion program.
pub struct ProgramEmitter<'a> {
    bindings: &'a PortBindings,
    pid: &'a PidParams,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl<'a> ProgramEmitter<'a> {
    /// Create a new emitter borrowing the bindings and PID configuration.
    pub fn new(bindings: &'a PortBindings, pid: &'a PidParams) -> Self {
        Self { bindings, pid }
    }

    /// The variable name of a motor on the given output port.
    fn motor_name(port: char) -> String {
        format!("motor_{}", port.to_ascii_lowercase())
    }

    /// Lower the compiled segments into the emission instruction list.
    pub fn build(&self, segments: &[MotionSegment]) -> Vec<Instruction> {
        let mut instructions = Vec::new();

        // Declarations, drive motors first, in scan order throughout
        for port in self.bindings.drive_ports.iter() {
            instructions.push(Instruction::DeclareMotor {
                name: Self::motor_name(*port),
                large: true,
                port: *port,
            });
        }
        for port in self.bindings.aux_ports.iter() {
            instructions.push(Instruction::DeclareMotor {
                name: Self::motor_name(*port),
                large: false,
                port: *port,
            });
        }
        instructions.push(Instruction::DeclareSensor {
            name: "gyro".to_string(),
            gyro: true,
            port: self.bindings.gyro_port,
        });
        for (i, port) in self.bindings.color_ports.iter().enumerate() {
            instructions.push(Instruction::DeclareSensor {
                name: format!("color_{}", i + 1),
                gyro: false,
                port: *port,
            });
        }

        // The gyro zero point is the robot's starting heading
        instructions.push(Instruction::ResetGyro);

        instructions.push(Instruction::DefineDriveRoutine);
        instructions.push(Instruction::DefineTurnRoutine);

        for (i, segment) in segments.iter().enumerate() {
            instructions.push(Instruction::Comment(format!(
                "segment {}: {}",
                i, segment.action
            )));

            match segment.action {
                MovementAction::None => (),
                MovementAction::Forward => instructions.push(Instruction::Drive {
                    degrees: segment.distance_degrees,
                    speed_dps: segment.speed_dps,
                }),
                MovementAction::Backward => instructions.push(Instruction::Drive {
                    degrees: -segment.distance_degrees,
                    speed_dps: segment.speed_dps,
                }),
                MovementAction::Rotate => instructions.push(Instruction::Turn {
                    heading_deg: segment.heading_deg.round() as i64,
                }),
            }

            // Auxiliary dispatch, blocking in series mode only
            for (aux_index, port) in self.bindings.aux_ports.iter().enumerate() {
                let degrees = segment.aux_degrees[aux_index];
                if degrees == 0 {
                    continue;
                }

                instructions.push(Instruction::DispatchAux {
                    name: Self::motor_name(*port),
                    degrees,
                    speed_dps: segment.speed_dps,
                    blocking: segment.aux_mode == AuxMode::Series,
                });
            }
        }

        instructions
    }

    /// Render the instruction list into the program text.
    pub fn render(&self, instructions: &[Instruction]) -> String {
        let mut out = String::from(PROGRAM_HEADER);

        for instruction in instructions {
            // Routine definitions and segment comments open a new block
            match instruction {
                Instruction::DefineDriveRoutine
                | Instruction::DefineTurnRoutine
                | Instruction::Comment(_) => out.push('\n'),
                _ => (),
            }

            out.push_str(&self.render_instruction(instruction));
            out.push('\n');
        }

        out
    }

    /// Compile segments straight to program text.
    pub fn emit(&self, segments: &[MotionSegment]) -> String {
        self.render(&self.build(segments))
    }

    /// Render a single instruction.
    fn render_instruction(&self, instruction: &Instruction) -> String {
        let left = Self::motor_name(self.bindings.drive_ports[0]);
        let right = Self::motor_name(self.bindings.drive_ports[1]);

        match instruction {
            Instruction::DeclareMotor { name, large, port } => {
                let class = if *large { "LargeMotor" } else { "MediumMotor" };
                format!("{} = {}(OUTPUT_{})", name, class, port)
            }
            Instruction::DeclareSensor { name, gyro, port } => {
                let class = if *gyro { "GyroSensor" } else { "ColorSensor" };
                format!("{} = {}(INPUT_{})", name, class, port)
            }
            Instruction::ResetGyro => "gyro.reset()".to_string(),
            Instruction::DefineDriveRoutine => routines::drive_routine(
                &left,
                &right,
                self.pid.k_p,
                self.pid.accepted_error,
            ),
            Instruction::DefineTurnRoutine => routines::turn_routine(
                &left,
                &right,
                "gyro",
                self.pid.k_p,
                self.pid.accepted_error,
            ),
            Instruction::Drive { degrees, speed_dps } => {
                format!("move_with_correction({}, {})", speed_dps, degrees)
            }
            Instruction::Turn { heading_deg } => format!("turn_to_heading({})", heading_deg),
            Instruction::DispatchAux {
                name,
                degrees,
                speed_dps,
                blocking,
            } => format!(
                "{}.on_for_degrees(speed=SpeedDPS({}), degrees={}, block={})",
                name,
                speed_dps,
                degrees,
                if *blocking { "True" } else { "False" }
            ),
            Instruction::Comment(text) => format!("# {}", text),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Allocate the path of the next program file in the output directory.
///
/// The filename's numeric suffix is one greater than the highest suffix
/// already present, starting at 1 for an empty (or missing) directory.
/// Filenames not matching `program_<n>.py` are ignored.
pub fn next_program_path(output_dir: &Path) -> Result<PathBuf, EmitError> {
    let mut highest = 0u32;

    if output_dir.is_dir() {
        for entry in fs::read_dir(output_dir)? {
            let entry = entry?;
            let file_name = entry.file_name();

            let index = file_name
                .to_str()
                .and_then(|name| name.strip_prefix(PROGRAM_FILE_PREFIX))
                .and_then(|name| name.strip_suffix(PROGRAM_FILE_SUFFIX))
                .and_then(|index| index.parse::<u32>().ok());

            if let Some(index) = index {
                highest = highest.max(index);
            }
        }
    }

    Ok(output_dir.join(format!(
        "{}{}{}",
        PROGRAM_FILE_PREFIX,
        highest + 1,
        PROGRAM_FILE_SUFFIX
    )))
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
