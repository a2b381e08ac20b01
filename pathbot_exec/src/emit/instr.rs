//! Typed emission instructions.
//!
//! The emitter first lowers the compiled segments into this intermediate
//! list, then renders the list in one deterministic pass. Tests inspect
//! the instructions directly instead of matching program text.

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// A single instruction of the emitted program.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Declare a motor variable bound to an output port.
    DeclareMotor {
        name: String,
        large: bool,
        port: char,
    },

    /// Declare a sensor variable bound to an input port.
    DeclareSensor { name: String, gyro: bool, port: u8 },

    /// Zero the gyro reading before the first segment runs.
    ResetGyro,

    /// Define the corrected-drive routine.
    DefineDriveRoutine,

    /// Define the in-place turn routine.
    DefineTurnRoutine,

    /// Drive both motors the given shaft distance with correction.
    Drive { degrees: i64, speed_dps: i32 },

    /// Turn in place to the absolute heading.
    Turn { heading_deg: i64 },

    /// Command an auxiliary motor, optionally waiting for completion.
    DispatchAux {
        name: String,
        degrees: i32,
        speed_dps: i32,
        blocking: bool,
    },

    /// A section comment.
    Comment(String),
}
