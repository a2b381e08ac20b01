//! Main path compiler executable entry point.
//!
//! # Architecture
//!
//! The execution is a single batch pass:
//!
//!     - Initialise the session and logging
//!     - Load the parameters
//!     - Build the unit converter and port bindings (fatal on any
//!       precondition failure, before anything is written)
//!     - Capture the waypoint sequence from the handoff file
//!     - Compile the waypoints into motion segments
//!     - Emit the motion program and write it to the next sequence-numbered
//!       file in the output directory

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::info;
use std::path::Path;

// Internal
use pathbot_lib::{
    capture::{JsonCapture, WaypointSource},
    convert::UnitConverter,
    emit::{next_program_path, ProgramEmitter},
    params::PathbotParams,
    path_compile::PathCompiler,
    ports::PortBindings,
};
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Parameter file used when none is given on the command line.
const DEFAULT_PARAMS_PATH: &str = "params/pathbot.toml";

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    color_eyre::install()?;

    // Initialise session
    let session =
        Session::new("pathbot_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("PathBot Compiler Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let params_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from(DEFAULT_PARAMS_PATH));

    let params: PathbotParams =
        util::params::load(&params_path).wrap_err("Could not load the parameters")?;

    info!("Parameters loaded from {:?}", params_path);

    // ---- BUILD COMPONENTS ----

    let converter =
        UnitConverter::from_params(&params).wrap_err("Could not build the unit converter")?;

    let bindings =
        PortBindings::from_params(&params).wrap_err("Could not build the port bindings")?;

    info!(
        "Drive motors on outputs {:?}, auxiliary motors on {:?}",
        bindings.drive_ports, bindings.aux_ports
    );
    info!(
        "Gyro on input {}, color sensors on {:?}",
        bindings.gyro_port, bindings.color_ports
    );

    // ---- CAPTURE ----

    let waypoints = JsonCapture::new(&params.waypoints_path)
        .capture()
        .wrap_err("Could not capture the waypoint sequence")?;

    info!("Captured {} waypoints", waypoints.len());

    // ---- COMPILE AND EMIT ----

    let segments = PathCompiler::new(&converter).compile(&waypoints);

    let program = ProgramEmitter::new(&bindings, &params.pid).emit(&segments);

    std::fs::create_dir_all(&params.output_dir)
        .wrap_err("Could not create the output directory")?;

    let program_path = next_program_path(Path::new(&params.output_dir))
        .wrap_err("Could not allocate the next program file")?;

    std::fs::write(&program_path, program).wrap_err("Could not write the program file")?;

    info!("Motion program written to {:?}", program_path);

    Ok(())
}
