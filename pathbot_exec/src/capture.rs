//! # Waypoint capture interface
//!
//! The interactive capture tool is an external collaborator. The compiler
//! only requires something that can yield a finite, restartable waypoint
//! sequence on demand, which the [`WaypointSource`] trait abstracts. The
//! capture tool hands its result over as a JSON file, read here by
//! [`JsonCapture`].

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal
use crate::path_compile::Waypoint;

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// Errors raised while capturing the waypoint sequence.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Cannot read the waypoint file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Cannot parse the waypoint file: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("The capture produced no waypoints")]
    Empty,
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A source of captured waypoints.
///
/// Implementations must be restartable: every call produces the complete
/// ordered sequence from the start.
pub trait WaypointSource {
    /// Produce the complete ordered waypoint sequence.
    fn capture(&mut self) -> Result<Vec<Waypoint>, CaptureError>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A waypoint source backed by the capture tool's JSON handoff file.
pub struct JsonCapture {
    path: PathBuf,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl JsonCapture {
    /// Create a new source reading from the given handoff file.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl WaypointSource for JsonCapture {
    fn capture(&mut self) -> Result<Vec<Waypoint>, CaptureError> {
        let contents = fs::read_to_string(&self.path)?;
        let waypoints: Vec<Waypoint> = serde_json::from_str(&contents)?;

        if waypoints.is_empty() {
            return Err(CaptureError::Empty);
        }

        Ok(waypoints)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::path_compile::AuxMode;
    use nalgebra::Vector2;

    fn sample_waypoints() -> Vec<Waypoint> {
        vec![
            Waypoint {
                corners: [
                    Vector2::new(10.0, 685.0),
                    Vector2::new(147.0, 685.0),
                    Vector2::new(147.0, 805.0),
                    Vector2::new(10.0, 805.0),
                ],
                heading_deg: 0.0,
                aux_degrees: [0, 0],
                aux_mode: AuxMode::Parallel,
                speed_dps: 500,
            },
            Waypoint {
                corners: [
                    Vector2::new(10.0, 430.0),
                    Vector2::new(147.0, 430.0),
                    Vector2::new(147.0, 550.0),
                    Vector2::new(10.0, 550.0),
                ],
                heading_deg: 0.0,
                aux_degrees: [-100, 0],
                aux_mode: AuxMode::Series,
                speed_dps: 300,
            },
        ]
    }

    #[test]
    fn test_json_capture_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "pathbot_capture_test_{}.json",
            std::process::id()
        ));
        let expected = sample_waypoints();
        fs::write(&path, serde_json::to_string(&expected).unwrap()).unwrap();

        let mut source = JsonCapture::new(&path);

        let waypoints = source.capture().unwrap();
        assert_eq!(waypoints.len(), 2);
        assert_eq!(waypoints[0].anchor(), expected[0].anchor());
        assert_eq!(waypoints[1].aux_degrees, [-100, 0]);
        assert_eq!(waypoints[1].aux_mode, AuxMode::Series);

        // Restartable: a second capture yields the sequence again
        let again = source.capture().unwrap();
        assert_eq!(again.len(), 2);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_empty_capture_is_an_error() {
        let path = std::env::temp_dir().join(format!(
            "pathbot_capture_test_{}_empty.json",
            std::process::id()
        ));
        fs::write(&path, "[]").unwrap();

        let result = JsonCapture::new(&path).capture();
        assert!(matches!(result, Err(CaptureError::Empty)));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = JsonCapture::new("no/such/waypoints.json").capture();
        assert!(matches!(result, Err(CaptureError::FileReadError(_))));
    }
}
