//! # Path compilation module
//!
//! This module turns the ordered waypoint sequence produced by the capture
//! collaborator into an ordered sequence of [`MotionSegment`]s: one per
//! waypoint, each describing the move *into* that waypoint from the
//! previous one. Segment 0 always carries the `None` action since there is
//! no prior pose to compare against.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod infer;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;

// Internal
pub use infer::{determine_robot_movement, forward_facing_angle, HEADING_TOLERANCE_DEG};

use crate::convert::UnitConverter;

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// The movement performed to reach a waypoint from the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementAction {
    /// No movement, the waypoint opens the path.
    None,

    /// Drive along the current heading.
    Forward,

    /// Drive against the current heading.
    Backward,

    /// Turn in place to the waypoint's heading.
    Rotate,
}

/// Dispatch mode for the auxiliary motors at a waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuxMode {
    /// Wait for the auxiliary motors to finish before the next segment.
    #[serde(rename = "S")]
    Series,

    /// Fire the auxiliary motors and continue immediately.
    #[serde(rename = "P")]
    Parallel,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single user-pinned robot pose on the calibration image.
///
/// Waypoints are immutable once captured and their capture order is
/// semantically significant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Waypoint {
    /// The four corners of the robot's bounding box in pixel space.
    /// Corner 0 is the anchor the path distances are measured between.
    pub corners: [Vector2<f64>; 4],

    /// Heading at this pose, in degrees.
    pub heading_deg: f64,

    /// Target offsets for the two auxiliary motors, in motor degrees.
    pub aux_degrees: [i32; 2],

    /// Dispatch mode for the auxiliary motors at this waypoint.
    pub aux_mode: AuxMode,

    /// Commanded drive speed in degrees per second.
    pub speed_dps: i32,
}

/// The move into waypoint `i` from waypoint `i - 1`, in units the emitted
/// program works in.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionSegment {
    /// Anchor x position truncated to whole pixels.
    pub x_px: i32,

    /// Anchor y position truncated to whole pixels.
    pub y_px: i32,

    /// Heading at the target waypoint, degrees.
    pub heading_deg: f64,

    /// Signed heading change from the previous waypoint, degrees. Zero for
    /// segment 0.
    pub heading_delta_deg: f64,

    /// Travel distance in motor shaft degrees. Zero for segment 0.
    pub distance_degrees: i64,

    /// The movement performed over this segment.
    pub action: MovementAction,

    /// Auxiliary motor offsets carried over from the waypoint.
    pub aux_degrees: [i32; 2],

    /// Auxiliary dispatch mode carried over from the waypoint.
    pub aux_mode: AuxMode,

    /// Commanded drive speed in degrees per second.
    pub speed_dps: i32,
}

/// Compiles ordered waypoints into ordered motion segments.
pub struct PathCompiler<'a> {
    converter: &'a UnitConverter,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl Waypoint {
    /// The anchor corner the path distances are measured between.
    pub fn anchor(&self) -> Vector2<f64> {
        self.corners[0]
    }
}

impl fmt::Display for MovementAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            MovementAction::None => "none",
            MovementAction::Forward => "forward",
            MovementAction::Backward => "backward",
            MovementAction::Rotate => "rotate",
        };
        write!(f, "{}", name)
    }
}

impl<'a> PathCompiler<'a> {
    /// Create a new compiler borrowing the unit converter.
    pub fn new(converter: &'a UnitConverter) -> Self {
        Self { converter }
    }

    /// Compile the waypoint sequence into motion segments.
    ///
    /// One segment is produced per waypoint. Segment 0 carries zero
    /// distance, zero heading delta and the `None` action.
    pub fn compile(&self, waypoints: &[Waypoint]) -> Vec<MotionSegment> {
        let actions = determine_robot_movement(waypoints);

        waypoints
            .iter()
            .enumerate()
            .map(|(i, wp)| {
                let (distance_degrees, heading_delta_deg) = match i {
                    0 => (0, 0.0),
                    _ => {
                        let prev = &waypoints[i - 1];
                        let distance_px = (wp.anchor() - prev.anchor()).norm();
                        (
                            self.converter.pixel_distance_to_degrees(distance_px),
                            wp.heading_deg - prev.heading_deg,
                        )
                    }
                };

                MotionSegment {
                    x_px: wp.anchor()[0] as i32,
                    y_px: wp.anchor()[1] as i32,
                    heading_deg: wp.heading_deg,
                    heading_delta_deg,
                    distance_degrees,
                    action: actions[i],
                    aux_degrees: wp.aux_degrees,
                    aux_mode: wp.aux_mode,
                    speed_dps: wp.speed_dps,
                }
            })
            .collect()
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    /// An axis-aligned waypoint whose bounding box footprint points along
    /// the captured heading.
    pub(super) fn waypoint(corners: [[f64; 2]; 4], heading_deg: f64) -> Waypoint {
        Waypoint {
            corners: [
                Vector2::new(corners[0][0], corners[0][1]),
                Vector2::new(corners[1][0], corners[1][1]),
                Vector2::new(corners[2][0], corners[2][1]),
                Vector2::new(corners[3][0], corners[3][1]),
            ],
            heading_deg,
            aux_degrees: [0, 0],
            aux_mode: AuxMode::Parallel,
            speed_dps: 300,
        }
    }

    /// The six-pose reference capture: two straight drives, two in-place
    /// turns, forward and backward travel.
    pub(super) fn six_waypoint_fixture() -> Vec<Waypoint> {
        let mut waypoints = vec![
            waypoint(
                [[10.0, 685.0], [147.0, 685.0], [147.0, 805.0], [10.0, 805.0]],
                0.0,
            ),
            waypoint(
                [[10.0, 430.0], [147.0, 430.0], [147.0, 550.0], [10.0, 550.0]],
                0.0,
            ),
            waypoint(
                [
                    [138.5, 421.5],
                    [138.5, 558.5],
                    [18.5, 558.5],
                    [18.5, 421.5],
                ],
                90.0,
            ),
            waypoint(
                [
                    [348.5, 421.5],
                    [348.5, 558.5],
                    [228.5, 558.5],
                    [228.5, 421.5],
                ],
                90.0,
            ),
            waypoint(
                [
                    [330.94818224, 570.56303013],
                    [203.04766381, 521.46662105],
                    [246.05181776, 409.43696987],
                    [373.95233619, 458.53337895],
                ],
                201.0,
            ),
            waypoint(
                [
                    [250.94818224, 780.56303013],
                    [123.04766381, 731.46662105],
                    [166.05181776, 619.43696987],
                    [293.95233619, 668.53337895],
                ],
                201.0,
            ),
        ];

        waypoints[1].aux_degrees = [-100, 0];
        waypoints[3].aux_degrees = [110, 0];
        waypoints[3].aux_mode = AuxMode::Series;
        waypoints[4].aux_mode = AuxMode::Series;
        waypoints[5].aux_mode = AuxMode::Series;
        waypoints[0].speed_dps = 500;
        waypoints[3].speed_dps = 500;

        waypoints
    }

    fn converter() -> UnitConverter {
        UnitConverter::new((1461, 810), 1143.0, 2020.0, 56.0).unwrap()
    }

    #[test]
    fn test_compile_six_waypoint_fixture() {
        let conv = converter();
        let segments = PathCompiler::new(&conv).compile(&six_waypoint_fixture());

        let actions: Vec<MovementAction> = segments.iter().map(|s| s.action).collect();
        assert_eq!(
            actions,
            vec![
                MovementAction::None,
                MovementAction::Backward,
                MovementAction::Rotate,
                MovementAction::Forward,
                MovementAction::Rotate,
                MovementAction::Backward,
            ]
        );

        let deltas: Vec<f64> = segments.iter().map(|s| s.heading_delta_deg).collect();
        assert_eq!(deltas, vec![0.0, 0.0, 90.0, 0.0, 111.0, 0.0]);

        let x: Vec<i32> = segments.iter().map(|s| s.x_px).collect();
        let y: Vec<i32> = segments.iter().map(|s| s.y_px).collect();
        assert_eq!(x, vec![10, 10, 138, 348, 330, 250]);
        assert_eq!(y, vec![685, 430, 421, 421, 570, 780]);
    }

    #[test]
    fn test_segment_zero_invariant() {
        let conv = converter();
        let segments = PathCompiler::new(&conv).compile(&six_waypoint_fixture());

        assert_eq!(segments[0].action, MovementAction::None);
        assert_eq!(segments[0].distance_degrees, 0);
        assert_eq!(segments[0].heading_delta_deg, 0.0);
    }

    #[test]
    fn test_segment_distances() {
        let conv = converter();
        let waypoints = six_waypoint_fixture();
        let segments = PathCompiler::new(&conv).compile(&waypoints);

        // The anchors of the first pair are 255 px apart on the y axis
        assert_eq!(
            segments[1].distance_degrees,
            conv.pixel_distance_to_degrees(255.0)
        );
        assert!(segments[1].distance_degrees > 0);

        // Every non-head segment of this fixture moves the anchor
        for segment in segments.iter().skip(1) {
            assert!(segment.distance_degrees > 0);
        }
    }

    #[test]
    fn test_aux_carried_over() {
        let conv = converter();
        let segments = PathCompiler::new(&conv).compile(&six_waypoint_fixture());

        assert_eq!(segments[1].aux_degrees, [-100, 0]);
        assert_eq!(segments[1].aux_mode, AuxMode::Parallel);
        assert_eq!(segments[3].aux_degrees, [110, 0]);
        assert_eq!(segments[3].aux_mode, AuxMode::Series);
        assert_eq!(segments[3].speed_dps, 500);
    }
}
