//! Movement-direction inference.
//!
//! Decides, for each waypoint, whether the robot rotates in place, drives
//! forward or drives backward to reach it from the previous waypoint.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector2;

use super::{MovementAction, Waypoint};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Headings within this tolerance are treated as equal, absorbing the
/// discretisation noise of user-drawn rotations.
pub const HEADING_TOLERANCE_DEG: f64 = 2.0;

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Infer the movement action for every waypoint in the sequence.
///
/// Waypoint 0 is always `None`. A heading change beyond
/// [`HEADING_TOLERANCE_DEG`] is a `Rotate`. Otherwise the anchors of both
/// waypoints are projected onto the previous waypoint's facing direction
/// and compared: an increasing along-heading coordinate is a `Forward`,
/// a decreasing one a `Backward`. Ties fall to `Forward`.
pub fn determine_robot_movement(waypoints: &[Waypoint]) -> Vec<MovementAction> {
    let mut actions = Vec::with_capacity(waypoints.len());

    for (i, wp) in waypoints.iter().enumerate() {
        if i == 0 {
            actions.push(MovementAction::None);
            continue;
        }

        let prev = &waypoints[i - 1];

        if (wp.heading_deg - prev.heading_deg).abs() > HEADING_TOLERANCE_DEG {
            actions.push(MovementAction::Rotate);
            continue;
        }

        // Near-equal headings: disambiguate forward/backward in the
        // previous waypoint's facing frame
        let facing_rad = forward_facing_angle(prev).to_radians();
        let along_prev = along_heading(prev.anchor(), facing_rad);
        let along_curr = along_heading(wp.anchor(), facing_rad);

        if along_curr >= along_prev {
            actions.push(MovementAction::Forward);
        } else {
            actions.push(MovementAction::Backward);
        }
    }

    actions
}

/// The angle the chassis points along, in degrees, derived from the
/// displacement between corners 0 and 1 of the bounding box.
///
/// A purely vertical edge falls back to `+90`/`-90` by the sign of the
/// vertical displacement, avoiding the division by zero inside the
/// arctangent.
pub fn forward_facing_angle(waypoint: &Waypoint) -> f64 {
    let displacement = waypoint.corners[1] - waypoint.corners[0];

    if displacement[0] == 0.0 {
        if displacement[1] >= 0.0 {
            90.0
        } else {
            -90.0
        }
    } else {
        displacement[1].atan2(displacement[0]).to_degrees()
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// The coordinate of `point` along the facing direction.
fn along_heading(point: Vector2<f64>, facing_rad: f64) -> f64 {
    point[0] * facing_rad.sin() + point[1] * facing_rad.cos()
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
