//! Text of the motion routines embedded in every emitted program.

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// The corrected-drive routine.
///
/// Issues both drive motors the position command (awaiting only the
/// second), then polls both positions against the target and applies
/// proportional-only correction until both are inside the dead-band.
pub fn drive_routine(left: &str, right: &str, gain: f64, dead_band: f64) -> String {
    format!(
        "\
def move_with_correction(speed, degrees):
    {l}.reset()
    {r}.reset()
    {l}.on_for_degrees(speed=SpeedDPS(speed), degrees=degrees, brake=True, block=False)
    {r}.on_for_degrees(speed=SpeedDPS(speed), degrees=degrees, brake=True, block=True)
    error_l = degrees - {l}.position
    error_r = degrees - {r}.position
    while abs(error_l) > {band} or abs(error_r) > {band}:
        error_l = degrees - {l}.position
        error_r = degrees - {r}.position
        if abs(error_l) > {band}:
            {l}.on(SpeedDPS(error_l * {gain}))
        else:
            {l}.stop()
        if abs(error_r) > {band}:
            {r}.on(SpeedDPS(error_r * {gain}))
        else:
            {r}.stop()
    {l}.stop()
    {r}.stop()",
        l = left,
        r = right,
        gain = gain,
        band = dead_band
    )
}

/// The in-place turn routine.
///
/// Differentially drives the two motors with opposite-signed proportional
/// correction on the gyro heading error until the reading is inside the
/// dead-band. The loop is unbounded: no iteration cap and no timeout, its
/// termination depends on the gyro reaching the target.
pub fn turn_routine(left: &str, right: &str, gyro: &str, gain: f64, dead_band: f64) -> String {
    format!(
        "\
def turn_to_heading(target, reset_gyro=False):
    if reset_gyro:
        {g}.reset()
    error = target - {g}.angle
    while abs(error) > {band}:
        {l}.on(SpeedDPS(error * {gain}))
        {r}.on(SpeedDPS(-(error * {gain})))
        error = target - {g}.angle
    {l}.stop()
    {r}.stop()",
        l = left,
        r = right,
        g = gyro,
        gain = gain,
        band = dead_band
    )
}
