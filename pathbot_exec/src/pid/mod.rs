//! # PID control primitives
//!
//! This module provides the single-step PID compute shared by the two
//! execution strategies, and the strategies themselves:
//!
//! - [`PidController::run_fixed`] runs the step a fixed number of times
//!   regardless of convergence, for bounded estimation.
//! - [`PidController::run_to_convergence`] repeats the step until the error
//!   falls inside the dead-band, with no iteration cap. This is the loop
//!   the emitted turn routine encodes; it exists here so its semantics can
//!   be exercised against a simulated plant.
//!
//! Two behaviours are preserved deliberately and must not be "fixed":
//! the error sum accumulates even inside the dead-band, and the derivative
//! term uses the previous error value directly rather than an error rate.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use crate::params::PidParams;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A PID controller.
///
/// State lives for a single control invocation: initialise, tick, discard.
/// Nothing persists across invocations.
#[derive(Debug, Clone)]
pub struct PidController {
    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Derivative gain
    k_d: f64,

    /// Errors with a magnitude below this value produce a zero output.
    accepted_error: f64,

    /// The running error sum.
    sum_of_errors: f64,

    /// The error of the last step which produced a non-zero output.
    last_error: f64,
}

/// The result of executing one of the PID run strategies.
#[derive(Debug, Clone, PartialEq)]
pub struct PidRun {
    /// The output of the final step.
    pub output: f64,

    /// The error sum after the final step.
    pub sum_of_errors: f64,

    /// The last error after the final step.
    pub last_error: f64,

    /// The number of steps performed.
    pub iterations: usize,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl PidController {
    /// Create a new controller with zeroed state.
    pub fn new(params: &PidParams) -> Self {
        Self::with_state(params, 0.0, 0.0)
    }

    /// Create a new controller with a preset error sum and last error.
    pub fn with_state(params: &PidParams, sum_of_errors: f64, last_error: f64) -> Self {
        Self {
            k_p: params.k_p,
            k_i: params.k_i,
            k_d: params.k_d,
            accepted_error: params.accepted_error,
            sum_of_errors,
            last_error,
        }
    }

    /// The running error sum.
    pub fn sum_of_errors(&self) -> f64 {
        self.sum_of_errors
    }

    /// The last error which produced a non-zero output.
    pub fn last_error(&self) -> f64 {
        self.last_error
    }

    /// Compute a single PID step for the given process variable.
    ///
    /// The error sum accumulates unconditionally, even when the error is
    /// inside the dead-band. Inside the dead-band the output is exactly
    /// zero and `last_error` is left untouched.
    pub fn step(&mut self, set_point: f64, process_variable: f64) -> f64 {
        let error = set_point - process_variable;
        self.sum_of_errors += error;

        if error.abs() < self.accepted_error {
            return 0.0;
        }

        // The derivative term is the previous error value, not a rate.
        let output =
            self.k_p * error + self.k_i * self.sum_of_errors + self.k_d * self.last_error;

        self.last_error = error;

        output
    }

    /// Run the step exactly `iterations` times, regardless of convergence.
    ///
    /// The process variable is sampled from `read` once per step. Used for
    /// bounded estimation, not closed-loop control.
    pub fn run_fixed<F>(&mut self, set_point: f64, mut read: F, iterations: usize) -> PidRun
    where
        F: FnMut() -> f64,
    {
        let mut output = 0.0;
        let mut count = 0;

        for _ in 0..iterations {
            output = self.step(set_point, read());
            count += 1;
        }

        PidRun {
            output,
            sum_of_errors: self.sum_of_errors,
            last_error: self.last_error,
            iterations: count,
        }
    }

    /// Run the step until the dead-band condition holds.
    ///
    /// `read` receives the previous step's output (zero on the first tick)
    /// and returns the new process variable. There is no iteration cap and
    /// no timeout: termination depends entirely on the process variable
    /// reaching the set point.
    pub fn run_to_convergence<F>(&mut self, set_point: f64, mut read: F) -> PidRun
    where
        F: FnMut(f64) -> f64,
    {
        let mut output = 0.0;
        let mut count = 0;

        loop {
            let process_variable = read(output);
            let error = set_point - process_variable;

            output = self.step(set_point, process_variable);
            count += 1;

            if error.abs() < self.accepted_error {
                return PidRun {
                    output,
                    sum_of_errors: self.sum_of_errors,
                    last_error: self.last_error,
                    iterations: count,
                };
            }
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn unit_gains(accepted_error: f64) -> PidParams {
        PidParams {
            k_p: 1.0,
            k_i: 1.0,
            k_d: 1.0,
            accepted_error,
        }
    }

    #[test]
    fn test_step_fixture() {
        let mut ctrl = PidController::new(&unit_gains(0.0));

        let output = ctrl.step(0.0, 20.0);

        assert_eq!(output, -40.0);
        assert_eq!(ctrl.sum_of_errors(), -20.0);
        assert_eq!(ctrl.last_error(), -20.0);
    }

    #[test]
    fn test_step_zero_error() {
        let mut ctrl = PidController::new(&unit_gains(0.0));

        let output = ctrl.step(0.0, 0.0);

        // With a zero dead-band the zero error is not inside the band, the
        // output is still exactly zero and the state still accumulates it.
        assert_eq!(output, 0.0);
        assert_eq!(ctrl.sum_of_errors(), 0.0);
        assert_eq!(ctrl.last_error(), 0.0);
    }

    #[test]
    fn test_dead_band_accumulates_but_keeps_last_error() {
        let mut ctrl = PidController::with_state(&unit_gains(5.0), 3.0, 7.0);

        let output = ctrl.step(0.0, 2.0);

        assert_eq!(output, 0.0);
        // Error of -2 is accumulated even inside the dead-band
        assert_eq!(ctrl.sum_of_errors(), 1.0);
        // but the last error is not updated
        assert_eq!(ctrl.last_error(), 7.0);
    }

    #[test]
    fn test_run_fixed() {
        let mut ctrl = PidController::new(&unit_gains(0.0));

        let run = ctrl.run_fixed(0.0, || 20.0, 3);

        // Each step accumulates -20, the derivative term lags one step
        assert_eq!(run.output, -100.0);
        assert_eq!(run.sum_of_errors, -60.0);
        assert_eq!(run.last_error, -20.0);
        assert_eq!(run.iterations, 3);
    }

    #[test]
    fn test_run_fixed_zero_iterations() {
        let mut ctrl = PidController::new(&unit_gains(0.0));

        let run = ctrl.run_fixed(0.0, || 20.0, 0);

        assert_eq!(run.output, 0.0);
        assert_eq!(run.iterations, 0);
    }

    #[test]
    fn test_run_to_convergence() {
        let mut ctrl = PidController::new(&unit_gains(1.0));

        // A plant that closes on the set point by 25 per tick
        let mut plant_value = -25.0;
        let run = ctrl.run_to_convergence(100.0, |_| {
            plant_value += 25.0;
            plant_value
        });

        // Reads 0, 25, 50, 75, 100 and converges on the last
        assert_eq!(run.iterations, 5);
        assert_eq!(run.output, 0.0);
    }
}
