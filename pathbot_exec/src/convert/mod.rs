//! # Unit conversion module
//!
//! This module provides the conversions between the unit systems the
//! compiler deals in: studs (LEGO units), millimeters, calibration-image
//! pixels and motor shaft degrees.
//!
//! The pixel scales are derived from the calibration image's pixel
//! dimensions and the physical mat dimensions. Both the width and height
//! ratios are averaged so a slightly non-square pixel calibration does not
//! bias one axis.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal
use crate::params::PathbotParams;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Fixed linear scale between studs and millimeters.
pub const MM_PER_STUD: f64 = 8.0;

/// Pi approximation used by the shaft-degree scale. The emitted distances
/// are calibrated against this value, not against `std::f64::consts::PI`.
const SHAFT_SCALE_PI: f64 = 3.14;

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// Errors raised while building the unit converter. These are precondition
/// failures: no compilation output may be produced once one is raised.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("No calibration image found at {0:?}")]
    ImageNotFound(PathBuf),

    #[error("Cannot read the calibration image dimensions: {0}")]
    ImageUnreadable(image::ImageError),

    #[error("Physical dimension '{name}' must be positive, got {value}")]
    NonPositiveDimension { name: &'static str, value: f64 },
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Converter between studs, millimeters, pixels and motor shaft degrees.
///
/// Built once from the calibration image dimensions and the physical
/// parameters, then shared by reference.
#[derive(Debug, Clone)]
pub struct UnitConverter {
    /// Calibration image width in pixels.
    image_width_px: f64,

    /// Calibration image height in pixels.
    image_height_px: f64,

    /// Mat length along the x axis (image width direction), millimeters.
    mat_length_x_mm: f64,

    /// Mat width along the y axis (image height direction), millimeters.
    mat_width_y_mm: f64,

    /// Drive wheel diameter, millimeters.
    wheel_diameter_mm: f64,
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Convert studs into millimeters.
pub fn stud_to_mm(studs: f64) -> f64 {
    studs * MM_PER_STUD
}

/// Convert millimeters into whole studs, truncating towards zero.
pub fn mm_to_stud(mm: f64) -> i64 {
    (mm / MM_PER_STUD) as i64
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl UnitConverter {
    /// Create a new converter from known calibration values.
    ///
    /// `image_dims` is `(width, height)` in pixels. All physical dimensions
    /// must be positive.
    pub fn new(
        image_dims: (u32, u32),
        mat_length_x_mm: f64,
        mat_width_y_mm: f64,
        wheel_diameter_mm: f64,
    ) -> Result<Self, ConvertError> {
        let dims = [
            ("mat.length_x_mm", mat_length_x_mm),
            ("mat.width_y_mm", mat_width_y_mm),
            ("robot.wheel_diameter_mm", wheel_diameter_mm),
        ];
        for &(name, value) in dims.iter() {
            if value <= 0.0 {
                return Err(ConvertError::NonPositiveDimension { name, value });
            }
        }

        Ok(Self {
            image_width_px: image_dims.0 as f64,
            image_height_px: image_dims.1 as f64,
            mat_length_x_mm,
            mat_width_y_mm,
            wheel_diameter_mm,
        })
    }

    /// Create a new converter by reading the calibration image's dimensions
    /// from the given path.
    pub fn from_calibration_image<P: AsRef<Path>>(
        image_path: P,
        mat_length_x_mm: f64,
        mat_width_y_mm: f64,
        wheel_diameter_mm: f64,
    ) -> Result<Self, ConvertError> {
        let path = image_path.as_ref();

        if !path.is_file() {
            return Err(ConvertError::ImageNotFound(path.to_path_buf()));
        }

        // Only the dimensions are needed, the pixel data is never decoded.
        let dims = image::image_dimensions(path).map_err(ConvertError::ImageUnreadable)?;

        Self::new(dims, mat_length_x_mm, mat_width_y_mm, wheel_diameter_mm)
    }

    /// Create a new converter from the loaded parameters.
    pub fn from_params(params: &PathbotParams) -> Result<Self, ConvertError> {
        Self::from_calibration_image(
            &params.mat_image_path,
            params.mat.length_x_mm,
            params.mat.width_y_mm,
            params.robot.wheel_diameter_mm,
        )
    }

    /// The pixels-per-millimeter scale, averaged over both image axes.
    fn pixels_per_mm(&self) -> f64 {
        let x_ratio = self.image_width_px / self.mat_length_x_mm;
        let y_ratio = self.image_height_px / self.mat_width_y_mm;
        (x_ratio + y_ratio) / 2.0
    }

    /// Convert millimeters into pixels.
    pub fn mm_to_pixel(&self, mm: f64) -> f64 {
        mm * self.pixels_per_mm()
    }

    /// Convert pixels into millimeters.
    ///
    /// Exact inverse of [`UnitConverter::mm_to_pixel`], so stud/pixel
    /// round trips hold to within integer rounding.
    pub fn pixel_to_mm(&self, pixels: f64) -> f64 {
        pixels / self.pixels_per_mm()
    }

    /// Convert studs into whole pixels, truncating towards zero.
    pub fn stud_to_pixel(&self, studs: f64) -> i64 {
        self.mm_to_pixel(stud_to_mm(studs)) as i64
    }

    /// Convert pixels into whole studs, truncating towards zero.
    pub fn pixel_to_stud(&self, pixels: f64) -> i64 {
        mm_to_stud(self.pixel_to_mm(pixels))
    }

    /// Convert a distance in pixels into motor shaft degrees, rounded to
    /// the nearest whole degree (the motor API accepts integer degrees
    /// only).
    pub fn pixel_distance_to_degrees(&self, distance_px: f64) -> i64 {
        // Both scales work in centimeters, matching the tuning of the
        // shaft-degree fixture.
        let image_scale = self.image_width_px / (self.mat_length_x_mm / 10.0);
        let wheel_scale = (self.wheel_diameter_mm / 10.0) * SHAFT_SCALE_PI / 360.0;

        ((distance_px / image_scale) / wheel_scale).round() as i64
    }

    /// Convert a list of pixel distances into motor shaft degrees.
    pub fn pixels_to_degrees(&self, distances_px: &[f64]) -> Vec<i64> {
        distances_px
            .iter()
            .map(|d| self.pixel_distance_to_degrees(*d))
            .collect()
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    /// 1461 x 810 px calibration image of a 1143 x 2020 mm mat.
    fn fll_converter() -> UnitConverter {
        UnitConverter::new((1461, 810), 1143.0, 2020.0, 56.0).unwrap()
    }

    #[test]
    fn test_stud_mm_scale() {
        assert_eq!(stud_to_mm(1.0), 8.0);
        assert_eq!(mm_to_stud(8.0), 1);
    }

    #[test]
    fn test_mm_to_pixel() {
        let conv = fll_converter();
        assert!((conv.mm_to_pixel(10.0) - 8.3960).abs() < 1e-3);
    }

    #[test]
    fn test_stud_to_pixel() {
        let conv = fll_converter();
        assert_eq!(conv.stud_to_pixel(1.0), 6);
    }

    #[test]
    fn test_stud_pixel_round_trip() {
        let conv = fll_converter();
        for studs in 0..=200 {
            let px = conv.stud_to_pixel(studs as f64);
            let back = conv.pixel_to_stud(px as f64);
            assert!(
                (back - studs).abs() <= 1,
                "round trip of {} studs gave {}",
                studs,
                back
            );
        }
    }

    #[test]
    fn test_pixels_to_degrees_fixture() {
        // 236 px wide image of a 236.2 cm long mat, 10 cm wheel
        let conv = UnitConverter::new((236, 100), 2362.0, 1000.0, 100.0).unwrap();
        assert_eq!(
            conv.pixels_to_degrees(&[100.0, 200.0, 300.0]),
            vec![1147, 2295, 3442]
        );
    }

    #[test]
    fn test_pixel_distance_monotonic() {
        let conv = fll_converter();
        let mut last = -1;
        for px in 0..500 {
            let degrees = conv.pixel_distance_to_degrees(px as f64);
            assert!(degrees >= last);
            last = degrees;
        }
    }

    #[test]
    fn test_non_positive_dimension() {
        let result = UnitConverter::new((236, 100), 0.0, 1000.0, 100.0);
        assert!(matches!(
            result,
            Err(ConvertError::NonPositiveDimension { name: "mat.length_x_mm", .. })
        ));
    }

    #[test]
    fn test_missing_image() {
        let result =
            UnitConverter::from_calibration_image("no/such/image.png", 2362.0, 1143.0, 56.0);
        assert!(matches!(result, Err(ConvertError::ImageNotFound(_))));
    }
}
