// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Server**: Catalog endpoint and request timeout
//! - **Viewer**: Model viewer pane size, camera and lighting

// ==========================================================================
// Server Defaults
// ==========================================================================

/// Catalog service used when neither CLI, environment nor config name one.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Default timeout for a single catalog request (in seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Minimum request timeout (in seconds).
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;

/// Maximum request timeout (in seconds).
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

// ==========================================================================
// Viewer Defaults
// ==========================================================================

/// Default height of an expanded model viewer (in logical pixels).
pub const DEFAULT_MODEL_VIEWER_HEIGHT: f32 = 320.0;

/// Minimum model viewer height.
pub const MIN_MODEL_VIEWER_HEIGHT: f32 = 160.0;

/// Maximum model viewer height.
pub const MAX_MODEL_VIEWER_HEIGHT: f32 = 1200.0;

/// Initial distance between the camera and the orbit target.
pub const DEFAULT_CAMERA_DISTANCE: f32 = 5.0;

/// Closest the camera may zoom.
pub const MIN_CAMERA_DISTANCE: f32 = 0.5;

/// Farthest the camera may zoom.
pub const MAX_CAMERA_DISTANCE: f32 = 50.0;

/// Vertical field of view (in degrees).
pub const CAMERA_FOV_DEGREES: f32 = 75.0;

/// Distance multiplier per wheel line.
pub const ZOOM_FACTOR_PER_LINE: f32 = 0.9;

/// Orbit rotation per dragged pixel (in radians).
pub const ORBIT_RADIANS_PER_PIXEL: f32 = 0.01;

/// Intensity of the uniform ambient light.
pub const AMBIENT_LIGHT_INTENSITY: f32 = 0.5;

/// Position of the single directional light; it points at the origin.
pub const DIRECTIONAL_LIGHT_POSITION: [f32; 3] = [2.0, 2.0, 2.0];

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_REQUEST_TIMEOUT_SECS > 0);
    assert!(DEFAULT_REQUEST_TIMEOUT_SECS >= MIN_REQUEST_TIMEOUT_SECS);
    assert!(DEFAULT_REQUEST_TIMEOUT_SECS <= MAX_REQUEST_TIMEOUT_SECS);

    assert!(MIN_MODEL_VIEWER_HEIGHT > 0.0);
    assert!(DEFAULT_MODEL_VIEWER_HEIGHT >= MIN_MODEL_VIEWER_HEIGHT);
    assert!(DEFAULT_MODEL_VIEWER_HEIGHT <= MAX_MODEL_VIEWER_HEIGHT);

    assert!(MIN_CAMERA_DISTANCE > 0.0);
    assert!(DEFAULT_CAMERA_DISTANCE >= MIN_CAMERA_DISTANCE);
    assert!(DEFAULT_CAMERA_DISTANCE <= MAX_CAMERA_DISTANCE);
    assert!(CAMERA_FOV_DEGREES > 0.0 && CAMERA_FOV_DEGREES < 180.0);
    assert!(ZOOM_FACTOR_PER_LINE > 0.0 && ZOOM_FACTOR_PER_LINE < 1.0);

    assert!(AMBIENT_LIGHT_INTENSITY >= 0.0 && AMBIENT_LIGHT_INTENSITY <= 1.0);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_defaults_are_valid() {
        assert_eq!(DEFAULT_SERVER_URL, "http://localhost:5000");
        assert_eq!(DEFAULT_REQUEST_TIMEOUT_SECS, 30);
    }

    #[test]
    fn viewer_defaults_match_reference_scene() {
        assert_eq!(DEFAULT_CAMERA_DISTANCE, 5.0);
        assert_eq!(CAMERA_FOV_DEGREES, 75.0);
        assert_eq!(AMBIENT_LIGHT_INTENSITY, 0.5);
        assert_eq!(DIRECTIONAL_LIGHT_POSITION, [2.0, 2.0, 2.0]);
    }
}
