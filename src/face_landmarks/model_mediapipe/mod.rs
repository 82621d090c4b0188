//! Index layout of the MediaPipe face mesh (468 points, 478 with refined irises).
//!
//! These groups are the fatigue cues the temporal classifier was trained on.
//! Changing them changes the feature layout and invalidates the model.

use std::collections::BTreeMap;

pub const NUM_LANDMARKS: usize = 468;
pub const NUM_LANDMARKS_REFINED: usize = 478;

pub const MOUTH_OUTER: [usize; 7] = [61, 40, 37, 0, 267, 270, 291];
pub const MOUTH_INNER: [usize; 5] = [78, 95, 14, 317, 308];
pub const LEFT_EYE: [usize; 7] = [33, 160, 158, 133, 153, 144, 145];
pub const RIGHT_EYE: [usize; 7] = [362, 385, 387, 263, 373, 380, 381];
pub const LEFT_BROW: [usize; 3] = [70, 105, 107];
pub const RIGHT_BROW: [usize; 3] = [336, 334, 300];
pub const NOSE: [usize; 3] = [1, 2, 168];
pub const CHIN: [usize; 1] = [152];

/// Nose tip, origin of the per-frame coordinate system.
pub const NOSE_TIP: usize = 1;
/// Outer eye corners, their distance is the scale reference.
pub const LEFT_EYE_OUTER: usize = 33;
pub const RIGHT_EYE_OUTER: usize = 263;

pub fn default_index_groups() -> BTreeMap<String, Vec<usize>> {
    [
        ("mouth_outer", &MOUTH_OUTER[..]),
        ("mouth_inner", &MOUTH_INNER[..]),
        ("left_eye", &LEFT_EYE[..]),
        ("right_eye", &RIGHT_EYE[..]),
        ("left_brow", &LEFT_BROW[..]),
        ("right_brow", &RIGHT_BROW[..]),
        ("nose", &NOSE[..]),
        ("chin", &CHIN[..]),
    ]
    .into_iter()
    .map(|(name, indices)| (name.to_string(), indices.to_vec()))
    .collect()
}
