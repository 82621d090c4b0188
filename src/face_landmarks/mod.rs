pub mod model_mediapipe;
mod selector;

use nalgebra::Point2;

pub use selector::LandmarkSelector;

/// A single tracked point in normalized image coordinates. Values are nominally
/// in `[0, 1]` but are never clamped.
pub type Landmark = Point2<f32>;

// one detected face: the landmark mesh as reported by the detector
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
    confidence: f32,
}

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self {
            points,
            confidence: 1.0,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    /// Builds a set from a flattened coordinate buffer where each point occupies
    /// `stride` values (`x, y` or `x, y, z`). Anything past `x, y` is dropped and a
    /// trailing partial point is ignored.
    pub fn from_vec(values: &[f32], stride: usize) -> Self {
        let stride = stride.max(2);
        let points = values
            .chunks_exact(stride)
            .map(|p| Landmark::new(p[0], p[1]))
            .collect();
        Self::new(points)
    }

    /// Bounds-checked lookup; `None` is the missing-landmark marker.
    pub fn get_landmark(&self, index: usize) -> Option<Landmark> {
        self.points.get(index).copied()
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vec_drops_depth_and_partial_points() {
        let set = LandmarkSet::from_vec(&[0.1, 0.2, 9.0, 0.3, 0.4, 9.0, 0.5], 3);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get_landmark(1), Some(Landmark::new(0.3, 0.4)));
        assert_eq!(set.get_landmark(2), None);
    }

    #[test]
    fn default_confidence_is_one() {
        let set = LandmarkSet::new(vec![Landmark::new(0.5, 0.5)]);
        assert_eq!(set.confidence(), 1.0);
        assert_eq!(set.with_confidence(0.2).confidence(), 0.2);
    }
}
