use crate::gesture_constants::{LOAD_MORE_DISTANCE, LOAD_MORE_FRACTION};
use crate::geometry::ScrollGeometry;

/// Edge-proximity condition for requesting more content.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgeThreshold {
    /// Fires when `(position + viewport) / extent >= fraction`.
    Fraction(f32),
    /// Fires when `extent - (position + viewport) < distance`.
    Distance(f32),
}

impl EdgeThreshold {
    /// Threshold for a vertically growing list.
    pub fn vertical_list() -> Self {
        EdgeThreshold::Fraction(LOAD_MORE_FRACTION)
    }

    /// Threshold for a horizontal carousel.
    pub fn carousel() -> Self {
        EdgeThreshold::Distance(LOAD_MORE_DISTANCE)
    }

    pub fn is_near_end(&self, geometry: ScrollGeometry) -> bool {
        match *self {
            EdgeThreshold::Fraction(fraction) => geometry.seen_fraction() >= fraction,
            EdgeThreshold::Distance(distance) => geometry.distance_to_end() < distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_fires_at_the_bottom() {
        let geometry = ScrollGeometry::new(750.0, 1000.0, 250.0);
        assert_eq!(geometry.seen_fraction(), 1.0);
        assert!(EdgeThreshold::vertical_list().is_near_end(geometry));
    }

    #[test]
    fn fraction_boundary_is_inclusive() {
        let threshold = EdgeThreshold::vertical_list();
        assert!(threshold.is_near_end(ScrollGeometry::new(550.0, 1000.0, 250.0)));
        assert!(!threshold.is_near_end(ScrollGeometry::new(549.0, 1000.0, 250.0)));
    }

    #[test]
    fn fraction_fires_on_empty_content() {
        assert!(EdgeThreshold::vertical_list().is_near_end(ScrollGeometry::new(0.0, 0.0, 250.0)));
    }

    #[test]
    fn distance_fires_only_within_range() {
        let threshold = EdgeThreshold::carousel();

        let far = ScrollGeometry::new(100.0, 3000.0, 400.0);
        assert_eq!(far.distance_to_end(), 2500.0);
        assert!(!threshold.is_near_end(far));

        let near = ScrollGeometry::new(1200.0, 3000.0, 400.0);
        assert_eq!(near.distance_to_end(), 1400.0);
        assert!(threshold.is_near_end(near));
    }

    #[test]
    fn distance_boundary_is_exclusive() {
        let threshold = EdgeThreshold::carousel();
        assert!(!threshold.is_near_end(ScrollGeometry::new(1100.0, 3000.0, 400.0)));
    }

    #[test]
    fn short_content_is_always_near_the_end() {
        assert!(EdgeThreshold::carousel().is_near_end(ScrollGeometry::new(0.0, 600.0, 800.0)));
    }
}
