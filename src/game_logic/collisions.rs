use bevy::prelude::*;

/// Which axis ranges of a 2D overlap test matched.
///
/// `Both` is a full collision. A single-axis result means the point sits in
/// the box's extended strip along that axis but outside the box itself; it is
/// not a hit on its own, but it feeds the per-entity axis memory used to work
/// out which face of a box was struck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionAxis {
    #[default]
    None,
    XAxis,
    YAxis,
    Both,
}

impl CollisionAxis {
    pub fn is_hit(self) -> bool {
        self == CollisionAxis::Both
    }
}

/// Circle-circle overlap. Touching circles (distance exactly equal to the
/// radius sum) count as a collision.
pub fn circle_circle(a: Vec2, b: Vec2, radius_a: f32, radius_b: f32) -> CollisionAxis {
    if (a - b).length() <= radius_a + radius_b {
        CollisionAxis::Both
    } else {
        CollisionAxis::None
    }
}

/// Point-in-box test reporting which extent ranges contained the point.
pub fn point_in_box(point: Vec2, centre: Vec2, half_width: f32, half_length: f32) -> CollisionAxis {
    let x_match = point.x >= centre.x - half_width && point.x <= centre.x + half_width;
    let y_match = point.y >= centre.y - half_length && point.y <= centre.y + half_length;

    match (x_match, y_match) {
        (true, true) => CollisionAxis::Both,
        (true, false) => CollisionAxis::XAxis,
        (false, true) => CollisionAxis::YAxis,
        (false, false) => CollisionAxis::None,
    }
}

/// Circle-box overlap, approximated by inflating the box half-extents by the
/// circle radius. Over-reports slightly in corner regions.
pub fn circle_box(
    circle: Vec2,
    radius: f32,
    centre: Vec2,
    half_width: f32,
    half_length: f32,
) -> CollisionAxis {
    point_in_box(circle, centre, half_width + radius, half_length + radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_circles_collide() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(5.0, 0.0);
        assert_eq!(circle_circle(a, b, 2.0, 3.0), CollisionAxis::Both);
    }

    #[test]
    fn separated_circles_do_not_collide() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(5.1, 0.0);
        assert_eq!(circle_circle(a, b, 2.0, 3.0), CollisionAxis::None);
    }

    #[test]
    fn overlapping_circles_collide() {
        let a = Vec2::new(1.0, 1.0);
        let b = Vec2::new(2.0, 2.0);
        assert_eq!(circle_circle(a, b, 1.0, 1.0), CollisionAxis::Both);
    }

    #[test]
    fn point_inside_box_is_full_collision() {
        let axis = point_in_box(Vec2::new(1.0, 1.0), Vec2::ZERO, 2.0, 2.0);
        assert_eq!(axis, CollisionAxis::Both);
    }

    #[test]
    fn point_in_x_strip_only_reports_x() {
        // Inside the width range, well outside the length range
        let axis = point_in_box(Vec2::new(1.0, 10.0), Vec2::ZERO, 2.0, 3.0);
        assert_eq!(axis, CollisionAxis::XAxis);
    }

    #[test]
    fn point_in_y_strip_only_reports_y() {
        let axis = point_in_box(Vec2::new(10.0, 1.0), Vec2::ZERO, 2.0, 3.0);
        assert_eq!(axis, CollisionAxis::YAxis);
    }

    #[test]
    fn point_on_edge_but_outside_other_range_is_single_axis() {
        // Exactly on the width boundary, outside the length range
        let axis = point_in_box(Vec2::new(2.0, 5.0), Vec2::ZERO, 2.0, 3.0);
        assert_eq!(axis, CollisionAxis::XAxis);
    }

    #[test]
    fn point_outside_both_ranges_is_none() {
        let axis = point_in_box(Vec2::new(10.0, 10.0), Vec2::ZERO, 2.0, 3.0);
        assert_eq!(axis, CollisionAxis::None);
    }

    #[test]
    fn circle_box_inflates_extents() {
        // Point is 1.5 outside the box on x, but the circle radius covers it
        let axis = circle_box(Vec2::new(3.5, 0.0), 2.0, Vec2::ZERO, 2.0, 2.0);
        assert_eq!(axis, CollisionAxis::Both);

        // Without the radius it would only match the length range
        let axis = point_in_box(Vec2::new(3.5, 0.0), Vec2::ZERO, 2.0, 2.0);
        assert_eq!(axis, CollisionAxis::YAxis);
    }
}
