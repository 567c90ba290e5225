//! Line-of-sight probing
//!
//! An observer sweeps a fan of rays around its facing direction. A ray
//! sees the player when it crosses the player before any wall.

use glam::Vec2;

use super::steering::turn;
use crate::physics::{HitCategory, RaycastService};

/// Smallest angle between neighboring rays. Finer steps are widened to
/// this so a fan never grows past a few hundred rays.
pub const MIN_STEP_DEGREES: f32 = 0.5;

/// Casts a fan of rays from an observer and reports the first one that
/// reaches the player unobstructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineOfSightProbe {
    /// Half-width of the fan in degrees
    pub half_angle_degrees: f32,
    /// Angle between neighboring rays in degrees
    pub step_degrees: f32,
}

impl Default for LineOfSightProbe {
    fn default() -> Self {
        Self {
            half_angle_degrees: 30.0,
            step_degrees: 5.0,
        }
    }
}

impl LineOfSightProbe {
    /// Create a probe with the given fan shape
    #[must_use]
    pub fn new(half_angle_degrees: f32, step_degrees: f32) -> Self {
        Self {
            half_angle_degrees,
            step_degrees,
        }
    }

    /// Ray directions from the most clockwise to the most counter-clockwise
    pub fn directions(&self, facing: Vec2) -> impl Iterator<Item = Vec2> + '_ {
        let step = self.step_degrees.max(MIN_STEP_DEGREES);
        let half_steps = (self.half_angle_degrees / step).round() as i32;
        (-half_steps..=half_steps).map(move |i| turn(facing, i as f32 * step))
    }

    /// Look for the player.
    ///
    /// Rays span the fan around `facing` (or around the direction to
    /// `target` when the observer has no facing yet) and are `sight_range`
    /// long. Returns the world point where the first successful ray hit the
    /// player, or `None` if no ray got through.
    pub fn scan(
        &self,
        world: &impl RaycastService,
        origin: Vec2,
        facing: Vec2,
        sight_range: f32,
        target: Vec2,
    ) -> Option<Vec2> {
        let facing = facing
            .try_normalize()
            .or_else(|| (target - origin).try_normalize())?;

        self.directions(facing).find_map(|direction| {
            let end = origin + direction * sight_range;
            let seen = cast(world, origin, end);
            if let Some(point) = seen {
                log::trace!("ray {direction} from {origin} sees player at {point}");
            }
            seen
        })
    }
}

/// Closest player and wall hits along one ray
#[derive(Debug, Clone, Copy)]
struct RayScan {
    player: Option<(f32, Vec2)>,
    wall: f32,
}

/// Cast a single ray; the player counts only if it is hit strictly before
/// the closest wall.
fn cast(world: &impl RaycastService, start: Vec2, end: Vec2) -> Option<Vec2> {
    let mut scan = RayScan {
        player: None,
        wall: f32::INFINITY,
    };

    world.raycast(start, end, &mut |hit| {
        match hit.category {
            HitCategory::Player => {
                if scan.player.is_none_or(|(fraction, _)| hit.fraction < fraction) {
                    scan.player = Some((hit.fraction, hit.point));
                }
            }
            HitCategory::Wall => scan.wall = scan.wall.min(hit.fraction),
            HitCategory::Other => {}
        }
        true
    });

    scan.player
        .filter(|&(fraction, _)| fraction < scan.wall)
        .map(|(_, point)| point)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::physics::RayHit;

    /// Answers every ray with hits produced by a closure of the ray's
    /// start and end points.
    struct Scripted<F> {
        hits: F,
        rays: RefCell<Vec<(Vec2, Vec2)>>,
    }

    impl<F: Fn(Vec2, Vec2) -> Vec<RayHit>> Scripted<F> {
        fn new(hits: F) -> Self {
            Self {
                hits,
                rays: RefCell::new(Vec::new()),
            }
        }
    }

    impl<F: Fn(Vec2, Vec2) -> Vec<RayHit>> RaycastService for Scripted<F> {
        fn raycast(&self, start: Vec2, end: Vec2, callback: &mut dyn FnMut(RayHit) -> bool) {
            self.rays.borrow_mut().push((start, end));
            for hit in (self.hits)(start, end) {
                if !callback(hit) {
                    break;
                }
            }
        }
    }

    fn hit(category: HitCategory, fraction: f32, start: Vec2, end: Vec2) -> RayHit {
        RayHit {
            category,
            point: start.lerp(end, fraction),
            normal: Vec2::ZERO,
            fraction,
        }
    }

    #[test]
    fn test_fan_shape() {
        let world = Scripted::new(|_, _| Vec::new());
        let probe = LineOfSightProbe::default();

        let result = probe.scan(&world, Vec2::ZERO, Vec2::X, 8.0, Vec2::new(5.0, 0.0));

        assert!(result.is_none());
        let rays = world.rays.borrow();
        assert_eq!(rays.len(), 13);
        let degrees = |v: Vec2| v.y.atan2(v.x).to_degrees();
        for (start, end) in rays.iter() {
            assert_eq!(*start, Vec2::ZERO);
            assert!((end.length() - 8.0).abs() < 1e-4);
            assert!(degrees(*end).abs() <= 30.0 + 1e-3);
        }
        let first = degrees(rays[0].1);
        let last = degrees(rays[12].1);
        assert!((first + 30.0).abs() < 1e-3);
        assert!((last - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_tiny_step_is_widened() {
        let probe = LineOfSightProbe::new(30.0, 1e-6);

        let directions: Vec<_> = probe.directions(Vec2::X).collect();

        assert_eq!(directions.len(), 121);
        let degrees = |v: Vec2| v.y.atan2(v.x).to_degrees();
        assert!((degrees(directions[0]) + 30.0).abs() < 1e-2);
        assert!((degrees(directions[120]) - 30.0).abs() < 1e-2);
    }

    #[test]
    fn test_player_before_wall_is_seen() {
        let world = Scripted::new(|s, e| {
            vec![
                hit(HitCategory::Wall, 0.6, s, e),
                hit(HitCategory::Player, 0.4, s, e),
            ]
        });

        let seen = LineOfSightProbe::default().scan(&world, Vec2::ZERO, Vec2::X, 10.0, Vec2::ZERO);

        // First ray in scan order is the -30 degree one
        let expected = turn(Vec2::X, -30.0) * 4.0;
        assert!((seen.unwrap() - expected).length() < 1e-4);
        assert_eq!(world.rays.borrow().len(), 1);
    }

    #[test]
    fn test_wall_before_player_occludes() {
        let world = Scripted::new(|s, e| {
            vec![
                hit(HitCategory::Player, 0.5, s, e),
                hit(HitCategory::Wall, 0.3, s, e),
            ]
        });

        let seen = LineOfSightProbe::default().scan(&world, Vec2::ZERO, Vec2::X, 10.0, Vec2::ZERO);

        assert!(seen.is_none());
        assert_eq!(world.rays.borrow().len(), 13);
    }

    #[test]
    fn test_other_categories_ignored() {
        let world = Scripted::new(|s, e| {
            vec![
                hit(HitCategory::Other, 0.1, s, e),
                hit(HitCategory::Player, 0.7, s, e),
                hit(HitCategory::Player, 0.5, s, e),
            ]
        });

        let seen = LineOfSightProbe::default().scan(&world, Vec2::ZERO, Vec2::Y, 2.0, Vec2::ZERO);

        let expected = turn(Vec2::Y, -30.0) * 1.0;
        assert!((seen.unwrap() - expected).length() < 1e-4);
    }

    #[test]
    fn test_only_some_rays_clear() {
        // Rays tilted to the counter-clockwise side clear the wall
        let world = Scripted::new(|s, e| {
            if e.y > 1.0 {
                vec![hit(HitCategory::Player, 0.9, s, e)]
            } else {
                vec![
                    hit(HitCategory::Wall, 0.2, s, e),
                    hit(HitCategory::Player, 0.9, s, e),
                ]
            }
        });

        let seen = LineOfSightProbe::default().scan(&world, Vec2::ZERO, Vec2::X, 10.0, Vec2::ZERO);

        let point = seen.unwrap();
        assert!(point.y > 0.0);
        // 10 * sin(5 deg) < 1.0 < 10 * sin(10 deg): the +10 degree ray is the first through
        let expected = turn(Vec2::X, 10.0) * 9.0;
        assert!((point - expected).length() < 1e-3);
    }

    #[test]
    fn test_zero_facing_aims_at_target() {
        let world = Scripted::new(|_, _| Vec::new());

        let _ = LineOfSightProbe::default().scan(
            &world,
            Vec2::ZERO,
            Vec2::ZERO,
            4.0,
            Vec2::new(0.0, -3.0),
        );

        let rays = world.rays.borrow();
        assert_eq!(rays.len(), 13);
        assert!((rays[6].1 - Vec2::new(0.0, -4.0)).length() < 1e-4);
    }

    #[test]
    fn test_no_direction_no_rays() {
        let world = Scripted::new(|_, _| Vec::new());

        let seen = LineOfSightProbe::default().scan(&world, Vec2::ONE, Vec2::ZERO, 4.0, Vec2::ONE);

        assert!(seen.is_none());
        assert!(world.rays.borrow().is_empty());
    }
}
