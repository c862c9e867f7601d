//! Directional ray scanning for the look command.

use shared::{Direction, ScanObject, ScanType};

use crate::robot::Robot;
use crate::world::World;

/// Scans outward from a robot in each cardinal direction, reporting the
/// first thing encountered within the world's visibility range.
///
/// A direction with nothing in range contributes no entry, and a scan that
/// runs off the world edge stops silently. Obstacles are reported with the
/// generic `OBSTACLE` type rather than their kind.
pub struct VisionFinder<'a> {
    world: &'a World,
}

impl<'a> VisionFinder<'a> {
    pub fn new(world: &'a World) -> Self {
        VisionFinder { world }
    }

    /// One scan per cardinal direction, in fixed NORTH/EAST/SOUTH/WEST
    /// order.
    pub fn scan(&self, robot: &Robot) -> Vec<ScanObject> {
        Direction::ALL
            .iter()
            .filter_map(|&direction| self.scan_direction(robot, direction))
            .collect()
    }

    fn scan_direction(&self, robot: &Robot, direction: Direction) -> Option<ScanObject> {
        let mut current = robot.position;

        for distance in 1..=self.world.visibility_range() {
            current = current.step(direction);

            if !self.world.is_position_valid(current) {
                return None;
            }

            if self.world.blocks_visibility(current) {
                return Some(ScanObject {
                    direction,
                    scan_type: ScanType::Obstacle,
                    distance,
                });
            }

            if let Some(other) = self.world.robot_at(current) {
                if !other.name().eq_ignore_ascii_case(robot.name()) {
                    return Some(ScanObject {
                        direction,
                        scan_type: ScanType::Robot,
                        distance,
                    });
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::obstacle::{Obstacle, ObstacleKind};
    use shared::Position;

    fn world_with_range(width: u32, height: u32, range: u32) -> World {
        let mut config = WorldConfig::sized(width, height);
        config.visibility_range = range;
        World::new(config)
    }

    fn robot_at(x: i32, y: i32) -> Robot {
        Robot::new("Looker", "Scout", Position::new(x, y), 5, 5)
    }

    #[test]
    fn test_1x1_world_sees_nothing() {
        let world = world_with_range(1, 1, 1);
        let robot = robot_at(0, 0);

        let objects = VisionFinder::new(&world).scan(&robot);
        assert!(objects.is_empty());
    }

    #[test]
    fn test_2x2_world_sees_mountain_north() {
        let mut world = world_with_range(2, 2, 1);
        world.add_obstacle(Obstacle::new(ObstacleKind::Mountain, 0, 1, 1, 1));
        let robot = robot_at(0, 0);

        let objects = VisionFinder::new(&world).scan(&robot);
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].direction, Direction::North);
        assert_eq!(objects[0].scan_type, ScanType::Obstacle);
        assert_eq!(objects[0].distance, 1);
    }

    #[test]
    fn test_sees_obstacle_north_and_robot_east() {
        let mut world = world_with_range(2, 2, 1);
        world.add_obstacle(Obstacle::new(ObstacleKind::Mountain, 0, 1, 1, 1));
        world.add_robot(Robot::new("Other", "Tank", Position::new(1, 0), 5, 5));
        let robot = robot_at(0, 0);

        let objects = VisionFinder::new(&world).scan(&robot);
        assert_eq!(objects.len(), 2);
        assert!(objects.iter().any(|o| {
            o.direction == Direction::North && o.scan_type == ScanType::Obstacle && o.distance == 1
        }));
        assert!(objects.iter().any(|o| {
            o.direction == Direction::East && o.scan_type == ScanType::Robot && o.distance == 1
        }));
    }

    #[test]
    fn test_empty_world_from_corner_sees_nothing() {
        let world = world_with_range(50, 50, 10);
        let robot = robot_at(0, 0);

        let objects = VisionFinder::new(&world).scan(&robot);
        assert!(objects.is_empty());
    }

    #[test]
    fn test_obstacle_beyond_range_is_invisible() {
        let mut world = world_with_range(20, 20, 3);
        world.add_obstacle(Obstacle::new(ObstacleKind::Lake, 5, 9, 1, 1));
        let robot = robot_at(5, 5);

        let objects = VisionFinder::new(&world).scan(&robot);
        assert!(objects.is_empty());
    }

    #[test]
    fn test_nearest_object_wins_per_direction() {
        let mut world = world_with_range(20, 20, 10);
        world.add_obstacle(Obstacle::new(ObstacleKind::Mountain, 5, 8, 1, 1));
        world.add_robot(Robot::new("Near", "Tank", Position::new(5, 7), 5, 5));
        let robot = robot_at(5, 5);

        let objects = VisionFinder::new(&world).scan(&robot);
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].scan_type, ScanType::Robot);
        assert_eq!(objects[0].distance, 2);
    }

    #[test]
    fn test_diagonal_neighbors_are_not_seen() {
        let mut world = world_with_range(3, 3, 2);
        world.add_robot(Robot::new("Corner", "Tank", Position::new(2, 2), 5, 5));
        let robot = robot_at(1, 1);

        let objects = VisionFinder::new(&world).scan(&robot);
        assert!(objects.is_empty());
    }

    #[test]
    fn test_scanner_does_not_see_itself() {
        let mut world = world_with_range(10, 10, 5);
        world.add_robot(robot_at(5, 5));
        let robot = world.robot_by_name("Looker").unwrap();

        let objects = VisionFinder::new(&world).scan(robot);
        assert!(objects.is_empty());
    }
}
