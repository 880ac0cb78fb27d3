//! Lane configuration
//!
//! Static description of the board's horizontal strips. Lanes are loaded
//! once and never mutated; everything that moves refers back to its lane
//! by index.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::state::{EntityKind, PlatformKind, VehicleClass};

/// Travel direction of a lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// -1.0 for leftward, +1.0 for rightward
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Plain lane kind, without role data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneKind {
    Road,
    Water,
    Goal,
}

/// What a lane holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaneRole {
    /// Traffic. `None` picks a vehicle class per car from the round RNG.
    Road {
        #[serde(default)]
        vehicle: Option<VehicleClass>,
    },
    /// River with floating platforms
    Water { platform: PlatformKind },
    /// Goal row; slot x-coordinates in tile units
    Goal { slots: Vec<f32> },
}

/// A horizontal strip of the field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    /// Lane coordinate in tile units (centre line; row = floor(id))
    pub id: f32,
    pub role: LaneRole,
    pub direction: Direction,
    /// Speed magnitude in pixels per frame at the target rate
    #[serde(default)]
    pub speed: f32,
    /// Number of entities kept in the lane
    #[serde(default)]
    pub capacity: usize,
}

impl Lane {
    pub fn road(id: f32, direction: Direction, speed: f32, capacity: usize) -> Self {
        Self {
            id,
            role: LaneRole::Road { vehicle: None },
            direction,
            speed,
            capacity,
        }
    }

    pub fn water(
        id: f32,
        platform: PlatformKind,
        direction: Direction,
        speed: f32,
        capacity: usize,
    ) -> Self {
        Self {
            id,
            role: LaneRole::Water { platform },
            direction,
            speed,
            capacity,
        }
    }

    pub fn goal(id: f32, slots: Vec<f32>) -> Self {
        Self {
            id,
            role: LaneRole::Goal { slots },
            direction: Direction::Right,
            speed: 0.0,
            capacity: 0,
        }
    }

    pub fn kind(&self) -> LaneKind {
        match self.role {
            LaneRole::Road { .. } => LaneKind::Road,
            LaneRole::Water { .. } => LaneKind::Water,
            LaneRole::Goal { .. } => LaneKind::Goal,
        }
    }

    /// Integer row this lane occupies
    pub fn row(&self) -> i32 {
        self.id.floor() as i32
    }

    /// Signed velocity (speed * direction)
    pub fn velocity(&self) -> f32 {
        self.speed * self.direction.sign()
    }

    /// Widest entity this lane can spawn, in pixels. Random traffic counts
    /// as its widest vehicle class.
    pub fn widest_entity(&self, tile_size: f32) -> Option<f32> {
        match &self.role {
            LaneRole::Road { vehicle: Some(class) } => Some(class.width()),
            LaneRole::Road { vehicle: None } => VehicleClass::ALL
                .iter()
                .map(|class| class.width())
                .reduce(f32::max),
            LaneRole::Water { platform } => {
                Some(EntityKind::Platform(*platform).size(tile_size).x)
            }
            LaneRole::Goal { .. } => None,
        }
    }
}

/// Row thresholds derived from the lane table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zones {
    /// Rows strictly above this one are bushes
    pub bush_below: i32,
    /// Rows where the player must ride or drown
    pub water: Option<RangeInclusive<i32>>,
    /// Rows carrying traffic
    pub road: Option<RangeInclusive<i32>>,
}

impl Zones {
    pub fn from_lanes(lanes: &[Lane]) -> Self {
        let water = row_span(lanes, LaneKind::Water);
        let road = row_span(lanes, LaneKind::Road);

        // Without a river the bushes end where the goal row ends
        let bush_below = match (&water, &road) {
            (Some(w), _) => *w.start(),
            (None, Some(r)) => lanes
                .iter()
                .filter(|l| l.kind() == LaneKind::Goal)
                .map(|l| l.row() + 1)
                .max()
                .unwrap_or(*r.start()),
            (None, None) => 0,
        };

        Self {
            bush_below,
            water,
            road,
        }
    }

    pub fn in_bushes(&self, row: i32) -> bool {
        row < self.bush_below
    }

    pub fn in_water(&self, row: i32) -> bool {
        self.water.as_ref().is_some_and(|w| w.contains(&row))
    }
}

fn row_span(lanes: &[Lane], kind: LaneKind) -> Option<RangeInclusive<i32>> {
    let rows = lanes.iter().filter(|l| l.kind() == kind).map(Lane::row);
    let min = rows.clone().min()?;
    let max = rows.max()?;
    Some(min..=max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::LogSize;

    #[test]
    fn test_velocity_is_signed() {
        let left = Lane::road(7.5, Direction::Left, 2.0, 2);
        let right = Lane::road(8.5, Direction::Right, 3.0, 1);
        assert_eq!(left.velocity(), -2.0);
        assert_eq!(right.velocity(), 3.0);
        assert_eq!(left.row(), 7);
    }

    #[test]
    fn test_widest_entity_per_role() {
        let random = Lane::road(7.5, Direction::Left, 2.0, 2);
        let mut sedans = random.clone();
        sedans.role = LaneRole::Road {
            vehicle: Some(VehicleClass::Sedan),
        };
        let logs = Lane::water(2.5, PlatformKind::Log(LogSize::Long), Direction::Right, 1.0, 2);

        assert_eq!(random.widest_entity(60.0), Some(130.0));
        assert_eq!(sedans.widest_entity(60.0), Some(77.0));
        assert_eq!(logs.widest_entity(60.0), Some(320.0));
        assert_eq!(Lane::goal(1.5, vec![1.5]).widest_entity(60.0), None);
    }

    #[test]
    fn test_zones_from_classic_board() {
        let lanes = vec![
            Lane::goal(1.5, vec![1.5]),
            Lane::water(2.5, PlatformKind::Log(LogSize::Medium), Direction::Right, 1.0, 3),
            Lane::water(5.5, PlatformKind::Turtles(3), Direction::Left, 1.0, 3),
            Lane::road(7.5, Direction::Left, 2.0, 2),
            Lane::road(10.5, Direction::Right, 1.0, 2),
        ];
        let zones = Zones::from_lanes(&lanes);

        assert_eq!(zones.bush_below, 2);
        assert!(zones.in_bushes(1));
        assert!(!zones.in_bushes(2));
        assert!(zones.in_water(2));
        assert!(zones.in_water(4));
        assert!(!zones.in_water(6));
        assert_eq!(zones.road, Some(7..=10));
    }

    #[test]
    fn test_zones_without_river() {
        let lanes = vec![
            Lane::goal(1.5, vec![1.5]),
            Lane::road(7.5, Direction::Left, 2.0, 2),
        ];
        let zones = Zones::from_lanes(&lanes);
        assert_eq!(zones.water, None);
        assert_eq!(zones.bush_below, 2);
    }
}
