//! World configuration: dimensions, obstacle counts and the combat tunables.

/// Everything needed to build a [`crate::world::World`]. Immutable once the
/// world is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldConfig {
    pub width: u32,
    pub height: u32,
    pub num_mountains: u32,
    pub num_lakes: u32,
    pub num_pits: u32,
    pub visibility_range: u32,
    pub max_shield_strength: u32,
    pub max_shots: u32,
    /// Nominal weapon reload duration in ticks. Carried for scheduler
    /// policy; reload itself applies instantly.
    pub reload_ticks: u32,
    /// Nominal shield repair duration in ticks. Same caveat as reload.
    pub repair_ticks: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            width: 50,
            height: 50,
            num_mountains: 2,
            num_lakes: 2,
            num_pits: 2,
            visibility_range: 5,
            max_shield_strength: 5,
            max_shots: 5,
            reload_ticks: 5,
            repair_ticks: 5,
        }
    }
}

impl WorldConfig {
    /// A width x height world with no random obstacles, the shape most
    /// tests want.
    pub fn sized(width: u32, height: u32) -> Self {
        WorldConfig {
            width,
            height,
            num_mountains: 0,
            num_lakes: 0,
            num_pits: 0,
            ..WorldConfig::default()
        }
    }
}
