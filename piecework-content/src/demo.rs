//! A ready-made set of pools mixing rooms and corridors.

use piecework::Name;
use piecework::pool::{Pool, PoolEntry, PoolError, PoolRegistry};

use crate::{ContentFiller, LooperGenerator, Material, RoomGenerator, SubPoolGenerator};

/// The pools [`demo_pools()`] defines.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
#[non_exhaustive]
pub enum DemoPool {
    /// Rooms only.
    Rooms,
    /// Corridors, falling back to rooms.
    Corridors,
    /// Rooms or corridors, corridors twice as often.
    Mixed,
}

impl DemoPool {
    /// The name the pool is registered under.
    pub fn name(self) -> Name {
        Name::from(format!("demo:{self}"))
    }
}

/// Name of every socket of the demo pieces.
const DOOR: &str = "demo:door";

/// Constructs a registry of the pools listed in [`DemoPool`].
///
/// Every socket leads to [`DemoPool::Mixed`], so any of them may be used as the start pool.
pub fn demo_pools() -> Result<PoolRegistry<ContentFiller>, PoolError> {
    let door = Name::from(DOOR);
    let onward = DemoPool::Mixed.name();

    let room = RoomGenerator {
        materials: vec![Material::Stone, Material::Planks, Material::Brick],
        name: door.clone(),
        target_pool: onward.clone(),
        target_name: door.clone(),
    };
    let corridor = LooperGenerator {
        loop_chance: 0.25,
        turn_chance: 0.5,
        min_length: 3,
        max_length: 12,
        max_width: 6,
        materials: vec![Material::Stone, Material::Cobble],
        name: door.clone(),
        target_pool: onward,
        target_name: door,
    };

    let mut pools = PoolRegistry::new();
    pools.insert(
        DemoPool::Rooms.name(),
        Pool::new([(1, PoolEntry::generator(room))])?,
    )?;
    pools.insert(
        DemoPool::Corridors.name(),
        Pool::new([(1, PoolEntry::generator(corridor))])?.with_fallback(DemoPool::Rooms.name()),
    )?;
    pools.insert(
        DemoPool::Mixed.name(),
        Pool::new([
            (
                1,
                PoolEntry::generator(SubPoolGenerator {
                    pool: DemoPool::Rooms.name(),
                }),
            ),
            (
                2,
                PoolEntry::generator(SubPoolGenerator {
                    pool: DemoPool::Corridors.name(),
                }),
            ),
        ])?
        .with_fallback(DemoPool::Rooms.name()),
    )?;
    Ok(pools)
}
