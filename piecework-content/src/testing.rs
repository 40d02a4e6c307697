//! Helpers for testing generators in isolation from the assembler.

use rand::SeedableRng as _;
use rand_xoshiro::Xoshiro256Plus;

use piecework::generator::{BakeContext, Candidate, LiquidSettings, PendingSockets, PieceGenerator};
use piecework::math::Rotation;
use piecework::pool::PoolRegistry;
use piecework::socket::ChildSocket;
use piecework::space::{AvailableSpace, FreeSpace};

use crate::ContentFiller;

/// Bakes once with unlimited space and no pools.
pub(crate) fn bake_once(
    generator: &dyn PieceGenerator<ContentFiller>,
    seed: u64,
    rotation: Rotation,
    parent: Option<&ChildSocket>,
    pending: &[ChildSocket],
) -> Option<Candidate<ContentFiller>> {
    bake_in(
        generator,
        seed,
        rotation,
        parent,
        pending,
        &FreeSpace::everywhere(),
        &PoolRegistry::new(),
    )
}

pub(crate) fn bake_in(
    generator: &dyn PieceGenerator<ContentFiller>,
    seed: u64,
    rotation: Rotation,
    parent: Option<&ChildSocket>,
    pending: &[ChildSocket],
    remaining_space: &dyn AvailableSpace,
    pools: &PoolRegistry<ContentFiller>,
) -> Option<Candidate<ContentFiller>> {
    let mut rng = Xoshiro256Plus::seed_from_u64(seed);
    let compute = || pending.to_vec();
    let pending = PendingSockets::new(&compute);
    generator.bake(&mut BakeContext {
        rng: &mut rng,
        remaining_space,
        parent,
        pending: &pending,
        rotation,
        liquid_settings: LiquidSettings::default(),
        pools,
    })
}
