use piecework::Name;
use piecework::generator::{BakeContext, Candidate, PieceGenerator};
use piecework::pool::PoolEntry;

/// Bakes whatever one entry of another pool, chosen by weight, bakes.
///
/// Unlike the entries of the pool a socket draws from, the other entries of the sub-pool are
/// not tried if the chosen entry's candidate does not fit. This works best with a sub-pool
/// whose generators produce pieces of the same size and sockets.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[expect(clippy::exhaustive_structs)]
pub struct SubPoolGenerator {
    /// Name of the pool to choose from.
    pub pool: Name,
}

impl<F> PieceGenerator<F> for SubPoolGenerator {
    fn bake(&self, context: &mut BakeContext<'_, F>) -> Option<Candidate<F>> {
        let pools = context.pools;
        let Some(pool) = pools.get(&self.pool) else {
            log::warn!("sub-pool {} does not exist", self.pool);
            return None;
        };
        match pool.choose(&mut *context.rng)? {
            PoolEntry::Empty => None,
            PoolEntry::Generator(generator) => generator.bake(context),
        }
    }
}
