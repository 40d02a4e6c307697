use anyhow::Context as _;
use rand::SeedableRng as _;
use rand_xoshiro::Xoshiro256Plus;

use piecework::assemble::{AssemblyParams, assemble};
use piecework::math::{Cell, CellBox};
use piecework::piece::Structure;
use piecework::pool::PoolRegistry;
use piecework_content::{ContentFiller, DemoPool, SparseCanvas};

/// Where the first piece of a structure is placed.
pub const ANCHOR: Cell = Cell::new(0, 0, 0);

/// The parameters used when no configuration file says otherwise.
pub fn default_params() -> AssemblyParams {
    AssemblyParams::new(DemoPool::Mixed.name())
}

/// Assembles a structure with a random number generator seeded from `seed`.
///
/// Returns [`None`] if the start pool produced no first piece.
pub fn generate(
    pools: &PoolRegistry<ContentFiller>,
    params: &AssemblyParams,
    seed: u64,
) -> Result<Option<Structure<ContentFiller>>, anyhow::Error> {
    let mut rng = Xoshiro256Plus::seed_from_u64(seed);
    assemble(pools, params, ANCHOR, &mut rng)
        .with_context(|| format!("could not assemble from {}", params.start_pool))
}

/// Fills the whole structure into a new canvas.
pub fn fill(structure: &Structure<ContentFiller>) -> SparseCanvas {
    let mut canvas = SparseCanvas::new();
    structure.fill_region(CellBox::EVERYWHERE, &mut canvas);
    canvas
}

/// The height at which a top-down map shows the most: one above the first piece's floor.
pub fn map_layer(structure: &Structure<ContentFiller>) -> i32 {
    structure
        .pieces()
        .first()
        .map_or(ANCHOR.y, |root| root.bounds.lower().y + 1)
}
