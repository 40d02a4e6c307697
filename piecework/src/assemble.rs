//! The placement scheduler, which grows a [`Structure`] outward from a first piece.

use core::cmp::Ordering;
use core::ops::RangeInclusive;
use std::collections::BinaryHeap;

use rand::RngCore;

use crate::Name;
use crate::generator::{BakeContext, Candidate, LiquidSettings, PendingSockets};
use crate::math::{Cell, CellBox, GridVector, Rotation};
use crate::piece::{Piece, Structure};
use crate::pool::{PoolEntry, PoolRegistry};
use crate::socket::ChildSocket;
use crate::space::{AvailableSpace as _, FreeSpace};

// -------------------------------------------------------------------------------------------------

/// Parameters of one structure assembly.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[non_exhaustive]
pub struct AssemblyParams {
    /// Pool the first piece is chosen from.
    pub start_pool: Name,

    /// Maximum depth of the tree of pieces.
    ///
    /// Pieces at depth up to `size` are chosen from their sockets' pools, and pieces at depth
    /// `size + 1` only from fallback pools. If zero, only the first piece is placed.
    #[serde(default = "default_size")]
    pub size: u32,

    /// How far from the first piece other pieces may extend.
    #[serde(default)]
    pub max_distance_from_center: MaxDistance,

    #[allow(missing_docs)]
    #[serde(default)]
    pub liquid_settings: LiquidSettings,

    /// If present, the structure is confined to this box, and not generated at all if its
    /// first piece does not fit in it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_limits: Option<CellBox>,
}

fn default_size() -> u32 {
    7
}

impl AssemblyParams {
    /// Parameters with the given start pool and defaults for everything else.
    pub fn new(start_pool: impl Into<Name>) -> Self {
        Self {
            start_pool: start_pool.into(),
            size: default_size(),
            max_distance_from_center: MaxDistance::default(),
            liquid_settings: LiquidSettings::default(),
            world_limits: None,
        }
    }

    /// Checks that the parameters are within their permitted ranges.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let MaxDistance {
            horizontal,
            vertical,
        } = self.max_distance_from_center;
        if !MaxDistance::HORIZONTAL_RANGE.contains(&horizontal) {
            return Err(ParamsError::HorizontalDistance(horizontal));
        }
        if !MaxDistance::VERTICAL_RANGE.contains(&vertical) {
            return Err(ParamsError::VerticalDistance(vertical));
        }
        Ok(())
    }
}

/// Distance limits from the first piece of a structure.
///
/// Deserializes from either a single number, applying to both directions, or
/// `{ "horizontal": h, "vertical": v }`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "MaxDistanceSer")]
#[expect(clippy::exhaustive_structs)]
pub struct MaxDistance {
    /// Distance along X and Z.
    pub horizontal: u32,
    /// Distance along Y.
    pub vertical: u32,
}

impl MaxDistance {
    /// Permitted values of [`Self::horizontal`].
    pub const HORIZONTAL_RANGE: RangeInclusive<u32> = 1..=128;
    /// Permitted values of [`Self::vertical`].
    pub const VERTICAL_RANGE: RangeInclusive<u32> = 1..=4064;

    /// The same distance in all directions.
    pub const fn uniform(distance: u32) -> Self {
        Self {
            horizontal: distance,
            vertical: distance,
        }
    }
}

impl Default for MaxDistance {
    fn default() -> Self {
        Self::uniform(80)
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum MaxDistanceSer {
    Uniform(u32),
    Separate { horizontal: u32, vertical: u32 },
}

impl From<MaxDistanceSer> for MaxDistance {
    fn from(value: MaxDistanceSer) -> Self {
        match value {
            MaxDistanceSer::Uniform(distance) => Self::uniform(distance),
            MaxDistanceSer::Separate {
                horizontal,
                vertical,
            } => Self {
                horizontal,
                vertical,
            },
        }
    }
}

/// Error from [`AssemblyParams::validate()`].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ParamsError {
    #[allow(missing_docs)]
    #[error(
        "horizontal max distance {0} is outside the permitted range {range:?}",
        range = MaxDistance::HORIZONTAL_RANGE
    )]
    HorizontalDistance(u32),
    #[allow(missing_docs)]
    #[error(
        "vertical max distance {0} is outside the permitted range {range:?}",
        range = MaxDistance::VERTICAL_RANGE
    )]
    VerticalDistance(u32),
}

/// Error from [`assemble()`].
///
/// Problems with pools other than the start pool are not errors; they are logged, and the
/// affected sockets are left without pieces.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum AssembleError {
    #[allow(missing_docs)]
    #[error("invalid assembly parameters")]
    Params(#[from] ParamsError),
    /// The start pool does not exist.
    #[error("start pool {0} does not exist")]
    MissingStartPool(Name),
    /// The start pool has no entries.
    #[error("start pool {0} has no entries")]
    EmptyStartPool(Name),
}

// -------------------------------------------------------------------------------------------------

/// Assembles a structure.
///
/// The first piece is chosen from `params.start_pool`, generated with a random rotation and
/// translated so that its local origin is at `anchor`. Then, until there are no more open
/// sockets or the depth limit is reached, child pieces are attached to the open sockets of
/// placed pieces wherever they fit.
///
/// Returns `Ok(None)` if the start pool's choice was to place nothing, or the first piece
/// falls outside [`AssemblyParams::world_limits`].
///
/// All randomness comes from `rng`, so the same `rng` state, pools, and parameters always
/// produce the same structure.
pub fn assemble<F, R: RngCore>(
    pools: &PoolRegistry<F>,
    params: &AssemblyParams,
    anchor: Cell,
    rng: &mut R,
) -> Result<Option<Structure<F>>, AssembleError> {
    params.validate()?;
    let rng: &mut dyn RngCore = rng;

    let rotation = Rotation::random(&mut *rng);
    let start_pool = pools
        .get(&params.start_pool)
        .ok_or_else(|| AssembleError::MissingStartPool(params.start_pool.clone()))?;
    let generator = match start_pool.choose(&mut *rng) {
        None => return Err(AssembleError::EmptyStartPool(params.start_pool.clone())),
        Some(PoolEntry::Empty) => return Ok(None),
        Some(PoolEntry::Generator(generator)) => generator,
    };

    let everywhere = FreeSpace::everywhere();
    let pending = PendingSockets::none();
    let Some(root) = generator.bake(&mut BakeContext {
        rng: &mut *rng,
        remaining_space: &everywhere,
        parent: None,
        pending: &pending,
        rotation,
        liquid_settings: params.liquid_settings,
        pools,
    }) else {
        log::debug!("first piece {generator:?} generated nothing");
        return Ok(None);
    };

    let offset = anchor.to_vector();
    let root_bounds = root.bounds_at(offset);
    if let Some(limits) = params.world_limits {
        if !limits.encapsulates(root_bounds) {
            log::debug!(
                "first piece {generator:?} with bounds {root_bounds:?} \
                does not fit in world limits {limits:?}"
            );
            return Ok(None);
        }
    }

    let total_space = if params.size > 0 {
        let center = Cell::new(
            midpoint(root_bounds.lower().x, root_bounds.upper().x),
            anchor.y,
            midpoint(root_bounds.lower().z, root_bounds.upper().z),
        );
        let MaxDistance {
            horizontal,
            vertical,
        } = params.max_distance_from_center;
        let total_bounds = CellBox::around(center, horizontal, vertical);
        match params.world_limits {
            None => FreeSpace::new(total_bounds),
            Some(limits) => match limits.intersection(total_bounds) {
                Some(bounds) => FreeSpace::new(bounds),
                None => FreeSpace::empty(),
            },
        }
    } else {
        FreeSpace::empty()
    };

    let mut assembler = Assembler::new(
        pools,
        params.size,
        params.liquid_settings,
        rng,
        total_space,
    );
    assembler.place_root(root, offset, rotation);
    if params.size > 0 {
        assembler.run();
    }

    let structure = Structure::from_pieces(assembler.pieces);
    if let Some(structure) = &structure {
        log::debug!(
            "assembled {count} pieces from {start} within {bounds:?}",
            count = structure.pieces().len(),
            start = params.start_pool,
            bounds = structure.bounding_box(),
        );
    }
    Ok(structure)
}

/// Midpoint of two coordinates, rounding toward zero.
fn midpoint(a: i32, b: i32) -> i32 {
    // cannot truncate since the result lies between a and b
    ((i64::from(a) + i64::from(b)) / 2) as i32
}

// -------------------------------------------------------------------------------------------------

/// Index into [`Assembler::spaces`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct SpaceId(usize);

impl SpaceId {
    /// The space of the whole structure.
    const TOTAL: Self = Self(0);
}

/// State of the placement search for one structure.
struct Assembler<'a, F> {
    pools: &'a PoolRegistry<F>,
    max_depth: u32,
    liquid_settings: LiquidSettings,
    rng: &'a mut dyn RngCore,

    /// Free space indexes: the whole structure's, followed by those of pieces which have had
    /// sockets pointing into themselves.
    spaces: Vec<FreeSpace>,

    queue: BinaryHeap<PlacementTask>,
    next_sequence: u64,

    /// Committed pieces, in order of placement.
    pieces: Vec<Piece<F>>,
}

/// A placed piece whose child sockets have yet to be processed.
#[derive(Debug)]
struct PlacementTask {
    piece_bounds: CellBox,
    children: Vec<ChildSocket>,
    /// The space the piece was placed in, which its children are placed in too.
    space: SpaceId,
    depth: u32,
    placement_priority: i32,
    /// Order of insertion into the queue, which breaks priority ties.
    sequence: u64,
}

/// A candidate which has been found to fit, and where.
struct Fit<F> {
    candidate: Candidate<F>,
    offset: GridVector,
    bounds: CellBox,
    rotation: Rotation,
    placement_priority: i32,
}

impl<'a, F> Assembler<'a, F> {
    fn new(
        pools: &'a PoolRegistry<F>,
        max_depth: u32,
        liquid_settings: LiquidSettings,
        rng: &'a mut dyn RngCore,
        total_space: FreeSpace,
    ) -> Self {
        Self {
            pools,
            max_depth,
            liquid_settings,
            rng,
            spaces: vec![total_space],
            queue: BinaryHeap::new(),
            next_sequence: 0,
            pieces: Vec::new(),
        }
    }

    /// Commits the first piece, at depth 0, without checking whether it fits.
    fn place_root(&mut self, root: Candidate<F>, offset: GridVector, rotation: Rotation) {
        let bounds = root.bounds_at(offset);
        self.commit(
            Fit {
                candidate: root,
                offset,
                bounds,
                rotation,
                placement_priority: 0,
            },
            SpaceId::TOTAL,
            0,
        );
    }

    fn run(&mut self) {
        while let Some(task) = self.queue.pop() {
            self.place_children(task);
        }
    }

    fn place_children(&mut self, task: PlacementTask) {
        let pools = self.pools;
        // Created the first time a socket points into the piece itself.
        let mut local_space: Option<SpaceId> = None;

        for socket in &task.children {
            let target = socket.target_cell();
            let inward = task.piece_bounds.contains_cell(target);
            let space = if inward {
                *local_space
                    .get_or_insert_with(|| self.push_space(FreeSpace::new(task.piece_bounds)))
            } else {
                task.space
            };
            if !self.spaces[space.0].contains_cell(target) {
                continue;
            }

            let Some(pool) = pools.resolve(&socket.pool) else {
                log::warn!("empty or nonexistent pool {}", socket.pool);
                continue;
            };
            let fallback = match pool.fallback() {
                None => pools.empty_pool(),
                Some(name) => match pools.resolve(name) {
                    Some(fallback) => fallback,
                    None => {
                        log::warn!("empty or nonexistent fallback pool {name}");
                        continue;
                    }
                },
            };

            let mut entries = Vec::new();
            if task.depth < self.max_depth {
                entries.extend(pool.shuffled(&mut *self.rng));
            }
            entries.extend(fallback.shuffled(&mut *self.rng));

            if let Some(fit) = self.find_fit(socket, &entries, space, inward) {
                self.commit(fit, space, task.depth + 1);
            }
        }
    }

    /// Tries `entries` in order, each in every rotation in random order, and returns the
    /// first candidate which can be attached to `socket` within `space`.
    fn find_fit(
        &mut self,
        socket: &ChildSocket,
        entries: &[PoolEntry<F>],
        space: SpaceId,
        inward: bool,
    ) -> Option<Fit<F>> {
        let Self {
            pools,
            liquid_settings,
            rng,
            spaces,
            queue,
            ..
        } = self;
        let permitted = &spaces[space.0];
        let target = socket.target_cell();
        let scan_pending = || -> Vec<ChildSocket> {
            queue
                .iter()
                .flat_map(|task| &task.children)
                .filter(|other| permitted.contains_cell(other.target_cell()))
                .cloned()
                .collect()
        };

        for entry in entries {
            let generator = match entry {
                PoolEntry::Empty => break,
                PoolEntry::Generator(generator) => generator,
            };
            // Shared by all rotations of this entry.
            let pending = if inward {
                PendingSockets::none()
            } else {
                PendingSockets::new(&scan_pending)
            };

            for rotation in Rotation::shuffled(&mut **rng) {
                let Some(candidate) = generator.bake(&mut BakeContext {
                    rng: &mut **rng,
                    remaining_space: permitted,
                    parent: Some(socket),
                    pending: &pending,
                    rotation,
                    liquid_settings: *liquid_settings,
                    pools: *pools,
                }) else {
                    continue;
                };

                let attachment = candidate.parents.iter().find_map(|parent| {
                    if !socket.can_attach(parent) {
                        return None;
                    }
                    let offset = target - parent.position;
                    let bounds = candidate.bounds_at(offset);
                    permitted
                        .contains(bounds)
                        .then_some((offset, bounds, parent.placement_priority))
                });
                if let Some((offset, bounds, placement_priority)) = attachment {
                    return Some(Fit {
                        candidate,
                        offset,
                        bounds,
                        rotation,
                        placement_priority,
                    });
                }
            }
        }
        None
    }

    /// Subtracts the fitted piece from `space`, records it, and queues its children if it
    /// is not too deep.
    fn commit(&mut self, fit: Fit<F>, space: SpaceId, depth: u32) {
        let Fit {
            candidate,
            offset,
            bounds,
            rotation,
            placement_priority,
        } = fit;
        self.spaces[space.0].subtract(bounds);
        let children = candidate.children_at(offset);
        self.pieces.push(Piece {
            filler: candidate.filler,
            bounds,
            rotation,
            depth,
            liquid_settings: self.liquid_settings,
        });
        if depth <= self.max_depth {
            let sequence = self.next_sequence;
            self.next_sequence += 1;
            self.queue.push(PlacementTask {
                piece_bounds: bounds,
                children,
                space,
                depth,
                placement_priority,
                sequence,
            });
        }
    }

    fn push_space(&mut self, space: FreeSpace) -> SpaceId {
        self.spaces.push(space);
        SpaceId(self.spaces.len() - 1)
    }
}

/// Higher placement priority is greater; among equal priorities, earlier insertion is
/// greater, so that [`BinaryHeap`] pops it first.
impl Ord for PlacementTask {
    fn cmp(&self, other: &Self) -> Ordering {
        self.placement_priority
            .cmp(&other.placement_priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for PlacementTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PlacementTask {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PlacementTask {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::PieceGenerator;
    use crate::math::Face6;
    use crate::pool::Pool;
    use crate::socket::{JointType, Orientation, ParentSocket};
    use pretty_assertions::assert_eq;
    use rand::{Rng as _, SeedableRng as _};
    use rand_xoshiro::Xoshiro256Plus;
    use std::sync::{Arc, Mutex};

    type Label = &'static str;

    /// Generates the same box every time, ignoring rotation.
    #[derive(Clone, Debug)]
    struct Block {
        label: Label,
        size: [i32; 3],
        parents: Vec<ParentSocket>,
        children: Vec<ChildSocket>,
    }

    impl Block {
        fn new(label: Label, size: [i32; 3]) -> Self {
            Self {
                label,
                size,
                parents: vec![],
                children: vec![],
            }
        }

        /// Adds a parent socket named "door".
        fn parent(mut self, position: [i32; 3], front: Face6) -> Self {
            self.parents.push(ParentSocket::new(
                position.into(),
                Orientation::horizontal(front),
                "door",
            ));
            self
        }

        /// Adds a child socket targeting "door".
        fn child(mut self, position: [i32; 3], front: Face6, pool: &str) -> Self {
            self.children.push(ChildSocket {
                position: position.into(),
                orientation: Orientation::horizontal(front),
                joint: JointType::Rigid,
                pool: pool.into(),
                target: "door".into(),
            });
            self
        }

        fn bounds(&self) -> CellBox {
            CellBox::from_lower_upper([0, 0, 0], self.size.map(|s| s - 1))
        }
    }

    impl PieceGenerator<Label> for Block {
        fn bake(&self, _: &mut BakeContext<'_, Label>) -> Option<Candidate<Label>> {
            Some(Candidate::with_parents_and_children(
                self.label,
                self.bounds(),
                self.parents.clone(),
                self.children.clone(),
            ))
        }
    }

    fn pool(generators: impl IntoIterator<Item = Block>) -> Pool<Label> {
        Pool::new(
            generators
                .into_iter()
                .map(|g| (1, PoolEntry::generator(g))),
        )
        .unwrap()
    }

    fn registry(pools: impl IntoIterator<Item = (&'static str, Pool<Label>)>) -> PoolRegistry<Label> {
        let mut registry = PoolRegistry::new();
        for (name, pool) in pools {
            registry.insert(name, pool).unwrap();
        }
        registry
    }

    fn params(size: u32) -> AssemblyParams {
        AssemblyParams {
            size,
            max_distance_from_center: MaxDistance::uniform(16),
            ..AssemblyParams::new("start")
        }
    }

    fn run(pools: &PoolRegistry<Label>, params: &AssemblyParams) -> Vec<(Label, CellBox, u32)> {
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        assemble(pools, params, Cell::ORIGIN, &mut rng)
            .unwrap()
            .unwrap()
            .pieces()
            .iter()
            .map(|piece| (piece.filler, piece.bounds, piece.depth))
            .collect()
    }

    fn b(lower: [i32; 3], upper: [i32; 3]) -> CellBox {
        CellBox::from_lower_upper(lower, upper)
    }

    /// A 4×4×4 root with one socket on its +X face.
    fn root_with_east_socket() -> Block {
        Block::new("root", [4, 4, 4]).child([3, 0, 0], Face6::PX, "east")
    }

    #[test]
    fn child_attached_through_socket() {
        let pools = registry([
            ("start", pool([root_with_east_socket()])),
            (
                "east",
                pool([Block::new("child", [3, 4, 4]).parent([0, 0, 0], Face6::NX)]),
            ),
        ]);
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let root = root_with_east_socket();
        let mut assembler = Assembler::new(
            &pools,
            1,
            LiquidSettings::default(),
            &mut rng,
            FreeSpace::new(b([-10, -10, -10], [9, 9, 9])),
        );
        assembler.place_root(
            Candidate::with_children("root", root.bounds(), root.children.clone()),
            GridVector::zero(),
            Rotation::None,
        );
        assembler.run();

        let child_bounds = b([4, 0, 0], [6, 3, 3]);
        assert_eq!(
            assembler
                .pieces
                .iter()
                .map(|p| (p.filler, p.bounds, p.depth))
                .collect::<Vec<_>>(),
            vec![("root", root.bounds(), 0), ("child", child_bounds, 1)]
        );
        let total = &assembler.spaces[SpaceId::TOTAL.0];
        child_bounds.for_each_cell(|cell| assert!(!total.contains_cell(cell)));
        assert!(total.contains_cell(Cell::new(7, 0, 0)));
    }

    #[test]
    fn overlapping_sibling_is_rejected() {
        let root = Block::new("root", [4, 4, 4])
            .child([3, 0, 0], Face6::PX, "east")
            .child([0, 0, 3], Face6::PZ, "south");
        let east = Block::new("east", [3, 4, 8]).parent([0, 0, 0], Face6::NX);
        let south = Block::new("south", [8, 4, 3]).parent([0, 0, 0], Face6::NZ);
        let pools = registry([
            ("start", pool([root.clone()])),
            ("east", pool([east.clone()])),
            ("south", pool([south.clone()])),
        ]);
        assert_eq!(
            run(&pools, &params(3)),
            vec![
                ("root", b([0, 0, 0], [3, 3, 3]), 0),
                ("east", b([4, 0, 0], [6, 3, 7]), 1),
            ]
        );

        // and in the other order, the other sibling wins
        let mut reversed = root;
        reversed.children.reverse();
        let pools = registry([
            ("start", pool([reversed])),
            ("east", pool([east])),
            ("south", pool([south])),
        ]);
        assert_eq!(
            run(&pools, &params(3)),
            vec![
                ("root", b([0, 0, 0], [3, 3, 3]), 0),
                ("south", b([0, 0, 4], [7, 3, 6]), 1),
            ]
        );
    }

    #[test]
    fn midpoint_rounds_toward_zero() {
        assert_eq!(midpoint(2, 5), 3);
        assert_eq!(midpoint(-5, -2), -3);
        assert_eq!(midpoint(-3, 0), -1);
        assert_eq!(midpoint(i32::MIN, i32::MAX), 0);
    }

    #[test]
    fn total_bounds_centered_on_negative_root() {
        // Root spans x = -5..=-2, so the structure is centered on x = -3 and may reach x = 0.
        let pools = registry([
            (
                "start",
                pool([Block::new("root", [4, 1, 1]).child([3, 0, 0], Face6::PX, "east")]),
            ),
            (
                "east",
                pool([Block::new("segment", [2, 1, 1]).parent([0, 0, 0], Face6::NX)]),
            ),
        ]);
        let params = AssemblyParams {
            size: 1,
            max_distance_from_center: MaxDistance::uniform(3),
            ..AssemblyParams::new("start")
        };
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let pieces: Vec<(Label, CellBox)> =
            assemble(&pools, &params, Cell::new(-5, 0, -5), &mut rng)
                .unwrap()
                .unwrap()
                .pieces()
                .iter()
                .map(|piece| (piece.filler, piece.bounds))
                .collect();
        assert_eq!(
            pieces,
            vec![
                ("root", b([-5, 0, -5], [-2, 0, -5])),
                ("segment", b([-1, 0, -5], [0, 0, -5])),
            ]
        );
    }

    #[test]
    fn size_zero_places_only_root() {
        let root = Block::new("root", [4, 4, 4])
            .child([3, 0, 0], Face6::PX, "east")
            .child([0, 0, 0], Face6::NX, "east")
            .child([0, 0, 3], Face6::PZ, "east");
        let pools = registry([
            ("start", pool([root])),
            (
                "east",
                pool([Block::new("child", [1, 1, 1]).parent([0, 0, 0], Face6::NX)]),
            ),
        ]);
        assert_eq!(
            run(&pools, &params(0)),
            vec![("root", b([0, 0, 0], [3, 3, 3]), 0)]
        );
    }

    /// A corridor segment which continues in the same pool, with a cap as fallback.
    fn corridor_pools() -> PoolRegistry<Label> {
        let segment = Block::new("segment", [2, 1, 1])
            .parent([0, 0, 0], Face6::NX)
            .child([1, 0, 0], Face6::PX, "corridor");
        let cap = Block::new("cap", [1, 1, 1]).parent([0, 0, 0], Face6::NX);
        registry([
            (
                "start",
                pool([Block::new("root", [1, 1, 1]).child([0, 0, 0], Face6::PX, "corridor")]),
            ),
            ("corridor", pool([segment]).with_fallback("caps")),
            ("caps", pool([cap])),
        ])
    }

    #[test]
    fn fallback_only_beyond_max_depth() {
        assert_eq!(
            run(&corridor_pools(), &params(2)),
            vec![
                ("root", b([0, 0, 0], [0, 0, 0]), 0),
                ("segment", b([1, 0, 0], [2, 0, 0]), 1),
                ("segment", b([3, 0, 0], [4, 0, 0]), 2),
                ("cap", b([5, 0, 0], [5, 0, 0]), 3),
            ]
        );
    }

    #[test]
    fn fallback_when_primary_does_not_fit() {
        // The corridor reaches the edge of the space, where only the cap fits.
        let mut params = params(100);
        params.max_distance_from_center = MaxDistance::uniform(5);
        let pieces = run(&corridor_pools(), &params);
        assert_eq!(
            pieces.last(),
            Some(&("cap", b([5, 0, 0], [5, 0, 0]), 3))
        );
        assert_eq!(pieces.len(), 4);
    }

    #[test]
    fn missing_or_invalid_pools_are_skipped() {
        let pools = registry([
            (
                "start",
                pool([Block::new("root", [1, 1, 1])
                    .child([0, 0, 0], Face6::PX, "nonexistent")
                    .child([0, 0, 0], Face6::NX, "hollow")
                    .child([0, 0, 0], Face6::PZ, "bad_fallback")
                    .child([0, 0, 0], Face6::NZ, "good")]),
            ),
            ("hollow", Pool::empty()),
            (
                "bad_fallback",
                pool([Block::new("x", [1, 1, 1]).parent([0, 0, 0], Face6::PZ)])
                    .with_fallback("nonexistent"),
            ),
            (
                "good",
                pool([Block::new("good", [1, 1, 1]).parent([0, 0, 0], Face6::PZ)]),
            ),
        ]);
        assert_eq!(
            run(&pools, &params(1)),
            vec![
                ("root", b([0, 0, 0], [0, 0, 0]), 0),
                ("good", b([0, 0, -1], [0, 0, -1]), 1),
            ]
        );
    }

    #[test]
    fn empty_entry_stops_before_fallback() {
        let cap = Block::new("cap", [1, 1, 1]).parent([0, 0, 0], Face6::NX);
        let mut pools = registry([
            (
                "start",
                pool([Block::new("root", [1, 1, 1]).child([0, 0, 0], Face6::PX, "stop")]),
            ),
            ("caps", pool([cap])),
        ]);
        pools
            .insert(
                "stop",
                Pool::new([(1, PoolEntry::Empty)]).unwrap().with_fallback("caps"),
            )
            .unwrap();
        assert_eq!(run(&pools, &params(1)).len(), 1);
    }

    #[test]
    fn inward_socket_uses_piece_space() {
        // The root's socket points at its own interior, which is not free in the total space.
        let pools = registry([
            (
                "start",
                pool([Block::new("root", [6, 1, 1]).child([0, 0, 0], Face6::PX, "inner")]),
            ),
            (
                "inner",
                pool([Block::new("inner", [2, 1, 1]).parent([0, 0, 0], Face6::NX)]),
            ),
        ]);
        assert_eq!(
            run(&pools, &params(1)),
            vec![
                ("root", b([0, 0, 0], [5, 0, 0]), 0),
                ("inner", b([1, 0, 0], [2, 0, 0]), 1),
            ]
        );
    }

    #[test]
    fn inward_socket_cannot_escape_piece() {
        let pools = registry([
            (
                "start",
                pool([Block::new("root", [3, 1, 1]).child([0, 0, 0], Face6::PX, "inner")]),
            ),
            (
                "inner",
                pool([Block::new("inner", [4, 1, 1]).parent([0, 0, 0], Face6::NX)]),
            ),
        ]);
        assert_eq!(run(&pools, &params(1)).len(), 1);
    }

    /// Records how many pending sockets it saw, and attaches a single cell with one onward
    /// socket.
    #[derive(Debug, Default)]
    struct Probe {
        seen: Mutex<Vec<(Cell, bool, usize)>>,
    }

    impl PieceGenerator<Label> for Arc<Probe> {
        fn bake(&self, context: &mut BakeContext<'_, Label>) -> Option<Candidate<Label>> {
            let parent = context.parent?;
            let was_computed = context.pending.is_computed();
            let pending = context.pending.get().len();
            self.seen
                .lock()
                .unwrap()
                .push((parent.target_cell(), was_computed, pending));
            let front = parent.orientation.front;
            let mut candidate = Candidate::new("probe", CellBox::single_cell(Cell::ORIGIN));
            candidate.add_parent_or_child(
                ParentSocket::new(Cell::ORIGIN, Orientation::horizontal(front.opposite()), "door"),
                JointType::Rigid,
                Name::EMPTY,
                Name::EMPTY,
            );
            candidate.children.push(ChildSocket {
                position: Cell::ORIGIN,
                orientation: Orientation::horizontal(front),
                joint: JointType::Rigid,
                pool: "probe".into(),
                target: "door".into(),
            });
            Some(candidate)
        }
    }

    #[test]
    fn pending_sockets_visible_to_generator() {
        let probe = Arc::new(Probe::default());
        let pools = registry([
            (
                "start",
                pool([Block::new("root", [1, 1, 1])
                    .child([0, 0, 0], Face6::PX, "probe")
                    .child([0, 0, 0], Face6::NX, "probe")]),
            ),
            ("probe", Pool::new([(1, PoolEntry::generator(probe.clone()))]).unwrap()),
        ]);
        let pieces = run(&pools, &params(1));
        assert_eq!(pieces.len(), 3);
        assert_eq!(
            *probe.seen.lock().unwrap(),
            vec![
                // nothing else is queued while the root is being processed
                (Cell::new(1, 0, 0), false, 0),
                // the first probe's onward socket is pending
                (Cell::new(-1, 0, 0), false, 1),
            ]
        );
    }

    #[test]
    fn priority_then_insertion_order() {
        let task = |placement_priority, sequence| PlacementTask {
            piece_bounds: CellBox::single_cell(Cell::ORIGIN),
            children: vec![],
            space: SpaceId::TOTAL,
            depth: 0,
            placement_priority,
            sequence,
        };
        let mut queue = BinaryHeap::from([
            task(0, 0),
            task(5, 1),
            task(-1, 2),
            task(5, 3),
            task(0, 4),
        ]);
        let mut order = Vec::new();
        while let Some(t) = queue.pop() {
            order.push((t.placement_priority, t.sequence));
        }
        assert_eq!(order, vec![(5, 1), (5, 3), (0, 0), (0, 4), (-1, 2)]);
    }

    #[test]
    fn placement_priority_expands_branch_first() {
        // Two corridors leave the root. Pieces attached by an urgent socket are expanded first,
        // so the eastward corridor is finished before the westward one takes its second step.
        let urgent = |mut block: Block| {
            for parent in &mut block.parents {
                parent.placement_priority = 10;
            }
            block
        };
        let pools = registry([
            (
                "start",
                pool([Block::new("root", [1, 1, 1])
                    .child([0, 0, 0], Face6::NX, "west")
                    .child([0, 0, 0], Face6::PX, "east")]),
            ),
            (
                "west",
                pool([Block::new("west", [1, 1, 1])
                    .parent([0, 0, 0], Face6::PX)
                    .child([0, 0, 0], Face6::NX, "west")]),
            ),
            (
                "east",
                pool([urgent(
                    Block::new("east", [1, 1, 1])
                        .parent([0, 0, 0], Face6::NX)
                        .child([0, 0, 0], Face6::PX, "east"),
                )]),
            ),
        ]);
        let labels = run(&pools, &params(3))
            .into_iter()
            .map(|(label, _, depth)| (label, depth))
            .collect::<Vec<_>>();
        assert_eq!(
            labels,
            vec![
                ("root", 0),
                ("west", 1),
                ("east", 1),
                ("east", 2),
                ("east", 3),
                ("west", 2),
                ("west", 3),
            ]
        );
    }

    /// A bar of random length, attached at its west end, with a socket at its east end and
    /// one on its south side.
    #[derive(Debug)]
    struct RandomBar;

    impl PieceGenerator<Label> for RandomBar {
        fn bake(&self, context: &mut BakeContext<'_, Label>) -> Option<Candidate<Label>> {
            let length = context.rng.random_range(1..=4);
            let mut block = Block::new("bar", [length, 1, 1])
                .parent([0, 0, 0], Face6::NX)
                .child([length - 1, 0, 0], Face6::PX, "bars");
            if context.rng.random_bool(0.5) {
                block = block.child([0, 0, 0], Face6::PZ, "bars");
            }
            block.bake(context)
        }
    }

    #[test]
    fn deterministic_for_seed() {
        let mut pools = registry([(
            "start",
            pool([Block::new("root", [1, 1, 1]).child([0, 0, 0], Face6::PX, "bars")]),
        )]);
        pools
            .insert("bars", Pool::new([(1, PoolEntry::generator(RandomBar))]).unwrap())
            .unwrap();
        let assemble_with_seed = |seed| {
            let mut rng = Xoshiro256Plus::seed_from_u64(seed);
            let structure = assemble(&pools, &params(6), Cell::new(5, 5, 5), &mut rng)
                .unwrap()
                .unwrap();
            structure
                .pieces()
                .iter()
                .map(|p| (p.bounds, p.depth, p.rotation))
                .collect::<Vec<_>>()
        };
        let first = assemble_with_seed(1);
        assert!(first.len() > 2, "{first:?}");
        assert_eq!(first, assemble_with_seed(1));

        // all pieces are disjoint
        for (i, a) in first.iter().enumerate() {
            for b in &first[i + 1..] {
                assert!(!a.0.intersects(b.0), "{a:?} {b:?}");
            }
        }
    }

    #[test]
    fn root_is_anchored() {
        let pools = registry([("start", pool([Block::new("root", [2, 3, 4])]))]);
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let structure = assemble(&pools, &params(3), Cell::new(10, 20, 30), &mut rng)
            .unwrap()
            .unwrap();
        assert_eq!(structure.bounding_box(), b([10, 20, 30], [11, 22, 33]));
    }

    #[test]
    fn root_outside_world_limits() {
        let pools = registry([("start", pool([Block::new("root", [2, 3, 4])]))]);
        let mut params = params(3);
        params.world_limits = Some(b([-100, 0, -100], [100, 1, 100]));
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        assert_eq!(
            assemble(&pools, &params, Cell::ORIGIN, &mut rng),
            Ok(None)
        );
    }

    #[test]
    fn world_limits_confine_children() {
        let mut params = params(100);
        params.world_limits = Some(b([-100, -100, -100], [3, 100, 100]));
        let pieces = run(&corridor_pools(), &params);
        assert_eq!(
            pieces.iter().map(|&(label, _, _)| label).collect::<Vec<_>>(),
            vec!["root", "segment", "cap"]
        );
    }

    #[test]
    fn start_pool_problems() {
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        let mut pools = registry([("hollow", Pool::empty())]);
        pools
            .insert("stop", Pool::new([(1, PoolEntry::Empty)]).unwrap())
            .unwrap();

        let mut assemble_from = |name: &str| {
            assemble(&pools, &AssemblyParams::new(name), Cell::ORIGIN, &mut rng).map(|s| s.is_some())
        };
        assert_eq!(
            assemble_from("missing"),
            Err(AssembleError::MissingStartPool("missing".into()))
        );
        assert_eq!(
            assemble_from("hollow"),
            Err(AssembleError::EmptyStartPool("hollow".into()))
        );
        assert_eq!(assemble_from("stop"), Ok(false));
    }

    #[test]
    fn params_validation() {
        let mut params = AssemblyParams::new("x");
        assert_eq!(params.validate(), Ok(()));
        params.max_distance_from_center = MaxDistance {
            horizontal: 129,
            vertical: 10,
        };
        assert_eq!(params.validate(), Err(ParamsError::HorizontalDistance(129)));
        params.max_distance_from_center = MaxDistance {
            horizontal: 10,
            vertical: 0,
        };
        assert_eq!(params.validate(), Err(ParamsError::VerticalDistance(0)));

        let pools = PoolRegistry::<Label>::new();
        let mut rng = Xoshiro256Plus::seed_from_u64(0);
        assert_eq!(
            assemble(&pools, &params, Cell::ORIGIN, &mut rng),
            Err(AssembleError::Params(ParamsError::VerticalDistance(0)))
        );
    }

    #[test]
    fn params_from_json() {
        let params: AssemblyParams = serde_json::from_str(
            r#"{"start_pool": "demo:rooms", "max_distance_from_center": 40}"#,
        )
        .unwrap();
        assert_eq!(
            params,
            AssemblyParams {
                max_distance_from_center: MaxDistance::uniform(40),
                ..AssemblyParams::new("demo:rooms")
            }
        );

        let params: AssemblyParams = serde_json::from_str(
            r#"{
                "start_pool": "a",
                "size": 3,
                "max_distance_from_center": {"horizontal": 10, "vertical": 200},
                "liquid_settings": "apply_waterlogging",
                "world_limits": {"lower": [0, -64, 0], "upper": [100, 320, 100]}
            }"#,
        )
        .unwrap();
        assert_eq!(params.size, 3);
        assert_eq!(
            params.max_distance_from_center,
            MaxDistance {
                horizontal: 10,
                vertical: 200
            }
        );
        assert_eq!(params.liquid_settings, LiquidSettings::ApplyWaterlogging);
        assert_eq!(params.world_limits, Some(b([0, -64, 0], [100, 320, 100])));
    }
}
