//! The interface by which piece templates propose pieces: [`PieceGenerator`].

use core::cell::OnceCell;
use core::fmt;

use rand::RngCore;

use crate::Name;
use crate::math::{CellBox, GridVector, Rotation};
use crate::pool::PoolRegistry;
use crate::socket::{ChildSocket, JointType, ParentSocket};
use crate::space::AvailableSpace;

/// A template for pieces, whose [`bake()`](Self::bake) method proposes one [`Candidate`]
/// each time it is called.
///
/// `F` is the type of the content descriptor (“filler”) the candidates carry.
///
/// Generators are free to randomize anything about the candidate, including the size of its
/// box, using [`BakeContext::rng`]; the assembler decides whether it fits.
pub trait PieceGenerator<F>: fmt::Debug + Send + Sync {
    /// Proposes a piece given the circumstances described by `context`.
    ///
    /// Returns [`None`] if this generator has nothing to offer, which is treated the same as
    /// a candidate that fits nowhere.
    ///
    /// The returned candidate's sockets must be located within its
    /// [`local_bounds`](Candidate::local_bounds), in the same coordinate system. Candidates
    /// which violate this may be rejected or accepted arbitrarily.
    fn bake(&self, context: &mut BakeContext<'_, F>) -> Option<Candidate<F>>;
}

/// Everything a [`PieceGenerator`] may consult while baking.
#[allow(clippy::exhaustive_structs)]
pub struct BakeContext<'a, F> {
    /// Source of all randomness for the bake.
    ///
    /// Generators must not use any other source, or assembly will not be reproducible.
    pub rng: &'a mut dyn RngCore,

    /// Free space the piece must fit within, in world coordinates.
    ///
    /// When the parent socket points into its own piece, this covers only that piece.
    pub remaining_space: &'a dyn AvailableSpace,

    /// The socket the piece will be attached to, in world coordinates, or [`None`] when
    /// baking the first piece of a structure.
    pub parent: Option<&'a ChildSocket>,

    /// Other child sockets elsewhere in the structure which are still open.
    pub pending: &'a PendingSockets<'a>,

    /// Rotation the generator should apply to the piece it proposes.
    pub rotation: Rotation,

    /// How placed content should treat preexisting liquid.
    pub liquid_settings: LiquidSettings,

    /// All pools, for generators which delegate to other pools.
    pub pools: &'a PoolRegistry<F>,
}

impl<F> fmt::Debug for BakeContext<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BakeContext")
            .field("parent", &self.parent)
            .field("pending", &self.pending)
            .field("rotation", &self.rotation)
            .field("liquid_settings", &self.liquid_settings)
            .finish_non_exhaustive()
    }
}

/// Lazily computed list of the child sockets of a structure which are still open, for
/// generators that want to connect back to one.
///
/// Computing the list requires a scan of all pending work, so it is done only if
/// [`get()`](Self::get) is called, and at most once.
pub struct PendingSockets<'a> {
    compute: Option<&'a dyn Fn() -> Vec<ChildSocket>>,
    cache: OnceCell<Vec<ChildSocket>>,
}

impl<'a> PendingSockets<'a> {
    /// Constructs a [`PendingSockets`] which will call `compute` when first asked.
    pub fn new(compute: &'a dyn Fn() -> Vec<ChildSocket>) -> Self {
        Self {
            compute: Some(compute),
            cache: OnceCell::new(),
        }
    }

    /// Constructs a [`PendingSockets`] which is always empty.
    pub fn none() -> Self {
        Self {
            compute: None,
            cache: OnceCell::new(),
        }
    }

    /// Returns the open sockets, computing them if this is the first call.
    pub fn get(&self) -> &[ChildSocket] {
        self.cache
            .get_or_init(|| self.compute.map_or_else(Vec::new, |compute| compute()))
    }

    /// Returns whether [`get()`](Self::get) has been called.
    pub fn is_computed(&self) -> bool {
        self.cache.get().is_some()
    }
}

impl fmt::Debug for PendingSockets<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cache.get() {
            Some(sockets) => f.debug_tuple("PendingSockets").field(sockets).finish(),
            None => f.write_str("PendingSockets(<not computed>)"),
        }
    }
}

/// A piece proposed by a [`PieceGenerator`], in local coordinates.
#[derive(Clone, Debug, PartialEq)]
#[allow(clippy::exhaustive_structs)]
pub struct Candidate<F> {
    /// Content descriptor, stored in the [`Piece`](crate::piece::Piece) if this candidate
    /// is placed.
    pub filler: F,

    /// The box the piece occupies.
    ///
    /// This may be in any coordinate system; the candidate is translated so that the
    /// parent socket it is attached by lands on its target cell.
    pub local_bounds: CellBox,

    /// Sockets the piece may be attached by, in the order they should be tried.
    pub parents: Vec<ParentSocket>,

    /// Sockets further pieces may be attached to, in the order they should be processed.
    ///
    /// A child socket at the same position as the parent socket actually used will find its
    /// target cell occupied by the parent piece and be skipped.
    pub children: Vec<ChildSocket>,
}

impl<F> Candidate<F> {
    /// A candidate with no sockets at all.
    pub fn new(filler: F, local_bounds: CellBox) -> Self {
        Self {
            filler,
            local_bounds,
            parents: Vec::new(),
            children: Vec::new(),
        }
    }

    /// A candidate which can be attached but has no children.
    pub fn with_parents(filler: F, local_bounds: CellBox, parents: Vec<ParentSocket>) -> Self {
        Self {
            parents,
            ..Self::new(filler, local_bounds)
        }
    }

    /// A candidate with children but which cannot be attached to anything, which is only
    /// useful as the first piece of a structure.
    pub fn with_children(filler: F, local_bounds: CellBox, children: Vec<ChildSocket>) -> Self {
        Self {
            children,
            ..Self::new(filler, local_bounds)
        }
    }

    #[allow(missing_docs)]
    pub fn with_parents_and_children(
        filler: F,
        local_bounds: CellBox,
        parents: Vec<ParentSocket>,
        children: Vec<ChildSocket>,
    ) -> Self {
        Self {
            filler,
            local_bounds,
            parents,
            children,
        }
    }

    /// Adds a socket which may serve either as this piece's parent socket or as a child
    /// socket, at the same position and orientation.
    ///
    /// Either half is omitted if it uses [`Name::EMPTY`]: the parent half if `parent.name`
    /// is empty, and the child half if `pool` or `target` is.
    pub fn add_parent_or_child(
        &mut self,
        parent: ParentSocket,
        joint: JointType,
        pool: Name,
        target: Name,
    ) {
        if !target.is_empty_name() && !pool.is_empty_name() {
            self.children.push(ChildSocket {
                position: parent.position,
                orientation: parent.orientation,
                joint,
                pool,
                target,
            });
        }
        if !parent.name.is_empty_name() {
            self.parents.push(parent);
        }
    }

    /// Returns [`Self::local_bounds`] translated by `offset`.
    pub fn bounds_at(&self, offset: GridVector) -> CellBox {
        self.local_bounds.translate(offset)
    }

    /// Returns [`Self::children`] translated by `offset`.
    pub fn children_at(&self, offset: GridVector) -> Vec<ChildSocket> {
        self.children
            .iter()
            .map(|socket| socket.moved(offset))
            .collect()
    }
}

/// Whether placed blocks should take on liquid already present in the world where they are
/// placed.
///
/// This is carried from [`AssemblyParams`](crate::assemble::AssemblyParams) into each
/// [`Piece`](crate::piece::Piece) for its filler to respect.
#[expect(clippy::exhaustive_enums)]
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LiquidSettings {
    /// Placed content replaces liquid.
    #[default]
    IgnoreWaterlogging,
    /// Placed content that can hold liquid keeps liquid already present.
    ApplyWaterlogging,
}
