//! Committed pieces, and writing their content into an output world.

use core::fmt;

use serde::de::Error as _;

use crate::generator::LiquidSettings;
use crate::math::{CellBox, Rotation};

/// A piece which has been placed in a [`Structure`].
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[expect(clippy::exhaustive_structs)]
pub struct Piece<F> {
    /// Descriptor of the piece's content, as produced by its generator.
    pub filler: F,
    /// The box the piece occupies, in world coordinates.
    pub bounds: CellBox,
    /// The rotation the piece was generated with.
    pub rotation: Rotation,
    /// Number of pieces between this one and the first piece; 0 for the first piece.
    pub depth: u32,
    #[allow(missing_docs)]
    pub liquid_settings: LiquidSettings,
}

impl<F> Piece<F> {
    /// Returns the context for filling the part of this piece within `region`, or [`None`]
    /// if the piece does not overlap `region`.
    pub fn fill_context(&self, region: CellBox) -> Option<FillContext> {
        let writable = region.intersection(self.bounds)?;
        Some(FillContext {
            region,
            piece_bounds: self.bounds,
            writable,
            rotation: self.rotation,
            depth: self.depth,
            liquid_settings: self.liquid_settings,
        })
    }

    /// Writes the part of this piece within `region` into `world`.
    ///
    /// Returns whether the piece overlapped `region` at all.
    pub fn fill<W: ?Sized>(&self, region: CellBox, world: &mut W) -> bool
    where
        F: Filler<W>,
    {
        match self.fill_context(region) {
            Some(context) => {
                self.filler.fill(&context, world);
                true
            }
            None => false,
        }
    }
}

/// Content descriptor of a [`Piece`], capable of writing that content into a world of type
/// `W`.
///
/// Fillers are invoked after assembly is complete, once for each region of the world being
/// produced that overlaps the piece. Therefore, a filler must produce the same content in
/// a cell no matter which region it is filling, and must not make random choices unless they
/// are determined by data stored in the filler.
pub trait Filler<W: ?Sized> {
    /// Writes the content of the piece into `world`, within [`FillContext::writable()`].
    fn fill(&self, context: &FillContext, world: &mut W);
}

/// Where and how a [`Filler`] is to write.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FillContext {
    region: CellBox,
    piece_bounds: CellBox,
    writable: CellBox,
    rotation: Rotation,
    depth: u32,
    liquid_settings: LiquidSettings,
}

impl FillContext {
    /// The region of the world being produced.
    pub fn region(&self) -> CellBox {
        self.region
    }

    /// The box of the piece being filled.
    pub fn piece_bounds(&self) -> CellBox {
        self.piece_bounds
    }

    /// The cells which should be written: the intersection of the region and the piece.
    pub fn writable(&self) -> CellBox {
        self.writable
    }

    #[allow(missing_docs)]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[allow(missing_docs)]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[allow(missing_docs)]
    pub fn liquid_settings(&self) -> LiquidSettings {
        self.liquid_settings
    }
}

/// A [`Filler`] which writes nothing.
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EmptyFiller;

impl<W: ?Sized> Filler<W> for EmptyFiller {
    fn fill(&self, _: &FillContext, _: &mut W) {}
}

/// The result of assembly: a nonempty list of pieces which do not overlap.
///
/// Serializes as the list of pieces.
#[derive(Clone, Eq, PartialEq)]
pub struct Structure<F> {
    pieces: Vec<Piece<F>>,
    bounds: CellBox,
}

impl<F> Structure<F> {
    /// Constructs a [`Structure`] from its pieces, or returns [`None`] if there are none.
    ///
    /// The pieces are not checked for overlap.
    pub fn from_pieces(pieces: Vec<Piece<F>>) -> Option<Self> {
        let bounds = pieces
            .iter()
            .map(|piece| piece.bounds)
            .reduce(CellBox::union)?;
        Some(Self { pieces, bounds })
    }

    /// Returns the pieces, in the order they were placed.
    pub fn pieces(&self) -> &[Piece<F>] {
        &self.pieces
    }

    #[allow(missing_docs)]
    pub fn into_pieces(self) -> Vec<Piece<F>> {
        self.pieces
    }

    /// Returns the smallest box containing all pieces.
    pub fn bounding_box(&self) -> CellBox {
        self.bounds
    }

    /// Writes the content of every piece overlapping `region` into `world`.
    ///
    /// Returns the number of pieces that overlapped.
    pub fn fill_region<W: ?Sized>(&self, region: CellBox, world: &mut W) -> usize
    where
        F: Filler<W>,
    {
        self.pieces
            .iter()
            .filter(|piece| piece.fill(region, world))
            .count()
    }
}

impl<F: fmt::Debug> fmt::Debug for Structure<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Structure")
            .field("bounds", &self.bounds)
            .field("pieces", &self.pieces)
            .finish()
    }
}

impl<F: serde::Serialize> serde::Serialize for Structure<F> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.pieces.serialize(serializer)
    }
}

impl<'de, F: serde::Deserialize<'de>> serde::Deserialize<'de> for Structure<F> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pieces = Vec::<Piece<F>>::deserialize(deserializer)?;
        Structure::from_pieces(pieces)
            .ok_or_else(|| D::Error::custom("a structure must have at least one piece"))
    }
}
