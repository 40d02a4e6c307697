use rand::Rng as _;
use rand::seq::IndexedRandom as _;

use piecework::Name;
use piecework::generator::{BakeContext, Candidate, PieceGenerator};
use piecework::math::{Cell, CellBox, Face6, GridCoordinate, GridVector};
use piecework::piece::{FillContext, Filler};
use piecework::socket::{ChildSocket, JointType, Orientation, ParentSocket};
use piecework::space::AvailableSpace;

use crate::{ContentFiller, Material, SparseCanvas};

/// Produces one-cell-wide corridors, straight or with a single turn at the far end, which
/// sometimes connect back to an open socket elsewhere in the structure instead of growing it
/// further.
///
/// A corridor runs `length` cells away from the socket it is attached to, then, if it turns,
/// `width` further cells to one side. It has a child socket at its far end.
///
/// When attached to a parent, with probability [`loop_chance`](Self::loop_chance) it first
/// looks through the structure's pending sockets for one whose target cell it could reach
/// within its maximum dimensions through free space. If there is one, the corridor ends at
/// that cell instead and has no child socket, which closes a loop.
#[derive(Clone, Debug, PartialEq)]
#[expect(clippy::exhaustive_structs)]
pub struct LooperGenerator {
    /// Probability of trying to close a loop.
    pub loop_chance: f64,
    /// Probability of the corridor turning.
    pub turn_chance: f64,
    /// Minimum length of the straight part, at least 1.
    pub min_length: GridCoordinate,
    /// Maximum length of the straight part.
    pub max_length: GridCoordinate,
    /// Maximum length of the part after the turn. If zero, corridors never turn.
    pub max_width: GridCoordinate,
    /// The corridor is one of these, chosen at random.
    pub materials: Vec<Material>,
    /// Name of the socket the corridor can be attached by.
    pub name: Name,
    /// Pool to draw pieces attached to the far end from.
    pub target_pool: Name,
    /// Name of sockets of pieces attached to the far end.
    pub target_name: Name,
}

impl LooperGenerator {
    fn has_valid_dimensions(&self) -> bool {
        1 <= self.min_length && self.min_length <= self.max_length && self.max_width >= 0
    }

    /// Looks for a pending socket the corridor can reach from `start`, and returns the
    /// corridor ending at its target cell.
    fn close_loop(
        &self,
        pending: &[ChildSocket],
        remaining_space: &dyn AvailableSpace,
        start: Cell,
        start_dir: Face6,
        turning: bool,
        material: Material,
    ) -> Option<Candidate<ContentFiller>> {
        pending.iter().find_map(|target| {
            let facing = target.orientation.front;
            if facing == start_dir || !facing.is_horizontal() {
                return None;
            }
            let end = target.target_cell();
            let end_dir = facing.opposite();
            let offset = end - start;
            if offset.y != 0 {
                return None;
            }

            let along = offset.dot(start_dir.normal_vector());
            if !(0..self.max_length).contains(&along) {
                return None;
            }
            let across = offset - start_dir.normal_vector() * along;
            let width = if end_dir == start_dir {
                if across != GridVector::zero() {
                    return None;
                }
                0
            } else {
                across.dot(end_dir.normal_vector())
            };
            if width < 0 || width > self.max_width || (width > 0 && !turning) {
                return None;
            }

            let bounds = CellBox::from_corners(start, end);
            if !remaining_space.contains(bounds) {
                return None;
            }
            log::trace!("corridor from {start:?} closes loop at {end:?}");
            // The end is sealed by the piece at the target socket, so no child socket.
            Some(Candidate::with_parents(
                ContentFiller::Looper(LooperFiller::new(
                    bounds,
                    start,
                    start_dir,
                    end_dir,
                    along + 1,
                    width,
                    material,
                )),
                bounds,
                vec![self.parent_socket(start, start_dir)],
            ))
        })
    }

    fn parent_socket(&self, start: Cell, start_dir: Face6) -> ParentSocket {
        ParentSocket::new(
            start,
            Orientation {
                front: start_dir.opposite(),
                top: Face6::PY,
            },
            self.name.clone(),
        )
    }
}

impl PieceGenerator<ContentFiller> for LooperGenerator {
    fn bake(
        &self,
        context: &mut BakeContext<'_, ContentFiller>,
    ) -> Option<Candidate<ContentFiller>> {
        if !self.has_valid_dimensions() {
            log::warn!(
                "corridor dimensions are invalid: length {}..={}, width {}",
                self.min_length,
                self.max_length,
                self.max_width
            );
            return None;
        }

        // The corridor starts in the cell the parent socket targets, heading away from it.
        let (start, start_dir) = match context.parent {
            None => (
                Cell::ORIGIN,
                context.rotation.rotate_face(Face6::NZ).opposite(),
            ),
            Some(parent) => (parent.target_cell(), parent.orientation.front),
        };

        let rng = &mut *context.rng;
        let try_loop = context.parent.is_some() && rng.random::<f64>() < self.loop_chance;
        let turning = rng.random::<f64>() < self.turn_chance
            && self.max_width > 0
            && start_dir.is_horizontal();
        let length = rng.random_range(self.min_length..=self.max_length);
        let width = if turning {
            rng.random_range(1..=self.max_width)
        } else {
            0
        };
        let end_dir = if !turning {
            start_dir
        } else if rng.random_range(0..3) == 0 {
            start_dir.clockwise()
        } else {
            start_dir.counterclockwise()
        };
        let material = *self.materials.choose(rng)?;

        if try_loop {
            if let Some(candidate) = self.close_loop(
                context.pending.get(),
                context.remaining_space,
                start,
                start_dir,
                turning,
                material,
            ) {
                return Some(candidate);
            }
        }

        let end = start.relative(start_dir, length - 1).relative(end_dir, width);
        let bounds = CellBox::from_corners(start, end);
        Some(Candidate::with_parents_and_children(
            ContentFiller::Looper(LooperFiller::new(
                bounds, start, start_dir, end_dir, length, width, material,
            )),
            bounds,
            vec![self.parent_socket(start, start_dir)],
            vec![ChildSocket {
                position: end,
                orientation: Orientation {
                    front: end_dir,
                    top: Face6::PY,
                },
                joint: JointType::Rigid,
                pool: self.target_pool.clone(),
                target: self.target_name.clone(),
            }],
        ))
    }
}

/// Fills a corridor made by [`LooperGenerator`].
///
/// The first cell of the corridor is always [`Material::Cobble`], marking the entrance.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
#[expect(clippy::exhaustive_structs)]
pub struct LooperFiller {
    /// First cell, relative to the lower corner of the piece.
    ///
    /// Stored relative so that the filler is unaffected by where the piece is placed.
    pub start: Cell,
    /// Direction of the straight part.
    pub start_dir: Face6,
    /// Direction of the part after the turn.
    pub end_dir: Face6,
    /// Number of cells in the straight part, including the first.
    pub length: GridCoordinate,
    /// Number of cells after the turn.
    pub width: GridCoordinate,
    #[allow(missing_docs)]
    pub material: Material,
}

impl LooperFiller {
    fn new(
        bounds: CellBox,
        start: Cell,
        start_dir: Face6,
        end_dir: Face6,
        length: GridCoordinate,
        width: GridCoordinate,
        material: Material,
    ) -> Self {
        Self {
            start: Cell::ORIGIN + (start - bounds.lower()),
            start_dir,
            end_dir,
            length,
            width,
            material,
        }
    }
}

impl Filler<SparseCanvas> for LooperFiller {
    fn fill(&self, context: &FillContext, canvas: &mut SparseCanvas) {
        let writable = context.writable();
        let start = context.piece_bounds().lower() + self.start.to_vector();
        let mut put = |cell: Cell, material: Material| {
            if writable.contains_cell(cell) {
                canvas.set(cell, material);
            }
        };

        for i in 0..self.length {
            let material = if i == 0 {
                Material::Cobble
            } else {
                self.material
            };
            put(start.relative(self.start_dir, i), material);
        }
        let corner = start.relative(self.start_dir, self.length - 1);
        for i in 1..=self.width {
            put(corner.relative(self.end_dir, i), self.material);
        }
    }
}
