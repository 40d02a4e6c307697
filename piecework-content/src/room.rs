use rand::Rng;
use rand::seq::IndexedRandom as _;

use piecework::Name;
use piecework::generator::{BakeContext, Candidate, PieceGenerator};
use piecework::math::{Axis, Cell, CellBox, Face6, GridCoordinate};
use piecework::piece::{FillContext, Filler};
use piecework::socket::{JointType, Orientation, ParentSocket};

use crate::{ContentFiller, Material, SparseCanvas};

/// Produces rectangular rooms of random horizontal size, with a doorway socket on at least
/// one side.
///
/// The side facing −Z, after applying the bake rotation, always has a socket, so that every
/// rotation offers a different side to attach by. Each other side has one with probability
/// ½. Every socket may serve either to attach the room or to attach further pieces to it.
#[derive(Clone, Debug, Eq, PartialEq)]
#[expect(clippy::exhaustive_structs)]
pub struct RoomGenerator {
    /// The floor is one of these, chosen at random.
    pub materials: Vec<Material>,
    /// Name of the sockets the room can be attached by.
    pub name: Name,
    /// Pool to draw pieces attached to the room from.
    pub target_pool: Name,
    /// Name of sockets of pieces attached to the room.
    pub target_name: Name,
}

impl RoomGenerator {
    /// Range of the horizontal dimensions of rooms, in cells.
    pub const SIZE_RANGE: core::ops::RangeInclusive<GridCoordinate> = 3..=10;
    /// Height of rooms, in cells.
    pub const HEIGHT: GridCoordinate = 4;

    fn add_socket<R: Rng + ?Sized>(
        &self,
        candidate: &mut Candidate<ContentFiller>,
        face: Face6,
        rng: &mut R,
    ) {
        let position = socket_position(candidate.local_bounds, face, rng);
        candidate.add_parent_or_child(
            ParentSocket::new(position, Orientation::horizontal(face), self.name.clone()),
            JointType::Rigid,
            self.target_pool.clone(),
            self.target_name.clone(),
        );
    }
}

impl PieceGenerator<ContentFiller> for RoomGenerator {
    fn bake(
        &self,
        context: &mut BakeContext<'_, ContentFiller>,
    ) -> Option<Candidate<ContentFiller>> {
        let rng = &mut *context.rng;
        let material = *self.materials.choose(rng)?;
        let size_x = rng.random_range(Self::SIZE_RANGE);
        let size_z = rng.random_range(Self::SIZE_RANGE);
        let bounds =
            CellBox::from_lower_upper([0, 0, 0], [size_x - 1, Self::HEIGHT - 1, size_z - 1]);

        let mut candidate = Candidate::new(ContentFiller::Room(RoomFiller { material }), bounds);
        let mut face = context.rotation.rotate_face(Face6::NZ);
        self.add_socket(&mut candidate, face, rng);
        for _ in 0..3 {
            face = face.clockwise();
            if rng.random_bool(0.5) {
                self.add_socket(&mut candidate, face, rng);
            }
        }
        Some(candidate)
    }
}

/// Picks a cell on the given side of `bounds`, one above the floor.
fn socket_position<R: Rng + ?Sized>(bounds: CellBox, face: Face6, rng: &mut R) -> Cell {
    let lower = bounds.lower();
    let upper = bounds.upper();
    let x = match face {
        Face6::NX => lower.x,
        Face6::PX => upper.x,
        _ => rng.random_range(lower.x..=upper.x),
    };
    let z = match face {
        Face6::NZ => lower.z,
        Face6::PZ => upper.z,
        _ => rng.random_range(lower.z..=upper.z),
    };
    Cell::new(x, lower.y + 1, z)
}

/// Fills a room: a floor of [`Self::material`] and air above it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
#[expect(clippy::exhaustive_structs)]
pub struct RoomFiller {
    #[allow(missing_docs)]
    pub material: Material,
}

impl Filler<SparseCanvas> for RoomFiller {
    fn fill(&self, context: &FillContext, canvas: &mut SparseCanvas) {
        let piece = context.piece_bounds();
        let writable = context.writable();
        let floor = match piece.split(Axis::Y, piece.lower().y + 1) {
            Ok((floor, hall)) => {
                if let Some(hall) = hall.intersection(writable) {
                    hall.for_each_cell(|cell| {
                        canvas.set(cell, Material::Air);
                    });
                }
                floor
            }
            // only one layer tall
            Err(_) => piece,
        };
        if let Some(floor) = floor.intersection(writable) {
            floor.for_each_cell(|cell| {
                canvas.set(cell, self.material);
            });
        }
    }
}
