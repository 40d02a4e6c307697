//! Sockets: the connectors by which pieces attach to each other.
//!
//! Every placed piece may offer [`ChildSocket`]s, each of which may have one further piece
//! attached to it. A candidate piece offers [`ParentSocket`]s, any one of which may be used to
//! attach it to a [`ChildSocket`]. The two are compatible, as decided by
//! [`ChildSocket::can_attach()`], when they face each other and their names agree.

use rand::Rng;
use rand::seq::SliceRandom as _;

use crate::Name;
use crate::math::{Cell, Face6, GridVector, Rotation};

/// How a socket faces.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
#[expect(clippy::exhaustive_structs)]
pub struct Orientation {
    /// The direction the socket points in, towards the piece it connects to.
    pub front: Face6,
    /// Which way is “up” for the socket. Only significant for [`JointType::Rigid`] joints.
    pub top: Face6,
}

impl Orientation {
    /// An orientation pointing in the horizontal direction `front` with +Y as up.
    pub const fn horizontal(front: Face6) -> Self {
        Self {
            front,
            top: Face6::PY,
        }
    }

    /// Returns this orientation with both directions rotated.
    #[must_use]
    pub const fn rotated(self, rotation: Rotation) -> Self {
        Self {
            front: rotation.rotate_face(self.front),
            top: rotation.rotate_face(self.top),
        }
    }
}

/// Whether a [`ChildSocket`] cares about the “up” direction of the socket attached to it.
#[expect(clippy::exhaustive_enums)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointType {
    /// The tops of both sockets must agree.
    #[default]
    Rigid,
    /// The attached socket may have any top.
    Rollable,
}

/// A socket on a placed piece to which a further (child) piece may be attached.
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
#[expect(clippy::exhaustive_structs)]
pub struct ChildSocket {
    /// Position of the socket. This is a cell of the piece which owns it, in whatever
    /// coordinate system that piece's box is expressed in.
    pub position: Cell,
    /// Facing of the socket.
    pub orientation: Orientation,
    /// Whether the attached socket's top must match.
    pub joint: JointType,
    /// Pool to draw child pieces from.
    pub pool: Name,
    /// Name which the child's [`ParentSocket`] must have.
    pub target: Name,
}

impl ChildSocket {
    /// The cell a child piece's parent socket must occupy: one step from this socket's
    /// position along its facing.
    pub fn target_cell(&self) -> Cell {
        self.position.adjacent(self.orientation.front)
    }

    /// Returns this socket with its position translated by `offset`.
    #[must_use]
    pub fn moved(&self, offset: GridVector) -> Self {
        Self {
            position: self.position + offset,
            ..self.clone()
        }
    }

    /// Returns this socket rotated about `pivot`.
    #[must_use]
    pub fn rotated_about(&self, rotation: Rotation, pivot: Cell) -> Self {
        Self {
            position: rotation.rotate_cell_about(self.position, pivot),
            orientation: self.orientation.rotated(rotation),
            ..self.clone()
        }
    }

    /// Returns whether `candidate`, a socket of a prospective child piece, may be attached to
    /// this socket.
    ///
    /// This requires that the sockets face each other, that their tops agree unless this
    /// socket's joint is [`JointType::Rollable`], and that the candidate's name is this
    /// socket's target.
    ///
    /// ```
    /// use piecework::math::{Cell, Face6};
    /// use piecework::socket::{ChildSocket, JointType, Orientation, ParentSocket};
    ///
    /// let child = ChildSocket {
    ///     position: Cell::new(3, 1, 2),
    ///     orientation: Orientation::horizontal(Face6::PX),
    ///     joint: JointType::Rigid,
    ///     pool: "demo:rooms".into(),
    ///     target: "door".into(),
    /// };
    /// let parent = ParentSocket::new(Cell::ORIGIN, Orientation::horizontal(Face6::NX), "door");
    /// assert!(child.can_attach(&parent));
    /// ```
    pub fn can_attach(&self, candidate: &ParentSocket) -> bool {
        self.orientation.front == candidate.orientation.front.opposite()
            && (self.joint == JointType::Rollable
                || self.orientation.top == candidate.orientation.top)
            && self.target == candidate.name
    }
}

/// A socket by which a candidate piece may be attached to an existing [`ChildSocket`].
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize)]
#[expect(clippy::exhaustive_structs)]
pub struct ParentSocket {
    /// Position of the socket, in the candidate piece's local coordinates.
    pub position: Cell,
    /// Facing of the socket, pointing towards the parent piece.
    pub orientation: Orientation,
    /// Name which a [`ChildSocket`] must target to attach to this socket.
    pub name: Name,
    /// Once the piece is attached by this socket, its own child sockets are processed before
    /// those of pieces with lower priority.
    pub placement_priority: i32,
}

impl ParentSocket {
    /// The placement priority of sockets which do not ask for one.
    pub const DEFAULT_PLACEMENT_PRIORITY: i32 = 0;

    /// Constructs a [`ParentSocket`] with [`Self::DEFAULT_PLACEMENT_PRIORITY`].
    pub fn new(position: Cell, orientation: Orientation, name: impl Into<Name>) -> Self {
        Self {
            position,
            orientation,
            name: name.into(),
            placement_priority: Self::DEFAULT_PLACEMENT_PRIORITY,
        }
    }

    /// Returns this socket with its position translated by `offset`.
    #[must_use]
    pub fn moved(&self, offset: GridVector) -> Self {
        Self {
            position: self.position + offset,
            ..self.clone()
        }
    }
}

/// A [`ParentSocket`] with a priority for being tried earlier than others of the same piece.
#[derive(Clone, Debug, Eq, PartialEq)]
#[expect(clippy::exhaustive_structs)]
pub struct SelectableParentSocket {
    #[allow(missing_docs)]
    pub socket: ParentSocket,
    /// Higher values are tried first.
    pub selection_priority: i32,
}

/// Shuffles `sockets`, then stably orders them by descending selection priority, and returns
/// the sockets in that order.
///
/// Sockets of equal selection priority therefore end up in random order relative to each
/// other.
pub fn sort_by_selection_priority<R: Rng + ?Sized>(
    mut sockets: Vec<SelectableParentSocket>,
    rng: &mut R,
) -> Vec<ParentSocket> {
    sockets.shuffle(rng);
    sockets.sort_by_key(|s| core::cmp::Reverse(s.selection_priority));
    sockets.into_iter().map(|s| s.socket).collect()
}
