use core::fmt;

use crate::math::{Cell, CellBox, Octant, OctantMap};
use crate::space::AvailableSpace;

/// The set of cells within some bounding box that have not yet been subtracted from it.
///
/// Internally, this is an octree which is subdivided only where a subtraction partially
/// overlaps a node, so its size depends on how fragmented the free space is rather than on
/// its volume. Once a node becomes entirely occupied it is collapsed to a single empty marker
/// and never reports anything as free again.
///
/// ```
/// use piecework::math::{Cell, CellBox};
/// use piecework::space::{AvailableSpace as _, FreeSpace};
///
/// let mut space = FreeSpace::new(CellBox::from_lower_upper([0, 0, 0], [19, 19, 19]));
/// space.subtract(CellBox::from_lower_upper([0, 0, 0], [3, 3, 3]));
///
/// assert!(!space.contains_cell(Cell::new(3, 3, 3)));
/// assert!(space.contains(CellBox::from_lower_upper([4, 0, 0], [6, 3, 3])));
/// assert!(!space.contains(CellBox::from_lower_upper([3, 0, 0], [6, 3, 3])));
/// ```
#[derive(Clone)]
pub struct FreeSpace {
    root: Node,
}

#[derive(Clone, Debug)]
enum Node {
    /// Nothing in this node is free.
    Empty,
    NonEmpty {
        bounds: CellBox,
        depth: u32,
        /// [`None`] if nothing has been subtracted from this node yet.
        subdivisions: Option<Box<Subdivisions>>,
    },
}

#[derive(Clone, Debug)]
struct Subdivisions {
    /// The first cell of the positive half on each axis.
    divider: Cell,
    children: OctantMap<Node>,
}

impl FreeSpace {
    /// Constructs a [`FreeSpace`] in which every cell of `bounds` is free.
    pub fn new(bounds: CellBox) -> Self {
        Self {
            root: Node::new(bounds, 0),
        }
    }

    /// Constructs a [`FreeSpace`] in which every representable cell is free.
    ///
    /// This is the placeholder offered when nothing has been placed yet.
    pub fn everywhere() -> Self {
        Self::new(CellBox::EVERYWHERE)
    }

    /// Constructs a [`FreeSpace`] with no free cells.
    pub fn empty() -> Self {
        Self { root: Node::Empty }
    }

    /// Returns the bounding box this space was created with, or [`None`] if nothing in it is
    /// free any more.
    pub fn bounds(&self) -> Option<CellBox> {
        match self.root {
            Node::Empty => None,
            Node::NonEmpty { bounds, .. } => Some(bounds),
        }
    }

    /// Returns whether nothing in this space is free.
    pub fn is_empty(&self) -> bool {
        matches!(self.root, Node::Empty)
    }

    /// Marks every cell of `bounds` as no longer free.
    ///
    /// Returns whether the space is now entirely occupied.
    pub fn subtract(&mut self, bounds: CellBox) -> bool {
        self.root.subtract(bounds)
    }

    /// Returns the number of nodes, empty or not, in the octree.
    ///
    /// This is a diagnostic of how fragmented the free space has become.
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }
}

impl AvailableSpace for FreeSpace {
    fn contains(&self, bounds: CellBox) -> bool {
        self.root.contains(bounds)
    }

    fn contains_cell(&self, cell: Cell) -> bool {
        self.root.contains_cell(cell)
    }
}

impl fmt::Debug for FreeSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FreeSpace")
            .field("bounds", &self.bounds())
            .field("node_count", &self.node_count())
            .finish()
    }
}

impl Node {
    fn new(bounds: CellBox, depth: u32) -> Self {
        Node::NonEmpty {
            bounds,
            depth,
            subdivisions: None,
        }
    }

    /// Returns whether this node is now entirely empty.
    fn subtract(&mut self, subtrahend: CellBox) -> bool {
        let Node::NonEmpty {
            bounds,
            depth,
            subdivisions,
        } = self
        else {
            return true;
        };
        if !bounds.intersects(subtrahend) {
            return false;
        }
        if subtrahend.encapsulates(*bounds) {
            *self = Node::Empty;
            return true;
        }

        // The subtrahend overlaps only part of this node, so the node has more than one cell,
        // so the center is a divider which leaves both sides non-empty on some axis.
        let subdivisions =
            subdivisions.get_or_insert_with(|| Box::new(Subdivisions::new(*bounds, *depth)));
        let mut all_empty = true;
        for (_, child) in subdivisions.children.iter_mut() {
            if child.subtract(subtrahend) {
                *child = Node::Empty;
            } else {
                all_empty = false;
            }
        }
        if all_empty {
            *self = Node::Empty;
        }
        all_empty
    }

    fn contains(&self, query: CellBox) -> bool {
        let Node::NonEmpty {
            bounds,
            subdivisions,
            ..
        } = self
        else {
            return false;
        };
        if !bounds.encapsulates(query) {
            return false;
        }
        let Some(subdivisions) = subdivisions else {
            return true;
        };
        subdivisions.children.iter().all(|(octant, child)| {
            match query.octant_clip(subdivisions.divider, octant) {
                Some(part) => child.contains(part),
                None => true,
            }
        })
    }

    fn contains_cell(&self, cell: Cell) -> bool {
        let Node::NonEmpty {
            bounds,
            subdivisions,
            ..
        } = self
        else {
            return false;
        };
        if !bounds.contains_cell(cell) {
            return false;
        }
        match subdivisions {
            None => true,
            Some(subdivisions) => subdivisions.children
                [Octant::containing(cell, subdivisions.divider)]
            .contains_cell(cell),
        }
    }

    fn node_count(&self) -> usize {
        match self {
            Node::NonEmpty {
                subdivisions: Some(subdivisions),
                ..
            } => 1 + subdivisions
                .children
                .values()
                .map(Node::node_count)
                .sum::<usize>(),
            _ => 1,
        }
    }
}

impl Subdivisions {
    fn new(bounds: CellBox, depth: u32) -> Self {
        let divider = bounds.center();
        log::trace!("subdividing {bounds:?} at {divider:?} (depth {depth})");
        Self {
            divider,
            children: OctantMap::from_fn(|octant| match bounds.octant_clip(divider, octant) {
                Some(child_bounds) => Node::new(child_bounds, depth + 1),
                None => Node::Empty,
            }),
        }
    }
}
