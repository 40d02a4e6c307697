use std::collections::BTreeMap;
use std::collections::btree_map;

use itertools::Itertools as _;

use piecework::math::{Cell, CellBox};

use crate::Material;

/// A world made of only the cells which have been written to, for filling structures into.
///
/// Serializes as a list of `[cell, material]` pairs in cell order.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "Vec<(Cell, Material)>", into = "Vec<(Cell, Material)>")]
pub struct SparseCanvas {
    cells: BTreeMap<Cell, Material>,
}

impl SparseCanvas {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `material` at `cell`, returning what was there before.
    pub fn set(&mut self, cell: Cell, material: Material) -> Option<Material> {
        self.cells.insert(cell, material)
    }

    /// Returns the material at `cell`, or [`None`] if it was never written.
    pub fn get(&self, cell: Cell) -> Option<Material> {
        self.cells.get(&cell).copied()
    }

    /// Number of cells written.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over written cells in order of x, then y, then z.
    pub fn iter(&self) -> Cells<'_> {
        Cells(self.cells.iter())
    }

    /// Returns the smallest box containing every written cell.
    pub fn bounds(&self) -> Option<CellBox> {
        let mut cells = self.cells.keys();
        let first = CellBox::single_cell(*cells.next()?);
        Some(cells.fold(first, |bounds, &cell| {
            bounds.union(CellBox::single_cell(cell))
        }))
    }

    /// Draws the horizontal layer at height `y` as text, one line per z coordinate
    /// (lowest first) and one character per x coordinate, covering the x and z extent of the
    /// whole canvas. Cells never written are spaces.
    ///
    /// Returns an empty string if the canvas is empty.
    pub fn layer_map(&self, y: i32) -> String {
        let Some(bounds) = self.bounds() else {
            return String::new();
        };
        let lower = bounds.lower();
        let upper = bounds.upper();
        (lower.z..=upper.z)
            .map(|z| {
                (lower.x..=upper.x)
                    .map(|x| {
                        self.get(Cell::new(x, y, z))
                            .map_or(' ', Material::map_char)
                    })
                    .collect::<String>()
            })
            .join("\n")
    }
}

impl From<Vec<(Cell, Material)>> for SparseCanvas {
    fn from(value: Vec<(Cell, Material)>) -> Self {
        Self {
            cells: value.into_iter().collect(),
        }
    }
}

impl From<SparseCanvas> for Vec<(Cell, Material)> {
    fn from(value: SparseCanvas) -> Self {
        value.cells.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a SparseCanvas {
    type Item = (Cell, Material);
    type IntoIter = Cells<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`SparseCanvas::iter()`].
#[derive(Clone, Debug)]
pub struct Cells<'a>(btree_map::Iter<'a, Cell, Material>);

impl Iterator for Cells<'_> {
    type Item = (Cell, Material);
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(&cell, &material)| (cell, material))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Cells<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn set_and_get() {
        let mut canvas = SparseCanvas::new();
        assert!(canvas.is_empty());
        assert_eq!(canvas.bounds(), None);
        assert_eq!(canvas.set(Cell::new(1, 2, 3), Material::Stone), None);
        assert_eq!(
            canvas.set(Cell::new(1, 2, 3), Material::Air),
            Some(Material::Stone)
        );
        assert_eq!(canvas.get(Cell::new(1, 2, 3)), Some(Material::Air));
        assert_eq!(canvas.get(Cell::ORIGIN), None);
        assert_eq!(canvas.len(), 1);
    }

    #[test]
    fn bounds_and_layer_map() {
        let mut canvas = SparseCanvas::new();
        canvas.set(Cell::new(0, 0, 0), Material::Stone);
        canvas.set(Cell::new(2, 0, 0), Material::Brick);
        canvas.set(Cell::new(1, 0, 1), Material::Cobble);
        canvas.set(Cell::new(1, 5, 2), Material::Air);

        assert_eq!(
            canvas.bounds(),
            Some(CellBox::from_lower_upper([0, 0, 0], [2, 5, 2]))
        );
        assert_eq!(canvas.layer_map(0), "# B\n o \n   ");
        assert_eq!(canvas.layer_map(5), "   \n   \n . ");
        assert_eq!(SparseCanvas::new().layer_map(0), "");
    }

    #[test]
    fn serialization() {
        let mut canvas = SparseCanvas::new();
        canvas.set(Cell::new(0, 1, 0), Material::Planks);
        canvas.set(Cell::new(-1, 0, 0), Material::Stone);
        let json = serde_json::to_string(&canvas).unwrap();
        assert_eq!(json, r#"[[[-1,0,0],"stone"],[[0,1,0],"planks"]]"#);
        assert_eq!(serde_json::from_str::<SparseCanvas>(&json).unwrap(), canvas);
    }

    #[test]
    fn iteration_order() {
        let mut canvas = SparseCanvas::new();
        canvas.set(Cell::new(1, 0, 0), Material::Stone);
        canvas.set(Cell::new(0, 0, 9), Material::Brick);
        let cells = canvas.iter().map(|(cell, _)| cell).collect::<Vec<_>>();
        assert_eq!(cells, vec![Cell::new(0, 0, 9), Cell::new(1, 0, 0)]);
        assert_eq!((&canvas).into_iter().len(), 2);
    }
}
