#![allow(clippy::missing_inline_in_public_items)]

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::math::{Cell, CellBox, GridCoordinate};

#[derive(Debug, Deserialize, Serialize)]
struct CellBoxSer {
    // Both bounds are inclusive.
    lower: [GridCoordinate; 3],
    upper: [GridCoordinate; 3],
}

impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let &Cell { x, y, z } = self;

        [x, y, z].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [x, y, z] = <[i32; 3]>::deserialize(deserializer)?;
        Ok(Cell::new(x, y, z))
    }
}

impl Serialize for CellBox {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        CellBoxSer {
            lower: self.lower().into(),
            upper: self.upper().into(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CellBox {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let CellBoxSer { lower, upper } = CellBoxSer::deserialize(deserializer)?;
        CellBox::checked_from_lower_upper(lower, upper).map_err(serde::de::Error::custom)
    }
}
