/// The kinds of cell content the example generators place.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "kebab-case")]
#[non_exhaustive]
#[allow(missing_docs)]
pub enum Material {
    /// Explicitly empty; distinct from a cell nothing was written to.
    Air,
    Stone,
    Brick,
    Planks,
    /// Marks the entrance of a corridor.
    Cobble,
}

impl Material {
    /// Character used for this material by [`SparseCanvas::layer_map()`](crate::SparseCanvas::layer_map).
    pub fn map_char(self) -> char {
        match self {
            Material::Air => '.',
            Material::Stone => '#',
            Material::Brick => 'B',
            Material::Planks => '=',
            Material::Cobble => 'o',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use std::str::FromStr as _;
    use strum::IntoEnumIterator as _;

    #[test]
    fn map_chars_are_distinct() {
        let chars = Material::iter().map(Material::map_char).collect::<HashSet<_>>();
        assert_eq!(chars.len(), Material::iter().count());
        assert!(!chars.contains(&' '));
    }

    #[test]
    fn names() {
        assert_eq!(Material::Planks.to_string(), "planks");
        assert_eq!(Material::from_str("cobble").unwrap(), Material::Cobble);
        assert_eq!(
            serde_json::to_string(&Material::Brick).unwrap(),
            "\"brick\""
        );
    }
}
