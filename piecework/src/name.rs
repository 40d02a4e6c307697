use core::fmt;

use arcstr::ArcStr;

/// Name of a [`Pool`](crate::pool::Pool) or of a socket kind.
///
/// Names are cheap to clone and compare.
/// The special name [`Name::EMPTY`] refers to the built-in pool with no entries, and used as
/// a socket name it means “not connectable”.
#[derive(Clone, Debug, Hash, Eq, Ord, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Name(ArcStr);

impl Name {
    /// The name of the built-in empty pool; as a socket name or target, marks the socket as
    /// unusable.
    pub const EMPTY: Name = Name(arcstr::literal!("empty"));

    /// Returns the text of this name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether this is [`Name::EMPTY`].
    pub fn is_empty_name(&self) -> bool {
        self.as_str() == Self::EMPTY.as_str()
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl From<ArcStr> for Name {
    fn from(value: ArcStr) -> Self {
        Self(value)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.0)
    }
}
