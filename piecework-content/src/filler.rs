use piecework::piece::{FillContext, Filler};

use crate::{LooperFiller, RoomFiller, SparseCanvas};

/// Content descriptor of every piece this crate's generators produce.
///
/// Serializes with a `"type"` field naming the variant, alongside the variant's own fields.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum ContentFiller {
    #[allow(missing_docs)]
    Room(RoomFiller),
    #[allow(missing_docs)]
    Looper(LooperFiller),
}

impl Filler<SparseCanvas> for ContentFiller {
    fn fill(&self, context: &FillContext, canvas: &mut SparseCanvas) {
        match self {
            ContentFiller::Room(filler) => filler.fill(context, canvas),
            ContentFiller::Looper(filler) => filler.fill(context, canvas),
        }
    }
}
