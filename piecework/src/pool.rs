//! Weighted collections of [`PieceGenerator`]s, and the registry they are looked up in.

use core::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use rand::Rng;
use rand::distr::Distribution as _;
use rand::distr::weighted::WeightedIndex;
use rand::seq::IndexedRandom as _;

use crate::Name;
use crate::generator::PieceGenerator;

/// One possible choice in a [`Pool`].
#[expect(clippy::exhaustive_enums)]
pub enum PoolEntry<F> {
    /// Stop: do not attach anything, and do not try any further entries.
    Empty,
    /// Try the candidate this generator proposes.
    Generator(Arc<dyn PieceGenerator<F>>),
}

impl<F> PoolEntry<F> {
    /// Wraps `generator` in a [`PoolEntry::Generator`].
    pub fn generator(generator: impl PieceGenerator<F> + 'static) -> Self {
        Self::Generator(Arc::new(generator))
    }

    /// Whether both entries are the stop sentinel or share the same generator instance.
    pub fn is_same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Empty, Self::Empty) => true,
            (Self::Generator(a), Self::Generator(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<F> Clone for PoolEntry<F> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Generator(generator) => Self::Generator(Arc::clone(generator)),
        }
    }
}

impl<F> fmt::Debug for PoolEntry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Generator(generator) => fmt::Debug::fmt(&**generator, f),
        }
    }
}

/// A value with a positive weight, for random selection.
#[derive(Clone, Debug)]
#[expect(clippy::exhaustive_structs)]
pub struct Weighted<T> {
    #[allow(missing_docs)]
    pub weight: u32,
    #[allow(missing_docs)]
    pub value: T,
}

/// A weighted set of [`PoolEntry`]s from which pieces attached to a socket are chosen, plus
/// the name of a pool to fall back to.
///
/// Pools are named and found in a [`PoolRegistry`].
pub struct Pool<F> {
    fallback: Option<Name>,
    entries: Vec<Weighted<PoolEntry<F>>>,
}

impl<F> Pool<F> {
    /// Constructs a pool from `(weight, entry)` pairs.
    ///
    /// Returns an error if any weight is zero or the total weight does not fit in a [`u32`].
    pub fn new(
        entries: impl IntoIterator<Item = (u32, PoolEntry<F>)>,
    ) -> Result<Self, PoolError> {
        let entries: Vec<Weighted<PoolEntry<F>>> = entries
            .into_iter()
            .map(|(weight, value)| Weighted { weight, value })
            .collect();
        let mut total: u32 = 0;
        for (index, entry) in entries.iter().enumerate() {
            if entry.weight == 0 {
                return Err(PoolError::ZeroWeight { index });
            }
            total = total
                .checked_add(entry.weight)
                .ok_or(PoolError::TotalWeightOverflow)?;
        }
        Ok(Self {
            fallback: None,
            entries,
        })
    }

    /// A pool with no entries and no fallback.
    pub fn empty() -> Self {
        Self {
            fallback: None,
            entries: Vec::new(),
        }
    }

    /// Sets the pool to use after this pool's entries have all failed, or instead of them
    /// when the maximum depth has been reached.
    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<Name>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// The name of the fallback pool, if one was set.
    /// If none was set, the fallback is the empty pool.
    pub fn fallback(&self) -> Option<&Name> {
        self.fallback.as_ref()
    }

    /// Returns the weighted entries.
    pub fn entries(&self) -> &[Weighted<PoolEntry<F>>] {
        &self.entries
    }

    /// Returns whether this pool has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns every distinct entry once, in a random order in which heavier entries tend to
    /// come first.
    ///
    /// Each position is chosen by weighted selection among the entries not yet chosen. Once
    /// an entry is chosen, every other listing of the same generator (or of
    /// [`PoolEntry::Empty`]) is dropped too, so no generator is tried twice.
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<PoolEntry<F>> {
        let mut remaining: Vec<&Weighted<PoolEntry<F>>> = self.entries.iter().collect();
        let mut shuffled = Vec::with_capacity(remaining.len());
        while !remaining.is_empty() {
            let Ok(distribution) = WeightedIndex::new(remaining.iter().map(|entry| entry.weight))
            else {
                // weights were validated on construction
                break;
            };
            let selected = remaining[distribution.sample(rng)].value.clone();
            remaining.retain(|entry| !entry.value.is_same_as(&selected));
            shuffled.push(selected);
        }
        shuffled
    }

    /// Chooses one entry by weight, or [`None`] if there are no entries.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&PoolEntry<F>> {
        self.entries
            .choose_weighted(rng, |entry| entry.weight)
            .ok()
            .map(|entry| &entry.value)
    }
}

impl<F> Clone for Pool<F> {
    fn clone(&self) -> Self {
        Self {
            fallback: self.fallback.clone(),
            entries: self
                .entries
                .iter()
                .map(|entry| Weighted {
                    weight: entry.weight,
                    value: entry.value.clone(),
                })
                .collect(),
        }
    }
}

impl<F> fmt::Debug for Pool<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("fallback", &self.fallback)
            .field("entries", &self.entries)
            .finish()
    }
}

/// The pools available to an assembly, by name.
///
/// The registry always contains the empty pool, named [`Name::EMPTY`], which may be used as
/// a fallback or socket pool meaning “attach nothing”.
pub struct PoolRegistry<F> {
    pools: HashMap<Name, Pool<F>>,
    empty: Pool<F>,
}

impl<F> PoolRegistry<F> {
    /// Constructs a registry containing only the empty pool.
    pub fn new() -> Self {
        Self {
            pools: HashMap::new(),
            empty: Pool::empty(),
        }
    }

    /// Adds a pool.
    ///
    /// Returns an error if a pool of that name is already present; the empty pool is always
    /// present.
    pub fn insert(&mut self, name: impl Into<Name>, pool: Pool<F>) -> Result<(), PoolError> {
        let name = name.into();
        if name.is_empty_name() || self.pools.contains_key(&name) {
            return Err(PoolError::Duplicate(name));
        }
        self.pools.insert(name, pool);
        Ok(())
    }

    /// Returns the pool with the given name, if any.
    pub fn get(&self, name: &Name) -> Option<&Pool<F>> {
        if name.is_empty_name() {
            Some(&self.empty)
        } else {
            self.pools.get(name)
        }
    }

    /// Returns the pool with the given name if it is usable for attaching pieces: it must
    /// exist and either have entries or be the empty pool.
    pub fn resolve(&self, name: &Name) -> Option<&Pool<F>> {
        self.get(name)
            .filter(|pool| !pool.is_empty() || name.is_empty_name())
    }

    /// Returns the empty pool.
    pub fn empty_pool(&self) -> &Pool<F> {
        &self.empty
    }

    /// Returns the names of all pools other than the empty pool, in arbitrary order.
    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.pools.keys()
    }
}

impl<F> Default for PoolRegistry<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> fmt::Debug for PoolRegistry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.pools.iter()).finish()
    }
}

/// Errors in constructing a [`Pool`] or [`PoolRegistry`].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum PoolError {
    /// An entry had weight zero.
    #[error("pool entry {index} has weight zero")]
    ZeroWeight {
        /// Index of the entry.
        index: usize,
    },
    /// The sum of weights is too large.
    #[error("total weight of pool entries is too large")]
    TotalWeightOverflow,
    /// A pool name was used twice.
    #[error("pool {0} is already defined")]
    Duplicate(Name),
}
