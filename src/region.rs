//! Color-region tables mapping observed colors to compact region ids.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::hash::Hash;
use std::num::NonZero;

use image::Rgb;
use ndarray::Array2;

/// The average color observed over one cell. Two cells belong to the same region exactly when their averages are equal.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct RegionColor(pub [u8; 3]);

impl From<Rgb<u8>> for RegionColor {
    fn from(value: Rgb<u8>) -> Self {
        Self(value.0)
    }
}

impl From<RegionColor> for Rgb<u8> {
    fn from(value: RegionColor) -> Self {
        Rgb(value.0)
    }
}

/// Identifier of a color region, allocated sequentially from 1 in first-seen order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RegionId(NonZero<usize>);

impl RegionId {
    /// Zero-based position of this id in allocation order.
    pub fn index(&self) -> usize {
        self.0.get() - 1
    }

    fn from_index(index: usize) -> Self {
        // index + 1 is never zero
        Self(NonZero::<usize>::MIN.saturating_add(index))
    }
}

impl Display for RegionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bidirectional mapping between region keys and [`RegionId`]s.
///
/// Ids are handed out in the order keys are first seen and are never reused or evicted.
/// A table lives for one solve; build a fresh one per image.
#[derive(Clone, Debug)]
pub struct RegionTable<K> {
    ids: HashMap<K, RegionId>,
    keys: Vec<K>,
}

/// The table used when reading boards out of images.
pub type RegionColorTable = RegionTable<RegionColor>;

impl<K> Default for RegionTable<K> {
    fn default() -> Self {
        Self {
            ids: HashMap::new(),
            keys: Vec::new(),
        }
    }
}

impl<K> RegionTable<K>
where
    K: Copy + Eq + Hash,
{
    /// Construct an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id already recorded for `key`, or allocate the next one.
    pub fn assign(&mut self, key: K) -> RegionId {
        if let Some(id) = self.ids.get(&key) {
            return *id;
        }

        let id = RegionId::from_index(self.keys.len());
        self.keys.push(key);
        self.ids.insert(key, id);
        id
    }

    /// Assign ids to a whole grid of keys, visiting cells in reading order.
    pub fn assign_grid(&mut self, keys: &Array2<K>) -> Array2<RegionId> {
        let mut ids = Array2::from_elem(keys.raw_dim(), RegionId::from_index(0));
        for (index, key) in keys.indexed_iter() {
            ids[index] = self.assign(*key);
        }
        ids
    }

    /// The key recorded for `id`, or [`None`] if this table never allocated it.
    pub fn key_of(&self, id: RegionId) -> Option<K> {
        self.keys.get(id.index()).copied()
    }

    /// Every key in allocation order.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Number of distinct keys seen so far.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no key has been assigned yet.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl RegionColorTable {
    /// The color recorded for `id`, see [`RegionTable::key_of`].
    pub fn color_of(&self, id: RegionId) -> Option<RegionColor> {
        self.key_of(id)
    }
}
