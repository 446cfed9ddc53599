/// Ordered opaque/transparent render queue.
///
/// Each bucket is an insertion-ordered map from drawable identity to item.
/// Inserting an identity already present in the same bucket replaces the
/// item in place; inserting it with the other bucket moves it to the end of
/// that bucket. An identity is in at most one bucket.

use rustc_hash::FxHashMap;
use crate::scene::NodeId;

/// Which bucket an item is drawn in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Opaque,
    Transparent,
}

impl Bucket {
    /// Bucket for a material, from its transparency
    pub fn for_transparency(transparent: bool) -> Self {
        if transparent { Bucket::Transparent } else { Bucket::Opaque }
    }
}

// ===== ORDERED BUCKET =====

struct OrderedBucket<T> {
    entries: Vec<(NodeId, T)>,
    index: FxHashMap<NodeId, usize>,
}

impl<T> OrderedBucket<T> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Replace in place or append. Returns the superseded item.
    fn insert(&mut self, id: NodeId, item: T) -> Option<T> {
        match self.index.get(&id) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, item)),
            None => {
                self.index.insert(id, self.entries.len());
                self.entries.push((id, item));
                None
            }
        }
    }

    fn remove(&mut self, id: NodeId) -> Option<T> {
        let i = self.index.remove(&id)?;
        let (_, item) = self.entries.remove(i);
        for (id, _) in &self.entries[i..] {
            if let Some(slot) = self.index.get_mut(id) {
                *slot -= 1;
            }
        }
        Some(item)
    }

    fn retain<F: FnMut(NodeId) -> bool>(&mut self, mut keep: F) -> Vec<T> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.entries.len());
        for (id, item) in self.entries.drain(..) {
            if keep(id) {
                kept.push((id, item));
            } else {
                removed.push(item);
            }
        }
        self.entries = kept;
        self.reindex();
        removed
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, (id, _)) in self.entries.iter().enumerate() {
            self.index.insert(*id, i);
        }
    }

    fn get(&self, id: NodeId) -> Option<&T> {
        self.index.get(&id).map(|&i| &self.entries[i].1)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        let i = *self.index.get(&id)?;
        Some(&mut self.entries[i].1)
    }

    fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) -> Vec<T> {
        self.index.clear();
        self.entries.drain(..).map(|(_, item)| item).collect()
    }
}

// ===== RENDER QUEUE =====

pub struct RenderQueue<T> {
    opaque: OrderedBucket<T>,
    transparent: OrderedBucket<T>,
}

impl<T> RenderQueue<T> {
    pub fn new() -> Self {
        Self {
            opaque: OrderedBucket::new(),
            transparent: OrderedBucket::new(),
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut OrderedBucket<T> {
        match bucket {
            Bucket::Opaque => &mut self.opaque,
            Bucket::Transparent => &mut self.transparent,
        }
    }

    /// Insert `item` for `id` in `bucket`
    ///
    /// Returns the item it supersedes, whichever bucket held it.
    pub fn insert(&mut self, id: NodeId, item: T, bucket: Bucket) -> Option<T> {
        let other = match bucket {
            Bucket::Opaque => Bucket::Transparent,
            Bucket::Transparent => Bucket::Opaque,
        };
        let moved = self.bucket_mut(other).remove(id);
        let replaced = self.bucket_mut(bucket).insert(id, item);
        replaced.or(moved)
    }

    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        self.opaque.remove(id).or_else(|| self.transparent.remove(id))
    }

    /// Keep only the identities for which `keep` is true
    ///
    /// Returns the removed items. Relative order of kept items is unchanged.
    pub fn retain<F: FnMut(NodeId) -> bool>(&mut self, mut keep: F) -> Vec<T> {
        let mut removed = self.opaque.retain(&mut keep);
        removed.extend(self.transparent.retain(&mut keep));
        removed
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.opaque.get(id).or_else(|| self.transparent.get(id))
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        match self.opaque.get_mut(id) {
            Some(item) => Some(item),
            None => self.transparent.get_mut(id),
        }
    }

    pub fn bucket_of(&self, id: NodeId) -> Option<Bucket> {
        if self.opaque.contains(id) {
            Some(Bucket::Opaque)
        } else if self.transparent.contains(id) {
            Some(Bucket::Transparent)
        } else {
            None
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.bucket_of(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.opaque.len() + self.transparent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn opaque_len(&self) -> usize {
        self.opaque.len()
    }

    pub fn transparent_len(&self) -> usize {
        self.transparent.len()
    }

    /// Identities of one bucket, in order
    pub fn ids(&self, bucket: Bucket) -> Vec<NodeId> {
        let entries = match bucket {
            Bucket::Opaque => &self.opaque.entries,
            Bucket::Transparent => &self.transparent.entries,
        };
        entries.iter().map(|(id, _)| *id).collect()
    }

    /// Draw order: opaque items then transparent items, each in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Bucket, &T)> {
        let opaque = self.opaque.entries.iter().map(|(id, item)| (*id, Bucket::Opaque, item));
        let transparent = self.transparent.entries.iter().map(|(id, item)| (*id, Bucket::Transparent, item));
        opaque.chain(transparent)
    }

    /// Same order as `iter`, with mutable items
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (NodeId, Bucket, &mut T)> {
        let opaque = self.opaque.entries.iter_mut().map(|(id, item)| (*id, Bucket::Opaque, item));
        let transparent = self.transparent.entries.iter_mut().map(|(id, item)| (*id, Bucket::Transparent, item));
        opaque.chain(transparent)
    }

    /// Remove every item, returning them
    pub fn clear(&mut self) -> Vec<T> {
        let mut items = self.opaque.clear();
        items.extend(self.transparent.clear());
        items
    }
}

impl<T> Default for RenderQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "render_queue_tests.rs"]
mod tests;
