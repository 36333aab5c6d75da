// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::{Fixed, Font, Glyph, GlyphId, Locale};

/// The default number of entries in a cache.
pub(crate) const DEFAULT_CAPACITY: usize = 1000;

const HEAD: usize = 0;
const TAIL: usize = 1;

#[derive(Debug)]
struct Node<K, V> {
    /// `None` for sentinels and free slots.
    entry: Option<(K, V)>,
    prev: usize,
    next: usize,
}

/// A fixed-capacity least-recently-used cache.
///
/// Nodes live in an arena and are linked by indices. `HEAD.next` is the most
/// recently used entry and `TAIL.prev` the least recently used one.
#[derive(Debug)]
pub(crate) struct LruCache<K, V> {
    map: HashMap<K, usize>,
    nodes: Vec<Node<K, V>>,
    free: Vec<usize>,
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        let nodes = vec![
            Node { entry: None, prev: HEAD, next: TAIL },
            Node { entry: None, prev: HEAD, next: TAIL },
        ];

        LruCache {
            map: HashMap::new(),
            nodes,
            free: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns a value and marks it as the most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.unlink(idx);
        self.push_front(idx);
        self.nodes[idx].entry.as_ref().map(|(_, v)| v)
    }

    /// Checks for a key without changing the recency order.
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Inserts a value as the most recently used one.
    ///
    /// Replaces the value of an existing key. Evicts the least recently used
    /// entry when the capacity is exceeded.
    pub fn put(&mut self, key: K, value: V) {
        if let Some(&idx) = self.map.get(&key) {
            self.nodes[idx].entry = Some((key, value));
            self.unlink(idx);
            self.push_front(idx);
            return;
        }

        let node = Node { entry: Some((key.clone(), value)), prev: HEAD, next: HEAD };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };

        self.push_front(idx);
        self.map.insert(key, idx);

        if self.map.len() > self.capacity {
            self.evict();
        }
    }

    fn evict(&mut self) {
        let oldest = self.nodes[TAIL].prev;
        if oldest == HEAD {
            return;
        }

        self.unlink(oldest);
        if let Some((key, _)) = self.nodes[oldest].entry.take() {
            self.map.remove(&key);
        }
        self.free.push(oldest);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    fn push_front(&mut self, idx: usize) {
        let first = self.nodes[HEAD].next;
        self.nodes[idx].prev = HEAD;
        self.nodes[idx].next = first;
        self.nodes[first].prev = idx;
        self.nodes[HEAD].next = idx;
    }
}

/// A layout cache key.
///
/// Alignment does not affect shaping and is not a part of the key.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub(crate) struct LayoutKey {
    pub ppem: Fixed,
    pub max_width: i32,
    pub min_width: i32,
    pub max_lines: usize,
    pub truncator: String,
    pub locale: Locale,
    pub font: Font,
    pub force_truncate: bool,
    pub text: String,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct GlyphInfo {
    id: GlyphId,
    /// Relative to the first glyph.
    x: Fixed,
}

/// A cache of values computed from a sequence of glyphs.
///
/// Glyphs are matched by their ids and by their positions relative
/// to the first glyph, so equal words at different positions share an entry.
#[derive(Debug)]
pub(crate) struct GlyphCache<V> {
    lru: LruCache<u64, (Vec<GlyphInfo>, V)>,
}

impl<V> GlyphCache<V> {
    pub fn new(capacity: usize) -> Self {
        GlyphCache { lru: LruCache::new(capacity) }
    }

    /// Computes a lookup key for glyphs.
    pub fn hash_glyphs(glyphs: &[Glyph]) -> u64 {
        let mut hasher = siphasher::sip::SipHasher13::new();
        for info in glyph_infos(glyphs) {
            info.x.0.hash(&mut hasher);
            info.id.0.hash(&mut hasher);
        }
        hasher.finish()
    }

    /// Returns a value stored for exactly the same glyphs.
    ///
    /// A hash collision with different glyphs is a miss.
    pub fn get(&mut self, key: u64, glyphs: &[Glyph]) -> Option<&V> {
        let (infos, value) = self.lru.get(&key)?;
        if infos.iter().copied().eq(glyph_infos(glyphs)) {
            Some(value)
        } else {
            None
        }
    }

    pub fn put(&mut self, key: u64, glyphs: &[Glyph], value: V) {
        self.lru.put(key, (glyph_infos(glyphs).collect(), value));
    }
}

fn glyph_infos(glyphs: &[Glyph]) -> impl Iterator<Item = GlyphInfo> + '_ {
    let first_x = glyphs.first().map_or(Fixed::ZERO, |g| g.x);
    glyphs.iter().map(move |g| GlyphInfo { id: g.id, x: g.x - first_x })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_after_put() {
        let mut cache = LruCache::new(10);
        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.get(&"b"), Some(&2));
        assert_eq!(cache.get(&"c"), None);
    }

    #[test]
    fn evicts_oldest() {
        let mut cache = LruCache::new(DEFAULT_CAPACITY);
        for i in 0..DEFAULT_CAPACITY {
            cache.put(i, i);
        }
        assert_eq!(cache.len(), DEFAULT_CAPACITY);

        cache.put(DEFAULT_CAPACITY, DEFAULT_CAPACITY);
        assert_eq!(cache.len(), DEFAULT_CAPACITY);
        assert!(!cache.contains(&0));
        for i in 1..=DEFAULT_CAPACITY {
            assert!(cache.contains(&i), "{} was evicted", i);
        }
    }

    #[test]
    fn get_promotes() {
        let mut cache = LruCache::new(3);
        cache.put(1, 'a');
        cache.put(2, 'b');
        cache.put(3, 'c');
        assert!(cache.get(&1).is_some());

        cache.put(4, 'd');
        assert!(cache.contains(&1));
        assert!(!cache.contains(&2));

        cache.put(5, 'e');
        assert!(!cache.contains(&3));
        assert!(cache.contains(&1));
    }

    #[test]
    fn put_replaces() {
        let mut cache = LruCache::new(2);
        cache.put(1, 'a');
        cache.put(2, 'b');
        cache.put(1, 'c');
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), Some(&'c'));

        // 2 is the oldest now.
        cache.put(3, 'd');
        assert!(!cache.contains(&2));
    }

    #[test]
    fn reuses_slots() {
        let mut cache = LruCache::new(2);
        for i in 0..100 {
            cache.put(i, i);
        }
        assert_eq!(cache.nodes.len(), 2 + 3);
        assert_eq!(cache.get(&99), Some(&99));
        assert_eq!(cache.get(&98), Some(&98));
    }

    fn glyph(id: u64, x: i32) -> Glyph {
        Glyph {
            id: GlyphId(id),
            x: Fixed::from_i32(x),
            ..Glyph::default()
        }
    }

    #[test]
    fn glyphs_position_independent() {
        let a = [glyph(1, 10), glyph(2, 15)];
        let b = [glyph(1, 110), glyph(2, 115)];
        let c = [glyph(1, 10), glyph(2, 16)];
        type Cache = GlyphCache<u8>;
        assert_eq!(Cache::hash_glyphs(&a), Cache::hash_glyphs(&b));
        assert_ne!(Cache::hash_glyphs(&a), Cache::hash_glyphs(&c));

        let mut cache = Cache::new(10);
        cache.put(Cache::hash_glyphs(&a), &a, 7);
        assert_eq!(cache.get(Cache::hash_glyphs(&b), &b), Some(&7));
    }

    #[test]
    fn glyphs_collision_is_a_miss() {
        let a = [glyph(1, 10), glyph(2, 15)];
        let b = [glyph(3, 10)];
        let mut cache = GlyphCache::new(10);
        let key = GlyphCache::<u8>::hash_glyphs(&a);
        cache.put(key, &a, 1u8);
        assert_eq!(cache.get(key, &b), None);
        assert_eq!(cache.get(key, &a), Some(&1));
    }

    #[test]
    fn layout_key_includes_force_truncate() {
        let key = LayoutKey {
            ppem: Fixed::from_i32(10),
            max_width: 100,
            min_width: 0,
            max_lines: 0,
            truncator: String::new(),
            locale: Locale::default(),
            font: Font::default(),
            force_truncate: false,
            text: "abc".to_string(),
        };
        let mut cache = LruCache::new(10);
        cache.put(key.clone(), 1);

        let mut other = key.clone();
        other.force_truncate = true;
        assert_eq!(cache.get(&other), None);
        assert_eq!(cache.get(&key), Some(&1));
    }
}
