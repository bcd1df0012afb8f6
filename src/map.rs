pub use crate::avl::Iter;
use crate::{
    avl::Tree,
    error::{Error, Result},
};
use std::{
    borrow::Borrow,
    cmp::{Eq, Ord, Ordering, PartialEq, PartialOrd},
    default::Default,
    fmt::{self, Debug, Formatter},
    hash::{Hash, Hasher},
    iter::FromIterator,
    ops::{Bound, Index, IndexMut},
};
use tracing::debug;

/// An ordered map backed by an AVL tree. Every node owns its
/// children outright, the map owns the root, and every insert and
/// remove rebalances on the way back up, so get, insert, and remove
/// are log(N) in the worst case no matter what order the keys arrive
/// in.
///
/// Cloning a map makes a deep copy, the two maps share nothing
/// afterwards. Moving out of a map with `std::mem::take` leaves an
/// empty map behind.
///
/// # Examples
/// ```
/// use avlmap::AvlMap;
///
/// let mut m = AvlMap::new();
/// for k in 1..=5 {
///     m.insert(k, k * 10);
/// }
///
/// assert_eq!(m.len(), 5);
/// assert_eq!(m.height(), 3);
/// assert_eq!(m.get(&3), Some(&30));
/// assert_eq!(m.find_keys(&2, &4), vec![2, 3, 4]);
///
/// m.erase(&4).unwrap();
/// assert_eq!(m.sorted_keys(), vec![1, 2, 3, 5]);
/// assert!(m.erase(&4).is_err());
/// ```
#[derive(Clone)]
pub struct AvlMap<K, V> {
    len: usize,
    pub(crate) root: Tree<K, V>,
}

impl<K, V> Hash for AvlMap<K, V>
where
    K: Hash + Ord,
    V: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        for elt in self {
            elt.hash(state)
        }
    }
}

impl<K, V> Default for AvlMap<K, V> {
    fn default() -> AvlMap<K, V> {
        AvlMap::new()
    }
}

impl<K, V> PartialEq for AvlMap<K, V>
where
    K: Ord,
    V: PartialEq,
{
    fn eq(&self, other: &AvlMap<K, V>) -> bool {
        self.len == other.len && self.iter().zip(other).all(|(e0, e1)| e0 == e1)
    }
}

impl<K, V> Eq for AvlMap<K, V>
where
    K: Ord,
    V: Eq,
{
}

impl<K, V> PartialOrd for AvlMap<K, V>
where
    K: Ord,
    V: PartialOrd,
{
    fn partial_cmp(&self, other: &AvlMap<K, V>) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K, V> Ord for AvlMap<K, V>
where
    K: Ord,
    V: Ord,
{
    fn cmp(&self, other: &AvlMap<K, V>) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K, V> Debug for AvlMap<K, V>
where
    K: Debug + Ord,
    V: Debug,
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, Q, K, V> Index<&'a Q> for AvlMap<K, V>
where
    Q: ?Sized + Ord,
    K: Ord + Borrow<Q>,
{
    type Output = V;
    fn index(&self, k: &Q) -> &V {
        self.get(k).expect("element not found for key")
    }
}

impl<'a, Q, K, V> IndexMut<&'a Q> for AvlMap<K, V>
where
    Q: ?Sized + Ord,
    K: Ord + Borrow<Q>,
{
    fn index_mut(&mut self, k: &Q) -> &mut V {
        self.get_mut(k).expect("element not found for key")
    }
}

impl<K, V> FromIterator<(K, V)> for AvlMap<K, V>
where
    K: Ord,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut m = AvlMap::new();
        m.extend(iter);
        m
    }
}

impl<K, V> Extend<(K, V)> for AvlMap<K, V>
where
    K: Ord,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a AvlMap<K, V>
where
    K: 'a + Ord,
    V: 'a,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> AvlMap<K, V> {
    /// Create a new empty map
    pub fn new() -> Self {
        AvlMap {
            len: 0,
            root: Tree::new(),
        }
    }

    /// get the number of elements in the map O(1) time and space
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// the height of the tree, 0 for an empty map. For N elements this
    /// never exceeds about 1.44 * log2(N + 2).
    pub fn height(&self) -> usize {
        self.root.height() as usize
    }

    /// drop every binding in the map
    pub fn clear(&mut self) {
        self.root = Tree::new();
        self.len = 0;
    }
}

impl<K, V> AvlMap<K, V>
where
    K: Ord,
{
    /// insert the binding k -> v. If k is already bound the value is
    /// replaced in place, the old value is returned, and neither the
    /// length nor the shape of the tree changes.
    pub fn insert(&mut self, k: K, v: V) -> Option<V> {
        let (root, prev) = std::mem::take(&mut self.root).insert(k, v);
        self.root = root;
        if prev.is_none() {
            self.len += 1;
        }
        prev
    }

    /// remove the binding for k, which can be any borrowed form of
    /// the key, returning the value if there was one. Runs in log(N)
    /// time. If k isn't bound the map is left exactly as it was.
    pub fn remove<Q>(&mut self, k: &Q) -> Option<V>
    where
        Q: ?Sized + Ord,
        K: Borrow<Q>,
    {
        let (root, removed) = std::mem::take(&mut self.root).remove(k);
        self.root = root;
        removed.map(|(_, v)| {
            self.len -= 1;
            v
        })
    }

    /// like `remove`, but a missing key is an error
    pub fn erase<Q>(&mut self, k: &Q) -> Result<V>
    where
        Q: ?Sized + Ord,
        K: Borrow<Q>,
    {
        match self.remove(k) {
            Some(v) => Ok(v),
            None => {
                debug!(len = self.len, "erase of a key that is not in the map");
                Err(Error::NotFound)
            }
        }
    }

    /// lookup the mapping for k. If it doesn't exist return
    /// None. Runs in log(N) time and constant space.
    pub fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        Q: ?Sized + Ord,
        K: Borrow<Q>,
    {
        self.root.get_full(k).map(|(_, v)| v)
    }

    /// lookup the mapping for k. Return both the key and the value.
    pub fn get_key_value<Q>(&self, k: &Q) -> Option<(&K, &V)>
    where
        Q: ?Sized + Ord,
        K: Borrow<Q>,
    {
        self.root.get_full(k)
    }

    pub fn get_mut<Q>(&mut self, k: &Q) -> Option<&mut V>
    where
        Q: ?Sized + Ord,
        K: Borrow<Q>,
    {
        self.root.get_mut(k)
    }

    /// the value bound to k, or `Error::NotFound`
    pub fn value<Q>(&self, k: &Q) -> Result<&V>
    where
        Q: ?Sized + Ord,
        K: Borrow<Q>,
    {
        self.get(k).ok_or(Error::NotFound)
    }

    /// a mutable reference to the value bound to k, or `Error::NotFound`
    pub fn value_mut<Q>(&mut self, k: &Q) -> Result<&mut V>
    where
        Q: ?Sized + Ord,
        K: Borrow<Q>,
    {
        self.get_mut(k).ok_or(Error::NotFound)
    }

    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        Q: ?Sized + Ord,
        K: Borrow<Q>,
    {
        self.root.get_full(k).is_some()
    }

    /// return an iterator over the subset of elements in the
    /// map that are within the specified range.
    ///
    /// The returned iterator runs in O(log(N) + M) time, and
    /// constant space. N is the number of elements in the
    /// tree, and M is the number of elements you examine.
    ///
    /// if lbound >= ubound the returned iterator will be empty
    pub fn range<Q>(&self, lbound: Bound<Q>, ubound: Bound<Q>) -> Iter<'_, Q, K, V>
    where
        Q: Ord,
        K: Borrow<Q>,
    {
        self.root.range(lbound, ubound)
    }

    /// iterate over every binding in ascending key order
    pub fn iter(&self) -> Iter<'_, K, K, V> {
        self.root.range(Bound::Unbounded, Bound::Unbounded)
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// every key k with lo <= k <= hi, in ascending order. Empty if lo > hi.
    ///
    /// # Examples
    /// ```
    /// use avlmap::AvlMap;
    ///
    /// let m: AvlMap<i32, ()> = (1..=10).map(|k| (k, ())).collect();
    /// assert_eq!(m.find_keys(&3, &6), vec![3, 4, 5, 6]);
    /// assert!(m.find_keys(&5, &1).is_empty());
    /// ```
    pub fn find_keys<Q>(&self, lo: &Q, hi: &Q) -> Vec<K>
    where
        Q: ?Sized + Ord,
        K: Borrow<Q> + Clone,
    {
        let mut keys = Vec::new();
        self.root.find_keys(lo, hi, &mut keys);
        keys
    }

    /// every key in the map in ascending order
    pub fn sorted_keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        let mut keys = Vec::with_capacity(self.len);
        self.root.sorted_keys(&mut keys);
        keys
    }
}

impl<K, V> AvlMap<K, V>
where
    K: Ord + Debug,
{
    #[allow(dead_code)]
    pub(crate) fn invariant(&self) {
        self.root.invariant(self.len)
    }
}
