use arrayvec::ArrayVec;
use std::{
    borrow::Borrow,
    cmp::{max, Ordering},
    fmt::Debug,
    mem,
    ops::Bound,
};
use tracing::trace;

// an avl tree of height h holds at least fib(h + 2) - 1 nodes, so no tree
// that fits in a 64 bit address space gets anywhere near this
pub(crate) const MAX_DEPTH: usize = 128;

#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Tree<K, V>,
    pub(crate) right: Tree<K, V>,
    pub(crate) height: u16,
}

#[derive(Clone)]
pub(crate) enum Tree<K, V> {
    Empty,
    Node(Box<Node<K, V>>),
}

impl<K, V> Default for Tree<K, V> {
    fn default() -> Tree<K, V> {
        Tree::Empty
    }
}

pub struct Iter<'a, Q, K, V>
where
    Q: Ord,
    K: 'a + Borrow<Q> + Ord,
    V: 'a,
{
    ubound: Bound<Q>,
    lbound: Bound<Q>,
    stack: ArrayVec<(bool, &'a Node<K, V>), MAX_DEPTH>,
    current: Option<&'a K>,
    stack_rev: ArrayVec<(bool, &'a Node<K, V>), MAX_DEPTH>,
    current_rev: Option<&'a K>,
}

impl<'a, Q, K, V> Iter<'a, Q, K, V>
where
    Q: Ord,
    K: 'a + Borrow<Q> + Ord,
    V: 'a,
{
    // can anything smaller than k be in bounds
    fn left_in_bounds(&self, k: &K) -> bool {
        match self.lbound {
            Bound::Unbounded => true,
            Bound::Included(ref bound) | Bound::Excluded(ref bound) => k.borrow() > bound,
        }
    }

    // can anything bigger than k be in bounds
    fn right_in_bounds(&self, k: &K) -> bool {
        match self.ubound {
            Bound::Unbounded => true,
            Bound::Included(ref bound) | Bound::Excluded(ref bound) => k.borrow() < bound,
        }
    }

    fn above_lbound(&self, k: &K) -> bool {
        match self.lbound {
            Bound::Unbounded => true,
            Bound::Included(ref bound) => k.borrow() >= bound,
            Bound::Excluded(ref bound) => k.borrow() > bound,
        }
    }

    fn below_ubound(&self, k: &K) -> bool {
        match self.ubound {
            Bound::Unbounded => true,
            Bound::Included(ref bound) => k.borrow() <= bound,
            Bound::Excluded(ref bound) => k.borrow() < bound,
        }
    }

    fn finish(&mut self) {
        self.stack.clear();
        self.stack_rev.clear();
    }
}

impl<'a, Q, K, V> Iterator for Iter<'a, Q, K, V>
where
    Q: Ord,
    K: 'a + Borrow<Q> + Ord,
    V: 'a,
{
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.len().checked_sub(1)?;
            let (visited, current) = self.stack[top];
            if !visited {
                self.stack[top].0 = true;
                if let Some(n) = current.left.node() {
                    if self.left_in_bounds(&current.key) {
                        self.stack.push((false, n))
                    }
                }
            } else {
                self.stack.pop();
                let k = &current.key;
                if let Some(back) = self.current_rev {
                    if k >= back {
                        self.finish();
                        return None;
                    }
                }
                if !self.below_ubound(k) {
                    self.finish();
                    return None;
                }
                self.current = Some(k);
                if let Some(n) = current.right.node() {
                    if self.right_in_bounds(k) {
                        self.stack.push((false, n))
                    }
                }
                if self.above_lbound(k) {
                    return Some((k, &current.value));
                }
            }
        }
    }
}

impl<'a, Q, K, V> DoubleEndedIterator for Iter<'a, Q, K, V>
where
    Q: Ord,
    K: 'a + Borrow<Q> + Ord,
    V: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack_rev.len().checked_sub(1)?;
            let (visited, current) = self.stack_rev[top];
            if !visited {
                self.stack_rev[top].0 = true;
                if let Some(n) = current.right.node() {
                    if self.right_in_bounds(&current.key) {
                        self.stack_rev.push((false, n))
                    }
                }
            } else {
                self.stack_rev.pop();
                let k = &current.key;
                if let Some(front) = self.current {
                    if k <= front {
                        self.finish();
                        return None;
                    }
                }
                if !self.above_lbound(k) {
                    self.finish();
                    return None;
                }
                self.current_rev = Some(k);
                if let Some(n) = current.left.node() {
                    if self.left_in_bounds(k) {
                        self.stack_rev.push((false, n))
                    }
                }
                if self.below_ubound(k) {
                    return Some((k, &current.value));
                }
            }
        }
    }
}

impl<K, V> Node<K, V> {
    fn leaf(key: K, value: V) -> Self {
        Node {
            key,
            value,
            left: Tree::Empty,
            right: Tree::Empty,
            height: 1,
        }
    }

    fn balance(&self) -> i32 {
        self.left.height() as i32 - self.right.height() as i32
    }

    fn fix_height(&mut self) {
        self.height = 1 + max(self.left.height(), self.right.height());
    }

    // promote the right child
    fn rotate_left(mut self: Box<Self>) -> Box<Self> {
        let mut pivot = match mem::take(&mut self.right) {
            Tree::Node(n) => n,
            Tree::Empty => panic!("tree heights are wrong, nothing to rotate left"),
        };
        trace!(height = self.height, "rotate left");
        self.right = mem::take(&mut pivot.left);
        self.fix_height();
        pivot.left = Tree::Node(self);
        pivot.fix_height();
        pivot
    }

    // promote the left child
    fn rotate_right(mut self: Box<Self>) -> Box<Self> {
        let mut pivot = match mem::take(&mut self.left) {
            Tree::Node(n) => n,
            Tree::Empty => panic!("tree heights are wrong, nothing to rotate right"),
        };
        trace!(height = self.height, "rotate right");
        self.left = mem::take(&mut pivot.right);
        self.fix_height();
        pivot.right = Tree::Node(self);
        pivot.fix_height();
        pivot
    }

    /// Restore the avl property at this node. The children must
    /// already be balanced and the cached height must be current.
    fn rebalance(mut self: Box<Self>) -> Box<Self> {
        let balance = self.balance();
        if balance > 1 {
            if self.left.balance() < 0 {
                self.left = mem::take(&mut self.left).map_node(Node::rotate_left);
            }
            self.rotate_right()
        } else if balance < -1 {
            if self.right.balance() > 0 {
                self.right = mem::take(&mut self.right).map_node(Node::rotate_right);
            }
            self.rotate_left()
        } else {
            self
        }
    }

    // unlink the smallest binding in this subtree
    fn remove_min(mut self: Box<Self>) -> (Tree<K, V>, K, V) {
        match mem::take(&mut self.left) {
            Tree::Empty => {
                let Node { key, value, right, .. } = *self;
                (right, key, value)
            }
            Tree::Node(l) => {
                let (l, key, value) = l.remove_min();
                self.left = l;
                self.fix_height();
                (Tree::Node(self.rebalance()), key, value)
            }
        }
    }

    // unlink the binding held by this node, returning what replaces it
    fn remove_root(mut self: Box<Self>) -> (Tree<K, V>, K, V) {
        match (mem::take(&mut self.left), mem::take(&mut self.right)) {
            (Tree::Empty, right) => {
                let Node { key, value, .. } = *self;
                (right, key, value)
            }
            (left, Tree::Empty) => {
                let Node { key, value, .. } = *self;
                (left, key, value)
            }
            (left, Tree::Node(right)) => {
                // the in order successor's binding moves into this node, the
                // successor's own node is the one that gets unlinked
                let (right, key, value) = right.remove_min();
                trace!(height = self.height, "replace with in order successor");
                self.left = left;
                self.right = right;
                let key = mem::replace(&mut self.key, key);
                let value = mem::replace(&mut self.value, value);
                self.fix_height();
                (Tree::Node(self.rebalance()), key, value)
            }
        }
    }
}

impl<K, V> Tree<K, V> {
    pub(crate) fn new() -> Self {
        Tree::Empty
    }

    pub(crate) fn height(&self) -> u16 {
        match self {
            Tree::Empty => 0,
            Tree::Node(n) => n.height,
        }
    }

    pub(crate) fn node(&self) -> Option<&Node<K, V>> {
        match self {
            Tree::Empty => None,
            Tree::Node(n) => Some(&**n),
        }
    }

    fn balance(&self) -> i32 {
        match self {
            Tree::Empty => 0,
            Tree::Node(n) => n.balance(),
        }
    }

    fn map_node<F>(self, f: F) -> Self
    where
        F: FnOnce(Box<Node<K, V>>) -> Box<Node<K, V>>,
    {
        match self {
            Tree::Empty => Tree::Empty,
            Tree::Node(n) => Tree::Node(f(n)),
        }
    }

    pub(crate) fn range<'a, Q>(&'a self, lbound: Bound<Q>, ubound: Bound<Q>) -> Iter<'a, Q, K, V>
    where
        Q: Ord,
        K: Borrow<Q> + Ord,
    {
        let mut stack = ArrayVec::new();
        let mut stack_rev = ArrayVec::new();
        if let Some(n) = self.node() {
            stack.push((false, n));
            stack_rev.push((false, n));
        }
        Iter {
            lbound,
            ubound,
            stack,
            current: None,
            stack_rev,
            current_rev: None,
        }
    }

    /// insert the binding k -> v, if k is already bound, replace the
    /// value in place and return the old one. Returns the new root of
    /// this subtree.
    pub(crate) fn insert(self, k: K, v: V) -> (Self, Option<V>)
    where
        K: Ord,
    {
        match self {
            Tree::Empty => (Tree::Node(Box::new(Node::leaf(k, v))), None),
            Tree::Node(mut n) => {
                let prev = match k.cmp(&n.key) {
                    Ordering::Less => {
                        let (l, prev) = mem::take(&mut n.left).insert(k, v);
                        n.left = l;
                        prev
                    }
                    Ordering::Greater => {
                        let (r, prev) = mem::take(&mut n.right).insert(k, v);
                        n.right = r;
                        prev
                    }
                    Ordering::Equal => {
                        let prev = mem::replace(&mut n.value, v);
                        return (Tree::Node(n), Some(prev));
                    }
                };
                n.fix_height();
                (Tree::Node(n.rebalance()), prev)
            }
        }
    }

    /// remove the binding for q, returning the new root of this subtree
    /// and the removed binding. If q isn't bound the shape of the tree
    /// is not touched.
    pub(crate) fn remove<Q>(self, q: &Q) -> (Self, Option<(K, V)>)
    where
        Q: ?Sized + Ord,
        K: Borrow<Q>,
    {
        match self {
            Tree::Empty => (Tree::Empty, None),
            Tree::Node(mut n) => {
                let removed = match q.cmp(n.key.borrow()) {
                    Ordering::Less => {
                        let (l, removed) = mem::take(&mut n.left).remove(q);
                        n.left = l;
                        removed
                    }
                    Ordering::Greater => {
                        let (r, removed) = mem::take(&mut n.right).remove(q);
                        n.right = r;
                        removed
                    }
                    Ordering::Equal => {
                        let (t, k, v) = n.remove_root();
                        return (t, Some((k, v)));
                    }
                };
                if removed.is_some() {
                    n.fix_height();
                    n = n.rebalance();
                }
                (Tree::Node(n), removed)
            }
        }
    }

    pub(crate) fn get_full<'a, Q>(&'a self, q: &Q) -> Option<(&'a K, &'a V)>
    where
        Q: ?Sized + Ord,
        K: Borrow<Q>,
    {
        let mut t = self;
        while let Tree::Node(n) = t {
            match q.cmp(n.key.borrow()) {
                Ordering::Less => t = &n.left,
                Ordering::Greater => t = &n.right,
                Ordering::Equal => return Some((&n.key, &n.value)),
            }
        }
        None
    }

    pub(crate) fn get_mut<'a, Q>(&'a mut self, q: &Q) -> Option<&'a mut V>
    where
        Q: ?Sized + Ord,
        K: Borrow<Q>,
    {
        let mut t = self;
        loop {
            match t {
                Tree::Empty => return None,
                Tree::Node(n) => match q.cmp(n.key.borrow()) {
                    Ordering::Less => t = &mut n.left,
                    Ordering::Greater => t = &mut n.right,
                    Ordering::Equal => return Some(&mut n.value),
                },
            }
        }
    }

    /// append every key k with lo <= k <= hi to keys in ascending order
    pub(crate) fn find_keys<Q>(&self, lo: &Q, hi: &Q, keys: &mut Vec<K>)
    where
        Q: ?Sized + Ord,
        K: Borrow<Q> + Clone,
    {
        if let Tree::Node(n) = self {
            let k: &Q = n.key.borrow();
            if lo < k {
                n.left.find_keys(lo, hi, keys);
            }
            if lo <= k && k <= hi {
                keys.push(n.key.clone());
            }
            if k < hi {
                n.right.find_keys(lo, hi, keys);
            }
        }
    }

    pub(crate) fn sorted_keys(&self, keys: &mut Vec<K>)
    where
        K: Clone,
    {
        if let Tree::Node(n) = self {
            n.left.sorted_keys(keys);
            keys.push(n.key.clone());
            n.right.sorted_keys(keys);
        }
    }
}

impl<K, V> Tree<K, V>
where
    K: Ord + Debug,
{
    /// panic unless the tree is ordered, every cached height is right,
    /// every node is balanced, and there are exactly len nodes.
    #[allow(dead_code)]
    pub(crate) fn invariant(&self, len: usize) {
        fn check<'a, K, V>(t: &'a Tree<K, V>, lower: Option<&'a K>, upper: Option<&'a K>) -> (u16, usize)
        where
            K: Ord + Debug,
        {
            match t {
                Tree::Empty => (0, 0),
                Tree::Node(n) => {
                    let above = lower.map_or(true, |l| *l < n.key);
                    let below = upper.map_or(true, |u| n.key < *u);
                    if !above || !below {
                        panic!(
                            "tree invariant violated, key {:?} lower {:?} upper {:?}",
                            n.key, lower, upper
                        )
                    }
                    let (hl, ll) = check(&n.left, lower, Some(&n.key));
                    let (hr, lr) = check(&n.right, Some(&n.key), upper);
                    let height = 1 + max(hl, hr);
                    if n.height != height {
                        panic!("cached height {} at {:?} should be {}", n.height, n.key, height)
                    }
                    if (hl as i32 - hr as i32).abs() > 1 {
                        panic!("tree is unbalanced at {:?}, left {} right {}", n.key, hl, hr)
                    }
                    (height, ll + lr + 1)
                }
            }
        }
        let (_, n) = check(self, None, None);
        if n != len {
            panic!("length is wrong expected {} got {}", len, n)
        }
    }
}
