use crate::map::AvlMap;
use rayon::iter::{FromParallelIterator, IntoParallelIterator, ParallelExtend, ParallelIterator};

// the producers run on the rayon pool, the tree itself is only ever
// touched by the calling thread, in the order the bindings were produced
impl<K, V> ParallelExtend<(K, V)> for AvlMap<K, V>
where
    K: Ord + Send,
    V: Send,
{
    fn par_extend<I>(&mut self, par_iter: I)
    where
        I: IntoParallelIterator<Item = (K, V)>,
    {
        let elts: Vec<(K, V)> = par_iter.into_par_iter().collect();
        self.extend(elts)
    }
}

impl<K, V> FromParallelIterator<(K, V)> for AvlMap<K, V>
where
    K: Ord + Send,
    V: Send,
{
    fn from_par_iter<I>(par_iter: I) -> Self
    where
        I: IntoParallelIterator<Item = (K, V)>,
    {
        let mut m = AvlMap::new();
        m.par_extend(par_iter);
        m
    }
}
