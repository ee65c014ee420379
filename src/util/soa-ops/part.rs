/* ************************************************************************ **
** This file is part of trajsplit, and is licensed under EITHER the MIT     **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

/// Type of "a thing that has been partitioned."
///
/// It is a `V` that has been broken up into many smaller `V`s,
/// each associated with a label `L`. (such as "train" or "test")
pub type Parted<L, V> = Vec<(L, V)>;

/// A partition operator.
///
/// It represents a specific way to break up a vector into smaller vectors,
/// each with a label of type `L`.  The regions are not necessarily
/// contiguous in the original vector.  Basically, `Part` contains a
/// partitioned form of the vector's indices.
///
/// Using the [`Partition`] trait, a `Part<L>` can be applied to any
/// `V` that implements `Partition` in order to break it up into a
/// [`Parted<L, V>`].
///
/// The indices within each region are always stored in ascending order,
/// regardless of the order in which they were supplied.
///
/// [`Partition`]: trait.Partition.html
/// [`Parted`]: type.Parted.html
#[derive(Debug, Clone, PartialEq)]
pub struct Part<L> {
    // the total size, precomputed.
    index_limit: usize,
    part: Parted<L, Vec<usize>>,
}

#[derive(Debug, Fail)]
#[fail(display = "Tried to construct an invalid partition.")]
pub struct InvalidPartitionError(::failure::Backtrace);

impl<L> Part<L> {
    /// Create a partition that decomposes a vector entirely.
    ///
    /// Every integer from 0 to the total length must appear exactly once.
    pub fn new(mut part: Parted<L, Vec<usize>>) -> Result<Self, InvalidPartitionError>
    {Ok({
        let index_limit = part.iter().map(|(_, v)| v.len()).sum();
        if !Self::validate_part(&part, index_limit) {
            return Err(InvalidPartitionError(::failure::Backtrace::new()))
        }
        for (_, indices) in &mut part {
            indices.sort();
        }
        Part { part, index_limit }
    })}

    /// The length of the vectors this partition applies to.
    pub fn index_limit(&self) -> usize
    { self.index_limit }

    /// Iterate over the keys for each region.
    pub fn region_keys(&self) -> impl ExactSizeIterator<Item=&L>
    { self.part.iter().map(|(label, _)| label) }

    /// Iterate over the (ascending) index vectors for each region.
    pub fn region_indices(&self) -> impl ExactSizeIterator<Item=&[usize]>
    { self.part.iter().map(|(_, idx)| &idx[..]) }

    /// Get the indices of the first region with the given label.
    pub fn indices_of(&self, label: &L) -> Option<&[usize]>
    where L: PartialEq,
    {
        self.part.iter()
            .find(|(key, _)| key == label)
            .map(|(_, idx)| &idx[..])
    }

    /// For each index in `0..index_limit`, the position of the region containing it.
    pub fn region_of_each(&self) -> Vec<usize>
    {
        let mut out = vec![::std::usize::MAX; self.index_limit];
        for (region, (_, indices)) in self.part.iter().enumerate() {
            for &i in indices {
                out[i] = region;
            }
        }
        debug_assert!(out.iter().all(|&r| r != ::std::usize::MAX));
        out
    }

    fn validate_part(part: &Parted<L, Vec<usize>>, index_limit: usize) -> bool
    {
        let slices: Vec<_> = part.iter().map(|(_, v)| &v[..]).collect();
        let mut xs = slices.concat();
        xs.sort();
        xs.into_iter().eq(0..index_limit)
    }
}

/// Trait for applying a `Part` to a `Vec` (or similar type), breaking it into pieces.
pub trait Partition: Sized {
    /// Consume self to produce partitions.
    ///
    /// The ordering within each partition reflects the original order of
    /// those elements relative to each other in the input, rather than
    /// the order of the indices in `part`.
    ///
    /// # Panics
    ///
    /// Panics if the length of `self` does not match `part.index_limit()`.
    fn into_partitions<L: Clone>(self, part: &Part<L>) -> Parted<L, Self>;
}

impl<T> Partition for Vec<T> {
    fn into_partitions<L: Clone>(self, part: &Part<L>) -> Parted<L, Self>
    {
        assert_eq!(
            self.len(), part.index_limit(),
            "partition does not match the length of the data",
        );

        let mut pieces: Vec<Vec<T>> = {
            part.region_indices()
                .map(|indices| Vec::with_capacity(indices.len()))
                .collect()
        };
        for (item, region) in self.into_iter().zip(part.region_of_each()) {
            pieces[region].push(item);
        }
        crate::util::zip_eq(part.region_keys().cloned(), pieces).collect()
    }
}
