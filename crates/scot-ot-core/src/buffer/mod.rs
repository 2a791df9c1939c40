//! Ordered buffers of correlated randomness.
//!
//! A [`CorrelationBuffer`] is a FIFO of correlation instances tagged with the session parameters
//! they were generated under. Instances are appended at the tail with [`merge`] and removed from
//! the head with [`split`], so two parties that apply the same sequence of merges and splits to
//! their own buffers stay index-aligned without ever coordinating.
//!
//! The buffer is generic over a [`Payload`], which fixes the session parameter type and a validity
//! predicate checked for every instance entering the buffer.
//!
//! [`merge`]: CorrelationBuffer::merge
//! [`split`]: CorrelationBuffer::split

mod cot;
mod nary;
mod triple;

use std::{collections::VecDeque, fmt::Debug, mem};

pub use cot::{ReceiverBatch, ReceiverCot, ReceiverInstance, SenderBatch, SenderCot};
pub use nary::NaryOt;
pub use triple::{RingTriple, TripleShare};

/// Errors that can occur when operating on a [`CorrelationBuffer`].
///
/// Every variant is a configuration error: it is raised by a caller violating a precondition
/// and is never a signal from the peer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[allow(missing_docs)]
pub enum BufferError {
    #[error("buffers were generated under different session parameters")]
    ConfigMismatch,
    #[error("insufficient data: requested {requested}, available {available}")]
    InsufficientData { requested: usize, available: usize },
    #[error("invalid count: {0}, must be greater than zero")]
    InvalidCount(usize),
    #[error("instance {index} is not valid under the buffer's parameters")]
    InvalidItem { index: usize },
    #[error("length mismatch: {choices} choices, {msgs} messages")]
    LengthMismatch { choices: usize, msgs: usize },
}

/// A kind of correlation which can be held in a [`CorrelationBuffer`].
pub trait Payload {
    /// Parameters every instance of a buffer is generated under.
    type Params: Clone + PartialEq + Debug + Send + Sync + 'static;
    /// A single correlation instance.
    type Item: Clone + PartialEq + Debug + Send + Sync + 'static;

    /// Returns `true` if `item` is a well-formed instance under `params`.
    fn is_valid(params: &Self::Params, item: &Self::Item) -> bool;
}

/// An ordered buffer of correlation instances.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationBuffer<P: Payload> {
    params: P::Params,
    items: VecDeque<P::Item>,
}

impl<P: Payload> CorrelationBuffer<P> {
    /// Creates an empty buffer tagged with `params`.
    pub fn new(params: P::Params) -> Self {
        Self {
            params,
            items: VecDeque::new(),
        }
    }

    /// Creates a buffer holding `items`, checking each of them.
    pub fn from_items(
        params: P::Params,
        items: impl IntoIterator<Item = P::Item>,
    ) -> Result<Self, BufferError> {
        let items: VecDeque<_> = items.into_iter().collect();
        validate::<P>(&params, &items)?;

        Ok(Self { params, items })
    }

    /// Returns the session parameters of the buffer.
    pub fn params(&self) -> &P::Params {
        &self.params
    }

    /// Returns the number of instances in the buffer.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the buffer holds no instances.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns an iterator over the instances, in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &P::Item> {
        self.items.iter()
    }

    /// Returns the instances, in order.
    pub fn into_items(self) -> Vec<P::Item> {
        self.items.into()
    }

    pub(crate) fn items_mut(&mut self) -> impl Iterator<Item = &mut P::Item> {
        self.items.iter_mut()
    }

    /// Appends the contents of `other`, preserving order.
    ///
    /// Fails without modifying `self` if `other` was generated under different parameters or
    /// holds an invalid instance.
    pub fn merge(&mut self, other: Self) -> Result<(), BufferError> {
        if self.params != other.params {
            return Err(BufferError::ConfigMismatch);
        }

        validate::<P>(&self.params, &other.items)?;

        if self.items.is_empty() {
            self.items = other.items;
        } else {
            self.items.extend(other.items);
        }

        Ok(())
    }

    /// Removes the first `count` instances and returns them, in order.
    pub fn split(&mut self, count: usize) -> Result<Self, BufferError> {
        if count == 0 {
            return Err(BufferError::InvalidCount(count));
        }

        if count > self.items.len() {
            return Err(BufferError::InsufficientData {
                requested: count,
                available: self.items.len(),
            });
        }

        let items = if count == self.items.len() {
            mem::take(&mut self.items)
        } else {
            self.items.drain(..count).collect()
        };

        Ok(Self {
            params: self.params.clone(),
            items,
        })
    }

    /// Truncates the buffer to its first `count` instances.
    ///
    /// This is a no-op if the buffer holds `count` instances or fewer.
    pub fn reduce(&mut self, count: usize) -> Result<(), BufferError> {
        if count == 0 {
            return Err(BufferError::InvalidCount(count));
        }

        self.items.truncate(count);

        Ok(())
    }
}

fn validate<P: Payload>(params: &P::Params, items: &VecDeque<P::Item>) -> Result<(), BufferError> {
    match items.iter().position(|item| !P::is_valid(params, item)) {
        Some(index) => Err(BufferError::InvalidItem { index }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    /// A payload of plain integers tagged with a label, used to observe ordering.
    #[derive(Debug, Clone, PartialEq)]
    struct Labeled;

    impl Payload for Labeled {
        type Params = u8;
        type Item = u32;

        fn is_valid(_params: &u8, item: &u32) -> bool {
            *item != u32::MAX
        }
    }

    fn buffer(range: std::ops::Range<u32>) -> CorrelationBuffer<Labeled> {
        CorrelationBuffer::from_items(0, range).unwrap()
    }

    #[rstest]
    #[case(1)]
    #[case(7)]
    #[case(10)]
    fn test_split_returns_prefix(#[case] count: usize) {
        let mut buf = buffer(0..10);

        let head = buf.split(count).unwrap();

        assert_eq!(head.into_items(), (0..count as u32).collect::<Vec<_>>());
        assert_eq!(buf.len(), 10 - count);
        assert_eq!(buf.iter().next().copied(), (count < 10).then_some(count as u32));
    }

    #[test]
    fn test_split_zero_is_rejected() {
        let mut buf = buffer(0..10);

        assert_eq!(buf.split(0), Err(BufferError::InvalidCount(0)));
        assert_eq!(buf.len(), 10);
    }

    #[test]
    fn test_split_insufficient_data() {
        let mut buf = buffer(0..10);

        assert_eq!(
            buf.split(11),
            Err(BufferError::InsufficientData {
                requested: 11,
                available: 10
            })
        );
        // Nothing was removed.
        assert_eq!(buf, buffer(0..10));
    }

    #[test]
    fn test_merge_then_split_returns_first() {
        let a = buffer(0..5);
        let b = buffer(5..12);

        let mut merged = a.clone();
        merged.merge(b.clone()).unwrap();

        assert_eq!(merged.len(), 12);
        assert_eq!(merged.split(a.len()).unwrap(), a);
        assert_eq!(merged, b);
    }

    #[test]
    fn test_merge_into_empty() {
        let mut buf = CorrelationBuffer::<Labeled>::new(0);
        buf.merge(buffer(0..3)).unwrap();

        assert_eq!(buf, buffer(0..3));
    }

    #[test]
    fn test_merge_config_mismatch() {
        let mut buf = buffer(0..3);
        let other = CorrelationBuffer::<Labeled>::from_items(1, 3..6).unwrap();

        assert_eq!(buf.merge(other), Err(BufferError::ConfigMismatch));
        assert_eq!(buf, buffer(0..3));
    }

    #[test]
    fn test_invalid_item_is_rejected() {
        assert_eq!(
            CorrelationBuffer::<Labeled>::from_items(0, [1, u32::MAX]),
            Err(BufferError::InvalidItem { index: 1 })
        );
    }

    #[rstest]
    #[case::shrinks(4, 4)]
    #[case::exact(10, 10)]
    #[case::larger_is_noop(25, 10)]
    fn test_reduce(#[case] count: usize, #[case] expected: usize) {
        let mut buf = buffer(0..10);

        buf.reduce(count).unwrap();

        assert_eq!(buf, buffer(0..expected as u32));
    }

    #[test]
    fn test_reduce_zero_is_rejected() {
        let mut buf = buffer(0..10);

        assert_eq!(buf.reduce(0), Err(BufferError::InvalidCount(0)));
    }
}
