use serde::{Deserialize, Serialize};

use super::Payload;

/// Additive shares of multiplication triples over the ring `Z_m`.
///
/// The buffer's session parameter is the modulus `m`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingTriple;

/// One party's share of a multiplication triple `(a, b, c)` with `c = a * b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct TripleShare {
    pub a: u64,
    pub b: u64,
    pub c: u64,
}

impl Payload for RingTriple {
    type Params = u64;
    type Item = TripleShare;

    fn is_valid(modulus: &u64, share: &TripleShare) -> bool {
        [share.a, share.b, share.c]
            .into_iter()
            .all(|value| value < *modulus)
    }
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use crate::{BufferError, CorrelationBuffer};

    use super::*;

    #[rstest]
    #[case::in_range(TripleShare { a: 0, b: 6, c: 3 }, true)]
    #[case::a_out_of_range(TripleShare { a: 7, b: 0, c: 0 }, false)]
    #[case::c_out_of_range(TripleShare { a: 1, b: 1, c: 100 }, false)]
    fn test_triple_range(#[case] share: TripleShare, #[case] valid: bool) {
        assert_eq!(RingTriple::is_valid(&7, &share), valid);
    }

    #[test]
    fn test_triple_merge_rejects_out_of_range() {
        let mut buf = CorrelationBuffer::<RingTriple>::new(7);
        let other = CorrelationBuffer::<RingTriple> {
            params: 7,
            items: [TripleShare { a: 1, b: 2, c: 9 }].into(),
        };

        assert_eq!(buf.merge(other), Err(BufferError::InvalidItem { index: 0 }));
        assert!(buf.is_empty());
    }
}
