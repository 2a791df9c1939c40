use super::Payload;

/// Outputs of a 1-out-of-N OT, each a fixed-width byte string.
///
/// The buffer's session parameter is the output width in bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NaryOt;

impl Payload for NaryOt {
    type Params = usize;
    type Item = Vec<u8>;

    fn is_valid(width: &usize, output: &Vec<u8>) -> bool {
        output.len() == *width
    }
}

#[cfg(test)]
mod tests {
    use crate::{BufferError, CorrelationBuffer};

    use super::*;

    #[test]
    fn test_nary_width() {
        let mut buf = CorrelationBuffer::<NaryOt>::from_items(4, [vec![0; 4], vec![1; 4]]).unwrap();

        let other = CorrelationBuffer::<NaryOt>::from_items(4, [vec![2; 4]]).unwrap();
        buf.merge(other).unwrap();
        assert_eq!(buf.len(), 3);

        assert_eq!(
            CorrelationBuffer::<NaryOt>::from_items(4, [vec![0; 4], vec![0; 3]]),
            Err(BufferError::InvalidItem { index: 1 })
        );
    }

    #[test]
    fn test_nary_width_mismatch() {
        let mut buf = CorrelationBuffer::<NaryOt>::new(4);
        let other = CorrelationBuffer::<NaryOt>::from_items(8, [vec![0; 8]]).unwrap();

        assert_eq!(buf.merge(other), Err(BufferError::ConfigMismatch));
    }
}
