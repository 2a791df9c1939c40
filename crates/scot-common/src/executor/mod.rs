//! Executors, each providing the [`Context`](crate::Context) of one protocol thread.

mod dummy;
mod st;

pub use dummy::DummyExecutor;
pub use st::STExecutor;

#[cfg(any(test, feature = "test-utils"))]
pub use test_utils::test_st_executor;

#[cfg(any(test, feature = "test-utils"))]
mod test_utils {
    use serio::channel::{duplex, MemoryDuplex};

    use super::STExecutor;

    /// Returns the two ends of a session, connected by an in-memory channel holding up to
    /// `capacity` in-flight messages per direction.
    pub fn test_st_executor(
        capacity: usize,
    ) -> (STExecutor<MemoryDuplex>, STExecutor<MemoryDuplex>) {
        let (left, right) = duplex(capacity);

        (STExecutor::new(left), STExecutor::new(right))
    }
}
