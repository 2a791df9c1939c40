use serio::{IoSink, IoStream};

use crate::{context::Context, ThreadId};

/// A single-threaded executor.
///
/// Runs one protocol thread over a single I/O channel. The round-draining loop of a session is
/// sequential, so one executor per party is all a session needs.
#[derive(Debug)]
pub struct STExecutor<Io> {
    id: ThreadId,
    io: Io,
}

impl<Io> STExecutor<Io>
where
    Io: IoSink + IoStream + Send + Unpin + 'static,
{
    /// Creates a new single-threaded executor.
    ///
    /// # Arguments
    ///
    /// * `io` - The I/O channel used by the executor.
    #[inline]
    pub fn new(io: Io) -> Self {
        Self {
            id: ThreadId::default(),
            io,
        }
    }

    /// Creates a new single-threaded executor with the given thread ID.
    #[inline]
    pub fn new_with_id(id: ThreadId, io: Io) -> Self {
        Self { id, io }
    }

    /// Returns the I/O channel, consuming the executor.
    pub fn into_io(self) -> Io {
        self.io
    }
}

impl<Io> Context for STExecutor<Io>
where
    Io: IoSink + IoStream + Send + Sync + Unpin + 'static,
{
    type Io = Io;

    fn id(&self) -> &ThreadId {
        &self.id
    }

    fn io_mut(&mut self) -> &mut Self::Io {
        &mut self.io
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serio::{channel::duplex, stream::IoStreamExt, SinkExt};

    use super::*;

    #[test]
    fn test_st_executor_io() {
        let (io_0, io_1) = duplex(1);
        let mut ctx_0 = STExecutor::new(io_0);
        let mut ctx_1 = STExecutor::new_with_id(ThreadId::new(1), io_1);

        block_on(async {
            ctx_0.io_mut().send(42u32).await.unwrap();
            let received: u32 = ctx_1.io_mut().expect_next().await.unwrap();

            assert_eq!(received, 42);
        });

        assert_eq!(ctx_1.id(), &ThreadId::new(1));
    }
}
