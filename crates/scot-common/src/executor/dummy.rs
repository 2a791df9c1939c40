use serio::channel::{duplex, MemoryDuplex};

use crate::{context::Context, ThreadId};

/// An executor whose peer has already hung up.
///
/// Receiving yields end-of-stream and sending fails, which lets tests show that an operation
/// either completes without talking to the peer or aborts when the channel is gone.
pub struct DummyExecutor {
    id: ThreadId,
    io: MemoryDuplex,
}

impl std::fmt::Debug for DummyExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DummyExecutor")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl Default for DummyExecutor {
    fn default() -> Self {
        let (io, _peer) = duplex(1);

        Self {
            id: ThreadId::default(),
            io,
        }
    }
}

impl Context for DummyExecutor {
    type Io = MemoryDuplex;

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
    use serio::{stream::IoStreamExt, SinkExt};

    use super::*;

    #[test]
    fn test_dummy_peer_is_gone() {
        let mut ctx = DummyExecutor::default();

        let received: Result<u8, _> = block_on(ctx.io_mut().expect_next());
        assert!(received.is_err());

        assert!(block_on(ctx.io_mut().send(1u8)).is_err());
    }
}
