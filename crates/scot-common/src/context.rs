use serio::{IoSink, IoStream};

use crate::ThreadId;

/// A thread context.
///
/// A context is owned by exactly one logical protocol thread and carries the ordered, reliable
/// channel to the peer's matching thread.
pub trait Context: Send + Sync {
    /// I/O channel used by the thread.
    type Io: IoSink + IoStream + Send + Unpin + 'static;

    /// Returns the thread ID.
    fn id(&self) -> &ThreadId;

    /// Returns a mutable reference to the thread's I/O channel.
    fn io_mut(&mut self) -> &mut Self::Io;
}
