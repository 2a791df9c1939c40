//! CPU backend for the data-parallel part of a round.
//!
//! A round's LPN encoding is moved off the async task into [`CpuBackend::blocking`]. Awaiting
//! the result is the barrier between the parallel computation and the next buffer operation.

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(all(feature = "rayon", not(feature = "force-st")))] {
        pub use pool::PoolBackend as CpuBackend;
    } else {
        pub use inline::InlineBackend as CpuBackend;
    }
}

#[cfg(any(feature = "force-st", not(feature = "rayon")))]
mod inline {
    /// Runs work on the calling task.
    #[derive(Debug)]
    pub struct InlineBackend;

    impl InlineBackend {
        /// Runs `f` to completion and returns its output.
        pub async fn blocking<F, R>(f: F) -> R
        where
            F: FnOnce() -> R + Send + 'static,
            R: Send + 'static,
        {
            f()
        }
    }
}

#[cfg(all(feature = "rayon", not(feature = "force-st")))]
mod pool {
    use futures::channel::oneshot;

    /// Runs work on the global rayon pool.
    #[derive(Debug)]
    pub struct PoolBackend;

    impl PoolBackend {
        /// Spawns `f` on the pool and resolves once it has finished.
        pub async fn blocking<F, R>(f: F) -> R
        where
            F: FnOnce() -> R + Send + 'static,
            R: Send + 'static,
        {
            let (tx, rx) = oneshot::channel();
            rayon::spawn(move || {
                _ = tx.send(f());
            });

            rx.await.expect("pool task sends its output before exiting")
        }
    }
}
