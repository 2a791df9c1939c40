//! Silent correlated OT orchestration.
//!
//! A [`Sender`] and [`Receiver`] pair serves batches of any size on top of an expander which
//! only produces fixed-size rounds. Each party keeps a buffer of undistributed correlations,
//! drains whole rounds into it when a request exceeds what is buffered, and splits requests off
//! its front. Both parties must issue the same sequence of requests so their buffers stay
//! index-aligned.
//!
//! Any failure while producing a round or applying a correction is an abort: the buffer is
//! discarded and every later call fails with a state error.

mod error;
mod receiver;
mod sender;

pub use error::{ErrorKind, ReceiverError, SenderError};
pub use receiver::Receiver;
pub use sender::Sender;

#[cfg(test)]
mod tests {
    use std::marker::PhantomData;

    use async_trait::async_trait;
    use scot_common::{executor::DummyExecutor, Allocate, Context, Preprocess};
    use scot_core::Block;
    use scot_ot_core::{ReceiverBatch, ReceiverCot, SenderBatch, SenderCot};

    use super::*;
    use crate::{derandomize, Initializable, OTError, RoundSource};

    /// Produces rounds of consecutive integers, failing at a chosen round.
    #[derive(Debug)]
    struct Scripted<P> {
        capacity: usize,
        round_size: usize,
        produced: usize,
        fail_at: Option<usize>,
        _pd: PhantomData<P>,
    }

    impl<P> Scripted<P> {
        fn new(capacity: usize, fail_at: Option<usize>) -> Self {
            Self {
                capacity,
                round_size: 0,
                produced: 0,
                fail_at,
                _pd: PhantomData,
            }
        }

        /// Returns the range of values in the next round.
        fn next_round(&mut self) -> Result<std::ops::Range<usize>, OTError> {
            if self.fail_at == Some(self.produced) {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionAborted,
                    "round failed",
                )
                .into());
            }

            let start = self.produced * self.round_size;
            self.produced += 1;

            Ok(start..start + self.round_size)
        }
    }

    #[async_trait]
    impl<Ctx: Context, P: Send> Initializable<Ctx> for Scripted<P> {
        async fn initialize(&mut self, _ctx: &mut Ctx, round_size: usize) -> Result<(), OTError> {
            self.round_size = round_size;
            Ok(())
        }
    }

    #[async_trait]
    impl<Ctx: Context> RoundSource<Ctx> for Scripted<SenderCot> {
        type Payload = SenderCot;

        fn capacity(&self) -> usize {
            self.capacity
        }

        fn params(&self) -> Option<Block> {
            (self.round_size > 0).then_some(Block::ONES)
        }

        async fn produce_round(&mut self, _ctx: &mut Ctx) -> Result<SenderBatch, OTError> {
            let range = self.next_round()?;

            Ok(SenderBatch::from_msgs(
                Block::ONES,
                range.map(|i| Block::from(i as u128)),
            ))
        }
    }

    #[async_trait]
    impl<Ctx: Context> RoundSource<Ctx> for Scripted<ReceiverCot> {
        type Payload = ReceiverCot;

        fn capacity(&self) -> usize {
            self.capacity
        }

        fn params(&self) -> Option<()> {
            (self.round_size > 0).then_some(())
        }

        async fn produce_round(&mut self, _ctx: &mut Ctx) -> Result<ReceiverBatch, OTError> {
            let range = self.next_round()?;

            let choices = range.clone().map(|i| i % 2 == 1).collect();
            let msgs = range.map(|i| Block::from(i as u128)).collect();

            Ok(ReceiverBatch::from_parts(choices, msgs).unwrap())
        }
    }

    fn sender(
        capacity: usize,
        fail_at: Option<usize>,
    ) -> Sender<Scripted<SenderCot>, derandomize::Sender> {
        Sender::new(Scripted::new(capacity, fail_at), derandomize::Sender::new())
    }

    fn receiver(
        capacity: usize,
        fail_at: Option<usize>,
    ) -> Receiver<Scripted<ReceiverCot>, derandomize::Receiver> {
        Receiver::new(Scripted::new(capacity, fail_at), derandomize::Receiver::new())
    }

    #[tokio::test]
    async fn test_serves_in_order_across_rounds() {
        let mut ctx = DummyExecutor::default();
        let mut sender = sender(1000, None);

        sender.init(&mut ctx, 100).await.unwrap();
        assert_eq!(sender.round_size(), Some(100));
        assert_eq!(sender.delta(), Some(Block::ONES));

        let first = sender.send_random(&mut ctx, 30).await.unwrap();
        let second = sender.send_random(&mut ctx, 250).await.unwrap();

        let expected: Vec<Block> = (0..280u128).map(Block::from).collect();
        let served: Vec<Block> = first.into_msgs().into_iter().chain(second.into_msgs()).collect();

        assert_eq!(served, expected);
        assert_eq!(sender.rounds(), 3);
        assert_eq!(sender.remaining(), 20);
    }

    #[tokio::test]
    async fn test_buffered_request_drains_nothing() {
        let mut ctx = DummyExecutor::default();
        let mut sender = sender(1000, Some(1));

        sender.init(&mut ctx, 64).await.unwrap();
        sender.send_random(&mut ctx, 1).await.unwrap();
        sender.send_random(&mut ctx, 63).await.unwrap();

        assert_eq!(sender.rounds(), 1);
        assert_eq!(sender.remaining(), 0);
    }

    #[tokio::test]
    async fn test_zero_count_is_empty() {
        let mut ctx = DummyExecutor::default();
        let mut sender = sender(1000, Some(0));

        sender.init(&mut ctx, 10).await.unwrap();
        let batch = sender.send_random(&mut ctx, 0).await.unwrap();

        assert!(batch.is_empty());
        assert_eq!(batch.delta(), Block::ONES);
        assert_eq!(sender.rounds(), 0);
        assert!(!sender.is_destroyed());
    }

    #[tokio::test]
    async fn test_round_failure_destroys_session() {
        let mut ctx = DummyExecutor::default();
        let mut sender = sender(1000, Some(1));

        sender.init(&mut ctx, 50).await.unwrap();
        sender.send_random(&mut ctx, 10).await.unwrap();

        let err = sender.send_random(&mut ctx, 100).await.unwrap_err();
        assert!(err.is_abort());
        assert!(sender.is_destroyed());
        assert_eq!(sender.remaining(), 0);

        let err = sender.send_random(&mut ctx, 1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[tokio::test]
    async fn test_closed_channel_aborts_correction() {
        let mut ctx = DummyExecutor::default();
        let mut sender = sender(1000, None);

        sender.init(&mut ctx, 50).await.unwrap();

        let err = sender.send_chosen(&mut ctx, 10).await.unwrap_err();
        assert!(err.is_abort());
        assert!(sender.is_destroyed());
    }

    #[tokio::test]
    async fn test_init_errors() {
        let mut ctx = DummyExecutor::default();
        let mut sender = sender(1000, None);

        let err = sender.send_random(&mut ctx, 1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);

        let err = sender.init(&mut ctx, 0).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(!sender.is_destroyed());

        sender.init(&mut ctx, 5000).await.unwrap();
        assert_eq!(sender.round_size(), Some(1000));

        let err = sender.init(&mut ctx, 10).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(sender.round_size(), Some(1000));
    }

    #[tokio::test]
    async fn test_receiver_zero_count_is_empty() {
        let mut ctx = DummyExecutor::default();
        let mut receiver = receiver(1000, Some(0));

        receiver.init(&mut ctx, 10).await.unwrap();

        let batch = receiver.receive_random(&mut ctx, 0).await.unwrap();
        assert!(batch.is_empty());

        // Correcting an empty batch sends nothing, so the closed channel is never touched.
        let batch = receiver.receive_chosen(&mut ctx, &[]).await.unwrap();
        assert!(batch.is_empty());

        assert_eq!(receiver.rounds(), 0);
        assert!(!receiver.is_destroyed());
    }

    #[tokio::test]
    async fn test_receiver_serves_in_order_across_rounds() {
        let mut ctx = DummyExecutor::default();
        let mut receiver = receiver(1000, None);

        receiver.init(&mut ctx, 40).await.unwrap();

        let first = receiver.receive_random(&mut ctx, 25).await.unwrap();
        let second = receiver.receive_random(&mut ctx, 50).await.unwrap();

        let (mut choices, mut msgs) = first.into_parts();
        let (more_choices, more_msgs) = second.into_parts();
        choices.extend(more_choices);
        msgs.extend(more_msgs);

        assert_eq!(msgs, (0..75u128).map(Block::from).collect::<Vec<_>>());
        assert_eq!(choices, (0..75).map(|i| i % 2 == 1).collect::<Vec<_>>());
        assert_eq!(receiver.rounds(), 2);
        assert_eq!(receiver.remaining(), 5);
    }

    #[tokio::test]
    async fn test_receiver_round_failure_destroys_session() {
        let mut ctx = DummyExecutor::default();
        let mut receiver = receiver(1000, Some(1));

        receiver.init(&mut ctx, 50).await.unwrap();
        receiver.receive_random(&mut ctx, 10).await.unwrap();

        let err = receiver.receive_random(&mut ctx, 100).await.unwrap_err();
        assert!(err.is_abort());
        assert!(receiver.is_destroyed());
        assert_eq!(receiver.remaining(), 0);

        let err = receiver.receive_chosen(&mut ctx, &[true]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[tokio::test]
    async fn test_receiver_closed_channel_aborts_correction() {
        let mut ctx = DummyExecutor::default();
        let mut receiver = receiver(1000, None);

        receiver.init(&mut ctx, 50).await.unwrap();

        let err = receiver
            .receive_chosen(&mut ctx, &[true, false, true])
            .await
            .unwrap_err();
        assert!(err.is_abort());
        assert!(receiver.is_destroyed());
        assert_eq!(receiver.remaining(), 0);

        let err = receiver.receive_random(&mut ctx, 1).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);

        let err = receiver.init(&mut ctx, 10).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[tokio::test]
    async fn test_preprocess_fills_unserved_allocations() {
        let mut ctx = DummyExecutor::default();
        let mut sender = sender(1000, None);
        let mut receiver = receiver(1000, None);

        sender.init(&mut ctx, 100).await.unwrap();
        receiver.init(&mut ctx, 100).await.unwrap();

        sender.alloc(150);
        receiver.alloc(150);
        sender.preprocess(&mut ctx).await.unwrap();
        receiver.preprocess(&mut ctx).await.unwrap();
        assert_eq!(sender.remaining(), 200);
        assert_eq!(receiver.remaining(), 200);

        sender.alloc(150);
        receiver.alloc(150);
        sender.preprocess(&mut ctx).await.unwrap();
        receiver.preprocess(&mut ctx).await.unwrap();
        assert_eq!(sender.rounds(), 3);
        assert_eq!(receiver.remaining(), 300);

        sender.send_random(&mut ctx, 250).await.unwrap();
        receiver.receive_random(&mut ctx, 250).await.unwrap();

        // 50 allocated correlations are still unserved and already buffered.
        sender.alloc(100);
        receiver.alloc(100);
        sender.preprocess(&mut ctx).await.unwrap();
        receiver.preprocess(&mut ctx).await.unwrap();
        assert_eq!(sender.rounds(), 4);
        assert_eq!(receiver.rounds(), 4);
        assert_eq!(sender.remaining(), 150);
        assert_eq!(receiver.remaining(), 150);
    }
}
