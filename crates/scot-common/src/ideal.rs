//! Ideal functionality utilities.
//!
//! An ideal two-party functionality is a trusted party both endpoints call into. Each call
//! rendezvous on the caller's [`ThreadId`]: whichever party arrives first parks its input, the
//! second one evaluates the functionality and hands the first party its output.

use futures::channel::oneshot;
use std::{
    any::Any,
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{Context, ThreadId};

type BoxAny = Box<dyn Any + Send + 'static>;
type Parked = (BoxAny, oneshot::Sender<BoxAny>);

#[derive(Debug, Default)]
struct Slots {
    alice: HashMap<ThreadId, Parked>,
    bob: HashMap<ThreadId, Parked>,
}

#[derive(Debug)]
struct Shared<F> {
    f: Arc<Mutex<F>>,
    slots: Arc<Mutex<Slots>>,
}

impl<F> Clone for Shared<F> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            slots: self.slots.clone(),
        }
    }
}

impl<F> Shared<F> {
    fn lock(&self) -> MutexGuard<'_, F> {
        self.f.lock().expect("ideal functionality lock is not poisoned")
    }

    /// Either evaluates `eval` with the peer's parked input, or parks `input` and waits.
    async fn meet<I, O, P>(
        &self,
        id: &ThreadId,
        input: I,
        mine: fn(&mut Slots) -> &mut HashMap<ThreadId, Parked>,
        theirs: fn(&mut Slots) -> &mut HashMap<ThreadId, Parked>,
        eval: impl FnOnce(&mut F, I, P) -> (O, BoxAny),
    ) -> O
    where
        I: Send + 'static,
        O: Send + 'static,
        P: 'static,
    {
        let receiver = {
            let mut slots = self.slots.lock().expect("ideal slots lock is not poisoned");
            if let Some((peer_input, ret_peer)) = theirs(&mut slots).remove(id) {
                let peer_input = *peer_input
                    .downcast::<P>()
                    .expect("peer provided the expected input type");

                let (output, peer_output) = eval(&mut self.lock(), input, peer_input);
                _ = ret_peer.send(peer_output);

                return output;
            }

            let (sender, receiver) = oneshot::channel();
            mine(&mut slots).insert(*id, (Box::new(input), sender));
            receiver
        };

        let output = receiver.await.expect("peer did not drop the channel");
        *output
            .downcast::<O>()
            .expect("peer sent the expected output type")
    }
}

/// The ideal functionality from the perspective of Alice.
#[derive(Debug)]
pub struct Alice<F>(Shared<F>);

impl<F> Clone for Alice<F> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<F> Alice<F> {
    /// Returns a lock to the ideal functionality.
    pub fn lock(&self) -> MutexGuard<'_, F> {
        self.0.lock()
    }

    /// Calls the ideal functionality.
    pub async fn call<Ctx, C, IA, IB, OA, OB>(&mut self, ctx: &mut Ctx, input: IA, call: C) -> OA
    where
        Ctx: Context,
        C: FnOnce(&mut F, IA, IB) -> (OA, OB),
        IA: Send + 'static,
        IB: Send + 'static,
        OA: Send + 'static,
        OB: Send + 'static,
    {
        self.0
            .meet(
                ctx.id(),
                input,
                |slots| &mut slots.alice,
                |slots| &mut slots.bob,
                |f, a: IA, b: IB| {
                    let (oa, ob) = call(f, a, b);
                    (oa, Box::new(ob) as BoxAny)
                },
            )
            .await
    }
}

/// The ideal functionality from the perspective of Bob.
#[derive(Debug)]
pub struct Bob<F>(Shared<F>);

impl<F> Clone for Bob<F> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<F> Bob<F> {
    /// Returns a lock to the ideal functionality.
    pub fn lock(&self) -> MutexGuard<'_, F> {
        self.0.lock()
    }

    /// Calls the ideal functionality.
    pub async fn call<Ctx, C, IA, IB, OA, OB>(&mut self, ctx: &mut Ctx, input: IB, call: C) -> OB
    where
        Ctx: Context,
        C: FnOnce(&mut F, IA, IB) -> (OA, OB),
        IA: Send + 'static,
        IB: Send + 'static,
        OA: Send + 'static,
        OB: Send + 'static,
    {
        self.0
            .meet(
                ctx.id(),
                input,
                |slots| &mut slots.bob,
                |slots| &mut slots.alice,
                |f, b: IB, a: IA| {
                    let (oa, ob) = call(f, a, b);
                    (ob, Box::new(oa) as BoxAny)
                },
            )
            .await
    }
}

/// Creates an ideal functionality, returning the perspectives of Alice and Bob.
pub fn ideal_f2p<F>(f: F) -> (Alice<F>, Bob<F>) {
    let shared = Shared {
        f: Arc::new(Mutex::new(f)),
        slots: Arc::new(Mutex::new(Slots::default())),
    };

    (Alice(shared.clone()), Bob(shared))
}
