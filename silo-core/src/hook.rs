use crate::{Error, Mutation, Op, Result, RowLabeled};
use anyhow::anyhow;
use futures::future::BoxFuture;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

/// What a mutation produced once the terminal driver call ran.
#[derive(Debug)]
pub enum MutationResult {
    /// Materialized rows (create and update-one).
    Rows(Vec<RowLabeled>),
    /// Affected row count (bulk update, delete and delete-one).
    Affected(u64),
}

/// One execution step of the mutation pipeline.
///
/// The terminal mutator performs the single driver call; every hook wraps
/// the next step and may inspect or rewrite the mutation, replace the
/// result, or return early without delegating (short-circuit). A mutator
/// must not invoke its next step more than once.
pub trait Mutator: Send + Sync {
    fn mutate(&self, mutation: Mutation) -> BoxFuture<'_, Result<MutationResult>>;
}

/// A hook transforms the next execution step into the current one.
///
/// Registering `[a, b]` composes `a(b(terminal))`: `a` runs first, sees the
/// untouched mutation, and decides whether anything below it runs at all.
pub type Hook = Arc<dyn Fn(Arc<dyn Mutator>) -> Arc<dyn Mutator> + Send + Sync>;

struct MutateFn<F>(F);

impl<F> Mutator for MutateFn<F>
where
    F: Fn(Mutation) -> BoxFuture<'static, Result<MutationResult>> + Send + Sync,
{
    fn mutate(&self, mutation: Mutation) -> BoxFuture<'_, Result<MutationResult>> {
        (self.0)(mutation)
    }
}

/// Lift a closure into a [`Mutator`]. The closure owns the mutation and
/// whatever `next` step it captured, so the returned future borrows nothing.
pub fn mutate_fn<F>(f: F) -> Arc<dyn Mutator>
where
    F: Fn(Mutation) -> BoxFuture<'static, Result<MutationResult>> + Send + Sync + 'static,
{
    Arc::new(MutateFn(f))
}

/// Compose the registered hooks around the terminal step, outermost first.
pub fn chain(hooks: &[Hook], terminal: Arc<dyn Mutator>) -> Arc<dyn Mutator> {
    hooks
        .iter()
        .rev()
        .fold(terminal, |next, hook| hook(next))
}

/// Limit a hook to the given operations; anything else passes straight to
/// the next step.
pub fn on(hook: Hook, ops: &'static [Op]) -> Hook {
    Arc::new(move |next: Arc<dyn Mutator>| {
        let wrapped = hook(Arc::clone(&next));
        mutate_fn(move |mutation| {
            let target = if ops.contains(&mutation.op()) {
                Arc::clone(&wrapped)
            } else {
                Arc::clone(&next)
            };
            Box::pin(async move { target.mutate(mutation).await })
        })
    })
}

/// Veto the given operations outright; the terminal driver call never runs
/// for them.
pub fn reject(ops: &'static [Op]) -> Hook {
    Arc::new(move |next: Arc<dyn Mutator>| {
        mutate_fn(move |mutation| {
            if ops.contains(&mutation.op()) {
                let op = mutation.op();
                let kind = mutation.kind();
                Box::pin(async move {
                    Err(Error::Store(anyhow!(
                        "operation {} is not allowed on {}",
                        op,
                        kind
                    )))
                })
            } else {
                let next = Arc::clone(&next);
                Box::pin(async move { next.mutate(mutation).await })
            }
        })
    })
}

/// Shared hook registry of a client and every facade derived from it.
///
/// The registry is reference-counted rather than copied into derived
/// configs, so hooks registered on the root client also apply inside
/// transactions and the debug client. Registration while operations are in
/// flight only affects chains resolved afterwards.
#[derive(Default)]
pub struct HookRegistry {
    /// Hooks applying to every entity kind, outermost in every chain.
    global: RwLock<Vec<Hook>>,
    /// Hooks scoped to a single kind.
    kinds: RwLock<HashMap<&'static str, Vec<Hook>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_global(&self, hook: Hook) {
        self.global
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(hook);
    }

    pub fn append_kind(&self, kind: &'static str, hook: Hook) {
        self.kinds
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(kind)
            .or_default()
            .push(hook);
    }

    /// Snapshot of the effective chain for one kind: client-wide hooks
    /// first, then the kind's own, each in registration order.
    pub fn resolve(&self, kind: &str) -> Vec<Hook> {
        let mut hooks = self
            .global
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if let Some(scoped) = self
            .kinds
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(kind)
        {
            hooks.extend(scoped.iter().cloned());
        }
        hooks
    }
}
