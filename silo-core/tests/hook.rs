#[cfg(test)]
mod tests {
    use silo_core::{
        EntityId, EntityKind, FieldDef, Hook, HookRegistry, Mutation, MutationResult, Mutator, Op,
        Result, RowLabeled, Value, chain, mutate_fn, on, reject,
    };
    use std::sync::{Arc, Mutex};

    struct Probe;

    impl EntityKind for Probe {
        const KIND: &'static str = "probes";

        fn fields() -> &'static [FieldDef] {
            static FIELDS: [FieldDef; 1] = [FieldDef::new("label", Value::Varchar(None))];
            &FIELDS
        }

        fn from_row(_row: &RowLabeled) -> Result<Self> {
            Ok(Self)
        }

        fn id(&self) -> EntityId {
            0
        }
    }

    type Trace = Arc<Mutex<Vec<&'static str>>>;

    fn tracing(name: &'static str, trace: Trace) -> Hook {
        Arc::new(move |next: Arc<dyn Mutator>| {
            let trace = Arc::clone(&trace);
            mutate_fn(move |mutation| {
                trace.lock().expect("Trace lock poisoned").push(name);
                let next = Arc::clone(&next);
                Box::pin(async move { next.mutate(mutation).await })
            })
        })
    }

    fn terminal(trace: Trace) -> Arc<dyn Mutator> {
        mutate_fn(move |_mutation| {
            trace.lock().expect("Trace lock poisoned").push("terminal");
            Box::pin(async { Ok(MutationResult::Affected(1)) })
        })
    }

    #[tokio::test]
    async fn ordering() {
        let trace: Trace = Arc::default();
        let hooks = vec![
            tracing("a", Arc::clone(&trace)),
            tracing("b", Arc::clone(&trace)),
            tracing("c", Arc::clone(&trace)),
        ];
        let result = chain(&hooks, terminal(Arc::clone(&trace)))
            .mutate(Mutation::new::<Probe>(Op::Create))
            .await
            .expect("The chain must succeed");
        assert!(matches!(result, MutationResult::Affected(1)));
        assert_eq!(
            *trace.lock().expect("Trace lock poisoned"),
            ["a", "b", "c", "terminal"],
            "the first registered hook must run outermost"
        );
    }

    #[tokio::test]
    async fn short_circuit() {
        let trace: Trace = Arc::default();
        let stopper: Hook = Arc::new(|_next: Arc<dyn Mutator>| {
            mutate_fn(|_mutation| Box::pin(async { Ok(MutationResult::Affected(0)) }))
        });
        let hooks = vec![stopper, tracing("unreached", Arc::clone(&trace))];
        let result = chain(&hooks, terminal(Arc::clone(&trace)))
            .mutate(Mutation::new::<Probe>(Op::Delete))
            .await
            .expect("The short circuit is not an error");
        assert!(matches!(result, MutationResult::Affected(0)));
        assert!(
            trace.lock().expect("Trace lock poisoned").is_empty(),
            "nothing below the short circuit may run"
        );
    }

    #[tokio::test]
    async fn scoped() {
        let trace: Trace = Arc::default();
        let hooks = vec![on(
            tracing("update-only", Arc::clone(&trace)),
            &[Op::Update, Op::UpdateOne],
        )];
        let mutator = chain(&hooks, terminal(Arc::clone(&trace)));
        mutator
            .mutate(Mutation::new::<Probe>(Op::Create))
            .await
            .expect("Creates pass through");
        assert_eq!(*trace.lock().expect("Trace lock poisoned"), ["terminal"]);
        mutator
            .mutate(Mutation::new::<Probe>(Op::Update))
            .await
            .expect("Updates run the hook");
        assert_eq!(
            *trace.lock().expect("Trace lock poisoned"),
            ["terminal", "update-only", "terminal"]
        );
    }

    #[tokio::test]
    async fn vetoed() {
        let trace: Trace = Arc::default();
        let hooks = vec![reject(&[Op::Delete])];
        let mutator = chain(&hooks, terminal(Arc::clone(&trace)));
        let err = mutator
            .mutate(Mutation::new::<Probe>(Op::Delete))
            .await
            .expect_err("Deletes must be vetoed");
        assert!(err.to_string().contains("not allowed"), "got {err}");
        assert!(trace.lock().expect("Trace lock poisoned").is_empty());
        mutator
            .mutate(Mutation::new::<Probe>(Op::Create))
            .await
            .expect("Other operations pass through");
    }

    #[test]
    fn registry() {
        let registry = HookRegistry::new();
        registry.append_kind("probes", Arc::new(|next| next));
        registry.append_global(Arc::new(|next| next));
        registry.append_kind("others", Arc::new(|next| next));
        assert_eq!(registry.resolve("probes").len(), 2);
        assert_eq!(registry.resolve("others").len(), 2);
        assert_eq!(registry.resolve("unknown").len(), 1);
    }
}
