mod tests {
    use std::sync::{Arc, Mutex};

    use statuslight_core::{CallbackRegistry, Error, Proximity};

    #[test]
    fn test_invoke_runs_bound_handler() {
        let calls = Arc::new(Mutex::new(0));
        let mut registry: CallbackRegistry<'_, Proximity, 2> = CallbackRegistry::new();

        let counter = Arc::clone(&calls);
        registry
            .register(Proximity::Closing, move || *counter.lock().unwrap() += 1)
            .unwrap();

        assert!(registry.invoke(Proximity::Closing));
        assert!(registry.invoke(Proximity::Closing));
        assert_eq!(*calls.lock().unwrap(), 2);
    }

    #[test]
    fn test_unbound_label_is_skipped() {
        let mut registry: CallbackRegistry<'_, Proximity, 2> = CallbackRegistry::new();
        assert!(!registry.invoke(Proximity::Away));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_overwrites_previous_binding() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry: CallbackRegistry<'_, Proximity, 2> = CallbackRegistry::new();

        let first = Arc::clone(&log);
        registry
            .register(Proximity::Away, move || first.lock().unwrap().push("first"))
            .unwrap();
        let second = Arc::clone(&log);
        registry
            .register(Proximity::Away, move || second.lock().unwrap().push("second"))
            .unwrap();

        registry.invoke(Proximity::Away);
        assert_eq!(registry.len(), 1);
        assert_eq!(*log.lock().unwrap(), vec!["second"]);
    }

    #[test]
    fn test_register_with_passes_bound_arguments() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry: CallbackRegistry<'_, Proximity, 2> = CallbackRegistry::new();

        let sink = Arc::clone(&log);
        registry
            .register_with(Proximity::Closing, ("display", 3u8), move |(name, level)| {
                sink.lock().unwrap().push((*name, *level));
            })
            .unwrap();

        registry.invoke(Proximity::Closing);
        assert_eq!(*log.lock().unwrap(), vec![("display", 3)]);
    }

    #[test]
    fn test_unregister() {
        let mut registry: CallbackRegistry<'_, Proximity, 2> = CallbackRegistry::new();
        registry.register(Proximity::Closing, || {}).unwrap();

        assert!(registry.is_registered(Proximity::Closing));
        assert!(registry.unregister(Proximity::Closing));
        assert!(!registry.unregister(Proximity::Closing));
        assert!(!registry.invoke(Proximity::Closing));
    }

    #[test]
    fn test_full_registry_rejects_new_labels() {
        let mut registry: CallbackRegistry<'_, Proximity, 1> = CallbackRegistry::new();
        registry.register(Proximity::Closing, || {}).unwrap();

        assert_eq!(
            registry.register(Proximity::Away, || {}),
            Err(Error::RegistryFull)
        );
        assert_eq!(registry.register(Proximity::Closing, || {}), Ok(()));
    }
}
