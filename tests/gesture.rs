mod tests {
    use std::sync::{Arc, Mutex};

    use embassy_time::Instant;
    use statuslight_core::{
        ButtonId, EdgeChannel, EdgeEvent, Error, Evaluation, Gesture, GestureAggregator,
        GestureTimings,
    };

    type Log = Arc<Mutex<Vec<Gesture>>>;

    fn ms(value: u64) -> Instant {
        Instant::from_millis(value)
    }

    fn recorder(log: &Log, gesture: Gesture) -> impl FnMut() + Send + 'static {
        let log = Arc::clone(log);
        move || log.lock().unwrap().push(gesture)
    }

    fn click(aggregator: &mut GestureAggregator<'_>, id: ButtonId, from_ms: u64, to_ms: u64) {
        aggregator.on_level_change(id, false, ms(from_ms));
        aggregator.on_level_change(id, true, ms(to_ms));
    }

    fn single_button(log: &Log) -> (GestureAggregator<'static>, ButtonId) {
        let mut aggregator = GestureAggregator::new(GestureTimings::default());
        let id = aggregator.add_button("front", 4).unwrap();
        for gesture in Gesture::ALL.into_iter().filter(|g| !g.is_combined()) {
            aggregator.register(id, gesture, recorder(log, gesture)).unwrap();
        }
        (aggregator, id)
    }

    #[test]
    fn test_double_click_dispatches_twice_after_quiet_window() {
        let log = Log::default();
        let (mut aggregator, id) = single_button(&log);

        click(&mut aggregator, id, 0, 300);
        click(&mut aggregator, id, 500, 700);
        assert_eq!(aggregator.next_deadline(), Some(ms(950)));

        assert_eq!(aggregator.poll(ms(900)), None);
        assert!(log.lock().unwrap().is_empty());

        assert_eq!(
            aggregator.poll(ms(950)),
            Some(Evaluation::Single {
                button: id,
                gesture: Some(Gesture::Twice),
            })
        );
        assert_eq!(*log.lock().unwrap(), vec![Gesture::Twice]);
        assert_eq!(aggregator.button(id).unwrap().repeat_count(), 0);
    }

    #[test]
    fn test_burst_is_classified_once() {
        let log = Log::default();
        let (mut aggregator, id) = single_button(&log);

        click(&mut aggregator, id, 0, 100);
        assert_eq!(aggregator.poll(ms(300)), None);
        click(&mut aggregator, id, 300, 400);
        assert_eq!(aggregator.poll(ms(600)), None);
        click(&mut aggregator, id, 600, 700);

        assert!(aggregator.poll(ms(950)).is_some());
        assert_eq!(aggregator.poll(ms(2000)), None);
        assert_eq!(*log.lock().unwrap(), vec![Gesture::Thrice]);
    }

    #[test]
    fn test_single_press_length_buckets() {
        let cases = [
            (200, Gesture::Short),
            (800, Gesture::Medium),
            (1500, Gesture::Long),
            (3000, Gesture::ExtraLong),
        ];
        for (held_ms, expected) in cases {
            let log = Log::default();
            let (mut aggregator, id) = single_button(&log);
            click(&mut aggregator, id, 0, held_ms);
            aggregator.poll(ms(held_ms + 250));
            assert_eq!(*log.lock().unwrap(), vec![expected], "held {held_ms} ms");
        }
    }

    #[test]
    fn test_four_presses_dispatch_nothing_and_reset() {
        let log = Log::default();
        let (mut aggregator, id) = single_button(&log);
        for start in [0, 200, 400, 600] {
            click(&mut aggregator, id, start, start + 100);
        }

        assert_eq!(
            aggregator.poll(ms(950)),
            Some(Evaluation::Single {
                button: id,
                gesture: None,
            })
        );
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(aggregator.button(id).unwrap().repeat_count(), 0);
    }

    #[test]
    fn test_missing_handler_is_a_no_op() {
        let mut aggregator = GestureAggregator::new(GestureTimings::default());
        let id = aggregator.add_button("front", 4).unwrap();
        click(&mut aggregator, id, 0, 100);
        assert_eq!(
            aggregator.poll(ms(350)),
            Some(Evaluation::Single {
                button: id,
                gesture: Some(Gesture::Short),
            })
        );
    }

    #[test]
    fn test_combined_uses_longest_press_and_most_repeats() {
        let log = Log::default();
        let mut aggregator = GestureAggregator::new(GestureTimings::default());
        let left = aggregator.add_button("left", 1).unwrap();
        let right = aggregator.add_button("right", 2).unwrap();
        for gesture in Gesture::ALL.into_iter().filter(|g| g.is_combined()) {
            aggregator.register_combined(gesture, recorder(&log, gesture)).unwrap();
        }
        aggregator.register(left, Gesture::Twice, recorder(&log, Gesture::Twice)).unwrap();

        click(&mut aggregator, left, 0, 100);
        click(&mut aggregator, left, 150, 250);
        click(&mut aggregator, right, 0, 300);

        assert_eq!(
            aggregator.poll(ms(550)),
            Some(Evaluation::Combined {
                length: Gesture::MultipleShort,
                count: Some(Gesture::MultipleTwice),
            })
        );
        assert_eq!(
            *log.lock().unwrap(),
            vec![Gesture::MultipleShort, Gesture::MultipleTwice]
        );
        assert_eq!(aggregator.button(left).unwrap().repeat_count(), 0);
        assert_eq!(aggregator.button(right).unwrap().repeat_count(), 0);
    }

    #[test]
    fn test_combined_length_and_count_buckets() {
        let quick = [(0, 100)];
        let thrice = [(0, 100), (150, 250), (300, 400)];
        let four = [(0, 100), (150, 250), (300, 400), (450, 550)];
        let cases: [(&[(u64, u64)], Gesture, Option<Gesture>); 8] = [
            (&[(0, 500)], Gesture::MultipleShort, None),
            (&[(0, 501)], Gesture::MultipleMedium, None),
            (&[(0, 1000)], Gesture::MultipleMedium, None),
            (&[(0, 1001)], Gesture::MultipleLong, None),
            (&[(0, 2500)], Gesture::MultipleExtraLong, None),
            (&quick, Gesture::MultipleShort, None),
            (&thrice, Gesture::MultipleShort, Some(Gesture::MultipleThrice)),
            (&four, Gesture::MultipleShort, None),
        ];

        for (left_clicks, length, count) in cases {
            let log = Log::default();
            let mut aggregator = GestureAggregator::new(GestureTimings::default());
            let left = aggregator.add_button("left", 1).unwrap();
            let right = aggregator.add_button("right", 2).unwrap();
            for gesture in Gesture::ALL.into_iter().filter(|g| g.is_combined()) {
                aggregator.register_combined(gesture, recorder(&log, gesture)).unwrap();
            }

            click(&mut aggregator, right, 0, 100);
            for &(from, to) in left_clicks {
                click(&mut aggregator, left, from, to);
            }
            let last_release = left_clicks.iter().map(|&(_, to)| to).max().unwrap_or(0).max(100);

            assert_eq!(
                aggregator.poll(ms(last_release + 250)),
                Some(Evaluation::Combined { length, count }),
                "left clicks {left_clicks:?}"
            );
            let expected: Vec<Gesture> = [Some(length), count].into_iter().flatten().collect();
            assert_eq!(*log.lock().unwrap(), expected, "left clicks {left_clicks:?}");
            assert_eq!(aggregator.button(left).unwrap().repeat_count(), 0);
            assert_eq!(aggregator.button(right).unwrap().repeat_count(), 0);
        }
    }

    #[test]
    fn test_combined_long_press() {
        let log = Log::default();
        let mut aggregator = GestureAggregator::new(GestureTimings::default());
        let left = aggregator.add_button("left", 1).unwrap();
        let right = aggregator.add_button("right", 2).unwrap();
        aggregator
            .register_combined(Gesture::MultipleLong, recorder(&log, Gesture::MultipleLong))
            .unwrap();

        click(&mut aggregator, left, 0, 300);
        click(&mut aggregator, right, 100, 1200);

        assert_eq!(
            aggregator.poll(ms(1450)),
            Some(Evaluation::Combined {
                length: Gesture::MultipleLong,
                count: None,
            })
        );
        assert_eq!(*log.lock().unwrap(), vec![Gesture::MultipleLong]);
    }

    #[test]
    fn test_registration_scopes() {
        let mut aggregator = GestureAggregator::new(GestureTimings::default());
        let id = aggregator.add_button("front", 4).unwrap();

        assert_eq!(
            aggregator.register(id, Gesture::MultipleShort, || {}),
            Err(Error::WrongGestureScope(Gesture::MultipleShort))
        );
        assert_eq!(
            aggregator.register_combined(Gesture::Short, || {}),
            Err(Error::WrongGestureScope(Gesture::Short))
        );
    }

    #[test]
    fn test_register_on_foreign_button_fails() {
        let mut large = GestureAggregator::new(GestureTimings::default());
        large.add_button("a", 1).unwrap();
        let second = large.add_button("b", 2).unwrap();

        let mut small = GestureAggregator::new(GestureTimings::default());
        small.add_button("a", 1).unwrap();
        assert_eq!(
            small.register(second, Gesture::Short, || {}),
            Err(Error::UnknownButton)
        );
    }

    #[test]
    fn test_add_button_limits() {
        let mut aggregator = GestureAggregator::new(GestureTimings::default());
        aggregator.add_button("a", 1).unwrap();
        assert_eq!(aggregator.add_button("b", 1), Err(Error::DuplicatePin(1)));

        for pin in 2..=4 {
            aggregator.add_button("x", pin).unwrap();
        }
        assert_eq!(aggregator.add_button("e", 5), Err(Error::TooManyButtons));
        assert_eq!(aggregator.buttons().count(), 4);
        assert!(aggregator.find("a").is_some());
        assert_eq!(aggregator.find("missing"), None);
    }

    #[test]
    fn test_edges_are_routed_by_pin() {
        let log = Log::default();
        let (mut aggregator, id) = single_button(&log);

        assert_eq!(aggregator.on_edge(9, false, ms(0)), None);
        assert!(aggregator.on_edge(4, false, ms(0)).is_some());
        assert!(aggregator.on_edge(4, true, ms(100)).is_some());
        assert_eq!(aggregator.button(id).unwrap().repeat_count(), 1);
    }

    #[test]
    fn test_process_pending_drains_edge_channel() {
        let log = Log::default();
        let (mut aggregator, _) = single_button(&log);
        let edges: EdgeChannel<8> = EdgeChannel::new();
        let sender = edges.sender();

        for (at, is_high) in [(0, false), (100, true), (200, false), (300, true)] {
            sender
                .try_send(EdgeEvent {
                    pin: 4,
                    is_high,
                    at: ms(at),
                })
                .unwrap();
        }
        aggregator.process_pending(edges.receiver());
        assert!(edges.is_empty());

        aggregator.poll(ms(550));
        assert_eq!(*log.lock().unwrap(), vec![Gesture::Twice]);
    }

    #[test]
    fn test_gesture_labels() {
        assert_eq!(Gesture::parse_from_str("extra_long"), Some(Gesture::ExtraLong));
        assert_eq!(
            Gesture::parse_from_str("multiple_thrice"),
            Some(Gesture::MultipleThrice)
        );
        assert_eq!(Gesture::parse_from_str("quadruple"), None);
        for gesture in Gesture::ALL {
            assert_eq!(Gesture::parse_from_str(gesture.as_str()), Some(gesture));
        }
    }
}
