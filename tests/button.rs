mod tests {
    use embassy_time::{Duration, Instant};
    use statuslight_core::{Button, Edge, Gesture, GestureTimings};

    fn button() -> Button {
        Button::new("front", 4, Duration::from_millis(500))
    }

    fn click(button: &mut Button, from_ms: u64, to_ms: u64) -> Option<Edge> {
        button.on_level_change(false, Instant::from_millis(from_ms));
        button.on_level_change(true, Instant::from_millis(to_ms))
    }

    #[test]
    fn test_press_and_release_reports_duration() {
        let mut button = button();
        assert_eq!(
            button.on_level_change(false, Instant::from_millis(0)),
            Some(Edge::Pressed)
        );
        assert!(button.is_pressed());
        assert_eq!(
            button.on_level_change(true, Instant::from_millis(300)),
            Some(Edge::Released(Duration::from_millis(300)))
        );
        assert!(!button.is_pressed());
        assert_eq!(button.repeat_count(), 1);
        assert_eq!(button.press_duration(), Duration::from_millis(300));
    }

    #[test]
    fn test_double_press_is_ignored() {
        let mut button = button();
        button.on_level_change(false, Instant::from_millis(0));
        assert_eq!(button.on_level_change(false, Instant::from_millis(50)), None);
        assert_eq!(button.press_time(), Some(Instant::from_millis(0)));
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut button = button();
        assert_eq!(button.on_level_change(true, Instant::from_millis(10)), None);
        assert_eq!(button.repeat_count(), 0);
    }

    #[test]
    fn test_quick_presses_accumulate() {
        let mut button = button();
        click(&mut button, 0, 100);
        click(&mut button, 200, 300);
        click(&mut button, 400, 450);
        assert_eq!(button.repeat_count(), 3);
    }

    #[test]
    fn test_slow_release_restarts_sequence() {
        let mut button = button();
        click(&mut button, 0, 100);
        click(&mut button, 200, 300);
        assert_eq!(button.repeat_count(), 2);

        click(&mut button, 400, 1000);
        assert_eq!(button.repeat_count(), 1);
        assert_eq!(button.press_duration(), Duration::from_millis(600));
    }

    #[test]
    fn test_classify_single_press_by_length() {
        let timings = GestureTimings::default();
        let cases = [
            (300, Gesture::Short),
            (500, Gesture::Short),
            (700, Gesture::Medium),
            (1000, Gesture::Medium),
            (1500, Gesture::Long),
            (2500, Gesture::ExtraLong),
        ];
        for (held_ms, expected) in cases {
            let mut button = button();
            click(&mut button, 0, held_ms);
            assert_eq!(button.classify(&timings), Some(expected), "held {held_ms} ms");
        }
    }

    #[test]
    fn test_classify_repeats() {
        let timings = GestureTimings::default();
        let mut button = button();
        assert_eq!(button.classify(&timings), None);

        click(&mut button, 0, 100);
        click(&mut button, 200, 300);
        assert_eq!(button.classify(&timings), Some(Gesture::Twice));

        click(&mut button, 400, 500);
        assert_eq!(button.classify(&timings), Some(Gesture::Thrice));

        click(&mut button, 600, 700);
        assert_eq!(button.classify(&timings), None);

        button.reset();
        assert_eq!(button.repeat_count(), 0);
    }
}
