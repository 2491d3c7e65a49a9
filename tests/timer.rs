mod tests {
    use embassy_time::{Duration, Instant};
    use statuslight_core::OneShot;

    #[test]
    fn test_fires_once_after_deadline() {
        let mut timer = OneShot::new();
        let token = timer.schedule_after(Instant::from_millis(0), Duration::from_millis(250));

        assert_eq!(timer.deadline(), Some(Instant::from_millis(250)));
        assert_eq!(timer.poll(Instant::from_millis(249)), None);
        assert_eq!(timer.poll(Instant::from_millis(250)), Some(token));
        assert_eq!(timer.poll(Instant::from_millis(300)), None);
        assert!(!timer.is_pending());
    }

    #[test]
    fn test_reschedule_supersedes_previous_deadline() {
        let mut timer = OneShot::new();
        let stale = timer.schedule(Instant::from_millis(100));
        let fresh = timer.schedule(Instant::from_millis(300));

        assert_ne!(stale, fresh);
        assert!(!timer.is_current(stale));
        assert!(timer.is_current(fresh));
        assert_eq!(timer.poll(Instant::from_millis(200)), None);
        assert_eq!(timer.poll(Instant::from_millis(300)), Some(fresh));
    }

    #[test]
    fn test_cancel() {
        let mut timer = OneShot::new();
        let token = timer.schedule(Instant::from_millis(100));

        assert_eq!(timer.cancel(), Some(token));
        assert_eq!(timer.cancel(), None);
        assert_eq!(timer.poll(Instant::from_millis(500)), None);
    }
}
