use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct RequestTimer {
    start: Instant,
    total: Option<Duration>,
}

impl RequestTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            total: None,
        }
    }

    pub fn finish(&mut self) {
        self.total = Some(self.start.elapsed());
    }

    pub fn total_time(&self) -> Option<Duration> {
        self.total
    }
}

pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_secs_f64() * 1000.0;

    if total_ms < 1.0 {
        format!("{:.2} µs", total_ms * 1000.0)
    } else if total_ms < 1000.0 {
        format!("{:.2} ms", total_ms)
    } else {
        format!("{:.2} s", total_ms / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_timer_basic() {
        let timer = RequestTimer::start();
        assert!(timer.total_time().is_none());
    }

    #[test]
    fn test_timer_finish() {
        let mut timer = RequestTimer::start();
        thread::sleep(Duration::from_millis(10));
        timer.finish();

        let total = timer.total_time().unwrap();
        assert!(total.as_millis() >= 10);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_micros(500)), "500.00 µs");
        assert_eq!(format_duration(Duration::from_millis(50)), "50.00 ms");
        assert_eq!(format_duration(Duration::from_secs(2)), "2.00 s");
    }
}
