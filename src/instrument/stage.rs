//! Stage motion driver seam
//!
//! Real stage motors are external hardware; the simulated driver reproduces
//! the timing contract remote callers observe: a move returns its expected
//! travel time immediately, and the commanded position becomes readable only
//! once the settling interval has elapsed.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

/// Stage motor control interface
#[async_trait]
pub trait StageDriver: Send + Sync {
    /// Begin a move to `(x, y)`; returns the expected travel time in seconds
    async fn move_to(&mut self, x: f64, y: f64) -> anyhow::Result<f64>;

    /// Current readable position
    async fn position(&self) -> (f64, f64);
}

/// Simulated stage with a constant speed and a settling interval
///
/// `speed_um_s` must be positive; the host config validates this.
pub struct SimStage {
    speed_um_s: f64,
    settle: Duration,
    current: (f64, f64),
    target: (f64, f64),
    arrive_at: Instant,
}

impl SimStage {
    pub fn new(speed_um_s: f64, settle: Duration) -> Self {
        let now = Instant::now();
        Self {
            speed_um_s,
            settle,
            current: (0.0, 0.0),
            target: (0.0, 0.0),
            arrive_at: now,
        }
    }

    fn readable(&self) -> (f64, f64) {
        if Instant::now() >= self.arrive_at {
            self.target
        } else {
            self.current
        }
    }
}

#[async_trait]
impl StageDriver for SimStage {
    async fn move_to(&mut self, x: f64, y: f64) -> anyhow::Result<f64> {
        let (cx, cy) = self.readable();
        let distance = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
        let travel = distance / self.speed_um_s;

        self.current = (cx, cy);
        self.target = (x, y);
        self.arrive_at = Instant::now() + self.settle.max(Duration::from_secs_f64(travel));

        Ok(travel)
    }

    async fn position(&self) -> (f64, f64) {
        self.readable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_move_reports_travel_time() {
        let mut stage = SimStage::new(1000.0, Duration::from_millis(0));
        let duration = stage.move_to(30.0, 40.0).await.expect("move failed");
        // 50 um at 1000 um/s
        assert!((duration - 0.05).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_position_lags_until_settled() {
        let mut stage = SimStage::new(1_000_000.0, Duration::from_millis(60));
        stage.move_to(10.0, 10.0).await.expect("move failed");

        assert_eq!(stage.position().await, (0.0, 0.0));

        sleep(Duration::from_millis(90)).await;
        assert_eq!(stage.position().await, (10.0, 10.0));
    }

    #[tokio::test]
    async fn test_move_during_settle_starts_from_old_position() {
        let mut stage = SimStage::new(1_000_000.0, Duration::from_millis(200));
        stage.move_to(10.0, 0.0).await.expect("move failed");

        // Not yet settled, so the retarget measures from the origin
        let duration = stage.move_to(20.0, 0.0).await.expect("move failed");
        assert!((duration - 20.0 / 1_000_000.0).abs() < 1e-9);
    }
}
