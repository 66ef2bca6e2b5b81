//! Background clock refresh — a fixed-period thread publishing the NST
//! wall-clock time and market-open flag.
//!
//! The thread only reads `Utc::now()` and writes a small shared reading;
//! it never touches the state document. Stop is cooperative via an
//! `AtomicBool` checked once per tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::Utc;

use nepsedesk_core::nst;

/// One published clock sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockReading {
    /// NST wall-clock time, `HH:MM:SS`.
    pub nst_time: String,
    /// Inside the Sun–Thu 11:00–15:00 NST session.
    pub market_open: bool,
}

impl ClockReading {
    fn sample() -> Self {
        let now = Utc::now();
        Self {
            nst_time: nst::nst_time_string(now),
            market_open: nst::is_market_open(now),
        }
    }
}

/// Handle to the running refresh thread.
pub struct RefreshTask {
    reading: Arc<Mutex<ClockReading>>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RefreshTask {
    /// Spawn the refresh thread with the given tick period.
    pub fn spawn(period: Duration) -> Self {
        let reading = Arc::new(Mutex::new(ClockReading::sample()));
        let stop = Arc::new(AtomicBool::new(false));

        let thread_reading = Arc::clone(&reading);
        let thread_stop = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("nepsedesk-clock".into())
            .spawn(move || {
                while !thread_stop.load(Ordering::Relaxed) {
                    let sample = ClockReading::sample();
                    if let Ok(mut slot) = thread_reading.lock() {
                        *slot = sample;
                    }
                    thread::sleep(period);
                }
            })
            .expect("failed to spawn clock thread");

        Self {
            reading,
            stop,
            handle: Some(handle),
        }
    }

    /// Latest published sample.
    pub fn reading(&self) -> ClockReading {
        match self.reading.lock() {
            Ok(slot) => slot.clone(),
            // Poisoned lock: fall back to a fresh sample.
            Err(_) => ClockReading::sample(),
        }
    }

    /// Signal the thread to stop and wait for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publishes_an_initial_reading() {
        let task = RefreshTask::spawn(Duration::from_millis(10));
        let reading = task.reading();
        // HH:MM:SS
        assert_eq!(reading.nst_time.len(), 8);
        assert_eq!(reading.nst_time.matches(':').count(), 2);
        task.stop();
    }

    #[test]
    fn stop_joins_the_thread() {
        let task = RefreshTask::spawn(Duration::from_millis(5));
        thread::sleep(Duration::from_millis(20));
        task.stop();
    }

    #[test]
    fn drop_without_stop_does_not_hang() {
        let task = RefreshTask::spawn(Duration::from_millis(5));
        drop(task);
    }
}
