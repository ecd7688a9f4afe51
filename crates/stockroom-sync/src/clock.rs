//! # Clock
//!
//! Source of "today" for spoilage checks and expiration sweeps.

use chrono::{Local, NaiveDate};

/// Supplies the current calendar date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock stuck on one date (for tests and replays).
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
