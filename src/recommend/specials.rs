//! Daily specials: a sample of the corpus that changes once per calendar day.

use crate::corpus::{Corpus, Recipe};
use chrono::{Datelike, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

/// Source of the current calendar date
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always the same date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Seed for a date: its day number counting 0001-01-01 as day 1
pub fn daily_seed(date: NaiveDate) -> u64 {
    // Dates before the common era are clamped to zero
    u64::try_from(date.num_days_from_ce()).unwrap_or(0)
}

/// `min(n, corpus.len())` distinct recipes, same elements and order for the
/// same date
pub fn specials_for_date(corpus: &Corpus, n: usize, date: NaiveDate) -> Vec<&Recipe> {
    let mut rng = StdRng::seed_from_u64(daily_seed(date));
    let amount = n.min(corpus.len());

    let mut positions: Vec<usize> = (0..corpus.len()).collect();
    let (picked, _) = positions.partial_shuffle(&mut rng, amount);

    let specials: Vec<&Recipe> = picked.iter().filter_map(|&i| corpus.get(i)).collect();
    debug!("Selected {} specials for {}", specials.len(), date);
    specials
}

pub fn specials<'c>(corpus: &'c Corpus, n: usize, clock: &dyn Clock) -> Vec<&'c Recipe> {
    specials_for_date(corpus, n, clock.today())
}
