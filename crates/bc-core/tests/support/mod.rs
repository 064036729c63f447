//! Synthetic event generators shared by the integration tests.

#![allow(dead_code)]

use bc_common::Event;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()
}

pub fn at_secs(secs: f64) -> DateTime<Utc> {
    epoch() + TimeDelta::milliseconds((secs * 1000.0).round() as i64)
}

/// One opening every `gap_secs`, each closing ten minutes later.
pub fn regular_events(n: usize, gap_secs: f64) -> Vec<Event> {
    (0..n)
        .map(|i| {
            let open = at_secs(i as f64 * gap_secs);
            Event::new(format!("regular-{i}"), open).closed_at(open + TimeDelta::minutes(10))
        })
        .collect()
}

/// Exponential gap with rate `lambda` (per second).
pub fn exponential_gap(rng: &mut StdRng, lambda: f64) -> f64 {
    let u: f64 = rng.random();
    -(1.0 - u).ln() / lambda
}

/// `n` exponential gaps at rate `lambda` (per second).
pub fn exponential_gaps(seed: u64, n: usize, lambda: f64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| exponential_gap(&mut rng, lambda)).collect()
}

/// Homogeneous Poisson arrival times over `[0, horizon_secs)`.
pub fn poisson_arrivals(seed: u64, lambda: f64, horizon_secs: f64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut t = 0.0;
    let mut out = Vec::new();
    loop {
        t += exponential_gap(&mut rng, lambda);
        if t >= horizon_secs {
            return out;
        }
        out.push(t);
    }
}

pub fn events_at(secs: &[f64]) -> Vec<Event> {
    secs.iter()
        .enumerate()
        .map(|(i, &s)| Event::new(format!("synthetic-{i}"), at_secs(s)))
        .collect()
}
