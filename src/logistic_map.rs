use rayon::iter::{IntoParallelIterator, IntoParallelRefIterator, ParallelIterator};

use crate::error::{Result, SimulationError};

pub const INITIAL_X: f64 = 0.1;
/// Transient iterations per recorded iteration.
pub const TRANSIENT_FACTOR: usize = 10;

/// x -> 4 r x (1 - x), with r in [0, 1).
#[derive(Debug, Clone, Copy)]
pub struct LogisticMap
{
    pub r: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BifurcationPoint
{
    pub r: f64,
    pub x: f64,
}

impl LogisticMap
{
    pub fn new(r: f64) -> Self
    {
        Self { r }
    }
    #[inline(always)]
    pub fn next(&self, x: f64) -> f64
    {
        4.0 * self.r * x * (1.0 - x)
    }
    /// State after `iterations` steps from `x`.
    pub fn iterate(&self, mut x: f64, iterations: usize) -> f64
    {
        for _ in 0..iterations
        {
            x = self.next(x);
        }
        x
    }
    /// Points of the attractor at this `r`: the settled state, followed by every
    /// further step that moves by more than `eps_abs`.
    pub fn attractor_points(&self, x_points: usize, eps_abs: f64) -> Vec<BifurcationPoint>
    {
        let r     = self.r;
        let mut x = self.iterate(INITIAL_X, x_points * TRANSIENT_FACTOR);

        let mut points = vec![BifurcationPoint { r, x }];
        for _ in 0..x_points
        {
            let x_next = self.next(x);
            if (x - x_next).abs() > eps_abs
            {
                points.push(BifurcationPoint { r, x: x_next });
            }
            x = x_next;
        }
        points
    }
    /// Smallest k <= `max_period` returning within `eps` of the settled state,
    /// `None` for chaotic or unresolved orbits.
    pub fn attractor_period(&self, transient: usize, max_period: usize, eps: f64) -> Option<usize>
    {
        let x0    = self.iterate(INITIAL_X, transient);
        let mut x = x0;
        for k in 1..=max_period
        {
            x = self.next(x);
            if (x - x0).abs() < eps
            {
                return Some(k);
            }
        }
        None
    }
}

/// Bifurcation diagram for `r_points` evenly spaced r values in [0, 1).
pub fn bifurcation_points(x_points: usize, r_points: usize, eps_abs: f64) -> Vec<BifurcationPoint>
{
    let r_step = 1.0 / r_points as f64;
    let per_r: Vec<Vec<BifurcationPoint>> = (0..r_points)
        .into_par_iter()
        .map(|i| LogisticMap::new(i as f64 * r_step).attractor_points(x_points, eps_abs))
        .collect();
    per_r.into_iter().flatten().collect()
}

/// r values at which the attractor period first reaches 2, 4, 8, ...
///
/// `r_values` must be increasing.
pub fn period_doubling_points(r_values: &[f64], transient: usize, max_period: usize, eps: f64) -> Vec<f64>
{
    let periods: Vec<Option<usize>> = r_values
        .par_iter()
        .map(|&r| LogisticMap::new(r).attractor_period(transient, max_period, eps))
        .collect();

    let mut expected = 2;
    let mut points   = Vec::new();
    for (&r, period) in r_values.iter().zip(periods)
    {
        let Some(period) = period else { continue };
        if period >= expected && period.is_power_of_two()
        {
            points.push(r);
            expected = period * 2;
        }
    }
    points
}

/// Feigenbaum delta estimated from the last three period-doubling points.
pub fn feigenbaum_delta(points: &[f64]) -> Result<f64>
{
    let n = points.len();
    if n < 3
    {
        return Err(SimulationError::InsufficientData { needed: 3, found: n });
    }
    let (r0, r1, r2) = (points[n - 3], points[n - 2], points[n - 1]);
    Ok((r1 - r0) / (r2 - r1))
}
