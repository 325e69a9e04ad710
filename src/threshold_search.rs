use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::arange_inclusive;
use crate::error::{Result, SimulationError};
use crate::hoshen_kopelman::HoshenKopelman;
use crate::percolation::check_percolation;
use crate::site_grid::SiteGrid;

pub const DEFAULT_STEP: f64 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchOutcome
{
    Percolates { probability: f64, label: u32 },
    /// The sweep reached p = 1 without a spanning cluster.
    NoPercolationFound { last_probability: Option<f64> },
}

impl SearchOutcome
{
    pub fn probability(&self) -> Option<f64>
    {
        match *self
        {
            SearchOutcome::Percolates { probability, .. } => Some(probability),
            SearchOutcome::NoPercolationFound { .. } => None,
        }
    }
    pub fn label(&self) -> Option<u32>
    {
        match *self
        {
            SearchOutcome::Percolates { label, .. } => Some(label),
            SearchOutcome::NoPercolationFound { .. } => None,
        }
    }
}

/// Sweeps the fill probability upwards until a cluster spans the lattice.
///
/// Every probability step re-seeds the generator, so each step is a fresh
/// sample drawn with the same seed rather than a densification of the last one.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdSearch
{
    pub start: f64,
    pub step: f64,
    pub seed: u64,
}

impl ThresholdSearch
{
    pub fn new(start: f64, step: f64, seed: u64) -> Result<Self>
    {
        if !(0.0..=1.0).contains(&start)
        {
            return Err(SimulationError::InvalidProbability(start));
        }
        if !(step > 0.0) || !step.is_finite()
        {
            return Err(SimulationError::InvalidStep(step));
        }
        Ok(Self { start, step, seed })
    }
    /// Runs the sweep on `grid`, which holds the last sampled lattice afterwards.
    pub fn run(&self, grid: &mut SiteGrid) -> Result<SearchOutcome>
    {
        let side   = grid.side()?;
        let mut hk = HoshenKopelman::new(side);
        let mut last_probability = None;

        for probability in arange_inclusive(self.start, 1.0, self.step)?
        {
            let mut rng = SmallRng::seed_from_u64(self.seed);
            hk.fill_and_label(grid, &mut rng, probability)?;
            last_probability = Some(probability);

            if let Some(label) = check_percolation(grid)?
            {
                info!(seed = self.seed, probability, label, "percolation found");
                return Ok(SearchOutcome::Percolates { probability, label });
            }
            debug!(seed = self.seed, probability, clusters = grid.num_clusters(), "no spanning cluster");
        }

        info!(seed = self.seed, "no percolation up to p = 1");
        Ok(SearchOutcome::NoPercolationFound { last_probability })
    }
}

/// Fills at a single probability and labels in two phases, without searching.
pub fn sample_labeled_grid(side: usize, fill_probability: f64, seed: u64) -> Result<SiteGrid>
{
    if !(0.0..=1.0).contains(&fill_probability)
    {
        return Err(SimulationError::InvalidProbability(fill_probability));
    }
    let mut rng  = SmallRng::seed_from_u64(seed);
    let mut grid = SiteGrid::new_randomized(&mut rng, side, fill_probability)?;
    HoshenKopelman::for_grid(&grid).label(&mut grid)?;
    Ok(grid)
}
