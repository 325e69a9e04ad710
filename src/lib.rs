use num_traits::Float;

pub mod error;
pub mod equivalence_class;
pub mod site_grid;
pub mod hoshen_kopelman;
pub mod percolation;
pub mod threshold_search;
pub mod threshold_results;
pub mod parameter_reader;
pub mod logistic_map;

pub use error::{Result, SimulationError};
pub use equivalence_class::EquivalenceClass;
pub use site_grid::{Site, SiteGrid};
pub use hoshen_kopelman::HoshenKopelman;
pub use percolation::check_percolation;
pub use threshold_search::{SearchOutcome, ThresholdSearch};
pub use threshold_results::ThresholdResults;
pub use parameter_reader::{ParameterReader, Parameters};

/// `start, start + step, ...` up to and including `stop`.
///
/// Values are computed as `start + k*step`, so long sweeps do not drift.
pub fn arange_inclusive<T>(start: T, stop: T, step: T) -> Result<impl Iterator<Item = T>> where T: Float
{
    if !(step > T::zero()) || !step.is_finite()
    {
        return Err(SimulationError::InvalidStep(step.to_f64().unwrap_or(f64::NAN)));
    }

    let num_of_values = if stop < start
    {
        0
    }
    else
    {
        let last_index = ((stop - start) / step + T::epsilon().sqrt()).floor();
        match last_index.to_usize().and_then(|n| n.checked_add(1))
        {
            Some(n) => n,
            // more values than can be counted
            None    => return Err(SimulationError::InvalidStep(step.to_f64().unwrap_or(f64::NAN))),
        }
    };
    Ok((0..num_of_values).map(move |k| (start + step * T::from(k).unwrap_or(T::nan())).min(stop)))
}
