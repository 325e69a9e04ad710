use num_traits::Float;
use std::io::Write;

use crate::threshold_search::SearchOutcome;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ThresholdResults<T> where T: Float
{
    pub seed: u64,
    pub threshold: Option<T>,
    pub label: Option<u32>,
    pub num_clusters: usize,
}

impl<T> ThresholdResults<T> where T: Float + std::fmt::Display
{
    pub fn from_outcome(seed: u64, outcome: &SearchOutcome, num_clusters: usize) -> Self
    {
        let threshold = outcome.probability().and_then(T::from);
        let label     = outcome.label();
        Self { seed, threshold, label, num_clusters }
    }
    pub fn write_to_file(file_name: &str, results: &[ThresholdResults<T>], elapsed_time: std::time::Duration) -> std::io::Result<()>
    {
        let mut file = std::fs::File::create(file_name)?;
        writeln!(&mut file, "seed, threshold, label, num_clusters, elapsed_time: {}", elapsed_time.as_secs())?;

        for res in results
        {
            let seed         = res.seed;
            let num_clusters = res.num_clusters;
            let label        = res.label.map_or(-1, i64::from);
            match res.threshold
            {
                Some(threshold) => writeln!(&mut file, "{seed}, {threshold}, {label}, {num_clusters}")?,
                None            => writeln!(&mut file, "{seed}, nan, {label}, {num_clusters}")?,
            }
        }

        Ok(())
    }
    /// Mean of the thresholds that were found.
    pub fn mean_threshold(results: &[ThresholdResults<T>]) -> Option<T>
    {
        let found: Vec<T> = results.iter().filter_map(|res| res.threshold).collect();
        if found.is_empty()
        {
            return None;
        }
        let count = T::from(found.len())?;
        Some(found.iter().fold(T::zero(), |acc, &t| acc + t) / count)
    }
    /// Sample standard deviation of the thresholds that were found.
    pub fn threshold_std(results: &[ThresholdResults<T>]) -> Option<T>
    {
        let found: Vec<T> = results.iter().filter_map(|res| res.threshold).collect();
        if found.len() < 2
        {
            return None;
        }
        let mean  = Self::mean_threshold(results)?;
        let denom = T::from(found.len() - 1)?;
        let sum_sqr = found.iter().fold(T::zero(), |acc, &t| acc + (t - mean).powi(2));
        Some((sum_sqr / denom).sqrt())
    }
}
