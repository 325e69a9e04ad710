use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::env;
use tracing::{info, warn, Level};

use percolation::threshold_search::{sample_labeled_grid, DEFAULT_STEP};
use percolation::{Parameters, ParameterReader, Result, SearchOutcome, SimulationError, SiteGrid, ThresholdResults, ThresholdSearch};

const DEFAULT_GRID_SIZE: usize        = 100;
const DEFAULT_FILL_PROBABILITY: f64   = 0.5;
const DEFAULT_SEED: u64               = 0;
const DEFAULT_OUTPUT_FILE: &str       = "data.dat";

const PARAMETERS: [&str; 7] = [
    "grid_size",
    "fill_probability",
    "probability_step",
    "seeds",
    "outputfile",
    "force_save",
    "verbose",
];

struct PercolationConfig
{
    grid_size: usize,
    fill_probability: f64,
    probability_step: f64,
    seeds: Vec<u64>,
    outputfile: String,
    force_save: bool,
    verbose: bool,
}

impl PercolationConfig
{
    fn from_parameters(params: &Parameters) -> Result<Self>
    {
        let grid_size        = params.get_or("grid_size", DEFAULT_GRID_SIZE)?;
        let fill_probability = params.get_or("fill_probability", DEFAULT_FILL_PROBABILITY)?;
        let probability_step = params.get_or("probability_step", DEFAULT_STEP)?;
        let seeds            = params.get_list_or("seeds", vec![DEFAULT_SEED])?;
        let outputfile       = params.get_or("outputfile", String::from(DEFAULT_OUTPUT_FILE))?;
        let force_save       = params.get_or("force_save", false)?;
        let verbose          = params.get_or("verbose", false)?;

        if grid_size == 0
        {
            return Err(SimulationError::InvalidShape { rows: 0, cols: 0 });
        }
        if !(0.0..=1.0).contains(&fill_probability)
        {
            return Err(SimulationError::InvalidProbability(fill_probability));
        }
        if seeds.is_empty()
        {
            return Err(SimulationError::MissingParameter(String::from("seeds")));
        }
        Ok(Self { grid_size, fill_probability, probability_step, seeds, outputfile, force_save, verbose })
    }
}

fn init_logging(verbose: bool)
{
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

/// One threshold search per seed, run concurrently. Each task owns its grid.
fn perform_threshold_search_all_seeds(grid_size: usize, start: f64, step: f64, seeds: &[u64]) -> Result<Vec<(SearchOutcome, SiteGrid)>>
{
    seeds
        .to_vec()
        .into_par_iter()
        .map(|seed|
        {
            let search   = ThresholdSearch::new(start, step, seed)?;
            let mut grid = SiteGrid::new_square(grid_size);
            let outcome  = search.run(&mut grid)?;
            Ok((outcome, grid))
        })
        .collect()
}

fn report_outcome(outcome: &SearchOutcome)
{
    match outcome
    {
        SearchOutcome::Percolates { probability, label } =>
        {
            eprintln!("Percolation cluster number: {label}");
            eprintln!("Percolation limit: {probability:1.5}");
        }
        SearchOutcome::NoPercolationFound { .. } =>
        {
            eprintln!("Percolation cluster number: -1");
            eprintln!("Percolation limit: not found");
        }
    }
}

fn save_grid(grid: &SiteGrid, outputfile: &str)
{
    grid.write_to_file(outputfile).unwrap_or_else(|err|
    {
        eprintln!("Could not write to file: {err}");
        std::process::exit(1);
    });
    info!("File saved as {outputfile}");
}

fn main()
{
    let args   = env::args().collect::<Vec<_>>();
    let reader = ParameterReader::build(&args, &PARAMETERS).unwrap_or_else(|e|
    {
        eprintln!("Failed to create parameter reader: {e}");
        std::process::exit(1);
    });

    let params = reader.parse_parameters(":").unwrap_or_else(|e|
    {
        eprintln!("Failed to read parameters: {e}");
        std::process::exit(1);
    });

    let config = PercolationConfig::from_parameters(&params).unwrap_or_else(|e|
    {
        eprintln!("Bad parameters in {}: {e}", reader.file_name());
        std::process::exit(1);
    });

    init_logging(config.verbose);
    info!(grid_size = config.grid_size, fill_probability = config.fill_probability, seeds = ?config.seeds, "launching percolation");

    if config.force_save
    {
        let grid = sample_labeled_grid(config.grid_size, config.fill_probability, config.seeds[0]).unwrap_or_else(|err|
        {
            eprintln!("Labeling failed: {err}");
            std::process::exit(1);
        });
        info!(clusters = grid.num_clusters(), "labeled grid without threshold search");
        save_grid(&grid, &config.outputfile);
        return;
    }

    let time = std::time::SystemTime::now();
    let runs = perform_threshold_search_all_seeds(config.grid_size, config.fill_probability, config.probability_step, &config.seeds)
        .unwrap_or_else(|err|
        {
            eprintln!("Threshold search failed: {err}");
            std::process::exit(1);
        });
    let elapsed_time = time.elapsed().unwrap_or_default();
    info!("Time taken: {}s", elapsed_time.as_secs());

    // the grid of the first seed is the one saved
    let (outcome, grid) = &runs[0];
    report_outcome(outcome);
    save_grid(grid, &config.outputfile);

    if config.seeds.len() > 1
    {
        let results: Vec<ThresholdResults<f64>> = config.seeds
            .iter()
            .zip(&runs)
            .map(|(&seed, (outcome, grid))| ThresholdResults::from_outcome(seed, outcome, grid.num_clusters()))
            .collect();

        match (ThresholdResults::mean_threshold(&results), ThresholdResults::threshold_std(&results))
        {
            (Some(mean), Some(std_dev)) => info!(mean, std_dev, "threshold over {} seeds", results.len()),
            (Some(mean), None)          => info!(mean, "threshold over {} seeds", results.len()),
            _                           => warn!("no seed percolated"),
        }

        let thresholds_file = format!("{}.thresholds", config.outputfile);
        ThresholdResults::write_to_file(&thresholds_file, &results, elapsed_time).unwrap_or_else(|err|
        {
            eprintln!("Could not write to file: {err}");
            std::process::exit(1);
        });
        info!("Thresholds saved as {thresholds_file}");
    }
}
