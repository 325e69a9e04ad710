use std::env;
use std::io::Write;
use tracing::{info, warn, Level};

use percolation::logistic_map::{bifurcation_points, feigenbaum_delta, period_doubling_points, BifurcationPoint, TRANSIENT_FACTOR};
use percolation::{ParameterReader, Parameters, Result};

const PARAMETERS: [&str; 5] = [
    "x_points",
    "r_points",
    "eps_abs",
    "outputfile",
    "verbose",
];

const MAX_PERIOD: usize = 64;

struct LogisticConfig
{
    x_points: usize,
    r_points: usize,
    eps_abs: f64,
    outputfile: String,
    verbose: bool,
}

impl LogisticConfig
{
    fn from_parameters(params: &Parameters) -> Result<Self>
    {
        Ok(Self {
            x_points:   params.get_or("x_points", 100)?,
            r_points:   params.get_or("r_points", 1000)?,
            eps_abs:    params.get_or("eps_abs", 1e-3)?,
            outputfile: params.get_or("outputfile", String::from("data.dat"))?,
            verbose:    params.get_or("verbose", false)?,
        })
    }
}

fn write_points(file_name: &str, points: &[BifurcationPoint]) -> std::io::Result<()>
{
    let file       = std::fs::File::create(file_name)?;
    let mut writer = std::io::BufWriter::new(file);
    for point in points
    {
        writeln!(writer, "{:.6e} {:.6e}", point.r, point.x)?;
    }
    writer.flush()
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

    let config = LogisticConfig::from_parameters(&params).unwrap_or_else(|e|
    {
        eprintln!("Bad parameters in {}: {e}", reader.file_name());
        std::process::exit(1);
    });
    let LogisticConfig { x_points, r_points, eps_abs, outputfile, verbose } = config;

    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
    info!(x_points, r_points, eps_abs, "launching logistic map");

    let points = bifurcation_points(x_points, r_points, eps_abs);
    write_points(&outputfile, &points).unwrap_or_else(|err|
    {
        eprintln!("Could not write to file: {err}");
        std::process::exit(1);
    });
    info!("File saved as {outputfile}");

    let r_values: Vec<f64> = (0..r_points).map(|i| i as f64 / r_points as f64).collect();
    let doublings = period_doubling_points(&r_values, x_points * TRANSIENT_FACTOR, MAX_PERIOD, eps_abs);
    info!(?doublings, "period doubling points");
    match feigenbaum_delta(&doublings)
    {
        Ok(delta) => info!(delta, "Feigenbaum delta estimate"),
        Err(err)  => warn!("no Feigenbaum estimate: {err}"),
    }
}
