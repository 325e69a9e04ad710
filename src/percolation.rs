use std::collections::HashSet;

use crate::error::Result;
use crate::site_grid::{Site, SiteGrid};

/// Returns the label of a cluster touching both the top and the bottom row,
/// or `None` when no cluster spans the lattice.
///
/// The bottom row is scanned left to right and the first label also present in
/// the top row wins, which is not necessarily the smallest spanning label.
pub fn check_percolation(grid: &SiteGrid) -> Result<Option<u32>>
{
    let side = grid.side()?;

    let top_labels: HashSet<u32> = grid.row(0)
        .iter()
        .filter_map(|site| site.label())
        .collect();

    if top_labels.is_empty()
    {
        return Ok(None);
    }

    let spanning = grid.row(side - 1)
        .iter()
        .filter_map(|site| site.label())
        .find(|label| top_labels.contains(label));

    Ok(spanning)
}

/// Number of sites carrying `label`.
pub fn cluster_size(grid: &SiteGrid, label: u32) -> usize
{
    grid.sites().filter(|&site| site == Site::Label(label)).count()
}
