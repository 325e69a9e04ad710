use rand::Rng;
use tracing::trace;

use crate::equivalence_class::EquivalenceClass;
use crate::error::{Result, SimulationError};
use crate::site_grid::{random_site, Site, SiteGrid};

trait Direction
{
    fn left(self) -> Self;
    fn above(self) -> Self;
}

impl Direction for (usize, usize)
{
    #[inline(always)]
    fn left(self) -> Self
    {
        (self.0, self.1 - 1)
    }
    #[inline(always)]
    fn above(self) -> Self
    {
        (self.0 - 1, self.1)
    }
}

/// Hoshen-Kopelman cluster labeling on a square lattice with open boundaries.
///
/// Sites are visited in raster order, so only the neighbours above and to the
/// left have been labeled when a site is reached. Labels written during the
/// scan are provisional; a second pass replaces each with its class root.
pub struct HoshenKopelman
{
    eq_classes: EquivalenceClass,
}

impl HoshenKopelman
{
    /// Labeler for grids of up to `side`x`side` sites.
    pub fn new(side: usize) -> Self
    {
        let eq_classes = EquivalenceClass::new(side*side);
        Self { eq_classes }
    }
    /// Labeler sized for exactly the sites of `grid`.
    pub fn for_grid(grid: &SiteGrid) -> Self
    {
        let eq_classes = EquivalenceClass::new(grid.num_sites());
        Self { eq_classes }
    }
    /// Number of provisional labels handed out by the last run.
    pub fn num_labels_created(&self) -> u32
    {
        self.eq_classes.num_classes()
    }
    #[inline(always)]
    fn make_new_cluster(&mut self, grid: &mut SiteGrid, pos: (usize, usize)) -> Result<()>
    {
        let new_class = self.eq_classes.create_class()?;
        grid.set_pos(pos, Site::Label(new_class));
        Ok(())
    }
    #[inline(always)]
    fn merge_clusters_above_and_left(&mut self, grid: &mut SiteGrid, pos: (usize, usize), above_label: u32, left_label: u32)
    {
        let label = self.eq_classes.union_get_label(above_label, left_label);
        grid.set_pos(pos, Site::Label(label));
    }
    #[inline(always)]
    fn label_site(&mut self, grid: &mut SiteGrid, pos: (usize, usize)) -> Result<()>
    {
        // Off-grid and empty neighbours both count as "no label".
        let above_label = if pos.0 > 0 { grid.at_pos(pos.above()).label() } else { None };
        let left_label  = if pos.1 > 0 { grid.at_pos(pos.left()).label() } else { None };

        match (above_label, left_label)
        {
            (None, None)               => self.make_new_cluster(grid, pos)?,
            (Some(label), None)        => grid.set_pos(pos, Site::Label(label)),
            (None, Some(label))        => grid.set_pos(pos, Site::Label(label)),
            (Some(above), Some(left))  => self.merge_clusters_above_and_left(grid, pos, above, left),
        }
        Ok(())
    }
    fn prepare(&mut self, grid: &SiteGrid) -> Result<()>
    {
        grid.side()?;
        if grid.num_sites() > self.eq_classes.capacity()
        {
            return Err(SimulationError::CapacityExceeded { capacity: self.eq_classes.capacity() });
        }
        self.eq_classes.reset();
        Ok(())
    }
    fn resolve_labels(&mut self, grid: &mut SiteGrid)
    {
        for site in grid.sites_mut()
        {
            if let Site::Label(label) = *site
            {
                *site = Site::Label(self.eq_classes.find(label));
            }
        }
    }
    /// Labels an already filled grid. Every non-empty site ends up carrying the
    /// root label of its cluster.
    pub fn label(&mut self, grid: &mut SiteGrid) -> Result<()>
    {
        self.prepare(grid)?;

        for i in grid.rows()
        {
            for j in grid.columns()
            {
                if grid.at(i, j).is_empty()
                {
                    continue;
                }
                self.label_site(grid, (i, j))?;
            }
        }
        self.resolve_labels(grid);
        trace!(labels_created = self.num_labels_created(), "labeled grid");
        Ok(())
    }
    /// Fills and labels in a single raster pass. Draws are consumed in the same
    /// order as `SiteGrid::fill_randomly`, so the result matches filling first
    /// and calling `label` afterwards.
    pub fn fill_and_label<R: Rng>(&mut self, grid: &mut SiteGrid, rng: &mut R, fill_probability: f64) -> Result<()>
    {
        self.prepare(grid)?;

        for i in grid.rows()
        {
            for j in grid.columns()
            {
                let site = random_site(rng, fill_probability);
                grid.set(i, j, site);
                if site.is_empty()
                {
                    continue;
                }
                self.label_site(grid, (i, j))?;
            }
        }
        self.resolve_labels(grid);
        trace!(labels_created = self.num_labels_created(), "filled and labeled grid");
        Ok(())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn labeled(pattern: &[&str]) -> SiteGrid
    {
        let mut grid = SiteGrid::from_pattern(pattern);
        HoshenKopelman::for_grid(&grid).label(&mut grid).unwrap();
        grid
    }

    /// Cluster id per site from a plain flood fill, -1 for empty sites.
    fn flood_fill_components(grid: &SiteGrid) -> Vec<i64>
    {
        let (rows, cols) = grid.shape();
        let mut components = vec![-1_i64; rows*cols];
        let mut next_id = 0;
        for start in 0..rows*cols
        {
            if grid.at(start / cols, start % cols).is_empty() || components[start] >= 0
            {
                continue;
            }
            let mut stack = vec![start];
            components[start] = next_id;
            while let Some(n) = stack.pop()
            {
                let (i, j) = (n / cols, n % cols);
                let mut ngbrs = Vec::new();
                if i > 0        { ngbrs.push(n - cols); }
                if i + 1 < rows { ngbrs.push(n + cols); }
                if j > 0        { ngbrs.push(n - 1); }
                if j + 1 < cols { ngbrs.push(n + 1); }
                for m in ngbrs
                {
                    if !grid.at(m / cols, m % cols).is_empty() && components[m] < 0
                    {
                        components[m] = next_id;
                        stack.push(m);
                    }
                }
            }
            next_id += 1;
        }
        components
    }

    /// Checks both partitions agree up to renaming.
    fn assert_same_partition(grid: &SiteGrid, reference: &[i64])
    {
        let mut label_to_ref: HashMap<u32, i64> = HashMap::new();
        let mut ref_to_label: HashMap<i64, u32> = HashMap::new();
        for (n, site) in grid.sites().enumerate()
        {
            match site
            {
                Site::Empty => assert_eq!(reference[n], -1),
                Site::Occupied => panic!("site {n} left unlabeled"),
                Site::Label(label) =>
                {
                    assert_eq!(*label_to_ref.entry(label).or_insert(reference[n]), reference[n]);
                    assert_eq!(*ref_to_label.entry(reference[n]).or_insert(label), label);
                }
            }
        }
    }

    #[test]
    fn test_l_shape_is_one_cluster()
    {
        let grid = labeled(&[
            "#..",
            "#..",
            "###",
        ]);
        assert_eq!(grid.num_clusters(), 1);
        let label = grid.at(0, 0);
        for (i, j) in [(1, 0), (2, 0), (2, 1), (2, 2)]
        {
            assert_eq!(grid.at(i, j), label);
        }
    }

    #[test]
    fn test_u_shape_needs_union()
    {
        // the two arms get different provisional labels until the bottom row
        let grid = labeled(&[
            "#.#",
            "#.#",
            "###",
        ]);
        assert_eq!(grid.num_clusters(), 1);
        assert_eq!(grid.at(0, 0), grid.at(0, 2));
    }

    #[test]
    fn test_staircase_merges_late()
    {
        let grid = labeled(&[
            "#.#.#",
            "#.#.#",
            "#####",
            ".....",
            "#...#",
        ]);
        assert_eq!(grid.num_clusters(), 3);
        assert_eq!(grid.at(0, 0), grid.at(0, 4));
        assert_ne!(grid.at(4, 0), grid.at(4, 4));
    }

    #[test]
    fn test_diagonal_sites_are_separate()
    {
        let grid = labeled(&[
            "#.",
            ".#",
        ]);
        assert_eq!(grid.num_clusters(), 2);
    }

    #[test]
    fn test_labels_are_canonical()
    {
        let mut grid = SiteGrid::new_square(20);
        let mut rng  = SmallRng::seed_from_u64(3);
        let mut hk   = HoshenKopelman::new(20);
        hk.fill_and_label(&mut grid, &mut rng, 0.55).unwrap();
        for label in grid.sites().filter_map(Site::label)
        {
            assert_eq!(hk.eq_classes.find(label), label);
        }
    }

    #[test]
    fn test_adjacent_sites_share_label()
    {
        let mut grid = SiteGrid::new_square(25);
        let mut rng  = SmallRng::seed_from_u64(11);
        HoshenKopelman::new(25).fill_and_label(&mut grid, &mut rng, 0.6).unwrap();
        for i in grid.rows()
        {
            for j in grid.columns()
            {
                let site = grid.at(i, j);
                if site.is_empty()
                {
                    continue;
                }
                if i + 1 < 25 && !grid.at(i + 1, j).is_empty()
                {
                    assert_eq!(site, grid.at(i + 1, j));
                }
                if j + 1 < 25 && !grid.at(i, j + 1).is_empty()
                {
                    assert_eq!(site, grid.at(i, j + 1));
                }
            }
        }
    }

    #[test]
    fn test_matches_flood_fill()
    {
        let fixed = SiteGrid::from_pattern(&[
            "##.##",
            ".#.#.",
            ".###.",
            "#...#",
            "##.##",
        ]);
        let reference = flood_fill_components(&fixed);
        let mut grid  = fixed;
        HoshenKopelman::new(5).label(&mut grid).unwrap();
        assert_same_partition(&grid, &reference);
        assert_eq!(grid.num_clusters(), 3);

        for seed in 0..20
        {
            let mut rng  = SmallRng::seed_from_u64(seed);
            let mut grid = SiteGrid::new_randomized(&mut rng, 12, 0.5 + 0.01 * seed as f64).unwrap();
            let reference = flood_fill_components(&grid);
            HoshenKopelman::new(12).label(&mut grid).unwrap();
            assert_same_partition(&grid, &reference);
        }
    }

    #[test]
    fn test_fused_matches_two_phase()
    {
        for seed in [0, 5, 99]
        {
            let mut hk = HoshenKopelman::new(30);

            let mut two_phase = SiteGrid::new_randomized(&mut SmallRng::seed_from_u64(seed), 30, 0.59).unwrap();
            hk.label(&mut two_phase).unwrap();

            let mut fused = SiteGrid::new_square(30);
            hk.fill_and_label(&mut fused, &mut SmallRng::seed_from_u64(seed), 0.59).unwrap();

            assert!(two_phase.sites().eq(fused.sites()));
        }
    }

    #[test]
    fn test_empty_and_full_grids()
    {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut hk  = HoshenKopelman::new(8);

        let mut grid = SiteGrid::new_square(8);
        hk.fill_and_label(&mut grid, &mut rng, 0.0).unwrap();
        assert_eq!(grid.num_clusters(), 0);

        hk.fill_and_label(&mut grid, &mut rng, 1.0).unwrap();
        assert_eq!(grid.num_clusters(), 1);
        assert_eq!(grid.num_occupied(), 64);
    }

    #[test]
    fn test_single_site_grid()
    {
        let mut grid = SiteGrid::from_pattern(&["#"]);
        HoshenKopelman::new(1).label(&mut grid).unwrap();
        assert_eq!(grid.at(0, 0), Site::Label(1));
    }

    #[test]
    fn test_non_square_grid_is_untouched()
    {
        let mut grid = SiteGrid::from_pattern(&["##.", "#.#"]);
        let err = HoshenKopelman::new(3).label(&mut grid).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidShape { rows: 2, cols: 3 }));
        assert!(grid.sites().all(|site| site != Site::Label(1)));
        assert_eq!(grid.num_occupied(), 4);
    }

    #[test]
    fn test_undersized_labeler_is_rejected()
    {
        let mut grid = SiteGrid::from_pattern(&["#.#", "...", "#.#"]);
        let err = HoshenKopelman::new(2).label(&mut grid).unwrap_err();
        assert!(matches!(err, SimulationError::CapacityExceeded { capacity: 4 }));
        assert_eq!(grid.num_clusters(), 0);
    }

    #[test]
    fn test_labeler_is_reusable()
    {
        let mut hk = HoshenKopelman::new(4);
        let mut a  = SiteGrid::from_pattern(&["#.#.", "....", "#.#.", "...."]);
        hk.label(&mut a).unwrap();
        assert_eq!(hk.num_labels_created(), 4);

        let mut b = SiteGrid::from_pattern(&["####", "....", "....", "...."]);
        hk.label(&mut b).unwrap();
        assert_eq!(hk.num_labels_created(), 1);
        assert_eq!(b.at(0, 3), Site::Label(1));
    }
}
