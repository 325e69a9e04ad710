//! End-to-end tests: fill, label, check and search on whole lattices.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use percolation::percolation::cluster_size;
use percolation::threshold_search::sample_labeled_grid;
use percolation::{check_percolation, HoshenKopelman, SearchOutcome, Site, SiteGrid, ThresholdSearch};

#[test]
fn test_three_by_three_example()
{
    let mut grid = SiteGrid::from_pattern(&[
        "##.",
        ".#.",
        ".##",
    ]);
    HoshenKopelman::new(3).label(&mut grid).unwrap();

    assert_eq!(grid.num_clusters(), 1);
    let label = check_percolation(&grid).unwrap().expect("cluster should span");
    assert_eq!(cluster_size(&grid, label), 5);
    for (i, j) in [(0, 0), (0, 1), (1, 1), (2, 1), (2, 2)]
    {
        assert_eq!(grid.at(i, j), Site::Label(label));
    }
    assert_eq!(grid.to_string(), format!("{l:2} {l:2}  0 \n 0 {l:2}  0 \n 0 {l:2} {l:2} \n", l = label));
}

#[test]
fn test_empty_lattice()
{
    for side in [1, 2, 17]
    {
        let grid = sample_labeled_grid(side, 0.0, 9).unwrap();
        assert_eq!(grid.num_clusters(), 0);
        assert_eq!(check_percolation(&grid).unwrap(), None);
    }
}

#[test]
fn test_full_lattice()
{
    for side in [1, 2, 17]
    {
        let grid = sample_labeled_grid(side, 1.0, 9).unwrap();
        assert_eq!(grid.num_clusters(), 1);
        let label = grid.at(0, 0).label();
        assert!(label.is_some());
        assert_eq!(check_percolation(&grid).unwrap(), label);
    }
}

#[test]
fn test_same_seed_same_partition()
{
    let a = sample_labeled_grid(40, 0.58, 1234).unwrap();
    let b = sample_labeled_grid(40, 0.58, 1234).unwrap();
    assert!(a.sites().eq(b.sites()));

    let mut fused = SiteGrid::new_square(40);
    HoshenKopelman::new(40)
        .fill_and_label(&mut fused, &mut SmallRng::seed_from_u64(1234), 0.58)
        .unwrap();
    assert!(a.sites().eq(fused.sites()));
}

#[test]
fn test_spanning_label_touches_both_rows()
{
    for seed in 0..10
    {
        let grid = sample_labeled_grid(30, 0.65, seed).unwrap();
        if let Some(label) = check_percolation(&grid).unwrap()
        {
            assert!(grid.row(0).contains(&Site::Label(label)));
            assert!(grid.row(29).contains(&Site::Label(label)));
        }
    }
}

#[test]
fn test_threshold_near_known_value()
{
    // site percolation on the square lattice: p_c ~ 0.5927
    let mut thresholds = Vec::new();
    for seed in 0..8
    {
        let search   = ThresholdSearch::new(0.3, 0.005, seed).unwrap();
        let mut grid = SiteGrid::new_square(64);
        match search.run(&mut grid).unwrap()
        {
            SearchOutcome::Percolates { probability, label } =>
            {
                assert_eq!(check_percolation(&grid).unwrap(), Some(label));
                thresholds.push(probability);
            }
            SearchOutcome::NoPercolationFound { .. } => panic!("a full lattice always spans"),
        }
    }
    let mean = thresholds.iter().sum::<f64>() / thresholds.len() as f64;
    assert!(mean > 0.45 && mean < 0.7, "mean threshold {mean}");
}
