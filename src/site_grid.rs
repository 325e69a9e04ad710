use rand::Rng;
use std::collections::HashSet;
use std::fmt;
use std::io::Write;

use crate::error::{Result, SimulationError};

/// State of one lattice site.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Site
{
    #[default]
    Empty,
    /// Filled, not yet labeled.
    Occupied,
    Label(u32),
}

impl Site
{
    #[inline(always)]
    pub fn is_empty(self) -> bool
    {
        self == Site::Empty
    }
    #[inline(always)]
    pub fn label(self) -> Option<u32>
    {
        match self
        {
            Site::Label(label) => Some(label),
            _ => None,
        }
    }
    /// Integer written to output files: 0 empty, 1 occupied, else the label.
    #[inline]
    pub fn as_int(self) -> u32
    {
        match self
        {
            Site::Empty => 0,
            Site::Occupied => 1,
            Site::Label(label) => label,
        }
    }
}

pub struct SiteGrid
{
    data: Vec<Site>,
    rows: usize,
    cols: usize,
}

impl SiteGrid
{
    pub fn new_empty(rows: usize, cols: usize) -> Self
    {
        let data = vec![Site::Empty; rows*cols];
        Self {data, rows, cols}
    }
    pub fn new_square(side: usize) -> Self
    {
        SiteGrid::new_empty(side, side)
    }
    pub fn new_randomized<R: Rng>(rng: &mut R, side: usize, fill_probability: f64) -> Result<Self>
    {
        let mut grid = SiteGrid::new_square(side);
        grid.fill_randomly(rng, fill_probability)?;
        Ok(grid)
    }
    /// Builds a grid from rows of `#` (occupied) and `.` (empty).
    pub fn from_pattern(pattern: &[&str]) -> Self
    {
        let rows = pattern.len();
        let cols = pattern.first().map_or(0, |row| row.chars().count());
        let mut grid = SiteGrid::new_empty(rows, cols);
        for (i, row) in pattern.iter().enumerate()
        {
            for (j, c) in row.chars().take(cols).enumerate()
            {
                if c == '#'
                {
                    grid.set(i, j, Site::Occupied);
                }
            }
        }
        grid
    }
    #[inline(always)]
    pub fn at(&self, i: usize, j: usize) -> Site
    {
        self.data[i*self.cols + j]
    }
    #[inline(always)]
    pub fn at_pos(&self, pos: (usize, usize)) -> Site
    {
        self.at(pos.0, pos.1)
    }
    #[inline(always)]
    pub fn set(&mut self, i: usize, j: usize, site: Site)
    {
        self.data[i*self.cols + j] = site;
    }
    #[inline(always)]
    pub fn set_pos(&mut self, pos: (usize, usize), site: Site)
    {
        self.set(pos.0, pos.1, site);
    }
    #[inline(always)]
    pub fn shape(&self) -> (usize, usize)
    {
        (self.rows, self.cols)
    }
    #[inline(always)]
    pub fn num_sites(&self) -> usize
    {
        self.data.len()
    }
    /// Side length, provided the grid is square and non-empty.
    pub fn side(&self) -> Result<usize>
    {
        if self.rows != self.cols || self.rows == 0
        {
            return Err(SimulationError::InvalidShape { rows: self.rows, cols: self.cols });
        }
        Ok(self.rows)
    }
    #[inline(always)]
    pub fn rows(&self) -> std::ops::Range<usize>
    {
        0..self.rows
    }
    #[inline(always)]
    pub fn columns(&self) -> std::ops::Range<usize>
    {
        0..self.cols
    }
    pub fn row(&self, i: usize) -> &[Site]
    {
        &self.data[i*self.cols..(i + 1)*self.cols]
    }
    pub fn sites(&self) -> impl Iterator<Item = Site> + '_
    {
        self.data.iter().copied()
    }
    #[inline]
    pub(crate) fn sites_mut(&mut self) -> impl Iterator<Item = &mut Site> + '_
    {
        self.data.iter_mut()
    }
    /// Number of distinct cluster labels present.
    pub fn num_clusters(&self) -> usize
    {
        self.sites()
            .filter_map(Site::label)
            .collect::<HashSet<_>>()
            .len()
    }
    pub fn num_occupied(&self) -> usize
    {
        self.sites().filter(|site| !site.is_empty()).count()
    }
    /// Marks each site occupied with probability `fill_probability`, one draw
    /// per site in row-major order.
    pub fn fill_randomly<R: Rng>(&mut self, rng: &mut R, fill_probability: f64) -> Result<()>
    {
        self.side()?;
        for site in self.data.iter_mut()
        {
            *site = random_site(rng, fill_probability);
        }
        Ok(())
    }
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()>
    {
        write!(writer, "{self}")
    }
    pub fn write_to_file(&self, file_name: &str) -> std::io::Result<()>
    {
        let file       = std::fs::File::create(file_name)?;
        let mut writer = std::io::BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()
    }
}

#[inline(always)]
pub(crate) fn random_site<R: Rng>(rng: &mut R, fill_probability: f64) -> Site
{
    let draw: f64 = rng.random();
    if draw < fill_probability
    {
        Site::Occupied
    }
    else
    {
        Site::Empty
    }
}

impl fmt::Display for SiteGrid
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        for i in self.rows()
        {
            for site in self.row(i)
            {
                write!(f, "{:2} ", site.as_int())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for SiteGrid
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let mut result = vec![String::from("\n[")];
        for i in self.rows()
        {
            if i > 0
            {
                result.push(String::from("\n"));
            }
            for site in self.row(i)
            {
                result.push(format!(" {} ", site.as_int()));
            }
        }
        result.push(String::from("]"));
        write!(f, "{}", result.concat())
    }
}
