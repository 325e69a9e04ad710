use crate::error::{Result, SimulationError};

/// Union-find store mapping each cluster label to its parent label.
///
/// Labels start at 1; slot 0 of `data` is never handed out so that a label
/// can index its own parent directly.
pub struct EquivalenceClass
{
    data: Vec<u32>,
    n_classes: u32,
    capacity: usize,
}

impl EquivalenceClass
{
    /// Store able to hold `capacity` labels, i.e. one per site of the lattice.
    pub fn new(capacity: usize) -> Self
    {
        let mut data = Vec::with_capacity(capacity + 1);
        data.push(0);
        Self { data, n_classes: 0, capacity }
    }
    #[inline]
    pub fn reset(&mut self)
    {
        self.data.truncate(1);
        self.n_classes = 0;
    }
    #[inline]
    pub fn capacity(&self) -> usize
    {
        self.capacity
    }
    #[inline]
    pub fn num_classes(&self) -> u32
    {
        self.n_classes
    }
    pub fn create_class(&mut self) -> Result<u32>
    {
        if self.n_classes as usize >= self.capacity
        {
            return Err(SimulationError::CapacityExceeded { capacity: self.capacity });
        }
        self.n_classes += 1;
        let new_class = self.n_classes;
        self.data.push(new_class);
        Ok(new_class)
    }
    /// Root of the class `label` belongs to. Every label visited on the way is
    /// re-pointed straight at the root.
    pub fn find(&mut self, label: u32) -> u32
    {
        debug_assert!(label >= 1 && label <= self.n_classes, "find: label {label} was never created");

        let mut root = label;
        while self.data[root as usize] != root
        {
            root = self.data[root as usize];
        }

        let mut current = label;
        while self.data[current as usize] != current
        {
            let next = self.data[current as usize];
            self.data[current as usize] = root;
            current = next;
        }
        root
    }
    /// Merges the classes of `label1` and `label2`. The root of `label2` stays
    /// canonical and is returned.
    pub fn union_get_label(&mut self, label1: u32, label2: u32) -> u32
    {
        let root2 = self.find(label2);
        let root1 = self.find(label1);
        self.data[root1 as usize] = root2;
        root2
    }
}
