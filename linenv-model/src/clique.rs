//! Assignment of variables to higher-order cliques.
use std::fmt;

use crate::index::{CliqueId, Var};

/// Variable × slot table of clique memberships.
///
/// Row `i` lists the cliques variable `i` takes part in, using up to `slots()` entries. Unused
/// slots are `None`. Equivalent to `Vec<Vec<Option<CliqueId>>>` but stored in a single buffer.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CliqueTable {
    var_count: usize,
    slots: usize,
    entries: Vec<Option<CliqueId>>,
}

impl CliqueTable {
    /// Create a table without rows or slots.
    pub fn new() -> CliqueTable {
        CliqueTable::default()
    }

    /// Create a table with the given number of rows and slots, all unused.
    pub fn with_shape(var_count: usize, slots: usize) -> CliqueTable {
        CliqueTable {
            var_count,
            slots,
            entries: vec![None; var_count * slots],
        }
    }

    /// Create a table from per-variable lists of cliques.
    ///
    /// The slot count is the length of the longest list; shorter rows are padded.
    pub fn from_memberships<R, I>(rows: R) -> CliqueTable
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = CliqueId>,
    {
        let rows: Vec<Vec<CliqueId>> = rows
            .into_iter()
            .map(|row| row.into_iter().collect())
            .collect();
        let slots = rows.iter().map(|row| row.len()).max().unwrap_or(0);
        let mut table = CliqueTable::with_shape(rows.len(), slots);
        for (index, row) in rows.into_iter().enumerate() {
            for (slot, clique) in row.into_iter().enumerate() {
                table.set(Var::from_index(index), slot, Some(clique));
            }
        }
        table
    }

    /// Number of rows, i.e. variables covered by the table.
    pub fn var_count(&self) -> usize {
        self.var_count
    }

    /// Maximal number of cliques per variable.
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Assign or clear a slot.
    pub fn set(&mut self, var: Var, slot: usize, clique: Option<CliqueId>) {
        debug_assert!(var.index() < self.var_count && slot < self.slots);
        self.entries[var.index() * self.slots + slot] = clique;
    }

    /// The raw slots of a variable.
    pub fn row(&self, var: Var) -> &[Option<CliqueId>] {
        let begin = var.index() * self.slots;
        &self.entries[begin..begin + self.slots]
    }

    /// Cliques a variable takes part in, in slot order.
    pub fn memberships(&self, var: Var) -> impl Iterator<Item = CliqueId> + '_ {
        self.row(var).iter().filter_map(|&clique| clique)
    }

    /// Iterator over all `(variable, clique)` memberships.
    pub fn iter(&self) -> impl Iterator<Item = (Var, CliqueId)> + '_ {
        (0..self.var_count).flat_map(move |index| {
            let var = Var::from_index(index);
            self.memberships(var).map(move |clique| (var, clique))
        })
    }

    /// One more than the largest referenced clique index, zero if no clique is referenced.
    pub fn clique_count(&self) -> usize {
        self.entries
            .iter()
            .filter_map(|&clique| clique)
            .map(|clique| clique.index() + 1)
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Debug for CliqueTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list()
            .entries((0..self.var_count).map(|index| self.row(Var::from_index(index))))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cliques(ids: &[usize]) -> Vec<CliqueId> {
        ids.iter().map(|&id| CliqueId::from_one_based(id)).collect()
    }

    #[test]
    fn memberships_are_padded() {
        let table =
            CliqueTable::from_memberships(vec![cliques(&[1, 2]), cliques(&[]), cliques(&[2])]);

        assert_eq!(table.var_count(), 3);
        assert_eq!(table.slots(), 2);
        assert_eq!(table.row(Var::from_index(1)), &[None, None]);
        assert_eq!(
            table.memberships(Var::from_index(2)).collect::<Vec<_>>(),
            cliques(&[2])
        );
        assert_eq!(table.iter().count(), 3);
        assert_eq!(table.clique_count(), 2);
    }

    #[test]
    fn sparse_ids() {
        let table = CliqueTable::from_memberships(vec![cliques(&[5])]);
        assert_eq!(table.clique_count(), 5);
    }

    #[test]
    fn empty_table() {
        let table = CliqueTable::new();
        assert_eq!(table.clique_count(), 0);
        assert_eq!(table.iter().count(), 0);
    }
}
