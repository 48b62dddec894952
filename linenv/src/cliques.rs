//! Clique member counts.
use linenv_model::{CliqueId, CliqueTable};

/// Number of member slots of every clique id up to the largest one referenced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliqueSizes {
    sizes: Vec<usize>,
}

impl CliqueSizes {
    /// Counts the `(variable, slot)` pairs referencing each clique.
    pub fn index(table: &CliqueTable) -> CliqueSizes {
        let mut sizes = vec![0; table.clique_count()];
        for (_, clique) in table.iter() {
            sizes[clique.index()] += 1;
        }
        CliqueSizes { sizes }
    }

    /// Number of clique ids, including empty ones below the largest referenced id.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn size(&self, clique: CliqueId) -> usize {
        self.sizes[clique.index()]
    }

    /// Share of the clique potential carried by each member slot.
    ///
    /// Zero for empty cliques.
    pub fn weight(&self, clique: CliqueId) -> f64 {
        match self.size(clique) {
            0 => 0.0,
            size => 1.0 / size as f64,
        }
    }

    /// Ids not referenced by any variable.
    pub fn empty_cliques(&self) -> impl Iterator<Item = CliqueId> + '_ {
        self.iter()
            .filter(|&(_, size)| size == 0)
            .map(|(clique, _)| clique)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CliqueId, usize)> + '_ {
        self.sizes
            .iter()
            .enumerate()
            .map(|(index, &size)| (CliqueId::from_index(index), size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    use linenv_model::{test::clique_table, Var};

    #[test]
    fn counts_slots() {
        let c = CliqueId::from_one_based;
        let table = CliqueTable::from_memberships(vec![
            vec![c(1), c(3)],
            vec![c(3)],
            vec![],
            vec![c(3), c(3)],
        ]);
        let sizes = CliqueSizes::index(&table);

        assert_eq!(sizes.len(), 3);
        assert_eq!(sizes.size(c(1)), 1);
        assert_eq!(sizes.size(c(2)), 0);
        assert_eq!(sizes.size(c(3)), 4);
        assert_eq!(sizes.weight(c(2)), 0.0);
        assert_eq!(sizes.weight(c(3)), 0.25);
        assert_eq!(sizes.empty_cliques().collect::<Vec<_>>(), vec![c(2)]);
    }

    #[test]
    fn no_cliques() {
        let sizes = CliqueSizes::index(&CliqueTable::with_shape(4, 2));
        assert_eq!(sizes.len(), 0);
        assert_eq!(sizes.empty_cliques().count(), 0);
    }

    proptest! {
        #[test]
        fn sizes_add_up(table in clique_table(6, 0..4usize, 0..5usize)) {
            let sizes = CliqueSizes::index(&table);
            let total: usize = sizes.iter().map(|(_, size)| size).sum();
            prop_assert_eq!(total, table.iter().count());

            for index in 0..table.var_count() {
                for clique in table.memberships(Var::from_index(index)) {
                    prop_assert!(sizes.size(clique) > 0);
                }
            }
        }

        #[test]
        fn scan_order_is_irrelevant(table in clique_table(5, 1..3usize, 1..4usize)) {
            let mut rows: Vec<Vec<CliqueId>> = (0..table.var_count())
                .map(|index| table.memberships(Var::from_index(index)).collect())
                .collect();
            rows.reverse();
            let reversed = CliqueTable::from_memberships(rows);
            prop_assert_eq!(CliqueSizes::index(&table), CliqueSizes::index(&reversed));
        }
    }
}
