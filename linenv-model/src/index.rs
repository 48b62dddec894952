//! Variables and clique identifiers.
use std::fmt;

/// The backing type used to represent variables and clique ids.
pub type IndexRepr = u32;

/// A binary variable of the random field.
///
/// Internally variables are 0-based, i.e. the first variable has the index 0. The input tables
/// use 1-based indices, so `Debug` and `Display` print the 1-based form.
///
/// Creating a variable with an index larger than `Var::max_var().index()` is unsupported. This
/// might panic or be interpreted as a different variable.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Var {
    index: IndexRepr,
}

impl Var {
    /// Creates a variable from a 1-based index as used in the input tables.
    ///
    /// The parameter must be positive and may not represent a variable past `Var::max_var()`.
    #[inline]
    pub fn from_one_based(number: usize) -> Var {
        debug_assert!(number > 0);
        Var::from_index(number - 1)
    }

    /// Creates a variable from a 0-based index.
    ///
    /// The index may not represent a variable past `Var::max_var()`.
    #[inline]
    pub fn from_index(index: usize) -> Var {
        debug_assert!(index <= Var::max_var().index());
        Var {
            index: index as IndexRepr,
        }
    }

    /// The 1-based index of this variable.
    #[inline]
    pub fn to_one_based(self) -> usize {
        self.index as usize + 1
    }

    /// The 0-based index of this variable.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// The variable with largest index that is supported.
    ///
    /// Caps the problem size well below the range of the backing integer.
    pub const fn max_var() -> Var {
        Var {
            index: IndexRepr::max_value() >> 4,
        }
    }

    /// Largest number of variables supported.
    ///
    /// This is exactly `Var::max_var().index() + 1`.
    pub const fn max_count() -> usize {
        Self::max_var().index() + 1
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_one_based())
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Identifies a higher-order clique.
///
/// Like [`Var`] this is 0-based internally and 1-based in tables and messages.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct CliqueId {
    index: IndexRepr,
}

impl CliqueId {
    /// Creates a clique id from its 1-based table representation.
    #[inline]
    pub fn from_one_based(number: usize) -> CliqueId {
        debug_assert!(number > 0);
        CliqueId::from_index(number - 1)
    }

    /// Creates a clique id from a 0-based index.
    #[inline]
    pub fn from_index(index: usize) -> CliqueId {
        debug_assert!(index <= IndexRepr::max_value() as usize);
        CliqueId {
            index: index as IndexRepr,
        }
    }

    /// The 1-based table representation.
    #[inline]
    pub fn to_one_based(self) -> usize {
        self.index as usize + 1
    }

    /// The 0-based index.
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Debug for CliqueId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "c{}", self.to_one_based())
    }
}

impl fmt::Display for CliqueId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_one_based())
    }
}

#[cfg(any(test, feature = "proptest-strategies"))]
#[doc(hidden)]
pub mod strategy {
    use super::*;
    use proptest::prelude::*;

    pub fn var(index: impl Strategy<Value = usize>) -> impl Strategy<Value = Var> {
        index.prop_map(Var::from_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_based_conversions() {
        let var = Var::from_one_based(3);
        assert_eq!(var.index(), 2);
        assert_eq!(var.to_one_based(), 3);
        assert_eq!(format!("{}", var), "3");

        let clique = CliqueId::from_one_based(1);
        assert_eq!(clique.index(), 0);
        assert_eq!(format!("{}", clique), "1");
        assert_eq!(format!("{:?}", clique), "c1");
    }

    #[test]
    fn max_count_fits() {
        assert_eq!(Var::max_count(), Var::max_var().index() + 1);
        assert!(Var::max_count() < IndexRepr::max_value() as usize);
    }
}
