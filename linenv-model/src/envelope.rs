//! Lower linear envelope coefficients.

/// A lower linear envelope `f(x) = min_k (a_k * x + b_k)`.
///
/// The slopes `a_k` and intercepts `b_k` are kept as two separate sequences of equal length. The
/// same envelope is shared by all cliques of a problem. An empty envelope means that the problem
/// has no higher-order potentials.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Envelope {
    slopes: Vec<f64>,
    intercepts: Vec<f64>,
}

impl Envelope {
    /// Create an envelope without any linear pieces.
    pub fn new() -> Envelope {
        Envelope::default()
    }

    /// Create an envelope from `(a_k, b_k)` pairs.
    pub fn from_pieces(pieces: impl IntoIterator<Item = (f64, f64)>) -> Envelope {
        let mut envelope = Envelope::new();
        for (slope, intercept) in pieces {
            envelope.add_piece(slope, intercept);
        }
        envelope
    }

    /// Appends the linear piece `slope * x + intercept`.
    pub fn add_piece(&mut self, slope: f64, intercept: f64) {
        self.slopes.push(slope);
        self.intercepts.push(intercept);
    }

    /// Number of linear pieces `K`.
    pub fn len(&self) -> usize {
        self.slopes.len()
    }

    /// Whether there are no linear pieces.
    pub fn is_empty(&self) -> bool {
        self.slopes.is_empty()
    }

    /// The slopes `a_0..a_{K-1}`.
    pub fn slopes(&self) -> &[f64] {
        &self.slopes
    }

    /// The intercepts `b_0..b_{K-1}`.
    pub fn intercepts(&self) -> &[f64] {
        &self.intercepts
    }

    /// Iterator over `(a_k, b_k)` pairs.
    pub fn pieces(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.slopes
            .iter()
            .cloned()
            .zip(self.intercepts.iter().cloned())
    }

    /// Evaluates the envelope.
    ///
    /// Returns `None` for an empty envelope.
    pub fn value(&self, x: f64) -> Option<f64> {
        self.pieces()
            .map(|(slope, intercept)| slope * x + intercept)
            .fold(None, |min, value| match min {
                Some(min) if min <= value => Some(min),
                _ => Some(value),
            })
    }
}
