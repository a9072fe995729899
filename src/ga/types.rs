//! Core trait shared by the selection operators.
//!
//! Selection only needs to compare fitness values, so it is written
//! against [`Individual`] rather than the concrete chromosome type.

/// A candidate solution that carries a fitness value.
///
/// Higher fitness is considered better (maximization). Timetable
/// fitness is `hard + soft`, where the hard part is the negated number of
/// hard-constraint violations, so values are frequently negative.
///
/// # Implementing
///
/// ```ignore
/// #[derive(Clone)]
/// struct Candidate {
///     fitness: f64,
/// }
///
/// impl Individual for Candidate {
///     fn fitness(&self) -> f64 { self.fitness }
/// }
/// ```
pub trait Individual: Clone + Send + Sync {
    /// Returns the current fitness used for selection.
    fn fitness(&self) -> f64;
}
