//! Multi-valued logic algebras
//!
//! Three-valued (Kleene) logic over 0, 1 and X, extended to five-valued
//! logic (0, 1, X, D = 1/0, D′ = 0/1) used to reason about a good and a
//! faulty circuit at the same time. Nine-valued logic is provided as a
//! generalization of the same pattern, but nothing in the test generation
//! engine consumes it.

mod five;
mod nine;
mod tri;

pub use five::FiveValue;
pub use nine::NineValue;
pub use tri::TriValue;
