//! Expression resolution: from a parsed tree to a result type or a ranked
//! completion candidate list.

pub mod assign;
pub mod candidates;
pub mod promote;
mod resolver;

pub use assign::{is_assignable, is_subtype};
pub use candidates::{Candidate, CandidateKind, CandidateList};
pub use promote::{PrimitiveKind, binary_numeric_promotion, unary_numeric_promotion};
pub use resolver::{
    CursorContext, LocalProvider, Resolution, Resolver, filter_constructors, filter_overloads,
};
