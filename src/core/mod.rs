pub mod interner;
pub mod text_utils;

pub use interner::{IStr, Interner};
