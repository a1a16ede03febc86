//! Task module
//!
//! Task types, local ordering and the validation rules shared by both forms.

mod model;
mod validation;

pub use model::*;
pub use validation::*;
