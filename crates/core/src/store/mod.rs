//! Store module
//!
//! Client-side cache of the task collection plus loading and error state.

mod task_store;

pub use task_store::TaskStore;
