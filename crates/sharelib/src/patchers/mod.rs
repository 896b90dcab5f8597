pub mod bootstrap;
pub mod chunk_wrapper;
pub mod require_fn;
