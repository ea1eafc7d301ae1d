//! Service layer: the allocator and the convergence loop.

pub mod allocator;
pub mod convergence_loop;

pub use allocator::Allocator;
pub use convergence_loop::ConvergenceLoop;
