//! Infrastructure adapters for the kernel ports.
//!
//! Everything here is in-memory and intended for tests, examples and
//! single-process deployments. Real storage backends implement the same
//! `blocks_core` repository and unit-of-work traits.

pub mod repository;
pub mod unit_of_work;

pub use repository::{InMemoryRepository, PublishingRepository, Snapshot, Transactional};
pub use unit_of_work::InMemoryUnitOfWork;

#[cfg(test)]
mod test_support;
