//! `blocks-core`: domain-modeling building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identity and value equality, the aggregate event ledger, the domain error
//! taxonomy and the outbound/inbound port contracts that infrastructure
//! implements.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod mapper;
pub mod repository;
pub mod result;
pub mod type_name;
pub mod unit_of_work;
pub mod use_case;
pub mod value_object;

pub use aggregate::{AggregateBase, AggregateRoot, ExpectedVersion};
pub use entity::Entity;
pub use error::{Context, ContextTypeError, DomainError, DomainErrorKind, DomainResult};
pub use id::AggregateId;
pub use mapper::Mapper;
pub use repository::{
    AsyncReadOnlyRepository, AsyncRepository, AsyncWriteOnlyRepository, ReadOnlyRepository,
    Repository, RepositoryError, WriteOnlyRepository,
};
pub use result::{ResultAccess, ResultAccessError};
pub use type_name::short_type_name;
pub use unit_of_work::{AsyncUnitOfWork, UnitOfWork, UnitOfWorkError};
pub use use_case::{AsyncDomainUseCase, AsyncUseCase, DomainUseCase, UseCase};
pub use value_object::ValueObject;

#[doc(hidden)]
pub mod __private {
    pub use serde;
    pub use uuid;
}
