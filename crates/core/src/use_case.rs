//! Inbound ports: application use cases and pure domain use cases.
//!
//! An application use case orchestrates ports (repositories, publishers,
//! hashers) around the domain. A domain use case is a pure operation over
//! domain objects: no I/O, nothing persisted, only values in and out. Keeping
//! the two traits apart lets a service depend on domain logic without pulling
//! in application wiring.

use async_trait::async_trait;

/// A synchronous use case (application service entry point).
pub trait UseCase<Request, Response> {
    fn execute(&self, request: Request) -> Response;
}

/// An async use case, for services that await I/O-bound ports.
#[async_trait]
pub trait AsyncUseCase<Request, Response>: Send + Sync
where
    Request: Send + 'static,
{
    async fn execute(&self, request: Request) -> Response;
}

/// A pure domain operation (policy, calculation, cross-aggregate rule).
pub trait DomainUseCase<Request, Response> {
    fn execute(&self, request: Request) -> Response;
}

/// Async form of [`DomainUseCase`].
#[async_trait]
pub trait AsyncDomainUseCase<Request, Response>: Send + Sync
where
    Request: Send + 'static,
{
    async fn execute(&self, request: Request) -> Response;
}
