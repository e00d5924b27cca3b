//! Mapping between representations (request -> command, aggregate -> response, ...).

/// Maps a `Source` into a `Target`.
///
/// Usable in any layer: HTTP DTO to service request, aggregate to persistence
/// record, service response to HTTP DTO.
pub trait Mapper<Source, Target> {
    fn map(&self, source: Source) -> Target;
}
