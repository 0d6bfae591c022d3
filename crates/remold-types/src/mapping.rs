use crate::cache::TypeCache;
use crate::model::TypeId;

/// A producer of attributed types.
///
/// Implementations walk their own symbol source and intern the resulting
/// nodes into `cache`. Names that cannot be resolved become shallow classes
/// and symbols that cannot be classified become `Unknown`; mapping never
/// fails.
pub trait TypeMapping {
    /// Map the class with the given binary name (`java.util.Map$Entry`).
    fn map_class(&self, cache: &TypeCache, name: &str) -> TypeId;
}
