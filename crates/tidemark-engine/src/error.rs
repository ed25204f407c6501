use crate::ids::IdGenerator;

/// Failures the engine records on the document model.
///
/// Messages are pre-rendered so the model stays cheap to clone and compare.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("malformed markup: {0}")]
    Markup(String),
    #[error("widget payload decode failed: {0}")]
    WidgetDecode(String),
}

/// An error carrying a build-local identifier.
///
/// Equality and hashing use the id only, matching how document items are
/// identified; the document-level error list deduplicates on it.
#[derive(Debug, Clone, Eq)]
pub struct IdentifiableError {
    pub id: String,
    pub error: EngineError,
}

impl IdentifiableError {
    pub fn new<G: IdGenerator>(ids: &mut G, error: EngineError) -> Self {
        Self {
            id: ids.next_id(),
            error,
        }
    }
}

impl PartialEq for IdentifiableError {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl std::hash::Hash for IdentifiableError {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::IncrementalIdGenerator;

    #[test]
    fn test_equality_is_by_id() {
        let mut ids = IncrementalIdGenerator::new();
        let a = IdentifiableError::new(&mut ids, EngineError::Markup("x".into()));
        let b = IdentifiableError {
            id: a.id.clone(),
            error: EngineError::WidgetDecode("y".into()),
        };
        assert_eq!(a, b);

        let c = IdentifiableError::new(&mut ids, EngineError::Markup("x".into()));
        assert_ne!(a, c);
    }

    #[test]
    fn test_error_messages_render() {
        assert_eq!(
            EngineError::Markup("bad tag".into()).to_string(),
            "malformed markup: bad tag"
        );
    }
}
