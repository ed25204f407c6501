/// Generates positionally-derived identifiers for document items.
///
/// Generators are plain values; threading one through a builder call is
/// enough, no shared state is required for ids to stay unique.
pub trait IdGenerator {
    /// Returns the next identifier at this level.
    fn next_id(&mut self) -> String;

    /// Returns a new generator scoped under the current position.
    fn nested(&mut self) -> Self
    where
        Self: Sized;
}

/// Counts upwards per level and formats hierarchical string ids.
///
/// `next_id` yields `"{prefix}{n}"`; `nested` yields a generator whose prefix
/// is `"{prefix}{n}-{m}."`, where `n` is the last id emitted at this level and
/// `m` counts nested generators spawned since. Emitting an id resets `m`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncrementalIdGenerator {
    prefix: String,
    id: u64,
    nested_id: u64,
}

impl IncrementalIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for IncrementalIdGenerator {
    fn next_id(&mut self) -> String {
        self.nested_id = 0;
        self.id += 1;
        format!("{}{}", self.prefix, self.id)
    }

    fn nested(&mut self) -> Self {
        self.nested_id += 1;
        Self {
            prefix: format!("{}{}-{}.", self.prefix, self.id, self.nested_id),
            id: 0,
            nested_id: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_increment_per_level() {
        let mut ids = IncrementalIdGenerator::new();
        assert_eq!(ids.next_id(), "1");
        assert_eq!(ids.next_id(), "2");
        assert_eq!(ids.next_id(), "3");
    }

    #[test]
    fn test_nested_scope_encodes_position() {
        let mut ids = IncrementalIdGenerator::new();
        assert_eq!(ids.next_id(), "1");

        let mut nested = ids.nested();
        assert_eq!(nested.next_id(), "1-1.1");
        assert_eq!(nested.next_id(), "1-1.2");

        let mut sibling = ids.nested();
        assert_eq!(sibling.next_id(), "1-2.1");

        let mut deeper = nested.nested();
        assert_eq!(deeper.next_id(), "1-1.2-1.1");
    }

    #[test]
    fn test_next_resets_nested_counter() {
        let mut ids = IncrementalIdGenerator::new();
        let _ = ids.nested();
        let _ = ids.nested();
        assert_eq!(ids.next_id(), "1");

        // the nested spawn counter starts over after an id is emitted
        let mut nested = ids.nested();
        assert_eq!(nested.next_id(), "1-1.1");
    }

    #[test]
    fn test_generators_are_independent_values() {
        let mut ids = IncrementalIdGenerator::new();
        let mut a = ids.nested();
        let copy = a.clone();
        assert_eq!(a.next_id(), "0-1.1");

        let mut b = copy;
        assert_eq!(b.next_id(), "0-1.1");
    }
}
