use serde::{Deserialize, Serialize};

/// The terminal outcome of a single capability request.
///
/// Produced exactly once per resolved request and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    /// The capability name, e.g. `"storage.read"`.
    pub name: String,
    /// Whether the platform granted the capability.
    pub granted: bool,
}

impl Capability {
    pub fn new(name: impl Into<String>, granted: bool) -> Self {
        Self {
            name: name.into(),
            granted,
        }
    }
}

/// The payload of a platform prompt completion callback.
///
/// `names` and `grants` are positionally paired parallel arrays, exactly as
/// the platform delivers them. Pairing is only meaningful within one
/// completion; the broker re-associates outcomes by name, never by position
/// relative to any issuance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptCompletion {
    pub names: Vec<String>,
    pub grants: Vec<bool>,
}

impl PromptCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one `(name, granted)` pair to the completion.
    pub fn push(&mut self, name: impl Into<String>, granted: bool) {
        self.names.push(name.into());
        self.grants.push(granted);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_pushes_parallel_pairs() {
        let mut completion = PromptCompletion::new();
        assert!(completion.is_empty());

        completion.push("storage.read", true);
        completion.push("player.external", false);

        assert_eq!(completion.len(), 2);
        assert_eq!(completion.names, vec!["storage.read", "player.external"]);
        assert_eq!(completion.grants, vec![true, false]);
    }
}
