use crate::models::StyleProfile;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Lookup of style profiles by identifier.
/// A missing profile is `Ok(None)`, not an error.
#[async_trait]
pub trait StyleProfileStore: Send + Sync {
    async fn profile(&self, id: &str) -> Result<Option<StyleProfile>>;
}

/// Map-backed store, handy for the CLI and tests
#[derive(Debug, Clone, Default)]
pub struct InMemoryStyleProfiles {
    profiles: HashMap<String, StyleProfile>,
}

impl InMemoryStyleProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, profile: StyleProfile) {
        self.profiles.insert(id.into(), profile);
    }
}

impl FromIterator<(String, StyleProfile)> for InMemoryStyleProfiles {
    fn from_iter<I: IntoIterator<Item = (String, StyleProfile)>>(iter: I) -> Self {
        Self {
            profiles: iter.into_iter().collect(),
        }
    }
}

#[async_trait]
impl StyleProfileStore for InMemoryStyleProfiles {
    async fn profile(&self, id: &str) -> Result<Option<StyleProfile>> {
        Ok(self.profiles.get(id).cloned())
    }
}
