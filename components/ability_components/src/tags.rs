use {
    bevy::prelude::*,
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// Dot separated hierarchical tag, e.g. `Message.HealthPotion`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
#[serde(transparent)]
pub struct GameplayTag(pub String);

impl GameplayTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when this tag equals `parent` or sits below it in the hierarchy.
    /// `Message.HealthPotion` matches `Message`, `Messages` does not.
    pub fn matches(&self, parent: &str) -> bool {
        self.0
            .strip_prefix(parent)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    }
}

impl fmt::Display for GameplayTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameplayTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(transparent)]
pub struct GameplayTagContainer(pub Vec<GameplayTag>);

impl GameplayTagContainer {
    /// Adds a tag unless an identical one is already present.
    pub fn add(&mut self, tag: GameplayTag) {
        if !self.0.contains(&tag) {
            self.0.push(tag);
        }
    }

    pub fn has_tag(&self, parent: &str) -> bool {
        self.0.iter().any(|tag| tag.matches(parent))
    }

    /// Tags nested under `parent`, in insertion order.
    pub fn filtered(&self, parent: &str) -> Self {
        self.0
            .iter()
            .filter(|tag| tag.matches(parent))
            .cloned()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameplayTag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<GameplayTag> for GameplayTagContainer {
    fn from_iter<I: IntoIterator<Item = GameplayTag>>(iter: I) -> Self {
        let mut container = Self::default();
        for tag in iter {
            container.add(tag);
        }
        container
    }
}
