//! Node content as seen by the explorer.
//!
//! The payload carried by a graph node is opaque to the explorer except for
//! three lookups: the id of the definition (used to pick an icon), the
//! user-editable `name` property and the definition's `title`.

use serde::Deserialize;

use crate::identifier::Id;

/// Definition payload attached to a graph node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Definition {
    /// Identifier of the definition type (for example `Task` or `Lane`).
    #[serde(rename = "definition")]
    id: Id,

    /// Value of the node's `name` property, if the definition has one.
    #[serde(default)]
    name: Option<String>,

    /// Title provided by the definition adapter.
    #[serde(default)]
    title: Option<String>,
}

impl Definition {
    /// Creates a definition without name or title.
    pub fn new(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            name: None,
            title: None,
        }
    }

    /// Sets the `name` property.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the definition title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Replaces the `name` property, returning the previous value.
    pub fn set_name(&mut self, name: Option<String>) -> Option<String> {
        std::mem::replace(&mut self.name, name)
    }
}
