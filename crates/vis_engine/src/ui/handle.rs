//! Widget state handles

use std::fmt;

/// Compound key addressing one widget's persistent state across
/// frames. The integer part distinguishes instances generated in a
/// loop from one call site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UiHandle {
    name: String,
    index: i32,
}

impl UiHandle {
    /// Create a handle from a name and an instance index
    pub fn new(name: impl Into<String>, index: i32) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    /// The handle's name part
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The handle's instance index
    pub fn index(&self) -> i32 {
        self.index
    }
}

impl From<&str> for UiHandle {
    fn from(name: &str) -> Self {
        Self::new(name, 0)
    }
}

impl fmt::Display for UiHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.index)
    }
}
