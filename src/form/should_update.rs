use serde_json::Value;

use super::path::{FieldPath, resolve};

/// Re-render decision for a binding: reports whether any tracked path holds a
/// different value in two store snapshots.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ShouldUpdate {
    paths: Vec<FieldPath>,
}

pub fn create_should_update<I, P>(paths: I) -> ShouldUpdate
where
    I: IntoIterator<Item = P>,
    P: Into<FieldPath>,
{
    let mut tracked: Vec<FieldPath> = Vec::new();
    for path in paths {
        let path = path.into();
        if !tracked.contains(&path) {
            tracked.push(path);
        }
    }
    ShouldUpdate { paths: tracked }
}

impl ShouldUpdate {
    pub fn paths(&self) -> &[FieldPath] {
        &self.paths
    }

    /// Values are compared by value. With no tracked paths this is always
    /// `false`.
    pub fn changed(&self, prev: &Value, curr: &Value) -> bool {
        self.paths
            .iter()
            .any(|path| resolve(prev, path) != resolve(curr, path))
    }
}
