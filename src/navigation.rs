use serde::{Deserialize, Serialize};

use crate::ViewId;

/// Breadcrumb label of the root view.
pub const ROOT_LABEL: &str = "ROOT";

/// One breadcrumb entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    pub view: ViewId,
    pub label: String,
}

impl Crumb {
    pub fn new(view: ViewId, label: impl Into<String>) -> Self {
        Self {
            view,
            label: label.into(),
        }
    }
}

/// Trail from the root view to the current view. Never empty: the root entry
/// is always first and the last entry is the current view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationPath {
    root: Crumb,
    trail: Vec<Crumb>,
}

impl Default for NavigationPath {
    fn default() -> Self {
        Self {
            root: Crumb::new(ViewId::root(), ROOT_LABEL),
            trail: Vec::new(),
        }
    }
}

impl NavigationPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, view: ViewId, label: impl Into<String>) {
        self.trail.push(Crumb::new(view, label));
    }

    /// Cuts the path down to `index + 1` entries and returns the new last entry.
    /// An out of range index leaves the path untouched and returns `None`.
    pub fn truncate(&mut self, index: usize) -> Option<&Crumb> {
        if index >= self.len() {
            return None;
        }
        self.trail.truncate(index);
        Some(self.current())
    }

    pub fn current(&self) -> &Crumb {
        self.trail.last().unwrap_or(&self.root)
    }

    pub fn get(&self, index: usize) -> Option<&Crumb> {
        match index {
            0 => Some(&self.root),
            i => self.trail.get(i - 1),
        }
    }

    pub fn len(&self) -> usize {
        self.trail.len() + 1
    }

    /// Always `false`, the root entry cannot be removed.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of levels below the root.
    pub fn depth(&self) -> usize {
        self.trail.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Crumb> {
        std::iter::once(&self.root).chain(self.trail.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_abc() -> NavigationPath {
        let mut path = NavigationPath::new();
        path.push(ViewId::new("a"), "A");
        path.push(ViewId::new("b"), "B");
        path.push(ViewId::new("c"), "C");
        path
    }

    #[test]
    fn starts_at_root() {
        let path = NavigationPath::new();
        assert_eq!(path.len(), 1);
        assert_eq!(path.current(), &Crumb::new(ViewId::root(), ROOT_LABEL));
    }

    #[test]
    fn truncate_keeps_prefix() {
        let mut path = path_abc();
        assert_eq!(path.truncate(1).map(|c| c.view.as_str()), Some("a"));
        assert_eq!(path.len(), 2);

        assert_eq!(path.truncate(0).map(|c| c.view.as_str()), Some("root"));
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn truncate_to_last_is_noop() {
        let mut path = path_abc();
        assert_eq!(path.truncate(3).map(|c| c.label.as_str()), Some("C"));
        assert_eq!(path, path_abc());
    }

    #[test]
    fn truncate_out_of_range_is_rejected() {
        let mut path = path_abc();
        assert_eq!(path.truncate(4), None);
        assert_eq!(path, path_abc());
    }

    #[test]
    fn iter_and_get_agree() {
        let path = path_abc();
        for (i, crumb) in path.iter().enumerate() {
            assert_eq!(path.get(i), Some(crumb));
        }
        assert_eq!(path.get(4), None);
        assert_eq!(path.depth(), 3);
    }
}
