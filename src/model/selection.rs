use super::{Element, IfcProject};
use crate::host::HostSelection;

/// Element ids in the order the user picked them.
///
/// Order matters: the first selected element decides which parameters are
/// candidates and which unit label is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<u64>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = u64>) -> Self {
        let mut selection = Self::new();
        selection.extend(ids);
        selection
    }

    #[must_use]
    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Adds the id at the end, or removes it if already selected.
    pub fn toggle(&mut self, id: u64) {
        if let Some(pos) = self.ids.iter().position(|&i| i == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    /// Appends ids not yet selected, keeping the existing order.
    pub fn extend(&mut self, ids: impl IntoIterator<Item = u64>) {
        for id in ids {
            if !self.contains(id) {
                self.ids.push(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    #[must_use]
    pub fn view<'a>(&'a self, project: &'a IfcProject) -> SelectionView<'a> {
        SelectionView {
            project,
            selection: self,
        }
    }
}

/// A selection bound to the project that owns its elements.
pub struct SelectionView<'a> {
    project: &'a IfcProject,
    selection: &'a Selection,
}

impl HostSelection for SelectionView<'_> {
    type Element = Element;

    fn selected_elements(&self) -> Vec<&Element> {
        self.selection
            .ids
            .iter()
            .filter_map(|&id| self.project.element(id))
            .collect()
    }
}
