use std::collections::BTreeSet;

/// Set of models chosen for the next submission
///
/// Always a subset of the catalog it was built from; order is irrelevant and
/// an empty set is valid (it just disables submission).
#[derive(Debug, Clone)]
pub struct SelectionSet {
    catalog: Vec<String>,
    selected: BTreeSet<String>,
}

impl SelectionSet {
    pub fn new(catalog: &[String]) -> Self {
        Self {
            catalog: catalog.to_vec(),
            selected: BTreeSet::new(),
        }
    }

    /// Add or remove one model. Idempotent. Returns false (and changes
    /// nothing) for a model the catalog does not know.
    pub fn toggle(&mut self, model: &str, included: bool) -> bool {
        if !self.catalog.iter().any(|m| m == model) {
            return false;
        }
        if included {
            self.selected.insert(model.to_string());
        } else {
            self.selected.remove(model);
        }
        true
    }

    /// Select every model in the catalog
    pub fn select_all(&mut self) {
        self.selected = self.catalog.iter().cloned().collect();
    }

    /// Empty the selection
    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Selected models as an owned list
    pub fn models(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<String> {
        vec!["rembg".to_string(), "bria".to_string(), "u2net".to_string()]
    }

    #[test]
    fn toggle_adds_and_removes() {
        let mut selection = SelectionSet::new(&catalog());

        assert!(selection.toggle("rembg", true));
        assert_eq!(selection.models(), ["rembg"]);

        assert!(selection.toggle("rembg", false));
        assert!(selection.is_empty());
    }

    #[test]
    fn toggle_is_idempotent() {
        let mut selection = SelectionSet::new(&catalog());

        selection.toggle("bria", true);
        selection.toggle("bria", true);
        assert_eq!(selection.len(), 1);

        selection.toggle("bria", false);
        selection.toggle("bria", false);
        assert!(selection.is_empty());
    }

    #[test]
    fn toggle_rejects_unknown_model() {
        let mut selection = SelectionSet::new(&catalog());

        assert!(!selection.toggle("sam", true));
        assert!(selection.is_empty());
    }

    #[test]
    fn select_all_matches_catalog() {
        let mut selection = SelectionSet::new(&catalog());

        selection.select_all();

        let mut expected = catalog();
        expected.sort();
        assert_eq!(selection.models(), expected);
    }

    #[test]
    fn select_all_then_none_is_empty() {
        let mut selection = SelectionSet::new(&catalog());

        selection.select_all();
        selection.select_none();

        assert!(selection.is_empty());
        assert_eq!(selection.len(), 0);
    }

    #[test]
    fn empty_catalog_selects_nothing() {
        let mut selection = SelectionSet::new(&[]);

        selection.select_all();
        assert!(selection.is_empty());
        assert!(!selection.toggle("rembg", true));
    }
}
