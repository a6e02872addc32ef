//! Which pages go into the download.
//!
//! Flags are keyed by output name rather than table position, so filtering
//! or reordering the displayed rows cannot shift a flag onto another page.

use std::collections::HashMap;

use crate::catalog::{Catalog, PageRecord};
use crate::error::{Error, Result};

/// Default state of the global toggle when a catalog is built
pub const DEFAULT_SELECTED: bool = true;

/// Per-page selection flags plus one global toggle.
///
/// A page's flag is its override if one was set since the last
/// [`set_all`](Self::set_all), otherwise the global toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    all: bool,
    overrides: HashMap<String, bool>,
    /// Output names in catalog order, for validation and counting
    names: Vec<String>,
}

impl SelectionState {
    /// Fresh state for a catalog, with every page selected.
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            all: DEFAULT_SELECTED,
            overrides: HashMap::new(),
            names: catalog.iter().map(|r| r.output_name().to_string()).collect(),
        }
    }

    /// Set every page to `value`, discarding individual overrides.
    pub fn set_all(&mut self, value: bool) {
        self.all = value;
        self.overrides.clear();
    }

    /// Override a single page.
    pub fn set_one(&mut self, output_name: &str, value: bool) -> Result<()> {
        if !self.names.iter().any(|n| n == output_name) {
            return Err(Error::UnknownPage(output_name.to_string()));
        }

        if value == self.all {
            self.overrides.remove(output_name);
        } else {
            self.overrides.insert(output_name.to_string(), value);
        }
        Ok(())
    }

    /// Current state of the global toggle.
    pub const fn all_selected(&self) -> bool {
        self.all
    }

    pub fn is_selected(&self, output_name: &str) -> bool {
        self.overrides.get(output_name).copied().unwrap_or(self.all)
    }

    pub fn selected_count(&self) -> usize {
        self.names.iter().filter(|n| self.is_selected(n)).count()
    }

    /// Selected records in catalog order.
    pub fn selected_records<'a>(&self, catalog: &'a Catalog) -> Vec<&'a PageRecord> {
        catalog
            .iter()
            .filter(|r| self.is_selected(r.output_name()))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogBuilder, UploadedFile};
    use crate::pdf::PageRasterizer;
    use image::RgbaImage;

    struct Pages;

    impl PageRasterizer for Pages {
        fn rasterize(&self, pdf: &[u8]) -> Result<Vec<RgbaImage>> {
            Ok(pdf.iter().map(|_| RgbaImage::new(1, 1)).collect())
        }
    }

    /// a.pdf with 3 pages, b.pdf with 1
    fn catalog() -> Catalog {
        let files = [
            UploadedFile::new("a.pdf", vec![0_u8; 3]),
            UploadedFile::new("b.pdf", vec![0_u8; 1]),
        ];
        CatalogBuilder::new(&Pages).build(&files).catalog
    }

    fn selected_names(state: &SelectionState, catalog: &Catalog) -> Vec<String> {
        state
            .selected_records(catalog)
            .into_iter()
            .map(|r| r.output_name().to_string())
            .collect()
    }

    #[test]
    fn test_everything_selected_by_default() {
        let catalog = catalog();
        let state = SelectionState::new(&catalog);

        assert!(state.all_selected());
        assert_eq!(state.selected_count(), 4);
        assert_eq!(state.selected_records(&catalog).len(), catalog.len());
    }

    #[test]
    fn test_set_all() {
        let catalog = catalog();
        let mut state = SelectionState::new(&catalog);

        state.set_all(false);
        assert!(state.selected_records(&catalog).is_empty());

        state.set_all(true);
        let all: Vec<_> = catalog.iter().map(|r| r.output_name().to_string()).collect();
        assert_eq!(selected_names(&state, &catalog), all);
    }

    #[test]
    fn test_set_one_preserves_order_and_others() {
        let catalog = catalog();
        let mut state = SelectionState::new(&catalog);

        state.set_one("a_page_2.png", false).unwrap();
        assert_eq!(
            selected_names(&state, &catalog),
            ["a_page_1.png", "a_page_3.png", "b_page_1.png"]
        );
        assert_eq!(state.selected_count(), 3);
    }

    #[test]
    fn test_overrides_survive_until_set_all() {
        let catalog = catalog();
        let mut state = SelectionState::new(&catalog);

        state.set_all(false);
        state.set_one("b_page_1.png", true).unwrap();
        assert_eq!(selected_names(&state, &catalog), ["b_page_1.png"]);
        assert!(!state.all_selected());

        state.set_all(false);
        assert!(!state.is_selected("b_page_1.png"));
    }

    #[test]
    fn test_unknown_page_is_rejected() {
        let catalog = catalog();
        let mut state = SelectionState::new(&catalog);

        let err = state.set_one("c_page_1.png", false).unwrap_err();
        assert!(matches!(err, Error::UnknownPage(ref n) if n == "c_page_1.png"));
        assert_eq!(state.selected_count(), 4);
    }

    #[test]
    fn test_rebuild_resets_flags() {
        let catalog = catalog();
        let mut state = SelectionState::new(&catalog);
        state.set_one("a_page_1.png", false).unwrap();

        let rebuilt = SelectionState::new(&catalog);
        assert!(rebuilt.is_selected("a_page_1.png"));
    }
}
