//! Background tints that group table rows by source PDF.
//!
//! Purely cosmetic. The palette order is shuffled once per build from an
//! explicit seed; nothing else depends on which color a file gets.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashMap;

use crate::catalog::Catalog;
use crate::error::{Error, Result};

/// Light pastel backgrounds that keep black text readable
pub const DEFAULT_PALETTE: [&str; 5] = [
    "rgba(250, 245, 222, 0.5)",
    "rgba(243, 241, 248, 0.5)",
    "rgba(247, 248, 234, 0.5)",
    "rgba(239, 244, 241, 0.5)",
    "rgba(245, 237, 243, 0.5)",
];

/// A non-empty list of CSS colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette(Vec<String>);

#[allow(clippy::len_without_is_empty)] // never empty
impl Palette {
    /// Build from CSS color strings. Blank entries are dropped.
    pub fn new<I, S>(colors: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let colors: Vec<String> = colors
            .into_iter()
            .map(Into::into)
            .filter(|c| !c.trim().is_empty())
            .collect();

        if colors.is_empty() {
            return Err(Error::ConfigInvalid {
                field: "palette".to_string(),
                reason: "must contain at least one color".to_string(),
            });
        }
        Ok(Self(colors))
    }

    pub fn colors(&self) -> &[String] {
        &self.0
    }

    /// Number of colors, never zero
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(DEFAULT_PALETTE.iter().map(|c| (*c).to_string()).collect())
    }
}

/// `source_name` -> color, fixed for the lifetime of one catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorAssignment {
    colors: HashMap<String, String>,
}

impl ColorAssignment {
    /// Shuffle the palette with `seed`, then hand out colors to sources in
    /// catalog order, wrapping when there are more sources than colors.
    pub fn assign(palette: &Palette, catalog: &Catalog, seed: u64) -> Self {
        let mut shuffled = palette.colors().to_vec();
        shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

        let mut cycle = shuffled.iter().cycle();
        let mut colors = HashMap::new();
        for record in catalog {
            if colors.contains_key(record.source_name()) {
                continue;
            }
            if let Some(color) = cycle.next() {
                colors.insert(record.source_name().to_string(), color.clone());
            }
        }

        Self { colors }
    }

    /// Same as [`assign`](Self::assign) with a fresh random seed.
    pub fn assign_random(palette: &Palette, catalog: &Catalog) -> Self {
        Self::assign(palette, catalog, rand::random())
    }

    pub fn color_for(&self, source_name: &str) -> Option<&str> {
        self.colors.get(source_name).map(String::as_str)
    }

    /// Number of sources with a color
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogBuilder, UploadedFile};
    use crate::pdf::PageRasterizer;
    use image::RgbaImage;
    use std::collections::HashSet;

    struct Pages;

    impl PageRasterizer for Pages {
        fn rasterize(&self, pdf: &[u8]) -> crate::Result<Vec<RgbaImage>> {
            Ok(pdf.iter().map(|_| RgbaImage::new(1, 1)).collect())
        }
    }

    fn catalog(sources: &[(&str, usize)]) -> Catalog {
        let files: Vec<_> = sources
            .iter()
            .map(|(name, pages)| UploadedFile::new(*name, vec![0_u8; *pages]))
            .collect();
        CatalogBuilder::new(&Pages).build(&files).catalog
    }

    #[test]
    fn test_one_color_per_source() {
        let catalog = catalog(&[("a.pdf", 3), ("b.pdf", 1), ("c.pdf", 2)]);

        for seed in [0, 1, 42, u64::MAX] {
            let colors = ColorAssignment::assign(&Palette::default(), &catalog, seed);
            assert_eq!(colors.len(), 3);

            for record in &catalog {
                let color = colors.color_for(record.source_name()).unwrap();
                assert!(DEFAULT_PALETTE.iter().any(|c| *c == color));
            }

            // Up to palette size, every source gets its own tint
            let distinct: HashSet<_> = ["a.pdf", "b.pdf", "c.pdf"]
                .iter()
                .map(|s| colors.color_for(s).unwrap())
                .collect();
            assert_eq!(distinct.len(), 3);
        }
    }

    #[test]
    fn test_wraps_when_sources_outnumber_colors() {
        let catalog = catalog(&[("a.pdf", 1), ("b.pdf", 1), ("c.pdf", 1)]);
        let palette = Palette::new(["red", "blue"]).unwrap();

        let colors = ColorAssignment::assign(&palette, &catalog, 7);
        assert_eq!(colors.len(), 3);
        assert_eq!(colors.color_for("a.pdf"), colors.color_for("c.pdf"));
        assert_ne!(colors.color_for("a.pdf"), colors.color_for("b.pdf"));
    }

    #[test]
    fn test_same_seed_same_assignment() {
        let catalog = catalog(&[("a.pdf", 1), ("b.pdf", 1)]);
        let first = ColorAssignment::assign(&Palette::default(), &catalog, 99);
        let second = ColorAssignment::assign(&Palette::default(), &catalog, 99);
        assert_eq!(first, second);
    }

    #[test]
    fn test_random_assignment_keeps_invariant() {
        let catalog = catalog(&[("a.pdf", 2), ("b.pdf", 2)]);
        let colors = ColorAssignment::assign_random(&Palette::default(), &catalog);
        assert_eq!(colors.len(), catalog.source_count());
    }

    #[test]
    fn test_unknown_source_has_no_color() {
        let catalog = catalog(&[("a.pdf", 1)]);
        let colors = ColorAssignment::assign(&Palette::default(), &catalog, 0);
        assert!(colors.color_for("z.pdf").is_none());
    }

    #[test]
    fn test_empty_palette_is_rejected() {
        assert!(Palette::new(Vec::<String>::new()).is_err());
        assert!(Palette::new(["", "  "]).is_err());
    }

    #[test]
    fn test_blank_entries_are_dropped() {
        let palette = Palette::new(["red", " ", "blue"]).unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.colors(), ["red", "blue"]);
    }
}
