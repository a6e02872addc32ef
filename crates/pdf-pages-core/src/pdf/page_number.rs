//! 1-based page numbers and their conversion to mupdf's 0-based `i32` index.
//!
//! Page records, filenames and the UI all count pages from 1. mupdf counts
//! from 0 with an `i32`. This newtype keeps the two from being mixed up.

use std::fmt;
use std::num::NonZeroU32;

use crate::error::Error;

/// A 1-based page number within a single PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageNumber(NonZeroU32);

impl PageNumber {
    /// The first page of a document.
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Build from a 1-based number. Returns `None` for 0.
    #[must_use]
    pub fn new(number: u32) -> Option<Self> {
        NonZeroU32::new(number).map(Self)
    }

    /// Build from a 0-based position, validating it against the page count.
    pub fn from_zero_based(index: usize, total_pages: usize) -> Result<Self, Error> {
        let invalid = || Error::InvalidPage {
            page: index,
            total: total_pages,
        };

        if index >= total_pages {
            return Err(invalid());
        }

        let number = u32::try_from(index)
            .ok()
            .and_then(|i| i.checked_add(1))
            .and_then(NonZeroU32::new)
            .ok_or_else(invalid)?;

        Ok(Self(number))
    }

    /// The 1-based number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// The page after this one.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// 0-based index in the form mupdf's `load_page` expects.
    pub fn to_mupdf_index(self) -> Result<i32, Error> {
        i32::try_from(self.get() - 1).map_err(|_| Error::InvalidPage {
            page: self.get() as usize,
            total: 0,
        })
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
