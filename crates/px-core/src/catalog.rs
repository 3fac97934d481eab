//! Ordered registry of named images.
//!
//! A catalog is filled once through a [`CatalogBuilder`] and then frozen
//! into an [`ImageCatalog`]. Insertion order is meaningful: entry 0 is the
//! original image that later derivations start from.
//!
//! The catalog never inspects how images are shown. A [`DisplaySink`] turns
//! each entry into an opaque handle when the catalog is presented.
//!
//! ```rust
//! use px_core::{CatalogBuilder, PixelBuffer};
//!
//! let mut builder = CatalogBuilder::new();
//! let a = builder.add("Original", PixelBuffer::new(2, 2).unwrap());
//! let b = builder.add("Copy", PixelBuffer::new(2, 2).unwrap());
//! assert_eq!((a, b), (0, 1));
//!
//! let catalog = builder.build();
//! assert_eq!(catalog.names().collect::<Vec<_>>(), ["Original", "Copy"]);
//! ```

use crate::{PixelBuffer, Result};
use tracing::debug;

/// A named image in a catalog.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    name: String,
    image: PixelBuffer,
}

impl CatalogEntry {
    /// Display name of the entry.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entry's pixels.
    #[inline]
    pub fn image(&self) -> &PixelBuffer {
        &self.image
    }
}

/// Append-only builder for an [`ImageCatalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    entries: Vec<CatalogEntry>,
}

impl CatalogBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, taking ownership of the image.
    ///
    /// Returns the zero-based index of the new entry.
    pub fn add(&mut self, name: impl Into<String>, image: PixelBuffer) -> usize {
        let name = name.into();
        debug!(index = self.entries.len(), name = %name, width = image.width(), height = image.height(), "catalog add");
        self.entries.push(CatalogEntry { name, image });
        self.entries.len() - 1
    }

    /// Returns an entry added earlier.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    /// Number of entries added so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freezes the builder into an immutable catalog.
    pub fn build(self) -> ImageCatalog {
        ImageCatalog {
            entries: self.entries,
        }
    }
}

/// Immutable, ordered collection of named images.
#[derive(Debug, Clone, Default)]
pub struct ImageCatalog {
    entries: Vec<CatalogEntry>,
}

impl ImageCatalog {
    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the catalog has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    /// The first entry, treated as the baseline image.
    #[inline]
    pub fn original(&self) -> Option<&CatalogEntry> {
        self.entries.first()
    }

    /// Looks up the first entry with the given name.
    pub fn find(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    /// Iterates entry names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Hands every entry to `sink` in insertion order.
    ///
    /// # Errors
    ///
    /// Stops at the first entry the sink fails on.
    pub fn present<S: DisplaySink>(&self, sink: &mut S) -> Result<Vec<Presented<S::Handle>>> {
        let mut presented = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let (width, height) = entry.image.dimensions();
            let handle = sink.upload(&entry.name, entry.image.pixels(), width, height)?;
            presented.push(Presented {
                name: entry.name.clone(),
                width,
                height,
                handle,
            });
        }
        Ok(presented)
    }
}

impl<'a> IntoIterator for &'a ImageCatalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Consumer that turns pixels into something displayable.
///
/// Implementations might upload a texture or write a file; the catalog
/// only stores whatever handle comes back.
pub trait DisplaySink {
    /// Opaque handle for later draw calls.
    type Handle;

    /// Produces a handle for `width * height` packed RGBA pixels.
    fn upload(&mut self, name: &str, pixels: &[u32], width: u32, height: u32) -> Result<Self::Handle>;
}

/// A catalog entry after it went through a [`DisplaySink`].
#[derive(Debug, Clone, PartialEq)]
pub struct Presented<H> {
    /// Entry name
    pub name: String,
    /// Image width
    pub width: u32,
    /// Image height
    pub height: u32,
    /// Handle returned by the sink
    pub handle: H,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct CountingSink {
        uploads: u32,
        fail_on: Option<&'static str>,
    }

    impl DisplaySink for CountingSink {
        type Handle = u32;

        fn upload(&mut self, name: &str, pixels: &[u32], width: u32, height: u32) -> Result<u32> {
            if self.fail_on == Some(name) {
                return Err(Error::display(name, "refused"));
            }
            assert_eq!(pixels.len(), (width * height) as usize);
            self.uploads += 1;
            Ok(self.uploads)
        }
    }

    fn img(w: u32, h: u32) -> PixelBuffer {
        PixelBuffer::new(w, h).unwrap()
    }

    #[test]
    fn test_add_returns_indices() {
        let mut builder = CatalogBuilder::new();
        assert!(builder.is_empty());
        assert_eq!(builder.add("Original", img(2, 2)), 0);
        assert_eq!(builder.add("Extract red", img(2, 2)), 1);
        assert_eq!(builder.len(), 2);

        let catalog = builder.build();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().name(), "Original");
        assert_eq!(catalog.get(1).unwrap().name(), "Extract red");
        assert_eq!(catalog.original().unwrap().name(), "Original");
    }

    #[test]
    fn test_builder_get_reads_earlier_entries() {
        let mut builder = CatalogBuilder::new();
        let idx = builder.add("Gray", img(3, 1));
        assert_eq!(builder.get(idx).unwrap().image().width(), 3);
        assert!(builder.get(idx + 1).is_none());
    }

    #[test]
    fn test_find_and_iter_order() {
        let mut builder = CatalogBuilder::new();
        for name in ["a", "b", "c"] {
            builder.add(name, img(1, 1));
        }
        let catalog = builder.build();
        assert!(catalog.find("b").is_some());
        assert!(catalog.find("z").is_none());
        let names: Vec<_> = (&catalog).into_iter().map(|e| e.name().to_string()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_present_in_order() {
        let mut builder = CatalogBuilder::new();
        builder.add("first", img(2, 1));
        builder.add("second", img(1, 3));
        let catalog = builder.build();

        let mut sink = CountingSink { uploads: 0, fail_on: None };
        let shown = catalog.present(&mut sink).unwrap();
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0], Presented { name: "first".into(), width: 2, height: 1, handle: 1 });
        assert_eq!(shown[1], Presented { name: "second".into(), width: 1, height: 3, handle: 2 });
    }

    #[test]
    fn test_present_propagates_sink_error() {
        let mut builder = CatalogBuilder::new();
        builder.add("ok", img(1, 1));
        builder.add("bad", img(1, 1));
        let catalog = builder.build();

        let mut sink = CountingSink { uploads: 0, fail_on: Some("bad") };
        let err = catalog.present(&mut sink).unwrap_err();
        assert!(matches!(err, Error::Display { .. }));
        assert_eq!(sink.uploads, 1);
    }
}
