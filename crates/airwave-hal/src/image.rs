//! Image lookup
//!
//! Station logos and album art are referenced from program metadata by a
//! numeric id. The bytes live in an [`ImageStore`] owned by the caller.

use std::collections::HashMap;

/// Image id meaning "no image"
pub const INVALID_IMAGE: u32 = 0;

/// Source of image bytes, keyed by image id
pub trait ImageStore: Send + Sync {
    /// Bytes of the image, or `None` if the id is unknown
    fn image(&self, id: u32) -> Option<Vec<u8>>;
}

/// Image store held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryImageStore {
    images: HashMap<u32, Vec<u8>>,
}

impl MemoryImageStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register image bytes under an id, returning the previous bytes
    ///
    /// Inserting under [`INVALID_IMAGE`] is ignored.
    pub fn insert(&mut self, id: u32, bytes: Vec<u8>) -> Option<Vec<u8>> {
        if id == INVALID_IMAGE {
            return None;
        }
        self.images.insert(id, bytes)
    }

    /// Number of stored images
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the store holds no images
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageStore for MemoryImageStore {
    fn image(&self, id: u32) -> Option<Vec<u8>> {
        self.images.get(&id).cloned()
    }
}
