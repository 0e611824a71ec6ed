use crate::error::Result;
use crate::models::CityDocument;
use crate::storage::traits::DocumentRepository;
use async_trait::async_trait;
use std::sync::Mutex;

/// Repository that keeps the document in process memory.
///
/// Every `load` hands out a clone so callers never share the stored copy.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    document: Mutex<CityDocument>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: CityDocument) -> Self {
        Self {
            document: Mutex::new(document),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CityDocument> {
        // A poisoned lock still holds a complete document since save swaps it in one step
        self.document.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DocumentRepository for MemoryRepository {
    async fn load(&self) -> Result<CityDocument> {
        Ok(self.lock().clone())
    }

    async fn save(&self, document: &CityDocument) -> Result<()> {
        *self.lock() = document.clone();
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
