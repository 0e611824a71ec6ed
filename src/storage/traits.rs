use crate::error::Result;
use crate::models::CityDocument;
use async_trait::async_trait;

/// Durable home of the city document.
///
/// Implementations always read and write the whole document; `save` either
/// replaces the stored copy completely or fails without touching it.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Read the current document
    async fn load(&self) -> Result<CityDocument>;

    /// Replace the stored document
    async fn save(&self, document: &CityDocument) -> Result<()>;

    /// Short name used in logs
    fn backend_name(&self) -> &'static str;
}
