use std::sync::Arc;

use skill_core::model::{Class, ClassId};

use crate::api::ClassApi;
use crate::error::ApiError;

/// Browsing and enrollment.
#[derive(Clone)]
pub struct CatalogService {
    api: Arc<dyn ClassApi>,
}

impl CatalogService {
    #[must_use]
    pub fn new(api: Arc<dyn ClassApi>) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport or server failures.
    pub async fn list_classes(&self) -> Result<Vec<Class>, ApiError> {
        self.api.list_classes().await
    }

    /// # Errors
    ///
    /// Returns `ApiError` on transport or server failures.
    pub async fn get_class(&self, class_id: ClassId) -> Result<Class, ApiError> {
        self.api.get_class(class_id).await
    }

    /// Enroll and return the refreshed class.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotSignedIn` without a session, otherwise
    /// `ApiError` on transport or server failures.
    pub async fn enroll(&self, class_id: ClassId) -> Result<Class, ApiError> {
        self.api.enroll(class_id).await.inspect_err(|err| {
            tracing::warn!(%class_id, %err, "enrollment failed");
        })?;
        tracing::info!(%class_id, "enrolled");
        self.api.get_class(class_id).await
    }
}
