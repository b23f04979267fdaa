use std::sync::Arc;

use skill_core::model::{Class, ClassId};
use skill_core::wizard::{ClassSubmission, ClassWizard, SubmitTarget};

use crate::api::ClassApi;
use crate::error::{ApiError, AuthoringError};

/// Creates and edits classes through the four-step wizard.
#[derive(Clone)]
pub struct ClassAuthoringService {
    api: Arc<dyn ClassApi>,
}

impl ClassAuthoringService {
    #[must_use]
    pub fn new(api: Arc<dyn ClassApi>) -> Self {
        Self { api }
    }

    #[must_use]
    pub fn new_wizard(&self) -> ClassWizard {
        ClassWizard::create()
    }

    /// Open the wizard pre-filled with an existing class.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::Api` if the class cannot be fetched.
    pub async fn load_for_edit(&self, class_id: ClassId) -> Result<ClassWizard, AuthoringError> {
        let class = self.api.get_class(class_id).await?;
        Ok(ClassWizard::edit(&class))
    }

    /// Send a packaged submission as create (POST) or update (PUT).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the server rejects the class.
    pub async fn send(&self, submission: &ClassSubmission) -> Result<Class, ApiError> {
        let result = match submission.target {
            SubmitTarget::Create => self.api.create_class(submission).await,
            SubmitTarget::Update(class_id) => self.api.update_class(class_id, submission).await,
        };
        match &result {
            Ok(class) => tracing::info!(class_id = %class.id, target = ?submission.target, "class saved"),
            Err(err) => tracing::warn!(%err, target = ?submission.target, "class submission failed"),
        }
        result
    }

    /// Validate, send and record the outcome on the wizard.
    ///
    /// # Errors
    ///
    /// Returns `AuthoringError::Wizard` if the wizard is not ready to submit,
    /// or `AuthoringError::Api` if the server rejects the class; the
    /// wizard's banner carries the message in that case.
    pub async fn submit(&self, wizard: &mut ClassWizard) -> Result<ClassId, AuthoringError> {
        let submission = wizard.begin_submit()?;
        match self.send(&submission).await {
            Ok(class) => {
                wizard.finish_submit(Ok(class.id));
                Ok(class.id)
            }
            Err(err) => {
                wizard.finish_submit(Err(err.to_string()));
                Err(err.into())
            }
        }
    }
}
