//! Four-step class authoring wizard.
//!
//! Create and edit share the same steps and validation; they differ only in
//! where the draft comes from and which request the submission targets.

use thiserror::Error;
use url::Url;

use crate::model::{Class, ClassId, ClassPayload, Section};
use crate::validation::{FieldError, FormField, is_valid_email};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WizardStep {
    BasicInfo,
    Thumbnail,
    Requirements,
    Sections,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        Self::BasicInfo,
        Self::Thumbnail,
        Self::Requirements,
        Self::Sections,
    ];

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic info",
            Self::Thumbnail => "Thumbnail",
            Self::Requirements => "Requirements",
            Self::Sections => "Sections",
        }
    }

    /// Zero-based position in the wizard.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::BasicInfo => 0,
            Self::Thumbnail => 1,
            Self::Requirements => 2,
            Self::Sections => 3,
        }
    }

    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    #[must_use]
    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    #[must_use]
    pub fn is_last(self) -> bool {
        self.next().is_none()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WizardError {
    #[error("please fix the highlighted fields")]
    Invalid {
        step: WizardStep,
        errors: Vec<FieldError>,
    },

    #[error("already on the last step")]
    AtLastStep,

    #[error("the class can only be submitted from the last step")]
    NotOnLastStep,

    #[error("a submission is already in progress")]
    AlreadySubmitting,
}

/// An image picked for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

/// Editable section row of the draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionDraft {
    pub title: String,
    pub description: String,
}

/// Accumulated form state across all steps. Fields hold raw input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub level: String,
    pub duration_minutes: String,
    pub contact_email: String,
    pub existing_thumbnail: Option<String>,
    pub thumbnail: Option<ImageUpload>,
    pub requirements: Vec<String>,
    pub sections: Vec<SectionDraft>,
}

/// An absolute URL, or a path the API serves relative to its own origin.
fn is_usable_thumbnail(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    value.starts_with('/') || Url::parse(value).is_ok()
}

impl ClassDraft {
    /// Pre-populate from a fetched class for edit mode.
    #[must_use]
    pub fn from_class(class: &Class) -> Self {
        Self {
            title: class.title.clone(),
            description: class.description.clone(),
            category: class.category.clone().unwrap_or_default(),
            level: class.level.clone().unwrap_or_default(),
            duration_minutes: class
                .duration_minutes
                .map(|minutes| minutes.to_string())
                .unwrap_or_default(),
            contact_email: class.contact_email.clone().unwrap_or_default(),
            existing_thumbnail: class.thumbnail_url.clone(),
            thumbnail: None,
            requirements: class.requirements.clone(),
            sections: class
                .sections
                .iter()
                .map(|section| SectionDraft {
                    title: section.title.clone(),
                    description: section.description.clone(),
                })
                .collect(),
        }
    }

    /// Validate the fields owned by `step`.
    ///
    /// # Errors
    ///
    /// Returns the field errors of that step.
    pub fn validate_step(&self, step: WizardStep) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        match step {
            WizardStep::BasicInfo => self.check_basic_info(&mut errors),
            WizardStep::Thumbnail => self.check_thumbnail(&mut errors),
            WizardStep::Requirements => self.check_requirements(&mut errors),
            WizardStep::Sections => self.check_sections(&mut errors),
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    fn check_basic_info(&self, errors: &mut Vec<FieldError>) {
        let required = [
            (FormField::Title, "Title", &self.title),
            (FormField::Description, "Description", &self.description),
            (FormField::Category, "Category", &self.category),
            (FormField::Level, "Level", &self.level),
        ];
        for (field, label, value) in required {
            if value.trim().is_empty() {
                errors.push(FieldError::required(field, label));
            }
        }

        let duration = self.duration_minutes.trim();
        if !duration.is_empty() && !matches!(duration.parse::<u32>(), Ok(minutes) if minutes > 0) {
            errors.push(FieldError::new(
                FormField::Duration,
                "Duration must be a positive number of minutes",
            ));
        }

        let email = self.contact_email.trim();
        if email.is_empty() {
            errors.push(FieldError::required(FormField::ContactEmail, "Contact email"));
        } else if !is_valid_email(email) {
            errors.push(FieldError::new(
                FormField::ContactEmail,
                "Enter a valid email address",
            ));
        }
    }

    fn check_thumbnail(&self, errors: &mut Vec<FieldError>) {
        match (&self.thumbnail, &self.existing_thumbnail) {
            (Some(upload), _) if !upload.is_image() => errors.push(FieldError::new(
                FormField::Thumbnail,
                "Thumbnail must be an image",
            )),
            (Some(_), _) => {}
            (None, Some(existing)) if !existing.trim().is_empty() => {
                if !is_usable_thumbnail(existing.trim()) {
                    errors.push(FieldError::new(
                        FormField::Thumbnail,
                        "The current thumbnail address is invalid; upload a new image",
                    ));
                }
            }
            (None, _) => errors.push(FieldError::required(FormField::Thumbnail, "Thumbnail")),
        }
    }

    fn check_requirements(&self, errors: &mut Vec<FieldError>) {
        if self.requirements.is_empty() {
            errors.push(FieldError::new(
                FormField::Requirements,
                "Add at least one requirement",
            ));
        }
        for (i, requirement) in self.requirements.iter().enumerate() {
            if requirement.trim().is_empty() {
                errors.push(FieldError::new(
                    FormField::Requirement(i),
                    "Requirement cannot be empty",
                ));
            }
        }
    }

    fn check_sections(&self, errors: &mut Vec<FieldError>) {
        if self.sections.is_empty() {
            errors.push(FieldError::new(FormField::Sections, "Add at least one section"));
        }
        for (i, section) in self.sections.iter().enumerate() {
            if section.title.trim().is_empty() {
                errors.push(FieldError::new(
                    FormField::SectionTitle(i),
                    "Section title is required",
                ));
            }
        }
    }

    fn to_payload(&self) -> ClassPayload {
        ClassPayload {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            level: self.level.trim().to_string(),
            duration_minutes: self.duration_minutes.trim().parse().ok(),
            contact_email: self.contact_email.trim().to_string(),
            requirements: self
                .requirements
                .iter()
                .map(|r| r.trim().to_string())
                .collect(),
            sections: self
                .sections
                .iter()
                .map(|s| Section {
                    title: s.title.trim().to_string(),
                    description: s.description.trim().to_string(),
                })
                .collect(),
            thumbnail_url: if self.thumbnail.is_some() {
                None
            } else {
                self.existing_thumbnail.clone()
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTarget {
    Create,
    Update(ClassId),
}

/// Everything needed for the multipart create/update request.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSubmission {
    pub target: SubmitTarget,
    pub class_data: ClassPayload,
    pub thumbnail: Option<ImageUpload>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassWizard {
    target: SubmitTarget,
    step: WizardStep,
    draft: ClassDraft,
    errors: Vec<FieldError>,
    submitting: bool,
    banner: Option<String>,
    saved: Option<ClassId>,
}

impl ClassWizard {
    #[must_use]
    pub fn create() -> Self {
        Self::with_draft(SubmitTarget::Create, ClassDraft::default())
    }

    #[must_use]
    pub fn edit(class: &Class) -> Self {
        Self::with_draft(SubmitTarget::Update(class.id), ClassDraft::from_class(class))
    }

    fn with_draft(target: SubmitTarget, draft: ClassDraft) -> Self {
        Self {
            target,
            step: WizardStep::BasicInfo,
            draft,
            errors: Vec::new(),
            submitting: false,
            banner: None,
            saved: None,
        }
    }

    #[must_use]
    pub fn target(&self) -> SubmitTarget {
        self.target
    }

    #[must_use]
    pub fn is_edit(&self) -> bool {
        matches!(self.target, SubmitTarget::Update(_))
    }

    #[must_use]
    pub fn step(&self) -> WizardStep {
        self.step
    }

    #[must_use]
    pub fn draft(&self) -> &ClassDraft {
        &self.draft
    }

    /// Mutable access for form bindings.
    pub fn draft_mut(&mut self) -> &mut ClassDraft {
        &mut self.draft
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Id of the saved class once the submission succeeded.
    #[must_use]
    pub fn saved(&self) -> Option<ClassId> {
        self.saved
    }

    /// Whether "Next" is enabled for the current step.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        !self.step.is_last() && self.draft.validate_step(self.step).is_ok()
    }

    /// Move forward if the current step validates.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::Invalid` (staying on the step) or
    /// `WizardError::AtLastStep`.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let Some(next) = self.step.next() else {
            return Err(WizardError::AtLastStep);
        };
        if let Err(errors) = self.draft.validate_step(self.step) {
            self.errors.clone_from(&errors);
            return Err(WizardError::Invalid {
                step: self.step,
                errors,
            });
        }
        self.errors.clear();
        self.step = next;
        Ok(next)
    }

    /// Move back without validating. Stays put on the first step.
    pub fn back(&mut self) -> WizardStep {
        if let Some(prev) = self.step.previous() {
            self.step = prev;
            self.errors.clear();
        }
        self.step
    }

    /// Validate every step and package the submission.
    ///
    /// On success the wizard is marked as submitting until
    /// [`ClassWizard::finish_submit`] is called. If an earlier step is
    /// invalid the wizard stays on the last step with that step's errors.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::NotOnLastStep`, `WizardError::AlreadySubmitting`,
    /// or `WizardError::Invalid`.
    pub fn begin_submit(&mut self) -> Result<ClassSubmission, WizardError> {
        if !self.step.is_last() {
            return Err(WizardError::NotOnLastStep);
        }
        if self.submitting {
            return Err(WizardError::AlreadySubmitting);
        }
        for step in WizardStep::ALL {
            if let Err(errors) = self.draft.validate_step(step) {
                self.errors.clone_from(&errors);
                return Err(WizardError::Invalid { step, errors });
            }
        }
        self.errors.clear();
        self.banner = None;
        self.submitting = true;
        Ok(ClassSubmission {
            target: self.target,
            class_data: self.draft.to_payload(),
            thumbnail: self.draft.thumbnail.clone(),
        })
    }

    /// Record the outcome of the request started by `begin_submit`.
    pub fn finish_submit(&mut self, outcome: Result<ClassId, String>) {
        self.submitting = false;
        match outcome {
            Ok(id) => {
                self.saved = Some(id);
                self.banner = None;
                if let SubmitTarget::Create = self.target {
                    self.target = SubmitTarget::Update(id);
                }
            }
            Err(message) => {
                self.banner = Some(message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ClassDraft {
        ClassDraft {
            title: "Sourdough".into(),
            description: "Bake bread at home".into(),
            category: "Cooking".into(),
            level: "Beginner".into(),
            duration_minutes: "90".into(),
            contact_email: "baker@example.com".into(),
            existing_thumbnail: None,
            thumbnail: Some(ImageUpload {
                file_name: "loaf.png".into(),
                content_type: "image/png".into(),
                bytes: vec![1, 2, 3],
            }),
            requirements: vec!["Flour".into(), "Oven".into()],
            sections: vec![SectionDraft {
                title: "Starter".into(),
                description: "Feeding schedule".into(),
            }],
        }
    }

    fn wizard_at_last_step() -> ClassWizard {
        let mut wizard = ClassWizard::create();
        *wizard.draft_mut() = filled();
        while !wizard.step().is_last() {
            wizard.next().unwrap();
        }
        wizard
    }

    #[test]
    fn next_is_blocked_until_basic_info_is_valid() {
        let mut wizard = ClassWizard::create();
        assert!(!wizard.can_advance());
        let err = wizard.next().unwrap_err();
        assert!(matches!(err, WizardError::Invalid { step: WizardStep::BasicInfo, .. }));
        assert_eq!(wizard.step(), WizardStep::BasicInfo);
        assert_eq!(wizard.errors().len(), 5);

        let draft = wizard.draft_mut();
        draft.title = "Sourdough".into();
        draft.description = "Bread".into();
        draft.category = "Cooking".into();
        draft.level = "Beginner".into();
        draft.contact_email = "baker@example".into();
        let err = wizard.next().unwrap_err();
        let WizardError::Invalid { errors, .. } = err else {
            panic!("expected invalid");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, FormField::ContactEmail);

        wizard.draft_mut().contact_email = "baker@example.com".into();
        assert_eq!(wizard.next(), Ok(WizardStep::Thumbnail));
        assert!(wizard.errors().is_empty());
    }

    #[test]
    fn back_never_validates() {
        let mut wizard = wizard_at_last_step();
        wizard.draft_mut().title.clear();
        assert_eq!(wizard.back(), WizardStep::Requirements);
        assert_eq!(wizard.back(), WizardStep::Thumbnail);
        assert_eq!(wizard.back(), WizardStep::BasicInfo);
        assert_eq!(wizard.back(), WizardStep::BasicInfo);
    }

    #[test]
    fn thumbnail_must_be_an_image_or_existing_url() {
        let mut draft = filled();
        draft.thumbnail = Some(ImageUpload {
            file_name: "notes.pdf".into(),
            content_type: "application/pdf".into(),
            bytes: vec![],
        });
        assert!(draft.validate_step(WizardStep::Thumbnail).is_err());

        draft.thumbnail = None;
        assert!(draft.validate_step(WizardStep::Thumbnail).is_err());

        draft.existing_thumbnail = Some("https://cdn.example.com/t.jpg".into());
        assert!(draft.validate_step(WizardStep::Thumbnail).is_ok());
    }

    #[test]
    fn blank_requirement_and_section_titles_are_flagged_by_index() {
        let mut draft = filled();
        draft.requirements.push("  ".into());
        draft.sections.push(SectionDraft::default());
        let req = draft.validate_step(WizardStep::Requirements).unwrap_err();
        assert_eq!(req[0].field, FormField::Requirement(2));
        let sec = draft.validate_step(WizardStep::Sections).unwrap_err();
        assert_eq!(sec[0].field, FormField::SectionTitle(1));
    }

    #[test]
    fn submit_packages_draft_and_blocks_double_submit() {
        let mut wizard = wizard_at_last_step();
        let submission = wizard.begin_submit().unwrap();
        assert_eq!(submission.target, SubmitTarget::Create);
        assert_eq!(submission.class_data.duration_minutes, Some(90));
        assert_eq!(submission.class_data.requirements, vec!["Flour", "Oven"]);
        assert!(submission.thumbnail.is_some());
        assert!(wizard.is_submitting());
        assert_eq!(wizard.begin_submit(), Err(WizardError::AlreadySubmitting));

        wizard.finish_submit(Ok(ClassId::new(8)));
        assert_eq!(wizard.saved(), Some(ClassId::new(8)));
        assert!(!wizard.is_submitting());
    }

    #[test]
    fn failed_submit_keeps_last_step_with_banner() {
        let mut wizard = wizard_at_last_step();
        wizard.begin_submit().unwrap();
        wizard.finish_submit(Err("Server unavailable".into()));
        assert_eq!(wizard.step(), WizardStep::Sections);
        assert_eq!(wizard.banner(), Some("Server unavailable"));
        assert!(!wizard.is_submitting());
        assert!(wizard.begin_submit().is_ok());
    }

    #[test]
    fn submit_only_from_last_step() {
        let mut wizard = ClassWizard::create();
        *wizard.draft_mut() = filled();
        assert_eq!(wizard.begin_submit(), Err(WizardError::NotOnLastStep));
    }

    #[test]
    fn edit_mode_prefills_and_keeps_existing_thumbnail() {
        let class = Class {
            id: ClassId::new(4),
            title: "Watercolor".into(),
            description: "Loose florals".into(),
            thumbnail_url: Some("https://cdn.example.com/w.jpg".into()),
            category: Some("Art".into()),
            level: Some("Intermediate".into()),
            duration_minutes: Some(60),
            requirements: vec!["Brushes".into()],
            sections: vec![Section {
                title: "Washes".into(),
                description: String::new(),
            }],
            instructor_name: None,
            contact_email: Some("painter@example.com".into()),
            average_rating: None,
            enrolled: false,
        };
        let mut wizard = ClassWizard::edit(&class);
        assert!(wizard.is_edit());
        assert_eq!(wizard.draft().duration_minutes, "60");
        while !wizard.step().is_last() {
            wizard.next().unwrap();
        }
        let submission = wizard.begin_submit().unwrap();
        assert_eq!(submission.target, SubmitTarget::Update(ClassId::new(4)));
        assert_eq!(
            submission.class_data.thumbnail_url.as_deref(),
            Some("https://cdn.example.com/w.jpg")
        );
        assert!(submission.thumbnail.is_none());
    }

    #[test]
    fn edit_mode_accepts_server_relative_thumbnail() {
        let class: Class = serde_json::from_value(serde_json::json!({
            "id": 7,
            "title": "Ink sketching",
            "description": "Quick line studies",
            "thumbnailUrl": "/uploads/thumbs/7.png",
            "category": "Art",
            "level": "Beginner",
            "requirements": ["A fineliner"],
            "sections": [{ "title": "Lines" }],
            "contactEmail": "ink@example.com"
        }))
        .unwrap();
        let mut wizard = ClassWizard::edit(&class);
        assert_eq!(wizard.next(), Ok(WizardStep::Thumbnail));
        assert_eq!(wizard.next(), Ok(WizardStep::Requirements));
        while !wizard.step().is_last() {
            wizard.next().unwrap();
        }
        let submission = wizard.begin_submit().unwrap();
        assert_eq!(
            submission.class_data.thumbnail_url.as_deref(),
            Some("/uploads/thumbs/7.png")
        );
    }

    #[test]
    fn unusable_existing_thumbnail_is_reported_apart_from_missing() {
        let mut draft = filled();
        draft.thumbnail = None;

        draft.existing_thumbnail = Some("not a url".into());
        let errors = draft.validate_step(WizardStep::Thumbnail).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, FormField::Thumbnail);
        assert_eq!(
            errors[0].message,
            "The current thumbnail address is invalid; upload a new image"
        );

        draft.existing_thumbnail = Some("  ".into());
        let errors = draft.validate_step(WizardStep::Thumbnail).unwrap_err();
        assert_eq!(errors[0].message, "Thumbnail is required");
    }
}
