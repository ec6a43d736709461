//! The add-school flow.
//!
//! [`AddSchoolForm`] holds the form's input, inline field errors, image
//! preview and submission state. A submission moves through
//! `Idle -> Submitting -> Success | Failure`; invalid input never leaves
//! `Idle` and never touches the store.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::FormConfig;
use crate::error::Error;
use crate::image::ImagePreview;
use crate::school::{next_id, SchoolInput, SchoolRecord};
use crate::storage::RecordStore;
use crate::validation::{validate, Field, FieldErrors, Schema};

/// Where the form is in its submission cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    /// Accepting input.
    #[default]
    Idle,
    /// A submission is being written; the submit control is disabled.
    Submitting,
    /// The last submission was stored.
    Success,
    /// The last submission could not be stored.
    Failure,
}

/// Visual style of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastVariant {
    /// Neutral confirmation.
    #[default]
    Default,
    /// Something went wrong.
    Destructive,
}

/// A transient message shown after a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Short heading.
    pub title: &'static str,
    /// One-line explanation.
    pub description: &'static str,
    /// Visual style.
    pub variant: ToastVariant,
}

impl Notification {
    /// Shown after a school is stored.
    #[must_use]
    pub const fn added() -> Self {
        Self {
            title: "Success!",
            description: "School has been added successfully.",
            variant: ToastVariant::Default,
        }
    }

    /// Shown when storing a school fails.
    #[must_use]
    pub const fn failed() -> Self {
        Self {
            title: "Error",
            description: "Failed to add school. Please try again.",
            variant: ToastVariant::Destructive,
        }
    }
}

/// Result of one submit attempt.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was written.
    Invalid(FieldErrors),
    /// The record was appended and stored.
    Added(SchoolRecord),
    /// The store could not be read or written; nothing was stored.
    Failed(Error),
}

/// State of the add-school form.
#[derive(Debug)]
pub struct AddSchoolForm {
    input: SchoolInput,
    errors: FieldErrors,
    preview: ImagePreview,
    state: FormState,
    notification: Option<Notification>,
    placeholder_image: String,
}

impl Default for AddSchoolForm {
    fn default() -> Self {
        Self::new(&FormConfig::default())
    }
}

impl AddSchoolForm {
    /// Create an empty form.
    #[must_use]
    pub fn new(config: &FormConfig) -> Self {
        Self {
            input: SchoolInput::default(),
            errors: FieldErrors::default(),
            preview: ImagePreview::new(config.max_image_bytes),
            state: FormState::Idle,
            notification: None,
            placeholder_image: config.placeholder_image.clone(),
        }
    }

    /// Create a form pre-filled with `input`, starting a read of its image if set.
    ///
    /// # Panics
    ///
    /// Panics if `input.image` is set and this is called outside a Tokio runtime.
    #[must_use]
    pub fn with_input(config: &FormConfig, input: SchoolInput) -> Self {
        let mut form = Self::new(config);
        let image = input.image.clone();
        form.input = input;
        if let Some(path) = image {
            form.select_image(path);
        }
        form
    }

    /// Set a text field. Any error shown for that field is cleared.
    ///
    /// The image field is set with [`Self::select_image`]; passing
    /// [`Field::Image`] here does nothing.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        let slot = match field {
            Field::Name => &mut self.input.name,
            Field::City => &mut self.input.city,
            Field::Address => &mut self.input.address,
            Field::State => &mut self.input.state,
            Field::Contact => &mut self.input.contact,
            Field::EmailId => &mut self.input.email_id,
            Field::Image => return,
        };
        *slot = value;
        self.errors.clear(field);
    }

    /// Choose an image file and start reading it for the preview.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn select_image(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.input.image = Some(path.clone());
        self.preview.select(path);
    }

    /// Re-check one field, e.g. when it loses focus.
    pub fn touch(&mut self, field: Field) {
        match Schema::school().check_field(field, &self.input) {
            Some(message) => self.errors.insert(field, message),
            None => self.errors.clear(field),
        }
    }

    /// Current input.
    #[must_use]
    pub fn input(&self) -> &SchoolInput {
        &self.input
    }

    /// Inline errors from the last validation.
    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Image preview state.
    #[must_use]
    pub fn preview(&self) -> &ImagePreview {
        &self.preview
    }

    /// Current submission state.
    #[must_use]
    pub fn state(&self) -> FormState {
        self.state
    }

    /// Whether the submit control is enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.state != FormState::Submitting
    }

    /// Caption for the submit control.
    #[must_use]
    pub fn submit_label(&self) -> &'static str {
        if self.state == FormState::Submitting {
            "Adding School..."
        } else {
            "Add School"
        }
    }

    /// The notification from the last submission, if not yet acknowledged.
    #[must_use]
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Dismiss the notification and return to `Idle`.
    pub fn acknowledge(&mut self) {
        self.notification = None;
        if matches!(self.state, FormState::Success | FormState::Failure) {
            self.state = FormState::Idle;
        }
    }

    /// Clear all input, errors and the image preview. The store is untouched.
    pub fn reset(&mut self) {
        self.input = SchoolInput::default();
        self.errors = FieldErrors::default();
        self.preview.clear();
    }

    /// Validate and, if valid, append the school to `store`.
    ///
    /// Waits for any in-flight image read first, so the stored record always
    /// reflects the latest selection. On success the form is reset; on a
    /// storage failure the input is kept so the user can retry.
    pub async fn submit(&mut self, store: &dyn RecordStore) -> SubmitOutcome {
        self.acknowledge();

        let valid = match validate(&self.input) {
            Ok(valid) => valid,
            Err(errors) => {
                self.errors = errors.clone();
                return SubmitOutcome::Invalid(errors);
            }
        };
        self.errors = FieldErrors::default();
        self.state = FormState::Submitting;

        let image = self
            .preview
            .settle()
            .await
            .map_or_else(|| self.placeholder_image.clone(), str::to_string);

        let mut records = match store.try_load() {
            Ok(records) => records,
            Err(e) => return self.fail(e),
        };
        let record = valid.into_record(next_id(&records), image);
        records.push(record.clone());

        match store.save(&records) {
            Ok(()) => {
                info!(id = record.id, name = %record.name, "School added");
                self.state = FormState::Success;
                self.notification = Some(Notification::added());
                self.reset();
                SubmitOutcome::Added(record)
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, error: Error) -> SubmitOutcome {
        warn!(error = %error, "Failed to store school");
        self.state = FormState::Failure;
        self.notification = Some(Notification::failed());
        SubmitOutcome::Failed(error)
    }
}
