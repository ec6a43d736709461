//! `schoolbook` - Register and browse school records
//!
//! This library provides a validated add-school form, a searchable school
//! listing, and the key/value record store both of them share.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod gallery;
pub mod image;
pub mod logging;
pub mod routes;
pub mod school;
pub mod seed;
pub mod storage;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};
pub use form::{AddSchoolForm, FormState, Notification, SubmitOutcome};
pub use gallery::{filter_schools, EmptyState, SchoolGallery};
pub use logging::init_logging;
pub use routes::Route;
pub use school::{SchoolInput, SchoolRecord};
pub use seed::{DemoSeed, NoSeed, SeedProvider};
pub use storage::{KeyValueArea, MemoryRecordStore, RecordStore, SqliteRecordStore};
pub use validation::{validate, Field, FieldErrors, ValidSchool};
