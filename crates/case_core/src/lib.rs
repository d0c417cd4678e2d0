pub mod attachment;
pub mod client;
pub mod dashboard;
pub mod derive;
pub mod drafts;
pub mod error;
pub mod form;
pub mod search;
pub mod session;
pub mod view_model;

pub use client::{CaseApi, CaseClient, ClientConfig};
pub use error::ClientError;
pub use form::{FormError, FormStage, ProceedingForm, WritForm};
pub use search::{SearchCoordinator, SearchOutcome};
pub use session::Session;
pub use view_model::{CaseBoard, FormScope, SubmitError};

#[cfg(test)]
#[path = "tests/fixtures.rs"]
mod fixtures;
