//! Student records: model, validation and the service that manages them.

mod errors;
mod model;
mod service;
mod validation;

pub use errors::{ServiceError, ServiceResult};
pub use model::{NewStudent, Student, StudentPatch, StudentPayload};
pub use service::{CacheKey, StudentService, CACHE_NAMESPACE};
pub use validation::{FieldError, ValidationErrors, MAX_AGE, MIN_AGE};
