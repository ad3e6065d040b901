//! Business logic layer
//!
//! Services own the store access; handlers bind them to operations and the
//! dispatcher routes named operations to handlers.

pub mod cascade;
pub mod dispatcher;
pub mod handlers;
pub mod operation_registry;
pub mod profiles;
pub mod surveys;

pub use cascade::{CascadeService, CompanyDeletion, SurveyDeletion};
pub use dispatcher::Dispatcher;
pub use handlers::OperationHandlers;
pub use operation_registry::{Handler, OperationRegistry};
pub use profiles::ProfileService;
pub use surveys::SurveyService;
