//! Action bounded context - side effects the agent may invoke mid-call

pub mod descriptor;
pub mod registry;
pub mod schema;

pub use descriptor::{ActionDescriptor, ActionHandler, ActionInvocation, ActionResult};
pub use registry::ActionRegistry;
pub use schema::{ActionSchema, FieldSpec, FieldType};
