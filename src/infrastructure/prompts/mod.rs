//! Prompt template loading

pub mod library;
pub mod template;

pub use library::PromptLibrary;
pub use template::PromptTemplate;
