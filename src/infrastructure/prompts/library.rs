//! Per-call-type prompt templates, read from disk once

use super::template::PromptTemplate;
use crate::domain::call::value_object::CallDirection;
use crate::domain::shared::error::Result;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::info;

/// Holds the inbound and outbound templates found in one directory
///
/// A template is read the first time it is needed and cached for the life of
/// the library. Failed loads are not cached, so a fixed file is picked up on
/// the next request.
#[derive(Debug)]
pub struct PromptLibrary {
    dir: PathBuf,
    inbound: OnceLock<PromptTemplate>,
    outbound: OnceLock<PromptTemplate>,
}

impl PromptLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            inbound: OnceLock::new(),
            outbound: OnceLock::new(),
        }
    }

    /// Library with both templates already in memory
    pub fn with_templates(inbound: PromptTemplate, outbound: PromptTemplate) -> Self {
        let library = Self::new(PathBuf::new());
        let _ = library.inbound.set(inbound);
        let _ = library.outbound.set(outbound);
        library
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, direction: CallDirection) -> PathBuf {
        match direction {
            CallDirection::Inbound => self.dir.join("inbound.xml"),
            CallDirection::Outbound => self.dir.join("outbound.xml"),
        }
    }

    pub fn template(&self, direction: CallDirection) -> Result<&PromptTemplate> {
        let cell = match direction {
            CallDirection::Inbound => &self.inbound,
            CallDirection::Outbound => &self.outbound,
        };

        if let Some(template) = cell.get() {
            return Ok(template);
        }

        let path = self.path_for(direction);
        let template = PromptTemplate::load(&path)?;
        info!("Loaded {:?} prompt template from {}", direction, path.display());
        Ok(cell.get_or_init(|| template))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::error::DomainError;
    use std::fs;

    const OUTBOUND: &str = "<prompt><initial_message> Hi! </initial_message>\
                            <prompt_preamble> Sell things. </prompt_preamble></prompt>";

    #[test]
    fn test_loads_and_caches_template() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("outbound.xml"), OUTBOUND).unwrap();

        let library = PromptLibrary::new(dir.path());
        let first = library.template(CallDirection::Outbound).unwrap();
        assert_eq!(first.initial_message(), "Hi!");

        // served from cache even after the file disappears
        fs::remove_file(dir.path().join("outbound.xml")).unwrap();
        let second = library.template(CallDirection::Outbound).unwrap();
        assert_eq!(second.prompt_preamble(), "Sell things.");
    }

    #[test]
    fn test_missing_file_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        let library = PromptLibrary::new(dir.path());

        let missing = library.template(CallDirection::Inbound);
        assert!(matches!(missing, Err(DomainError::Configuration(_))));

        fs::write(dir.path().join("inbound.xml"), OUTBOUND).unwrap();
        assert!(library.template(CallDirection::Inbound).is_ok());
    }
}
