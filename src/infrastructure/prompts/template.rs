//! Prompt templates: flat XML documents mapping tag names to text

use crate::domain::shared::error::DomainError;
use crate::domain::shared::error::Result;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::path::Path;

pub const INITIAL_MESSAGE: &str = "initial_message";
pub const PROMPT_PREAMBLE: &str = "prompt_preamble";

/// Tag → trimmed text, taken from the direct children of the root element
///
/// ```xml
/// <prompt>
///   <initial_message>Hi, this is Ada calling from Acme.</initial_message>
///   <prompt_preamble>You are a polite scheduling assistant.</prompt_preamble>
/// </prompt>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    values: HashMap<String, String>,
}

impl PromptTemplate {
    /// Parse a template document. `initial_message` and `prompt_preamble`
    /// must be present and non-empty after trimming; other tags may be empty.
    pub fn parse(xml: &str) -> Result<Self> {
        let values = extract_tag_values(xml)?;

        for tag in [INITIAL_MESSAGE, PROMPT_PREAMBLE] {
            match values.get(tag) {
                None => {
                    return Err(DomainError::Configuration(format!(
                        "prompt template is missing <{}>",
                        tag
                    )))
                }
                Some(text) if text.is_empty() => {
                    return Err(DomainError::Configuration(format!(
                        "prompt template has an empty <{}>",
                        tag
                    )))
                }
                Some(_) => {}
            }
        }

        Ok(Self { values })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let xml = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Configuration(format!(
                "cannot read prompt template {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::parse(&xml).map_err(|e| match e {
            DomainError::Configuration(msg) => {
                DomainError::Configuration(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.values.get(tag).map(String::as_str)
    }

    pub fn initial_message(&self) -> &str {
        self.get(INITIAL_MESSAGE).unwrap_or_default()
    }

    pub fn prompt_preamble(&self) -> &str {
        self.get(PROMPT_PREAMBLE).unwrap_or_default()
    }
}

fn malformed(reason: impl std::fmt::Display) -> DomainError {
    DomainError::Configuration(format!("malformed prompt template: {}", reason))
}

fn extract_tag_values(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut values = HashMap::new();

    let mut depth = 0usize;
    let mut saw_root = false;
    let mut current: Option<String> = None;
    let mut text = String::new();
    // a tag's value is the text before its first child element
    let mut text_closed = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if depth == 0 {
                    if saw_root {
                        return Err(malformed("more than one root element"));
                    }
                    saw_root = true;
                } else if depth == 1 {
                    current = Some(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                    text.clear();
                    text_closed = false;
                } else {
                    text_closed = true;
                }
                depth += 1;
            }
            Ok(Event::Empty(e)) => {
                if depth == 0 {
                    if saw_root {
                        return Err(malformed("more than one root element"));
                    }
                    saw_root = true;
                } else if depth == 1 {
                    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    values.insert(tag, String::new());
                } else {
                    text_closed = true;
                }
            }
            Ok(Event::Text(e)) if depth == 2 && !text_closed => {
                let unescaped = e.unescape().map_err(malformed)?;
                text.push_str(&unescaped);
            }
            Ok(Event::CData(e)) if depth == 2 && !text_closed => {
                text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::End(_)) => {
                if depth == 2 {
                    if let Some(tag) = current.take() {
                        values.insert(tag, text.trim().to_string());
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(malformed(format!(
                    "{} at position {}",
                    e,
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    if !saw_root {
        return Err(malformed("document has no root element"));
    }
    if depth != 0 {
        return Err(malformed("unclosed element"));
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_values() {
        let template = PromptTemplate::parse(
            r#"<?xml version="1.0"?>
            <prompt>
                <initial_message>
                    Hello, this is Ada from Acme.
                </initial_message>
                <prompt_preamble>  You book dentist appointments &amp; answer questions.  </prompt_preamble>
                <voice_hint>   </voice_hint>
                <closing/>
            </prompt>"#,
        )
        .unwrap();

        assert_eq!(template.initial_message(), "Hello, this is Ada from Acme.");
        assert_eq!(
            template.prompt_preamble(),
            "You book dentist appointments & answer questions."
        );
        assert_eq!(template.get("voice_hint"), Some(""));
        assert_eq!(template.get("closing"), Some(""));
        assert_eq!(template.get("missing"), None);
    }

    #[test]
    fn test_cdata_is_kept_verbatim() {
        let template = PromptTemplate::parse(
            "<p><initial_message><![CDATA[Hi <there>]]></initial_message>\
             <prompt_preamble>Be brief.</prompt_preamble></p>",
        )
        .unwrap();
        assert_eq!(template.initial_message(), "Hi <there>");
    }

    #[test]
    fn test_text_after_nested_element_is_ignored() {
        let template = PromptTemplate::parse(
            "<p><initial_message>Hi <b>there</b> friend</initial_message>\
             <prompt_preamble>Be brief.<br/>Really brief.</prompt_preamble>\
             <signoff><em>Bye</em></signoff></p>",
        )
        .unwrap();

        assert_eq!(template.initial_message(), "Hi");
        assert_eq!(template.prompt_preamble(), "Be brief.");
        assert_eq!(template.get("signoff"), Some(""));
    }

    #[test]
    fn test_mandatory_fields() {
        let missing = PromptTemplate::parse("<p><prompt_preamble>x</prompt_preamble></p>");
        assert!(matches!(missing, Err(DomainError::Configuration(_))));

        let blank = PromptTemplate::parse(
            "<p><initial_message>  </initial_message><prompt_preamble>x</prompt_preamble></p>",
        );
        assert!(matches!(blank, Err(DomainError::Configuration(_))));
    }

    #[test]
    fn test_malformed_documents() {
        for xml in [
            "",
            "just text",
            "<p><initial_message>hi</prompt_preamble></p>",
            "<p><initial_message>hi</initial_message>",
        ] {
            let result = PromptTemplate::parse(xml);
            assert!(
                matches!(result, Err(DomainError::Configuration(_))),
                "expected configuration error for {:?}",
                xml
            );
        }
    }

    #[test]
    fn test_load_missing_file() {
        let result = PromptTemplate::load(Path::new("/nonexistent/outbound.xml"));
        assert!(matches!(result, Err(DomainError::Configuration(_))));
    }
}
