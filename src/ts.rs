// SPDX-License-Identifier: PMPL-1.0-or-later

//! Qt Linguist TS catalog loader
//!
//! Parses the XML produced by lupdate/Qt Linguist:
//!
//! ```xml
//! <TS language="pt_PT" version="2.1">
//!   <context>
//!     <name>DownloadManager</name>
//!     <message numerus="yes">
//!       <source>%n minutes remaining</source>
//!       <translation>
//!         <numerusform>%n minuto restante</numerusform>
//!         <numerusform>%n minutos restantes</numerusform>
//!       </translation>
//!     </message>
//!   </context>
//! </TS>
//! ```
//!
//! Structural violations (duplicate keys, plural message with no forms,
//! missing `<source>`) are fatal; unrecognized elements are skipped and
//! counted so newer TS revisions still load.

use crate::types::{Catalog, CatalogError, Context, LoadStats, Message, Translation, TranslationState};
use std::fs;
use std::path::Path;
use xmltree::{Element, XMLNode};

// Message children lupdate emits that carry no translation payload.
const IGNORED_MESSAGE_CHILDREN: &[&str] = &[
    "location",
    "extracomment",
    "translatorcomment",
    "oldsource",
    "oldcomment",
    "userdata",
];

/// Load a catalog from a `.ts` file.
pub fn load_file(path: &Path) -> Result<Catalog, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_str(&raw)
}

/// Load a catalog from TS XML text.
pub fn load_str(raw: &str) -> Result<Catalog, CatalogError> {
    let root = Element::parse(raw.as_bytes()).map_err(|e| CatalogError::Xml(e.to_string()))?;
    if root.name != "TS" {
        return Err(CatalogError::NotATsDocument { root: root.name });
    }
    let locale = root
        .attributes
        .get("language")
        .cloned()
        .ok_or(CatalogError::MissingLocale)?;

    let mut stats = LoadStats::default();
    let mut contexts = Vec::new();
    for node in &root.children {
        match node {
            XMLNode::Element(el) if el.name == "context" => {
                contexts.push(parse_context(el, &mut stats)?);
            }
            XMLNode::Element(_) => stats.unknown_elements += 1,
            _ => {}
        }
    }

    stats.contexts = contexts.len();
    for context in &contexts {
        for message in context.messages() {
            stats.messages += 1;
            match message.completeness() {
                crate::types::Completeness::Finished => stats.finished += 1,
                crate::types::Completeness::Draft => stats.drafts += 1,
                crate::types::Completeness::Untranslated => stats.untranslated += 1,
            }
        }
    }

    Catalog::new(locale, contexts, stats)
}

fn parse_context(el: &Element, stats: &mut LoadStats) -> Result<Context, CatalogError> {
    let name = el
        .get_child("name")
        .and_then(element_text)
        .ok_or(CatalogError::UnnamedContext)?;

    let mut messages = Vec::new();
    for node in &el.children {
        match node {
            XMLNode::Element(child) if child.name == "message" => {
                if let Some(message) = parse_message(child, &name, stats)? {
                    messages.push(message);
                }
            }
            XMLNode::Element(child) if child.name == "name" => {}
            XMLNode::Element(_) => stats.unknown_elements += 1,
            _ => {}
        }
    }

    Context::new(name, messages)
}

fn parse_message(
    el: &Element,
    context: &str,
    stats: &mut LoadStats,
) -> Result<Option<Message>, CatalogError> {
    let source = match el.get_child("source") {
        Some(child) => element_text(child).unwrap_or_default(),
        None => {
            return Err(CatalogError::MissingSource {
                context: context.to_string(),
            })
        }
    };
    let comment = el.get_child("comment").and_then(element_text);
    let numerus = el
        .attributes
        .get("numerus")
        .map(|v| v == "yes")
        .unwrap_or(false);

    for node in &el.children {
        if let XMLNode::Element(child) = node {
            match child.name.as_str() {
                "source" | "comment" | "translation" => {}
                name if IGNORED_MESSAGE_CHILDREN.contains(&name) => {}
                _ => stats.unknown_elements += 1,
            }
        }
    }

    let translation_el = el.get_child("translation");
    let unfinished = translation_el
        .and_then(|t| t.attributes.get("type"))
        .map(|t| t == "unfinished")
        .unwrap_or(false);
    let retired = translation_el
        .and_then(|t| t.attributes.get("type"))
        .map(|t| t == "vanished" || t == "obsolete")
        .unwrap_or(false);
    if retired {
        stats.obsolete_skipped += 1;
        return Ok(None);
    }

    let translation = if numerus {
        let mut forms = Vec::new();
        if let Some(translation_el) = translation_el {
            for node in &translation_el.children {
                if let XMLNode::Element(child) = node {
                    if child.name == "numerusform" {
                        let text = element_text(child).unwrap_or_default();
                        forms.push(slot_state(text, unfinished));
                    } else {
                        stats.unknown_elements += 1;
                    }
                }
            }
        }
        if forms.is_empty() {
            return Err(CatalogError::EmptyNumerus {
                context: context.to_string(),
                source,
            });
        }
        Translation::Plural(forms)
    } else {
        let text = translation_el.and_then(element_text).unwrap_or_default();
        Translation::Single(slot_state(text, unfinished))
    };

    Ok(Some(Message {
        source,
        comment,
        translation,
    }))
}

fn slot_state(text: String, unfinished: bool) -> TranslationState {
    if text.is_empty() {
        TranslationState::Untranslated
    } else if unfinished {
        TranslationState::Draft(text)
    } else {
        TranslationState::Finished(text)
    }
}

fn element_text(el: &Element) -> Option<String> {
    el.get_text().map(|cow| cow.into_owned()).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plural::PluralRule;
    use crate::types::Completeness;

    fn wrap(language: &str, body: &str) -> String {
        format!(
            "<?xml version=\"1.0\"?><!DOCTYPE TS><TS language=\"{}\" version=\"2.1\">{}</TS>",
            language, body
        )
    }

    #[test]
    fn loads_basic_context() {
        let raw = wrap(
            "pt_PT",
            "<context><name>AdBlockDialog</name>\
             <message><source>Enable AdBlock</source>\
             <translation>Habilitar o AdBlock</translation></message></context>",
        );
        let catalog = load_str(&raw).expect("catalog should load");
        assert_eq!(catalog.locale(), "pt_PT");
        assert_eq!(catalog.plural_rule(), PluralRule::TwoForm);
        let message = catalog
            .context("AdBlockDialog")
            .and_then(|c| c.get("Enable AdBlock", None))
            .expect("message should be present");
        assert_eq!(
            message.translation,
            Translation::Single(TranslationState::Finished("Habilitar o AdBlock".to_string()))
        );
    }

    #[test]
    fn decodes_xml_entities() {
        let raw = wrap(
            "pt_PT",
            "<context><name>C</name>\
             <message><source>&amp;Help</source><translation>A&amp;juda</translation></message>\
             </context>",
        );
        let catalog = load_str(&raw).expect("catalog should load");
        let message = catalog
            .context("C")
            .and_then(|c| c.get("&Help", None))
            .expect("entity-decoded source should match");
        assert_eq!(
            message.translation,
            Translation::Single(TranslationState::Finished("A&juda".to_string()))
        );
    }

    #[test]
    fn unfinished_empty_is_untranslated() {
        let raw = wrap(
            "pt_PT",
            "<context><name>AdBlockDialog</name>\
             <message><source>Custom filters</source>\
             <translation type=\"unfinished\"/></message></context>",
        );
        let catalog = load_str(&raw).expect("catalog should load");
        let message = catalog
            .context("AdBlockDialog")
            .and_then(|c| c.get("Custom filters", None))
            .unwrap();
        assert_eq!(
            message.translation,
            Translation::Single(TranslationState::Untranslated)
        );
        assert_eq!(catalog.stats().untranslated, 1);
    }

    #[test]
    fn unfinished_with_text_is_draft() {
        let raw = wrap(
            "pt_PT",
            "<context><name>C</name>\
             <message><source>Save</source>\
             <translation type=\"unfinished\">Guardar</translation></message></context>",
        );
        let catalog = load_str(&raw).expect("catalog should load");
        let message = catalog.context("C").and_then(|c| c.get("Save", None)).unwrap();
        assert_eq!(
            message.translation,
            Translation::Single(TranslationState::Draft("Guardar".to_string()))
        );
        assert_eq!(message.completeness(), Completeness::Draft);
    }

    #[test]
    fn numerus_forms_in_order() {
        let raw = wrap(
            "pt_PT",
            "<context><name>DownloadManager</name>\
             <message numerus=\"yes\"><source>%n minutes remaining</source>\
             <translation><numerusform>%n minuto restante</numerusform>\
             <numerusform>%n minutos restantes</numerusform></translation></message></context>",
        );
        let catalog = load_str(&raw).expect("catalog should load");
        let message = catalog
            .context("DownloadManager")
            .and_then(|c| c.get("%n minutes remaining", None))
            .unwrap();
        match &message.translation {
            Translation::Plural(forms) => {
                assert_eq!(forms.len(), 2);
                assert_eq!(forms[0].text(), Some("%n minuto restante"));
                assert_eq!(forms[1].text(), Some("%n minutos restantes"));
            }
            other => panic!("expected plural translation, got {:?}", other),
        }
    }

    #[test]
    fn numerus_with_empty_slots_loads() {
        // lupdate emits empty numerusforms for untranslated plural entries
        let raw = wrap(
            "pt_PT",
            "<context><name>FormStandardImportExport</name>\
             <message numerus=\"yes\"><source>Add one of %n feed(s)</source>\
             <translation type=\"unfinished\"><numerusform></numerusform>\
             <numerusform></numerusform></translation></message></context>",
        );
        let catalog = load_str(&raw).expect("catalog should load");
        let message = catalog
            .context("FormStandardImportExport")
            .and_then(|c| c.get("Add one of %n feed(s)", None))
            .unwrap();
        assert_eq!(message.completeness(), Completeness::Untranslated);
    }

    #[test]
    fn numerus_with_no_forms_is_malformed() {
        let raw = wrap(
            "pt_PT",
            "<context><name>C</name>\
             <message numerus=\"yes\"><source>%n items</source>\
             <translation/></message></context>",
        );
        let err = load_str(&raw).expect_err("zero numerus forms should fail");
        assert!(matches!(err, CatalogError::EmptyNumerus { .. }));
    }

    #[test]
    fn duplicate_messages_are_malformed() {
        let raw = wrap(
            "pt_PT",
            "<context><name>C</name>\
             <message><source>Open</source><translation>Abrir</translation></message>\
             <message><source>Open</source><translation>Abrir</translation></message>\
             </context>",
        );
        let err = load_str(&raw).expect_err("duplicate keys should fail");
        assert!(matches!(err, CatalogError::DuplicateMessage { .. }));
    }

    #[test]
    fn disambiguation_comment_separates_duplicates() {
        let raw = wrap(
            "pt_PT",
            "<context><name>C</name>\
             <message><source>Open</source><comment>menu entry</comment>\
             <translation>Abrir</translation></message>\
             <message><source>Open</source><translation>Aberto</translation></message>\
             </context>",
        );
        let catalog = load_str(&raw).expect("disambiguated messages should load");
        let context = catalog.context("C").unwrap();
        assert_eq!(
            context.get("Open", Some("menu entry")).unwrap().translation,
            Translation::Single(TranslationState::Finished("Abrir".to_string()))
        );
        assert_eq!(
            context.get("Open", None).unwrap().translation,
            Translation::Single(TranslationState::Finished("Aberto".to_string()))
        );
    }

    #[test]
    fn vanished_entries_are_skipped() {
        let raw = wrap(
            "pt_PT",
            "<context><name>C</name>\
             <message><source>Old label</source>\
             <translation type=\"vanished\">Antigo</translation></message>\
             <message><source>Kept</source><translation>Mantido</translation></message>\
             </context>",
        );
        let catalog = load_str(&raw).expect("catalog should load");
        let context = catalog.context("C").unwrap();
        assert!(context.get("Old label", None).is_none());
        assert!(context.get("Kept", None).is_some());
        assert_eq!(catalog.stats().obsolete_skipped, 1);
        assert_eq!(catalog.stats().messages, 1);
    }

    #[test]
    fn unknown_elements_are_skipped_not_fatal() {
        let raw = wrap(
            "pt_PT",
            "<futuremeta/><context><name>C</name>\
             <message><source>Hi</source><newfangled/>\
             <translation>Olá</translation></message></context>",
        );
        let catalog = load_str(&raw).expect("unknown elements should not be fatal");
        assert_eq!(catalog.stats().unknown_elements, 2);
        assert!(catalog.context("C").unwrap().get("Hi", None).is_some());
    }

    #[test]
    fn ignored_linguist_children_are_not_counted_unknown() {
        let raw = wrap(
            "pt_PT",
            "<context><name>C</name>\
             <message><location filename=\"main.cpp\" line=\"10\"/>\
             <source>Hi</source>\
             <extracomment>shown in tray</extracomment>\
             <translation>Olá</translation></message></context>",
        );
        let catalog = load_str(&raw).expect("catalog should load");
        assert_eq!(catalog.stats().unknown_elements, 0);
    }

    #[test]
    fn missing_language_attribute_fails() {
        let raw = "<TS version=\"2.1\"><context><name>C</name></context></TS>";
        let err = load_str(raw).expect_err("missing language should fail");
        assert!(matches!(err, CatalogError::MissingLocale));
    }

    #[test]
    fn wrong_root_fails() {
        let err = load_str("<RESOURCES language=\"en\"/>").expect_err("non-TS root should fail");
        assert!(matches!(err, CatalogError::NotATsDocument { .. }));
    }

    #[test]
    fn garbage_fails_as_xml_error() {
        let err = load_str("not xml at all").expect_err("garbage should fail");
        assert!(matches!(err, CatalogError::Xml(_)));
    }

    #[test]
    fn message_without_source_fails() {
        let raw = wrap(
            "pt_PT",
            "<context><name>C</name><message><translation>x</translation></message></context>",
        );
        let err = load_str(&raw).expect_err("missing source should fail");
        assert!(matches!(err, CatalogError::MissingSource { .. }));
    }
}
