// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions for transcat
//!
//! Models one loaded Qt Linguist catalog: contexts grouping messages,
//! messages carrying a tri-state translation, plural messages carrying
//! one slot per plural category of the catalog locale.

use crate::plural::PluralRule;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// State of one translation slot.
///
/// Qt Linguist marks entries `type="unfinished"`; an unfinished entry may
/// still carry draft text. The three cases resolve differently, so this is
/// a tagged variant rather than a flag:
///
/// - `Finished` resolves to its text.
/// - `Draft` (unfinished, text present) resolves to the draft text.
/// - `Untranslated` (unfinished, empty) resolves to the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "state", content = "text")]
pub enum TranslationState {
    Finished(String),
    Draft(String),
    Untranslated,
}

impl TranslationState {
    /// Translation text, if any non-empty text is available.
    pub fn text(&self) -> Option<&str> {
        match self {
            TranslationState::Finished(t) | TranslationState::Draft(t) if !t.is_empty() => Some(t),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, TranslationState::Finished(_))
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, TranslationState::Draft(_))
    }
}

/// Translation payload of a message: one slot, or one slot per plural
/// category of the catalog locale (in the locale's category order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Translation {
    Single(TranslationState),
    Plural(Vec<TranslationState>),
}

/// Rolled-up completeness of a message, for coverage counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Completeness {
    Finished,
    Draft,
    Untranslated,
}

/// One translatable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub source: String,
    /// Disambiguation comment distinguishing messages with identical source
    /// text. Translator-facing, never rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub translation: Translation,
}

impl Message {
    pub fn is_plural(&self) -> bool {
        matches!(self.translation, Translation::Plural(_))
    }

    /// Worst-slot completeness: a plural message is finished only when
    /// every slot is finished, untranslated only when every slot is empty.
    pub fn completeness(&self) -> Completeness {
        match &self.translation {
            Translation::Single(state) => state_completeness(state),
            Translation::Plural(forms) => {
                if forms.iter().all(|f| f.is_finished()) {
                    Completeness::Finished
                } else if forms
                    .iter()
                    .all(|f| matches!(f, TranslationState::Untranslated))
                {
                    Completeness::Untranslated
                } else {
                    Completeness::Draft
                }
            }
        }
    }
}

fn state_completeness(state: &TranslationState) -> Completeness {
    match state {
        TranslationState::Finished(_) => Completeness::Finished,
        TranslationState::Draft(_) => Completeness::Draft,
        TranslationState::Untranslated => Completeness::Untranslated,
    }
}

/// Lookup key within a context: (source text, disambiguation comment).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageKey {
    pub source: String,
    pub comment: Option<String>,
}

impl MessageKey {
    pub fn new(source: &str, comment: Option<&str>) -> Self {
        Self {
            source: source.to_string(),
            comment: comment.map(str::to_string),
        }
    }
}

/// A named grouping of messages, mirroring one originating UI component.
#[derive(Debug, Clone)]
pub struct Context {
    name: String,
    messages: Vec<Message>,
    index: HashMap<MessageKey, usize>,
}

impl Context {
    /// Build a context, rejecting duplicate (source, comment) pairs.
    pub fn new(name: String, messages: Vec<Message>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(messages.len());
        for (pos, message) in messages.iter().enumerate() {
            let key = MessageKey {
                source: message.source.clone(),
                comment: message.comment.clone(),
            };
            if index.insert(key, pos).is_some() {
                return Err(CatalogError::DuplicateMessage {
                    context: name,
                    source: message.source.clone(),
                    comment: message.comment.clone(),
                });
            }
        }
        Ok(Self {
            name,
            messages,
            index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, source: &str, comment: Option<&str>) -> Option<&Message> {
        let key = MessageKey::new(source, comment);
        self.index.get(&key).map(|&pos| &self.messages[pos])
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Counters collected while loading a catalog.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LoadStats {
    pub contexts: usize,
    pub messages: usize,
    pub finished: usize,
    pub drafts: usize,
    pub untranslated: usize,
    /// `type="vanished"` / `type="obsolete"` entries dropped at load.
    pub obsolete_skipped: usize,
    /// Unrecognized XML elements ignored for forward compatibility.
    pub unknown_elements: usize,
}

/// The full set of translation entries for one locale.
///
/// Constructed once at load time and immutable thereafter; share behind an
/// `Arc` and swap wholesale on locale switch (see `resolver::ActiveResolver`).
#[derive(Debug, Clone)]
pub struct Catalog {
    locale: String,
    plural_rule: PluralRule,
    contexts: Vec<Context>,
    index: HashMap<String, usize>,
    stats: LoadStats,
}

impl Catalog {
    pub fn new(
        locale: String,
        contexts: Vec<Context>,
        stats: LoadStats,
    ) -> Result<Self, CatalogError> {
        let plural_rule = PluralRule::for_locale(&locale);
        let mut index = HashMap::with_capacity(contexts.len());
        for (pos, context) in contexts.iter().enumerate() {
            if index.insert(context.name().to_string(), pos).is_some() {
                return Err(CatalogError::DuplicateContext {
                    name: context.name().to_string(),
                });
            }
        }
        Ok(Self {
            locale,
            plural_rule,
            contexts,
            index,
            stats,
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn plural_rule(&self) -> PluralRule {
        self.plural_rule
    }

    pub fn context(&self, name: &str) -> Option<&Context> {
        self.index.get(name).map(|&pos| &self.contexts[pos])
    }

    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    /// Total message count across contexts (obsolete entries excluded).
    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(Context::len).sum()
    }
}

/// Load-time failures. Fatal to the locale being loaded; the caller is
/// expected to fall back to another catalog.
#[derive(Debug)]
pub enum CatalogError {
    /// File could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The XML layer rejected the document.
    Xml(String),
    /// Root element is not `<TS>`.
    NotATsDocument { root: String },
    /// `<TS>` carries no `language` attribute; the plural rule cannot be
    /// selected without it.
    MissingLocale,
    /// `<context>` without a `<name>` child.
    UnnamedContext,
    /// `<message>` without a `<source>` child.
    MissingSource { context: String },
    /// Two messages in one context share (source, comment).
    DuplicateMessage {
        context: String,
        source: String,
        comment: Option<String>,
    },
    /// Two contexts share a name.
    DuplicateContext { name: String },
    /// `numerus="yes"` message whose translation has no `<numerusform>`
    /// children at all.
    EmptyNumerus { context: String, source: String },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "reading {}: {}", path.display(), source),
            Self::Xml(msg) => write!(f, "malformed catalog XML: {}", msg),
            Self::NotATsDocument { root } => {
                write!(f, "not a TS document (root element <{}>)", root)
            }
            Self::MissingLocale => write!(f, "TS document has no 'language' attribute"),
            Self::UnnamedContext => write!(f, "context without a <name> element"),
            Self::MissingSource { context } => {
                write!(f, "message without <source> in context '{}'", context)
            }
            Self::DuplicateMessage {
                context,
                source,
                comment,
            } => match comment {
                Some(comment) => write!(
                    f,
                    "duplicate message '{}' (comment '{}') in context '{}'",
                    source, comment, context
                ),
                None => write!(f, "duplicate message '{}' in context '{}'", source, context),
            },
            Self::DuplicateContext { name } => write!(f, "duplicate context '{}'", name),
            Self::EmptyNumerus { context, source } => write!(
                f,
                "plural message '{}' in context '{}' has no numerus forms",
                source, context
            ),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
