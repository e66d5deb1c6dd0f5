// SPDX-License-Identifier: PMPL-1.0-or-later

//! String resolution against a loaded catalog
//!
//! Resolution never fails and never returns an empty string for a
//! non-empty source: missing or unfinished entries degrade to the source
//! text, and plural lookups fail over to the last category slot. Anything
//! worth reporting goes through [`ResolveObserver`], not the return value —
//! the UI always has something to render.

use crate::types::{Catalog, Translation};
use colored::Colorize;
use std::sync::{Arc, RwLock};

/// Observability hook for resolve-time degradations.
///
/// Default methods are no-ops so implementors pick what they care about.
pub trait ResolveObserver: Send + Sync {
    /// No message found for (context, source, comment).
    fn missing_translation(&self, context: &str, source: &str) {
        let _ = (context, source);
    }

    /// A plural message supplied fewer forms than its locale requires.
    fn plural_mismatch(&self, context: &str, source: &str, required: usize, supplied: usize) {
        let _ = (context, source, required, supplied);
    }
}

/// Observer that drops every event.
pub struct NullObserver;

impl ResolveObserver for NullObserver {}

/// Observer that logs events to stderr, colored like the CLI reports.
pub struct StderrObserver;

impl ResolveObserver for StderrObserver {
    fn missing_translation(&self, context: &str, source: &str) {
        eprintln!(
            "  [{}] {:22} {} / '{}'",
            "WARN".yellow(),
            "missing translation",
            context,
            source
        );
    }

    fn plural_mismatch(&self, context: &str, source: &str, required: usize, supplied: usize) {
        eprintln!(
            "  [{}] {:22} {} / '{}' ({} forms, locale needs {})",
            "WARN".yellow(),
            "plural mismatch",
            context,
            source,
            supplied,
            required
        );
    }
}

/// Read-side API over one immutable catalog.
///
/// `Resolver` is `Send + Sync`; share it behind an `Arc` and read from any
/// number of threads without synchronization.
pub struct Resolver {
    catalog: Catalog,
    observer: Arc<dyn ResolveObserver>,
}

impl Resolver {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_observer(catalog, Arc::new(NullObserver))
    }

    pub fn with_observer(catalog: Catalog, observer: Arc<dyn ResolveObserver>) -> Self {
        Self { catalog, observer }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Plain lookup: `tr("DownloadManager", "Clean up")`.
    pub fn tr(&self, context: &str, source: &str) -> String {
        self.resolve(context, source, None, None)
    }

    /// Lookup with a disambiguation comment.
    pub fn trc(&self, context: &str, source: &str, comment: &str) -> String {
        self.resolve(context, source, Some(comment), None)
    }

    /// Plural lookup: selects the count's category and substitutes `%n`.
    pub fn trn(&self, context: &str, source: &str, count: u64) -> String {
        self.resolve(context, source, None, Some(count))
    }

    /// Full lookup form. Guarantees a non-empty result for non-empty
    /// `source`; `count` is ignored for non-plural messages.
    pub fn resolve(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        count: Option<u64>,
    ) -> String {
        let message = self
            .catalog
            .context(context)
            .and_then(|c| c.get(source, comment));

        let Some(message) = message else {
            self.observer.missing_translation(context, source);
            return match count {
                Some(n) => substitute_count(source, n),
                None => source.to_string(),
            };
        };

        match &message.translation {
            Translation::Single(state) => state.text().unwrap_or(source).to_string(),
            Translation::Plural(forms) => {
                let rule = self.catalog.plural_rule();
                if forms.len() < rule.required_forms() {
                    self.observer
                        .plural_mismatch(context, source, rule.required_forms(), forms.len());
                }
                let Some(n) = count else {
                    // Plural message queried without a count: stay
                    // renderable, hand back the last ("other") slot with
                    // %n untouched.
                    return forms
                        .last()
                        .and_then(|slot| slot.text())
                        .unwrap_or(source)
                        .to_string();
                };
                let slot = rule.slot_for(n);
                let text = forms
                    .get(slot)
                    .and_then(|s| s.text())
                    .or_else(|| forms.last().and_then(|s| s.text()))
                    .unwrap_or(source);
                substitute_count(text, n)
            }
        }
    }
}

/// Replace `%n` / `%Ln` with the count.
pub fn substitute_count(template: &str, count: u64) -> String {
    let rendered = count.to_string();
    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '%' {
            result.push(ch);
            continue;
        }
        let mut lookahead = chars.clone();
        let mut consumed = String::from("%");
        let mut next = lookahead.next();
        if next == Some('L') {
            consumed.push('L');
            next = lookahead.next();
        }
        if next == Some('n') {
            result.push_str(&rendered);
            for _ in 0..consumed.len() {
                chars.next();
            }
        } else {
            result.push('%');
        }
    }
    result
}

/// Replace positional markers `%1`..`%99` (and `%L1`..`%L99`) with
/// caller-supplied values. A marker whose index has no supplied argument is
/// left untouched.
pub fn substitute(template: &str, args: &[&str]) -> String {
    let mut result = String::with_capacity(template.len());
    let bytes = template.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() {
        if bytes[pos] != b'%' {
            let ch_len = utf8_len(bytes[pos]);
            result.push_str(&template[pos..pos + ch_len]);
            pos += ch_len;
            continue;
        }
        let mut cursor = pos + 1;
        if cursor < bytes.len() && bytes[cursor] == b'L' {
            cursor += 1;
        }
        let digits_start = cursor;
        while cursor < bytes.len() && cursor - digits_start < 2 && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        let digits = &template[digits_start..cursor];
        let index: usize = match digits.parse() {
            Ok(n) if n >= 1 => n,
            _ => {
                result.push('%');
                pos += 1;
                continue;
            }
        };
        match args.get(index - 1) {
            Some(value) => {
                result.push_str(value);
                pos = cursor;
            }
            None => {
                // Unsupplied index: emit the marker verbatim
                result.push_str(&template[pos..cursor]);
                pos = cursor;
            }
        }
    }
    result
}

fn utf8_len(first_byte: u8) -> usize {
    match first_byte {
        b if b < 0x80 => 1,
        b if b < 0xE0 => 2,
        b if b < 0xF0 => 3,
        _ => 4,
    }
}

/// The application's active catalog slot.
///
/// Locale switching builds a fresh [`Resolver`] and swaps it in atomically;
/// readers that grabbed the previous snapshot keep reading it untouched.
/// The lock is held only for the pointer exchange, never across a lookup.
pub struct ActiveResolver {
    current: RwLock<Arc<Resolver>>,
}

impl ActiveResolver {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            current: RwLock::new(Arc::new(resolver)),
        }
    }

    /// Current snapshot. Never blocks on in-flight swaps beyond the
    /// pointer clone.
    pub fn snapshot(&self) -> Arc<Resolver> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            // Only an Arc lives under the lock, a poisoned guard is intact
            Err(poisoned) => Arc::clone(poisoned.get_ref()),
        }
    }

    /// Install a new resolver, returning the displaced one.
    pub fn swap(&self, resolver: Resolver) -> Arc<Resolver> {
        let fresh = Arc::new(resolver);
        match self.current.write() {
            Ok(mut guard) => std::mem::replace(&mut *guard, fresh),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), fresh),
        }
    }
}
