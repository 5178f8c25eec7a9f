//! Compiled grammar cache

use std::sync::Arc;

use log::trace;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::error::GrammarResult;
use crate::node::SyntaxNode;
use crate::parser::SyntaxParser;

/// Memoizes grammar compilation, keyed by the exact grammar text.
///
/// Failures are cached as well so a broken definition is only reported
/// once per cache. Safe to share between threads; when two callers race on
/// the same grammar the first insert wins and both observe it.
#[derive(Default)]
pub struct SyntaxCache {
    entries: RwLock<FxHashMap<String, GrammarResult<Arc<SyntaxNode>>>>,
}

impl SyntaxCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Previously compiled result for `grammar`, if any
    pub fn get(&self, grammar: &str) -> Option<GrammarResult<Arc<SyntaxNode>>> {
        self.entries.read().get(grammar).cloned()
    }

    /// Compiled tree for `grammar`, compiling with `parser` on a miss
    pub fn get_or_parse(&self, grammar: &str, parser: &SyntaxParser<'_>) -> GrammarResult<Arc<SyntaxNode>> {
        if let Some(hit) = self.get(grammar) {
            trace!("grammar cache hit for '{}'", grammar);
            return hit;
        }

        // Compile outside the lock; parsing may be slow for large references
        let compiled = parser.parse(grammar).map(Arc::new);
        self.entries
            .write()
            .entry(grammar.to_string())
            .or_insert(compiled)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
