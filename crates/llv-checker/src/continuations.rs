//! Forward references waiting for a declaration.
//!
//! A reference to a class that has not been visited yet becomes a
//! [`Continuation`]: the name it waits for, where the reference was written,
//! and the [`DeferredCheck`] to run once the class exists. Continuations are
//! keyed by qualified name and released one-shot by
//! [`ContinuationResolver::notify_defined`].

use crate::context::FileId;
use indexmap::IndexMap;
use llv_binder::{MethodId, SymbolId, SymbolTable, VariableId};
use llv_common::limits::MAX_SETTLE_PASSES;
use llv_common::{Diagnostic, SourceInfo, diagnostic_codes, diagnostic_messages, format_message};
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use tracing::{debug, trace};

/// The check to run once a referenced class is known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredCheck {
    /// Link `class`'s superclass.
    Superclass { class: SymbolId },
    /// Link entry `index` of `class`'s interface list.
    Interface { class: SymbolId, index: usize },
    /// Link the declared type of a field, parameter or local.
    VariableType { variable: VariableId },
    ReturnType { method: MethodId },
    ThrownType { method: MethodId, index: usize },
    /// `new T(...)` or a cast to `T`: only existence is checked.
    InstantiatedType,
    /// Base type of an anonymous class: superclass or single interface.
    AnonymousBase { class: SymbolId },
}

/// One pending forward reference.
#[derive(Clone, Debug, PartialEq)]
pub struct Continuation {
    /// Qualified name the reference is keyed by.
    pub name: String,
    /// Other qualified names the written name may also denote.
    pub alternatives: SmallVec<[String; 2]>,
    pub position: SourceInfo,
    pub file: FileId,
    pub check: DeferredCheck,
}

impl Continuation {
    pub fn new(name: impl Into<String>, position: SourceInfo, file: FileId, check: DeferredCheck) -> Self {
        Continuation {
            name: name.into(),
            alternatives: SmallVec::new(),
            position,
            file,
            check,
        }
    }

    #[must_use]
    pub fn with_alternatives(mut self, alternatives: impl IntoIterator<Item = String>) -> Self {
        self.alternatives.extend(alternatives);
        self
    }

    /// The "Could not resolve symbol" error for a continuation that was
    /// never satisfied.
    pub fn unresolved_diagnostic(&self, file_name: &str) -> Diagnostic {
        Diagnostic::error(
            file_name,
            self.position,
            format_message(diagnostic_messages::UNRESOLVED_SYMBOL, &[self.name.as_str()]),
            diagnostic_codes::UNRESOLVED_SYMBOL,
        )
    }
}

/// Pending continuations, grouped by the name they wait for.
#[derive(Clone, Debug, Default)]
pub struct ContinuationResolver {
    pending: IndexMap<String, Vec<Continuation>, FxBuildHasher>,
}

impl ContinuationResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `continuation` until its name is defined.
    pub fn request_resolution(&mut self, continuation: Continuation) {
        trace!(name = %continuation.name, pos = %continuation.position, "resolution requested");
        self.pending
            .entry(continuation.name.clone())
            .or_default()
            .push(continuation);
    }

    /// Release every continuation waiting for `name`. Each is returned
    /// exactly once; a second call for the same name returns nothing.
    pub fn notify_defined(&mut self, name: &str) -> Vec<Continuation> {
        let released = self.pending.shift_remove(name).unwrap_or_default();
        if !released.is_empty() {
            debug!(name, count = released.len(), "continuations released");
        }
        released
    }

    pub fn is_pending(&self, name: &str) -> bool {
        self.pending.contains_key(name)
    }

    /// Names still waited for, in first-request order.
    pub fn pending_names(&self) -> impl Iterator<Item = &str> {
        self.pending.keys().map(String::as_str)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take continuations whose name, or one of whose alternatives, now
    /// names a fully visited class.
    fn take_ready(&mut self, table: &SymbolTable) -> Vec<(Continuation, SymbolId)> {
        let mut ready = Vec::new();
        let mut emptied = Vec::new();
        for (name, waiting) in &mut self.pending {
            let keyed = table.lookup_complete(name);
            let mut kept = Vec::with_capacity(waiting.len());
            for continuation in waiting.drain(..) {
                let target = keyed.or_else(|| {
                    continuation
                        .alternatives
                        .iter()
                        .find_map(|alt| table.lookup_complete(alt))
                });
                match target {
                    Some(id) => ready.push((continuation, id)),
                    None => kept.push(continuation),
                }
            }
            *waiting = kept;
            if waiting.is_empty() {
                emptied.push(name.clone());
            }
        }
        for name in emptied {
            self.pending.shift_remove(&name);
        }
        ready
    }

    /// Resume everything that has become resolvable, repeating until no
    /// pass makes progress. Returns the continuations that never resolved,
    /// in request order, leaving the resolver empty.
    pub fn settle<F>(&mut self, table: &mut SymbolTable, mut resume: F) -> Vec<Continuation>
    where
        F: FnMut(&mut SymbolTable, Continuation, SymbolId),
    {
        for pass in 0..MAX_SETTLE_PASSES {
            let ready = self.take_ready(table);
            if ready.is_empty() {
                break;
            }
            debug!(pass, count = ready.len(), "settling continuations");
            for (continuation, target) in ready {
                resume(table, continuation, target);
            }
        }
        let unresolved: Vec<Continuation> = self.pending.drain(..).flat_map(|(_, c)| c).collect();
        if !unresolved.is_empty() {
            debug!(count = unresolved.len(), "unresolved continuations");
        }
        unresolved
    }
}
