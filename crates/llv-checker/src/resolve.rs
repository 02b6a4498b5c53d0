//! Type name resolution.
//!
//! A written type name is tried against, in order: primitives, classes
//! enclosing the reference, classes of the current file, single-type
//! imports, the file's package, packages imported on demand (`java.lang`
//! included) and finally the name taken as fully qualified.

use crate::context::FileContext;
use llv_binder::builtins::is_primitive;
use llv_binder::{ScopeRef, SymbolId, SymbolState, SymbolTable};
use smallvec::SmallVec;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Declared, or being visited right now.
    Found(SymbolId),
    /// Not declared yet: wait for `key`, or any of `alternatives`.
    Pending {
        key: String,
        alternatives: SmallVec<[String; 2]>,
    },
}

/// Strip type arguments and array brackets: `Map<K, V>[]` becomes `Map`.
pub fn base_type_name(written: &str) -> &str {
    let end = written
        .find(|c| c == '<' || c == '[')
        .unwrap_or(written.len());
    written[..end].trim()
}

/// Whether `name` is a type parameter of a method or class enclosing `scope`.
pub fn is_type_param(table: &SymbolTable, scope: Option<ScopeRef>, name: &str) -> bool {
    let mut current = scope;
    while let Some(scope) = current {
        let params = match scope {
            ScopeRef::Method(id) => &table.method(id).type_params,
            ScopeRef::Symbol(id) => &table.symbol(id).type_params,
            ScopeRef::Block(_) => {
                current = table.outer_of(scope);
                continue;
            }
        };
        if params.iter().any(|p| p == name) {
            return true;
        }
        current = table.outer_of(scope);
    }
    false
}

fn is_declared(table: &SymbolTable, qualified: &str) -> Option<SymbolId> {
    table
        .lookup(qualified)
        .filter(|&id| table.symbol(id).state != SymbolState::Placeholder)
}

/// Resolve a base type name (see [`base_type_name`]) written in `file`
/// inside the class `enclosing`.
pub fn resolve_type(
    table: &SymbolTable,
    file: &FileContext,
    enclosing: Option<SymbolId>,
    name: &str,
) -> Resolution {
    if is_primitive(name) {
        if let Some(id) = table.lookup(name) {
            return Resolution::Found(id);
        }
    }

    let candidates = candidates(table, file, enclosing, name);
    if let Some(id) = candidates.iter().find_map(|c| is_declared(table, c)) {
        return Resolution::Found(id);
    }

    let key = if name.contains('.') {
        name.to_string()
    } else {
        file.imports
            .iter()
            .find(|import| last_segment(import) == name)
            .cloned()
            .unwrap_or_else(|| file.qualify(name))
    };
    let alternatives = candidates.into_iter().filter(|c| *c != key).collect();
    Resolution::Pending { key, alternatives }
}

fn last_segment(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

fn candidates(
    table: &SymbolTable,
    file: &FileContext,
    enclosing: Option<SymbolId>,
    name: &str,
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |candidate: String| {
        if !out.contains(&candidate) {
            out.push(candidate);
        }
    };

    if name.contains('.') {
        push(name.to_string());
        // `Outer.Inner` written relative to the file.
        if let Some((head, rest)) = name.split_once('.') {
            if let Some(outer) = file.classes.get(head) {
                push(format!("{}${}", outer, rest.replace('.', "$")));
            }
        }
        return out;
    }

    let mut current = enclosing;
    while let Some(id) = current {
        let symbol = table.symbol(id);
        if symbol.simple_name() == name {
            push(symbol.name.clone());
        }
        push(format!("{}${}", symbol.name, name));
        current = symbol
            .outer
            .map(|outer| table.enclosing_symbol(outer));
    }
    if let Some(qualified) = file.classes.get(name) {
        push(qualified.clone());
    }
    for import in &file.imports {
        if last_segment(import) == name {
            push(import.clone());
        }
    }
    push(file.qualify(name));
    for package in &file.imported_packages {
        push(format!("{package}.{name}"));
    }
    push(name.to_string());
    out
}
