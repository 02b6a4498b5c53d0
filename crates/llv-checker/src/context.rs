//! State shared by every walker of one analysis run.

use crate::continuations::{Continuation, ContinuationResolver, DeferredCheck};
use crate::error_log::ErrorLog;
use crate::level::LanguageLevel;
use llv_binder::{DuplicateScope, SymbolId, SymbolTable, TypeRef};
use llv_common::limits::{IMPLICIT_PACKAGES, MAX_VISIT_DEPTH};
use llv_common::{Diagnostic, SourceInfo, diagnostic_codes, diagnostic_messages, format_message};
use llv_syntax::ImportDecl;
use rustc_hash::FxHashMap;
use tracing::trace;

/// Qualified name of the implicit superclass.
pub const OBJECT_CLASS: &str = "java.lang.Object";

/// Options for a checker run.
#[derive(Clone, Debug)]
pub struct CheckerOptions {
    /// Scopes a local variable name is checked against for duplicates.
    pub duplicate_scope: DuplicateScope,
    /// Deeper nodes are reported and skipped.
    pub max_visit_depth: u32,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        CheckerOptions {
            duplicate_scope: DuplicateScope::Immediate,
            max_visit_depth: MAX_VISIT_DEPTH,
        }
    }
}

/// Index of a file within a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

impl FileId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Per-file name environment.
#[derive(Clone, Debug)]
pub struct FileContext {
    pub id: FileId,
    pub name: String,
    pub level: LanguageLevel,
    /// Empty for the default package.
    pub package: String,
    /// Single-type imports, fully qualified.
    pub imports: Vec<String>,
    /// Packages imported on demand; the implicit packages come first.
    pub imported_packages: Vec<String>,
    /// Top-level types declared in this file: simple name to qualified name.
    pub classes: FxHashMap<String, String>,
}

impl FileContext {
    pub fn new(id: FileId, name: impl Into<String>, level: LanguageLevel) -> Self {
        FileContext {
            id,
            name: name.into(),
            level,
            package: String::new(),
            imports: Vec::new(),
            imported_packages: IMPLICIT_PACKAGES.iter().map(|p| p.to_string()).collect(),
            classes: FxHashMap::default(),
        }
    }

    /// Qualify a top-level simple name with this file's package.
    pub fn qualify(&self, simple: &str) -> String {
        if self.package.is_empty() {
            simple.to_string()
        } else {
            format!("{}.{}", self.package, simple)
        }
    }

    pub fn record_header(&mut self, package: Option<&str>, imports: &[ImportDecl]) {
        self.package = package.unwrap_or_default().to_string();
        for import in imports {
            if import.on_demand {
                if !self.imported_packages.contains(&import.name) {
                    self.imported_packages.push(import.name.clone());
                }
            } else {
                self.imports.push(import.name.clone());
            }
        }
    }

    pub fn declare_class(&mut self, simple: &str) {
        let qualified = self.qualify(simple);
        self.classes.insert(simple.to_string(), qualified);
    }
}

/// Symbol table, error log and resolver shared by the walkers of a run.
#[derive(Debug)]
pub struct CheckerContext {
    pub table: SymbolTable,
    pub log: ErrorLog,
    pub resolver: ContinuationResolver,
    pub options: CheckerOptions,
    pub files: Vec<FileContext>,
}

impl CheckerContext {
    pub fn new(options: CheckerOptions) -> Self {
        Self::with_table(SymbolTable::new(), options)
    }

    pub fn with_table(table: SymbolTable, options: CheckerOptions) -> Self {
        CheckerContext {
            table,
            log: ErrorLog::new(),
            resolver: ContinuationResolver::new(),
            options,
            files: Vec::new(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, level: LanguageLevel) -> FileId {
        let id = FileId(self.files.len() as u32);
        self.files.push(FileContext::new(id, name, level));
        id
    }

    pub fn file(&self, id: FileId) -> Option<&FileContext> {
        self.files.get(id.index())
    }

    pub fn file_mut(&mut self, id: FileId) -> Option<&mut FileContext> {
        self.files.get_mut(id.index())
    }

    /// Mark a class as fully visited and resume the checks waiting for it.
    pub fn define_complete(&mut self, id: SymbolId) {
        self.table.finish_definition(id);
        let name = self.table.symbol(id).name.clone();
        for continuation in self.resolver.notify_defined(&name) {
            self.resume(continuation, id);
        }
    }

    /// Run a continuation's check against the class it waited for.
    pub fn resume(&mut self, continuation: Continuation, target: SymbolId) {
        let file_name = file_name(&self.files, continuation.file);
        apply_check(
            &mut self.table,
            &mut self.log,
            file_name,
            continuation.position,
            continuation.check,
            target,
        );
    }

    /// Run a check whose target resolved immediately.
    pub fn apply(&mut self, file: FileId, position: SourceInfo, check: DeferredCheck, target: SymbolId) {
        let file_name = file_name(&self.files, file);
        apply_check(&mut self.table, &mut self.log, file_name, position, check, target);
    }

    /// Resume whatever can still be resolved, then turn every remaining
    /// continuation into an unresolved-symbol error.
    pub fn settle(&mut self) {
        let files = &self.files;
        let log = &mut self.log;
        let unresolved = self.resolver.settle(&mut self.table, |table, continuation, target| {
            apply_check(
                table,
                log,
                file_name(files, continuation.file),
                continuation.position,
                continuation.check,
                target,
            );
        });
        for continuation in unresolved {
            let diagnostic = continuation.unresolved_diagnostic(file_name(files, continuation.file));
            log.add_and_ignore_error(diagnostic);
        }
    }
}

fn file_name(files: &[FileContext], id: FileId) -> &str {
    files.get(id.index()).map_or("", |f| f.name.as_str())
}

/// `java.lang.Object` as a resolved supertype reference.
pub(crate) fn object_ref(table: &SymbolTable) -> TypeRef {
    TypeRef {
        name: OBJECT_CLASS.to_string(),
        resolved: table.lookup(OBJECT_CLASS),
    }
}

fn apply_check(
    table: &mut SymbolTable,
    log: &mut ErrorLog,
    file_name: &str,
    position: SourceInfo,
    check: DeferredCheck,
    target: SymbolId,
) {
    trace!(?check, target = %table.symbol(target).name, "linking type");
    match check {
        DeferredCheck::Superclass { class } => {
            if let Some(superclass) = table.symbol_mut(class).superclass.as_mut() {
                superclass.resolved = Some(target);
            }
            let (sub, sup) = (table.symbol(class), table.symbol(target));
            if sup.is_interface && !sub.is_interface {
                let message = format_message(
                    diagnostic_messages::CLASS_EXTENDS_INTERFACE,
                    &[sup.simple_name(), sub.simple_name()],
                );
                log.add_and_ignore_error(Diagnostic::error(
                    file_name,
                    position,
                    message,
                    diagnostic_codes::CLASS_EXTENDS_INTERFACE,
                ));
            }
        }
        DeferredCheck::Interface { class, index } => {
            if let Some(interface) = table.symbol_mut(class).interfaces.get_mut(index) {
                interface.resolved = Some(target);
            }
            let (owner, sup) = (table.symbol(class), table.symbol(target));
            if !sup.is_interface {
                let message = format_message(
                    diagnostic_messages::IMPLEMENTS_CLASS,
                    &[sup.simple_name(), owner.simple_name()],
                );
                log.add_and_ignore_error(Diagnostic::error(
                    file_name,
                    position,
                    message,
                    diagnostic_codes::IMPLEMENTS_CLASS,
                ));
            }
        }
        DeferredCheck::VariableType { variable } => {
            table.variable_mut(variable).ty.resolved = Some(target);
        }
        DeferredCheck::ReturnType { method } => {
            if let Some(return_type) = table.method_mut(method).return_type.as_mut() {
                return_type.resolved = Some(target);
            }
        }
        DeferredCheck::ThrownType { method, index } => {
            if let Some(thrown) = table.method_mut(method).thrown.get_mut(index) {
                thrown.resolved = Some(target);
            }
        }
        DeferredCheck::InstantiatedType => {}
        DeferredCheck::AnonymousBase { class } => {
            let base = TypeRef {
                name: table.symbol(target).name.clone(),
                resolved: Some(target),
            };
            if table.symbol(target).is_interface {
                let object = object_ref(table);
                let anonymous = table.symbol_mut(class);
                anonymous.interfaces.push(base);
                anonymous.superclass = Some(object);
            } else {
                table.symbol_mut(class).superclass = Some(base);
            }
        }
    }
}
