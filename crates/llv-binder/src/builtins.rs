//! Symbols every table starts with.

use crate::symbols::TypeRef;
use crate::table::SymbolTable;

/// Primitive type names, registered unqualified.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// Classes of the implicitly imported `java.lang` package.
pub const JAVA_LANG_CLASSES: &[&str] = &[
    "java.lang.Object",
    "java.lang.String",
    "java.lang.Integer",
    "java.lang.Double",
    "java.lang.Boolean",
    "java.lang.Character",
    "java.lang.Math",
    "java.lang.System",
    "java.lang.Throwable",
    "java.lang.Exception",
    "java.lang.RuntimeException",
    "java.lang.Error",
];

/// Interfaces of the implicitly imported `java.lang` package.
pub const JAVA_LANG_INTERFACES: &[&str] = &[
    "java.lang.Runnable",
    "java.lang.Comparable",
    "java.lang.CharSequence",
    "java.lang.Cloneable",
];

const OBJECT: &str = "java.lang.Object";

pub fn is_primitive(name: &str) -> bool {
    PRIMITIVE_TYPES.contains(&name)
}

pub(crate) fn seed(table: &mut SymbolTable) {
    for name in PRIMITIVE_TYPES {
        table.add_builtin(name, true);
    }
    let object = table.add_builtin(OBJECT, false);
    for name in JAVA_LANG_CLASSES.iter().filter(|&&n| n != OBJECT) {
        let id = table.add_builtin(name, false);
        table.symbol_mut(id).superclass = Some(TypeRef {
            name: OBJECT.to_string(),
            resolved: Some(object),
        });
    }
    for name in JAVA_LANG_INTERFACES {
        let id = table.add_builtin(name, false);
        table.symbol_mut(id).is_interface = true;
    }
}
