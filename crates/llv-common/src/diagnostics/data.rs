//! Diagnostic message table.
//!
//! Templates use `{0}`, `{1}`, ... placeholders filled by `format_message`.

use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    pub const METHOD_DEFINITION_IN_BODY: u32 = 1001;
    pub const LOCAL_VARIABLE_MODIFIERS: u32 = 1002;
    pub const DUPLICATE_VARIABLE: u32 = 1003;
    pub const THIS_IN_CONSTRUCTOR: u32 = 1004;
    pub const BITWISE_OR: u32 = 1005;
    pub const BITWISE_AND: u32 = 1006;
    pub const BITWISE_XOR: u32 = 1007;
    pub const BITWISE_NOT: u32 = 1008;
    pub const BIT_SHIFT: u32 = 1009;
    pub const CONSTRUCT_NOT_AT_LEVEL: u32 = 1010;
    pub const TRY_CATCH_OUTSIDE_BODY: u32 = 1011;
    pub const INITIALIZER_AT_CLASS_SCOPE: u32 = 1012;
    pub const DUPLICATE_CLASS: u32 = 1013;
    pub const DUPLICATE_PARAMETER: u32 = 1014;
    pub const DUPLICATE_FIELD: u32 = 1015;
    pub const CONSTRUCTOR_NAME_MISMATCH: u32 = 1016;
    pub const CLASS_EXTENDS_INTERFACE: u32 = 1017;
    pub const IMPLEMENTS_CLASS: u32 = 1018;
    pub const NESTING_TOO_DEEP: u32 = 1019;
    pub const UNRESOLVED_SYMBOL: u32 = 2001;
    pub const EXTERNAL_COMPILER: u32 = 9001;
}

pub mod diagnostic_messages {
    pub const METHOD_DEFINITION_IN_BODY: &str =
        "Methods definitions cannot appear within the body of another method or block.";
    pub const LOCAL_VARIABLE_MODIFIERS: &str =
        "You cannot use {0}to declare a local variable at the {1} level";
    pub const DUPLICATE_VARIABLE: &str = "You cannot have two variables with the same name.";
    pub const THIS_IN_CONSTRUCTOR: &str =
        "You cannot reference the field 'this' inside a constructor at the {0} Level";
    pub const BITWISE_OR: &str = "Bitwise or expressions cannot be used at any language level.  Perhaps you meant to compare two values using regular or (||)";
    pub const BITWISE_AND: &str = "Bitwise and expressions cannot be used at any language level.  Perhaps you meant to compare two values using regular and (&&)";
    pub const BITWISE_XOR: &str = "Bitwise xor expressions cannot be used at any language level";
    pub const BITWISE_NOT: &str = "Bitwise not expressions cannot be used at any language level.  Perhaps you meant to negate this value using regular not (!)";
    pub const BIT_SHIFT: &str = "Bit shifting operators cannot be used at any language level";
    pub const CONSTRUCT_NOT_AT_LEVEL: &str = "{0} cannot be used at the {1} level";
    pub const TRY_CATCH_OUTSIDE_BODY: &str =
        "A try-catch statement can only appear inside the body of a method or block";
    pub const INITIALIZER_AT_CLASS_SCOPE: &str =
        "This open brace must mark the beginning of a method or class body";
    pub const DUPLICATE_CLASS: &str = "The class or interface {0} has already been defined";
    pub const DUPLICATE_PARAMETER: &str =
        "You cannot have two method parameters with the same name";
    pub const DUPLICATE_FIELD: &str = "You cannot have two fields with the same name: {0}";
    pub const CONSTRUCTOR_NAME_MISMATCH: &str =
        "The constructor name {0} must match the name of its class {1}";
    pub const CLASS_EXTENDS_INTERFACE: &str =
        "{0} is an interface and cannot be extended by the class {1}";
    pub const IMPLEMENTS_CLASS: &str = "{0} is a class and cannot appear in the interface list of {1}";
    pub const NESTING_TOO_DEEP: &str = "This construct is nested more than {0} levels deep";
    pub const UNRESOLVED_SYMBOL: &str = "Could not resolve symbol {0}";
}

use diagnostic_codes as c;
use diagnostic_messages as m;

const fn error(code: u32, message: &'static str) -> DiagnosticMessage {
    DiagnosticMessage {
        code,
        category: DiagnosticCategory::Error,
        message,
    }
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    error(c::METHOD_DEFINITION_IN_BODY, m::METHOD_DEFINITION_IN_BODY),
    error(c::LOCAL_VARIABLE_MODIFIERS, m::LOCAL_VARIABLE_MODIFIERS),
    error(c::DUPLICATE_VARIABLE, m::DUPLICATE_VARIABLE),
    error(c::THIS_IN_CONSTRUCTOR, m::THIS_IN_CONSTRUCTOR),
    error(c::BITWISE_OR, m::BITWISE_OR),
    error(c::BITWISE_AND, m::BITWISE_AND),
    error(c::BITWISE_XOR, m::BITWISE_XOR),
    error(c::BITWISE_NOT, m::BITWISE_NOT),
    error(c::BIT_SHIFT, m::BIT_SHIFT),
    error(c::CONSTRUCT_NOT_AT_LEVEL, m::CONSTRUCT_NOT_AT_LEVEL),
    error(c::TRY_CATCH_OUTSIDE_BODY, m::TRY_CATCH_OUTSIDE_BODY),
    error(c::INITIALIZER_AT_CLASS_SCOPE, m::INITIALIZER_AT_CLASS_SCOPE),
    error(c::DUPLICATE_CLASS, m::DUPLICATE_CLASS),
    error(c::DUPLICATE_PARAMETER, m::DUPLICATE_PARAMETER),
    error(c::DUPLICATE_FIELD, m::DUPLICATE_FIELD),
    error(c::CONSTRUCTOR_NAME_MISMATCH, m::CONSTRUCTOR_NAME_MISMATCH),
    error(c::CLASS_EXTENDS_INTERFACE, m::CLASS_EXTENDS_INTERFACE),
    error(c::IMPLEMENTS_CLASS, m::IMPLEMENTS_CLASS),
    error(c::NESTING_TOO_DEEP, m::NESTING_TOO_DEEP),
    error(c::UNRESOLVED_SYMBOL, m::UNRESOLVED_SYMBOL),
];
