//! Error code catalog.
//!
//! Format: E#### where the first digit names the stage:
//! - E0xxx: lexer and preprocessor
//! - E1xxx: parser
//! - E2xxx: semantic validation
//! - E3xxx: program linkage
//! - E9xxx: internal compiler errors
//!
//! Each code also carries a symbolic name (`UNKNOWN_VAR`) that appears in
//! host console output.

use std::fmt;
use std::str::FromStr;

macro_rules! error_codes {
    ($($(#[doc = $doc:literal])* $code:ident => $name:literal,)*) => {
        /// Error codes for all compiler diagnostics.
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
        pub enum ErrorCode {
            $($(#[doc = $doc])* $code,)*
        }

        impl ErrorCode {
            /// Every code, in catalog order.
            pub const ALL: &'static [ErrorCode] = &[$(ErrorCode::$code,)*];

            /// The `E####` form.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(ErrorCode::$code => stringify!($code),)*
                }
            }

            /// Symbolic name, e.g. `UNKNOWN_VAR`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(ErrorCode::$code => $name,)*
                }
            }
        }
    };
}

error_codes! {
    // Lexer and preprocessor (E0xxx)
    /// Character that cannot start any token
    E0001 => "INVALID_CHARACTER",
    /// Malformed or out-of-range number literal
    E0002 => "INVALID_NUMBER",
    /// Reserved word used as an identifier
    E0003 => "RESERVED_WORD",
    /// Block comment without closing `*/`
    E0004 => "UNTERMINATED_COMMENT",
    /// Source larger than 4 GiB
    E0005 => "SOURCE_TOO_LARGE",
    /// Malformed preprocessor directive
    E0010 => "CPP_SYNTAX_ERROR",
    /// `#error` directive
    E0011 => "CPP_ERROR_ERROR",
    /// Unknown preprocessor directive
    E0012 => "CPP_UNKNOWN_DIRECTIVE",
    /// `#version` after other tokens
    E0013 => "CPP_VERSION_NOT_FIRST",
    /// `#version` other than 100
    E0014 => "CPP_VERSION_UNSUPPORTED",
    /// Required extension not supported
    E0015 => "CPP_EXTENSION_NOT_SUPPORTED",
    /// Requested extension not supported (warning)
    E0016 => "CPP_EXTENSION_WARN_NOT_SUPPORTED",
    /// Illegal `#extension` behavior
    E0017 => "CPP_EXTENSION_DIRECTIVE_ERROR",
    /// Macro redefined with a different body
    E0018 => "CPP_MACRO_MISMATCH",
    /// Predefined or reserved macro name redefined
    E0019 => "CPP_DUPLICATE_DEFINE",
    /// Unbalanced `#if` / `#else` / `#endif`
    E0020 => "CPP_UNBALANCED_CONDITIONAL",
    /// Macro invoked with the wrong number of arguments
    E0021 => "CPP_MACRO_ARGUMENTS",

    // Parser (E1xxx)
    /// Unexpected token
    E1001 => "SYNTAX_ERROR",
    /// Expected expression
    E1002 => "EXPECTED_EXPRESSION",
    /// Expected identifier
    E1003 => "EXPECTED_IDENTIFIER",
    /// Expected type
    E1004 => "EXPECTED_TYPE",
    /// Declaration form the grammar does not allow
    E1005 => "INVALID_DECLARATION",
    /// Reserved operator such as `%` or `<<`
    E1006 => "RESERVED_OPERATOR",
    /// Unexpected end of input
    E1007 => "UNEXPECTED_EOF",

    // Semantic validation (E2xxx)
    /// No `main` function
    E2001 => "MISSING_MAIN_FUNCTION",
    /// Reserved `webgl_`, `_webgl_` or `gl_` identifier
    E2002 => "ILLEGAL_NAME",
    /// Identifier longer than 256 characters
    E2003 => "OVERLONG_IDENTIFIER",
    /// Name declared twice in one scope
    E2004 => "DUPLICATE_NAME",
    /// Unknown variable
    E2005 => "UNKNOWN_VAR",
    /// Unknown type name
    E2006 => "UNKNOWN_TYPE",
    /// Float declaration without precision in a fragment shader
    E2007 => "MISSING_PRECISION_DECL",
    /// Default precision for a type that takes none
    E2008 => "ILLEGAL_PRECISION_DECL",
    /// Operand shapes that no operator overload accepts
    E2009 => "UNSUPPORTED_ARGUMENT_COMBINATION",
    /// Type mismatch
    E2010 => "TYPE_MISMATCH",
    /// Type not allowed here
    E2011 => "ILLEGAL_TYPE",
    /// Operator applied to an array or sampler
    E2012 => "ILLEGAL_TYPE_USE",
    /// Conditional expression with a non-bool condition
    E2013 => "INVALID_COND_EXPR",
    /// Conditional expression with differently typed branches
    E2014 => "INVALID_COND_MISMATCH",
    /// Unknown swizzle component
    E2015 => "UNKNOWN_VECTOR_SELECTOR",
    /// Swizzle mixing component sets or reaching past the vector
    E2016 => "ILLEGAL_VECTOR_SELECTOR",
    /// Unknown struct field
    E2017 => "UNKNOWN_FIELD",
    /// Assignment to a read-only variable
    E2018 => "ILLEGAL_VAR_NOT_WRITEABLE",
    /// Assignment to a varying in a fragment shader
    E2019 => "ILLEGAL_VARYING_VAR_NOT_WRITEABLE",
    /// Constructor of a type that cannot be constructed
    E2020 => "INVALID_TYPE_CONSTRUCTOR",
    /// Constructor arguments of the wrong shape or count
    E2021 => "INVALID_CONSTRUCTOR_ARG",
    /// No function overload matches the arguments
    E2022 => "MISMATCHED_FUNCTION_APPLICATION",
    /// `out` / `inout` argument that is not an l-value
    E2023 => "ILLEGAL_REFERENCE_ARGUMENT",
    /// Direct or mutual recursion
    E2024 => "ILLEGAL_RECURSIVE_CALL",
    /// User function redefining a builtin signature
    E2025 => "ILLEGAL_BUILTIN_OVERRIDE",
    /// Constant array index out of range
    E2026 => "INDEX_OUT_OF_BOUNDS_ARRAY",
    /// Constant vector or matrix index out of range
    E2027 => "INDEX_OUT_OF_BOUNDS_VECTOR",
    /// Non-constant uniform index in a fragment shader
    E2028 => "INDEX_NON_CONSTANT_FRAGMENT",
    /// Non-bool `if` / `while` / `do` predicate
    E2029 => "INVALID_PREDICATE_TYPE",
    /// `discard` outside a fragment shader
    E2030 => "ILLEGAL_DISCARD_STMT",
    /// Statement not allowed here
    E2031 => "INVALID_STMT",
    /// Loop header outside the GLSL ES Appendix A form
    E2032 => "INVALID_LOOP_HEADER",
    /// Loop condition outside the GLSL ES Appendix A form
    E2033 => "INVALID_LOOP_CONDITION",
    /// Loop without an update expression
    E2034 => "MISSING_LOOP_UPDATE",
    /// Loop update outside the GLSL ES Appendix A form
    E2035 => "INVALID_LOOP_UPDATE",
    /// Loop that never terminates
    E2036 => "INVALID_LOOP_NONTERMINATION",
    /// Expression must be constant
    E2037 => "EXPRESSION_NOT_CONSTANT",
    /// Array of size zero
    E2038 => "ARRAY_SIZE_IS_ZERO",
    /// Array declared without a size
    E2039 => "ILLEGAL_UNSIZED_ARRAY_DECL",
    /// Struct field array with a non-constant size
    E2040 => "ILLEGAL_NON_CONSTANT_ARRAY",
    /// Struct without fields
    E2041 => "EMPTY_STRUCT",
    /// Struct defined inside a struct
    E2042 => "ILLEGAL_NESTED_STRUCT",
    /// Attribute declared in a fragment shader
    E2043 => "INVALID_ATTRIBUTE_DECL",
    /// Attribute declared in a local scope
    E2044 => "INVALID_LOCAL_ATTRIBUTE_DECL",
    /// Uniform declared in a local scope
    E2045 => "INVALID_LOCAL_UNIFORM_DECL",
    /// Varying declared in a local scope
    E2046 => "INVALID_LOCAL_VARYING_DECL",
    /// Attribute of a type other than float, vec or mat
    E2047 => "INVALID_ATTRIBUTE_DECL_TYPE",
    /// Varying of a type other than float, vec, mat or arrays of these
    E2048 => "INVALID_VARYING_DECL_TYPE",
    /// Invariant declaration on something other than an output
    E2049 => "ILLEGAL_INVARIANT_DECL",
    /// Function defined inside a function
    E2050 => "ILLEGAL_NESTED_FUNCTION",
    /// Function returning an array
    E2051 => "ILLEGAL_RETURN_TYPE",
    /// Assignment target is not an l-value
    E2052 => "INVALID_LVALUE",
    /// Function redefined, or overloaded only on return type
    E2053 => "ILLEGAL_FUNCTION_OVERLOAD",
    /// Call of something that is not a function
    E2054 => "INVALID_CALL_EXPR",
    /// Parameter of an illegal type
    E2055 => "ILLEGAL_ARGUMENT_TYPE",
    /// `main` with a wrong signature
    E2056 => "INVALID_FUNCTION_DEFN",
    /// Index into a non-indexable value, or with a non-int index
    E2057 => "ILLEGAL_INDEX_EXPR",
    /// Field selection on a value without fields
    E2058 => "ILLEGAL_SELECT_EXPR",
    /// Builtin that needs an extension which is not enabled
    E2059 => "EXTENSION_REQUIRED",
    /// Layout qualifier, unsupported in GLSL ES 1.00
    E2060 => "ILLEGAL_LAYOUT",
    /// Non-void function whose body can fall off the end
    E2061 => "MISSING_RETURN",

    // Linkage (E3xxx)
    /// Uniform declared with different types in two shaders
    E3001 => "INCOMPATIBLE_UNIFORM_DECL",
    /// Varying declared with different types in two shaders
    E3002 => "INCOMPATIBLE_VARYING_DECL",
    /// Attribute declared with different types in two shaders
    E3003 => "INCOMPATIBLE_ATTRIBUTE_DECL",
    /// Two different variables mapped to the same alias
    E3004 => "ALIAS_OVERLAP",
    /// Varying read by the fragment shader but never written (warning)
    E3005 => "VARYING_NOT_WRITTEN",

    // Internal (E9xxx)
    /// Internal invariant violated
    E9001 => "INTERNAL_ERROR",
}

impl ErrorCode {
    pub fn is_lexer_error(self) -> bool {
        self.as_str().starts_with("E0")
    }

    pub fn is_parser_error(self) -> bool {
        self.as_str().starts_with("E1")
    }

    pub fn is_semantic_error(self) -> bool {
        self.as_str().starts_with("E2")
    }

    pub fn is_linkage_error(self) -> bool {
        self.as_str().starts_with("E3")
    }

    pub fn is_internal_error(self) -> bool {
        self.as_str().starts_with("E9")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownErrorCode(pub String);

impl fmt::Display for UnknownErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown error code `{}`", self.0)
    }
}

impl std::error::Error for UnknownErrorCode {}

impl FromStr for ErrorCode {
    type Err = UnknownErrorCode;

    /// Accepts both the `E####` form and the symbolic name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s || code.name() == s)
            .ok_or_else(|| UnknownErrorCode(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E1001.to_string(), "E1001");
        assert_eq!(ErrorCode::E2005.name(), "UNKNOWN_VAR");
    }

    #[test]
    fn test_stage_classification() {
        assert!(ErrorCode::E0015.is_lexer_error());
        assert!(ErrorCode::E1002.is_parser_error());
        assert!(ErrorCode::E2036.is_semantic_error());
        assert!(ErrorCode::E3001.is_linkage_error());
        assert!(ErrorCode::E9001.is_internal_error());
        assert!(!ErrorCode::E2001.is_lexer_error());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("E2024".parse::<ErrorCode>(), Ok(ErrorCode::E2024));
        assert_eq!(
            "ILLEGAL_RECURSIVE_CALL".parse::<ErrorCode>(),
            Ok(ErrorCode::E2024)
        );
        assert!("E7777".parse::<ErrorCode>().is_err());
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = ErrorCode::ALL.iter().map(|c| c.name()).collect();
        names.sort_unstable();
        let total = names.len();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
