//! Well-known source-language (CLR) types and how they surface in JavaScript and TypeScript.
//!
//! ## Notes
//! - Only the types that change emission (numeric semantics, default values, declaration spellings) are listed.
//!   Every other type keeps its fully qualified name in emitted code.

/// Numeric category of a CLR type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    Integral,
    Floating,
}

/// Stable identifier for every well-known CLR type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClrTypeId {
    Void,
    Object,
    Boolean,
    Char,
    Byte,
    SByte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    Decimal,
    String,
}

/// Metadata for a well-known type.
#[derive(Debug, Clone, Copy)]
pub struct ClrTypeInfo {
    pub id: ClrTypeId,
    pub clr_name: &'static str,
    /// TypeScript spelling in declaration files.
    pub ts_name: &'static str,
    /// JavaScript literal for `default(T)`.
    pub default_literal: &'static str,
    /// JavaScript constructor used when the type appears as a value (`typeof`, `is`, casts).
    pub js_ctor: &'static str,
    pub numeric: Option<NumericKind>,
}

const fn ty(
    id: ClrTypeId,
    clr_name: &'static str,
    ts_name: &'static str,
    default_literal: &'static str,
    js_ctor: &'static str,
    numeric: Option<NumericKind>,
) -> ClrTypeInfo {
    ClrTypeInfo {
        id,
        clr_name,
        ts_name,
        default_literal,
        js_ctor,
        numeric,
    }
}

const INTEGRAL: Option<NumericKind> = Some(NumericKind::Integral);
const FLOATING: Option<NumericKind> = Some(NumericKind::Floating);

/// Registry of all well-known types.
pub const CLR_TYPES: &[ClrTypeInfo] = &[
    ty(ClrTypeId::Void, "System.Void", "void", "undefined", "Object", None),
    ty(ClrTypeId::Object, "System.Object", "any", "null", "Object", None),
    ty(ClrTypeId::Boolean, "System.Boolean", "boolean", "false", "Boolean", None),
    ty(ClrTypeId::Char, "System.Char", "number", "0", "Number", INTEGRAL),
    ty(ClrTypeId::Byte, "System.Byte", "number", "0", "Number", INTEGRAL),
    ty(ClrTypeId::SByte, "System.SByte", "number", "0", "Number", INTEGRAL),
    ty(ClrTypeId::Int16, "System.Int16", "number", "0", "Number", INTEGRAL),
    ty(ClrTypeId::UInt16, "System.UInt16", "number", "0", "Number", INTEGRAL),
    ty(ClrTypeId::Int32, "System.Int32", "number", "0", "Number", INTEGRAL),
    ty(ClrTypeId::UInt32, "System.UInt32", "number", "0", "Number", INTEGRAL),
    ty(ClrTypeId::Int64, "System.Int64", "number", "0", "Number", INTEGRAL),
    ty(ClrTypeId::UInt64, "System.UInt64", "number", "0", "Number", INTEGRAL),
    ty(ClrTypeId::Single, "System.Single", "number", "0", "Number", FLOATING),
    ty(ClrTypeId::Double, "System.Double", "number", "0", "Number", FLOATING),
    ty(ClrTypeId::Decimal, "System.Decimal", "number", "0", "Number", FLOATING),
    ty(ClrTypeId::String, "System.String", "string", "null", "String", None),
];

/// Resolve a fully qualified CLR name to a well-known type.
pub fn from_clr_name(name: &str) -> Option<ClrTypeId> {
    CLR_TYPES.iter().find(|info| info.clr_name == name).map(|info| info.id)
}

/// Look up metadata by id.
pub fn info_for(id: ClrTypeId) -> &'static ClrTypeInfo {
    CLR_TYPES
        .iter()
        .find(|info| info.id == id)
        .expect("INVARIANT: every ClrTypeId has a registry entry")
}

/// Numeric category of a type name, if it is a well-known numeric type.
pub fn numeric_kind(name: &str) -> Option<NumericKind> {
    from_clr_name(name).and_then(|id| info_for(id).numeric)
}

/// JavaScript literal for `default(T)`, if `T` is well-known.
pub fn default_literal(name: &str) -> Option<&'static str> {
    from_clr_name(name).map(|id| info_for(id).default_literal)
}

/// JavaScript value expression for a type name (well-known types map to built-in constructors).
pub fn js_type_expr(name: &str) -> String {
    if name.ends_with("[]") {
        return "Array".to_string();
    }
    match from_clr_name(name) {
        Some(id) => info_for(id).js_ctor.to_string(),
        None => name.to_string(),
    }
}

/// TypeScript spelling of a type name (arrays map element-wise, unknown types keep their name).
pub fn ts_type(name: &str) -> String {
    if let Some(element) = name.strip_suffix("[]") {
        return format!("{}[]", ts_type(element));
    }
    match from_clr_name(name) {
        Some(id) => info_for(id).ts_name.to_string(),
        None => name.to_string(),
    }
}
