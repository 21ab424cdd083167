//! Runtime conventions of generated JavaScript (well-known identifiers and file naming).

/// Runtime entry point for type registration.
pub const DEFINE: &str = "Bridge.define";

/// Header prepended to beautified JavaScript files.
pub const JS_FILE_HEADER: &str = "/* global Bridge */\n\n";

/// Extension of JavaScript outputs (without the dot).
pub const JS_EXTENSION: &str = "js";

/// Marker inserted before the extension of minified outputs (`app.min.js`).
pub const MINIFIED_MARKER: &str = "min";

/// Extension of declaration side outputs.
pub const DECLARATION_EXTENSION: &str = "d.ts";

/// Conditional-compilation symbol that is always defined.
pub const DEFAULT_DEFINE_CONSTANT: &str = "BRIDGE";

/// Object-literal keys understood by `Bridge.define`.
pub const INHERITS_KEY: &str = "inherits";
pub const STATICS_KEY: &str = "statics";
pub const CONFIG_KEY: &str = "config";
pub const PROPERTIES_KEY: &str = "properties";
pub const INIT_KEY: &str = "init";
pub const CONSTRUCTOR_KEY: &str = "constructor";
/// Prototype alias of the first constructor, the target of chained `base()`/`this()` calls.
pub const CONSTRUCTOR_ALIAS: &str = "$constructor";
pub const ENUM_MARKER: &str = "$enum";
pub const INTERFACE_MARKER: &str = "$interface";
pub const STRUCT_MARKER: &str = "$struct";

/// Runtime helpers used by expression emission.
pub const INT_DIV: &str = "Bridge.Int.div";
pub const INT_TRUNC: &str = "Bridge.Int.trunc";
pub const IS: &str = "Bridge.is";
pub const AS: &str = "Bridge.as";
pub const CAST: &str = "Bridge.cast";
pub const GET_DEFAULT_VALUE: &str = "Bridge.getDefaultValue";
pub const GET_ENUMERATOR: &str = "Bridge.getEnumerator";
pub const COALESCE: &str = "Bridge.coalesce";
pub const FN_BIND: &str = "Bridge.fn.bind";

/// Enumerator protocol used by `foreach` lowering.
pub const MOVE_NEXT: &str = "moveNext";
pub const GET_CURRENT: &str = "getCurrent";

/// Prefix for synthesized temporaries (`$t`, `$t1`, ...); cannot clash with source identifiers.
pub const TEMP_PREFIX: char = '$';

/// Property accessor prefixes (`getName` / `setName`).
pub const GETTER_PREFIX: &str = "get";
pub const SETTER_PREFIX: &str = "set";

/// Separator between a member name and its overload ordinal (`add$1`).
pub const OVERLOAD_SEPARATOR: char = '$';
