//! Members of well-known library types that map directly onto JavaScript built-ins.

/// An intrinsic mapping from a CLR member (`Type.Member`) to a JavaScript expression.
#[derive(Debug, Clone, Copy)]
pub struct Intrinsic {
    pub clr_member: &'static str,
    pub js: &'static str,
}

const fn intrinsic(clr_member: &'static str, js: &'static str) -> Intrinsic {
    Intrinsic { clr_member, js }
}

/// Registry of intrinsic members.
pub const INTRINSICS: &[Intrinsic] = &[
    intrinsic("System.Console.WriteLine", "console.log"),
    intrinsic("System.Math.Abs", "Math.abs"),
    intrinsic("System.Math.Max", "Math.max"),
    intrinsic("System.Math.Min", "Math.min"),
    intrinsic("System.Math.Floor", "Math.floor"),
    intrinsic("System.Math.Ceiling", "Math.ceil"),
    intrinsic("System.Math.Sqrt", "Math.sqrt"),
    intrinsic("System.Math.Pow", "Math.pow"),
    intrinsic("System.Math.PI", "Math.PI"),
];

/// All registered intrinsic members, in registry order.
pub fn all() -> impl Iterator<Item = &'static Intrinsic> {
    INTRINSICS.iter()
}

/// JavaScript replacement for a fully qualified CLR member name.
pub fn lookup(clr_member: &str) -> Option<&'static str> {
    INTRINSICS
        .iter()
        .find(|i| i.clr_member == clr_member)
        .map(|i| i.js)
}
