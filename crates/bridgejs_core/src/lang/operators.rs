//! Operator vocabulary of emitted JavaScript.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Equality is always emitted strict (`===` / `!==`); the loose spellings are not part of the registry.
//! - Precedence follows the JavaScript grammar; the emitter uses it to decide where grouping parentheses go.

/// Define whether an operator is infix (binary), prefix or postfix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixity {
    Infix,
    Prefix,
    Postfix,
}

/// Stable identifier for every emitted operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Comparison
    StrictEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical / bitwise
    AndAnd,
    OrOr,
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,

    // Unary
    Bang,
    Tilde,
    UnaryPlus,
    UnaryMinus,
    Increment,
    Decrement,

    // Assignment
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    AmpAssign,
    PipeAssign,
    CaretAssign,
    ShlAssign,
    ShrAssign,
}

/// Define how operators of the same precedence group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

/// Metadata for an operator.
///
/// ## Notes
/// - `precedence` is a relative ordering where higher binds tighter.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spelling: &'static str,
    pub precedence: u8,
    pub associativity: Associativity,
    pub fixity: Fixity,
}

/// Precedence of assignments, `?:` and arrow functions.
pub const ASSIGNMENT_PRECEDENCE: u8 = 20;
/// Precedence of `??`, which JavaScript places level with `||`.
pub const COALESCE_PRECEDENCE: u8 = 30;
/// Precedence of calls, member access and `new` with arguments.
pub const CALL_PRECEDENCE: u8 = 170;
/// Literals, names and parenthesized expressions.
pub const PRIMARY_PRECEDENCE: u8 = 180;

const fn op(
    id: OperatorId,
    spelling: &'static str,
    precedence: u8,
    associativity: Associativity,
    fixity: Fixity,
) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        precedence,
        associativity,
        fixity,
    }
}

const fn infix(id: OperatorId, spelling: &'static str, precedence: u8) -> OperatorInfo {
    op(id, spelling, precedence, Associativity::Left, Fixity::Infix)
}

const fn prefix(id: OperatorId, spelling: &'static str) -> OperatorInfo {
    op(id, spelling, 140, Associativity::Right, Fixity::Prefix)
}

const fn assign(id: OperatorId, spelling: &'static str) -> OperatorInfo {
    op(id, spelling, ASSIGNMENT_PRECEDENCE, Associativity::Right, Fixity::Infix)
}

/// Registry of all operators.
pub const OPERATORS: &[OperatorInfo] = &[
    infix(OperatorId::Plus, "+", 110),
    infix(OperatorId::Minus, "-", 110),
    infix(OperatorId::Star, "*", 120),
    infix(OperatorId::Slash, "/", 120),
    infix(OperatorId::Percent, "%", 120),
    infix(OperatorId::StrictEq, "===", 80),
    infix(OperatorId::StrictNotEq, "!==", 80),
    infix(OperatorId::Lt, "<", 90),
    infix(OperatorId::LtEq, "<=", 90),
    infix(OperatorId::Gt, ">", 90),
    infix(OperatorId::GtEq, ">=", 90),
    infix(OperatorId::AndAnd, "&&", 40),
    infix(OperatorId::OrOr, "||", 30),
    infix(OperatorId::Amp, "&", 70),
    infix(OperatorId::Pipe, "|", 50),
    infix(OperatorId::Caret, "^", 60),
    infix(OperatorId::Shl, "<<", 100),
    infix(OperatorId::Shr, ">>", 100),
    prefix(OperatorId::Bang, "!"),
    prefix(OperatorId::Tilde, "~"),
    prefix(OperatorId::UnaryPlus, "+"),
    prefix(OperatorId::UnaryMinus, "-"),
    prefix(OperatorId::Increment, "++"),
    prefix(OperatorId::Decrement, "--"),
    assign(OperatorId::Assign, "="),
    assign(OperatorId::PlusAssign, "+="),
    assign(OperatorId::MinusAssign, "-="),
    assign(OperatorId::StarAssign, "*="),
    assign(OperatorId::SlashAssign, "/="),
    assign(OperatorId::PercentAssign, "%="),
    assign(OperatorId::AmpAssign, "&="),
    assign(OperatorId::PipeAssign, "|="),
    assign(OperatorId::CaretAssign, "^="),
    assign(OperatorId::ShlAssign, "<<="),
    assign(OperatorId::ShrAssign, ">>="),
];

/// Look up operator metadata by id.
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    OPERATORS
        .iter()
        .find(|info| info.id == id)
        .expect("INVARIANT: every OperatorId has a registry entry")
}

/// Return the spelling of an operator.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).spelling
}

/// Return the precedence of an operator (higher binds tighter).
pub fn precedence(id: OperatorId) -> u8 {
    info_for(id).precedence
}

/// Resolve an infix spelling back to its operator id.
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS
        .iter()
        .find(|info| info.spelling == spelling && info.fixity == Fixity::Infix)
        .map(|info| info.id)
}

/// Compound-assignment form of a binary operator (`+` → `+=`), if JavaScript has one.
pub fn compound_assignment(id: OperatorId) -> Option<OperatorId> {
    Some(match id {
        OperatorId::Plus => OperatorId::PlusAssign,
        OperatorId::Minus => OperatorId::MinusAssign,
        OperatorId::Star => OperatorId::StarAssign,
        OperatorId::Slash => OperatorId::SlashAssign,
        OperatorId::Percent => OperatorId::PercentAssign,
        OperatorId::Amp => OperatorId::AmpAssign,
        OperatorId::Pipe => OperatorId::PipeAssign,
        OperatorId::Caret => OperatorId::CaretAssign,
        OperatorId::Shl => OperatorId::ShlAssign,
        OperatorId::Shr => OperatorId::ShrAssign,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_assignment_spellings() {
        let compound = compound_assignment(OperatorId::Plus).unwrap();
        assert_eq!(as_str(compound), "+=");
        assert_eq!(compound_assignment(OperatorId::AndAnd), None);
    }

    #[test]
    fn precedence_follows_javascript() {
        assert!(precedence(OperatorId::Star) > precedence(OperatorId::Plus));
        assert!(precedence(OperatorId::Plus) > precedence(OperatorId::Shl));
        assert!(precedence(OperatorId::Amp) > precedence(OperatorId::Caret));
        assert!(precedence(OperatorId::Caret) > precedence(OperatorId::Pipe));
        assert!(precedence(OperatorId::AndAnd) > precedence(OperatorId::OrOr));
        assert_eq!(precedence(OperatorId::OrOr), COALESCE_PRECEDENCE);
        assert_eq!(precedence(OperatorId::MinusAssign), ASSIGNMENT_PRECEDENCE);
        assert_eq!(info_for(OperatorId::Assign).associativity, Associativity::Right);
        assert!(precedence(OperatorId::Bang) < CALL_PRECEDENCE);
    }

    #[test]
    fn prefix_spellings_do_not_shadow_infix_lookup() {
        assert_eq!(from_str("+"), Some(OperatorId::Plus));
        assert_eq!(from_str("-"), Some(OperatorId::Minus));
    }
}
