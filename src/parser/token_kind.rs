//! Token kinds and the operator-precedence table.

/// All token kinds the expression builder understands.
///
/// Keywords that matter to expression structure (`new`, `instanceof`,
/// literal keywords) get their own kinds; every other word is an `Ident`.
/// Primitive type names are ordinary identifiers. The lexer maps its
/// internal logos tokens onto this enum; unlexable input becomes `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // trivia
    Whitespace,
    LineComment,
    BlockComment,

    // keywords
    NewKw,        // new
    InstanceofKw, // instanceof
    ThisKw,       // this
    SuperKw,      // super

    // literals and identifiers
    Ident,
    IntLit,    // 42, 0x2A
    LongLit,   // 42L
    FloatLit,  // 4.2f
    DoubleLit, // 4.2, 4e2, 4.2d
    CharLit,   // 'a'
    StringLit, // "abc"
    TrueLit,
    FalseLit,
    NullLit,

    // operators
    Assign,        // =
    PlusAssign,    // +=
    MinusAssign,   // -=
    StarAssign,    // *=
    SlashAssign,   // /=
    PercentAssign, // %=
    AmpAssign,     // &=
    PipeAssign,    // |=
    CaretAssign,   // ^=
    ShlAssign,     // <<=
    ShrAssign,     // >>=
    UshrAssign,    // >>>=
    Question,      // ?
    Colon,         // :
    PipePipe,      // ||
    AmpAmp,        // &&
    Pipe,          // |
    Caret,         // ^
    Amp,           // &
    EqEq,          // ==
    BangEq,        // !=
    Lt,            // <
    Gt,            // >
    LtEq,          // <=
    GtEq,          // >=
    Shl,           // <<
    Shr,           // >>
    Ushr,          // >>>
    Plus,          // +
    Minus,         // -
    Star,          // *
    Slash,         // /
    Percent,       // %
    Bang,          // !
    Tilde,         // ~
    PlusPlus,      // ++
    MinusMinus,    // --

    // punctuation
    Dot,       // .
    Comma,     // ,
    Semicolon, // ;
    LParen,    // (
    RParen,    // )
    LBracket,  // [
    RBracket,  // ]
    LBrace,    // {
    RBrace,    // }

    Error,
}

/// One entry of the precedence table.
///
/// Level 0 means "stop/reduce now"; the token never binds operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prec {
    pub level: u8,
    pub right_assoc: bool,
}

const fn left(level: u8) -> Prec {
    Prec {
        level,
        right_assoc: false,
    }
}

const fn right(level: u8) -> Prec {
    Prec {
        level,
        right_assoc: true,
    }
}

const STOP: Prec = left(0);

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::IntLit
                | TokenKind::LongLit
                | TokenKind::FloatLit
                | TokenKind::DoubleLit
                | TokenKind::CharLit
                | TokenKind::StringLit
                | TokenKind::TrueLit
                | TokenKind::FalseLit
                | TokenKind::NullLit
        )
    }

    /// Identifier-like tokens that can fill a variable position.
    pub fn is_name(self) -> bool {
        matches!(
            self,
            TokenKind::Ident | TokenKind::ThisKw | TokenKind::SuperKw
        )
    }

    pub fn is_assignment(self) -> bool {
        self.precedence().level == 1
    }

    /// Operators that can only appear in prefix (or postfix) position.
    pub fn is_unary_only(self) -> bool {
        matches!(
            self,
            TokenKind::Bang | TokenKind::Tilde | TokenKind::PlusPlus | TokenKind::MinusMinus
        )
    }

    /// Operators usable in binary (infix) position.
    pub fn is_binary_operator(self) -> bool {
        !self.is_unary_only() && self.precedence().level > 0
    }

    /// Operators that also work in prefix position (`-x`, `!done`).
    pub fn is_unary_prefix(self) -> bool {
        self.is_unary_only() || matches!(self, TokenKind::Plus | TokenKind::Minus)
    }

    /// The precedence-table entry for this token. Operators get their
    /// binding level; everything else is a stop entry.
    pub fn precedence(self) -> Prec {
        match self {
            // unary prefix
            TokenKind::Bang | TokenKind::Tilde | TokenKind::PlusPlus | TokenKind::MinusMinus => {
                right(13)
            }
            // multiplicative
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => left(12),
            // additive
            TokenKind::Plus | TokenKind::Minus => left(11),
            // shift
            TokenKind::Shl | TokenKind::Shr | TokenKind::Ushr => left(10),
            // relational
            TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::LtEq
            | TokenKind::GtEq
            | TokenKind::InstanceofKw => left(9),
            // equality
            TokenKind::EqEq | TokenKind::BangEq => left(8),
            // bitwise
            TokenKind::Amp => left(7),
            TokenKind::Caret => left(6),
            TokenKind::Pipe => left(5),
            // logical
            TokenKind::AmpAmp => left(4),
            TokenKind::PipePipe => left(3),
            // ternary
            TokenKind::Question | TokenKind::Colon => right(2),
            // assignment
            TokenKind::Assign
            | TokenKind::PlusAssign
            | TokenKind::MinusAssign
            | TokenKind::StarAssign
            | TokenKind::SlashAssign
            | TokenKind::PercentAssign
            | TokenKind::AmpAssign
            | TokenKind::PipeAssign
            | TokenKind::CaretAssign
            | TokenKind::ShlAssign
            | TokenKind::ShrAssign
            | TokenKind::UshrAssign => right(1),
            _ => STOP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_tokens_have_level_zero() {
        for kind in [
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::RParen,
            TokenKind::RBracket,
            TokenKind::RBrace,
            TokenKind::Ident,
        ] {
            assert_eq!(kind.precedence(), STOP);
        }
    }

    #[test]
    fn test_multiplicative_binds_tighter_than_additive() {
        assert!(TokenKind::Star.precedence().level > TokenKind::Plus.precedence().level);
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let p = TokenKind::Assign.precedence();
        assert_eq!(p.level, 1);
        assert!(p.right_assoc);
        assert!(!TokenKind::Plus.precedence().right_assoc);
    }

    #[test]
    fn test_instanceof_sits_with_relational() {
        assert_eq!(
            TokenKind::InstanceofKw.precedence().level,
            TokenKind::Lt.precedence().level
        );
    }
}
