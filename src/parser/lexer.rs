//! Logos-based lexer for the analyzed language's expression tokens.
//!
//! Fast tokenization using the logos crate. The output is the
//! `(kind, text, offset)` triple the expression builder consumes.

use logos::Logos;
use text_size::TextSize;

use crate::core::IStr;

use super::token_kind::TokenKind;

/// A token with its kind, text, and source offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: IStr,
    pub offset: TextSize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<IStr>, offset: TextSize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }

    pub fn len(&self) -> TextSize {
        TextSize::of(&*self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Offset one past the last character of the token.
    pub fn end(&self) -> TextSize {
        self.offset + self.len()
    }
}

/// Lexer wrapping the logos-generated tokenizer.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => TokenKind::Error,
        };

        Some(Token::new(kind, text, offset))
    }
}

/// Tokenize a string, dropping trivia.
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input)
        .filter(|t| !t.kind.is_trivia())
        .collect()
}

/// Logos token enum - maps to TokenKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*[^/])*\*/")]
    BlockComment,

    // =========================================================================
    // KEYWORDS (token patterns outrank the Ident regex)
    // =========================================================================
    #[token("new")]
    NewKw,

    #[token("instanceof")]
    InstanceofKw,

    #[token("this")]
    ThisKw,

    #[token("super")]
    SuperKw,

    #[token("true")]
    TrueLit,

    #[token("false")]
    FalseLit,

    #[token("null")]
    NullLit,

    // =========================================================================
    // LITERALS AND IDENTIFIERS
    // =========================================================================
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Ident,

    #[regex(r"([0-9]+\.[0-9]*([eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+)[dD]?|[0-9]+[dD]")]
    DoubleLit,

    #[regex(r"([0-9]+\.[0-9]*([eE][+-]?[0-9]+)?|[0-9]+)[fF]")]
    FloatLit,

    #[regex(r"([0-9]+|0[xX][0-9a-fA-F]+)[lL]")]
    LongLit,

    #[regex(r"[0-9]+|0[xX][0-9a-fA-F]+")]
    IntLit,

    #[regex(r"'([^'\\\n]|\\.)*'")]
    CharLit,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    StringLit,

    // =========================================================================
    // MULTI-CHARACTER OPERATORS (longest match wins)
    // =========================================================================
    #[token(">>>=")]
    UshrAssign,
    #[token("<<=")]
    ShlAssign,
    #[token(">>=")]
    ShrAssign,
    #[token(">>>")]
    Ushr,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,
    #[token("%=")]
    PercentAssign,
    #[token("&=")]
    AmpAssign,
    #[token("|=")]
    PipeAssign,
    #[token("^=")]
    CaretAssign,

    // =========================================================================
    // SINGLE-CHARACTER OPERATORS AND PUNCTUATION
    // =========================================================================
    #[token("=")]
    Assign,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
}

impl From<LogosToken> for TokenKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => TokenKind::Whitespace,
            LogosToken::LineComment => TokenKind::LineComment,
            LogosToken::BlockComment => TokenKind::BlockComment,
            LogosToken::NewKw => TokenKind::NewKw,
            LogosToken::InstanceofKw => TokenKind::InstanceofKw,
            LogosToken::ThisKw => TokenKind::ThisKw,
            LogosToken::SuperKw => TokenKind::SuperKw,
            LogosToken::TrueLit => TokenKind::TrueLit,
            LogosToken::FalseLit => TokenKind::FalseLit,
            LogosToken::NullLit => TokenKind::NullLit,
            LogosToken::Ident => TokenKind::Ident,
            LogosToken::DoubleLit => TokenKind::DoubleLit,
            LogosToken::FloatLit => TokenKind::FloatLit,
            LogosToken::LongLit => TokenKind::LongLit,
            LogosToken::IntLit => TokenKind::IntLit,
            LogosToken::CharLit => TokenKind::CharLit,
            LogosToken::StringLit => TokenKind::StringLit,
            LogosToken::UshrAssign => TokenKind::UshrAssign,
            LogosToken::ShlAssign => TokenKind::ShlAssign,
            LogosToken::ShrAssign => TokenKind::ShrAssign,
            LogosToken::Ushr => TokenKind::Ushr,
            LogosToken::Shl => TokenKind::Shl,
            LogosToken::Shr => TokenKind::Shr,
            LogosToken::EqEq => TokenKind::EqEq,
            LogosToken::BangEq => TokenKind::BangEq,
            LogosToken::LtEq => TokenKind::LtEq,
            LogosToken::GtEq => TokenKind::GtEq,
            LogosToken::AmpAmp => TokenKind::AmpAmp,
            LogosToken::PipePipe => TokenKind::PipePipe,
            LogosToken::PlusPlus => TokenKind::PlusPlus,
            LogosToken::MinusMinus => TokenKind::MinusMinus,
            LogosToken::PlusAssign => TokenKind::PlusAssign,
            LogosToken::MinusAssign => TokenKind::MinusAssign,
            LogosToken::StarAssign => TokenKind::StarAssign,
            LogosToken::SlashAssign => TokenKind::SlashAssign,
            LogosToken::PercentAssign => TokenKind::PercentAssign,
            LogosToken::AmpAssign => TokenKind::AmpAssign,
            LogosToken::PipeAssign => TokenKind::PipeAssign,
            LogosToken::CaretAssign => TokenKind::CaretAssign,
            LogosToken::Assign => TokenKind::Assign,
            LogosToken::Lt => TokenKind::Lt,
            LogosToken::Gt => TokenKind::Gt,
            LogosToken::Plus => TokenKind::Plus,
            LogosToken::Minus => TokenKind::Minus,
            LogosToken::Star => TokenKind::Star,
            LogosToken::Slash => TokenKind::Slash,
            LogosToken::Percent => TokenKind::Percent,
            LogosToken::Amp => TokenKind::Amp,
            LogosToken::Pipe => TokenKind::Pipe,
            LogosToken::Caret => TokenKind::Caret,
            LogosToken::Bang => TokenKind::Bang,
            LogosToken::Tilde => TokenKind::Tilde,
            LogosToken::Question => TokenKind::Question,
            LogosToken::Colon => TokenKind::Colon,
            LogosToken::Dot => TokenKind::Dot,
            LogosToken::Comma => TokenKind::Comma,
            LogosToken::Semicolon => TokenKind::Semicolon,
            LogosToken::LParen => TokenKind::LParen,
            LogosToken::RParen => TokenKind::RParen,
            LogosToken::LBracket => TokenKind::LBracket,
            LogosToken::RBracket => TokenKind::RBracket,
            LogosToken::LBrace => TokenKind::LBrace,
            LogosToken::RBrace => TokenKind::RBrace,
        }
    }
}
