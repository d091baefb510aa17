//! ClassAd operators with precedence information

use serde::{Deserialize, Serialize};

/// Binary operators with their precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Precedence 0 (lowest)
    /// Three-valued logical or (`||`)
    Or,

    // Precedence 1
    /// Three-valued logical and (`&&`)
    And,

    // Precedence 2-4
    /// Bitwise or, or strict logical or on booleans (`|`)
    BitOr,
    /// Bitwise exclusive or (`^`)
    BitXor,
    /// Bitwise and (`&`)
    BitAnd,

    // Precedence 5
    /// Equality (`==`), case-insensitive for strings
    Equal,
    /// Inequality (`!=`)
    NotEqual,
    /// Identity (`is`), never fails
    Is,
    /// Non-identity (`isnt`)
    Isnt,

    // Precedence 6
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,

    // Precedence 7
    /// `<<`
    LeftShift,
    /// Arithmetic right shift (`>>`)
    RightShift,
    /// Logical right shift (`>>>`)
    UnsignedRightShift,

    // Precedence 8
    Add,
    Subtract,

    // Precedence 9
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOp {
    /// Every binary operator, lowest precedence first
    pub const ALL: [BinaryOp; 21] = [
        Self::Or,
        Self::And,
        Self::BitOr,
        Self::BitXor,
        Self::BitAnd,
        Self::Equal,
        Self::NotEqual,
        Self::Is,
        Self::Isnt,
        Self::Less,
        Self::Greater,
        Self::LessOrEqual,
        Self::GreaterOrEqual,
        Self::LeftShift,
        Self::RightShift,
        Self::UnsignedRightShift,
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Modulo,
    ];

    /// Get the precedence level (0-9, higher binds tighter)
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Or => 0,
            Self::And => 1,
            Self::BitOr => 2,
            Self::BitXor => 3,
            Self::BitAnd => 4,
            Self::Equal | Self::NotEqual | Self::Is | Self::Isnt => 5,
            Self::Less | Self::Greater | Self::LessOrEqual | Self::GreaterOrEqual => 6,
            Self::LeftShift | Self::RightShift | Self::UnsignedRightShift => 7,
            Self::Add | Self::Subtract => 8,
            Self::Multiply | Self::Divide | Self::Modulo => 9,
        }
    }

    /// `&&` and `||`, which use the four-valued truth tables
    pub const fn is_logical(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// `is` and `isnt`
    pub const fn is_identity(&self) -> bool {
        matches!(self, Self::Is | Self::Isnt)
    }

    /// Check if this is a comparison operator
    pub const fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::NotEqual
                | Self::Less
                | Self::Greater
                | Self::LessOrEqual
                | Self::GreaterOrEqual
        )
    }

    /// `| ^ &`, defined on integer pairs and boolean pairs
    pub const fn is_bitwise(&self) -> bool {
        matches!(self, Self::BitOr | Self::BitXor | Self::BitAnd)
    }

    pub const fn is_shift(&self) -> bool {
        matches!(
            self,
            Self::LeftShift | Self::RightShift | Self::UnsignedRightShift
        )
    }

    /// Check if this is an arithmetic operator
    pub const fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide | Self::Modulo
        )
    }

    /// Get the operator symbol
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::BitAnd => "&",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Is => "is",
            Self::Isnt => "isnt",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessOrEqual => "<=",
            Self::GreaterOrEqual => ">=",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::UnsignedRightShift => ">>>",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
        }
    }

    /// The symbol as printed between operands; the keyword operators need
    /// surrounding spaces
    pub const fn infix(&self) -> &'static str {
        match self {
            Self::Is => " is ",
            Self::Isnt => " isnt ",
            _ => self.symbol(),
        }
    }
}

/// Unary operators (precedence 10, highest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Unary plus
    Plus,
    /// Unary minus (negation)
    Minus,
    /// Bitwise complement (`~`), integers only
    BitNot,
    /// Three-valued logical not (`!`)
    Not,
}

impl UnaryOp {
    /// Get the precedence level (always 10 for unary)
    pub const fn precedence(&self) -> u8 {
        10
    }

    /// Get the operator symbol
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::BitNot => "~",
            Self::Not => "!",
        }
    }
}
