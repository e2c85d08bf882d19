use std::fmt::{self, Display};

/// Built-in functions of the language. Their names are reserved words: the
/// scanner turns them into dedicated tokens and the parser emits a dedicated
/// call node, so a built-in name can never be used as a variable.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Builtin {
    Print,
    Println,
    Read,
    Stacktrace,
    Len,
    Max,
    Min,
    Abs,
    Ceil,
    Floor,
    Round,
    Sqrt,
    Rnd,
    ParseNum,
    ToString,
    Lower,
    Upper,
    Split,
    Join,
    Replace,
    Push,
    Pop,
    Insert,
    Remove,
    Sort,
}

impl Builtin {
    /// Maps a reserved word to its built-in, if it is one.
    pub fn from_keyword(word: &str) -> Option<Builtin> {
        let builtin = match word {
            "print"      => Builtin::Print,
            "println"    => Builtin::Println,
            "read"       => Builtin::Read,
            "stacktrace" => Builtin::Stacktrace,
            "len"        => Builtin::Len,
            "MAX"        => Builtin::Max,
            "MIN"        => Builtin::Min,
            "abs"        => Builtin::Abs,
            "ceil"       => Builtin::Ceil,
            "floor"      => Builtin::Floor,
            "round"      => Builtin::Round,
            "sqrt"       => Builtin::Sqrt,
            "rnd"        => Builtin::Rnd,
            "parse_num"  => Builtin::ParseNum,
            "to_string"  => Builtin::ToString,
            "lower"      => Builtin::Lower,
            "upper"      => Builtin::Upper,
            "split"      => Builtin::Split,
            "join"       => Builtin::Join,
            "replace"    => Builtin::Replace,
            "push"       => Builtin::Push,
            "pop"        => Builtin::Pop,
            "insert"     => Builtin::Insert,
            "remove"     => Builtin::Remove,
            "sort"       => Builtin::Sort,
            _ => return None,
        };

        Some(builtin)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Print      => "print",
            Builtin::Println    => "println",
            Builtin::Read       => "read",
            Builtin::Stacktrace => "stacktrace",
            Builtin::Len        => "len",
            Builtin::Max        => "MAX",
            Builtin::Min        => "MIN",
            Builtin::Abs        => "abs",
            Builtin::Ceil       => "ceil",
            Builtin::Floor      => "floor",
            Builtin::Round      => "round",
            Builtin::Sqrt       => "sqrt",
            Builtin::Rnd        => "rnd",
            Builtin::ParseNum   => "parse_num",
            Builtin::ToString   => "to_string",
            Builtin::Lower      => "lower",
            Builtin::Upper      => "upper",
            Builtin::Split      => "split",
            Builtin::Join       => "join",
            Builtin::Replace    => "replace",
            Builtin::Push       => "push",
            Builtin::Pop        => "pop",
            Builtin::Insert     => "insert",
            Builtin::Remove     => "remove",
            Builtin::Sort       => "sort",
        }
    }

    /// Fixed argument count of the built-in.
    pub fn arity(&self) -> usize {
        match self {
            Builtin::Read | Builtin::Stacktrace => 0,
            Builtin::Split | Builtin::Join | Builtin::Push | Builtin::Remove => 2,
            Builtin::Replace | Builtin::Insert => 3,
            _ => 1,
        }
    }
}

impl Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
