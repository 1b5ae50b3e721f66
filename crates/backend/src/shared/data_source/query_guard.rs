//! Checks applied to SQL text before it reaches the data source.
//!
//! The connection itself is `query_only`; this guard rejects everything that
//! is not a single read statement so that errors are reported early and
//! clearly instead of surfacing as SQLite failures.

use crate::shared::error::AppError;

/// Validate `sql` and return it without surrounding whitespace and a trailing `;`
pub fn validate_read_only(sql: &str) -> Result<&str, AppError> {
    let trimmed = sql.trim();
    let trimmed = trimmed.strip_suffix(';').unwrap_or(trimmed).trim_end();

    if trimmed.is_empty() {
        return Err(AppError::InvalidQuery("query is empty".into()));
    }

    let first_word: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_ascii_uppercase();
    if first_word != "SELECT" && first_word != "WITH" {
        return Err(AppError::InvalidQuery(
            "only SELECT statements are allowed".into(),
        ));
    }

    if has_statement_separator(trimmed) {
        return Err(AppError::InvalidQuery(
            "only a single statement is allowed".into(),
        ));
    }

    Ok(trimmed)
}

/// `;` outside of string literals, quoted identifiers and comments
fn has_statement_separator(sql: &str) -> bool {
    #[derive(PartialEq)]
    enum State {
        Code,
        Single,
        Double,
        LineComment,
        BlockComment,
    }

    let chars: Vec<char> = sql.chars().collect();
    let mut state = State::Code;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match state {
            State::Code => match c {
                ';' => return true,
                '\'' => state = State::Single,
                '"' => state = State::Double,
                '-' if next == Some('-') => {
                    state = State::LineComment;
                    i += 1;
                }
                '/' if next == Some('*') => {
                    state = State::BlockComment;
                    i += 1;
                }
                _ => {}
            },
            // '' and "" are escapes and simply re-enter the literal
            State::Single if c == '\'' => state = State::Code,
            State::Double if c == '"' => state = State::Code,
            State::LineComment if c == '\n' => state = State::Code,
            State::BlockComment if c == '*' && next == Some('/') => {
                state = State::Code;
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }

    false
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Quoted(String),
    Punct(char),
    Literal,
}

fn tokenize(sql: &str) -> Vec<Token> {
    let chars: Vec<char> = sql.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    // Text up to the closing `close`; a doubled `close` is an escaped one
    let quoted = |start: usize, close: char| -> (String, usize) {
        let mut text = String::new();
        let mut j = start;
        while j < chars.len() {
            if chars[j] == close {
                if close != ']' && chars.get(j + 1) == Some(&close) {
                    text.push(close);
                    j += 2;
                    continue;
                }
                return (text, j + 1);
            }
            text.push(chars[j]);
            j += 1;
        }
        (text, j)
    };

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        match c {
            c if c.is_whitespace() => i += 1,
            '-' if next == Some('-') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if next == Some('*') => {
                i += 2;
                while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    i += 1;
                }
                i += 2;
            }
            '\'' => {
                let (_, end) = quoted(i + 1, '\'');
                tokens.push(Token::Literal);
                i = end;
            }
            '"' => {
                let (name, end) = quoted(i + 1, '"');
                tokens.push(Token::Quoted(name));
                i = end;
            }
            // `name` and [name] never fall back to literals
            '`' | '[' => {
                let (name, end) = quoted(i + 1, if c == '[' { ']' } else { '`' });
                tokens.push(Token::Word(name));
                i = end;
            }
            c if c.is_alphanumeric() || c == '_' || c == '$' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '$') {
                    i += 1;
                }
                tokens.push(Token::Word(chars[start..i].iter().collect()));
            }
            c => {
                tokens.push(Token::Punct(c));
                i += 1;
            }
        }
    }

    tokens
}

/// Keywords after which a quoted name is read, not defined
const REFERENCE_KEYWORDS: &[&str] = &[
    "SELECT", "DISTINCT", "ALL", "FROM", "WHERE", "BY", "ON", "AND", "OR", "NOT", "JOIN",
    "HAVING", "WHEN", "THEN", "ELSE", "CASE", "IN", "IS", "LIKE", "GLOB", "BETWEEN", "WITH",
    "RECURSIVE", "USING", "UNION", "EXCEPT", "INTERSECT", "LIMIT", "OFFSET", "ESCAPE",
    "PARTITION", "FILTER", "OVER", "VALUES", "RETURNING",
];

fn is_word(token: Option<&Token>, word: &str) -> bool {
    matches!(token, Some(Token::Word(w)) if w.eq_ignore_ascii_case(word))
}

/// Double-quoted names of a statement, split by role.
///
/// SQLite reads a bare `"name"` that resolves to nothing as the string
/// `'name'`, so every entry of `references` has to be checked against the
/// catalogue before the statement runs. Qualified names (`"t"."c"`) are left
/// to SQLite, which reports them itself.
#[derive(Debug, Default, PartialEq)]
pub struct QuotedNames {
    /// Bare quoted names used as table or column references
    pub references: Vec<String>,
    /// Aliases and CTE names the statement defines itself
    pub definitions: Vec<String>,
    /// Every name of the statement, quoted or not
    pub all: Vec<String>,
}

pub fn quoted_names(sql: &str) -> QuotedNames {
    let tokens = tokenize(sql);
    let mut names = QuotedNames::default();

    for (idx, token) in tokens.iter().enumerate() {
        let name = match token {
            Token::Quoted(name) => name,
            Token::Word(word) => {
                names.all.push(word.clone());
                continue;
            }
            _ => continue,
        };
        names.all.push(name.clone());

        let prev = idx.checked_sub(1).and_then(|p| tokens.get(p));
        let next = tokens.get(idx + 1);

        if matches!(prev, Some(Token::Punct('.'))) || matches!(next, Some(Token::Punct('.'))) {
            continue;
        }

        let defines = is_word(prev, "AS")
            || matches!(prev, Some(Token::Quoted(_)) | Some(Token::Punct(')')))
            || matches!(prev, Some(Token::Word(w))
                if !REFERENCE_KEYWORDS.iter().any(|k| w.eq_ignore_ascii_case(k))
                    && !w.chars().all(|c| c.is_ascii_digit()))
            || (is_word(next, "AS") && matches!(tokens.get(idx + 2), Some(Token::Punct('('))));

        if defines {
            names.definitions.push(name.clone());
        } else {
            names.references.push(name.clone());
        }
    }

    names
}
