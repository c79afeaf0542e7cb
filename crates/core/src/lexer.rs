use crate::ast::Span;
use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Rule and type names -- interior `-` and `.` allowed per the id grammar
    Ident(String),
    /// `.size`, `.regexp`, ... -- the name carries the leading dot
    ControlOp(String),
    /// Integer literal (decimal or 0x hex)
    Int(i64),
    /// Floating-point literal
    Float(f64),
    /// Quoted text (content without quotes, escapes resolved)
    Text(String),
    /// `h'...'` / `b64'...'` byte-string literal, content kept raw
    Bytes(String),
    /// `#`, `#N`, `#N.NN`
    Tag {
        major: Option<u8>,
        constraint: Option<u64>,
    },
    // Assignment and choice operators
    Assign,         // =
    TypeChoiceAlt,  // /=
    GroupChoiceAlt, // //=
    TypeChoice,     // /
    GroupChoice,    // //
    Arrow,          // =>
    // Punctuation
    Colon,
    Comma,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    LAngle,
    RAngle,
    // Occurrence indicators
    Question, // ?
    Plus,     // +
    Star,     // *
    // Prefix operators
    Tilde, // ~
    Caret, // ^
    Amp,   // &
    // Range operators
    RangeIncl, // ..
    RangeExcl, // ...
    // End of input
    Eof,
}

#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    pub span: Span,
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'@' || b == b'_' || b == b'$'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'@' || b == b'_' || b == b'$'
}

/// Scan an identifier starting at `pos`. Interior `-` and `.` are part of
/// the name only when followed by another identifier character, so `a..b`
/// still splits into `a`, `..`, `b`.
fn scan_ident(bytes: &[u8], mut pos: usize) -> usize {
    pos += 1;
    while pos < bytes.len() {
        let b = bytes[pos];
        if is_ident_continue(b) {
            pos += 1;
        } else if (b == b'-' || b == b'.')
            && pos + 1 < bytes.len()
            && is_ident_continue(bytes[pos + 1])
        {
            pos += 2;
        } else {
            break;
        }
    }
    pos
}

pub fn lex(src: &str) -> Result<Vec<Spanned>, ParseError> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0usize;

    while pos < bytes.len() {
        let b = bytes[pos];

        // Comment -- ';' to end of line
        if b == b';' {
            while pos < bytes.len() && bytes[pos] != b'\n' {
                pos += 1;
            }
            continue;
        }

        // Whitespace
        if b == b' ' || b == b'\t' || b == b'\r' || b == b'\n' {
            pos += 1;
            continue;
        }

        let start = pos;

        // Text literal
        if b == b'"' {
            pos += 1;
            let mut content: Vec<u8> = Vec::new();
            loop {
                if pos >= bytes.len() {
                    return Err(ParseError::new(
                        "unterminated text literal",
                        Span::new(start, pos),
                    ));
                }
                let sb = bytes[pos];
                if sb == b'"' {
                    pos += 1;
                    break;
                }
                if sb == b'\n' {
                    return Err(ParseError::new(
                        "unterminated text literal",
                        Span::new(start, pos),
                    ));
                }
                if sb == b'\\' {
                    pos += 1;
                    if pos >= bytes.len() {
                        return Err(ParseError::new(
                            "unterminated escape in text literal",
                            Span::new(start, pos),
                        ));
                    }
                    match bytes[pos] {
                        b'"' => content.push(b'"'),
                        b'\\' => content.push(b'\\'),
                        b'n' => content.push(b'\n'),
                        b't' => content.push(b'\t'),
                        other => {
                            content.push(b'\\');
                            content.push(other);
                        }
                    }
                    pos += 1;
                    continue;
                }
                content.push(sb);
                pos += 1;
            }
            let text = String::from_utf8(content).map_err(|_| {
                ParseError::new("invalid UTF-8 in text literal", Span::new(start, pos))
            })?;
            tokens.push(Spanned {
                token: Token::Text(text),
                span: Span::new(start, pos),
            });
            continue;
        }

        // Byte-string literals: h'...' and b64'...'
        let bytes_prefix = if b == b'h' && pos + 1 < bytes.len() && bytes[pos + 1] == b'\'' {
            Some(2)
        } else if b == b'b' && src[pos..].starts_with("b64'") {
            Some(4)
        } else {
            None
        };
        if let Some(prefix_len) = bytes_prefix {
            pos += prefix_len;
            let content_start = pos;
            while pos < bytes.len() && bytes[pos] != b'\'' {
                pos += 1;
            }
            if pos >= bytes.len() {
                return Err(ParseError::new(
                    "unterminated byte-string literal",
                    Span::new(start, pos),
                ));
            }
            let content = src[content_start..pos].to_string();
            pos += 1;
            tokens.push(Spanned {
                token: Token::Bytes(content),
                span: Span::new(start, pos),
            });
            continue;
        }

        // Number (optionally negative, 0x hex, fraction, exponent)
        if b.is_ascii_digit()
            || (b == b'-' && pos + 1 < bytes.len() && bytes[pos + 1].is_ascii_digit())
        {
            if b == b'-' {
                pos += 1;
            }
            if bytes[pos] == b'0' && pos + 1 < bytes.len() && bytes[pos + 1] == b'x' {
                pos += 2;
                let digits_start = pos;
                while pos < bytes.len() && bytes[pos].is_ascii_hexdigit() {
                    pos += 1;
                }
                if pos == digits_start {
                    return Err(ParseError::new(
                        "malformed hex literal",
                        Span::new(start, pos),
                    ));
                }
                let magnitude = i64::from_str_radix(&src[digits_start..pos], 16).map_err(|_| {
                    ParseError::new("integer literal out of range", Span::new(start, pos))
                })?;
                let n = if b == b'-' { -magnitude } else { magnitude };
                tokens.push(Spanned {
                    token: Token::Int(n),
                    span: Span::new(start, pos),
                });
                continue;
            }
            let mut is_float = false;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            if pos + 1 < bytes.len() && bytes[pos] == b'.' && bytes[pos + 1].is_ascii_digit() {
                is_float = true;
                pos += 1;
                while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                    pos += 1;
                }
            }
            if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
                let mut after = pos + 1;
                if after < bytes.len() && (bytes[after] == b'+' || bytes[after] == b'-') {
                    after += 1;
                }
                if after < bytes.len() && bytes[after].is_ascii_digit() {
                    is_float = true;
                    pos = after;
                    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                        pos += 1;
                    }
                }
            }
            let literal = &src[start..pos];
            let token = if is_float {
                let f: f64 = literal.parse().map_err(|_| {
                    ParseError::new(
                        format!("invalid number '{}'", literal),
                        Span::new(start, pos),
                    )
                })?;
                Token::Float(f)
            } else {
                let n: i64 = literal.parse().map_err(|_| {
                    ParseError::new(
                        format!("integer literal out of range '{}'", literal),
                        Span::new(start, pos),
                    )
                })?;
                Token::Int(n)
            };
            tokens.push(Spanned {
                token,
                span: Span::new(start, pos),
            });
            continue;
        }

        // Identifier
        if is_ident_start(b) {
            pos = scan_ident(bytes, pos);
            tokens.push(Spanned {
                token: Token::Ident(src[start..pos].to_string()),
                span: Span::new(start, pos),
            });
            continue;
        }

        // Range operator or control operator
        if b == b'.' {
            if pos + 1 < bytes.len() && bytes[pos + 1] == b'.' {
                if pos + 2 < bytes.len() && bytes[pos + 2] == b'.' {
                    pos += 3;
                    tokens.push(Spanned {
                        token: Token::RangeExcl,
                        span: Span::new(start, pos),
                    });
                } else {
                    pos += 2;
                    tokens.push(Spanned {
                        token: Token::RangeIncl,
                        span: Span::new(start, pos),
                    });
                }
                continue;
            }
            if pos + 1 < bytes.len() && is_ident_start(bytes[pos + 1]) {
                pos = scan_ident(bytes, pos + 1);
                tokens.push(Spanned {
                    token: Token::ControlOp(src[start..pos].to_string()),
                    span: Span::new(start, pos),
                });
                continue;
            }
            return Err(ParseError::new(
                "unexpected character '.'",
                Span::new(start, start + 1),
            ));
        }

        // Tag header: #, #N, #N.NN
        if b == b'#' {
            pos += 1;
            if pos < bytes.len() && bytes[pos].is_ascii_digit() {
                let major = bytes[pos] - b'0';
                if major > 7 {
                    return Err(ParseError::new(
                        format!("invalid major type {}", major),
                        Span::new(start, pos + 1),
                    ));
                }
                pos += 1;
                let mut constraint = None;
                if pos + 1 < bytes.len() && bytes[pos] == b'.' && bytes[pos + 1].is_ascii_digit() {
                    pos += 1;
                    let digits_start = pos;
                    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                        pos += 1;
                    }
                    let value: u64 = src[digits_start..pos].parse().map_err(|_| {
                        ParseError::new("tag number out of range", Span::new(start, pos))
                    })?;
                    constraint = Some(value);
                }
                tokens.push(Spanned {
                    token: Token::Tag {
                        major: Some(major),
                        constraint,
                    },
                    span: Span::new(start, pos),
                });
            } else {
                tokens.push(Spanned {
                    token: Token::Tag {
                        major: None,
                        constraint: None,
                    },
                    span: Span::new(start, pos),
                });
            }
            continue;
        }

        // Choice and assignment alternatives
        if b == b'/' {
            if pos + 1 < bytes.len() && bytes[pos + 1] == b'/' {
                if pos + 2 < bytes.len() && bytes[pos + 2] == b'=' {
                    pos += 3;
                    tokens.push(Spanned {
                        token: Token::GroupChoiceAlt,
                        span: Span::new(start, pos),
                    });
                } else {
                    pos += 2;
                    tokens.push(Spanned {
                        token: Token::GroupChoice,
                        span: Span::new(start, pos),
                    });
                }
            } else if pos + 1 < bytes.len() && bytes[pos + 1] == b'=' {
                pos += 2;
                tokens.push(Spanned {
                    token: Token::TypeChoiceAlt,
                    span: Span::new(start, pos),
                });
            } else {
                pos += 1;
                tokens.push(Spanned {
                    token: Token::TypeChoice,
                    span: Span::new(start, pos),
                });
            }
            continue;
        }

        if b == b'=' {
            if pos + 1 < bytes.len() && bytes[pos + 1] == b'>' {
                pos += 2;
                tokens.push(Spanned {
                    token: Token::Arrow,
                    span: Span::new(start, pos),
                });
            } else {
                pos += 1;
                tokens.push(Spanned {
                    token: Token::Assign,
                    span: Span::new(start, pos),
                });
            }
            continue;
        }

        let single = match b {
            b':' => Some(Token::Colon),
            b',' => Some(Token::Comma),
            b'{' => Some(Token::LBrace),
            b'}' => Some(Token::RBrace),
            b'[' => Some(Token::LBracket),
            b']' => Some(Token::RBracket),
            b'(' => Some(Token::LParen),
            b')' => Some(Token::RParen),
            b'<' => Some(Token::LAngle),
            b'>' => Some(Token::RAngle),
            b'?' => Some(Token::Question),
            b'+' => Some(Token::Plus),
            b'*' => Some(Token::Star),
            b'~' => Some(Token::Tilde),
            b'^' => Some(Token::Caret),
            b'&' => Some(Token::Amp),
            _ => None,
        };
        if let Some(token) = single {
            pos += 1;
            tokens.push(Spanned {
                token,
                span: Span::new(start, pos),
            });
            continue;
        }

        let ch = src[pos..].chars().next().unwrap_or('?');
        return Err(ParseError::new(
            format!("unexpected character '{}'", ch),
            Span::new(start, start + ch.len_utf8()),
        ));
    }

    tokens.push(Spanned {
        token: Token::Eof,
        span: Span::new(bytes.len(), bytes.len()),
    });
    Ok(tokens)
}
