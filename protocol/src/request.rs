//! Parses the UTF-8, space-separated request vocabulary into a
//! structured [`Request`]. Mirrors the `sscanf`-based dispatch in
//! `game-server.c`'s `process_message`, but as a single fallible parse
//! instead of four `strncmp` probes each doing their own ad-hoc field
//! scanning.

/// One cardinal direction, as carried by `Astronaut_movement`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "U" => Some(Direction::Up),
            "D" => Some(Direction::Down),
            "L" => Some(Direction::Left),
            "R" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// A decoded client request. `glyph` is always the raw uppercase letter A-H as
/// received on the wire; the rule evaluator is responsible for mapping it to a
/// slot index and validating that the slot exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Connect,
    Move {
        glyph: char,
        direction: Direction,
        token: String,
    },
    Zap {
        glyph: char,
        token: String,
    },
    Disconnect {
        glyph: char,
        token: String,
    },
    /// Anything that doesn't match the vocabulary: unknown verb, wrong arity,
    /// or an unparsable direction/glyph. Always answered with "Invalid message".
    Unknown,
}

impl Request {
    /// Parses a single request line. Never fails — an unparsable body simply
    /// becomes [`Request::Unknown`], matching the "Unknown command" rule
    /// rule (reply "invalid message", no state change).
    pub fn parse(body: &str) -> Request {
        let mut words = body.split_whitespace();
        match words.next() {
            Some("Astronaut_connect") => match words.next() {
                None => Request::Connect,
                Some(_) => Request::Unknown,
            },
            Some("Astronaut_movement") => {
                match (words.next(), words.next(), words.next(), words.next()) {
                    (Some(glyph), Some(direction), Some(token), None) => {
                        match (single_glyph(glyph), Direction::from_letter(direction)) {
                            (Some(glyph), Some(direction)) => Request::Move {
                                glyph,
                                direction,
                                token: token.to_string(),
                            },
                            _ => Request::Unknown,
                        }
                    }
                    _ => Request::Unknown,
                }
            }
            Some("Astronaut_zap") => match (words.next(), words.next(), words.next()) {
                (Some(glyph), Some(token), None) => match single_glyph(glyph) {
                    Some(glyph) => Request::Zap {
                        glyph,
                        token: token.to_string(),
                    },
                    None => Request::Unknown,
                },
                _ => Request::Unknown,
            },
            Some("Astronaut_disconnect") => match (words.next(), words.next(), words.next()) {
                (Some(glyph), Some(token), None) => match single_glyph(glyph) {
                    Some(glyph) => Request::Disconnect {
                        glyph,
                        token: token.to_string(),
                    },
                    None => Request::Unknown,
                },
                _ => Request::Unknown,
            },
            _ => Request::Unknown,
        }
    }
}

/// A glyph field must be exactly one ASCII uppercase letter.
fn single_glyph(field: &str) -> Option<char> {
    let mut chars = field.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_connect() {
        assert_eq!(Request::parse("Astronaut_connect"), Request::Connect);
    }

    #[test]
    fn parses_movement() {
        assert_eq!(
            Request::parse("Astronaut_movement A U ABCDEF"),
            Request::Move {
                glyph: 'A',
                direction: Direction::Up,
                token: "ABCDEF".to_string(),
            }
        );
    }

    #[test]
    fn parses_zap() {
        assert_eq!(
            Request::parse("Astronaut_zap C ZZZZZZ"),
            Request::Zap {
                glyph: 'C',
                token: "ZZZZZZ".to_string(),
            }
        );
    }

    #[test]
    fn parses_disconnect() {
        assert_eq!(
            Request::parse("Astronaut_disconnect H QWERTY"),
            Request::Disconnect {
                glyph: 'H',
                token: "QWERTY".to_string(),
            }
        );
    }

    #[test]
    fn rejects_malformed_and_unknown() {
        assert_eq!(Request::parse("Astronaut_movement A X ABCDEF"), Request::Unknown);
        assert_eq!(Request::parse("Astronaut_movement A U"), Request::Unknown);
        assert_eq!(Request::parse("Astronaut_zap ab ABCDEF"), Request::Unknown);
        assert_eq!(Request::parse("Do_a_barrel_roll"), Request::Unknown);
        assert_eq!(Request::parse(""), Request::Unknown);
    }

    #[test]
    fn rejects_connect_with_trailing_tokens() {
        assert_eq!(Request::parse("Astronaut_connect garbage"), Request::Unknown);
    }
}
