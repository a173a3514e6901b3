//! The literal reply vocabulary. Kept as plain functions rather
//! than an enum because the existing astronaut-client binaries match on these
//! exact strings — the wire contract is the text itself, not a tag.

pub const GAME_FULL: &str = "Sorry, the game is full";
pub const STUNNED_MOVE: &str = "You are stunned! Cannot move.";
pub const STUNNED_ZAP: &str = "You are stunned! Cannot shoot.";
pub const COOLDOWN: &str = "You must wait before shooting again.";
pub const INVALID_TOKEN: &str = "Invalid token! You are cheating";
pub const MOVE_PROCESSED: &str = "Move processed";
pub const MOVE_REFUSED: &str = "move refused";
pub const DISCONNECTED: &str = "Disconnected";
pub const NOT_FOUND: &str = "Astronaut not found";
pub const INVALID_MESSAGE: &str = "Invalid message";

/// `Welcome! You are player <G> <TOKEN>`
pub fn welcome(glyph: char, token: &str) -> String {
    format!("Welcome! You are player {glyph} {token}")
}

/// `This play: <k> points | Current score: <s>`
pub fn zap_result(play_score: u32, total_score: u32) -> String {
    format!("This play: {play_score} points | Current score: {total_score}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_welcome() {
        assert_eq!(welcome('C', "ABCDEF"), "Welcome! You are player C ABCDEF");
    }

    #[test]
    fn formats_zap_result() {
        assert_eq!(zap_result(1, 4), "This play: 1 points | Current score: 4");
    }
}
