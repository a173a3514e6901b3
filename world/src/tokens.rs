//! Session token minting. Every `Astronaut_connect` admission mints a fresh,
//! unguessable token the client must echo on every subsequent request; a
//! prior implementation drew from `rand()` seeded by `srand(time(NULL))` per
//! process, reproduced here with an explicit, seedable `rand::rngs::StdRng`
//! so token draws are as deterministic under test as every other part of
//! this crate.

use protocol::{TOKEN_ALPHABET, TOKEN_LEN};
use rand::Rng;

/// Draws a fresh `TOKEN_LEN`-byte uppercase token from `rng`. Does not check
/// for collisions against tokens already in use — the token
/// space (26^6 ≈ 3×10^8) makes an in-process collision practically
/// impossible at the `SLOTS`-wide scale this server ever holds live at once.
pub fn mint(rng: &mut impl Rng) -> String {
    (0..TOKEN_LEN)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn mints_a_token_of_the_right_length_and_alphabet() {
        let mut rng = StdRng::seed_from_u64(7);
        let token = mint(&mut rng);
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn is_deterministic_given_a_seed() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(mint(&mut a), mint(&mut b));
    }
}
