//! The target (alien) model: a bare position. Targets carry no state beyond
//! where they sit on the board — killing one removes it from `World::targets`
//! entirely rather than marking it dead in place.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub row: i32,
    pub col: i32,
}
