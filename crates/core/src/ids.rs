//! Id module - identity generation for batters and bowlers
//!
//! The engine never invents identities on its own: every transition that
//! creates a batter or bowler draws the id from an injected [`IdSource`].
//! Tests use [`SequentialIds`] for fully predictable ids; interactive use can
//! pick [`RandomIds`], which mixes a seeded LCG into the id so that ids from
//! separate sessions do not collide.

/// What an id is being generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Batter,
    Bowler,
}

impl IdKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            IdKind::Batter => "player",
            IdKind::Bowler => "bowler",
        }
    }
}

/// Source of unique roster ids
pub trait IdSource {
    fn next_id(&mut self, kind: IdKind) -> String;
}

/// Monotonic counter ids: `player-1`, `bowler-2`, `player-3`, ...
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    issued: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u64 {
        self.issued
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self, kind: IdKind) -> String {
        self.issued += 1;
        format!("{}-{}", kind.prefix(), self.issued)
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }
}

/// Counter ids salted with a seeded random suffix: `player-1-9f3a01c2`
///
/// The counter keeps ids unique within a session; the suffix keeps them
/// distinct across sessions started with different seeds.
#[derive(Debug, Clone)]
pub struct RandomIds {
    rng: SimpleRng,
    seed: u32,
    issued: u64,
}

impl RandomIds {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            seed,
            issued: 0,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl IdSource for RandomIds {
    fn next_id(&mut self, kind: IdKind) -> String {
        self.issued += 1;
        format!("{}-{}-{:08x}", kind.prefix(), self.issued, self.rng.next_u32())
    }
}

impl Default for RandomIds {
    fn default() -> Self {
        Self::new(1)
    }
}
