//! Boundary delimiter generation and validation.

use rand::{distributions::Alphanumeric, rngs::ThreadRng, Rng, RngCore};

use crate::{Error, Result};

/// Prefix of every generated boundary.
pub const BOUNDARY_PREFIX: &str = "----nyquest.boundary.";
/// Number of random characters following [`BOUNDARY_PREFIX`].
pub const RANDOM_LEN: usize = 32;
/// Longest boundary allowed by RFC 2046.
pub const MAX_BOUNDARY_LEN: usize = 70;

/// Produces boundary strings for encoders that are not given one explicitly.
pub trait BoundaryGenerator {
    /// Returns a fresh boundary. The result must pass [`validate_boundary`].
    fn generate(&mut self) -> String;
}

/// Generates `----nyquest.boundary.` followed by random alphanumerics drawn from `R`.
#[derive(Debug, Clone)]
pub struct RandomBoundary<R = ThreadRng> {
    rng: R,
}

impl RandomBoundary<ThreadRng> {
    /// Draws from the thread-local generator.
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomBoundary<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> RandomBoundary<R> {
    /// Draws from `rng`. Pass a seeded generator for reproducible output.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore> BoundaryGenerator for RandomBoundary<R> {
    fn generate(&mut self) -> String {
        let mut boundary = String::with_capacity(BOUNDARY_PREFIX.len() + RANDOM_LEN);
        boundary.push_str(BOUNDARY_PREFIX);
        boundary.extend(
            (&mut self.rng)
                .sample_iter(Alphanumeric)
                .take(RANDOM_LEN)
                .map(char::from),
        );
        boundary
    }
}

impl<F: FnMut() -> String> BoundaryGenerator for F {
    fn generate(&mut self) -> String {
        self()
    }
}

fn is_boundary_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '\'' | '+' | '_' | '-' | '.')
}

/// Checks that `boundary` can be embedded verbatim in both the body and the `Content-Type`
/// parameter.
pub fn validate_boundary(boundary: &str) -> Result<()> {
    if boundary.is_empty()
        || boundary.len() > MAX_BOUNDARY_LEN
        || !boundary.chars().all(is_boundary_char)
    {
        return Err(Error::InvalidBoundary(boundary.to_owned()));
    }
    Ok(())
}
