//! Join codes for matches.
//!
//! A join code is six decimal digits, zero padded, so it can be read out
//! loud on the first tee. Uniqueness among live matches is enforced by the
//! caller (`services::matches::allocate_join_code`) and a unique index.

use rand::Rng;

use crate::domain::validation::JOIN_CODE_LEN;

const CODE_SPACE: u32 = 1_000_000;

/// Draw a join code from the thread-local CSPRNG (seeded from the OS).
///
/// ```
/// use skins_backend::utils::join_code::generate_join_code;
///
/// let code = generate_join_code();
/// assert_eq!(code.len(), 6);
/// assert!(code.bytes().all(|b| b.is_ascii_digit()));
/// ```
pub fn generate_join_code() -> String {
    generate_join_code_with(&mut rand::rng())
}

/// Same as [`generate_join_code`] with an explicit RNG.
pub fn generate_join_code_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let n = rng.random_range(0..CODE_SPACE);
    format!("{n:0width$}", width = JOIN_CODE_LEN)
}
