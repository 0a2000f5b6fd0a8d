//! Short code generation.
//!
//! Codes are drawn from the operating system CSPRNG via `getrandom` and mapped
//! onto a 62-character alphanumeric alphabet by rejection sampling, so every
//! character is equally likely.

/// Alphabet used for generated codes: digits, lowercase, uppercase.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Number of random bits consumed per output character.
const BITS_PER_CHAR: usize = 6;

/// Errors that can occur during code generation.
#[derive(Debug, thiserror::Error)]
pub enum CodeGenError {
    #[error("Code length must be greater than zero, got {0}")]
    InvalidLength(usize),

    #[error("Failed to read random bytes: {0}")]
    Entropy(#[from] getrandom::Error),
}

/// Generates a random code of exactly `length` alphanumeric characters.
///
/// Each draw fills `ceil(length * 6 / 8)` bytes from the system entropy source
/// and walks the buffer in consecutive 6-bit windows. Windows with value 62 or
/// 63 fall outside the alphabet and are skipped rather than wrapped. When a
/// buffer runs out of windows before the code is complete, a fresh buffer is
/// drawn.
///
/// Holds no shared state, so concurrent callers never interfere.
///
/// # Errors
///
/// Returns [`CodeGenError::InvalidLength`] when `length` is zero and
/// [`CodeGenError::Entropy`] if the system random source fails.
///
/// # Examples
///
/// ```
/// use snaplink::utils::code_generator::generate_code;
///
/// let code = generate_code(8).unwrap();
/// assert_eq!(code.len(), 8);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> Result<String, CodeGenError> {
    if length == 0 {
        return Err(CodeGenError::InvalidLength(length));
    }

    let mut buffer = vec![0u8; (length * BITS_PER_CHAR).div_ceil(8)];
    let mut code = String::with_capacity(length);

    while code.len() < length {
        getrandom::fill(&mut buffer)?;

        for window in six_bit_windows(&buffer) {
            if let Some(&c) = ALPHABET.get(usize::from(window)) {
                code.push(char::from(c));
                if code.len() == length {
                    break;
                }
            }
        }
    }

    Ok(code)
}

/// Splits a byte buffer into consecutive big-endian 6-bit values.
///
/// Trailing bits that do not fill a whole window are ignored.
fn six_bit_windows(bytes: &[u8]) -> impl Iterator<Item = u8> + '_ {
    (0..bytes.len() * 8 / BITS_PER_CHAR).map(move |i| {
        let bit = i * BITS_PER_CHAR;
        let hi = u16::from(bytes[bit / 8]);
        let lo = u16::from(bytes.get(bit / 8 + 1).copied().unwrap_or(0));
        let word = (hi << 8) | lo;
        ((word >> (10 - bit % 8)) & 0x3F) as u8
    })
}
