//! Galois Field GF(256) arithmetic for Shamir's Secret Sharing
//!
//! Uses the irreducible polynomial x^8 + x^4 + x^3 + x + 1 (0x11B), the AES
//! field, with 0x03 as the generator. Log/exp tables are built at compile
//! time.

/// Reduction polynomial (including the x^8 term)
const POLY: u16 = 0x11B;

struct Tables {
    /// log[x] = discrete log of x base 3 (log[0] is unused)
    log: [u8; 256],
    /// exp[i] = 3^i, stored twice so sums of two logs never need a modulo
    exp: [u8; 510],
}

const fn build_tables() -> Tables {
    let mut log = [0u8; 256];
    let mut exp = [0u8; 510];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        exp[i] = x as u8;
        exp[i + 255] = x as u8;
        log[x as usize] = i as u8;

        // x * 3 = (x * 2) ^ x
        let mut doubled = x << 1;
        if doubled & 0x100 != 0 {
            doubled ^= POLY;
        }
        x = doubled ^ x;
        i += 1;
    }
    Tables { log, exp }
}

static TABLES: Tables = build_tables();

/// Add two elements in GF(256) (XOR)
#[inline]
pub fn gf_add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Multiply two elements in GF(256)
#[inline]
pub fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let sum = TABLES.log[a as usize] as usize + TABLES.log[b as usize] as usize;
    TABLES.exp[sum]
}

/// Divide two elements in GF(256)
///
/// Callers guarantee `b != 0`; every divisor in this crate is a difference
/// of distinct x-coordinates.
#[inline]
pub fn gf_div(a: u8, b: u8) -> u8 {
    debug_assert!(b != 0, "division by zero in GF(256)");
    if a == 0 {
        return 0;
    }
    let diff = TABLES.log[a as usize] as usize + 255 - TABLES.log[b as usize] as usize;
    TABLES.exp[diff]
}

/// Evaluate a polynomial at `x` (Horner's method)
///
/// `coefficients[0]` is the constant term.
pub fn poly_eval(coefficients: &[u8], x: u8) -> u8 {
    coefficients
        .iter()
        .rev()
        .fold(0u8, |acc, &coef| gf_add(gf_mul(acc, x), coef))
}

/// Lagrange basis values at x = 0 for the given x-coordinates.
///
/// For a point set `xs`, returns `L_i(0) = prod_{j != i} x_j / (x_i - x_j)`,
/// so that `f(0) = sum_i y_i * L_i(0)`. Computing the basis once lets a
/// multi-byte share set be interpolated with one multiply-add per byte.
///
/// The x-coordinates must be nonzero and pairwise distinct.
pub fn lagrange_basis_at_zero(xs: &[u8]) -> Vec<u8> {
    xs.iter()
        .enumerate()
        .map(|(i, &xi)| {
            let (num, den) = xs
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .fold((1u8, 1u8), |(num, den), (_, &xj)| {
                    // (0 - xj) = xj in characteristic 2
                    (gf_mul(num, xj), gf_mul(den, gf_add(xi, xj)))
                });
            gf_div(num, den)
        })
        .collect()
}
