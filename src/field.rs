// Rusby Wallet — Pure Rust Bitcoin key-management core
// Copyright (C) 2025 axpnet & Claude Opus (Anthropic)
// SPDX-License-Identifier: GPL-3.0-or-later
//
// field: secp256k1 curve parameters and modular arithmetic over the
// field prime P.
//
// Types:
//   Curve     — fixed curve parameter record (secp256k1 only)
// Functions:
//   modinv()        — modular inverse by Fermat's little theorem
//   legendre()       — Legendre symbol mod p
//   tonelli_shanks() — modular square root

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// secp256k1 curve parameters: y^2 = x^3 + a*x + b (mod p).
///
/// Only secp256k1 is modeled — this is a fixed record, not a
/// runtime-selectable curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Curve {
    pub a: u64,
    pub b: u64,
    pub p: &'static str,
    pub n: &'static str,
    pub g_x: &'static str,
    pub g_y: &'static str,
}

pub const SECP256K1: Curve = Curve {
    a: 0,
    b: 7,
    p: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F",
    n: "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141",
    g_x: "79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798",
    g_y: "483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8",
};

fn hex_to_biguint(s: &str) -> BigUint {
    BigUint::parse_bytes(s.as_bytes(), 16).expect("curve constants are valid hex")
}

pub fn p() -> BigUint {
    hex_to_biguint(SECP256K1.p)
}

pub fn n() -> BigUint {
    hex_to_biguint(SECP256K1.n)
}

pub fn g_x() -> BigUint {
    hex_to_biguint(SECP256K1.g_x)
}

pub fn g_y() -> BigUint {
    hex_to_biguint(SECP256K1.g_y)
}

/// Modular inverse of `a` mod `p`, via Fermat's little theorem
/// (a^(p-2) mod p), valid because p is prime.
pub fn modinv(a: &BigUint, p: &BigUint) -> BigUint {
    a.modpow(&(p - BigUint::from(2u32)), p)
}

/// Legendre symbol of `x` mod prime `p`, returned as 1 (residue), -1
/// (non-residue), or 0 (x ≡ 0).
fn legendre(x: &BigUint, p: &BigUint) -> i8 {
    if x.is_zero() {
        return 0;
    }
    let r = x.modpow(&((p - BigUint::one()) >> 1), p);
    if r == *p - BigUint::one() {
        -1
    } else {
        1
    }
}

/// Tonelli-Shanks modular square root: find r such that r^2 ≡ n (mod p).
///
/// Returns both roots (r, p - r); the caller picks whichever has the
/// parity it wants. Fails if n has no square root mod p.
pub fn tonelli_shanks(n: &BigUint, p: &BigUint) -> crate::error::Result<(BigUint, BigUint)> {
    if legendre(n, p) != 1 {
        return Err(crate::error::Error::NotAQuadraticResidue(n.to_string()));
    }

    // Factor p - 1 = q * 2^s, q odd.
    let mut q = p - BigUint::one();
    let mut s: u32 = 0;
    while (&q & BigUint::one()).is_zero() {
        s += 1;
        q >>= 1;
    }

    // Find the least z with Legendre symbol -1.
    let mut z = BigUint::from(2u32);
    while legendre(&z, p) != -1 {
        z += BigUint::one();
    }

    let mut m = s;
    let mut c = z.modpow(&q, p);
    let mut t = n.modpow(&q, p);
    let mut r = n.modpow(&((&q + BigUint::one()) >> 1), p);

    while t != BigUint::one() {
        // Find the least i in [1, m) with t^(2^i) == 1.
        let mut i = 1u32;
        let mut t2i = (&t * &t) % p;
        while t2i != BigUint::one() {
            t2i = (&t2i * &t2i) % p;
            i += 1;
        }

        let b = c.modpow(&(BigUint::one() << (m - i - 1)), p);
        m = i;
        c = (&b * &b) % p;
        t = (&t * &c) % p;
        r = (&r * &b) % p;
    }

    Ok((r.clone(), (p - r) % p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modinv_round_trips() {
        let p = p();
        let a = BigUint::from(12345u64);
        let inv = modinv(&a, &p);
        assert_eq!((&a * &inv) % &p, BigUint::one());
    }

    #[test]
    fn tonelli_shanks_recovers_known_square() {
        let p = p();
        let x = BigUint::from(9u64);
        let n = (&x * &x) % &p;
        let (r1, r2) = tonelli_shanks(&n, &p).unwrap();
        assert!(r1 == x || r2 == x, "expected one root to equal {x}, got {r1} / {r2}");
        assert_eq!((&r1 + &r2) % &p, BigUint::zero());
    }

    #[test]
    fn tonelli_shanks_rejects_non_residue() {
        let p = p();
        // A non-residue for secp256k1's p: p - 1 is never a QR since
        // (p-1) == -1 and p ≡ 3 (mod 4) implies legendre(-1) == -1.
        let non_residue = &p - BigUint::one();
        assert!(tonelli_shanks(&non_residue, &p).is_err());
    }
}
