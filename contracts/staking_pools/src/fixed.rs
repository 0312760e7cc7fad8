//! Bounded-width unsigned arithmetic.
//!
//! Persisted numeric fields are stored in the smallest native integer that
//! holds them, but each one has a narrower logical width (40, 72, 104 bits,
//! ...). Every operation here checks the result against that width. The
//! hard-fail variants are the only ones used by the ledger; `wrapping_add`
//! and `wrapping_sub` reproduce modular semantics exactly for callers that
//! need them.

/// Failure of a bounded-width operation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ArithmeticError {
    Overflow,
    Underflow,
    DivisionByZero,
}

pub type ArithResult<T> = Result<T, ArithmeticError>;

/// Logical width of a stored field.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Width {
    U32,
    U40,
    U64,
    U72,
    U104,
    U128,
}

impl Width {
    pub const fn bits(self) -> u32 {
        match self {
            Width::U32 => 32,
            Width::U40 => 40,
            Width::U64 => 64,
            Width::U72 => 72,
            Width::U104 => 104,
            Width::U128 => 128,
        }
    }

    /// Largest value representable at this width.
    pub const fn max(self) -> u128 {
        match self {
            Width::U128 => u128::MAX,
            w => (1u128 << w.bits()) - 1,
        }
    }
}

/// Fails with `Overflow` if `value` does not fit in `width`.
pub fn fit(value: u128, width: Width) -> ArithResult<u128> {
    if value > width.max() {
        return Err(ArithmeticError::Overflow);
    }
    Ok(value)
}

pub fn checked_add(a: u128, b: u128, width: Width) -> ArithResult<u128> {
    let sum = a.checked_add(b).ok_or(ArithmeticError::Overflow)?;
    fit(sum, width)
}

pub fn checked_sub(a: u128, b: u128) -> ArithResult<u128> {
    a.checked_sub(b).ok_or(ArithmeticError::Underflow)
}

pub fn checked_mul(a: u128, b: u128, width: Width) -> ArithResult<u128> {
    let product = a.checked_mul(b).ok_or(ArithmeticError::Overflow)?;
    fit(product, width)
}

/// Modular addition at `width`: the result is `(a + b) mod 2^bits`.
pub fn wrapping_add(a: u128, b: u128, width: Width) -> u128 {
    a.wrapping_add(b) & width.max()
}

/// Modular subtraction at `width`: the result is `(a - b) mod 2^bits`.
pub fn wrapping_sub(a: u128, b: u128, width: Width) -> u128 {
    a.wrapping_sub(b) & width.max()
}

/// Narrows a checked value to `u32`.
pub fn to_u32(value: u128) -> ArithResult<u32> {
    u32::try_from(value).map_err(|_| ArithmeticError::Overflow)
}

/// Narrows a checked value to `u64`.
pub fn to_u64(value: u128) -> ArithResult<u64> {
    u64::try_from(value).map_err(|_| ArithmeticError::Overflow)
}

/// Converts an unsigned amount into the signed amount type used by token
/// contracts.
pub fn to_token_amount(value: u128) -> ArithResult<i128> {
    i128::try_from(value).map_err(|_| ArithmeticError::Overflow)
}

// ── 256-bit intermediate ─────────────────────────────────────────────────────

/// Unsigned 256-bit value as two 128-bit limbs.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct Wide {
    hi: u128,
    lo: u128,
}

const LOW_64: u128 = u64::MAX as u128;

impl Wide {
    /// Full 128 x 128 -> 256 bit product.
    fn mul(a: u128, b: u128) -> Self {
        let (a1, a0) = (a >> 64, a & LOW_64);
        let (b1, b0) = (b >> 64, b & LOW_64);

        let p00 = a0 * b0;
        let p01 = a0 * b1;
        let p10 = a1 * b0;
        let p11 = a1 * b1;

        let mid = (p00 >> 64) + (p01 & LOW_64) + (p10 & LOW_64);
        let lo = (p00 & LOW_64) | (mid << 64);
        let hi = p11 + (p01 >> 64) + (p10 >> 64) + (mid >> 64);
        Wide { hi, lo }
    }

    fn mul_u128(self, c: u128) -> ArithResult<Self> {
        let low = Wide::mul(self.lo, c);
        let high = self.hi.checked_mul(c).ok_or(ArithmeticError::Overflow)?;
        let hi = low.hi.checked_add(high).ok_or(ArithmeticError::Overflow)?;
        Ok(Wide { hi, lo: low.lo })
    }

    fn bit(self, i: u32) -> u128 {
        if i >= 128 {
            (self.hi >> (i - 128)) & 1
        } else {
            (self.lo >> i) & 1
        }
    }

    /// Floor division by a 128-bit divisor. The quotient must fit in 128 bits.
    fn div_u128(self, d: u128) -> ArithResult<u128> {
        if d == 0 {
            return Err(ArithmeticError::DivisionByZero);
        }
        if self.hi == 0 {
            return Ok(self.lo / d);
        }
        if self.hi >= d {
            return Err(ArithmeticError::Overflow);
        }

        // Quotient fits in 128 bits from here on, so only the low bits are
        // ever set.
        let mut rem: u128 = 0;
        let mut quotient: u128 = 0;
        for i in (0..256u32).rev() {
            let carry = rem >> 127;
            rem = (rem << 1) | self.bit(i);
            if carry == 1 || rem >= d {
                rem = rem.wrapping_sub(d);
                if i < 128 {
                    quotient |= 1u128 << i;
                }
            }
        }
        Ok(quotient)
    }
}

/// `floor(a * b * c / d)` with a 256-bit intermediate.
///
/// All multiplication happens before the single division so no precision is
/// lost to early truncation.
pub fn mul_mul_div(a: u128, b: u128, c: u128, d: u128) -> ArithResult<u128> {
    if d == 0 {
        return Err(ArithmeticError::DivisionByZero);
    }
    Wide::mul(a, b).mul_u128(c)?.div_u128(d)
}
