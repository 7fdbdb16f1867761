//! Si5351 Frequency Calculation
//!
//! Provides fractional-N PLL and multisynth divider calculations
//! for precise frequency synthesis. This module is testable on the host.
//!
//! # Theory of Operation
//!
//! The Si5351 uses a two-stage frequency synthesis:
//! 1. PLL stage: FVCO = FXTAL × (a + b/c) where 15 ≤ a ≤ 90
//! 2. Multisynth stage: FOUT = FVCO / (d × R) where d is 4 or 6..=1800
//!
//! The multisynth is kept on an integer divisor for phase noise; the PLL
//! takes up the fractional part.

/// PLL parameters for frequency calculation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PllParams {
    /// Integer part (15-90)
    pub a: u32,
    /// Numerator (0 to c-1)
    pub b: u32,
    /// Denominator (1-1048575)
    pub c: u32,
}

impl PllParams {
    /// Minimum PLL multiplier
    pub const MIN_A: u32 = 15;
    /// Maximum PLL multiplier
    pub const MAX_A: u32 = 90;
    /// Maximum denominator (20 bits)
    pub const MAX_C: u32 = 1_048_575;

    /// Create integer PLL params (b=0, c=1)
    #[must_use]
    pub const fn integer(a: u32) -> Self {
        Self { a, b: 0, c: 1 }
    }

    /// Create fractional PLL params
    #[must_use]
    pub const fn fractional(a: u32, b: u32, c: u32) -> Self {
        Self { a, b, c }
    }

    /// Calculate the VCO frequency given crystal frequency
    #[must_use]
    pub fn vco_frequency(&self, xtal_hz: u64) -> u64 {
        // FVCO = (FXTAL × a × c + FXTAL × b) / c
        (xtal_hz * u64::from(self.a) * u64::from(self.c) + xtal_hz * u64::from(self.b))
            / u64::from(self.c)
    }

    /// Validate parameters are in range
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.a >= Self::MIN_A
            && self.a <= Self::MAX_A
            && self.c >= 1
            && self.c <= Self::MAX_C
            && self.b < self.c
    }

    /// Calculate P1, P2, P3 register values
    #[must_use]
    pub fn to_registers(&self) -> (u32, u32, u32) {
        // P1 = 128 × a + floor(128 × b/c) - 512
        // P2 = 128 × b - c × floor(128 × b/c)
        // P3 = c
        let floor_128b_c = ((128 * u64::from(self.b)) / u64::from(self.c)) as u32;
        let p1 = 128 * self.a + floor_128b_c - 512;
        let p2 = 128 * self.b - self.c * floor_128b_c;
        (p1, p2, self.c)
    }
}

/// Multisynth divider parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MsParams {
    /// Integer divisor (4, 6-1800)
    pub a: u32,
    /// R divider power of 2 (0-7 for 1, 2, 4, 8, 16, 32, 64, 128)
    pub r_div: u8,
}

impl MsParams {
    /// Minimum integer divisor
    pub const MIN_A: u32 = 4;
    /// Maximum integer divisor
    pub const MAX_A: u32 = 1800;

    /// Create integer multisynth params
    #[must_use]
    pub const fn integer(a: u32) -> Self {
        Self { a, r_div: 0 }
    }

    /// Create integer multisynth with R divider
    #[must_use]
    pub const fn integer_with_r(a: u32, r_div: u8) -> Self {
        Self { a, r_div }
    }

    /// Calculate output frequency given VCO frequency
    #[must_use]
    pub fn output_frequency(&self, vco_hz: u64) -> u64 {
        vco_hz / u64::from(self.a) / (1u64 << self.r_div)
    }

    /// Validate parameters are in range
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        // a=5 is not allowed
        let a_valid = self.a == 4 || (self.a >= 6 && self.a <= Self::MAX_A);
        a_valid && self.r_div <= 7
    }

    /// Divide-by-4 mode needs its own register encoding
    #[must_use]
    pub const fn is_divby4(&self) -> bool {
        self.a == 4
    }

    /// Calculate P1, P2, P3 register values
    #[must_use]
    pub const fn to_registers(&self) -> (u32, u32, u32) {
        if self.is_divby4() {
            (0, 0, 1)
        } else {
            (128 * self.a - 512, 0, 1)
        }
    }
}

/// A complete synthesis plan for one output
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Synthesis {
    /// PLL settings
    pub pll: PllParams,
    /// Multisynth settings
    pub ms: MsParams,
    /// Frequency actually produced
    pub actual_hz: u64,
    /// `actual - target`
    pub error_hz: i64,
}

/// Minimum VCO frequency (600 MHz)
pub const VCO_MIN_HZ: u64 = 600_000_000;
/// Maximum VCO frequency (900 MHz)
pub const VCO_MAX_HZ: u64 = 900_000_000;

/// Highest output reachable with an integer multisynth
pub const OUTPUT_MAX_HZ: u64 = VCO_MAX_HZ / MsParams::MIN_A as u64;

/// Apply a parts-per-billion correction to a crystal frequency
#[must_use]
pub fn corrected_xtal_hz(xtal_hz: u32, correction_ppb: i32) -> u64 {
    let xtal = i64::from(xtal_hz);
    let corrected = xtal + xtal * i64::from(correction_ppb) / 1_000_000_000;
    u64::try_from(corrected).unwrap_or(0)
}

/// Calculate frequency synthesis parameters for a target frequency
///
/// Returns None when the target cannot be produced from this crystal.
#[must_use]
pub fn calculate_frequency(xtal_hz: u64, target_hz: u64) -> Option<Synthesis> {
    if target_hz == 0 || target_hz > OUTPUT_MAX_HZ || xtal_hz == 0 {
        return None;
    }

    // Outputs below VCO_MIN / 1800 need the R divider
    for r_div in 0u8..=7 {
        let effective_target = target_hz << r_div;
        if effective_target * u64::from(MsParams::MAX_A) < VCO_MIN_HZ {
            continue;
        }
        return search_divisors(xtal_hz, target_hz, r_div);
    }

    None
}

/// Try every integer multisynth divisor for one R setting
fn search_divisors(xtal_hz: u64, target_hz: u64, r_div: u8) -> Option<Synthesis> {
    let effective_target = target_hz << r_div;
    let ms_min = VCO_MIN_HZ.div_ceil(effective_target).max(u64::from(MsParams::MIN_A));
    let ms_max = (VCO_MAX_HZ / effective_target).min(u64::from(MsParams::MAX_A));

    let mut best: Option<Synthesis> = None;

    for ms_a in ms_min..=ms_max {
        let ms = MsParams::integer_with_r(ms_a as u32, r_div);
        if !ms.is_valid() {
            continue;
        }

        let vco_required = effective_target * ms_a;
        let Some(pll) = calculate_pll_params(xtal_hz, vco_required) else {
            continue;
        };

        let actual_hz = ms.output_frequency(pll.vco_frequency(xtal_hz));
        let error_hz = actual_hz as i64 - target_hz as i64;

        let better = best.is_none_or(|b| error_hz.unsigned_abs() < b.error_hz.unsigned_abs());
        if better {
            best = Some(Synthesis {
                pll,
                ms,
                actual_hz,
                error_hz,
            });
            if error_hz == 0 {
                break;
            }
        }
    }

    best
}

/// Calculate PLL parameters to achieve target VCO frequency
fn calculate_pll_params(xtal_hz: u64, target_vco: u64) -> Option<PllParams> {
    let a = target_vco / xtal_hz;

    if a < u64::from(PllParams::MIN_A) || a > u64::from(PllParams::MAX_A) {
        return None;
    }

    let remainder = target_vco - a * xtal_hz;
    if remainder == 0 {
        return Some(PllParams::integer(a as u32));
    }

    let (b, c) = rational_approximation(remainder, xtal_hz, PllParams::MAX_C);
    let pll = if b >= c {
        // Fraction rounded up to a whole step
        PllParams::integer(a as u32 + 1)
    } else {
        PllParams::fractional(a as u32, b, c)
    };

    pll.is_valid().then_some(pll)
}

/// Best rational approximation b/c ≈ num/den with c ≤ `max_c`
///
/// Walks the continued fraction expansion of num/den; when the next
/// convergent's denominator would exceed `max_c`, the best semiconvergent
/// is compared against the last convergent.
fn rational_approximation(num: u64, den: u64, max_c: u32) -> (u32, u32) {
    if num == 0 || den == 0 {
        return (0, 1);
    }

    let max_c = u64::from(max_c);
    let (mut p_prev, mut q_prev) = (0u64, 1u64);
    let (mut p, mut q) = (1u64, 0u64);
    let (mut n, mut d) = (num, den);

    while d != 0 {
        let a = n / d;
        let q_next = a * q + q_prev;
        if q_next > max_c {
            if q == 0 {
                break;
            }
            let k = (max_c - q_prev) / q;
            let semi = (p_prev + k * p, q_prev + k * q);
            if semi.1 != 0 && closer(num, den, semi, (p, q)) {
                (p, q) = semi;
            }
            break;
        }
        let p_next = a * p + p_prev;
        (p_prev, q_prev, p, q) = (p, q, p_next, q_next);
        (n, d) = (d, n - a * d);
    }

    if q == 0 {
        return (0, 1);
    }
    (p as u32, q as u32)
}

/// Is `x` a strictly better approximation of num/den than `y`?
fn closer(num: u64, den: u64, x: (u64, u64), y: (u64, u64)) -> bool {
    // |x.0/x.1 - num/den| < |y.0/y.1 - num/den|
    // ⇔ |x.0·den - num·x.1| · y.1 < |y.0·den - num·y.1| · x.1
    let dist = |(p, q): (u64, u64)| {
        (u128::from(p) * u128::from(den)).abs_diff(u128::from(num) * u128::from(q))
    };
    dist(x) * u128::from(y.1) < dist(y) * u128::from(x.1)
}
