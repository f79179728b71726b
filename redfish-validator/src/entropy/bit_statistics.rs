//! Randomness tests over strings of '0' and '1' characters, following NIST SP 800-22.

use std::f64::consts::SQRT_2;

/// Complementary error function, Chebyshev fit with fractional error below 1.2e-7.
pub fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let r = t * (-z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87
                                    + t * (-0.822_152_23 + t * 0.170_872_77)))))))))
        .exp();

    if x >= 0.0 {
        r
    } else {
        2.0 - r
    }
}

fn count_ones(bits: &str) -> usize {
    bits.bytes().filter(|&bit| bit == b'1').count()
}

pub fn monobit_frequency(bits: &str) -> f64 {
    let n = bits.len();
    if n == 0 {
        return 0.0;
    }

    let sum: i64 = bits
        .bytes()
        .map(|bit| if bit == b'1' { 1 } else { -1 })
        .sum();
    let statistic = (sum.abs() as f64) / (n as f64).sqrt();

    erfc(statistic / SQRT_2).min(1.0)
}

/// Runs test. Returns 0.0 without counting runs when the frequency prerequisite fails.
pub fn runs(bits: &str) -> f64 {
    let n = bits.len();
    if n == 0 {
        return 0.0;
    }

    let n = n as f64;
    let pi = count_ones(bits) as f64 / n;
    let tau = 2.0 / n.sqrt();
    let variance = pi * (1.0 - pi);

    if (pi - 0.5).abs() >= tau || variance == 0.0 {
        return 0.0;
    }

    let bytes = bits.as_bytes();
    let v_obs = 1 + bytes.windows(2).filter(|pair| pair[0] != pair[1]).count();

    erfc((v_obs as f64 - 2.0 * n * variance).abs() / (2.0 * (2.0 * n).sqrt() * variance)).min(1.0)
}
