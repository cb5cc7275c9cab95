//! Densities and quantiles used to weight sorted pools.

use std::f64::consts::PI;

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

const MAX_ITERATIONS: usize = 500;
const EPSILON: f64 = 1e-14;
// halvings needed to get from 1.0 down to the smallest subnormal
const MAX_BISECTIONS: usize = 1100;

/// `n` evenly spaced points over `[start, end]`, both ends included.
///
/// A single point is `start`; zero points is empty.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Density of N(0, std) at `x`.
pub fn normal_pdf(x: f64, std: f64) -> f64 {
    let z = x / std;
    (-0.5 * z * z).exp() / (std * (2.0 * PI).sqrt())
}

/// Density of Gamma(shape, scale) at `x`.
pub fn gamma_pdf(x: f64, shape: f64, scale: f64) -> f64 {
    if x < 0.0 {
        return 0.0;
    }
    if x == 0.0 {
        return match shape {
            s if s < 1.0 => f64::INFINITY,
            s if s == 1.0 => 1.0 / scale,
            _ => 0.0,
        };
    }
    ((shape - 1.0) * x.ln() - x / scale - ln_gamma(shape) - shape * scale.ln()).exp()
}

/// Natural log of the gamma function (Lanczos approximation).
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // Reflection formula
        return (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut sum = LANCZOS_COEFFICIENTS[0];
    for (i, c) in LANCZOS_COEFFICIENTS.iter().enumerate().skip(1) {
        sum += c / (x + i as f64);
    }
    let t = x + LANCZOS_G + 0.5;
    0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + sum.ln()
}

/// Regularized lower incomplete gamma function P(a, x).
pub fn regularized_lower_gamma(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x < a + 1.0 {
        lower_gamma_series(a, x)
    } else {
        1.0 - upper_gamma_continued_fraction(a, x)
    }
}

fn lower_gamma_series(a: f64, x: f64) -> f64 {
    let mut term = 1.0 / a;
    let mut sum = term;
    let mut n = a;
    for _ in 0..MAX_ITERATIONS {
        n += 1.0;
        term *= x / n;
        sum += term;
        if term.abs() < sum.abs() * EPSILON {
            break;
        }
    }
    sum * (-x + a * x.ln() - ln_gamma(a)).exp()
}

// Modified Lentz evaluation of the continued fraction for Q(a, x)
fn upper_gamma_continued_fraction(a: f64, x: f64) -> f64 {
    let tiny = f64::MIN_POSITIVE / EPSILON;
    let mut b = x + 1.0 - a;
    let mut c = 1.0 / tiny;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..=MAX_ITERATIONS {
        let an = -(i as f64) * (i as f64 - a);
        b += 2.0;
        d = an * d + b;
        if d.abs() < tiny {
            d = tiny;
        }
        c = b + an / c;
        if c.abs() < tiny {
            c = tiny;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < EPSILON {
            break;
        }
    }
    (-x + a * x.ln() - ln_gamma(a)).exp() * h
}

/// Cumulative distribution of Gamma(shape, scale) at `x`.
pub fn gamma_cdf(x: f64, shape: f64, scale: f64) -> f64 {
    regularized_lower_gamma(shape, x / scale)
}

/// Quantile of Gamma(shape, scale) for probability `p` in (0, 1), by bisection.
pub fn gamma_ppf(p: f64, shape: f64, scale: f64) -> f64 {
    let mut lo = 0.0;
    let mut hi = shape.max(1.0);
    while regularized_lower_gamma(shape, hi) < p {
        lo = hi;
        hi *= 2.0;
    }
    for _ in 0..MAX_BISECTIONS {
        let mid = 0.5 * (lo + hi);
        if regularized_lower_gamma(shape, mid) < p {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= EPSILON * hi {
            break;
        }
    }
    0.5 * (lo + hi) * scale
}
