//! Hypergeometric tail similarity used by the PNAS weight variant.
//!
//! Computes `-ln P(X >= k)` for `X ~ Hypergeometric(N, d1, d2)` where `N` is
//! the number of events and `d1`, `d2` the two actors' degrees (Goldberg and
//! Roth, "Assessing experimentally derived interactions in a small world").

/// Goldberg-Roth similarity of two actors with degrees `deg1` and `deg2`,
/// sharing `common` events out of `events` total.
///
/// Returns `-ln` of the upper tail summed from `common` to `min(deg1, deg2)`.
/// A zero tail (numerically impossible overlap) yields `f64::INFINITY`.
pub fn hypergeometric_similarity(deg1: u32, deg2: u32, common: u32, events: u32) -> f64 {
    let min_degree = deg1.min(deg2);
    let mut tail = 0.0f64;
    for shared in common..=min_degree {
        tail += hypergeometric_pmf(events, deg1, deg2, shared);
    }
    -tail.ln()
}

/// Probability that two uniformly drawn event subsets of sizes `deg1` and
/// `deg2` out of `events` overlap in exactly `shared` events.
fn hypergeometric_pmf(events: u32, deg1: u32, deg2: u32, shared: u32) -> f64 {
    if shared > deg1 || shared > deg2 {
        return 0.0;
    }
    // deg2 - shared draws must miss the deg1 successes
    if deg2 - shared > events - deg1 {
        return 0.0;
    }
    let log_pmf = ln_choose(deg1, shared) + ln_choose(events - deg1, deg2 - shared)
        - ln_choose(events, deg2);
    log_pmf.exp()
}

fn ln_choose(n: u32, k: u32) -> f64 {
    ln_gamma(f64::from(n) + 1.0) - ln_gamma(f64::from(k) + 1.0)
        - ln_gamma(f64::from(n - k) + 1.0)
}

/// Lanczos approximation (g = 7, n = 9) of ln(Γ(x)) for positive x.
fn ln_gamma(value: f64) -> f64 {
    if value <= 0.0 {
        return 0.0;
    }
    let lanczos_g = 7.0;
    #[allow(clippy::excessive_precision)]
    let coefficients = [
        0.999_999_999_999_809_93,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_9,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_571_6e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if value < 0.5 {
        let pi = std::f64::consts::PI;
        return pi.ln() - (pi * value).sin().ln() - ln_gamma(1.0 - value);
    }

    let x_minus_one = value - 1.0;
    let mut base = coefficients[0];
    for (i, &c) in coefficients.iter().enumerate().skip(1) {
        base += c / (x_minus_one + i as f64);
    }

    let lanczos_t = x_minus_one + lanczos_g + 0.5;
    let log_2pi = (2.0 * std::f64::consts::PI).ln();
    let log_power_term = lanczos_t.ln() * (x_minus_one + 0.5);
    0.5f64.mul_add(log_2pi, log_power_term) - lanczos_t + base.ln()
}

#[cfg(test)]
mod tests {
    use super::{hypergeometric_pmf, hypergeometric_similarity, ln_gamma};

    #[test]
    fn ln_gamma_known_values() {
        assert!((ln_gamma(1.0)).abs() < 1e-9);
        assert!((ln_gamma(2.0)).abs() < 1e-9);
        // Γ(5) = 24
        assert!((ln_gamma(5.0) - 24.0f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn pmf_sums_to_one() {
        let (events, deg1, deg2) = (12, 5, 4);
        let total: f64 = (0..=deg2)
            .map(|shared| hypergeometric_pmf(events, deg1, deg2, shared))
            .sum();
        assert!((total - 1.0).abs() < 1e-9, "total = {total}");
    }

    #[test]
    fn pmf_matches_direct_count() {
        // N = 4, d1 = 2, d2 = 2, shared = 2: C(2,2)*C(2,0)/C(4,2) = 1/6
        let pmf = hypergeometric_pmf(4, 2, 2, 2);
        assert!((pmf - 1.0 / 6.0).abs() < 1e-9, "pmf = {pmf}");
    }

    #[test]
    fn similarity_of_certain_overlap_is_zero() {
        // Tail from zero always covers the whole distribution.
        let similarity = hypergeometric_similarity(3, 4, 0, 10);
        assert!(similarity.abs() < 1e-9, "similarity = {similarity}");
    }

    #[test]
    fn similarity_grows_with_overlap() {
        let low = hypergeometric_similarity(5, 5, 1, 30);
        let high = hypergeometric_similarity(5, 5, 4, 30);
        assert!(high > low);
    }
}
