// Decimal-odds arithmetic shared by the score model and the lay book.
//
// All prices use the decimal convention: a winning unit stake at odds `o`
// returns `o` units including the stake.

/// Market-implied win probability: `1 / odds`.
pub fn implied_probability(odds: f64) -> f64 {
    1.0 / odds
}

/// Expected profit of a unit back stake: `p * (odds - 1) - (1 - p)`.
pub fn back_ev(probability: f64, odds: f64) -> f64 {
    probability * (odds - 1.0) - (1.0 - probability)
}

/// Expected profit of laying the same outcome (the mirror of `back_ev`).
pub fn lay_ev(probability: f64, odds: f64) -> f64 {
    -back_ev(probability, odds)
}

/// Model probability minus market-implied probability.
pub fn edge(probability: f64, odds: f64) -> f64 {
    probability - implied_probability(odds)
}

/// Odds at which a back bet has zero expected value under `probability`.
pub fn fair_odds(probability: f64) -> f64 {
    1.0 / probability
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn implied_probability_of_evens_is_half() {
        assert!(approx_eq(implied_probability(2.0), 0.5, 1e-12));
        assert!(approx_eq(implied_probability(10.0), 0.1, 1e-12));
    }

    #[test]
    fn back_ev_known_values() {
        // 20% at 6.0: 0.2 * 5 - 0.8 = 0.2
        assert!(approx_eq(back_ev(0.2, 6.0), 0.2, 1e-12));
        // 3% at 20.0: 0.03 * 19 - 0.97 = -0.4
        assert!(approx_eq(back_ev(0.03, 20.0), -0.4, 1e-12));
    }

    #[test]
    fn back_ev_is_zero_at_fair_odds() {
        for p in [0.02, 0.1, 0.25, 0.5, 0.9] {
            assert!(approx_eq(back_ev(p, fair_odds(p)), 0.0, 1e-12));
        }
    }

    #[test]
    fn lay_ev_mirrors_back_ev() {
        for (p, o) in [(0.03, 20.0), (0.2, 6.0), (0.5, 2.0)] {
            assert_eq!(lay_ev(p, o), -back_ev(p, o));
        }
    }

    #[test]
    fn ev_sign_follows_edge_sign() {
        for (p, o) in [(0.3, 5.0), (0.1, 5.0), (0.05, 30.0), (0.01, 30.0)] {
            let e = edge(p, o);
            let ev = back_ev(p, o);
            assert_eq!(e > 0.0, ev > 0.0, "p={p} odds={o} edge={e} ev={ev}");
        }
    }
}
