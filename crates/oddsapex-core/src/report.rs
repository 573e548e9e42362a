// Text rendering for score results and lay books.
//
// Percentages print to 2 dp, EV to 3 dp, and signed values carry an explicit
// sign. Column widths follow the layout users already read.

use std::fmt::Write;

use crate::lay::{LayBook, LayCandidate};
use crate::score::ScoreResult;

pub const NO_LAYS_MESSAGE: &str = "No positive-EV lay opportunities found.";

/// One-line summary of a score evaluation.
///
/// ```text
/// Name  |  Score: 70.00%  Model%: 18.46%   Mkt%: 10.00%   Edge: +8.46%   FairOdds: 6.79   LiveOdds: 10.00  EV: +0.846
/// ```
pub fn score_summary(name: &str, result: &ScoreResult) -> String {
    let score = format!("{:.2}%", result.score);
    let model = format!("{:.2}%", result.model_probability * 100.0);
    let market = format!("{:.2}%", result.implied_probability * 100.0);
    let edge = format!("{:+.2}%", result.edge * 100.0);
    let fair = format!("{:.2}", result.fair_odds);
    let ev = format!("{:+.3}", result.expected_value);

    format!(
        "{name}  |  Score: {score:<7} Model%: {model:<7}  Mkt%: {market:<7}  \
         Edge: {edge:<7}  FairOdds: {fair:<5}  LiveOdds: {odds:.2}  EV: {ev}",
        odds = result.live_odds,
    )
}

/// Pipe-table row (`name | probability% | odds`) readable as lay input.
pub fn lay_table_row(name: &str, result: &ScoreResult) -> String {
    format!(
        "{} | {:.2} | {:.2}",
        name,
        result.model_probability * 100.0,
        result.live_odds
    )
}

/// Multi-line block for one lay candidate, ending in a blank line.
pub fn lay_candidate_block(candidate: &LayCandidate, currency: &str) -> String {
    format!(
        "{name}\n  Odds:        {odds:.2}\n  Lay EV:      +{ev:.3} per {cur}1\n  \
         Stake:       {cur}{stake:.2}\n  Liability:   {cur}{liability:.2}\n\n",
        name = candidate.name,
        odds = candidate.odds,
        ev = candidate.lay_ev,
        cur = currency,
        stake = candidate.stake,
        liability = candidate.liability,
    )
}

/// Full lay report: bankroll header, then candidates best edge first, or the
/// no-opportunities line.
pub fn lay_report(book: &LayBook, currency: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Bankroll: {currency}{:.2}", book.bankroll.amount());
    let _ = writeln!(
        out,
        "Applying {}% Kelly fraction per lay, listed by best edge:\n",
        format_percent(book.kelly_fraction)
    );

    if book.is_empty() {
        out.push_str(NO_LAYS_MESSAGE);
        out.push('\n');
        return out;
    }

    for candidate in &book.candidates {
        out.push_str(&lay_candidate_block(candidate, currency));
    }
    out
}

/// `0.25` -> `"25"`, `0.125` -> `"12.5"`.
fn format_percent(fraction: f64) -> String {
    let pct = fraction * 100.0;
    if (pct - pct.round()).abs() < 1e-9 {
        format!("{}", pct.round() as i64)
    } else {
        let s = format!("{pct:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
