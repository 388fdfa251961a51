/// Parses fee text typed by the applicant. Blank, non-numeric, negative and
/// non-finite input all collapse to 0.
pub fn coerce_fee(raw: &str) -> f64 {
    raw.trim().parse::<f64>().map(sanitize_fee).unwrap_or(0.0)
}

pub fn sanitize_fee(fee: f64) -> f64 {
    if fee.is_finite() && fee > 0.0 {
        fee
    } else {
        0.0
    }
}
