//! Float formatting helpers shared by every label the dashboard shows.
//!
//! Rust's core float-to-decimal formatting has had wasm-facing panics in some
//! toolchain/browser combinations. These helpers never call `format!` on a
//! float: finite values are scaled and rounded into an `i64`, then the integer
//! parts are printed.

/// Fixed-point rendering with `decimals` digits after the point.
///
/// Rounds half away from zero, like `Number.prototype.toFixed` for the values
/// the dashboard displays.
pub fn fmt_fixed(v: f64, decimals: usize) -> String {
    if !v.is_finite() {
        return if v.is_nan() {
            "NaN".to_string()
        } else if v.is_sign_positive() {
            "Inf".to_string()
        } else {
            "-Inf".to_string()
        };
    }

    let decimals = decimals.min(9);
    let scale_i64 = 10_i64.checked_pow(decimals as u32).unwrap_or(1);
    let scaled = (v * scale_i64 as f64).round();
    if !scaled.is_finite() || scaled.abs() > i64::MAX as f64 {
        return if v.is_sign_negative() {
            "-Inf".to_string()
        } else {
            "Inf".to_string()
        };
    }

    let scaled_i = scaled as i64;
    let abs_i = scaled_i.abs();
    let int_part = abs_i / scale_i64;
    let frac_part = abs_i % scale_i64;

    let mut out = String::new();
    if scaled_i < 0 {
        out.push('-');
    }
    out.push_str(&int_part.to_string());
    if decimals > 0 {
        out.push('.');
        let frac = frac_part.to_string();
        for _ in 0..decimals.saturating_sub(frac.len()) {
            out.push('0');
        }
        out.push_str(&frac);
    }
    out
}

/// `41.3%` style label for a value already expressed in percent.
pub fn fmt_percent(v: f64, decimals: usize) -> String {
    let mut s = fmt_fixed(v, decimals);
    s.push('%');
    s
}

/// `72.0%` style label for a 0–1 fraction.
pub fn fmt_fraction_percent(v: f64, decimals: usize) -> String {
    fmt_percent(v * 100.0, decimals)
}

/// `$12500` style label, whole dollars.
pub fn fmt_dollars(v: f64) -> String {
    let mut s = String::from("$");
    s.push_str(&fmt_fixed(v, 0));
    s
}

/// Tick label for a linear axis: integers print bare, everything else keeps
/// just enough decimals for the tick step.
pub fn fmt_tick(v: f64, step: f64) -> String {
    let step = step.abs();
    let decimals = if step == 0.0 || !step.is_finite() || step >= 1.0 {
        0
    } else {
        (-step.log10() - 1e-9).ceil().max(0.0) as usize
    };
    if decimals == 0 && (v - v.round()).abs() > f64::EPSILON {
        return fmt_fixed(v, 1);
    }
    fmt_fixed(v, decimals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_pads_and_rounds() {
        assert_eq!(fmt_fixed(61.25, 1), "61.3");
        assert_eq!(fmt_fixed(7.0, 2), "7.00");
        assert_eq!(fmt_fixed(0.05, 1), "0.1");
        assert_eq!(fmt_fixed(-2.5, 0), "-3");
        assert_eq!(fmt_fixed(-0.01, 1), "0.0");
    }

    #[test]
    fn non_finite_values_do_not_panic() {
        assert_eq!(fmt_fixed(f64::NAN, 1), "NaN");
        assert_eq!(fmt_fixed(f64::INFINITY, 1), "Inf");
        assert_eq!(fmt_fixed(f64::NEG_INFINITY, 1), "-Inf");
        assert_eq!(fmt_fixed(1e300, 3), "Inf");
    }

    #[test]
    fn slider_label_shapes() {
        assert_eq!(fmt_percent(41.26, 1), "41.3%");
        assert_eq!(fmt_fraction_percent(0.72, 1), "72.0%");
        assert_eq!(fmt_dollars(12499.6), "$12500");
    }

    #[test]
    fn tick_labels_follow_step() {
        assert_eq!(fmt_tick(20.0, 20.0), "20");
        assert_eq!(fmt_tick(0.05, 0.01), "0.05");
        assert_eq!(fmt_tick(0.2, 0.1), "0.2");
        assert_eq!(fmt_tick(2018.5, 1.0), "2018.5");
    }
}
