//! Property tests for performance metrics over arbitrary positive equity curves.

use proptest::prelude::*;
use tradesim_runner::metrics::{
    cagr, drawdown_series, max_drawdown, period_returns, total_return, PerformanceReport,
};

fn arb_curve() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1_000.0..200_000.0_f64, 2..300)
}

proptest! {
    #[test]
    fn drawdown_is_bounded(curve in arb_curve()) {
        let mdd = max_drawdown(&curve);
        prop_assert!(mdd <= 0.0 && mdd > -1.0, "max drawdown {mdd}");
        for dd in drawdown_series(&curve) {
            prop_assert!(dd <= 0.0 && dd >= mdd);
        }
    }

    #[test]
    fn drawdown_has_no_look_ahead(curve in arb_curve(), cut in 1usize..300) {
        // Appending future points never changes past drawdowns.
        let cut = cut.min(curve.len());
        let prefix = drawdown_series(&curve[..cut]);
        let full = drawdown_series(&curve);
        prop_assert_eq!(&prefix[..], &full[..cut]);
    }

    #[test]
    fn returns_compound_to_total_return(curve in arb_curve()) {
        let growth: f64 = period_returns(&curve).iter().map(|r| 1.0 + r).product();
        prop_assert!((growth - 1.0 - total_return(&curve)).abs() < 1e-9 * growth.max(1.0));
    }

    #[test]
    fn cagr_sign_follows_total_return(curve in arb_curve()) {
        let tr = total_return(&curve);
        prop_assume!(tr.abs() > 1e-9);
        prop_assert_eq!(cagr(&curve, 252).signum(), tr.signum());
    }

    #[test]
    fn report_counts_trades_and_never_panics(curve in arb_curve()) {
        let report = PerformanceReport::compute(&curve, &[], 0.01, 252);
        prop_assert_eq!(report.trade_count, 0);
        prop_assert_eq!(report.win_rate, 0.0);
        prop_assert!(report.volatility >= 0.0 || report.volatility.is_nan());
    }
}
