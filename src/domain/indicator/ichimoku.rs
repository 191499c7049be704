//! Ichimoku Cloud.
//!
//! Each line is the midpoint of the highest high and lowest low over a
//! trailing window (9, 26 and 52 bars). Entries before a window fills are 0.
//! The spans are reported at the bar they are computed on; they are not
//! projected forward.

use crate::domain::indicator::{fallback_value, insufficient};
use crate::domain::price::{PriceBar, closes};

pub const TENKAN_PERIOD: usize = 9;
pub const KIJUN_PERIOD: usize = 26;
pub const SENKOU_B_PERIOD: usize = 52;

#[derive(Debug, Clone, PartialEq)]
pub struct Ichimoku {
    pub tenkan: Vec<f64>,
    pub kijun: Vec<f64>,
    pub senkou_a: Vec<f64>,
    pub senkou_b: Vec<f64>,
    pub chikou: Vec<f64>,
}

fn midpoint_series(bars: &[PriceBar], window: usize) -> Vec<f64> {
    let mut out = vec![0.0; bars.len()];
    for i in (window - 1)..bars.len() {
        let slice = &bars[i + 1 - window..=i];
        let highest = slice.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let lowest = slice.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        out[i] = (highest + lowest) / 2.0;
    }
    out
}

pub fn calculate_ichimoku(bars: &[PriceBar]) -> Ichimoku {
    if insufficient(bars, SENKOU_B_PERIOD, &[]) {
        let v = fallback_value(bars);
        return Ichimoku {
            tenkan: vec![v],
            kijun: vec![v],
            senkou_a: vec![v],
            senkou_b: vec![v],
            chikou: vec![v],
        };
    }

    let tenkan = midpoint_series(bars, TENKAN_PERIOD);
    let kijun = midpoint_series(bars, KIJUN_PERIOD);
    let senkou_a = tenkan
        .iter()
        .zip(&kijun)
        .map(|(t, k)| (t + k) / 2.0)
        .collect();
    let senkou_b = midpoint_series(bars, SENKOU_B_PERIOD);

    Ichimoku {
        tenkan,
        kijun,
        senkou_a,
        senkou_b,
        chikou: closes(bars),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_bars::{bar, from_closes};

    fn ramp(n: usize) -> Vec<PriceBar> {
        (0..n)
            .map(|i| {
                let c = 100.0 + i as f64;
                bar(i, c + 1.0, c - 1.0, c)
            })
            .collect()
    }

    #[test]
    fn lines_are_trailing_midpoints() {
        let bars = ramp(60);
        let ichi = calculate_ichimoku(&bars);
        let last = bars.len() - 1;

        // high of bar i = 101 + i, low = 99 + i
        let tenkan = ((101.0 + 59.0) + (99.0 + 51.0)) / 2.0;
        let kijun = ((101.0 + 59.0) + (99.0 + 34.0)) / 2.0;
        let senkou_b = ((101.0 + 59.0) + (99.0 + 8.0)) / 2.0;

        assert!((ichi.tenkan[last] - tenkan).abs() < 1e-9);
        assert!((ichi.kijun[last] - kijun).abs() < 1e-9);
        assert!((ichi.senkou_a[last] - (tenkan + kijun) / 2.0).abs() < 1e-9);
        assert!((ichi.senkou_b[last] - senkou_b).abs() < 1e-9);
        assert_eq!(ichi.chikou[last], 159.0);
    }

    #[test]
    fn spans_are_not_shifted_forward() {
        let bars = ramp(52);
        let ichi = calculate_ichimoku(&bars);
        assert_eq!(ichi.senkou_a.len(), bars.len());
        assert_eq!(ichi.senkou_b[50], 0.0);
        assert!(ichi.senkou_b[51] > 0.0);
    }

    #[test]
    fn warmup_entries_are_zero() {
        let ichi = calculate_ichimoku(&ramp(60));
        assert_eq!(ichi.tenkan[7], 0.0);
        assert!(ichi.tenkan[8] > 0.0);
        assert_eq!(ichi.kijun[24], 0.0);
    }

    #[test]
    fn insufficient_is_flat() {
        let bars = from_closes(&[5.0; 51]);
        let ichi = calculate_ichimoku(&bars);
        assert_eq!(ichi.tenkan, vec![5.0]);
        assert_eq!(ichi.senkou_b, vec![5.0]);
        assert_eq!(calculate_ichimoku(&[]).kijun, vec![0.0]);
    }
}
