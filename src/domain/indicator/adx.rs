//! ADX with directional indicators (+DI / -DI).
//!
//! TR[i]  = max(high-low, |high-prev_close|, |low-prev_close|)
//! +DM[i] = up_move if up_move > down_move else 0
//! -DM[i] = down_move if down_move > up_move else 0
//! Index 0 has no previous bar and contributes zeros.
//!
//! TR, +DM and -DM are Wilder-smoothed; +DI/-DI = 100 * smoothed DM / smoothed TR;
//! DX = 100 * |+DI - -DI| / (+DI + -DI); ADX = Wilder-smoothed DX.
//! A zero denominator (no range, or no directional movement) yields 0.

use crate::domain::indicator::{fallback_value, insufficient, wilder_smooth};
use crate::domain::price::PriceBar;

pub const DEFAULT_PERIOD: usize = 14;

#[derive(Debug, Clone, PartialEq)]
pub struct Adx {
    pub adx: Vec<f64>,
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

pub fn calculate_adx(bars: &[PriceBar], period: usize) -> Adx {
    if insufficient(bars, period + 1, &[period]) {
        let v = fallback_value(bars);
        return Adx {
            adx: vec![v],
            plus_di: vec![v],
            minus_di: vec![v],
        };
    }

    let n = bars.len();
    let mut tr = vec![0.0; n];
    let mut plus_dm = vec![0.0; n];
    let mut minus_dm = vec![0.0; n];

    for i in 1..n {
        let (prev, bar) = (&bars[i - 1], &bars[i]);
        tr[i] = bar.true_range(prev.close);

        let up_move = bar.high - prev.high;
        let down_move = prev.low - bar.low;
        if up_move > down_move {
            plus_dm[i] = up_move;
        }
        if down_move > up_move {
            minus_dm[i] = down_move;
        }
    }

    let atr = wilder_smooth(&tr, period);
    let plus_smooth = wilder_smooth(&plus_dm, period);
    let minus_smooth = wilder_smooth(&minus_dm, period);

    let plus_di: Vec<f64> = plus_smooth
        .iter()
        .zip(&atr)
        .map(|(dm, tr)| 100.0 * ratio(*dm, *tr))
        .collect();
    let minus_di: Vec<f64> = minus_smooth
        .iter()
        .zip(&atr)
        .map(|(dm, tr)| 100.0 * ratio(*dm, *tr))
        .collect();

    let dx: Vec<f64> = plus_di
        .iter()
        .zip(&minus_di)
        .map(|(p, m)| 100.0 * ratio((p - m).abs(), p + m))
        .collect();
    let adx = wilder_smooth(&dx, period);

    Adx {
        adx,
        plus_di,
        minus_di,
    }
}
