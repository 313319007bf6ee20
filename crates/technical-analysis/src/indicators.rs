//! Indicator math over daily bars.
//!
//! Every function returns a series aligned with its input: slot `i` belongs to
//! bar `i`, and slots inside the warm-up window are `None`.

use analysis_core::Bar;

/// Closes of a bar slice, for the close-only indicators
pub fn close_series(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

fn true_ranges(bars: &[Bar]) -> Vec<f64> {
    bars.windows(2)
        .map(|w| {
            let high_low = w[1].high - w[1].low;
            let high_close = (w[1].high - w[0].close).abs();
            let low_close = (w[1].low - w[0].close).abs();
            high_low.max(high_close).max(low_close)
        })
        .collect()
}

/// Simple Moving Average
pub fn sma(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let series: Vec<Option<f64>> = data.iter().copied().map(Some).collect();
    sma_of(&series, period)
}

/// SMA over a series with gaps; a slot is defined only when the whole
/// window behind it is.
pub fn sma_of(data: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; data.len()];
    if period == 0 || data.len() < period {
        return result;
    }

    for i in period - 1..data.len() {
        let window = &data[i + 1 - period..=i];
        if window.iter().all(Option::is_some) {
            let sum: f64 = window.iter().flatten().sum();
            result[i] = Some(sum / period as f64);
        }
    }
    result
}

/// Exponential Moving Average (recursive, seeded with the first value,
/// defined once `period` observations have been seen)
pub fn ema(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let series: Vec<Option<f64>> = data.iter().copied().map(Some).collect();
    ema_of(&series, period)
}

/// EMA over a series whose leading slots may be undefined
pub fn ema_of(data: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; data.len()];
    if period == 0 {
        return result;
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut current: Option<f64> = None;
    let mut seen = 0usize;

    for (i, value) in data.iter().enumerate() {
        let Some(x) = *value else { continue };
        let next = match current {
            Some(prev) => (x - prev) * multiplier + prev,
            None => x,
        };
        current = Some(next);
        seen += 1;
        if seen >= period {
            result[i] = Some(next);
        }
    }

    result
}

/// Relative Strength Index (Wilder smoothing)
pub fn rsi(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; data.len()];
    if period == 0 || data.len() < period + 1 {
        return result;
    }

    let mut gains = Vec::with_capacity(data.len() - 1);
    let mut losses = Vec::with_capacity(data.len() - 1);

    for w in data.windows(2) {
        let change = w[1] - w[0];
        if change > 0.0 {
            gains.push(change);
            losses.push(0.0);
        } else {
            gains.push(0.0);
            losses.push(change.abs());
        }
    }

    let strength = |avg_gain: f64, avg_loss: f64| -> f64 {
        if avg_loss == 0.0 {
            if avg_gain == 0.0 { 50.0 } else { 100.0 }
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        }
    };

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;
    result[period] = Some(strength(avg_gain, avg_loss));

    // change j closes bar j + 1
    for j in period..gains.len() {
        avg_gain = (avg_gain * (period - 1) as f64 + gains[j]) / period as f64;
        avg_loss = (avg_loss * (period - 1) as f64 + losses[j]) / period as f64;
        result[j + 1] = Some(strength(avg_gain, avg_loss));
    }

    result
}

/// MACD (Moving Average Convergence Divergence)
pub struct MacdResult {
    pub macd_line: Vec<Option<f64>>,
    pub signal_line: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

pub fn macd(data: &[f64], fast_period: usize, slow_period: usize, signal_period: usize) -> MacdResult {
    let empty = vec![None; data.len()];
    if fast_period == 0 || slow_period == 0 || signal_period == 0 || slow_period < fast_period {
        return MacdResult {
            macd_line: empty.clone(),
            signal_line: empty.clone(),
            histogram: empty,
        };
    }

    let ema_fast = ema(data, fast_period);
    let ema_slow = ema(data, slow_period);

    let macd_line: Vec<Option<f64>> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(fast, slow)| Some((*fast)? - (*slow)?))
        .collect();

    let signal_line = ema_of(&macd_line, signal_period);

    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(line, signal)| Some((*line)? - (*signal)?))
        .collect();

    MacdResult {
        macd_line,
        signal_line,
        histogram,
    }
}

/// Bollinger Bands
pub struct BollingerBands {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

pub fn bollinger_bands(data: &[f64], period: usize, std_dev: f64) -> BollingerBands {
    let middle = sma(data, period);
    let mut upper = vec![None; data.len()];
    let mut lower = vec![None; data.len()];

    for (i, mean) in middle.iter().enumerate() {
        let Some(mean) = *mean else { continue };
        let slice = &data[i + 1 - period..=i];
        // population deviation
        let variance: f64 = slice.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period as f64;
        let std = variance.sqrt();

        upper[i] = Some(mean + std_dev * std);
        lower[i] = Some(mean - std_dev * std);
    }

    BollingerBands {
        upper,
        middle,
        lower,
    }
}

/// Average True Range
pub fn atr(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; bars.len()];
    if period == 0 || bars.len() < period + 1 {
        return result;
    }

    let ranges = true_ranges(bars);
    let mut atr = ranges[..period].iter().sum::<f64>() / period as f64;
    result[period] = Some(atr);

    for j in period..ranges.len() {
        atr = (atr * (period - 1) as f64 + ranges[j]) / period as f64;
        result[j + 1] = Some(atr);
    }

    result
}

/// Stochastic Oscillator
pub struct StochasticResult {
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
}

pub fn stochastic(bars: &[Bar], k_period: usize, d_period: usize) -> StochasticResult {
    let mut k_values = vec![None; bars.len()];
    if k_period == 0 || bars.len() < k_period {
        return StochasticResult { d: k_values.clone(), k: k_values };
    }

    for i in k_period - 1..bars.len() {
        let slice = &bars[i + 1 - k_period..=i];
        let highest = slice.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let lowest = slice.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);

        let k = if highest == lowest {
            50.0
        } else {
            100.0 * (bars[i].close - lowest) / (highest - lowest)
        };

        k_values[i] = Some(k);
    }

    let d_values = sma_of(&k_values, d_period);

    StochasticResult {
        k: k_values,
        d: d_values,
    }
}

/// Williams %R, bounded to [-100, 0]
pub fn williams_r(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; bars.len()];
    if period == 0 || bars.len() < period {
        return result;
    }

    for i in period - 1..bars.len() {
        let slice = &bars[i + 1 - period..=i];
        let highest = slice.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let lowest = slice.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);

        result[i] = Some(if highest == lowest {
            -50.0
        } else {
            -100.0 * (highest - bars[i].close) / (highest - lowest)
        });
    }

    result
}

/// Commodity Channel Index over the typical price
pub fn cci(bars: &[Bar], period: usize, constant: f64) -> Vec<Option<f64>> {
    let mut result = vec![None; bars.len()];
    if period == 0 || bars.len() < period {
        return result;
    }

    let typical: Vec<f64> = bars.iter().map(|b| (b.high + b.low + b.close) / 3.0).collect();

    for i in period - 1..typical.len() {
        let window = &typical[i + 1 - period..=i];
        let mean = window.iter().sum::<f64>() / period as f64;
        let mean_deviation = window.iter().map(|tp| (tp - mean).abs()).sum::<f64>() / period as f64;

        result[i] = Some(if mean_deviation == 0.0 {
            0.0
        } else {
            (typical[i] - mean) / (constant * mean_deviation)
        });
    }

    result
}

/// On-Balance Volume
pub fn obv(bars: &[Bar]) -> Vec<f64> {
    if bars.is_empty() {
        return vec![];
    }

    let mut obv_values = Vec::with_capacity(bars.len());
    obv_values.push(bars[0].volume);

    for i in 1..bars.len() {
        let prev_obv = obv_values[i - 1];
        let new_obv = if bars[i].close > bars[i - 1].close {
            prev_obv + bars[i].volume
        } else if bars[i].close < bars[i - 1].close {
            prev_obv - bars[i].volume
        } else {
            prev_obv
        };
        obv_values.push(new_obv);
    }

    obv_values
}

/// Average Directional Index (ADX), trend strength on a 0-100 scale
pub struct AdxResult {
    pub adx: Vec<Option<f64>>,
    pub plus_di: Vec<Option<f64>>,
    pub minus_di: Vec<Option<f64>>,
}

pub fn adx(bars: &[Bar], period: usize) -> AdxResult {
    let n = bars.len();
    let mut adx_values = vec![None; n];
    let mut plus_di_values = vec![None; n];
    let mut minus_di_values = vec![None; n];

    if period == 0 || n < period * 2 + 1 {
        return AdxResult { adx: adx_values, plus_di: plus_di_values, minus_di: minus_di_values };
    }

    // +DM, -DM; movement j closes bar j + 1
    let mut plus_dm = Vec::with_capacity(n - 1);
    let mut minus_dm = Vec::with_capacity(n - 1);

    for w in bars.windows(2) {
        let up_move = w[1].high - w[0].high;
        let down_move = w[0].low - w[1].low;

        plus_dm.push(if up_move > down_move && up_move > 0.0 { up_move } else { 0.0 });
        minus_dm.push(if down_move > up_move && down_move > 0.0 { down_move } else { 0.0 });
    }
    let true_range = true_ranges(bars);

    // Wilder sums
    let mut smoothed_plus_dm = plus_dm[..period].iter().sum::<f64>();
    let mut smoothed_minus_dm = minus_dm[..period].iter().sum::<f64>();
    let mut smoothed_tr = true_range[..period].iter().sum::<f64>();

    let mut dx_values = Vec::with_capacity(plus_dm.len() - period);

    for j in period..plus_dm.len() {
        smoothed_plus_dm = smoothed_plus_dm - smoothed_plus_dm / period as f64 + plus_dm[j];
        smoothed_minus_dm = smoothed_minus_dm - smoothed_minus_dm / period as f64 + minus_dm[j];
        smoothed_tr = smoothed_tr - smoothed_tr / period as f64 + true_range[j];

        let pdi = if smoothed_tr > 0.0 { 100.0 * smoothed_plus_dm / smoothed_tr } else { 0.0 };
        let mdi = if smoothed_tr > 0.0 { 100.0 * smoothed_minus_dm / smoothed_tr } else { 0.0 };

        plus_di_values[j + 1] = Some(pdi);
        minus_di_values[j + 1] = Some(mdi);

        let di_sum = pdi + mdi;
        let dx = if di_sum > 0.0 { 100.0 * (pdi - mdi).abs() / di_sum } else { 0.0 };
        dx_values.push(dx);
    }

    // dx k closes bar period + k + 1
    let mut adx_val = dx_values[..period].iter().sum::<f64>() / period as f64;
    adx_values[2 * period] = Some(adx_val);

    for k in period..dx_values.len() {
        adx_val = (adx_val * (period - 1) as f64 + dx_values[k]) / period as f64;
        adx_values[period + k + 1] = Some(adx_val);
    }

    AdxResult {
        adx: adx_values,
        plus_di: plus_di_values,
        minus_di: minus_di_values,
    }
}
