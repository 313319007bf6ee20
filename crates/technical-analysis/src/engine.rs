use analysis_core::Bar;
use serde::Serialize;

use crate::indicators::*;

/// Bars needed before the windowed indicators are reported in the snapshot
pub const MIN_BARS: usize = 20;

const RSI_PERIOD: usize = 14;
const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;
const MACD_SIGNAL: usize = 9;
const STOCH_K: usize = 14;
const STOCH_D: usize = 3;
const BB_PERIOD: usize = 20;
const BB_STD_DEV: f64 = 2.0;
const ADX_PERIOD: usize = 14;
const ATR_PERIOD: usize = 14;
const CCI_PERIOD: usize = 20;
const CCI_CONSTANT: f64 = 0.015;
const WILLIAMS_PERIOD: usize = 14;
const MA_PERIOD: usize = 20;

/// One bar of the augmented series, keyed like the chart frontend expects
#[derive(Debug, Clone, Serialize)]
pub struct ChartPoint {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Volume")]
    pub volume: f64,
    #[serde(rename = "RSI")]
    pub rsi: Option<f64>,
    #[serde(rename = "MACD")]
    pub macd: Option<f64>,
    #[serde(rename = "MACD_Signal")]
    pub macd_signal: Option<f64>,
    #[serde(rename = "MACD_Hist")]
    pub macd_hist: Option<f64>,
    #[serde(rename = "Stoch_K")]
    pub stoch_k: Option<f64>,
    #[serde(rename = "Stoch_D")]
    pub stoch_d: Option<f64>,
    #[serde(rename = "BB_High")]
    pub bb_high: Option<f64>,
    #[serde(rename = "BB_Low")]
    pub bb_low: Option<f64>,
    #[serde(rename = "BB_Mid")]
    pub bb_mid: Option<f64>,
    #[serde(rename = "ADX")]
    pub adx: Option<f64>,
    #[serde(rename = "ATR")]
    pub atr: Option<f64>,
    #[serde(rename = "CCI")]
    pub cci: Option<f64>,
    #[serde(rename = "Williams")]
    pub williams: Option<f64>,
    #[serde(rename = "OBV")]
    pub obv: Option<f64>,
    #[serde(rename = "SMA_20")]
    pub sma_20: Option<f64>,
    #[serde(rename = "EMA_20")]
    pub ema_20: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MacdSnapshot {
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub hist: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StochSnapshot {
    pub k: Option<f64>,
    pub d: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BollingerSnapshot {
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub mid: Option<f64>,
    pub price: Option<f64>,
}

/// Latest value of every indicator, structured for the dashboard cards.
/// `None` serializes as `null` ("not available").
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TechnicalSnapshot {
    #[serde(rename = "RSI")]
    pub rsi: Option<f64>,
    #[serde(rename = "MACD")]
    pub macd: MacdSnapshot,
    #[serde(rename = "Stoch")]
    pub stoch: StochSnapshot,
    #[serde(rename = "BB")]
    pub bollinger: BollingerSnapshot,
    #[serde(rename = "ADX")]
    pub adx: Option<f64>,
    #[serde(rename = "ATR")]
    pub atr: Option<f64>,
    #[serde(rename = "CCI")]
    pub cci: Option<f64>,
    #[serde(rename = "Williams")]
    pub williams: Option<f64>,
    #[serde(rename = "OBV")]
    pub obv: Option<f64>,
}

impl TechnicalSnapshot {
    fn from_point(point: &ChartPoint) -> Self {
        Self {
            rsi: point.rsi,
            macd: MacdSnapshot {
                macd: point.macd,
                signal: point.macd_signal,
                hist: point.macd_hist,
            },
            stoch: StochSnapshot {
                k: point.stoch_k,
                d: point.stoch_d,
            },
            bollinger: BollingerSnapshot {
                high: point.bb_high,
                low: point.bb_low,
                mid: point.bb_mid,
                price: Some(point.close),
            },
            adx: point.adx,
            atr: point.atr,
            cci: point.cci,
            williams: point.williams,
            obv: point.obv,
        }
    }

    /// Snapshot for a series too short for the windowed indicators
    fn insufficient(point: &ChartPoint) -> Self {
        Self {
            bollinger: BollingerSnapshot {
                price: Some(point.close),
                ..Default::default()
            },
            obv: point.obv,
            ..Default::default()
        }
    }
}

pub struct IndicatorEngine;

impl IndicatorEngine {
    pub fn new() -> Self {
        Self
    }

    /// Augment every bar with the indicator columns and snapshot the last row.
    pub fn compute(&self, bars: &[Bar]) -> (Vec<ChartPoint>, TechnicalSnapshot) {
        let prices = close_series(bars);

        let rsi_values = rsi(&prices, RSI_PERIOD);
        let macd_result = macd(&prices, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
        let stoch = stochastic(bars, STOCH_K, STOCH_D);
        let bb = bollinger_bands(&prices, BB_PERIOD, BB_STD_DEV);
        let adx_result = adx(bars, ADX_PERIOD);
        let atr_values = atr(bars, ATR_PERIOD);
        let cci_values = cci(bars, CCI_PERIOD, CCI_CONSTANT);
        let williams_values = williams_r(bars, WILLIAMS_PERIOD);
        let obv_values = obv(bars);
        let sma_values = sma(&prices, MA_PERIOD);
        let ema_values = ema(&prices, MA_PERIOD);

        let points: Vec<ChartPoint> = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| ChartPoint {
                date: bar.date.format("%Y-%m-%d").to_string(),
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
                rsi: rsi_values[i],
                macd: macd_result.macd_line[i],
                macd_signal: macd_result.signal_line[i],
                macd_hist: macd_result.histogram[i],
                stoch_k: stoch.k[i],
                stoch_d: stoch.d[i],
                bb_high: bb.upper[i],
                bb_low: bb.lower[i],
                bb_mid: bb.middle[i],
                adx: adx_result.adx[i],
                atr: atr_values[i],
                cci: cci_values[i],
                williams: williams_values[i],
                obv: obv_values.get(i).copied(),
                sma_20: sma_values[i],
                ema_20: ema_values[i],
            })
            .collect();

        let snapshot = match points.last() {
            None => TechnicalSnapshot::default(),
            Some(last) if bars.len() < MIN_BARS => {
                tracing::debug!(bars = bars.len(), "Too few bars for windowed indicators");
                TechnicalSnapshot::insufficient(last)
            }
            Some(last) => TechnicalSnapshot::from_point(last),
        };

        (points, snapshot)
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new()
    }
}
