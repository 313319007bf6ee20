#[cfg(test)]
mod tests {
    use super::super::indicators::*;
    use analysis_core::Bar;
    use chrono::{Duration, NaiveDate};

    fn defined(series: &[Option<f64>]) -> Vec<f64> {
        series.iter().flatten().copied().collect()
    }

    // Helper function to create sample price data
    fn sample_prices() -> Vec<f64> {
        vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ]
    }

    // Helper function to create sample bars
    fn sample_bars() -> Vec<Bar> {
        let prices = vec![
            (100.0, 102.0, 99.0, 101.0),
            (101.0, 103.0, 100.0, 102.0),
            (102.0, 104.0, 101.0, 103.0),
            (103.0, 105.0, 102.0, 104.0),
            (104.0, 106.0, 103.0, 105.0),
            (105.0, 107.0, 104.0, 106.0),
            (106.0, 108.0, 105.0, 107.0),
            (107.0, 109.0, 106.0, 108.0),
            (108.0, 110.0, 107.0, 109.0),
            (109.0, 111.0, 108.0, 110.0),
            (110.0, 112.0, 109.0, 111.0),
            (111.0, 113.0, 110.0, 112.0),
            (112.0, 114.0, 111.0, 113.0),
            (113.0, 115.0, 112.0, 114.0),
            (114.0, 116.0, 113.0, 115.0),
        ];

        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        prices
            .into_iter()
            .enumerate()
            .map(|(i, (open, high, low, close))| Bar {
                date: start + Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: 1000000.0,
            })
            .collect()
    }

    #[test]
    fn test_sma_basic() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&data, 3);

        assert_eq!(result.len(), 5);
        assert!(result[0].is_none() && result[1].is_none());
        assert!((result[2].unwrap() - 2.0).abs() < 0.001); // (1+2+3)/3 = 2
        assert!((result[3].unwrap() - 3.0).abs() < 0.001); // (2+3+4)/3 = 3
        assert!((result[4].unwrap() - 4.0).abs() < 0.001); // (3+4+5)/3 = 4
    }

    #[test]
    fn test_sma_insufficient_data() {
        let data = vec![1.0, 2.0];
        let result = sma(&data, 5);

        assert_eq!(result, vec![None, None]);
    }

    #[test]
    fn test_sma_real_prices() {
        let prices = sample_prices();
        let result = sma(&prices, 5);

        let expected_first = (44.34 + 44.09 + 44.15 + 43.61 + 44.33) / 5.0;
        assert!((result[4].unwrap() - expected_first).abs() < 0.01);
    }

    #[test]
    fn test_ema_seeded_from_first_value() {
        let data = vec![22.0, 24.0, 23.0, 25.0, 26.0];
        let result = ema(&data, 3);

        assert_eq!(result.len(), data.len());
        assert!(result[1].is_none());
        // 22 -> 23 -> 23 -> 24 with alpha = 0.5
        assert!((result[2].unwrap() - 23.0).abs() < 1e-9);
        assert!((result[3].unwrap() - 24.0).abs() < 1e-9);
        assert!((result[4].unwrap() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_ema_empty_data() {
        let data: Vec<f64> = vec![];
        let result = ema(&data, 5);

        assert_eq!(result.len(), 0);
    }

    #[test]
    fn test_ema_increases_with_uptrend() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let result = defined(&ema(&data, 3));

        for i in 1..result.len() {
            assert!(result[i] > result[i - 1]);
        }
    }

    #[test]
    fn test_ema_of_skips_leading_gaps() {
        let data = vec![None, None, Some(10.0), Some(10.0), Some(10.0)];
        let result = ema_of(&data, 2);

        assert_eq!(result, vec![None, None, None, Some(10.0), Some(10.0)]);
    }

    #[test]
    fn test_rsi_basic() {
        let prices = sample_prices();
        let result = rsi(&prices, 14);

        assert_eq!(result.len(), prices.len());
        assert!(result[13].is_none());
        let values = defined(&result);
        assert_eq!(values.len(), prices.len() - 14);
        for value in values {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let data = vec![1.0, 2.0, 3.0];
        let result = rsi(&data, 14);

        assert!(defined(&result).is_empty());
    }

    #[test]
    fn test_rsi_overbought_oversold() {
        let uptrend: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let result = rsi(&uptrend, 14);
        assert_eq!(result.last().copied().flatten(), Some(100.0));

        let downtrend: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let result = rsi(&downtrend, 14);
        assert!(result.last().copied().flatten().unwrap() < 30.0);
    }

    #[test]
    fn test_macd_warm_up() {
        let prices: Vec<f64> = (0..60).map(|i| 50.0 + (i as f64 * 0.3).sin() * 5.0).collect();
        let result = macd(&prices, 12, 26, 9);

        assert_eq!(result.macd_line.len(), prices.len());
        assert!(result.macd_line[24].is_none());
        assert!(result.macd_line[25].is_some());
        assert!(result.signal_line[32].is_none());
        assert!(result.signal_line[33].is_some());
    }

    #[test]
    fn test_macd_histogram() {
        let prices: Vec<f64> = (0..60).map(|i| 50.0 + i as f64 * 0.5).collect();
        let result = macd(&prices, 12, 26, 9);

        for i in 0..prices.len() {
            if let (Some(line), Some(signal), Some(hist)) =
                (result.macd_line[i], result.signal_line[i], result.histogram[i])
            {
                assert!((hist - (line - signal)).abs() < 0.001);
            }
        }
        assert!(result.histogram.last().copied().flatten().is_some());
    }

    #[test]
    fn test_bollinger_bands_basic() {
        let prices = sample_prices();
        let result = bollinger_bands(&prices, 20, 2.0);

        assert_eq!(result.upper.len(), prices.len());
        assert_eq!(defined(&result.middle).len(), 1);
    }

    #[test]
    fn test_bollinger_bands_ordering() {
        let prices = sample_prices();
        let result = bollinger_bands(&prices, 10, 2.0);

        for i in 9..prices.len() {
            assert!(result.upper[i].unwrap() > result.middle[i].unwrap());
            assert!(result.middle[i].unwrap() > result.lower[i].unwrap());
        }
    }

    #[test]
    fn test_bollinger_bands_width() {
        let prices = vec![100.0; 20];
        let result = bollinger_bands(&prices, 10, 2.0);

        for i in 9..prices.len() {
            let width = result.upper[i].unwrap() - result.lower[i].unwrap();
            assert!(width.abs() < 1e-9);
        }
    }

    #[test]
    fn test_atr_basic() {
        let bars = sample_bars();
        let result = atr(&bars, 14);

        assert!(result[13].is_none());
        let values = defined(&result);
        assert_eq!(values.len(), 1);
        for value in values {
            assert!(value > 0.0);
        }
    }

    #[test]
    fn test_atr_insufficient_data() {
        let bars = sample_bars()[..5].to_vec();
        let result = atr(&bars, 14);

        assert!(defined(&result).is_empty());
    }

    #[test]
    fn test_atr_increases_with_volatility() {
        let bars = sample_bars();
        let normal_atr = atr(&bars, 5);

        let mut volatile_bars = sample_bars();
        for bar in &mut volatile_bars {
            bar.high += 10.0;
            bar.low -= 10.0;
        }
        let volatile_atr = atr(&volatile_bars, 5);

        assert!(volatile_atr[5].unwrap() > normal_atr[5].unwrap());
    }

    #[test]
    fn test_obv_basic() {
        let bars = sample_bars();
        let result = obv(&bars);

        assert_eq!(result.len(), bars.len());
    }

    #[test]
    fn test_obv_increases_on_up_days() {
        let bars = sample_bars();
        let result = obv(&bars);

        for i in 1..result.len() {
            assert!(result[i] > result[i - 1]);
        }
    }

    #[test]
    fn test_obv_decreases_on_down_days() {
        let mut bars = sample_bars();
        bars.reverse();
        let result = obv(&bars);

        for i in 1..result.len() {
            assert!(result[i] < result[i - 1]);
        }
    }

    #[test]
    fn test_stochastic_basic() {
        let bars = sample_bars();
        let result = stochastic(&bars, 14, 3);

        let k = defined(&result.k);
        assert_eq!(k.len(), 2);
        for value in k {
            assert!((0.0..=100.0).contains(&value));
        }
        // %D needs three %K values
        assert!(defined(&result.d).is_empty());
    }

    #[test]
    fn test_stochastic_insufficient_data() {
        let bars = sample_bars()[..5].to_vec();
        let result = stochastic(&bars, 14, 3);

        assert!(defined(&result.k).is_empty());
    }

    #[test]
    fn test_williams_r_bounds() {
        let bars = sample_bars();
        let result = williams_r(&bars, 5);

        for value in defined(&result) {
            assert!((-100.0..=0.0).contains(&value));
        }
        // steady uptrend closes near the top of the range
        assert!(result.last().copied().flatten().unwrap() > -20.0);
    }

    #[test]
    fn test_cci_flat_is_zero() {
        let mut bars = sample_bars();
        for bar in &mut bars {
            bar.high = 10.0;
            bar.low = 10.0;
            bar.close = 10.0;
        }
        let result = cci(&bars, 5, 0.015);

        assert_eq!(result[4], Some(0.0));
    }

    #[test]
    fn test_adx_alignment() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars: Vec<Bar> = (0..40)
            .map(|i| {
                let close = 100.0 + i as f64 * 2.0;
                Bar {
                    date: start + Duration::days(i),
                    open: close - 1.0,
                    high: close + 1.0,
                    low: close - 1.5,
                    close,
                    volume: 1000.0,
                }
            })
            .collect();
        let result = adx(&bars, 14);

        assert_eq!(result.adx.len(), bars.len());
        assert!(result.adx[27].is_none());
        assert!(result.adx[28].is_some());
        // strong one-sided trend
        assert!(result.adx[39].unwrap() > 50.0);
        assert!(result.plus_di[39].unwrap() > result.minus_di[39].unwrap());
    }
}
