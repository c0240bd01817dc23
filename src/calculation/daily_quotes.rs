use crate::{database::table::daily_quote::DailyQuote, declare::Ohlcv};

/// 量比的統計視窗:近五個交易日,含當日
const VOL_RATIO_WINDOW: usize = 5;

/// 把單一股票按時間排序的原始行情轉成入庫用的衍生指標序列。
///
/// 規則:
/// - 第一筆沒有前收,漲跌幅與振幅無法定義,整列剔除,N 筆輸入產出 N-1 筆。
/// - 量比在累積滿五筆之前沒有值,對齊 pandas `rolling(window=5)` 預設的
///   min_periods 行為,入庫時以 NULL 表示。
/// - 五日平均量為零時量比同樣無值,不讓除以零的結果落地。
/// - `pe_ratio` 是採集當下的即時快照,整批每一列掛同一個值。
pub fn derive(symbol: &str, series: &[Ohlcv], pe_ratio: Option<f64>) -> Vec<DailyQuote> {
    if series.len() < 2 {
        return Vec::new();
    }

    let mut quotes = Vec::with_capacity(series.len() - 1);

    for i in 1..series.len() {
        let prior_close = series[i - 1].close;
        let bar = &series[i];

        quotes.push(DailyQuote {
            symbol: symbol.to_string(),
            date: bar.date,
            close: bar.close,
            pct_change: (bar.close - prior_close) / prior_close * 100.0,
            volume: bar.volume,
            amount: bar.close * bar.volume,
            turnover: None,
            amplitude: (bar.high - bar.low) / prior_close * 100.0,
            vol_ratio: rolling_volume_ratio(series, i),
            pe_ratio,
        });
    }

    quotes
}

/// 當日成交量相對近五日(含當日)平均量的倍數
fn rolling_volume_ratio(series: &[Ohlcv], i: usize) -> Option<f64> {
    if i + 1 < VOL_RATIO_WINDOW {
        return None;
    }

    let window = &series[i + 1 - VOL_RATIO_WINDOW..=i];
    let mean = window.iter().map(|bar| bar.volume).sum::<f64>() / VOL_RATIO_WINDOW as f64;

    if mean == 0.0 {
        return None;
    }

    Some(series[i].volume / mean)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn bar(day: u32, close: f64, volume: f64) -> Ohlcv {
        Ohlcv {
            date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            open: close,
            high: close * 1.02,
            low: close * 0.98,
            close,
            volume,
        }
    }

    #[test]
    fn test_derive_drops_first_observation() {
        // 規格書的例子:100 -> 110 -> 99
        let series = vec![
            bar(2, 100.0, 1_000.0),
            bar(3, 110.0, 1_200.0),
            bar(4, 99.0, 800.0),
        ];
        let quotes = derive("AAPL", &series, Some(28.0));

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].date, NaiveDate::from_ymd_opt(2025, 6, 3).unwrap());
        assert!((quotes[0].pct_change - 10.0).abs() < 1e-9);
        assert!((quotes[1].pct_change - (-10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_derive_row_count_and_pct_change_round_trip() {
        let closes = [100.0, 102.5, 101.0, 103.75, 99.5, 104.0, 108.25];
        let series: Vec<Ohlcv> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| bar(1 + i as u32, close, 1_000.0 + i as f64 * 50.0))
            .collect();

        let quotes = derive("NVDA", &series, None);
        assert_eq!(quotes.len(), series.len() - 1);

        // 從入庫值反推的漲跌幅要跟存的一致
        for (i, quote) in quotes.iter().enumerate() {
            let recomputed = (closes[i + 1] - closes[i]) / closes[i] * 100.0;
            assert!((quote.pct_change - recomputed).abs() < 1e-9);
        }
    }

    #[test]
    fn test_derive_amount_and_amplitude() {
        let series = vec![bar(2, 100.0, 1_000.0), bar(3, 110.0, 1_200.0)];
        let quotes = derive("AAPL", &series, None);

        assert!((quotes[0].amount - 110.0 * 1_200.0).abs() < 1e-9);
        // (high - low) / 前收 * 100 = (112.2 - 107.8) / 100 * 100
        assert!((quotes[0].amplitude - 4.4).abs() < 1e-9);
    }

    #[test]
    fn test_vol_ratio_undefined_until_five_sessions() {
        let volumes = [1_000.0, 1_200.0, 800.0, 900.0, 1_100.0, 2_000.0];
        let series: Vec<Ohlcv> = volumes
            .iter()
            .enumerate()
            .map(|(i, &volume)| bar(1 + i as u32, 100.0 + i as f64, volume))
            .collect();

        let quotes = derive("TSLA", &series, None);
        assert_eq!(quotes.len(), 5);

        // 第五個交易日(輸出的第四列)才開始有量比
        assert_eq!(quotes[0].vol_ratio, None);
        assert_eq!(quotes[1].vol_ratio, None);
        assert_eq!(quotes[2].vol_ratio, None);

        let mean_first_five = (1_000.0 + 1_200.0 + 800.0 + 900.0 + 1_100.0) / 5.0;
        assert!((quotes[3].vol_ratio.unwrap() - 1_100.0 / mean_first_five).abs() < 1e-9);

        let mean_last_five = (1_200.0 + 800.0 + 900.0 + 1_100.0 + 2_000.0) / 5.0;
        assert!((quotes[4].vol_ratio.unwrap() - 2_000.0 / mean_last_five).abs() < 1e-9);
    }

    #[test]
    fn test_vol_ratio_zero_volume_is_undefined() {
        let series: Vec<Ohlcv> = (1..=6).map(|day| bar(day, 100.0, 0.0)).collect();
        let quotes = derive("HALT", &series, None);

        assert_eq!(quotes.len(), 5);
        for quote in &quotes {
            assert_eq!(quote.vol_ratio, None);
            assert!(quote.is_well_formed());
        }
    }

    #[test]
    fn test_derive_attaches_single_pe_snapshot() {
        let series: Vec<Ohlcv> = (1..=4).map(|day| bar(day, 100.0 + day as f64, 1_000.0)).collect();
        let quotes = derive("MSFT", &series, Some(35.5));

        for quote in &quotes {
            assert_eq!(quote.pe_ratio, Some(35.5));
        }
    }

    #[test]
    fn test_derive_short_series_is_empty() {
        assert!(derive("AAPL", &[], None).is_empty());
        assert!(derive("AAPL", &[bar(2, 100.0, 1_000.0)], None).is_empty());
    }

    #[test]
    fn test_derive_zero_prior_close_is_malformed() {
        let series = vec![bar(2, 0.0, 1_000.0), bar(3, 10.0, 1_000.0)];
        let quotes = derive("ZERO", &series, None);

        // 除以零產生的非有限值交給入庫前的檢查剔除
        assert_eq!(quotes.len(), 1);
        assert!(!quotes[0].is_well_formed());
    }
}
