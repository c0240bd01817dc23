use anyhow::{anyhow, Result};
use chrono::DateTime;
use serde::Deserialize;

use crate::{
    crawler::yahoo::HOST,
    declare::{FetchRange, Ohlcv},
    util,
};

#[derive(Deserialize, Debug)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Deserialize, Debug)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize, Debug)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<QuoteColumns>,
}

/// chart API 以欄為單位回傳,休市日的值是 null
#[derive(Deserialize, Debug)]
struct QuoteColumns {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

/// 抓取指定股票在範圍內的日 K 歷史。
///
/// 無效或已下市的代碼回傳空序列,不是錯誤。
pub async fn visit(symbol: &str, range: &FetchRange) -> Result<Vec<Ohlcv>> {
    let (period1, period2) = range.to_timestamps();
    let url = format!(
        "https://{host}/v8/finance/chart/{symbol}?period1={period1}&period2={period2}&interval=1d",
        host = HOST,
        symbol = urlencoding::encode(symbol),
        period1 = period1,
        period2 = period2
    );

    let response = util::http::get_json_allow_not_found::<ChartResponse>(&url).await?;

    to_series(symbol, response)
}

fn to_series(symbol: &str, response: ChartResponse) -> Result<Vec<Ohlcv>> {
    let result = match response.chart.result {
        Some(result) => result,
        None => {
            return match response.chart.error {
                // 查無代碼
                Some(error) if error.code == "Not Found" => Ok(Vec::new()),
                Some(error) => Err(anyhow!(
                    "chart api error for {}: {} {}",
                    symbol,
                    error.code,
                    error.description
                )),
                None => Ok(Vec::new()),
            };
        }
    };

    let Some(chart) = result.into_iter().next() else {
        return Ok(Vec::new());
    };

    let timestamps = chart.timestamp.unwrap_or_default();

    let Some(quote) = chart.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };

    let mut series = Vec::with_capacity(timestamps.len());

    for (i, ts) in timestamps.iter().enumerate() {
        let date = match DateTime::from_timestamp(*ts, 0) {
            Some(datetime) => datetime.date_naive(),
            None => continue,
        };

        // 休市日整列是 null,跳過
        let (Some(open), Some(high), Some(low), Some(close)) = (
            column(&quote.open, i),
            column(&quote.high, i),
            column(&quote.low, i),
            column(&quote.close, i),
        ) else {
            continue;
        };

        let volume = quote.volume.get(i).copied().flatten().unwrap_or(0);

        series.push(Ohlcv {
            date,
            open,
            high,
            low,
            close,
            volume: volume as f64,
        });
    }

    Ok(series)
}

fn column(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}
