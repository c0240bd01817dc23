use anyhow::Result;
use serde::Deserialize;

use crate::{crawler::yahoo::HOST, util};

#[derive(Deserialize, Debug)]
struct QuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteResult,
}

#[derive(Deserialize, Debug)]
struct QuoteResult {
    result: Option<Vec<QuoteItem>>,
}

#[derive(Deserialize, Debug)]
struct QuoteItem {
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<f64>,
}

/// 取得該股票目前的滾動市盈率快照。
///
/// 這是採集當下的即時值,整批歷史資料會共用同一個快照,並不是當天的
/// 歷史市盈率,沿用原系統的行為。指數或 ETF 沒有這個欄位時回傳 None。
pub async fn visit(symbol: &str) -> Result<Option<f64>> {
    let url = format!(
        "https://{host}/v7/finance/quote?symbols={symbol}&fields=trailingPE",
        host = HOST,
        symbol = urlencoding::encode(symbol)
    );

    let response = util::http::get_json::<QuoteResponse>(&url).await?;

    Ok(response
        .quote_response
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|item| item.trailing_pe))
}
