use futures::{stream, StreamExt};
use sqlx::SqlitePool;
use tokio_retry::{
    strategy::{jitter, ExponentialBackoff},
    Retry,
};

use crate::{
    calculation,
    crawler::QuoteProvider,
    database::{table::daily_quote::DailyQuote, StoreError},
    declare::FetchRange,
    logging,
};

/// 同時採集的股票數上限
const CONCURRENT_FETCH_LIMIT: usize = 4;

/// 單檔抓取失敗時的重試次數
const FETCH_RETRY_LIMIT: usize = 3;

/// 單一股票在一次採集中的結果
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolOutcome {
    /// 成功寫入 n 筆
    Collected(usize),
    /// 資料來源回傳空序列,無事可做,不是錯誤
    Empty,
    /// 資料來源失敗,該股票已略過
    ProviderFailed,
}

/// 一次採集批次的逐檔結果
#[derive(Debug, Default)]
pub struct CollectionSummary {
    pub outcomes: Vec<(String, SymbolOutcome)>,
}

impl CollectionSummary {
    pub fn collected(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, SymbolOutcome::Collected(_)))
            .count()
    }

    pub fn empty(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == SymbolOutcome::Empty)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == SymbolOutcome::ProviderFailed)
            .count()
    }
}

/// 單檔採集的失敗分類,儲存層的問題要讓整個批次停下來,
/// 資料來源的問題只影響該檔
enum CollectFailure {
    Provider(anyhow::Error),
    Store(StoreError),
}

/// 逐檔採集行情、計算衍生指標並寫入資料庫。
///
/// 每一檔股票獨立處理:抓取失敗只記 log 並略過該檔,不中斷其餘的股票;
/// 同一檔的資料列在一筆交易內寫入,重跑同樣的範圍會得到同樣的結果。
pub async fn execute(
    provider: &impl QuoteProvider,
    pool: &SqlitePool,
    symbols: &[String],
    range: FetchRange,
) -> Result<CollectionSummary, StoreError> {
    let results = stream::iter(symbols)
        .map(|symbol| async move { (symbol.clone(), collect_one(provider, pool, symbol, &range).await) })
        .buffered(CONCURRENT_FETCH_LIMIT)
        .collect::<Vec<_>>()
        .await;

    let mut summary = CollectionSummary::default();

    for (symbol, result) in results {
        match result {
            Ok(outcome) => summary.outcomes.push((symbol, outcome)),
            Err(CollectFailure::Provider(why)) => {
                logging::error_file_async(format!(
                    "Failed to collect {} because {:?}",
                    symbol, why
                ));
                summary.outcomes.push((symbol, SymbolOutcome::ProviderFailed));
            }
            Err(CollectFailure::Store(why)) => return Err(why),
        }
    }

    Ok(summary)
}

async fn collect_one(
    provider: &impl QuoteProvider,
    pool: &SqlitePool,
    symbol: &str,
    range: &FetchRange,
) -> Result<SymbolOutcome, CollectFailure> {
    logging::info_file_async(format!("正在採集: {}...", symbol));

    let strategy = ExponentialBackoff::from_millis(100)
        .map(jitter)
        .take(FETCH_RETRY_LIMIT);
    let series = Retry::spawn(strategy, || provider.ohlcv_history(symbol, range))
        .await
        .map_err(CollectFailure::Provider)?;

    if series.is_empty() {
        return Ok(SymbolOutcome::Empty);
    }

    // 市盈率只是參考性的快照,拿不到就以 NULL 入庫,不值得讓整檔失敗
    let pe_ratio = match provider.pe_snapshot(symbol).await {
        Ok(pe) => pe,
        Err(why) => {
            logging::warn_file_async(format!(
                "Failed to fetch trailing PE for {} because {:?}",
                symbol, why
            ));
            None
        }
    };

    let mut quotes = calculation::daily_quotes::derive(symbol, &series, pe_ratio);
    quotes.retain(|quote| {
        if quote.is_well_formed() {
            return true;
        }
        logging::warn_file_async(format!(
            "malformed row dropped: {} {}",
            quote.symbol, quote.date
        ));
        false
    });

    if quotes.is_empty() {
        return Ok(SymbolOutcome::Empty);
    }

    let written = DailyQuote::upsert_batch(pool, &quotes)
        .await
        .map_err(CollectFailure::Store)?;

    Ok(SymbolOutcome::Collected(written as usize))
}
