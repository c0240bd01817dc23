use anyhow::Result;
use async_trait::async_trait;

use crate::declare::{FetchRange, Ohlcv};

/// 雅虎財經
pub mod yahoo;

/// 行情資料來源的最小介面。
///
/// 只開放兩個能力:抓一段按時間排序的日 K 歷史、要一個市盈率即時快照,
/// 測試可以用假的實作替換,不需要連真正的網路。
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// 取得指定範圍內按時間排序的日 OHLCV 序列。
    ///
    /// 下市或無效的代碼回傳空序列,不視為錯誤。
    async fn ohlcv_history(&self, symbol: &str, range: &FetchRange) -> Result<Vec<Ohlcv>>;

    /// 取得該股票目前的滾動市盈率,資料來源沒有提供時回傳 None。
    async fn pe_snapshot(&self, symbol: &str) -> Result<Option<f64>>;
}
