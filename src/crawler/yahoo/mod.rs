//! # Yahoo 財經採集模組
//!
//! 從 Yahoo 財經的公開 JSON API 抓取美股與指數資料。
//!
//! ## 支援的功能
//!
//! - **日 K 歷史 (`history`)**:v8 chart API,抓取指定範圍的開高低收量。
//! - **市盈率快照 (`info`)**:v7 quote API,抓取目前的滾動市盈率。

use anyhow::Result;
use async_trait::async_trait;

use crate::{
    crawler::QuoteProvider,
    declare::{FetchRange, Ohlcv},
};

/// 日 K 歷史採集子模組
pub mod history;
/// 市盈率快照採集子模組
pub mod info;

/// Yahoo 財經 API 的主機域名
const HOST: &str = "query1.finance.yahoo.com";

/// Yahoo 財經採集器,作為 `QuoteProvider` Trait 的實作載體
pub struct Yahoo {}

#[async_trait]
impl QuoteProvider for Yahoo {
    async fn ohlcv_history(&self, symbol: &str, range: &FetchRange) -> Result<Vec<Ohlcv>> {
        history::visit(symbol, range).await
    }

    async fn pe_snapshot(&self, symbol: &str) -> Result<Option<f64>> {
        info::visit(symbol).await
    }
}
