use sqlx::SqlitePool;

use crate::{
    config,
    database::{
        table::daily_quote::{self, DailyQuote},
        StoreError,
    },
};

/// 儀表板唯一的讀取入口。
///
/// 回傳 `Ok` 的空集合代表「還沒有採集到資料」,`Err` 才是儲存層本身的
/// 問題,呈現端必須把兩種情況分開顯示,不能都畫成空畫面。
pub async fn history(
    pool: &SqlitePool,
    symbols: &[String],
    window_days: u32,
) -> Result<Vec<DailyQuote>, StoreError> {
    DailyQuote::fetch_window(pool, symbols, window_days).await
}

/// 代碼對應的顯示名稱,查不到時原樣回傳代碼。
pub fn display_name(symbol: &str) -> String {
    config::SETTINGS.monitor.display_name(symbol)
}

/// 儀表板的成交額欄位用這個格式化
pub use crate::util::text::format_cn_units;

#[cfg(test)]
mod tests {
    use chrono::{Days, Local};

    use super::*;
    use crate::database;

    fn sample(symbol: &str, days_ago: u64) -> DailyQuote {
        DailyQuote {
            symbol: symbol.to_string(),
            date: Local::now()
                .date_naive()
                .checked_sub_days(Days::new(days_ago))
                .unwrap(),
            close: 100.0,
            pct_change: 0.5,
            volume: 1_000.0,
            amount: 100_000.0,
            turnover: None,
            amplitude: 1.2,
            vol_ratio: None,
            pe_ratio: None,
        }
    }

    #[tokio::test]
    async fn test_history_empty_store_is_ok() {
        let pool = database::memory_pool().await;
        daily_quote::ensure_schema(&pool).await.unwrap();

        let rows = history(&pool, &["AAPL".to_string()], 7).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_history_window() {
        let pool = database::memory_pool().await;
        daily_quote::ensure_schema(&pool).await.unwrap();

        DailyQuote::upsert_batch(&pool, &[sample("AAPL", 20), sample("AAPL", 2)])
            .await
            .unwrap();

        let rows = history(&pool, &["AAPL".to_string()], 7).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, sample("AAPL", 2).date);
    }

    #[tokio::test]
    async fn test_history_store_unavailable_is_an_error() {
        let pool = database::memory_pool().await;
        daily_quote::ensure_schema(&pool).await.unwrap();
        pool.close().await;

        // 空集合與儲存層錯誤必須能被呼叫端分辨
        let result = history(&pool, &["AAPL".to_string()], 7).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
