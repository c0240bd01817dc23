use chrono::{Days, Local, NaiveDate};
use sqlx::SqlitePool;

use crate::database::StoreError;

/// daily_quotes 資料表,每檔股票每個交易日一列,(symbol, date) 為主鍵
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct DailyQuote {
    pub symbol: String,
    pub date: NaiveDate,
    /// 收盤價
    pub close: f64,
    /// 漲跌幅(%),相對前一個交易日的收盤價
    pub pct_change: f64,
    /// 成交量(股)
    pub volume: f64,
    /// 成交額 = 收盤價 * 成交量
    pub amount: f64,
    /// 換手率,保留欄位,目前不計算
    pub turnover: Option<f64>,
    /// 日內振幅(%) = (最高 - 最低) / 前收 * 100
    pub amplitude: f64,
    /// 量比 = 當日成交量 / 近五日平均量,未滿五個交易日時無值
    pub vol_ratio: Option<f64>,
    /// 市盈率,採集當下的即時快照,整批共用同一個值
    pub pe_ratio: Option<f64>,
}

/// 建立 daily_quotes 資料表,已存在時不動作,可在每次啟動時呼叫。
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), StoreError> {
    let sql = r#"
CREATE TABLE IF NOT EXISTS daily_quotes (
    symbol TEXT,
    date TEXT,
    close REAL,
    pct_change REAL,
    volume REAL,
    amount REAL,
    turnover REAL,
    amplitude REAL,
    vol_ratio REAL,
    pe_ratio REAL,
    PRIMARY KEY (symbol, date)
)
"#;
    sqlx::query(sql).execute(pool).await?;

    Ok(())
}

impl DailyQuote {
    /// 入庫前的基本檢查,任何數值欄位出現非有限值就整列丟棄,
    /// 不能讓 NaN 以合法數值的樣子落到資料庫裡
    pub fn is_well_formed(&self) -> bool {
        self.close.is_finite()
            && self.pct_change.is_finite()
            && self.volume.is_finite()
            && self.amount.is_finite()
            && self.amplitude.is_finite()
            && self.vol_ratio.map_or(true, f64::is_finite)
            && self.pe_ratio.map_or(true, f64::is_finite)
    }

    /// 單筆寫入,(symbol, date) 已存在時整列覆蓋。
    pub async fn upsert(&self, pool: &SqlitePool) -> Result<(), StoreError> {
        let mut tx = pool.begin().await?;
        upsert_within(&mut tx, self).await?;
        tx.commit().await?;

        Ok(())
    }

    /// 將同一個批次的資料列用一筆交易寫入,整批成功或整批放棄,
    /// 回傳寫入(含覆蓋)的列數。
    pub async fn upsert_batch(pool: &SqlitePool, quotes: &[DailyQuote]) -> Result<u64, StoreError> {
        let mut tx = pool.begin().await?;
        let mut affected: u64 = 0;

        for quote in quotes {
            affected += upsert_within(&mut tx, quote).await?;
        }

        tx.commit().await?;

        Ok(affected)
    }

    /// 查回名單內、日期在回溯視窗內的資料列,依日期升冪,同日依代碼排序。
    ///
    /// 查無資料回傳空集合,不是錯誤。
    pub async fn fetch_window(
        pool: &SqlitePool,
        symbols: &[String],
        window_days: u32,
    ) -> Result<Vec<DailyQuote>, StoreError> {
        if symbols.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; symbols.len()].join(",");
        let sql = format!(
            r#"
SELECT
    symbol, date, close, pct_change, volume, amount, turnover, amplitude, vol_ratio, pe_ratio
FROM
    daily_quotes
WHERE
    symbol IN ({}) AND date >= ?
ORDER BY
    date ASC, symbol ASC
"#,
            placeholders
        );

        let cutoff = Local::now()
            .date_naive()
            .checked_sub_days(Days::new(u64::from(window_days)))
            .unwrap_or(NaiveDate::MIN);

        let mut query = sqlx::query_as::<_, DailyQuote>(&sql);
        for symbol in symbols {
            query = query.bind(symbol);
        }

        Ok(query.bind(cutoff).fetch_all(pool).await?)
    }
}

async fn upsert_within(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    quote: &DailyQuote,
) -> Result<u64, StoreError> {
    let sql = r#"
INSERT INTO daily_quotes
(
    symbol, date, close, pct_change, volume, amount, amplitude, vol_ratio, pe_ratio
)
VALUES
(
    ?, ?, ?, ?, ?, ?, ?, ?, ?
)
ON CONFLICT
(
    symbol, date
)
DO UPDATE SET
    close = excluded.close,
    pct_change = excluded.pct_change,
    volume = excluded.volume,
    amount = excluded.amount,
    amplitude = excluded.amplitude,
    vol_ratio = excluded.vol_ratio,
    pe_ratio = excluded.pe_ratio;
"#;
    let done = sqlx::query(sql)
        .bind(&quote.symbol)
        .bind(quote.date)
        .bind(quote.close)
        .bind(quote.pct_change)
        .bind(quote.volume)
        .bind(quote.amount)
        .bind(quote.amplitude)
        .bind(quote.vol_ratio)
        .bind(quote.pe_ratio)
        .execute(&mut **tx)
        .await?;

    Ok(done.rows_affected())
}
