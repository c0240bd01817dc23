use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// 一個交易日的原始行情
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ohlcv {
    pub date: NaiveDate,
    /// 開盤價
    pub open: f64,
    /// 最高價
    pub high: f64,
    /// 最低價
    pub low: f64,
    /// 收盤價
    pub close: f64,
    /// 成交量(股)
    pub volume: f64,
}

/// 採集的日期範圍
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FetchRange {
    /// 往回推 N 天(含今日)
    Days(u32),
    /// 指定起迄日(含迄日)
    Between { start: NaiveDate, end: NaiveDate },
}

impl FetchRange {
    /// 轉成資料來源 API 用的起迄 Unix 秒數
    pub fn to_timestamps(&self) -> (i64, i64) {
        match self {
            FetchRange::Days(days) => {
                let now = Local::now();
                let start = now
                    .date_naive()
                    .checked_sub_days(Days::new(u64::from(*days)))
                    .unwrap_or(NaiveDate::MIN);
                (day_start(start), now.timestamp())
            }
            FetchRange::Between { start, end } => (day_start(*start), day_end(*end)),
        }
    }
}

fn day_start(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|t| t.and_utc().timestamp())
        .unwrap_or_default()
}

fn day_end(date: NaiveDate) -> i64 {
    date.and_hms_opt(23, 59, 59)
        .map(|t| t.and_utc().timestamp())
        .unwrap_or_default()
}
