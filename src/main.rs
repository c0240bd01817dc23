use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;

use stock_monitor::{
    collector::{self, SymbolOutcome},
    config,
    crawler::yahoo::Yahoo,
    database,
    declare::FetchRange,
    logging,
};

/// 美股日線行情採集批次:抓取名單內的行情、計算衍生指標並寫入 SQLite
#[derive(Parser, Debug)]
#[command(name = "stock_monitor")]
struct Args {
    /// 要採集的代碼,省略時使用設定檔的指數與監控名單
    symbols: Vec<String>,

    /// 往回採集的天數,與 --start/--end 擇一
    #[arg(long, default_value_t = 30, conflicts_with_all = ["start", "end"])]
    days: u32,

    /// 起日 (YYYY-MM-DD)
    #[arg(long, requires = "end")]
    start: Option<NaiveDate>,

    /// 迄日 (YYYY-MM-DD)
    #[arg(long, requires = "start")]
    end: Option<NaiveDate>,
}

impl Args {
    fn range(&self) -> FetchRange {
        match (self.start, self.end) {
            (Some(start), Some(end)) => FetchRange::Between { start, end },
            _ => FetchRange::Days(self.days),
        }
    }

    fn symbols(&self) -> Vec<String> {
        if self.symbols.is_empty() {
            return config::SETTINGS.monitor.all_symbols();
        }

        self.symbols.clone()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();
    let pool = database::get_connection();

    database::table::daily_quote::ensure_schema(pool).await?;

    let symbols = args.symbols();
    let range = args.range();
    logging::info_file_async(format!("開始採集 {} 檔,範圍 {:?}", symbols.len(), range));

    let summary = collector::execute(&Yahoo {}, pool, &symbols, range).await?;

    for (symbol, outcome) in &summary.outcomes {
        match outcome {
            SymbolOutcome::Collected(count) => {
                logging::info_file_async(format!("{}: 寫入 {} 筆", symbol, count));
            }
            SymbolOutcome::Empty => {
                logging::info_file_async(format!("{}: 無資料", symbol));
            }
            SymbolOutcome::ProviderFailed => {
                logging::warn_file_async(format!("{}: 採集失敗,已略過", symbol));
            }
        }
    }

    let result = format!(
        "採集結束: 成功 {} 檔 / 無資料 {} 檔 / 失敗 {} 檔",
        summary.collected(),
        summary.empty(),
        summary.failed()
    );
    logging::info_file_async(result.clone());
    logging::info_console(result);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_range() {
        let args = Args::parse_from(["stock_monitor"]);
        assert_eq!(args.range(), FetchRange::Days(30));
        // 沒帶代碼時會落回設定檔名單
        assert!(!args.symbols().is_empty());
    }

    #[test]
    fn test_args_explicit_range() {
        let args = Args::parse_from([
            "stock_monitor",
            "AAPL",
            "NVDA",
            "--start",
            "2025-01-01",
            "--end",
            "2025-03-31",
        ]);

        assert_eq!(args.symbols(), vec!["AAPL".to_string(), "NVDA".to_string()]);
        assert_eq!(
            args.range(),
            FetchRange::Between {
                start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            }
        );
    }

    #[test]
    fn test_args_range_flags_are_exclusive() {
        assert!(Args::try_parse_from(["stock_monitor", "--start", "2025-01-01"]).is_err());
        assert!(Args::try_parse_from([
            "stock_monitor",
            "--days",
            "7",
            "--start",
            "2025-01-01",
            "--end",
            "2025-01-31",
        ])
        .is_err());
    }
}
