pub mod daily_quotes;
