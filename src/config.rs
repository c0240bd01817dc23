use std::{collections::HashMap, env, path::PathBuf};

use anyhow::Result;
use config::{Config as config_config, File as config_file};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

const CONFIG_PATH: &str = "app.json";

const DATABASE_PATH: &str = "DATABASE_PATH";

/// 預設監控的指數與顯示名稱
const DEFAULT_INDICES: [(&str, &str); 3] = [
    ("^GSPC", "標普500指數"),
    ("^IXIC", "納斯達克指數"),
    ("^RUT", "羅素2000指數"),
];

/// 預設監控的個股與 ETF,可在 app.json 自行增減
const DEFAULT_WATCH_LIST: [&str; 22] = [
    "QQQ", "VOO", "AAPL", "TSLA", "NVDA", "QCOM", "SMCI", "AMD", "CRWV", "TSM", "UNH", "NFLX",
    "GTLB", "MP", "SOFI", "BMR", "AI", "AMBQ", "META", "HIMS", "RKLB", "SNDK",
];

/// 代碼對應的顯示名稱,儀表板用,沒列到的代碼直接顯示原代碼
const DEFAULT_STOCK_NAMES: [(&str, &str); 9] = [
    ("AAPL", "蘋果"),
    ("NVDA", "輝達"),
    ("TSLA", "特斯拉"),
    ("GOOGL", "谷歌"),
    ("MSFT", "微軟"),
    ("AMZN", "亞馬遜"),
    ("META", "Meta"),
    ("QQQ", "納指100ETF"),
    ("SPY", "標普500ETF"),
];

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct App {
    #[serde(default)]
    pub database: Database,
    #[serde(default)]
    pub monitor: Monitor,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Database {
    /// SQLite 檔案路徑
    #[serde(default = "default_database_path")]
    pub path: String,
}

fn default_database_path() -> String {
    "stocks.db".to_string()
}

impl Default for Database {
    fn default() -> Self {
        Database {
            path: default_database_path(),
        }
    }
}

/// 監控名單設定。
///
/// 原本的名單是寫死在程式裡的常數,改成設定值後測試可以換成自己的代碼。
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Monitor {
    /// 監控的個股與 ETF
    #[serde(default)]
    pub watch_list: Vec<String>,
    /// 監控的指數代碼與顯示名稱
    #[serde(default)]
    pub indices: HashMap<String, String>,
    /// 個股代碼與顯示名稱
    #[serde(default)]
    pub stock_names: HashMap<String, String>,
}

impl Default for Monitor {
    fn default() -> Self {
        Monitor {
            watch_list: DEFAULT_WATCH_LIST.iter().map(|s| s.to_string()).collect(),
            indices: DEFAULT_INDICES
                .iter()
                .map(|(symbol, name)| (symbol.to_string(), name.to_string()))
                .collect(),
            stock_names: DEFAULT_STOCK_NAMES
                .iter()
                .map(|(symbol, name)| (symbol.to_string(), name.to_string()))
                .collect(),
        }
    }
}

impl Monitor {
    /// 預設採集名單:指數在前,個股在後
    pub fn all_symbols(&self) -> Vec<String> {
        let mut indices: Vec<String> = self.indices.keys().cloned().collect();
        indices.sort();
        indices.extend(self.watch_list.iter().cloned());
        indices
    }

    /// 代碼對應的顯示名稱,查不到時原樣回傳代碼
    pub fn display_name(&self, symbol: &str) -> String {
        if let Some(name) = self.stock_names.get(symbol) {
            return name.to_string();
        }

        self.indices
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| symbol.to_string())
    }
}

pub static SETTINGS: Lazy<App> = Lazy::new(|| App::get().expect("Config error"));

impl App {
    fn get() -> Result<Self> {
        let config_path = config_path();
        if config_path.exists() {
            let config: App = config_config::builder()
                .add_source(config_file::from(config_path))
                .build()?
                .try_deserialize()?;
            return Ok(config.override_with_env());
        }

        Ok(App::default().override_with_env())
    }

    /// 將來至於 env 的設定值覆蓋掉 json 上的設定值
    fn override_with_env(mut self) -> Self {
        if let Ok(path) = env::var(DATABASE_PATH) {
            self.database.path = path;
        }

        self
    }
}

/// 回傳設定檔的路徑
fn config_path() -> PathBuf {
    PathBuf::from(CONFIG_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_monitor() {
        let monitor = Monitor::default();
        assert!(!monitor.watch_list.is_empty());
        assert_eq!(monitor.indices.len(), 3);

        let symbols = monitor.all_symbols();
        // 指數排在名單前面
        assert_eq!(symbols[0], "^GSPC");
        assert!(symbols.contains(&"AAPL".to_string()));
        assert_eq!(
            symbols.len(),
            monitor.indices.len() + monitor.watch_list.len()
        );
    }

    #[test]
    fn test_display_name() {
        let monitor = Monitor::default();
        assert_eq!(monitor.display_name("AAPL"), "蘋果");
        assert_eq!(monitor.display_name("^GSPC"), "標普500指數");
        // 沒建檔的代碼直接回傳原代碼
        assert_eq!(monitor.display_name("XYZ"), "XYZ");
    }

    #[test]
    fn test_override_with_env() {
        env::set_var(DATABASE_PATH, "env_stocks.db");
        let app = App::default().override_with_env();
        assert_eq!(app.database.path, "env_stocks.db");
        env::remove_var(DATABASE_PATH);
    }
}
