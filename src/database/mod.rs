use std::{sync::OnceLock, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use thiserror::Error;

use crate::config;

pub mod table;

static SQLITE: OnceLock<Sqlite> = OnceLock::new();

/// 儲存層的錯誤。
///
/// 讀取端必須能區分「還沒有資料」與「儲存層無法使用」,
/// 前者是空集合,後者才是這個型別。
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("quote store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

/// SQLite 連線池封裝。
///
/// 負責建立連線池,供 `database::table::*` 與批次主流程共享使用。
pub struct Sqlite {
    pub pool: SqlitePool,
}

impl Sqlite {
    /// 建立 SQLite 連線池,檔案路徑來自 `config::SETTINGS.database`。
    pub fn new() -> Sqlite {
        let options = SqliteConnectOptions::new()
            .filename(&config::SETTINGS.database.path)
            .create_if_missing(true);

        // 寫入端只有採集批次一個,讀取端可多個
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy_with(options);

        Self { pool }
    }

    /// 取得連線池參考。
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl Default for Sqlite {
    fn default() -> Self {
        Self::new()
    }
}

fn get_sqlite() -> &'static Sqlite {
    SQLITE.get_or_init(Sqlite::new)
}

/// 取得全域 SQLite 連線池。
pub fn get_connection() -> &'static SqlitePool {
    get_sqlite().pool()
}

/// 測試用的記憶體資料庫,單一連線,不落地。
#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        // 連線被回收時記憶體資料庫會消失,測試期間必須保留唯一連線
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory sqlite")
}
