use std::time::Duration;

use anyhow::{anyhow, Result};
use once_cell::sync::{Lazy, OnceCell};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;

pub mod user_agent;

/// 限制最多 5 個並發請求,避免被資料來源限流
static SEMAPHORE: Lazy<Semaphore> = Lazy::new(|| Semaphore::new(5));

/// A singleton instance of the reqwest client.
static CLIENT: OnceCell<Client> = OnceCell::new();

/// Returns the reqwest client singleton instance or creates one if it doesn't exist.
fn get_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            // ===== 壓縮 =====
            .brotli(true)
            .gzip(true)
            // ===== 超時設置 =====
            .connect_timeout(Duration::from_secs(8))
            .timeout(Duration::from_secs(15))
            // ===== 連接池 =====
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Duration::from_secs(90))
            // ===== Headers =====
            .user_agent(user_agent::gen_random_ua())
            .build()
            .map_err(|e| anyhow!("Failed to create reqwest client: {:?}", e))
    })
}

/// 發送 GET 請求並把 JSON 回應反序列化成指定型別。
///
/// # Errors
/// 連線失敗、HTTP 狀態碼非 2xx 或回應不是合法 JSON 時回傳錯誤。
pub async fn get_json<RES: DeserializeOwned>(url: &str) -> Result<RES> {
    let _permit = SEMAPHORE.acquire().await?;
    let response = get_client()?.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(anyhow!("HTTP {} for {}", status, url));
    }

    response
        .json::<RES>()
        .await
        .map_err(|e| anyhow!("Error parsing response JSON: {:?}", e))
}

/// 同 [`get_json`],但 404 時仍解析回應主體。
///
/// 部分 API 查無代碼時回 404 搭配帶有錯誤描述的 JSON,呼叫端要自行分辨。
pub async fn get_json_allow_not_found<RES: DeserializeOwned>(url: &str) -> Result<RES> {
    let _permit = SEMAPHORE.acquire().await?;
    let response = get_client()?.get(url).send().await?;
    let status = response.status();

    if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
        return Err(anyhow!("HTTP {} for {}", status, url));
    }

    response
        .json::<RES>()
        .await
        .map_err(|e| anyhow!("Error parsing response JSON: {:?}", e))
}
