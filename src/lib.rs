//! 美股日線行情監控的核心:採集(Collector)、衍生指標計算、SQLite 儲存,
//! 以及給儀表板用的唯一讀取入口(`gateway`)。
//! 儀表板本身是外部程式,只透過 [`gateway`] 讀資料,不直接碰資料表。

pub mod calculation;
pub mod collector;
pub mod config;
pub mod crawler;
pub mod database;
pub mod declare;
pub mod gateway;
pub mod logging;
pub mod util;
