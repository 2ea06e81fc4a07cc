//! カード画像解決
//!
//! 図鑑番号ごとにカード検索APIから候補を取得し、レアリティラダーで最良の1枚を選び、
//! 結果を data/cards.json に再開可能な形で蓄積する。

pub mod driver;
pub mod resolver;
pub mod source;
pub mod store;

pub use driver::{run_cards, CardRunSummary, CheckpointPolicy, DriverOptions};
pub use resolver::{attempt, CardResolver, RetryPolicy};
pub use source::{CardQuery, CardSource, TcgApiClient};
pub use store::ProgressStore;
