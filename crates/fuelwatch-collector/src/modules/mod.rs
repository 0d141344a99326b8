//! 수집/감지 실행 모듈.

pub mod detect_run;
pub mod exchange_fetch;
pub mod fuel_fetch;
pub mod news_fetch;

pub use detect_run::detect_changes;
pub use exchange_fetch::fetch_exchange_rate;
pub use fuel_fetch::fetch_fuel_price;
pub use news_fetch::{build_analyzer, fetch_news};
