pub mod dispatch;
pub mod error;
pub mod fundamental;
pub mod market;
pub mod params;
pub mod response;
pub mod technical;

pub mod test_support;

pub use dispatch::{Dispatcher, ToolHandler};
pub use error::HandlerError;
pub use fundamental::{FundamentalFunction, FundamentalHandler};
pub use market::{MarketFunction, MarketHandler};
pub use response::build_response;
pub use technical::{technical_indicators, TechnicalFunction, TechnicalHandler};
