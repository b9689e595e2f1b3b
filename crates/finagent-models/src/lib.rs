pub mod config;
pub mod indicator;
pub mod invocation;
pub mod price;

pub use config::{FinagentConfig, FinancialDatasetsConfig, HandlersConfig, NewsConfig};
pub use indicator::{
    IndicatorKind, IndicatorPoint, IndicatorRequest, IndicatorSeries, InvalidRequest,
    DEFAULT_PERIOD,
};
pub use invocation::{
    ActionResponse, BodyStyle, FunctionResponse, InvocationEnvelope, Parameter, ResponseBody,
    ResponseEnvelope, TextBody,
};
pub use price::{PriceBar, PriceSeries};
