pub mod credentials;
pub mod error;
pub mod financial_datasets;
pub mod news;
pub mod transport;

pub mod test_support;

pub use credentials::Credentials;
pub use error::{FetchContext, SourceError};
pub use financial_datasets::{
    FinancialDatasetsClient, OptionsChainQuery, PriceSeriesSource, StatementKind,
};
pub use news::NewsClient;
pub use transport::{
    ApiKeyHeader, HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport,
    TransportError,
};
