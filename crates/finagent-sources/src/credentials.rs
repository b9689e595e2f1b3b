use finagent_models::config::FinagentConfig;
use secrecy::SecretString;

/// API keys for the external sources, resolved once at process start.
///
/// A key that is unset or empty is `None`; the source owning it then reports
/// a configuration error instead of calling out.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub financial_datasets: Option<SecretString>,
    pub news: Option<SecretString>,
}

impl Credentials {
    /// Read the variables named in `config` from the process environment.
    pub fn from_env(config: &FinagentConfig) -> Self {
        Self::from_lookup(config, |name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(config: &FinagentConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .map(SecretString::from)
        };

        Self {
            financial_datasets: read(&config.financial_datasets.api_key_env),
            news: read(&config.news.api_key_env),
        }
    }
}
