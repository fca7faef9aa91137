use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const TOKEN_ENV_VARIABLE: &str = "TELEGRAM_BOT_TOKEN";

#[derive(Deserialize, Debug)]
pub struct TelegramSettings {
    pub token: String,
}

#[derive(Deserialize, Debug)]
pub struct AppSettings {
    pub telegram: TelegramSettings,
}

impl AppSettings {
    /// Sources in increasing priority: `appsettings`, `appsettings.local`,
    /// `APP_*` environment and finally `TELEGRAM_BOT_TOKEN`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_token(std::env::var(TOKEN_ENV_VARIABLE).ok())
    }

    fn load_with_token(token: Option<String>) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("appsettings").required(false))
            .add_source(File::with_name("appsettings.local").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("telegram.token", token)?
            .build()?;

        settings.try_deserialize()
    }
}
