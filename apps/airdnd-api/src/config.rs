use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use database::mongodb::MongoConfig;
use email::{EmailProviderKind, SmtpConfig};

pub use core_config::Environment;

/// Everything the service reads from the environment, loaded once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub email: EmailConfig,
}

/// Outbound mail settings. SMTP credentials are only read when SMTP is the
/// selected provider.
#[derive(Clone, Debug)]
pub enum EmailConfig {
    Smtp(SmtpConfig),
    Mock,
}

impl EmailConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(match EmailProviderKind::from_env()? {
            EmailProviderKind::Smtp => Self::Smtp(SmtpConfig::from_env()?),
            EmailProviderKind::Mock => Self::Mock,
        })
    }
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;
        let email = EmailConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            environment,
            email,
        })
    }
}
