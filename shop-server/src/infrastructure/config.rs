use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    pub mail: MailConfig,
}

/// SMTP settings. The mailer is disabled entirely when either credential is
/// missing, matching the optional EMAIL_* variables.
#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: String,
}

impl MailConfig {
    pub fn credentials(&self) -> Option<(String, String)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.clone(), pass.clone())),
            _ => None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "5500".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost:5432/ecommerce".into());
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let mail_user = std::env::var("EMAIL_USER").ok();
        let mail = MailConfig {
            host: std::env::var("EMAIL_HOST").unwrap_or_else(|_| "sandbox.smtp.mailtrap.io".into()),
            port: std::env::var("EMAIL_PORT")
                .unwrap_or_else(|_| "2525".into())
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid EMAIL_PORT: {}", e))?,
            from_address: std::env::var("EMAIL_FROM")
                .ok()
                .or_else(|| mail_user.clone())
                .unwrap_or_else(|| "noreply@ecommerce.com".into()),
            username: mail_user,
            password: std::env::var("EMAIL_PASS").ok(),
        };

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            cors_origins,
            mail,
        })
    }
}
