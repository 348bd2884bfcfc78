use config::ConfigError;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub jwt: JwtSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub port: u16,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }

    pub fn connection_string_without_db(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port
        )
    }
}

/// Token-signing settings. Validated once at startup; handlers can assume
/// every field is usable.
#[derive(serde::Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub expire_minutes: i64, // access-token lifetime
}

impl JwtSettings {
    fn validate(&self) -> Result<(), String> {
        if self.secret.len() < 32 {
            return Err("jwt.secret must be at least 32 bytes".to_string());
        }
        if self.issuer.trim().is_empty() {
            return Err("jwt.issuer must not be empty".to_string());
        }
        if self.audience.trim().is_empty() {
            return Err("jwt.audience must not be empty".to_string());
        }
        if self.expire_minutes <= 0 {
            return Err("jwt.expire_minutes must be positive".to_string());
        }
        Ok(())
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("configuration").required(false))
        .build()?;
    let settings = settings.try_deserialize::<Settings>()?;
    settings.jwt.validate().map_err(ConfigError::Message)?;
    Ok(settings)
}
