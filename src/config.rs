// config.rs
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    /// How long a technician holds an offer before it is revoked, in seconds.
    pub reservation_window_secs: u64,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let jwt_maxage = std::env::var("JWT_MAXAGE")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<i64>()
            .expect("JWT_MAXAGE must be a number of minutes");

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .expect("PORT must be a valid port number");

        let reservation_window_secs = std::env::var("RESERVATION_WINDOW_SECS")
            .unwrap_or_else(|_| "180".to_string())
            .parse::<u64>()
            .expect("RESERVATION_WINDOW_SECS must be a number of seconds");

        Config {
            database_url,
            jwt_secret,
            jwt_maxage,
            port,
            reservation_window_secs,
        }
    }
}
