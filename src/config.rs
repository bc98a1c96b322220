use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,

    /// Shared secret presented by edge devices on every request.
    pub sensor_secret: String,

    // Pipeline tuning
    pub debounce_seconds: i64,
    pub max_speed_kmh: f64,
    pub tz_offset_hours: i32,

    // Rate limiting
    pub rate_device_per_min: u32,
    pub rate_admin_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://timeclock.db?mode=rwc".to_string()),
            sensor_secret: env::var("SENSOR_SECRET").expect("SENSOR_SECRET must be set"),

            debounce_seconds: env::var("DEBOUNCE_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            max_speed_kmh: env::var("MAX_SPEED_KMH")
                .unwrap_or_else(|_| "800".to_string())
                .parse()
                .unwrap(),
            tz_offset_hours: env::var("TZ_OFFSET_HOURS")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .unwrap(),

            rate_device_per_min: env::var("RATE_DEVICE_PER_MIN")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .unwrap(),
            rate_admin_per_min: env::var("RATE_ADMIN_PER_MIN")
                .unwrap_or_else(|_| "600".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }
}
