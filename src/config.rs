use dotenvy::dotenv;
use log::error;
use serde::Deserialize;
use std::env;

const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

#[derive(Deserialize, Debug, Default, Clone)]
pub struct Config {
    pub db_path: String,
    pub http_bind_address: Option<String>,
    pub routing_api_key: Option<String>,
    pub geocoding_api_key: Option<String>,
    #[serde(default = "default_geocoding_locality")]
    pub geocoding_locality: String,
    #[serde(default = "default_geocoding_country")]
    pub geocoding_country: String,
    #[serde(default = "default_geocoding_bias_latitude")]
    pub geocoding_bias_latitude: f64,
    #[serde(default = "default_geocoding_bias_longitude")]
    pub geocoding_bias_longitude: f64,
}

fn default_geocoding_locality() -> String {
    String::from("Trento, Italy")
}

fn default_geocoding_country() -> String {
    String::from("it")
}

fn default_geocoding_bias_latitude() -> f64 {
    46.0748
}

fn default_geocoding_bias_longitude() -> f64 {
    11.1217
}

pub fn create_test_config() -> Config {
    Config {
        db_path: "xxx".to_string(),
        http_bind_address: None,
        routing_api_key: None,
        geocoding_api_key: None,
        geocoding_locality: default_geocoding_locality(),
        geocoding_country: default_geocoding_country(),
        geocoding_bias_latitude: default_geocoding_bias_latitude(),
        geocoding_bias_longitude: default_geocoding_bias_longitude(),
    }
}

pub fn read_config() -> Config {
    dotenv().ok();
    env::var(CONFIG_PATH_ENV)
        .map_err(|_| format!("{CONFIG_PATH_ENV} .env not set"))
        .and_then(|config_path| std::fs::read(config_path).map_err(|e| e.to_string()))
        .and_then(|bytes| toml::from_slice(&bytes).map_err(|e| e.to_string()))
        .unwrap_or_else(|err| {
            error!("failed to read config: {err}");
            std::process::exit(1);
        })
}
