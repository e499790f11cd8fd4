use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: Catalog,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ServerConfig {
    /// IANA timezone that decides what "today" is for date checks.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

/// Options offered by the reservation form's selects.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Catalog {
    #[serde(default = "default_activities")]
    pub activities: Vec<String>,
    #[serde(default = "default_instructors")]
    pub instructors: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            activities: default_activities(),
            instructors: default_instructors(),
        }
    }
}

fn default_timezone() -> String {
    "Europe/Madrid".to_string()
}

fn default_activities() -> Vec<String> {
    ["Spinning", "Yoga", "Natación", "Tenis", "Pilates", "Aeróbicos"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_instructors() -> Vec<String> {
    [
        "Ana López",
        "Miguel Torres",
        "Carmen Ruiz",
        "David García",
        "Laura Martín",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
