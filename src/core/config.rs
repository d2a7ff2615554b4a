use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub store: StoreConfig,
    pub images: ImageBucketConfig,
    pub geocoding: GeocodingConfig,
    pub notification: NotificationConfig,
    pub submission: SubmissionConfig,
    pub dashboard: DashboardConfig,
    pub admin: AdminConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

/// Backend-as-a-service REST surface holding the reports table
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Project URL, e.g. `https://<project>.supabase.co`
    pub url: String,
    /// Public (anon) API key sent on every request
    pub api_key: String,
    /// Privileged key used for admin mutations, falls back to `api_key`
    pub service_key: Option<String>,
    pub reports_table: String,
    pub timeout: Duration,
}

/// S3-compatible bucket holding report photos
#[derive(Debug, Clone)]
pub struct ImageBucketConfig {
    /// S3 endpoint URL
    pub endpoint: String,
    /// Base URL under which objects are publicly readable
    pub public_url: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub region: String,
}

#[derive(Debug, Clone)]
pub struct GeocodingConfig {
    pub nominatim_url: String,
    pub photon_url: String,
    pub user_agent: String,
    pub default_center: (f64, f64),
}

/// Recipient of the drafted pothole email
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub recipient: String,
    pub authority: String,
}

#[derive(Debug, Clone)]
pub struct SubmissionConfig {
    pub session_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Translate underscore-spelled legacy statuses into the canonical vocabulary
    pub legacy_status_mapping: bool,
}

#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            store: StoreConfig::from_env()?,
            images: ImageBucketConfig::from_env()?,
            geocoding: GeocodingConfig::from_env()?,
            notification: NotificationConfig::from_env()?,
            submission: SubmissionConfig::from_env()?,
            dashboard: DashboardConfig::from_env()?,
            admin: AdminConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 12 * 1024 * 1024; // 12MB, photo plus form fields

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_body_size = env::var("MAX_REQUEST_BODY_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_REQUEST_BODY_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_REQUEST_BODY_SIZE must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            max_request_body_size,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StoreConfig {
    const DEFAULT_REPORTS_TABLE: &'static str = "pothole_reports";
    const DEFAULT_TIMEOUT_SECS: u64 = 15;

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("STORE_URL")
            .map_err(|_| "STORE_URL must be set".to_string())?
            .trim_end_matches('/')
            .to_string();

        let api_key = env::var("STORE_API_KEY")
            .map_err(|_| "STORE_API_KEY environment variable is required".to_string())?;

        let service_key = env::var("STORE_SERVICE_KEY")
            .ok()
            .filter(|s| !s.is_empty());

        let reports_table = env::var("STORE_REPORTS_TABLE")
            .unwrap_or_else(|_| Self::DEFAULT_REPORTS_TABLE.to_string());

        let timeout_secs = env::var("STORE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "STORE_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            api_key,
            service_key,
            reports_table,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl ImageBucketConfig {
    pub fn from_env() -> Result<Self, String> {
        let endpoint =
            env::var("IMAGES_ENDPOINT").unwrap_or_else(|_| "http://localhost:9000".to_string());

        // Public URL defaults to path-style access on the main endpoint
        let bucket = env::var("IMAGES_BUCKET").unwrap_or_else(|_| "pothole-images".to_string());
        let public_url = env::var("IMAGES_PUBLIC_URL")
            .unwrap_or_else(|_| format!("{}/{}", endpoint.trim_end_matches('/'), bucket));

        let access_key = env::var("IMAGES_ACCESS_KEY").unwrap_or_else(|_| "minioadmin".to_string());
        let secret_key = env::var("IMAGES_SECRET_KEY").unwrap_or_else(|_| "minioadmin".to_string());
        let region = env::var("IMAGES_REGION").unwrap_or_else(|_| "us-east-1".to_string());

        Ok(Self {
            endpoint,
            public_url: public_url.trim_end_matches('/').to_string(),
            access_key,
            secret_key,
            bucket,
            region,
        })
    }
}

impl GeocodingConfig {
    // Bangalore city center
    const DEFAULT_CENTER_LAT: f64 = 12.9716;
    const DEFAULT_CENTER_LON: f64 = 77.5946;

    pub fn from_env() -> Result<Self, String> {
        let nominatim_url = env::var("NOMINATIM_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string());
        let photon_url =
            env::var("PHOTON_URL").unwrap_or_else(|_| "https://photon.komoot.io".to_string());
        let user_agent =
            env::var("GEOCODER_USER_AGENT").unwrap_or_else(|_| "PotholeHeroApp/1.0".to_string());

        let lat = env::var("DEFAULT_CENTER_LAT")
            .unwrap_or_else(|_| Self::DEFAULT_CENTER_LAT.to_string())
            .parse::<f64>()
            .map_err(|_| "DEFAULT_CENTER_LAT must be a valid number".to_string())?;
        let lon = env::var("DEFAULT_CENTER_LON")
            .unwrap_or_else(|_| Self::DEFAULT_CENTER_LON.to_string())
            .parse::<f64>()
            .map_err(|_| "DEFAULT_CENTER_LON must be a valid number".to_string())?;

        Ok(Self {
            nominatim_url: nominatim_url.trim_end_matches('/').to_string(),
            photon_url: photon_url.trim_end_matches('/').to_string(),
            user_agent,
            default_center: (lat, lon),
        })
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
            photon_url: "https://photon.komoot.io".to_string(),
            user_agent: "PotholeHeroApp/1.0".to_string(),
            default_center: (Self::DEFAULT_CENTER_LAT, Self::DEFAULT_CENTER_LON),
        }
    }
}

impl NotificationConfig {
    pub fn from_env() -> Result<Self, String> {
        let recipient =
            env::var("NOTIFY_RECIPIENT").unwrap_or_else(|_| "comm@bbmp.gov.in".to_string());
        let authority = env::var("NOTIFY_AUTHORITY").unwrap_or_else(|_| "BBMP".to_string());

        if !recipient.contains('@') {
            return Err("NOTIFY_RECIPIENT must be an email address".to_string());
        }

        Ok(Self {
            recipient,
            authority,
        })
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            recipient: "comm@bbmp.gov.in".to_string(),
            authority: "BBMP".to_string(),
        }
    }
}

impl SubmissionConfig {
    const DEFAULT_SESSION_TTL_SECS: u64 = 3600; // 1 hour

    pub fn from_env() -> Result<Self, String> {
        let ttl_secs = env::var("SUBMISSION_TTL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_SESSION_TTL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "SUBMISSION_TTL_SECS must be a valid number".to_string())?;

        Ok(Self {
            session_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, String> {
        let legacy_status_mapping = env::var("STATUS_LEGACY_MAPPING")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .map_err(|_| "STATUS_LEGACY_MAPPING must be true or false".to_string())?;

        Ok(Self {
            legacy_status_mapping,
        })
    }
}

impl AdminConfig {
    pub fn from_env() -> Result<Self, String> {
        let username = env::var("ADMIN_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("ADMIN_PASSWORD").ok().filter(|s| !s.is_empty());

        Ok(Self { username, password })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Pothole Hero API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Citizen pothole reporting and dashboard API".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
