use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub login_url: String,
    pub favorites_url: String,
    pub paginate_by: usize,
    pub content_types: Vec<ContentTypeSpec>,
    pub otel_service_name: String,
    pub otel_exporter_endpoint: String,
}

/// One entry of `FAVORITE_CONTENT_TYPES`: `app.model=table[:label_column]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypeSpec {
    pub content_type: String,
    pub table: String,
    pub label_column: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("PORT must be a number"),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            login_url: env::var("LOGIN_URL").unwrap_or_else(|_| "/accounts/login".to_string()),
            favorites_url: env::var("FAVORITES_URL").unwrap_or_else(|_| "/favorites".to_string()),
            paginate_by: env::var("PAGINATE_BY")
                .unwrap_or_else(|_| "25".to_string())
                .parse()
                .expect("PAGINATE_BY must be a number"),
            content_types: parse_content_types(
                &env::var("FAVORITE_CONTENT_TYPES").unwrap_or_default(),
            )
            .expect("FAVORITE_CONTENT_TYPES must look like app.model=table[:label],..."),
            otel_service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "favorites-service".to_string()),
            otel_exporter_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
        }
    }

    /// Settings for running the router without a database, e.g. in tests.
    pub fn for_testing(jwt_secret: &str) -> Self {
        Self {
            port: 0,
            environment: "test".to_string(),
            database_url: String::new(),
            jwt_secret: jwt_secret.to_string(),
            login_url: "/accounts/login".to_string(),
            favorites_url: "/favorites".to_string(),
            paginate_by: 25,
            content_types: Vec::new(),
            otel_service_name: "favorites-service".to_string(),
            otel_exporter_endpoint: "http://localhost:4317".to_string(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

pub fn parse_content_types(raw: &str) -> Result<Vec<ContentTypeSpec>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (content_type, target) = entry
                .split_once('=')
                .ok_or_else(|| format!("missing '=' in '{entry}'"))?;
            let (table, label_column) = match target.split_once(':') {
                Some((table, label)) => (table, Some(label.trim().to_string())),
                None => (target, None),
            };
            let table = table.trim();
            if table.is_empty() {
                return Err(format!("missing table in '{entry}'"));
            }
            Ok(ContentTypeSpec {
                content_type: content_type.trim().to_string(),
                table: table.to_string(),
                label_column,
            })
        })
        .collect()
}
