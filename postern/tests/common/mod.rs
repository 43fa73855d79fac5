use std::sync::Arc;
use std::sync::Once;

use axum::extract::Request;
use axum::extract::State;
use axum::middleware;
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::get;
use axum::Extension;
use axum::Json;
use axum::Router;
use credentials::Keyring;
use credentials::PasswordHasher;
use postern::authority::KeyringAuthority;
use postern::config::AuthConfig;
use postern::config::TokenTransport;
use postern::identity::Identity;
use postern::identity::SkipAuthenticate;
use postern::memory::MemoryRevocationStore;
use postern::memory::MemoryUserStore;
use postern::middleware::authenticate;
use postern::middleware::loginout_check;
use postern::models::UserRecord;
use postern::signup::Signup;
use postern::state::AuthState;
use postern::tools::redirect_to_login;
use serde_json::json;
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

const SECRET: &[u8] = b"test-secret-key-for-token-signing-at-least-32-bytes";

static TRACING: Once = Once::new();

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub keyring: Keyring,
    pub config: Arc<AuthConfig>,
    pub users: MemoryUserStore,
    pub signup: Signup<MemoryUserStore>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn(transport: TokenTransport) -> Self {
        init_tracing();

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let config = Arc::new(AuthConfig {
            transport,
            ..AuthConfig::default()
        });

        let keyring = Keyring::new(SECRET);
        let authority = Arc::new(KeyringAuthority::new(
            keyring.clone(),
            Arc::new(MemoryRevocationStore::new()),
        ));
        let users = MemoryUserStore::new();
        let signup = Signup::new(config.clone(), Arc::new(users.clone()));

        let state = AuthState::new(config.clone(), authority, Arc::new(users.clone()), 24);

        let guarded = Router::new()
            .route("/members", get(members_area))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_login,
            ));

        let router = Router::new()
            .route("/", get(home))
            .route("/whoami", get(whoami))
            .route("/login", get(login_page).post(welcome))
            .merge(guarded)
            .layer(middleware::from_fn_with_state(state.clone(), authenticate))
            .layer(middleware::from_fn_with_state(state, loginout_check))
            .layer(TraceLayer::new_for_http());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create reqwest client"),
            keyring,
            config,
            users,
            signup,
        }
    }

    /// Insert a user with the given password already hashed
    pub async fn seed_user(&self, username: &str, password: &str) -> UserRecord {
        let hasher = PasswordHasher::new(self.config.hash_scheme);
        let hash = hasher.hash(password).expect("Failed to hash password");

        let mut record = UserRecord::new(username);
        record.email = Some(format!("{}@example.com", username));
        record.password_hash = hash;

        self.users
            .insert(record)
            .await
            .expect("Failed to insert user")
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to submit credentials to the login path
    pub fn login(&self, username: &str, password: &str) -> reqwest::RequestBuilder {
        self.post("/login")
            .json(&json!({ "username": username, "password": password }))
    }
}

fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
            )
            .init();
    });
}

/// Guard sending anonymous visitors to the login page
async fn require_login(
    State(state): State<AuthState>,
    identity: Identity,
    req: Request,
    next: Next,
) -> Response {
    if identity.is_anonymous() {
        return redirect_to_login(&req, &state.config);
    }

    next.run(req).await
}

async fn home() -> &'static str {
    "home"
}

async fn members_area() -> &'static str {
    "members"
}

async fn whoami(identity: Identity) -> Json<Value> {
    match identity {
        Identity::Anonymous => Json(json!({ "anonymous": true })),
        Identity::Authenticated(claims) => Json(json!({
            "anonymous": false,
            "sub": claims.sub,
            "username": claims.username,
        })),
    }
}

async fn login_page(
    identity: Identity,
    skipped: Option<Extension<SkipAuthenticate>>,
) -> Json<Value> {
    Json(json!({
        "page": "login",
        "anonymous": identity.is_anonymous(),
        "skipped": skipped.is_some(),
    }))
}

async fn welcome(identity: Identity) -> Json<Value> {
    match identity {
        Identity::Anonymous => Json(json!({ "message": "Welcome, stranger" })),
        Identity::Authenticated(claims) => Json(json!({
            "message": format!("Welcome back, {}", claims.username),
        })),
    }
}
