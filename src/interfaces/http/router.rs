//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{
    AuditService, LocationService, QuotationService, TariffCatalogService, UserService,
};
use crate::domain::location::EntryPointTable;
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse};
use crate::interfaces::http::middleware::{admin_middleware, auth_middleware, AuthState};
use crate::interfaces::http::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use crate::interfaces::http::modules::request_id::request_id_middleware;
use crate::interfaces::http::modules::{
    admin, auth, health, locations, quotations, tariffs, users,
};

/// Application services shared by the HTTP handlers
#[derive(Clone)]
pub struct ApiServices {
    pub users: Arc<UserService>,
    pub locations: Arc<LocationService>,
    pub catalog: Arc<TariffCatalogService>,
    pub quotations: Arc<QuotationService>,
    pub audit: Arc<AuditService>,
    pub jwt_config: JwtConfig,
}

impl ApiServices {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        jwt_config: JwtConfig,
        entry_points: EntryPointTable,
        volumetric_factor: Decimal,
    ) -> Self {
        let users = Arc::new(UserService::new(repos.clone(), jwt_config.clone()));
        let locations = Arc::new(LocationService::new(repos.clone(), entry_points));
        let catalog = Arc::new(TariffCatalogService::new(repos.clone(), locations.clone()));
        let quotations = Arc::new(QuotationService::new(
            repos.clone(),
            catalog.clone(),
            locations.clone(),
            volumetric_factor,
        ));
        let audit = Arc::new(AuditService::new(repos));

        Self {
            users,
            locations,
            catalog,
            quotations,
            audit,
            jwt_config,
        }
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT from POST /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::get_current_user,
        auth::change_password,
        quotations::create_quotation,
        quotations::preview_quotation,
        quotations::list_my_quotations,
        quotations::get_quotation,
        tariffs::list_tariffs,
        tariffs::get_current_tariff,
        tariffs::get_tariff_history,
        tariffs::create_tariff,
        locations::list_locations,
        locations::create_location,
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        admin::list_all_quotations,
        admin::export_quotations,
        admin::dashboard,
        admin::audit_log,
    ),
    components(
        schemas(
            ApiResponse<String>,
            PaginatedResponse<quotations::QuotationDto>,
            PaginatedResponse<users::UserDto>,
            PaginatedResponse<admin::AuditEntryDto>,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            auth::ChangePasswordRequest,
            quotations::CreateQuotationRequest,
            quotations::PieceRequest,
            quotations::QuotationDto,
            quotations::QuotationItemDto,
            quotations::QuotationPreviewDto,
            tariffs::TariffResponse,
            tariffs::CreateTariffRequest,
            locations::LocationDto,
            locations::CreateLocationRequest,
            users::UserDto,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            admin::DashboardDto,
            admin::AuditEntryDto,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and database reachability"),
        (name = "Authentication", description = "Login (JWT), profile, password change"),
        (name = "Quotations", description = "Freight quotations: preview, create, own history"),
        (name = "Tariffs", description = "Versioned USD rates per origin and transport mode"),
        (name = "Locations", description = "Airports and seaports usable as origins"),
        (name = "Users", description = "User administration (admin)"),
        (name = "Admin", description = "Full history, CSV export, dashboard, audit log (admin)"),
    ),
    info(
        title = "Freight Quote API",
        version = "0.1.0",
        description = "Air and sea freight quotations in USD with versioned origin tariffs"
    )
)]
pub struct ApiDoc;

/// Build the full router. `/metrics` is mounted only when a Prometheus
/// handle is supplied.
pub fn create_api_router(
    services: ApiServices,
    db: DatabaseConnection,
    prometheus: Option<PrometheusHandle>,
) -> Router {
    let auth_state = AuthState {
        jwt_config: services.jwt_config.clone(),
        users: services.users.clone(),
    };
    let require_auth = middleware::from_fn_with_state(auth_state, auth_middleware);
    let require_admin = middleware::from_fn(admin_middleware);

    // ── Auth ───────────────────────────────────────────────────
    let auth_handler_state = auth::AuthHandlerState {
        users: services.users.clone(),
    };
    let auth_public = Router::new()
        .route("/login", post(auth::login))
        .with_state(auth_handler_state.clone());
    let auth_protected = Router::new()
        .route("/me", get(auth::get_current_user))
        .route("/change-password", put(auth::change_password))
        .layer(require_auth.clone())
        .with_state(auth_handler_state);

    // ── Quotations ─────────────────────────────────────────────
    let quotation_routes = Router::new()
        .route(
            "/",
            get(quotations::list_my_quotations).post(quotations::create_quotation),
        )
        .route("/preview", post(quotations::preview_quotation))
        .route("/{id}", get(quotations::get_quotation))
        .layer(require_auth.clone())
        .with_state(quotations::QuotationHandlerState {
            quotations: services.quotations.clone(),
        });

    // ── Tariffs: reads for everyone, publication for admins ────
    let tariff_state = tariffs::TariffHandlerState {
        catalog: services.catalog.clone(),
        locations: services.locations.clone(),
    };
    let tariff_admin = Router::new()
        .route("/", post(tariffs::create_tariff))
        .layer(require_admin.clone());
    let tariff_routes = Router::new()
        .route("/", get(tariffs::list_tariffs))
        .route("/current", get(tariffs::get_current_tariff))
        .route("/history", get(tariffs::get_tariff_history))
        .merge(tariff_admin)
        .layer(require_auth.clone())
        .with_state(tariff_state);

    // ── Locations ──────────────────────────────────────────────
    let location_admin = Router::new()
        .route("/", post(locations::create_location))
        .layer(require_admin.clone());
    let location_routes = Router::new()
        .route("/", get(locations::list_locations))
        .merge(location_admin)
        .layer(require_auth.clone())
        .with_state(locations::LocationHandlerState {
            locations: services.locations.clone(),
        });

    // ── Users (admin) ──────────────────────────────────────────
    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .layer(require_admin.clone())
        .layer(require_auth.clone())
        .with_state(users::UserHandlerState {
            users: services.users.clone(),
        });

    // ── Admin views ────────────────────────────────────────────
    let admin_routes = Router::new()
        .route("/quotations", get(admin::list_all_quotations))
        .route("/quotations/export", get(admin::export_quotations))
        .route("/dashboard", get(admin::dashboard))
        .route("/audit-log", get(admin::audit_log))
        .layer(require_admin)
        .layer(require_auth)
        .with_state(admin::AdminHandlerState {
            quotations: services.quotations.clone(),
            audit: services.audit.clone(),
        });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db,
            started_at: Arc::new(Instant::now()),
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .nest("/api/v1/auth", auth_public.merge(auth_protected))
        .nest("/api/v1/quotations", quotation_routes)
        .nest("/api/v1/tariffs", tariff_routes)
        .nest("/api/v1/locations", location_routes)
        .nest("/api/v1/users", user_routes)
        .nest("/api/v1/admin", admin_routes);

    if let Some(handle) = prometheus {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}
