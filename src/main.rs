// src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas de autenticação
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Perfil do usuário autenticado
    let user_routes = Router::new()
        .route("/me", get(handlers::users::get_me))
        .route("/me/password", put(handlers::users::change_password))
        .route("/me/companies", get(handlers::users::get_my_companies))
        .route("/me/company", put(handlers::users::select_company));

    // Ciclo de vida da empresa
    let company_routes = Router::new()
        .route("/setup", post(handlers::company::setup_company))
        .route(
            "/current",
            get(handlers::company::get_current_company)
                .put(handlers::company::update_current_company),
        );

    // Gestão de membros da empresa ativa
    let membership_routes = Router::new()
        .route(
            "/",
            get(handlers::users::list_memberships).post(handlers::users::create_membership),
        )
        .route(
            "/{id}",
            get(handlers::users::get_membership).put(handlers::users::update_membership),
        )
        .route(
            "/{id}/deactivate",
            post(handlers::users::deactivate_membership),
        )
        .route(
            "/{id}/reactivate",
            post(handlers::users::reactivate_membership),
        );

    // Catálogo: categorias, unidades e produtos
    let inventory_routes = Router::new()
        .route(
            "/categories",
            post(handlers::catalog::create_category).get(handlers::catalog::list_categories),
        )
        .route(
            "/categories/{id}",
            get(handlers::catalog::get_category).put(handlers::catalog::update_category),
        )
        .route(
            "/categories/{id}/deactivate",
            post(handlers::catalog::deactivate_category),
        )
        .route(
            "/categories/{id}/reactivate",
            post(handlers::catalog::reactivate_category),
        )
        .route(
            "/units",
            post(handlers::catalog::create_unit).get(handlers::catalog::list_units),
        )
        .route(
            "/units/{id}",
            get(handlers::catalog::get_unit).put(handlers::catalog::update_unit),
        )
        .route(
            "/units/{id}/deactivate",
            post(handlers::catalog::deactivate_unit),
        )
        .route(
            "/units/{id}/reactivate",
            post(handlers::catalog::reactivate_unit),
        )
        .route(
            "/products",
            post(handlers::catalog::create_product).get(handlers::catalog::list_products),
        )
        .route("/products/{id}", get(handlers::catalog::get_product))
        .route("/products/{id}/data", put(handlers::catalog::update_product_data))
        .route(
            "/products/{id}/tax",
            get(handlers::catalog::get_product_tax).put(handlers::catalog::update_product_tax),
        )
        .route(
            "/products/{id}/deactivate",
            post(handlers::catalog::deactivate_product),
        )
        .route(
            "/products/{id}/reactivate",
            post(handlers::catalog::reactivate_product),
        );

    // Parceiros: clientes e fornecedores (wizard em passos nomeados)
    let partner_routes = Router::new()
        .route("/customers", get(handlers::partners::list_customers))
        .route("/customers/basic", post(handlers::partners::create_customer))
        .route("/customers/{id}", get(handlers::partners::get_customer))
        .route(
            "/customers/{id}/basic",
            put(handlers::partners::update_customer_basic),
        )
        .route(
            "/customers/{id}/advanced",
            put(handlers::partners::update_customer_advanced),
        )
        .route(
            "/customers/{id}/address",
            get(handlers::partners::get_customer_address)
                .put(handlers::partners::update_customer_address),
        )
        .route(
            "/customers/{id}/deactivate",
            post(handlers::partners::deactivate_customer),
        )
        .route(
            "/customers/{id}/reactivate",
            post(handlers::partners::reactivate_customer),
        )
        .route("/suppliers", get(handlers::partners::list_suppliers))
        .route("/suppliers/basic", post(handlers::partners::create_supplier))
        .route("/suppliers/{id}", get(handlers::partners::get_supplier))
        .route(
            "/suppliers/{id}/basic",
            put(handlers::partners::update_supplier_basic),
        )
        .route(
            "/suppliers/{id}/advanced",
            put(handlers::partners::update_supplier_advanced),
        )
        .route(
            "/suppliers/{id}/address",
            get(handlers::partners::get_supplier_address)
                .put(handlers::partners::update_supplier_address),
        )
        .route(
            "/suppliers/{id}/deactivate",
            post(handlers::partners::deactivate_supplier),
        )
        .route(
            "/suppliers/{id}/reactivate",
            post(handlers::partners::reactivate_supplier),
        );

    // Tudo que não é /api/auth exige o Bearer token.
    let protected = Router::new()
        .nest("/api/users", user_routes)
        .nest("/api/companies", company_routes)
        .nest("/api/memberships", membership_routes)
        .route("/api/permissions", get(handlers::users::list_permissions))
        .nest("/api/inventory", inventory_routes)
        .nest("/api/partners", partner_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .merge(protected)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", addr);
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
