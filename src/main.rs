use std::net::SocketAddr;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use transport_backoffice::config::{DatabaseConfig, EnvironmentConfig};
use transport_backoffice::database::DatabaseConnection;
use transport_backoffice::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚛 Transport Back Office API");
    info!("================================================");

    let config = EnvironmentConfig::from_env().context("Invalid configuration")?;
    if config.is_production() {
        info!("🔒 Modo producción");
    } else {
        warn!("⚠️  Modo {}: usa credenciales de desarrollo solo en local", config.environment);
    }
    info!(
        "⛽ Liquidación: {} por litro, anticipo {}, conductor {}",
        config.settlement.fuel_cost_per_liter, config.settlement.advance_rate, config.settlement.driver_rate
    );

    // Inicializar base de datos
    let db_connection = DatabaseConnection::connect(&DatabaseConfig::new(config.database_url.clone()))
        .await
        .map_err(|e| {
            error!("❌ Error conectando a la base de datos: {}", e);
            anyhow::anyhow!("Error de base de datos: {}", e)
        })?;
    db_connection
        .run_migrations()
        .await
        .context("Error aplicando migraciones")?;

    let addr: SocketAddr = config.server_url().parse().context("Invalid HOST/PORT")?;
    let app = create_router(AppState::new(db_connection.into_pool(), config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints públicos:");
    info!("   GET  /api/health - Health check (sin autenticación básica)");
    info!("   GET  /api/welcome - Bienvenida");
    info!("   GET  /api/test-auth - Comprobar autenticación básica");
    info!("🔐 Auth:");
    info!("   POST /api/auth/register - Registrar administrador");
    info!("   POST /api/auth/login - Login");
    info!("   PUT  /api/auth/forgotPassword - Generar token de recuperación");
    info!("   PUT  /api/auth/resetPassword - Restablecer contraseña");
    info!("   GET  /api/auth/profile - Perfil");
    info!("   PUT  /api/auth/profile - Actualizar perfil");
    info!("🧑‍✈️ Conductores, 🚚 vehículos, 📦 grupos, 📋 proyectos:");
    info!("   GET/POST       /api/{{driver,vehicle,vehicle-group,project}}");
    info!("   GET            /api/{{driver,vehicle,vehicle-group,project}}/stats");
    info!("   GET/PUT/DELETE /api/{{driver,vehicle,vehicle-group,project}}/:id");
    info!("   PATCH          /api/{{driver,vehicle,vehicle-group,project}}/:id/toggle-status");
    info!("   GET            /api/vehicle-group/:id/vehicles");
    info!("🛣️ Viajes:");
    info!("   GET/POST       /api/trip");
    info!("   GET            /api/trip/stats");
    info!("   GET/PUT/DELETE /api/trip/:id");
    info!("   PATCH          /api/trip/:id/status - Máquina de estados");
    info!("📊 Informes:");
    info!("   GET  /api/report/{{dashboard,vehicles,drivers,projects,trips}}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo escuchar SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
