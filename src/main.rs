use anyhow::Context;
use chrono::Local;
use log::info;
use mindcare::backend::utils::config::AppConfig;
use mindcare::frontend::services::dashboard::greeting;
use mindcare::utils::logging;
use mindcare::{Admission, App, Route};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_from_env();

    let config = AppConfig::load().await.context("Failed to load configuration")?;
    info!("Using API at {}", config.api.base_url);

    let mut app = App::from_config(&config).context("Failed to create API client")?;
    app.session_mut().resolve().await;

    match app.session().admit(&Route::Dashboard) {
        Admission::Render(_) => {
            let name = app
                .session()
                .identity()
                .map(|identity| identity.display_name().to_string())
                .unwrap_or_default();
            println!("{}, {name}!", greeting(Local::now().time()));

            let dashboard = app.dashboard();
            dashboard.mount().await.context("Failed to load dashboard")?;
            if let Some(stats) = dashboard.stats() {
                println!("Medications: {}", stats.total_medications);
                println!("Upcoming appointments:");
                for apt in &stats.upcoming_appointments {
                    println!("  {}  {}", apt.appointment_date.format("%a %b %d %H:%M"), apt.title);
                }
                if !stats.medications_needing_refill.is_empty() {
                    println!("Refill soon:");
                    for med in &stats.medications_needing_refill {
                        match med.refill_date {
                            Some(date) => println!("  {} ({date})", med.name),
                            None => println!("  {}", med.name),
                        }
                    }
                }
            }
        }
        Admission::Redirect(route) => {
            println!("Not signed in. Continue at {route}.");
        }
        Admission::Placeholder => {
            println!("Loading...");
        }
    }

    Ok(())
}
