//! Print a one-screen overview of the fleet.
//!
//! ```sh
//! KONYX_API_BASE_URL=http://localhost:8080 \
//! KONYX_EMAIL=ops@konyx.io KONYX_PASSWORD=... \
//! RUST_LOG=konyx=debug \
//! cargo run -p konyx --example fleet_overview --features trace
//! ```

use chrono::{Duration, Utc};
use konyx::observability::init_tracing;
use konyx::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let session = Session::new(ApiClient::from_env()?);

    if session.restore().await?.is_none() {
        let email = std::env::var("KONYX_EMAIL")?;
        let password = std::env::var("KONYX_PASSWORD")?;
        session.login(&email, &password).await?;
    }

    let user = session.user().await;
    println!(
        "Signed in as {}",
        user.map(|u| u.email).unwrap_or_else(|| "unknown".to_string())
    );

    let devices = session.devices().list().await?;
    let online = devices.iter().filter(|d| d.is_online()).count();
    println!("{online}/{} devices online", devices.len());

    let now = Utc::now();
    for device in &devices {
        let seen = device
            .last_seen_at()
            .map(|t| format!("{}m ago", (now - t).num_minutes()))
            .unwrap_or_else(|| "never".to_string());
        println!(
            "  {:<14} {:<8} {:<8} seen {}",
            device.device_id,
            format!("{:?}", device.status).to_lowercase(),
            device.fw_version.as_deref().unwrap_or("-"),
            seen
        );
    }

    if let Some(device) = devices.iter().find(|d| d.is_online()) {
        let query = TelemetryQuery::last(&device.device_id, "temperature", Duration::hours(1), now)
            .with_limit(60);
        match session.telemetry().series(&query).await {
            Ok(series) => {
                let values: Vec<f64> = series.points.iter().map(|p| p.value).collect();
                if let (Some(min), Some(max)) = (
                    values.iter().copied().reduce(f64::min),
                    values.iter().copied().reduce(f64::max),
                ) {
                    println!(
                        "{} temperature, last hour: {} points, {min:.1}..{max:.1}",
                        device.device_id,
                        values.len()
                    );
                }
            }
            Err(err) if err.as_api_error().is_some_and(ApiError::is_not_implemented) => {
                println!("Telemetry storage is disabled on this server");
            }
            Err(err) => return Err(err.into()),
        }

        let ack = session
            .commands()
            .send(&device.device_id, &CommandRequest::new(CommandType::Ping))
            .await;
        match ack {
            Ok(ack) => println!("ping {}: ok={}", device.device_id, ack.ok),
            Err(err) => match konyx::resources::ack_from_error(&err) {
                Some(ack) => println!(
                    "ping {}: failed ({})",
                    device.device_id,
                    ack.code.unwrap_or_default()
                ),
                None => return Err(err.into()),
            },
        }
    }

    Ok(())
}
