//! Seed script for development: populates a fresh database with sample risks.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires the `DATABASE_URL` environment variable (reads .env).

use riskmatrix::services::assessment;
use sqlx::PgPool;

/// (asset, threat, likelihood, impact)
const SAMPLE_RISKS: &[(&str, &str, i64, i64)] = &[
    ("Customer Database", "SQL injection via legacy reporting endpoint", 3, 5),
    ("Payment Gateway", "Credential stuffing against merchant logins", 4, 5),
    ("Employee Laptops", "Ransomware delivered by phishing email", 4, 4),
    ("VPN Concentrator", "Unpatched remote code execution", 5, 5),
    ("HR Portal", "Insider misuse of privileged accounts", 2, 4),
    ("Backup NAS", "Hardware failure without offsite copy", 2, 3),
    ("Corporate Website", "Defacement", 3, 2),
    ("Intranet Wiki", "Accidental disclosure of internal notes", 1, 2),
    ("Office Wi-Fi", "Rogue access point", 2, 2),
    ("Data Center", "Prolonged power outage", 1, 5),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL")?;
    let pool = riskmatrix::db::create_pool(&db_url, 5).await?;

    // Run migrations first
    riskmatrix::db::migrate(&pool).await?;

    println!("=== Risk Register Seed Script ===");

    seed_risks(&pool).await?;

    println!("\n=== Seed complete! ===");
    Ok(())
}

async fn seed_risks(pool: &PgPool) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM risks")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Risks already exist ({count})");
        return Ok(());
    }

    for &(asset, threat, likelihood, impact) in SAMPLE_RISKS {
        let new_risk = assessment::create_assessment(asset, threat, likelihood, impact)?;
        let risk = assessment::create(pool, new_risk).await?;
        println!(
            "  #{:<3} {:<20} score {:>2} ({})",
            risk.id(),
            risk.asset(),
            risk.score(),
            risk.level()
        );
    }

    println!("[done] Created {} sample risks", SAMPLE_RISKS.len());
    Ok(())
}
