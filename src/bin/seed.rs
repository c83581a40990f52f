use parking_reservation_api::{
    config::AppConfig,
    db::{DbPool, create_pool, run_migrations},
    services::auth_service::{ensure_default_admin, hash_password},
    state::AppState,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let state = AppState::new(pool, config);
    run_migrations(&state.orm).await?;

    match ensure_default_admin(&state).await? {
        Some(id) => println!("Created admin {} ({id})", state.config.admin.email),
        None => println!("Admin already present"),
    }

    let user_id = ensure_user(&state.pool, "Demo User", "user@example.com", "9000000001", "user123").await?;
    seed_lots(&state.pool).await?;

    println!("Seed completed. Demo user ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &DbPool,
    full_name: &str,
    email: &str,
    mobile: &str,
    password: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, full_name, email, mobile, password_hash, role)
        VALUES ($1, $2, $3, $4, $5, 'user')
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(full_name)
    .bind(email)
    .bind(mobile)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?;

    // Already seeded on a previous run
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email}");
    Ok(user_id)
}

async fn seed_lots(pool: &DbPool) -> anyhow::Result<()> {
    let lots = vec![
        ("City Centre", "12 Market Street", "560001", 4000_i64, 10_i32),
        ("Railway Station", "1 Station Road", "560023", 2500, 6),
        ("Airport Long Stay", "Terminal 2 Approach", "560300", 6000, 20),
    ];

    for (name, address, postal_code, price, spots) in lots {
        let mut tx = pool.begin().await?;

        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM parking_lots WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_some() {
            continue;
        }

        let lot_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO parking_lots (id, name, address, postal_code, price_per_hour, max_spots)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(lot_id)
        .bind(name)
        .bind(address)
        .bind(postal_code)
        .bind(price)
        .bind(spots)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO parking_spots (id, lot_id, spot_number, status)
            SELECT gen_random_uuid(), $1, n, 'available'
            FROM generate_series(1, $2) AS n
            "#,
        )
        .bind(lot_id)
        .bind(spots)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        println!("Seeded lot {name} with {spots} spots");
    }

    Ok(())
}
