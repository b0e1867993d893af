use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create organizations table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS organizations (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            business_hours JSONB NOT NULL,
            booking_policy JSONB NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create customers table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            phone VARCHAR(32) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            organization_id UUID NOT NULL REFERENCES organizations(id),
            name VARCHAR(255) NOT NULL,
            base_price_cents BIGINT NOT NULL,
            duration_minutes INTEGER NOT NULL,
            packages JSONB NOT NULL DEFAULT '[]',
            addons JSONB NOT NULL DEFAULT '[]',
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT positive_base_price CHECK (base_price_cents >= 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create bookings table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            organization_id UUID NOT NULL REFERENCES organizations(id),
            customer_id UUID NOT NULL REFERENCES customers(id),
            items JSONB NOT NULL,
            scheduled_at TIMESTAMP WITH TIME ZONE NOT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'pending',
            total_amount_cents BIGINT NOT NULL,
            deposit_amount_cents BIGINT NOT NULL,
            payment_status VARCHAR(32) NOT NULL DEFAULT 'unpaid',
            notes TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_status CHECK (
                status IN ('pending', 'confirmed', 'in_progress', 'completed', 'cancelled')
            ),
            CONSTRAINT valid_payment_status CHECK (
                payment_status IN ('unpaid', 'deposit_paid', 'paid', 'refunded')
            ),
            CONSTRAINT valid_amounts CHECK (
                total_amount_cents >= deposit_amount_cents AND deposit_amount_cents >= 0
            )
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create payment_events table; the primary key is what makes payment
    // application idempotent per provider transaction
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS payment_events (
            provider_transaction_id VARCHAR(255) PRIMARY KEY,
            booking_id UUID NOT NULL REFERENCES bookings(id),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes, one statement per call; the prepared-statement
    // protocol rejects batched statements
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_services_organization_id ON services(organization_id);")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_bookings_organization_id ON bookings(organization_id);")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_bookings_scheduled_at ON bookings(scheduled_at);")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_bookings_customer_id ON bookings(customer_id);")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_payment_events_booking_id ON payment_events(booking_id);")
        .execute(pool)
        .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
