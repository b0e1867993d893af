use crate::models::DbOrganization;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_organization_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbOrganization>> {
    tracing::debug!("Getting organization by id: {}", id);

    let organization = sqlx::query_as::<_, DbOrganization>(
        r#"
        SELECT id, name, business_hours, booking_policy, created_at
        FROM organizations
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    if organization.is_none() {
        tracing::debug!("Organization not found: id={}", id);
    }

    Ok(organization)
}
