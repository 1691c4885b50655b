use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::vehicle::Vehicle;
use crate::services::booking_wizard::VehicleDetails;
use crate::utils::errors::AppError;

/// Vehicles have no endpoints of their own; bookings write them.
pub struct VehicleRepository;

impl VehicleRepository {
    /// Insert the vehicle, or refresh its details if the number is known
    pub async fn upsert<'e, E: PgExecutor<'e>>(
        executor: E,
        details: &VehicleDetails,
        owner_name: &str,
        owner_phone: &str,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, vehicle_number, make, model, year, owner_name, owner_phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (vehicle_number) DO UPDATE
            SET make = EXCLUDED.make,
                model = EXCLUDED.model,
                year = EXCLUDED.year,
                owner_name = EXCLUDED.owner_name,
                owner_phone = EXCLUDED.owner_phone,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&details.number)
        .bind(&details.make)
        .bind(&details.model)
        .bind(details.year)
        .bind(owner_name)
        .bind(owner_phone)
        .fetch_one(executor)
        .await?;

        Ok(vehicle)
    }
}
