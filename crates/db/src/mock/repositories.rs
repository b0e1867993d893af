use chrono::NaiveDate;
use mockall::mock;
use uuid::Uuid;

use shinebook_core::models::booking::{BookingStatus, PaymentStatus};

use crate::models::{DbBooking, DbCustomer, DbOrganization, DbService, NewBooking};
use crate::repositories::booking::{CreateBookingOutcome, PaymentUpdate};

// Mock repositories for testing
mock! {
    pub OrganizationRepo {
        pub async fn get_organization_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbOrganization>>;
    }
}

mock! {
    pub CustomerRepo {
        pub async fn get_customer_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbCustomer>>;
    }
}

mock! {
    pub ServiceRepo {
        pub async fn get_service_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbService>>;
    }
}

mock! {
    pub BookingRepo {
        pub async fn get_booking_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbBooking>>;

        pub async fn get_bookings_for_day(
            &self,
            organization_id: Uuid,
            date: NaiveDate,
        ) -> eyre::Result<Vec<DbBooking>>;

        pub async fn create_booking_checked(
            &self,
            new: NewBooking,
        ) -> eyre::Result<CreateBookingOutcome>;

        pub async fn update_booking_status(
            &self,
            id: Uuid,
            from: BookingStatus,
            to: BookingStatus,
        ) -> eyre::Result<Option<DbBooking>>;

        pub async fn apply_payment_update(
            &self,
            booking_id: Uuid,
            payment_status: PaymentStatus,
            transaction_id: Option<&'static str>,
        ) -> eyre::Result<PaymentUpdate>;
    }
}
