pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_pharmacies;
mod m20250301_000003_create_coverage;
mod m20250301_000004_create_checkout_drafts;
mod m20250301_000005_create_orders;
mod m20250301_000006_create_otp_and_activity;
mod m20250301_000007_create_request_forms;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_pharmacies::Migration),
            Box::new(m20250301_000003_create_coverage::Migration),
            Box::new(m20250301_000004_create_checkout_drafts::Migration),
            Box::new(m20250301_000005_create_orders::Migration),
            Box::new(m20250301_000006_create_otp_and_activity::Migration),
            Box::new(m20250301_000007_create_request_forms::Migration),
        ]
    }
}
