pub mod admin;
pub mod auth;
pub mod checkout;
pub mod coverage;
pub mod pharmacy;
pub mod profile;
pub mod requests;

use sea_orm::{ActiveModelTrait, DatabaseConnection, NotSet, Set};
use uuid::Uuid;

use crate::entities::activity_log;
use crate::error::AppResult;

/// Append an entry to the user's activity log. Called on login, profile
/// mutations and order placement.
pub(crate) async fn log_activity(
    db: &DatabaseConnection,
    user_id: Uuid,
    action: &str,
) -> AppResult<()> {
    let entry = activity_log::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        action: Set(action.to_string()),
        ..Default::default()
    };
    entry.insert(db).await?;
    Ok(())
}
