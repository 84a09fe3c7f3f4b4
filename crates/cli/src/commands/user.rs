//! Account management commands.

use corner_shop_storefront::db::Store;
use corner_shop_storefront::services::AuthService;

use super::{CommandError, connect};

/// Create an account with the same rules as the signup form.
///
/// # Errors
///
/// Returns an error if validation fails, the username is taken, or the
/// database is unreachable.
pub async fn create(
    username: &str,
    password: &str,
    email: Option<&str>,
) -> Result<(), CommandError> {
    let store = Store::postgres(connect().await?);

    let user = AuthService::new(&store)
        .register(username, email, password)
        .await?;

    tracing::info!(user_id = %user.id, "Created account {}", user.username);
    Ok(())
}
