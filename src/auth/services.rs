use tracing::{info, warn};

use crate::{
    auth::password::{hash_password, verify_password},
    config::HashConfig,
    error::ApiError,
    users::{
        repo::UserRepo,
        repo_types::{NewUser, UserDetail},
    },
};

/// Hashes the password off the async workers and stores the new user.
pub async fn register(
    users: &dyn UserRepo,
    hashing: &HashConfig,
    user: &NewUser,
    password: &str,
) -> Result<UserDetail, ApiError> {
    let (plain, cost) = (password.to_owned(), hashing.clone());
    let hash = tokio::task::spawn_blocking(move || hash_password(&plain, &cost))
        .await
        .map_err(anyhow::Error::from)??;
    let created = users.register(user, &hash).await?;
    info!(username = %created.username, "user registered");
    Ok(created)
}

/// Is this username/password pair valid? An unknown username is simply `false`.
pub async fn authenticate(
    users: &dyn UserRepo,
    username: &str,
    password: &str,
) -> Result<bool, ApiError> {
    let Some(hash) = users.password_hash(username).await? else {
        warn!(%username, "login unknown username");
        return Ok(false);
    };
    let plain = password.to_owned();
    let ok = tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .map_err(anyhow::Error::from)??;
    if !ok {
        warn!(%username, "login invalid password");
    }
    Ok(ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::password::cheap_config, testing::MemoryUserRepo};

    fn jane() -> NewUser {
        NewUser {
            username: "janeDoe".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            phone: "7773339898".into(),
        }
    }

    #[tokio::test]
    async fn registered_password_is_stored_hashed() {
        let repo = MemoryUserRepo::default();
        register(&repo, &cheap_config(), &jane(), "password")
            .await
            .unwrap();

        let stored = repo.password_hash("janeDoe").await.unwrap().unwrap();
        assert_ne!(stored, "password");
        assert!(authenticate(&repo, "janeDoe", "password").await.unwrap());
        assert!(!authenticate(&repo, "janeDoe", "wrongpass").await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_logins_hash_on_blocking_threads() {
        let repo = MemoryUserRepo::default();
        register(&repo, &cheap_config(), &jane(), "password")
            .await
            .unwrap();
        let (good, bad) = tokio::join!(
            authenticate(&repo, "janeDoe", "password"),
            authenticate(&repo, "janeDoe", "nope"),
        );
        assert!(good.unwrap());
        assert!(!bad.unwrap());
    }

    #[tokio::test]
    async fn unknown_user_does_not_authenticate() {
        let repo = MemoryUserRepo::default();
        assert!(!authenticate(&repo, "ghost", "password").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let repo = MemoryUserRepo::default();
        register(&repo, &cheap_config(), &jane(), "pw").await.unwrap();
        let err = register(&repo, &cheap_config(), &jane(), "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }
}
