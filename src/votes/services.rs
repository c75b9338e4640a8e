use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAction {
    Add,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Added,
    Removed,
}

/// Exactly 1 casts a vote; any non-positive value removes one. Values above 1
/// are rejected before the ledger runs.
pub(crate) fn classify_direction(dir: i16) -> Result<VoteAction, AppError> {
    if dir > 1 {
        return Err(AppError::Validation("dir must be at most 1".into()));
    }
    if dir == 1 {
        Ok(VoteAction::Add)
    } else {
        Ok(VoteAction::Remove)
    }
}

/// The vote toggle state machine. Per (user, post) the states are "no vote"
/// and "voted"; casting on "voted" and removing on "no vote" are conflicts.
/// Switching a vote is remove then re-add, never a single call.
///
/// The existence check, state read, and write commit or fail as one
/// transaction; the transaction rolls back on drop, so no error path leaves
/// partial state.
pub async fn apply_vote(
    db: &PgPool,
    user_id: Uuid,
    post_id: Uuid,
    dir: i16,
) -> Result<VoteOutcome, AppError> {
    let action = classify_direction(dir)?;

    let mut tx = db.begin().await?;

    let post_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM posts WHERE id = $1)")
            .bind(post_id)
            .fetch_one(&mut *tx)
            .await?;
    if !post_exists {
        return Err(AppError::Conflict(format!("post {post_id} does not exist")));
    }

    let has_voted = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM votes WHERE post_id = $1 AND user_id = $2)",
    )
    .bind(post_id)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    match action {
        VoteAction::Add => {
            if has_voted {
                return Err(AppError::Conflict(format!(
                    "user {user_id} has already voted on post {post_id}"
                )));
            }
            // The (post_id, user_id) primary key is the real arbiter under
            // concurrency: the losing insert of a race lands here and is
            // surfaced as the same duplicate-vote conflict, not retried.
            sqlx::query("INSERT INTO votes (post_id, user_id) VALUES ($1, $2)")
                .bind(post_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    if let sqlx::Error::Database(db_err) = &e {
                        if db_err.code().as_deref() == Some("23505") {
                            return AppError::Conflict(format!(
                                "user {user_id} has already voted on post {post_id}"
                            ));
                        }
                    }
                    AppError::from(e)
                })?;
            tx.commit().await?;
            info!(%post_id, %user_id, "vote added");
            Ok(VoteOutcome::Added)
        }
        VoteAction::Remove => {
            if !has_voted {
                return Err(AppError::Conflict(format!(
                    "vote on post {post_id} does not exist"
                )));
            }
            sqlx::query("DELETE FROM votes WHERE post_id = $1 AND user_id = $2")
                .bind(post_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            info!(%post_id, %user_id, "vote removed");
            Ok(VoteOutcome::Removed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_casts_a_vote() {
        assert_eq!(classify_direction(1).unwrap(), VoteAction::Add);
    }

    #[test]
    fn zero_and_negatives_remove() {
        assert_eq!(classify_direction(0).unwrap(), VoteAction::Remove);
        assert_eq!(classify_direction(-1).unwrap(), VoteAction::Remove);
        assert_eq!(classify_direction(i16::MIN).unwrap(), VoteAction::Remove);
    }

    #[test]
    fn values_above_one_are_rejected() {
        assert!(matches!(
            classify_direction(2),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            classify_direction(i16::MAX),
            Err(AppError::Validation(_))
        ));
    }
}
