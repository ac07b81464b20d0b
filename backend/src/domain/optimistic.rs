//! Optimistic mutation helper.
//!
//! Every transition trigger follows the same shape: apply the change to the
//! locally held record, attempt the remote write, and restore the previous
//! value if the write fails. Centralising the pattern keeps rollback from
//! being re-implemented (or forgotten) at each call site.

use std::future::Future;

/// Apply `apply` to `target`, then run `commit` with the updated value.
///
/// On commit failure the target is restored to its pre-mutation state and the
/// error is passed through, so the caller always observes either the fully
/// applied or the fully rolled back record.
///
/// # Examples
/// ```rust,ignore
/// let mut vehicle = repo.find_by_id(id).await?.ok_or_else(missing)?;
/// commit_optimistically(
///     &mut vehicle,
///     |v| v.status = next.status,
///     |updated| repo.update_status(updated),
/// )
/// .await?;
/// ```
pub async fn commit_optimistically<T, E, Fut>(
    target: &mut T,
    apply: impl FnOnce(&mut T),
    commit: impl FnOnce(T) -> Fut,
) -> Result<(), E>
where
    T: Clone,
    Fut: Future<Output = Result<(), E>>,
{
    let snapshot = target.clone();
    apply(target);
    match commit(target.clone()).await {
        Ok(()) => Ok(()),
        Err(err) => {
            *target = snapshot;
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Record {
        status: &'static str,
    }

    #[tokio::test]
    async fn keeps_the_change_when_commit_succeeds() {
        let mut record = Record { status: "assigned" };
        let result: Result<(), ()> = commit_optimistically(
            &mut record,
            |r| r.status = "done",
            |updated| async move {
                assert_eq!(updated.status, "done");
                Ok(())
            },
        )
        .await;
        assert!(result.is_ok());
        assert_eq!(record.status, "done");
    }

    #[tokio::test]
    async fn rolls_back_when_commit_fails() {
        let mut record = Record { status: "assigned" };
        let result: Result<(), &str> = commit_optimistically(
            &mut record,
            |r| r.status = "done",
            |_| async { Err("write rejected") },
        )
        .await;
        assert_eq!(result, Err("write rejected"));
        assert_eq!(record.status, "assigned");
    }
}
