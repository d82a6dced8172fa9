use crate::common::unit_of_work::UnitOfWork;
use async_trait::async_trait;
use sqlx::{Pool, Sqlite};

#[async_trait]
pub trait Context: Sync + Send {
    fn db(&self) -> &Pool<Sqlite>;

    /// Opens a transaction scoped to the returned value.
    /// Dropping it without calling [`UnitOfWork::commit`] rolls everything back.
    async fn unit_of_work(&self) -> sqlx::Result<UnitOfWork> {
        UnitOfWork::begin(self.db()).await
    }
}
