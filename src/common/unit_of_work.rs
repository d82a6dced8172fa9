use sqlx::{Pool, Sqlite, SqliteConnection, Transaction};

pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    pub async fn begin(db: &Pool<Sqlite>) -> sqlx::Result<Self> {
        let tx = db.begin().await?;
        Ok(Self { tx })
    }

    /// Connection every statement of this unit must run on.
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut *self.tx
    }

    pub async fn commit(self) -> sqlx::Result<()> {
        self.tx.commit().await
    }
}

#[cfg(test)]
mod tests {
    use super::UnitOfWork;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::{Pool, Sqlite};

    async fn pool() -> Pool<Sqlite> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("connect sqlite");
        sqlx::query("CREATE TABLE items (id INTEGER PRIMARY KEY, name TEXT NOT NULL)")
            .execute(&pool)
            .await
            .expect("create items");
        pool
    }

    async fn count(pool: &Pool<Sqlite>) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(pool)
            .await
            .expect("count items")
    }

    #[tokio::test]
    async fn committed_work_is_persisted() {
        let pool = pool().await;
        let mut uow = UnitOfWork::begin(&pool).await.unwrap();
        sqlx::query("INSERT INTO items (name) VALUES ('a')")
            .execute(uow.conn())
            .await
            .unwrap();
        uow.commit().await.unwrap();

        assert_eq!(count(&pool).await, 1);
    }

    #[tokio::test]
    async fn dropped_work_is_rolled_back() {
        let pool = pool().await;
        {
            let mut uow = UnitOfWork::begin(&pool).await.unwrap();
            sqlx::query("INSERT INTO items (name) VALUES ('a')")
                .execute(uow.conn())
                .await
                .unwrap();
        }

        assert_eq!(count(&pool).await, 0);
    }
}
