use sqlx::{Postgres, QueryBuilder};

use crate::application::repos::{GiftQueryFilter, GiftsRepo, RepoError};
use crate::domain::gifts::GiftRecord;

use super::{PostgresRepositories, escape_like, map_sqlx_error};

const GIFT_COLUMNS: &str = "id, name, category, condition, posted_by, zipcode, \
    date_added, age_days, age_years, description, image";

#[derive(Debug, sqlx::FromRow)]
struct GiftRow {
    id: String,
    name: String,
    category: String,
    condition: String,
    posted_by: String,
    zipcode: String,
    date_added: i64,
    age_days: i32,
    age_years: f64,
    description: String,
    image: String,
}

impl From<GiftRow> for GiftRecord {
    fn from(row: GiftRow) -> Self {
        GiftRecord {
            id: row.id,
            name: row.name,
            category: row.category,
            condition: row.condition,
            posted_by: row.posted_by,
            zipcode: row.zipcode,
            date_added: row.date_added,
            age_days: row.age_days,
            age_years: row.age_years,
            description: row.description,
            image: row.image,
        }
    }
}

impl PostgresRepositories {
    fn apply_gift_filter<'q>(qb: &mut QueryBuilder<'q, Postgres>, filter: &'q GiftQueryFilter) {
        if let Some(name) = filter.name.as_ref() {
            qb.push(" AND name ILIKE ");
            qb.push_bind(format!("%{}%", escape_like(name)));
            qb.push(" ESCAPE '\\'");
        }
        if let Some(category) = filter.category.as_ref() {
            qb.push(" AND category = ");
            qb.push_bind(category);
        }
        if let Some(condition) = filter.condition.as_ref() {
            qb.push(" AND condition = ");
            qb.push_bind(condition);
        }
        if let Some(max_age) = filter.max_age_years {
            qb.push(" AND age_years <= ");
            qb.push_bind(max_age);
        }
    }

    fn push_gift_values(qb: &mut QueryBuilder<'_, Postgres>, gift: &GiftRecord) {
        qb.push(" (");
        {
            let mut values = qb.separated(", ");
            values
                .push_bind(gift.id.clone())
                .push_bind(gift.name.clone())
                .push_bind(gift.category.clone())
                .push_bind(gift.condition.clone())
                .push_bind(gift.posted_by.clone())
                .push_bind(gift.zipcode.clone())
                .push_bind(gift.date_added)
                .push_bind(gift.age_days)
                .push_bind(gift.age_years)
                .push_bind(gift.description.clone())
                .push_bind(gift.image.clone());
        }
        qb.push(")");
    }
}

#[async_trait::async_trait]
impl GiftsRepo for PostgresRepositories {
    async fn list_gifts(&self) -> Result<Vec<GiftRecord>, RepoError> {
        let rows = sqlx::query_as::<_, GiftRow>(&format!(
            "SELECT {GIFT_COLUMNS} FROM gifts ORDER BY id"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(GiftRecord::from).collect())
    }

    async fn find_gift(&self, id: &str) -> Result<Option<GiftRecord>, RepoError> {
        let row = sqlx::query_as::<_, GiftRow>(&format!(
            "SELECT {GIFT_COLUMNS} FROM gifts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(GiftRecord::from))
    }

    async fn search_gifts(&self, filter: &GiftQueryFilter) -> Result<Vec<GiftRecord>, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(GIFT_COLUMNS);
        qb.push(" FROM gifts WHERE TRUE");
        Self::apply_gift_filter(&mut qb, filter);
        qb.push(" ORDER BY id");

        let rows = qb
            .build_query_as::<GiftRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(GiftRecord::from).collect())
    }

    async fn create_gift(&self, gift: GiftRecord) -> Result<GiftRecord, RepoError> {
        let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO gifts (");
        qb.push(GIFT_COLUMNS);
        qb.push(") VALUES");
        Self::push_gift_values(&mut qb, &gift);
        qb.push(" RETURNING ");
        qb.push(GIFT_COLUMNS);

        let row = qb
            .build_query_as::<GiftRow>()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn count_gifts(&self) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM gifts")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        count
            .try_into()
            .map_err(|_| RepoError::from_persistence("count exceeds supported range"))
    }

    async fn insert_gifts(&self, gifts: &[GiftRecord]) -> Result<u64, RepoError> {
        if gifts.is_empty() {
            return Ok(0);
        }

        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        let mut inserted = 0u64;

        // Bind parameters per statement are capped by Postgres.
        for chunk in gifts.chunks(500) {
            let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO gifts (");
            qb.push(GIFT_COLUMNS);
            qb.push(") VALUES");
            for (index, gift) in chunk.iter().enumerate() {
                if index > 0 {
                    qb.push(",");
                }
                Self::push_gift_values(&mut qb, gift);
            }

            let result = qb
                .build()
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
            inserted += result.rows_affected();
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(inserted)
    }
}
