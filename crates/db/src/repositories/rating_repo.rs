//! Repository for the `ratings` table.
//!
//! Every write also refreshes the owning script's `avg_score` and
//! `rating_count` inside the same transaction.

use deepdrama_core::rating_filter::{RatingFilter, RatingListing};
use deepdrama_core::types::DbId;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use crate::models::rating::{CreateRating, Rating, UpdateRating};
use crate::repositories::listing::{push_order, push_page, Conditions};

/// Column list for rating queries, qualified with the `r` alias and joined
/// with the script name.
const COLUMNS: &str = "r.id, r.script_id, s.name AS script_name, r.user_id, r.user_name, \
    r.user_role, r.content_score, r.market_score, r.compliance_score, r.commercial_score, \
    r.total_score, r.comments, r.rating_date, r.is_locked, r.created_at, r.updated_at";

const FROM: &str = "ratings r LEFT JOIN scripts s ON s.id = r.script_id";

/// Result of a write against an existing rating.
#[derive(Debug)]
pub enum RatingWrite<T> {
    Applied(T),
    NotFound,
    Locked,
}

/// Provides listing and aggregate-maintaining CRUD for ratings.
pub struct RatingRepo;

impl RatingRepo {
    /// Fetch one page of ratings matching the listing.
    pub async fn list(pool: &PgPool, listing: &RatingListing) -> Result<Vec<Rating>, sqlx::Error> {
        let mut qb = Self::select_page(listing);
        qb.build_query_as::<Rating>().fetch_all(pool).await
    }

    /// Count every rating matching the filter, ignoring paging.
    pub async fn count(pool: &PgPool, filter: &RatingFilter) -> Result<i64, sqlx::Error> {
        let mut qb = Self::select_count(filter);
        qb.build_query_scalar::<i64>().fetch_one(pool).await
    }

    /// All ratings of one script, newest first.
    pub async fn list_by_script(pool: &PgPool, script_id: DbId) -> Result<Vec<Rating>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} \
             WHERE r.script_id = $1 \
             ORDER BY r.rating_date DESC, r.id ASC"
        );
        sqlx::query_as::<_, Rating>(&query)
            .bind(script_id)
            .fetch_all(pool)
            .await
    }

    fn select_page(listing: &RatingListing) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM {FROM}"));
        push_predicates(&mut qb, &listing.filter);
        push_order(&mut qb, listing.sort);
        push_page(&mut qb, listing.page);
        qb
    }

    fn select_count(filter: &RatingFilter) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM ratings r");
        push_predicates(&mut qb, filter);
        qb
    }

    /// Find a rating by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Rating>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE r.id = $1");
        sqlx::query_as::<_, Rating>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Record a rating. Returns `None` if the script does not exist.
    ///
    /// Scores must already be validated; the total is derived here.
    pub async fn create(pool: &PgPool, input: &CreateRating) -> Result<Option<Rating>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let script_exists: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM scripts WHERE id = $1 FOR UPDATE")
                .bind(input.script_id)
                .fetch_optional(&mut *tx)
                .await?;
        if script_exists.is_none() {
            return Ok(None);
        }

        let scores = input.scores();
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO ratings \
                (script_id, user_id, user_name, user_role, content_score, market_score, \
                 compliance_score, commercial_score, total_score, comments, rating_date, is_locked) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, COALESCE($12, false)) \
             RETURNING id",
        )
        .bind(input.script_id)
        .bind(input.user_id)
        .bind(&input.user_name)
        .bind(input.user_role_or_default())
        .bind(scores.content)
        .bind(scores.market)
        .bind(scores.compliance)
        .bind(scores.commercial)
        .bind(scores.total())
        .bind(&input.comments)
        .bind(input.rating_date_or_today())
        .bind(input.is_locked)
        .fetch_one(&mut *tx)
        .await?;

        Self::refresh_script_aggregates(&mut tx, input.script_id).await?;
        let rating = Self::fetch_in_tx(&mut tx, id).await?;

        tx.commit().await?;
        Ok(Some(rating))
    }

    /// Apply a partial update to an unlocked rating.
    ///
    /// Scores carried by the patch must already be validated; stored scores
    /// are in range, so the merged rating is too.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRating,
    ) -> Result<RatingWrite<Rating>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(mut rating) = Self::lock_in_tx(&mut tx, id).await? else {
            return Ok(RatingWrite::NotFound);
        };
        if rating.is_locked {
            return Ok(RatingWrite::Locked);
        }

        input.apply(&mut rating);

        sqlx::query(
            "UPDATE ratings SET \
                user_name = $2, user_role = $3, content_score = $4, market_score = $5, \
                compliance_score = $6, commercial_score = $7, total_score = $8, comments = $9, \
                rating_date = $10, is_locked = $11 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&rating.user_name)
        .bind(&rating.user_role)
        .bind(rating.content_score)
        .bind(rating.market_score)
        .bind(rating.compliance_score)
        .bind(rating.commercial_score)
        .bind(rating.total_score)
        .bind(&rating.comments)
        .bind(rating.rating_date)
        .bind(rating.is_locked)
        .execute(&mut *tx)
        .await?;

        Self::refresh_script_aggregates(&mut tx, rating.script_id).await?;
        let updated = Self::fetch_in_tx(&mut tx, id).await?;

        tx.commit().await?;
        Ok(RatingWrite::Applied(updated))
    }

    /// Delete an unlocked rating.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<RatingWrite<()>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(rating) = Self::lock_in_tx(&mut tx, id).await? else {
            return Ok(RatingWrite::NotFound);
        };
        if rating.is_locked {
            return Ok(RatingWrite::Locked);
        }

        sqlx::query("DELETE FROM ratings WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::refresh_script_aggregates(&mut tx, rating.script_id).await?;

        tx.commit().await?;
        Ok(RatingWrite::Applied(()))
    }

    // -----------------------------------------------------------------------
    // Transaction helpers
    // -----------------------------------------------------------------------

    async fn lock_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<Rating>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE r.id = $1 FOR UPDATE OF r");
        sqlx::query_as::<_, Rating>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    async fn fetch_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Rating, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE r.id = $1");
        sqlx::query_as::<_, Rating>(&query)
            .bind(id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Recompute `avg_score` (mean of non-null totals, 2 dp, 0 when none)
    /// and `rating_count` (number of non-null totals) for one script.
    async fn refresh_script_aggregates(
        tx: &mut Transaction<'_, Postgres>,
        script_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE scripts SET \
                avg_score = agg.avg_score, \
                rating_count = agg.rating_count \
             FROM ( \
                SELECT COALESCE(ROUND(AVG(total_score), 2), 0) AS avg_score, \
                       COUNT(total_score)::INTEGER AS rating_count \
                FROM ratings WHERE script_id = $1 \
             ) agg \
             WHERE scripts.id = $1",
        )
        .bind(script_id)
        .execute(&mut **tx)
        .await?;
        tracing::debug!(script_id, "Refreshed script rating aggregates");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

fn push_predicates(qb: &mut QueryBuilder<'static, Postgres>, filter: &RatingFilter) {
    let mut conditions = Conditions::default();

    if let Some(script_id) = filter.script_id {
        conditions.next(qb);
        qb.push("r.script_id = ");
        qb.push_bind(script_id);
    }
    if let Some(user_id) = filter.user_id {
        conditions.next(qb);
        qb.push("r.user_id = ");
        qb.push_bind(user_id);
    }
    if let Some(role) = &filter.user_role {
        conditions.next(qb);
        qb.push("r.user_role = ");
        qb.push_bind(role.clone());
    }
    if let Some(from) = filter.rated_from {
        conditions.next(qb);
        qb.push("r.rating_date >= ");
        qb.push_bind(from);
    }
    if let Some(to) = filter.rated_to {
        conditions.next(qb);
        qb.push("r.rating_date <= ");
        qb.push_bind(to);
    }
    if let Some(min) = filter.min_score {
        conditions.next(qb);
        qb.push("r.total_score >= ");
        qb.push_bind(min);
    }
    if let Some(max) = filter.max_score {
        conditions.next(qb);
        qb.push("r.total_score <= ");
        qb.push_bind(max);
    }
}
