//! Read-only aggregates over scripts and ratings for the dashboard.

use chrono::NaiveDate;
use deepdrama_core::dashboard::{DistributionDimension, TrendPeriod};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::dashboard::{DistributionBucket, Kpi, TrendPoint};
use crate::repositories::listing::Conditions;

/// Provides dashboard aggregate queries.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Count scripts per value of `dimension`, optionally restricted to an
    /// inclusive submit-date window.
    ///
    /// Each bucket's `avg_score` is the mean over its rated scripts.
    pub async fn distribution(
        pool: &PgPool,
        dimension: DistributionDimension,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<DistributionBucket>, sqlx::Error> {
        let mut qb = Self::distribution_query(dimension, from, to);
        qb.build_query_as::<DistributionBucket>()
            .fetch_all(pool)
            .await
    }

    fn distribution_query(
        dimension: DistributionDimension,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> QueryBuilder<'static, Postgres> {
        let column = dimension.column();
        let mut qb = QueryBuilder::new(format!(
            "SELECT NULLIF(TRIM({column}), '') AS value, \
                    COUNT(*) AS count, \
                    COALESCE(ROUND(AVG(avg_score) FILTER (WHERE avg_score > 0), 2), 0) AS avg_score \
             FROM scripts"
        ));

        let mut conditions = Conditions::default();
        if let Some(from) = from {
            conditions.next(&mut qb);
            qb.push("submit_date >= ");
            qb.push_bind(from);
        }
        if let Some(to) = to {
            conditions.next(&mut qb);
            qb.push("submit_date <= ");
            qb.push_bind(to);
        }

        qb.push(" GROUP BY 1 ORDER BY count DESC, value ASC NULLS LAST");
        qb
    }

    /// Headline counters over all scripts.
    pub async fn kpi(pool: &PgPool) -> Result<Kpi, sqlx::Error> {
        sqlx::query_as::<_, Kpi>(
            "SELECT COUNT(*) AS total_submissions, \
                    COUNT(*) FILTER (WHERE is_project) AS project_count, \
                    COUNT(*) FILTER (WHERE rating_count > 0) AS rated_count, \
                    GREATEST(COUNT(*) - COUNT(*) FILTER (WHERE rating_count > 0), 0) AS pending_count, \
                    COALESCE(ROUND(AVG(avg_score) FILTER (WHERE avg_score > 0), 1), 0) AS avg_score \
             FROM scripts",
        )
        .fetch_one(pool)
        .await
    }

    /// Mean rating total per day, week or month, oldest bucket first.
    pub async fn score_trend(
        pool: &PgPool,
        period: TrendPeriod,
    ) -> Result<Vec<TrendPoint>, sqlx::Error> {
        let unit = period.trunc_unit();
        let query = format!(
            "SELECT date_trunc('{unit}', rating_date::TIMESTAMP)::DATE AS period, \
                    ROUND(AVG(total_score), 2) AS avg_score, \
                    COUNT(*) AS count \
             FROM ratings \
             WHERE total_score IS NOT NULL \
             GROUP BY 1 \
             ORDER BY 1"
        );
        sqlx::query_as::<_, TrendPoint>(&query).fetch_all(pool).await
    }
}
