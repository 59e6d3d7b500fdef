//! Repository for the `scripts` table.

use deepdrama_core::scoring::grade;
use deepdrama_core::script_filter::{non_blank, ScriptFilter, ScriptListing, TabPreset};
use deepdrama_core::types::DbId;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::script::{CreateScript, RankedScript, Script, ScriptOptions, UpdateScript};
use crate::repositories::listing::{contains_pattern, push_order, push_page, Conditions};

/// Column list for `scripts` queries.
const COLUMNS: &str = "id, script_id, name, preview, file_url, tags, source_type, team, status, \
    genre, content_type, is_project, project_owner, project_name, remarks, submit_user, writer, \
    content_team, producer, producer_team, feishu_url, assign_status, submit_date, avg_score, \
    rating_count, created_at, updated_at";

/// Columns written by create and update, in bind order.
const WRITABLE: &str = "script_id, name, preview, file_url, tags, source_type, team, status, \
    genre, content_type, is_project, project_owner, project_name, remarks, submit_user, writer, \
    content_team, producer, producer_team, feishu_url, assign_status, submit_date";

/// Provides listing, CRUD and lookup operations for scripts.
pub struct ScriptRepo;

impl ScriptRepo {
    // -----------------------------------------------------------------------
    // Listing
    // -----------------------------------------------------------------------

    /// Fetch one page of scripts matching the listing.
    pub async fn list(pool: &PgPool, listing: &ScriptListing) -> Result<Vec<Script>, sqlx::Error> {
        let mut qb = Self::select_page(listing);
        qb.build_query_as::<Script>().fetch_all(pool).await
    }

    /// Count every script matching the listing's filter, ignoring paging.
    pub async fn count(pool: &PgPool, filter: &ScriptFilter) -> Result<i64, sqlx::Error> {
        let mut qb = Self::select_count(filter);
        qb.build_query_scalar::<i64>().fetch_one(pool).await
    }

    /// Top scripts by average score, with rank and grade attached.
    pub async fn rankings(
        pool: &PgPool,
        limit: Option<i64>,
    ) -> Result<Vec<RankedScript>, sqlx::Error> {
        let listing = ScriptListing::rankings(limit);
        let scripts = Self::list(pool, &listing).await?;
        Ok(scripts
            .into_iter()
            .zip(1..)
            .map(|(script, rank)| RankedScript {
                rank,
                grade: grade(script.avg_score),
                script,
            })
            .collect())
    }

    fn select_page(listing: &ScriptListing) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM scripts"));
        push_predicates(&mut qb, &listing.filter);
        push_order(&mut qb, listing.sort);
        push_page(&mut qb, listing.page);
        qb
    }

    fn select_count(filter: &ScriptFilter) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM scripts");
        push_predicates(&mut qb, filter);
        qb
    }

    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Find a script by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Script>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scripts WHERE id = $1");
        sqlx::query_as::<_, Script>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a script. A missing or blank `scriptId` is replaced by a code
    /// derived from the new row id (`SP` + id padded to three digits).
    pub async fn create(pool: &PgPool, input: &CreateScript) -> Result<Script, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let script_code = non_blank(input.script_id.as_deref());
        let insert_query = format!(
            "INSERT INTO scripts ({WRITABLE}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, COALESCE($11, false), $12, $13, \
                     $14, $15, $16, $17, $18, $19, $20, $21, $22) \
             RETURNING {COLUMNS}"
        );
        let script = sqlx::query_as::<_, Script>(&insert_query)
            .bind(&script_code)
            .bind(&input.name)
            .bind(&input.preview)
            .bind(&input.file_url)
            .bind(&input.tags)
            .bind(&input.source_type)
            .bind(&input.team)
            .bind(&input.status)
            .bind(&input.genre)
            .bind(&input.content_type)
            .bind(input.is_project)
            .bind(&input.project_owner)
            .bind(&input.project_name)
            .bind(&input.remarks)
            .bind(&input.submit_user)
            .bind(&input.writer)
            .bind(&input.content_team)
            .bind(&input.producer)
            .bind(&input.producer_team)
            .bind(&input.feishu_url)
            .bind(&input.assign_status)
            .bind(input.submit_date_or_today())
            .fetch_one(&mut *tx)
            .await?;

        let script = if script_code.is_none() {
            let code_query = format!(
                "UPDATE scripts \
                 SET script_id = 'SP' || LPAD(id::TEXT, GREATEST(LENGTH(id::TEXT), 3), '0') \
                 WHERE id = $1 \
                 RETURNING {COLUMNS}"
            );
            sqlx::query_as::<_, Script>(&code_query)
                .bind(script.id)
                .fetch_one(&mut *tx)
                .await?
        } else {
            script
        };

        tx.commit().await?;
        Ok(script)
    }

    /// Apply a partial update under a row lock.
    ///
    /// Returns `None` if no script with the given id exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateScript,
    ) -> Result<Option<Script>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let lock_query = format!("SELECT {COLUMNS} FROM scripts WHERE id = $1 FOR UPDATE");
        let Some(mut script) = sqlx::query_as::<_, Script>(&lock_query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        input.apply(&mut script);

        let update_query = format!(
            "UPDATE scripts SET \
                name = $2, preview = $3, file_url = $4, tags = $5, source_type = $6, \
                team = $7, status = $8, genre = $9, content_type = $10, is_project = $11, \
                project_owner = $12, project_name = $13, remarks = $14, submit_user = $15, \
                writer = $16, content_team = $17, producer = $18, producer_team = $19, \
                feishu_url = $20, assign_status = $21, submit_date = $22 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Script>(&update_query)
            .bind(id)
            .bind(&script.name)
            .bind(&script.preview)
            .bind(&script.file_url)
            .bind(&script.tags)
            .bind(&script.source_type)
            .bind(&script.team)
            .bind(&script.status)
            .bind(&script.genre)
            .bind(&script.content_type)
            .bind(script.is_project)
            .bind(&script.project_owner)
            .bind(&script.project_name)
            .bind(&script.remarks)
            .bind(&script.submit_user)
            .bind(&script.writer)
            .bind(&script.content_team)
            .bind(&script.producer)
            .bind(&script.producer_team)
            .bind(&script.feishu_url)
            .bind(&script.assign_status)
            .bind(script.submit_date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Delete a script and, through the foreign key, its ratings.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scripts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Options
    // -----------------------------------------------------------------------

    /// Distinct non-blank values of each filterable column.
    pub async fn options(pool: &PgPool) -> Result<ScriptOptions, sqlx::Error> {
        Ok(ScriptOptions {
            content_teams: Self::distinct_values(pool, "content_team").await?,
            writers: Self::distinct_values(pool, "writer").await?,
            producers: Self::distinct_values(pool, "producer").await?,
            teams: Self::distinct_values(pool, "team").await?,
            statuses: Self::distinct_values(pool, "status").await?,
            source_types: Self::distinct_values(pool, "source_type").await?,
            genres: Self::distinct_values(pool, "genre").await?,
        })
    }

    /// `column` must be one of the literals passed by [`Self::options`].
    async fn distinct_values(pool: &PgPool, column: &'static str) -> Result<Vec<String>, sqlx::Error> {
        let query = format!(
            "SELECT DISTINCT {column} FROM scripts \
             WHERE {column} IS NOT NULL AND TRIM({column}) <> '' \
             ORDER BY {column}"
        );
        sqlx::query_scalar::<_, String>(&query).fetch_all(pool).await
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Append every set predicate of `filter`. Used by both the page and the
/// count query.
fn push_predicates(qb: &mut QueryBuilder<'static, Postgres>, filter: &ScriptFilter) {
    let mut conditions = Conditions::default();

    if let Some(tab) = &filter.tab {
        push_tab(qb, &mut conditions, tab);
    }

    push_statuses(qb, &mut conditions, &filter.statuses);

    if let Some(keyword) = &filter.keyword {
        let pattern = contains_pattern(keyword);
        conditions.next(qb);
        qb.push("(name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" ESCAPE '\\' OR script_id ILIKE ");
        qb.push_bind(pattern);
        qb.push(" ESCAPE '\\')");
    }

    let equalities = [
        ("source_type", &filter.source_type),
        ("genre", &filter.genre),
        ("team", &filter.team),
        ("content_team", &filter.content_team),
        ("producer_team", &filter.producer_team),
        ("assign_status", &filter.assign_status),
    ];
    for (column, value) in equalities {
        if let Some(value) = value {
            push_eq(qb, &mut conditions, column, value);
        }
    }

    if let Some(unrated) = filter.unrated {
        push_unrated(qb, &mut conditions, unrated);
    }
    if let Some(is_project) = filter.is_project {
        conditions.next(qb);
        qb.push("is_project = ");
        qb.push_bind(is_project);
    }

    if let Some(from) = filter.submitted_from {
        conditions.next(qb);
        qb.push("submit_date >= ");
        qb.push_bind(from);
    }
    if let Some(to) = filter.submitted_to {
        conditions.next(qb);
        qb.push("submit_date <= ");
        qb.push_bind(to);
    }

    if let Some(min) = filter.min_score {
        conditions.next(qb);
        qb.push("avg_score >= ");
        qb.push_bind(min);
    }
    if let Some(max) = filter.max_score {
        conditions.next(qb);
        qb.push("avg_score <= ");
        qb.push_bind(max);
    }
}

fn push_tab(qb: &mut QueryBuilder<'static, Postgres>, conditions: &mut Conditions, tab: &TabPreset) {
    push_statuses(qb, conditions, &tab.statuses);
    if let Some(assign_status) = &tab.assign_status {
        push_eq(qb, conditions, "assign_status", assign_status);
    }
    if let Some(unrated) = tab.unrated {
        push_unrated(qb, conditions, unrated);
    }
    if let Some(is_project) = tab.is_project {
        conditions.next(qb);
        qb.push("is_project = ");
        qb.push_bind(is_project);
    }
}

fn push_statuses(
    qb: &mut QueryBuilder<'static, Postgres>,
    conditions: &mut Conditions,
    statuses: &[String],
) {
    if statuses.is_empty() {
        return;
    }
    conditions.next(qb);
    qb.push("status = ANY(");
    qb.push_bind(statuses.to_vec());
    qb.push(")");
}

fn push_unrated(qb: &mut QueryBuilder<'static, Postgres>, conditions: &mut Conditions, unrated: bool) {
    conditions.next(qb);
    qb.push(if unrated {
        "rating_count = 0"
    } else {
        "rating_count > 0"
    });
}

fn push_eq(
    qb: &mut QueryBuilder<'static, Postgres>,
    conditions: &mut Conditions,
    column: &'static str,
    value: &str,
) {
    conditions.next(qb);
    qb.push(column);
    qb.push(" = ");
    qb.push_bind(value.to_string());
}
