use crate::entities::{
    novel_entity as novels, reading_record_entity as reading_records,
    user_profile_entity as profiles,
};
use crate::error::{AppError, AppResult};
use crate::models::{ReadingFilter, ReadingStatEntry, RecordReadingRequest};
use crate::services::aggregator::{self, ReadingRow};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use std::collections::HashMap;

/// "YYYY-MM", e.g. "2024-05".
fn validate_month(month: &str) -> AppResult<()> {
    let valid = chrono::NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").is_ok()
        && month.len() == 7;
    if valid {
        Ok(())
    } else {
        Err(AppError::ValidationError(format!(
            "Invalid month '{month}', expected YYYY-MM"
        )))
    }
}

#[derive(Clone)]
pub struct ReadingService {
    pool: DatabaseConnection,
}

impl ReadingService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// One month of reading time, grouped by user, novel or author and
    /// sorted by total descending.
    pub async fn monthly_stats(
        &self,
        month: &str,
        filter: ReadingFilter,
    ) -> AppResult<Vec<ReadingStatEntry>> {
        validate_month(month)?;

        let records = reading_records::Entity::find()
            .filter(reading_records::Column::Month.eq(month))
            .all(&self.pool)
            .await?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let novel_ids: Vec<i64> = records.iter().map(|r| r.novel_id).collect();
        let novel_rows = novels::Entity::find()
            .filter(novels::Column::Id.is_in(novel_ids))
            .all(&self.pool)
            .await?;
        let novels_by_id: HashMap<i64, &novels::Model> =
            novel_rows.iter().map(|n| (n.id, n)).collect();

        let mut profile_ids: Vec<i64> = records.iter().map(|r| r.user_id).collect();
        profile_ids.extend(novel_rows.iter().map(|n| n.user_id));
        let profile_rows = profiles::Entity::find()
            .filter(profiles::Column::UserId.is_in(profile_ids))
            .all(&self.pool)
            .await?;
        let profiles_by_user: HashMap<i64, &profiles::Model> =
            profile_rows.iter().map(|p| (p.user_id, p)).collect();

        let rows: Vec<ReadingRow> = records
            .iter()
            .filter_map(|r| {
                let novel = novels_by_id.get(&r.novel_id)?;
                let reader = profiles_by_user.get(&r.user_id);
                let author = profiles_by_user.get(&novel.user_id);
                Some(ReadingRow {
                    user_id: r.user_id,
                    user_name: reader.map(|p| p.user_name.clone()).unwrap_or_default(),
                    novel_id: novel.id,
                    novel_title: novel.title.clone(),
                    author_id: novel.user_id,
                    // 作者维度优先展示笔名
                    author_name: author
                        .map(|p| p.pen_name.clone().unwrap_or_else(|| p.user_name.clone()))
                        .unwrap_or_default(),
                    reading_time: r.reading_time,
                })
            })
            .collect();

        Ok(aggregator::aggregate_reading_time(&rows, filter))
    }

    /// Accumulate one reading session into the caller's (novel, month)
    /// bucket.
    pub async fn record_reading(
        &self,
        user_id: i64,
        req: RecordReadingRequest,
    ) -> AppResult<()> {
        if req.seconds <= 0 {
            return Err(AppError::ValidationError(
                "Reading seconds must be positive".to_string(),
            ));
        }
        novels::Entity::find_by_id(req.novel_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Novel not found".to_string()))?;

        let month = Utc::now().format("%Y-%m").to_string();
        let existing = reading_records::Entity::find()
            .filter(reading_records::Column::UserId.eq(user_id))
            .filter(reading_records::Column::NovelId.eq(req.novel_id))
            .filter(reading_records::Column::Month.eq(month.clone()))
            .one(&self.pool)
            .await?;

        match existing {
            Some(record) => {
                let total = record.reading_time + req.seconds;
                let mut am = record.into_active_model();
                am.reading_time = Set(total);
                am.updated_at = Set(Some(Utc::now()));
                am.update(&self.pool).await?;
            }
            None => {
                reading_records::ActiveModel {
                    user_id: Set(user_id),
                    novel_id: Set(req.novel_id),
                    month: Set(month),
                    reading_time: Set(req.seconds),
                    ..Default::default()
                }
                .insert(&self.pool)
                .await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_month() {
        assert!(validate_month("2024-05").is_ok());
        assert!(validate_month("2024-13").is_err());
        assert!(validate_month("2024-5").is_err());
        assert!(validate_month("garbage").is_err());
    }
}
