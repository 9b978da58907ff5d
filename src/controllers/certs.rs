use std::fmt::Display;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{controllers, db, AppState};

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub enum CertStatus {
    Created,
    NotCreated,
}

impl From<String> for CertStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "CREATED" => Self::Created,
            "NOT_CREATED" => Self::NotCreated,
            _ => Self::NotCreated,
        }
    }
}

impl Display for CertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "CREATED"),
            Self::NotCreated => write!(f, "NOT_CREATED"),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CertInfo {
    pub id: i32,
    pub course_id: i32,
    pub course_title: String,
    pub status: CertStatus,
}

// Certificate rows are derived lazily: every completed course gets one on
// first listing. INSERT IGNORE keeps re-listing harmless.
pub async fn get_certs(state: &AppState, user_id: u32) -> anyhow::Result<Vec<CertInfo>> {
    let completed = controllers::progress::get_completed_courses(state, user_id).await?;
    let course_ids: Vec<i32> = completed.iter().map(|c| c.course.id).collect();
    db::certdb::add_certs(state, user_id, course_ids).await?;

    let certs = db::certdb::get_certs(state, user_id).await?;
    Ok(certs)
}
