use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::clients::membership::MemberProfile;
use crate::common::token::AuthHeader;
use crate::{clients, controllers, AppState};

#[derive(Serialize, Deserialize, ToSchema)]
pub struct UserStats {
    pub courses_total: i64,
    pub courses_enrolled: i64,
    pub courses_completed: i64,
}

#[derive(Serialize, ToSchema)]
pub struct UserInfoFull {
    pub username: String,
    pub email: String,
    pub stats: UserStats,
}

pub async fn get_user_stats(state: &AppState, user_id: u32) -> anyhow::Result<UserStats> {
    let joined = controllers::progress::get_user_courses_with_progress(state, user_id).await?;
    let completed = joined.iter().filter(|c| c.is_completed).count() as i64;
    let enrolled = joined
        .iter()
        .filter(|c| c.progress > 0.0 && !c.is_completed)
        .count() as i64;

    Ok(UserStats {
        courses_total: joined.len() as i64,
        courses_enrolled: enrolled,
        courses_completed: completed,
    })
}

// Profile comes from the membership service under the caller's own token;
// the stats are ours.
pub async fn get_user_info_full(
    state: &AppState,
    auth: &AuthHeader,
) -> anyhow::Result<UserInfoFull> {
    let profile: MemberProfile =
        clients::membership::get_member_profile(&state.http, &auth.token).await?;
    let stats = get_user_stats(state, auth.claims.id).await?;

    Ok(UserInfoFull {
        username: profile.username,
        email: profile.email,
        stats,
    })
}
