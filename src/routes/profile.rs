use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    dto::profile_dto::{
        CreateProfilePayload, CreateProfileResponse, ProfileListResponse, PublicProfile,
        SearchProfilesPayload, SearchProfilesResponse, SearchResultItem,
    },
    error::Result,
    AppState,
};

#[axum::debug_handler]
pub async fn create_profile(
    State(state): State<AppState>,
    Json(payload): Json<CreateProfilePayload>,
) -> Result<impl IntoResponse> {
    let new_profile = payload.into_new_profile()?;
    let profile = state.profile_service.create(new_profile).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateProfileResponse {
            success: true,
            profile: PublicProfile::from(profile),
        }),
    ))
}

#[axum::debug_handler]
pub async fn search_profiles(
    State(state): State<AppState>,
    Json(payload): Json<SearchProfilesPayload>,
) -> Result<impl IntoResponse> {
    let filters = payload.into_filters()?;
    let outcome = state.profile_service.search_detailed(&filters).await?;
    let results: Vec<SearchResultItem> = outcome.results.into_iter().map(Into::into).collect();
    Ok(Json(SearchProfilesResponse {
        success: true,
        count: results.len(),
        results,
    }))
}

/// Administrative listing; mounted behind the admin-key guard.
#[axum::debug_handler]
pub async fn list_profiles(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let profiles = state.profile_service.list().await?;
    Ok(Json(ProfileListResponse {
        success: true,
        count: profiles.len(),
        profiles,
    }))
}
