//! Profile service - onboarding, profile edits and goal previews

use crate::error::ApiError;
use crate::state::Stores;
use macrotrack_shared::{
    calculate_goal_profile, BiometricInput, BiometricPatch, GoalProfile, UpsertProfile, UserProfile,
};
use tracing::info;
use uuid::Uuid;

/// Profile service
pub struct ProfileService;

impl ProfileService {
    /// Run the calculator without persisting anything
    pub fn preview_goals(input: &BiometricInput) -> Result<GoalProfile, ApiError> {
        Ok(calculate_goal_profile(input)?)
    }

    /// Compute targets from submitted biometrics and store them
    ///
    /// Resubmitting overwrites the previous profile.
    pub async fn onboard(
        stores: &Stores,
        user_id: Uuid,
        email: Option<String>,
        input: BiometricInput,
    ) -> Result<UserProfile, ApiError> {
        let goals = calculate_goal_profile(&input)?;

        let profile = stores
            .profiles
            .upsert(UpsertProfile {
                user_id,
                email,
                biometrics: input,
                goals,
            })
            .await?;

        info!(
            %user_id,
            calorie_goal = profile.goals.daily_calorie_goal,
            "Profile onboarded"
        );
        Ok(profile)
    }

    /// Merge changed biometrics onto the stored ones and recompute every target
    pub async fn update_biometrics(
        stores: &Stores,
        user_id: Uuid,
        patch: BiometricPatch,
    ) -> Result<UserProfile, ApiError> {
        let current = Self::get_profile(stores, user_id).await?;
        let input = patch.apply_to(&current.biometrics);
        let goals = calculate_goal_profile(&input)?;

        let profile = stores
            .profiles
            .upsert(UpsertProfile {
                user_id,
                email: None,
                biometrics: input,
                goals,
            })
            .await?;

        info!(
            %user_id,
            previous_calorie_goal = current.goals.daily_calorie_goal,
            calorie_goal = profile.goals.daily_calorie_goal,
            "Profile biometrics updated"
        );
        Ok(profile)
    }

    pub async fn get_profile(stores: &Stores, user_id: Uuid) -> Result<UserProfile, ApiError> {
        stores
            .profiles
            .get(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use macrotrack_shared::{ActivityLevel, Goal, Sex};

    fn input() -> BiometricInput {
        BiometricInput {
            weight_kg: 70.0,
            height_cm: 175.0,
            age_years: 25,
            sex: Sex::Male,
            activity_level: ActivityLevel::Moderate,
            goal: Goal::Maintain,
        }
    }

    #[tokio::test]
    async fn test_onboard_then_edit_recomputes() {
        let stores = Stores::memory(MemoryStore::new());
        let user_id = Uuid::new_v4();

        let profile = ProfileService::onboard(&stores, user_id, Some("ana@example.com".into()), input())
            .await
            .unwrap();
        assert_eq!(profile.goals.daily_calorie_goal, 2594);

        let patch = BiometricPatch {
            goal: Some(Goal::LoseWeight),
            ..Default::default()
        };
        let updated = ProfileService::update_biometrics(&stores, user_id, patch)
            .await
            .unwrap();
        assert_eq!(updated.goals.daily_calorie_goal, 2205);
        assert_eq!(updated.goals.daily_fats_goal, 74);
        assert_eq!(updated.email.as_deref(), Some("ana@example.com"));
        assert_eq!(updated.created_at, profile.created_at);
    }

    #[tokio::test]
    async fn test_invalid_input_is_not_stored() {
        let stores = Stores::memory(MemoryStore::new());
        let user_id = Uuid::new_v4();
        let mut bad = input();
        bad.height_cm = 0.0;

        let err = ProfileService::onboard(&stores, user_id, None, bad).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
        assert!(matches!(
            ProfileService::get_profile(&stores, user_id).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_edit_requires_existing_profile() {
        let stores = Stores::memory(MemoryStore::new());
        let err = ProfileService::update_biometrics(&stores, Uuid::new_v4(), BiometricPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_preview_does_not_need_a_store() {
        let goals = ProfileService::preview_goals(&input()).unwrap();
        assert_eq!(goals.daily_protein_goal, 195);
    }
}
