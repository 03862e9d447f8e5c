use std::path::Path;

use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        profile::{
            EmployerProfileUpdate, ProfileImageResponse, ProfileResponse,
            UpdateEmployerProfileRequest, UpdateStudentProfileRequest,
        },
        token::Claims,
        user::Role,
    },
    errors::AppError,
    repositories::profile::ProfileRepository,
    storage::media::{MediaKind, MediaStorage},
    utils::phone::{normalize_ph_phone, INVALID_PHONE_MESSAGE},
};

pub struct ProfileHandler<P, M>
where
    P: ProfileRepository,
    M: MediaStorage,
{
    pub profile_repo: P,
    pub media: M,
}

impl<P, M> ProfileHandler<P, M>
where
    P: ProfileRepository,
    M: MediaStorage,
{
    pub fn new(profile_repo: P, media: M) -> Self {
        ProfileHandler { profile_repo, media }
    }

    /// The caller's role profile, created empty on first access.
    pub async fn get_profile(&self, claims: &Claims) -> Result<ProfileResponse, AppError> {
        let user_id = claims.user_id()?;
        match claims.role {
            Role::Student => {
                let profile = self.profile_repo.get_or_create_student_profile(&user_id).await?;
                Ok(ProfileResponse::student(claims.email.clone(), profile))
            }
            Role::Employer => {
                let profile = self.profile_repo.get_or_create_employer_profile(&user_id).await?;
                Ok(ProfileResponse::employer(claims.email.clone(), profile))
            }
        }
    }

    pub async fn update_student_profile(
        &self,
        claims: &Claims,
        request: UpdateStudentProfileRequest,
    ) -> Result<ProfileResponse, AppError> {
        let request = request.trimmed();
        request.validate()?;

        let user_id = claims.user_id()?;
        let profile = self.profile_repo.update_student_profile(&user_id, &request).await?;

        tracing::info!(user_id = %user_id, "Student profile updated");
        Ok(ProfileResponse::student(claims.email.clone(), profile))
    }

    pub async fn update_employer_profile(
        &self,
        claims: &Claims,
        request: UpdateEmployerProfileRequest,
    ) -> Result<ProfileResponse, AppError> {
        let request = request.trimmed();
        request.validate()?;

        let phone = normalize_ph_phone(&request.phone)
            .ok_or_else(|| AppError::field("phone", INVALID_PHONE_MESSAGE))?;

        let update = EmployerProfileUpdate {
            first_name: request.first_name,
            last_name: request.last_name,
            company_name: request.company_name,
            phone,
            company_address: request.company_address,
            industry: request.industry,
            company_size: request.company_size,
            description: request.description,
        };

        let user_id = claims.user_id()?;
        let profile = self.profile_repo.update_employer_profile(&user_id, &update).await?;

        tracing::info!(user_id = %user_id, "Employer profile updated");
        Ok(ProfileResponse::employer(claims.email.clone(), profile))
    }

    /// Stores a new profile picture (students) or company logo (employers) and
    /// drops the file it replaces.
    pub async fn upload_profile_image(
        &self,
        claims: &Claims,
        source: &Path,
    ) -> Result<ProfileImageResponse, AppError> {
        let user_id = claims.user_id()?;
        let kind = match claims.role {
            Role::Student => MediaKind::ProfileImage,
            Role::Employer => MediaKind::CompanyLogo,
        };

        let path = self.media.store(kind, source).await?;

        let previous = match self.attach_image(claims.role, &user_id, &path).await {
            Ok(previous) => previous,
            Err(e) => {
                if let Err(cleanup) = self.media.remove(&path).await {
                    tracing::warn!(path = %path, "Failed to remove orphaned image: {}", cleanup);
                }
                return Err(e);
            }
        };

        if let Some(old) = previous.filter(|old| !old.is_empty() && *old != path) {
            if let Err(e) = self.media.remove(&old).await {
                tracing::warn!(path = %old, "Failed to remove replaced image: {}", e);
            }
        }

        Ok(ProfileImageResponse {
            role: claims.role,
            path,
            message: "Image uploaded successfully".to_string(),
        })
    }

    /// Points the role profile at `path`. Returns the path it replaced.
    async fn attach_image(&self, role: Role, user_id: &Uuid, path: &str) -> Result<Option<String>, AppError> {
        match role {
            Role::Student => {
                self.profile_repo.get_or_create_student_profile(user_id).await?;
                self.profile_repo.set_student_image(user_id, path).await
            }
            Role::Employer => {
                self.profile_repo.get_or_create_employer_profile(user_id).await?;
                self.profile_repo.set_employer_logo(user_id, path).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    use crate::entities::profile::{CompanySize, EmployerProfile, ProfileDetails, StudentProfile};
    use crate::entities::token::TokenType;
    use crate::repositories::profile::MockProfileRepository;
    use crate::storage::media::MockMediaStorage;

    fn claims(role: Role) -> Claims {
        Claims {
            sub: Uuid::new_v4().to_string(),
            email: "user@example.com".into(),
            role,
            token_type: TokenType::Access,
            exp: usize::MAX,
            iat: 0,
        }
    }

    fn employer_request(phone: &str) -> UpdateEmployerProfileRequest {
        UpdateEmployerProfileRequest {
            first_name: String::new(),
            last_name: String::new(),
            company_name: " Acme ".into(),
            phone: phone.into(),
            company_address: "Malolos, Bulacan".into(),
            industry: "IT".into(),
            company_size: CompanySize::Small,
            description: "We build things".into(),
        }
    }

    #[tokio::test]
    async fn student_profile_is_fetched_for_students() {
        let caller = claims(Role::Student);
        let user_id = caller.user_id().unwrap();

        let mut repo = MockProfileRepository::new();
        repo.expect_get_or_create_student_profile()
            .with(eq(user_id))
            .returning(|id| Ok(StudentProfile { user_id: *id, ..Default::default() }));
        repo.expect_get_or_create_employer_profile().never();

        let handler = ProfileHandler::new(repo, MockMediaStorage::new());
        let response = handler.get_profile(&caller).await.unwrap();

        assert_eq!(response.role, Role::Student);
        assert!(!response.complete);
        assert!(matches!(response.profile, ProfileDetails::Student(_)));
    }

    #[tokio::test]
    async fn employer_phone_is_normalized_before_saving() {
        let mut repo = MockProfileRepository::new();
        repo.expect_update_employer_profile()
            .withf(|_, update| update.phone == "+63 912 345 6789" && update.company_name == "Acme")
            .returning(|id, update| {
                Ok(EmployerProfile {
                    user_id: *id,
                    company_name: update.company_name.clone(),
                    phone: update.phone.clone(),
                    ..Default::default()
                })
            });

        let handler = ProfileHandler::new(repo, MockMediaStorage::new());
        let response = handler
            .update_employer_profile(&claims(Role::Employer), employer_request("0912-345-6789"))
            .await
            .unwrap();

        assert_eq!(response.role, Role::Employer);
    }

    #[tokio::test]
    async fn invalid_employer_phone_is_a_field_error() {
        let mut repo = MockProfileRepository::new();
        repo.expect_update_employer_profile().never();

        let handler = ProfileHandler::new(repo, MockMediaStorage::new());
        let err = handler
            .update_employer_profile(&claims(Role::Employer), employer_request("12345"))
            .await
            .unwrap_err();

        match err {
            AppError::ValidationError(fields) => {
                assert_eq!(fields[0].field, "phone");
                assert_eq!(fields[0].message, INVALID_PHONE_MESSAGE);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn employer_upload_becomes_the_logo_and_replaces_the_old_one() {
        let mut media = MockMediaStorage::new();
        media.expect_store()
            .withf(|kind, _| *kind == MediaKind::CompanyLogo)
            .returning(|_, _| Ok("company_logos/new.png".into()));
        media.expect_remove()
            .with(eq("company_logos/old.png"))
            .times(1)
            .returning(|_| Ok(()));

        let mut repo = MockProfileRepository::new();
        repo.expect_get_or_create_employer_profile()
            .returning(|id| Ok(EmployerProfile { user_id: *id, ..Default::default() }));
        repo.expect_set_employer_logo()
            .withf(|_, path| path == "company_logos/new.png")
            .returning(|_, _| Ok(Some("company_logos/old.png".into())));
        repo.expect_set_student_image().never();

        let handler = ProfileHandler::new(repo, media);
        let response = handler
            .upload_profile_image(&claims(Role::Employer), Path::new("/tmp/upload"))
            .await
            .unwrap();

        assert_eq!(response.path, "company_logos/new.png");
    }

    #[tokio::test]
    async fn stored_image_is_removed_when_the_profile_update_fails() {
        let mut media = MockMediaStorage::new();
        media.expect_store()
            .returning(|_, _| Ok("user_profile_img/new.png".into()));
        media.expect_remove()
            .with(eq("user_profile_img/new.png"))
            .times(1)
            .returning(|_| Ok(()));

        let mut repo = MockProfileRepository::new();
        repo.expect_get_or_create_student_profile()
            .returning(|id| Ok(StudentProfile { user_id: *id, ..Default::default() }));
        repo.expect_set_student_image()
            .returning(|_, _| Err(AppError::InternalError("connection reset".into())));

        let handler = ProfileHandler::new(repo, media);
        let err = handler
            .upload_profile_image(&claims(Role::Student), Path::new("/tmp/upload"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InternalError(_)));
    }

    #[tokio::test]
    async fn blank_company_name_never_reaches_the_repo() {
        let mut repo = MockProfileRepository::new();
        repo.expect_update_employer_profile().never();

        let handler = ProfileHandler::new(repo, MockMediaStorage::new());
        let request = UpdateEmployerProfileRequest {
            company_name: "   ".into(),
            ..employer_request("0912 345 6789")
        };
        let err = handler
            .update_employer_profile(&claims(Role::Employer), request)
            .await
            .unwrap_err();

        match err {
            AppError::ValidationError(fields) => assert_eq!(fields[0].field, "company_name"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
