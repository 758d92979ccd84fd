// ── Account page ──
//
// Profile record with an explicit edit state machine, an independent
// password change form, and avatar upload/removal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use bytesize::ByteSize;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use storefront_api::{AvatarFile, ChangePasswordRequest, UpdateProfileRequest, User};

use crate::error::CoreError;
use crate::notify::{Notification, Notifier};
use crate::resource::InFlight;
use crate::services::{ProfileApi, UserService};
use crate::validate::{FieldErrors, Validate, check_new_password, is_valid_phone};

/// Largest accepted profile picture.
pub const MAX_AVATAR_BYTES: u64 = 5 * 1024 * 1024;

/// ```text
/// Loading ──ok──▶ Loaded ──begin_edit──▶ Editing ──save──▶ Saving ──ok──▶ Loaded
///    │                ▲                     │                 │
///    └──err──▶ Failed └──── cancel_edit ────┘◀──────err───────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ProfilePhase {
    Loading,
    Loaded,
    Editing,
    Saving,
    Failed,
}

/// Editable shadow of the profile. Email is not part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl ProfileDraft {
    /// Split the display name on its first whitespace run.
    pub fn from_user(user: &User) -> Self {
        let name = user.name.trim();
        let (first, last) = name
            .split_once(char::is_whitespace)
            .map_or((name, ""), |(f, l)| (f, l.trim()));
        Self {
            first_name: first.to_owned(),
            last_name: last.to_owned(),
            phone: user.phone.clone(),
        }
    }

    pub fn full_name(&self) -> String {
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        if last.is_empty() {
            first.to_owned()
        } else {
            format!("{first} {last}")
        }
    }
}

impl Validate for ProfileDraft {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("first_name", &self.first_name, "First name");
        if !self.phone.trim().is_empty() && !is_valid_phone(&self.phone) {
            errors.insert("phone", "Phone number is invalid");
        }
        errors
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileState {
    pub phase: ProfilePhase,
    /// Last record the server returned.
    pub user: Option<User>,
    /// Present only while editing or saving.
    pub draft: Option<ProfileDraft>,
    pub errors: FieldErrors,
    /// Message shown when the initial fetch failed.
    pub load_error: Option<String>,
}

impl Default for ProfileState {
    fn default() -> Self {
        Self {
            phase: ProfilePhase::Loading,
            user: None,
            draft: None,
            errors: FieldErrors::new(),
            load_error: None,
        }
    }
}

/// Password change inputs. Values are kept across failed attempts.
pub struct PasswordForm {
    pub current: SecretString,
    pub new: SecretString,
    pub confirm: SecretString,
    /// Render the inputs as plain text.
    pub show_password: bool,
}

impl Default for PasswordForm {
    fn default() -> Self {
        Self {
            current: SecretString::from(String::new()),
            new: SecretString::from(String::new()),
            confirm: SecretString::from(String::new()),
            show_password: false,
        }
    }
}

impl std::fmt::Debug for PasswordForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordForm")
            .field("show_password", &self.show_password)
            .finish_non_exhaustive()
    }
}

impl Validate for PasswordForm {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.current.expose_secret().is_empty() {
            errors.insert("current_password", "Current password is required");
        }
        check_new_password(
            &mut errors,
            "new_password",
            "confirm_password",
            self.new.expose_secret(),
            self.confirm.expose_secret(),
        );
        errors
    }
}

pub struct AccountPage<S: ProfileApi = UserService> {
    service: S,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<ProfileState>,
    password: Mutex<PasswordForm>,
    mounted: AtomicBool,
    saving: InFlight,
    changing_password: InFlight,
    avatar: InFlight,
}

impl<S: ProfileApi> AccountPage<S> {
    pub fn new(service: S, notifier: Arc<dyn Notifier>) -> Self {
        let (state, _) = watch::channel(ProfileState::default());
        Self {
            service,
            notifier,
            state,
            password: Mutex::new(PasswordForm::default()),
            mounted: AtomicBool::new(false),
            saving: InFlight::default(),
            changing_password: InFlight::default(),
            avatar: InFlight::default(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn snapshot(&self) -> ProfileState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProfileState> {
        self.state.subscribe()
    }

    pub fn phase(&self) -> ProfilePhase {
        self.state.borrow().phase
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// Whether the "Remove Photo" control should be offered.
    pub fn can_remove_avatar(&self) -> bool {
        self.state
            .borrow()
            .user
            .as_ref()
            .is_some_and(|u| u.avatar.as_deref().is_some_and(|a| !a.is_empty()))
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Fetch the signed-in user once per mount.
    pub async fn mount(&self) -> Result<(), CoreError> {
        if self.mounted.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.reload().await
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
        self.state.send_replace(ProfileState::default());
        self.reset_password_form();
    }

    pub async fn reload(&self) -> Result<(), CoreError> {
        self.state.send_modify(|s| s.phase = ProfilePhase::Loading);
        match self.service.me().await {
            Ok(user) => {
                debug!(user = %user.id, "profile loaded");
                self.state.send_modify(|s| {
                    s.user = Some(user);
                    s.draft = None;
                    s.load_error = None;
                    s.phase = ProfilePhase::Loaded;
                });
                Ok(())
            }
            Err(e) => {
                self.state.send_modify(|s| {
                    s.load_error = Some(e.to_string());
                    s.phase = ProfilePhase::Failed;
                });
                self.notifier.notify(Notification::error(e.to_string()));
                Err(e)
            }
        }
    }

    // ── Profile editing ──────────────────────────────────────────────

    pub fn begin_edit(&self) -> Result<(), CoreError> {
        let mut started = false;
        self.state.send_if_modified(|s| {
            let Some(user) = s.user.as_ref().filter(|_| s.phase == ProfilePhase::Loaded) else {
                return false;
            };
            s.draft = Some(ProfileDraft::from_user(user));
            s.errors = FieldErrors::new();
            s.phase = ProfilePhase::Editing;
            started = true;
            true
        });
        if started {
            Ok(())
        } else {
            Err(CoreError::InvalidState("Profile is not ready for editing"))
        }
    }

    pub fn update_draft(&self, edit: impl FnOnce(&mut ProfileDraft)) {
        self.state.send_if_modified(|s| match s.draft.as_mut() {
            Some(draft) if s.phase == ProfilePhase::Editing => {
                edit(draft);
                true
            }
            _ => false,
        });
    }

    /// Drop the draft and go back to the last fetched record.
    pub fn cancel_edit(&self) {
        self.state.send_if_modified(|s| {
            if s.phase != ProfilePhase::Editing {
                return false;
            }
            s.draft = None;
            s.errors = FieldErrors::new();
            s.phase = ProfilePhase::Loaded;
            true
        });
    }

    /// Validate and send the draft. Edit mode ends only on success.
    pub async fn save(&self) -> Result<User, CoreError> {
        let (phase, draft) = {
            let s = self.state.borrow();
            (s.phase, s.draft.clone())
        };
        let Some(draft) = draft.filter(|_| phase == ProfilePhase::Editing) else {
            return Err(CoreError::InvalidState("Profile is not being edited"));
        };

        let errors = draft.validate();
        if !errors.is_empty() {
            self.notifier.notify(Notification::warning(errors.to_string()));
            self.state.send_modify(|s| s.errors = errors.clone());
            return Err(CoreError::Validation(errors));
        }

        let _guard = self.saving.begin("Profile save")?;
        self.state.send_modify(|s| {
            s.errors = FieldErrors::new();
            s.phase = ProfilePhase::Saving;
        });

        let req = UpdateProfileRequest {
            name: draft.full_name(),
            phone: draft.phone.trim().to_owned(),
        };
        match self.service.update_profile(&req).await {
            Ok(user) => {
                info!(user = %user.id, "profile updated");
                self.state.send_modify(|s| {
                    s.user = Some(user.clone());
                    s.draft = None;
                    s.phase = ProfilePhase::Loaded;
                });
                self.notifier
                    .notify(Notification::success("Profile updated successfully"));
                Ok(user)
            }
            Err(e) => {
                self.state.send_modify(|s| s.phase = ProfilePhase::Editing);
                self.notifier.notify(Notification::error(e.to_string()));
                Err(e)
            }
        }
    }

    // ── Password ─────────────────────────────────────────────────────

    /// Edit the password form in place.
    pub fn edit_password_form<T>(&self, edit: impl FnOnce(&mut PasswordForm) -> T) -> T {
        edit(&mut self.password.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn toggle_show_password(&self) -> bool {
        self.edit_password_form(|f| {
            f.show_password = !f.show_password;
            f.show_password
        })
    }

    fn reset_password_form(&self) {
        self.edit_password_form(|f| *f = PasswordForm::default());
    }

    pub fn is_changing_password(&self) -> bool {
        self.changing_password.is_active()
    }

    /// Validate and submit the password form. Runs independently of the
    /// profile save. The form is cleared only on success.
    pub async fn change_password(&self) -> Result<(), CoreError> {
        let req = self.edit_password_form(|form| {
            let errors = form.validate();
            errors.into_result().map(|()| ChangePasswordRequest {
                current_password: form.current.expose_secret().to_owned(),
                new_password: form.new.expose_secret().to_owned(),
            })
        });
        let req = match req {
            Ok(req) => req,
            Err(e) => {
                self.notifier.notify(Notification::warning(e.to_string()));
                return Err(e);
            }
        };

        let _guard = self.changing_password.begin("Password change")?;
        match self.service.change_password(&req).await {
            Ok(()) => {
                info!("password changed");
                self.reset_password_form();
                self.notifier
                    .notify(Notification::success("Password changed successfully"));
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(Notification::error(e.to_string()));
                Err(e)
            }
        }
    }

    // ── Avatar ───────────────────────────────────────────────────────

    /// Upload a new profile picture. Non-images and files over
    /// [`MAX_AVATAR_BYTES`] are refused without contacting the server.
    pub async fn upload_avatar(&self, file: &AvatarFile) -> Result<(), CoreError> {
        if !file.is_image() {
            return Err(self.reject("Please choose an image file"));
        }
        if !u64::try_from(file.size()).is_ok_and(|n| n <= MAX_AVATAR_BYTES) {
            return Err(self.reject(&format!(
                "Image must be smaller than {}",
                ByteSize::b(MAX_AVATAR_BYTES).to_string_as(true)
            )));
        }

        let _guard = self.avatar.begin("Photo upload")?;
        match self.service.upload_avatar(file).await {
            Ok(avatar) => {
                let avatar = match avatar {
                    Some(path) => Some(path),
                    None => self.refetch_avatar().await,
                };
                if let Some(avatar) = avatar {
                    self.state.send_modify(|s| {
                        if let Some(user) = s.user.as_mut() {
                            user.avatar = Some(avatar);
                        }
                    });
                }
                self.notifier
                    .notify(Notification::success("Profile photo updated"));
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(Notification::error(e.to_string()));
                Err(e)
            }
        }
    }

    /// The upload response did not carry the new path; ask the profile
    /// endpoint instead. `None` leaves the current photo in place.
    async fn refetch_avatar(&self) -> Option<String> {
        match self.service.me().await {
            Ok(user) => user.avatar,
            Err(e) => {
                warn!(error = %e, "avatar uploaded but profile refresh failed");
                None
            }
        }
    }

    pub async fn remove_avatar(&self) -> Result<(), CoreError> {
        if !self.can_remove_avatar() {
            return Err(CoreError::InvalidState("There is no photo to remove"));
        }
        let _guard = self.avatar.begin("Photo removal")?;
        match self.service.remove_avatar().await {
            Ok(()) => {
                self.state.send_modify(|s| {
                    if let Some(user) = s.user.as_mut() {
                        user.avatar = None;
                    }
                });
                self.notifier
                    .notify(Notification::success("Profile photo removed"));
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(Notification::error(e.to_string()));
                Err(e)
            }
        }
    }

    fn reject(&self, message: &str) -> CoreError {
        self.notifier.notify(Notification::error(message));
        CoreError::Rejected {
            message: message.to_owned(),
        }
    }
}
