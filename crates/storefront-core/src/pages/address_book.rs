// ── Address book page ──
//
// Collection of shipping addresses plus one add/edit dialog. The backend
// owns default-flag uniqueness: the client only calls the dedicated
// endpoint and re-reads the collection to check the outcome.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use storefront_api::{Address, AddressInput, ResourceId};

use crate::error::CoreError;
use crate::notify::{Confirm, Notification, Notifier};
use crate::resource::{Deleted, ResourceController};
use crate::services::{AddressApi, AddressService};
use crate::validate::{FieldErrors, Validate, is_valid_phone, is_valid_postal_code};

impl Validate for AddressInput {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("address_line", &self.address_line, "Address line");
        errors.require("city", &self.city, "City");
        errors.require("state", &self.state, "State");
        if errors.require("postal_code", &self.postal_code, "Postal code")
            && !is_valid_postal_code(&self.postal_code)
        {
            errors.insert("postal_code", "Postal code is invalid");
        }
        errors.require("country", &self.country, "Country");
        if errors.require("phone", &self.phone, "Phone") && !is_valid_phone(&self.phone) {
            errors.insert("phone", "Phone number is invalid");
        }
        errors
    }
}

/// The add/edit dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AddressDialog {
    #[default]
    Closed,
    Creating(AddressInput),
    Editing { id: ResourceId, draft: AddressInput },
}

impl AddressDialog {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn draft(&self) -> Option<&AddressInput> {
        match self {
            Self::Closed => None,
            Self::Creating(draft) | Self::Editing { draft, .. } => Some(draft),
        }
    }
}

/// Dialog plus the inline errors from the last submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressForm {
    pub dialog: AddressDialog,
    pub errors: FieldErrors,
}

pub struct AddressBook<S: AddressApi = AddressService> {
    controller: ResourceController<S>,
    form: watch::Sender<AddressForm>,
}

impl<S: AddressApi> AddressBook<S> {
    pub fn new(service: S, notifier: Arc<dyn Notifier>) -> Self {
        let (form, _) = watch::channel(AddressForm::default());
        Self {
            controller: ResourceController::new(service, notifier),
            form,
        }
    }

    pub fn controller(&self) -> &ResourceController<S> {
        &self.controller
    }

    pub async fn mount(&self) -> Result<(), CoreError> {
        self.controller.mount().await
    }

    pub fn unmount(&self) {
        self.controller.unmount();
        self.form.send_replace(AddressForm::default());
    }

    pub async fn refresh(&self) -> Result<(), CoreError> {
        self.controller.refresh().await
    }

    pub fn addresses(&self) -> Vec<Address> {
        self.controller.items()
    }

    pub fn default_address(&self) -> Option<Address> {
        self.controller.items().into_iter().find(|a| a.is_default)
    }

    pub fn form(&self) -> AddressForm {
        self.form.borrow().clone()
    }

    pub fn subscribe_form(&self) -> watch::Receiver<AddressForm> {
        self.form.subscribe()
    }

    // ── Dialog ───────────────────────────────────────────────────────

    /// Open an empty form. The very first address is always the default.
    pub fn open_new(&self) {
        let draft = AddressInput {
            is_default: self.controller.items().is_empty(),
            ..AddressInput::default()
        };
        self.form.send_replace(AddressForm {
            dialog: AddressDialog::Creating(draft),
            errors: FieldErrors::new(),
        });
    }

    /// Open the form pre-filled from an existing address.
    pub fn open_edit(&self, id: &ResourceId) -> Result<(), CoreError> {
        let address = self.controller.find(id).ok_or_else(|| CoreError::NotFound {
            resource: "Address",
            id: id.to_string(),
        })?;
        self.form.send_replace(AddressForm {
            dialog: AddressDialog::Editing {
                id: id.clone(),
                draft: AddressInput::from(&address),
            },
            errors: FieldErrors::new(),
        });
        Ok(())
    }

    /// Apply an edit to the open draft. No-op when the dialog is closed.
    pub fn update_draft(&self, edit: impl FnOnce(&mut AddressInput)) {
        self.form.send_if_modified(|form| match &mut form.dialog {
            AddressDialog::Closed => false,
            AddressDialog::Creating(draft) | AddressDialog::Editing { draft, .. } => {
                edit(draft);
                true
            }
        });
    }

    /// Discard the draft.
    pub fn close_dialog(&self) {
        self.form.send_replace(AddressForm::default());
    }

    /// Validate and send the open draft. The dialog closes only when the
    /// server accepted it; otherwise the draft stays for correction.
    pub async fn submit(&self) -> Result<Address, CoreError> {
        let dialog = self.form.borrow().dialog.clone();
        let result = match &dialog {
            AddressDialog::Closed => return Err(CoreError::InvalidState("No address form is open")),
            AddressDialog::Creating(draft) => {
                let mut draft = draft.clone();
                if self.controller.items().is_empty() {
                    draft.is_default = true;
                }
                self.controller.create(&draft).await
            }
            AddressDialog::Editing { id, draft } => self.controller.update(id, draft).await,
        };

        match result {
            Ok(saved) => {
                self.close_dialog();
                if saved.is_default {
                    self.verify_single_default();
                }
                Ok(saved)
            }
            Err(e) => {
                let errors = e.field_errors().cloned().unwrap_or_default();
                self.form.send_modify(|f| f.errors = errors);
                Err(e)
            }
        }
    }

    // ── Default flag ─────────────────────────────────────────────────

    /// Ask the backend to make `id` the default, then re-read and check
    /// that exactly one address carries the flag.
    pub async fn set_default(&self, id: &ResourceId) -> Result<(), CoreError> {
        if self.controller.find(id).is_some_and(|a| a.is_default) {
            debug!(%id, "already the default address");
            return Ok(());
        }
        self.controller
            .mutate(
                "Set default",
                "Default address updated",
                self.controller.service().set_default(id),
            )
            .await?;
        self.verify_single_default();
        Ok(())
    }

    /// Returns `false` (and warns) when the fetched collection does not
    /// have exactly one default.
    pub fn verify_single_default(&self) -> bool {
        let items = self.controller.items();
        if items.is_empty() {
            return true;
        }
        let defaults = items.iter().filter(|a| a.is_default).count();
        if defaults == 1 {
            return true;
        }
        warn!(defaults, total = items.len(), "default address is not unique");
        self.controller.notifier().notify(Notification::warning(format!(
            "Expected one default address, found {defaults}"
        )));
        false
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Delete after confirmation. Removing the default address promotes
    /// the first remaining one, unless the backend already picked one.
    pub async fn delete(&self, id: &ResourceId, confirm: &dyn Confirm) -> Result<Deleted, CoreError> {
        let was_default = self.controller.find(id).is_some_and(|a| a.is_default);
        let outcome = self.controller.delete(id, confirm).await?;
        if outcome == Deleted::Declined || !was_default {
            return Ok(outcome);
        }

        let remaining: Vec<Address> = self
            .controller
            .items()
            .into_iter()
            .filter(|a| &a.id != id)
            .collect();
        if remaining.iter().any(|a| a.is_default) {
            return Ok(outcome);
        }
        if let Some(next) = remaining.first() {
            debug!(promoted = %next.id, "promoting first remaining address");
            self.set_default(&next.id).await?;
        }
        Ok(outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notify::{Level, NotificationLog};
    use crate::testing::{FakeAddresses, address, valid_address_input};
    use pretty_assertions::assert_eq;

    fn page(fake: FakeAddresses) -> (AddressBook<FakeAddresses>, Arc<NotificationLog>) {
        let log = Arc::new(NotificationLog::new());
        (AddressBook::new(fake, log.clone()), log)
    }

    fn defaults(book: &AddressBook<FakeAddresses>) -> Vec<String> {
        book.addresses()
            .iter()
            .filter(|a| a.is_default)
            .map(|a| a.id.to_string())
            .collect()
    }

    #[tokio::test]
    async fn first_address_becomes_default_and_dialog_closes() {
        let (book, _) = page(FakeAddresses::default());
        book.mount().await.unwrap();

        book.open_new();
        assert_eq!(book.form().dialog.draft().map(|d| d.is_default), Some(true));
        book.update_draft(|d| *d = valid_address_input());

        let saved = book.submit().await.unwrap();
        assert!(saved.is_default);
        assert!(book.controller().service().last_created().unwrap().is_default);
        assert_eq!(book.form().dialog, AddressDialog::Closed);
        assert_eq!(book.addresses().len(), 1);
    }

    #[tokio::test]
    async fn second_address_is_not_forced_default() {
        let (book, _) = page(FakeAddresses::with(vec![address("a", true)]));
        book.mount().await.unwrap();
        book.open_new();
        assert_eq!(book.form().dialog.draft().map(|d| d.is_default), Some(false));
    }

    #[tokio::test]
    async fn missing_fields_block_submit_and_keep_dialog() {
        let (book, _) = page(FakeAddresses::default());
        book.mount().await.unwrap();
        book.open_new();
        book.update_draft(|d| d.city = "Paris".into());

        let err = book.submit().await.unwrap_err();
        assert!(err.is_validation());

        let form = book.form();
        assert_eq!(form.errors.get("address_line"), Some("Address line is required"));
        assert_eq!(form.errors.get("phone"), Some("Phone is required"));
        assert!(!form.errors.contains("city"));
        assert!(form.dialog.is_open());
        assert_eq!(book.controller().service().create_calls(), 0);
    }

    #[test]
    fn malformed_postal_code_is_reported() {
        let mut input = valid_address_input();
        input.postal_code = "#".into();
        input.phone = "phone".into();
        let errors = input.validate();
        assert_eq!(errors.get("postal_code"), Some("Postal code is invalid"));
        assert_eq!(errors.get("phone"), Some("Phone number is invalid"));
    }

    #[tokio::test]
    async fn edit_sends_update_for_that_id() {
        let (book, _) = page(FakeAddresses::with(vec![address("a", true), address("b", false)]));
        book.mount().await.unwrap();

        book.open_edit(&ResourceId::from("b")).unwrap();
        book.update_draft(|d| d.city = "Nice".into());
        book.submit().await.unwrap();

        assert_eq!(book.controller().service().update_calls(), 1);
        let b = book.controller().find(&ResourceId::from("b")).unwrap();
        assert_eq!(b.city, "Nice");
        assert!(!book.form().dialog.is_open());
    }

    #[tokio::test]
    async fn failed_save_keeps_draft() {
        let fake = FakeAddresses::default();
        fake.fail_mutations("Failed to add address");
        let (book, log) = page(fake);
        book.mount().await.unwrap();
        book.open_new();
        book.update_draft(|d| *d = valid_address_input());

        assert!(book.submit().await.is_err());
        assert_eq!(
            book.form().dialog.draft().map(|d| d.city.clone()),
            Some("Paris".into())
        );
        assert_eq!(log.last().unwrap().message, "Failed to add address");
    }

    #[tokio::test]
    async fn set_default_leaves_exactly_one() {
        let (book, _) = page(FakeAddresses::with(vec![
            address("a", true),
            address("b", false),
            address("c", false),
        ]));
        book.mount().await.unwrap();

        book.set_default(&ResourceId::from("c")).await.unwrap();
        assert_eq!(defaults(&book), vec!["c".to_owned()]);
        assert!(book.verify_single_default());
    }

    #[tokio::test]
    async fn non_unique_default_from_backend_is_flagged() {
        let fake = FakeAddresses::with(vec![address("a", true), address("b", false)]);
        fake.keep_old_defaults();
        let (book, log) = page(fake);
        book.mount().await.unwrap();

        book.set_default(&ResourceId::from("b")).await.unwrap();
        let last = log.last().unwrap();
        assert_eq!(last.level, Level::Warning);
        assert_eq!(last.message, "Expected one default address, found 2");
    }

    #[tokio::test]
    async fn deleting_default_promotes_first_remaining() {
        let (book, _) = page(FakeAddresses::with(vec![
            address("a", true),
            address("b", false),
            address("c", false),
        ]));
        book.mount().await.unwrap();

        let outcome = book
            .delete(&ResourceId::from("a"), &|_: &str| true)
            .await
            .unwrap();
        assert_eq!(outcome, Deleted::Removed);
        assert_eq!(defaults(&book), vec!["b".to_owned()]);
        assert_eq!(book.controller().service().set_default_calls(), 1);
    }

    #[tokio::test]
    async fn deleting_other_address_keeps_default() {
        let (book, _) = page(FakeAddresses::with(vec![address("a", true), address("b", false)]));
        book.mount().await.unwrap();

        book.delete(&ResourceId::from("b"), &|_: &str| true)
            .await
            .unwrap();
        assert_eq!(defaults(&book), vec!["a".to_owned()]);
        assert_eq!(book.controller().service().set_default_calls(), 0);
    }

    #[tokio::test]
    async fn declined_delete_changes_nothing() {
        let (book, _) = page(FakeAddresses::with(vec![address("a", true)]));
        book.mount().await.unwrap();

        let outcome = book
            .delete(&ResourceId::from("a"), &|_: &str| false)
            .await
            .unwrap();
        assert_eq!(outcome, Deleted::Declined);
        assert_eq!(book.addresses().len(), 1);
        assert_eq!(book.controller().service().delete_calls(), 0);
    }
}
