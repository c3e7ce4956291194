//! Form controller and egui surface.
//!
//! All state transitions live in plain methods on [`UserForm`] so they can be
//! exercised in tests; the `eframe::App` impl only renders widgets and routes
//! clicks into those methods.

use eframe::egui;
use tracing::warn;

use crate::domain::{NewUser, User};
use crate::error::StoreError;
use crate::store::UserStore;

/// Outcome of a form action, presented as a blocking dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    Success(String),
    InvalidInput(String),
    NotFound(i64),
    StoreFailure(String),
}

impl Feedback {
    fn title(&self) -> &'static str {
        match self {
            Feedback::Success(_) => "Success",
            Feedback::InvalidInput(_) => "Input error",
            Feedback::NotFound(_) => "Not found",
            Feedback::StoreFailure(_) => "Storage error",
        }
    }

    fn message(&self) -> String {
        match self {
            Feedback::Success(text)
            | Feedback::InvalidInput(text)
            | Feedback::StoreFailure(text) => text.clone(),
            Feedback::NotFound(id) => format!("No user with id {id} in the database."),
        }
    }
}

fn store_feedback(err: StoreError) -> Feedback {
    match err {
        StoreError::NotFound(id) => Feedback::NotFound(id),
        StoreError::EmailTaken(email) => {
            Feedback::StoreFailure(format!("Email {email} is already in use."))
        }
        StoreError::Database(err) => Feedback::StoreFailure(format!("Database error: {err}")),
    }
}

/// The user-management form: three fields, four buttons, one table.
///
/// `rows` is a disposable projection of storage, replaced by one fresh
/// `get_all` snapshot after every mutation. Fields are either empty (initial,
/// after a completed action) or populated (after a row click or typing).
pub struct UserForm {
    store: UserStore,
    id_text: String,
    name_text: String,
    email_text: String,
    rows: Vec<User>,
    feedback: Option<Feedback>,
    pending_delete: Option<i64>,
}

impl UserForm {
    /// Build the form and load the initial listing.
    pub fn new(store: UserStore) -> Self {
        let mut form = Self {
            store,
            id_text: String::new(),
            name_text: String::new(),
            email_text: String::new(),
            rows: Vec::new(),
            feedback: None,
            pending_delete: None,
        };
        form.reload();
        form
    }

    pub fn rows(&self) -> &[User] {
        &self.rows
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// Replace the projection with a fresh storage snapshot. On failure the
    /// table is cleared and the load error becomes the current dialog.
    fn reload(&mut self) {
        match self.store.get_all() {
            Ok(rows) => self.rows = rows,
            Err(err) => {
                warn!(error = %err, "listing users failed");
                self.rows.clear();
                self.feedback = Some(Feedback::StoreFailure(format!(
                    "Could not load users: {err}"
                )));
            }
        }
    }

    fn clear_fields(&mut self) {
        self.id_text.clear();
        self.name_text.clear();
        self.email_text.clear();
    }

    /// Non-empty name/email from the fields, or a validation dialog.
    fn required_fields(&mut self) -> Option<(String, String)> {
        let name = self.name_text.trim().to_string();
        let email = self.email_text.trim().to_string();
        if name.is_empty() || email.is_empty() {
            self.feedback = Some(Feedback::InvalidInput(
                "Name and email cannot be empty.".into(),
            ));
            return None;
        }
        Some((name, email))
    }

    /// The id field parsed as an integer, or a validation dialog.
    fn parsed_id(&mut self) -> Option<i64> {
        let text = self.id_text.trim();
        if text.is_empty() {
            self.feedback = Some(Feedback::InvalidInput(
                "Select a user from the table or enter an id first.".into(),
            ));
            return None;
        }
        match text.parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                self.feedback = Some(Feedback::InvalidInput(
                    "Invalid id: select a row from the table or enter a number.".into(),
                ));
                None
            }
        }
    }

    /// "Add" button: validate, insert, resync, clear, confirm with the new id.
    pub fn submit_add(&mut self) {
        let Some((name, email)) = self.required_fields() else {
            return;
        };
        match self.store.add(&NewUser::new(name, email)) {
            Ok(id) => {
                self.clear_fields();
                self.feedback = Some(Feedback::Success(format!("User added with id {id}.")));
                self.reload();
            }
            Err(err) => self.feedback = Some(store_feedback(err)),
        }
    }

    /// "Update" button: validate id and fields, update, resync, clear.
    pub fn submit_update(&mut self) {
        let Some(id) = self.parsed_id() else {
            return;
        };
        let Some((name, email)) = self.required_fields() else {
            return;
        };
        match self.store.update(&User { id, name, email }) {
            Ok(()) => {
                self.clear_fields();
                self.feedback = Some(Feedback::Success(format!("User {id} updated.")));
                self.reload();
            }
            Err(err) => self.feedback = Some(store_feedback(err)),
        }
    }

    /// "Delete" button: validate the id, then ask for confirmation.
    pub fn request_delete(&mut self) {
        if let Some(id) = self.parsed_id() {
            self.pending_delete = Some(id);
        }
    }

    /// Answer to the confirmation dialog; deletes only on a yes.
    pub fn confirm_delete(&mut self, confirmed: bool) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        if !confirmed {
            return;
        }
        match self.store.delete(id) {
            Ok(()) => {
                self.clear_fields();
                self.feedback = Some(Feedback::Success(format!("User {id} deleted.")));
                self.reload();
            }
            Err(err) => self.feedback = Some(store_feedback(err)),
        }
    }

    /// "Refresh" button: resync the table, leaving the fields alone.
    pub fn refresh(&mut self) {
        self.reload();
    }

    /// Row click: copy the displayed values into the fields. Works from the
    /// projection as shown, not from a fresh fetch.
    pub fn select_row(&mut self, user: &User) {
        self.id_text = user.id.to_string();
        self.name_text = user.name.clone();
        self.email_text = user.email.clone();
    }

    pub fn dismiss_feedback(&mut self) {
        self.feedback = None;
    }

    fn fields_ui(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("user_fields")
            .num_columns(2)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label("Id (from selection):");
                ui.add_enabled(false, egui::TextEdit::singleline(&mut self.id_text));
                ui.end_row();

                ui.label("Name:");
                ui.text_edit_singleline(&mut self.name_text);
                ui.end_row();

                ui.label("Email:");
                ui.text_edit_singleline(&mut self.email_text);
                ui.end_row();
            });
    }

    fn buttons_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Add").clicked() {
                self.submit_add();
            }
            if ui.button("Update").clicked() {
                self.submit_update();
            }
            if ui.button("Delete").clicked() {
                self.request_delete();
            }
            if ui.button("Refresh").clicked() {
                self.refresh();
            }
        });
    }

    fn table_ui(&mut self, ui: &mut egui::Ui) {
        let mut clicked: Option<User> = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("user_rows")
                .num_columns(3)
                .striped(true)
                .min_col_width(80.0)
                .show(ui, |ui| {
                    ui.strong("ID");
                    ui.strong("Name");
                    ui.strong("Email");
                    ui.end_row();
                    for user in &self.rows {
                        let selected = self.id_text == user.id.to_string();
                        // single-pipe keeps all three cells rendered
                        if ui.selectable_label(selected, user.id.to_string()).clicked()
                            | ui.selectable_label(selected, &user.name).clicked()
                            | ui.selectable_label(selected, &user.email).clicked()
                        {
                            clicked = Some(user.clone());
                        }
                        ui.end_row();
                    }
                });
        });
        if let Some(user) = clicked {
            self.select_row(&user);
        }
    }

    fn dialogs_ui(&mut self, ctx: &egui::Context) {
        if let Some(id) = self.pending_delete {
            let mut choice: Option<bool> = None;
            egui::Window::new("Confirm delete")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(format!("Are you sure you want to delete user with id {id}?"));
                    ui.horizontal(|ui| {
                        if ui.button("Yes").clicked() {
                            choice = Some(true);
                        }
                        if ui.button("No").clicked() {
                            choice = Some(false);
                        }
                    });
                });
            if let Some(confirmed) = choice {
                self.confirm_delete(confirmed);
            }
            return;
        }
        if let Some(feedback) = self.feedback.clone() {
            let mut dismissed = false;
            egui::Window::new(feedback.title())
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(feedback.message());
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            if dismissed {
                self.dismiss_feedback();
            }
        }
    }
}

impl eframe::App for UserForm {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.fields_ui(ui);
            ui.add_space(8.0);
            self.buttons_ui(ui);
            ui.separator();
            self.table_ui(ui);
        });
        self.dialogs_ui(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreConfig;
    use tempfile::NamedTempFile;

    fn test_form() -> (UserForm, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let store = UserStore::new(StoreConfig::new(temp_file.path()));
        store.ensure_schema().unwrap();
        (UserForm::new(store), temp_file)
    }

    #[test]
    fn add_with_empty_fields_is_rejected_before_any_store_call() {
        let (mut form, _db) = test_form();
        form.name_text = "Alice".into();
        form.submit_add();
        assert!(matches!(form.feedback(), Some(Feedback::InvalidInput(_))));
        assert!(form.rows().is_empty());
    }

    #[test]
    fn add_assigns_id_clears_fields_and_resyncs_rows() {
        let (mut form, _db) = test_form();
        form.name_text = "Alice".into();
        form.email_text = "alice@x.com".into();
        form.submit_add();

        assert_eq!(
            form.feedback(),
            Some(&Feedback::Success("User added with id 1.".into()))
        );
        assert!(form.name_text.is_empty());
        assert!(form.email_text.is_empty());
        assert_eq!(form.rows().len(), 1);
        assert_eq!(form.rows()[0].name, "Alice");
    }

    #[test]
    fn duplicate_email_shows_storage_error_and_adds_no_row() {
        let (mut form, _db) = test_form();
        form.name_text = "Alice".into();
        form.email_text = "alice@x.com".into();
        form.submit_add();

        form.name_text = "Alicia".into();
        form.email_text = "alice@x.com".into();
        form.submit_add();

        assert!(matches!(form.feedback(), Some(Feedback::StoreFailure(_))));
        assert_eq!(form.rows().len(), 1);
    }

    #[test]
    fn update_requires_a_numeric_id() {
        let (mut form, _db) = test_form();
        form.id_text = "abc".into();
        form.name_text = "Alice".into();
        form.email_text = "alice@x.com".into();
        form.submit_update();
        assert!(matches!(form.feedback(), Some(Feedback::InvalidInput(_))));
    }

    #[test]
    fn update_of_missing_id_reports_not_found() {
        let (mut form, _db) = test_form();
        form.id_text = "42".into();
        form.name_text = "Alice".into();
        form.email_text = "alice@x.com".into();
        form.submit_update();
        assert_eq!(form.feedback(), Some(&Feedback::NotFound(42)));
    }

    #[test]
    fn row_click_populates_fields_from_the_projection() {
        let (mut form, _db) = test_form();
        form.name_text = "Alice".into();
        form.email_text = "alice@x.com".into();
        form.submit_add();

        let row = form.rows()[0].clone();
        form.select_row(&row);
        assert_eq!(form.id_text, "1");
        assert_eq!(form.name_text, "Alice");
        assert_eq!(form.email_text, "alice@x.com");
    }

    #[test]
    fn delete_waits_for_confirmation_and_declining_keeps_the_row() {
        let (mut form, _db) = test_form();
        form.name_text = "Alice".into();
        form.email_text = "alice@x.com".into();
        form.submit_add();
        form.dismiss_feedback();

        form.id_text = "1".into();
        form.request_delete();
        assert_eq!(form.rows().len(), 1);

        form.confirm_delete(false);
        assert_eq!(form.rows().len(), 1);
        assert!(form.feedback().is_none());

        form.request_delete();
        form.confirm_delete(true);
        assert!(form.rows().is_empty());
        assert_eq!(
            form.feedback(),
            Some(&Feedback::Success("User 1 deleted.".into()))
        );
    }

    #[test]
    fn refresh_resyncs_rows_without_touching_fields() {
        let (mut form, db) = test_form();
        // another handle writing to the same file, as an external change
        let other = UserStore::new(StoreConfig::new(db.path()));
        other.add(&NewUser::new("Bob", "bob@x.com")).unwrap();

        form.name_text = "draft".into();
        form.refresh();
        assert_eq!(form.rows().len(), 1);
        assert_eq!(form.name_text, "draft");
    }
}
