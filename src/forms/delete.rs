use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    error::AppResult,
    models::{DeleteFormState, Favorite},
    services::FavoriteService,
};

/// Raw POST body of the delete confirmation.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DeleteSubmission {
    pub id: Option<String>,
    pub confirm: Option<String>,
}

/// Confirmation form bound to the favorite about to be deleted.
///
/// With `require_confirmation` the submission must also carry a truthy
/// `confirm` field (a checkbox on the confirmation page).
#[derive(Debug)]
pub struct DeleteFavoriteForm {
    instance: Favorite,
    is_bound: bool,
    require_confirmation: bool,
    errors: Map<String, Value>,
}

impl DeleteFavoriteForm {
    pub fn unbound(instance: Favorite, require_confirmation: bool) -> Self {
        Self {
            instance,
            is_bound: false,
            require_confirmation,
            errors: Map::new(),
        }
    }

    pub fn bind(instance: Favorite, data: &DeleteSubmission, require_confirmation: bool) -> Self {
        let mut form = Self {
            instance,
            is_bound: true,
            require_confirmation,
            errors: Map::new(),
        };
        form.clean(data);
        form
    }

    fn clean(&mut self, data: &DeleteSubmission) {
        if let Some(raw) = data.id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            match raw.parse::<i64>() {
                Ok(id) if id == self.instance.id => {}
                Ok(_) => self.add_error("id", "Submitted id does not match this favorite."),
                Err(_) => self.add_error("id", "Enter a whole number."),
            }
        }

        if self.require_confirmation && !is_truthy(data.confirm.as_deref()) {
            self.add_error("confirm", "This field is required.");
        }
    }

    fn add_error(&mut self, field: &str, message: &str) {
        let entry = self
            .errors
            .entry(field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(messages) = entry {
            messages.push(Value::from(message));
        }
    }

    pub fn is_bound(&self) -> bool {
        self.is_bound
    }

    pub fn is_valid(&self) -> bool {
        self.is_bound && self.errors.is_empty()
    }

    pub fn errors(&self) -> &Map<String, Value> {
        &self.errors
    }

    pub fn instance(&self) -> &Favorite {
        &self.instance
    }

    pub fn state(&self) -> DeleteFormState {
        let mut fields = vec!["id"];
        if self.require_confirmation {
            fields.push("confirm");
        }

        DeleteFormState {
            fields,
            is_bound: self.is_bound,
            errors: self.errors.clone(),
        }
    }

    /// Deletes the bound favorite when `commit` is set; otherwise does
    /// nothing. Either way the instance is handed back.
    pub async fn save(self, service: &FavoriteService, commit: bool) -> AppResult<Favorite> {
        if commit {
            service.delete(&self.instance).await?;
        }
        Ok(self.instance)
    }
}

fn is_truthy(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("on" | "true" | "1" | "yes")
    )
}
