use super::form::{FormEffect, FormTransition};

/// Host-side view of the effects a form has requested: current page title,
/// whether the modal progress dialog is up, and where the user was sent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormShell {
    pub page_title: Option<String>,
    pub progress_open: bool,
    pub route: Option<String>,
    pub navigations: usize,
}

impl FormShell {
    pub fn apply(&mut self, transition: &FormTransition) {
        for effect in &transition.effects {
            match effect {
                FormEffect::SetPageTitle(title) => self.page_title = Some(title.clone()),
                FormEffect::ShowProgressDialog => self.progress_open = true,
                FormEffect::CloseProgressDialog => self.progress_open = false,
                FormEffect::Navigate(route) => {
                    self.route = Some(route.clone());
                    self.navigations += 1;
                }
            }
        }
    }
}
