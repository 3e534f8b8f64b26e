use serde::{Deserialize, Serialize};

/// Colour scheme stored in the session.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Deserialize)]
pub struct ThemeForm {
    pub theme: Theme,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_names_are_lowercase() {
        let form: ThemeForm = serde_json::from_str(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(form.theme, Theme::Dark);
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), "\"light\"");
        assert!(serde_json::from_str::<ThemeForm>(r#"{"theme":"blue"}"#).is_err());
    }
}
