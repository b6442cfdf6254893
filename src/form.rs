//! Submitted form fields.
use std::collections::HashMap;

/// Decoded `application/x-www-form-urlencoded` body. Missing fields read as
/// empty, same as a field left blank.
#[derive(Debug, Clone, Default)]
pub struct FormData(HashMap<String, String>);

impl FormData {
    pub fn parse(body: &str) -> Self {
        Self(
            url::form_urlencoded::parse(body.as_bytes())
                .into_owned()
                .collect(),
        )
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_decodes_plus_and_percent() {
        let form = FormData::parse("username=al+ice&pin=12%2634&action=SDK");
        assert_eq!(form.get("username"), "al ice");
        assert_eq!(form.get("pin"), "12&34");
        assert_eq!(form.get("action"), "SDK");
    }

    #[test]
    fn missing_field_is_empty() {
        let form = FormData::parse("");
        assert_eq!(form.get("session"), "");
    }
}
