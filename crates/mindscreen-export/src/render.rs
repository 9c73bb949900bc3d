use serde::Serialize;
use tera::{Context, Tera};

use crate::error::ExportError;

/// Render a Tera template against any serializable value.
///
/// The `template_content` is the raw template string (Jinja2 syntax).
/// The value's fields become the template context variables. Markdown is
/// the output format, so autoescaping is off.
pub fn render_template<T: Serialize>(
    template_name: &str,
    template_content: &str,
    value: &T,
) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.add_raw_template(template_name, template_content)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let value = serde_json::to_value(value)?;
    let context =
        Context::from_value(value).map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    Ok(tera.render(template_name, &context)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Greeting {
        name: String,
        items: Vec<String>,
    }

    #[test]
    fn renders_fields_and_loops() {
        let value = Greeting {
            name: "R&D <team>".into(),
            items: vec!["a".into(), "b".into()],
        };
        let out = render_template(
            "greeting",
            "Hi {{ name }}:{% for i in items %} {{ i }}{% endfor %}",
            &value,
        )
        .unwrap();
        assert_eq!(out, "Hi R&D <team>: a b");
    }

    #[test]
    fn parse_errors_are_reported() {
        let err = render_template("bad", "{% for %}", &serde_json::json!({})).unwrap_err();
        assert!(matches!(err, ExportError::TemplateParse(_)));
    }
}
