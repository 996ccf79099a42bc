use std::collections::HashMap;

use crate::adapters::RenderedContent;
use crate::error::NotificationError;

pub const APPOINTMENT_CONFIRMATION: &str = "appointment_confirmation";

/// Template renderer using `{{variable}}` placeholders.
///
/// Placeholders without a value in the data map are left in place. Values
/// substituted into `html_body` are HTML-escaped.
pub struct TemplateRenderer {
    templates: HashMap<String, Template>,
}

#[derive(Debug, Clone)]
pub struct Template {
    pub id: String,
    pub subject: Option<String>,
    pub body: String,
    pub html_body: Option<String>,
}

impl TemplateRenderer {
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// A renderer with the built-in appointment templates registered.
    pub fn with_defaults() -> Self {
        let mut renderer = Self::new();
        renderer.register(appointment_confirmation());
        renderer
    }

    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn get(&self, template_id: &str) -> Option<&Template> {
        self.templates.get(template_id)
    }

    pub fn render(
        &self,
        template_id: &str,
        data: &HashMap<String, serde_json::Value>,
    ) -> Result<RenderedContent, NotificationError> {
        let template = self
            .templates
            .get(template_id)
            .ok_or_else(|| NotificationError::TemplateNotFound(template_id.to_string()))?;

        Ok(RenderedContent {
            subject: template.subject.as_deref().map(|s| render_string(s, data)),
            body: render_string(&template.body, data),
            html_body: template.html_body.as_deref().map(|s| render_html(s, data)),
        })
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn render_string(template: &str, data: &HashMap<String, serde_json::Value>) -> String {
    substitute(template, data, display_value)
}

fn render_html(template: &str, data: &HashMap<String, serde_json::Value>) -> String {
    substitute(template, data, |value| escape_html(&display_value(value)))
}

fn substitute(
    template: &str,
    data: &HashMap<String, serde_json::Value>,
    format: impl Fn(&serde_json::Value) -> String,
) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = after[..end].trim();
        match data.get(key) {
            Some(value) => out.push_str(&format(value)),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

fn appointment_confirmation() -> Template {
    Template {
        id: APPOINTMENT_CONFIRMATION.to_string(),
        subject: Some("Appointment Confirmation".to_string()),
        body: "Hello,\n\n\
               Your appointment with Dr. {{doctor_name}} is confirmed for \
               {{appointment_date}} at {{appointment_time}}.\n\n\
               Appointment ID: {{appointment_id}}\n\n\
               Thank you."
            .to_string(),
        html_body: Some(
            "<p>Hello,</p>\
             <p>Your appointment with <strong>Dr. {{doctor_name}}</strong> is confirmed for \
             <strong>{{appointment_date}}</strong> at <strong>{{appointment_time}}</strong>.</p>\
             <p>Appointment ID: <code>{{appointment_id}}</code></p>\
             <p>Thank you.</p>"
                .to_string(),
        ),
    }
}
