//! Email templates rendered with Handlebars.
//!
//! Text bodies use triple-stash (`{{{name}}}`) so values are not
//! HTML-escaped; HTML bodies use the escaping double-stash.

use crate::error::{NotificationError, NotificationResult};
use handlebars::Handlebars;
use serde::Serialize;
use std::collections::HashMap;

pub const EVENT_JOINED: &str = "event_joined";

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTemplate {
    pub subject: String,
    pub body_text: Option<String>,
    pub body_html: Option<String>,
}

#[derive(Clone, Debug)]
pub struct EmailTemplate {
    pub name: String,
    pub subject: String,
    pub body_text: Option<String>,
    pub body_html: Option<String>,
}

pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
    templates: HashMap<String, EmailTemplate>,
}

impl TemplateEngine {
    /// Engine with the built-in templates registered.
    pub fn new() -> NotificationResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);

        let mut engine = Self {
            handlebars,
            templates: HashMap::new(),
        };
        engine.register(event_joined_template())?;
        Ok(engine)
    }

    pub fn register(&mut self, template: EmailTemplate) -> NotificationResult<()> {
        let parts = [
            ("subject", Some(&template.subject)),
            ("text", template.body_text.as_ref()),
            ("html", template.body_html.as_ref()),
        ];
        for (part, source) in parts {
            if let Some(source) = source {
                self.handlebars
                    .register_template_string(&format!("{}_{part}", template.name), source)
                    .map_err(|e| {
                        NotificationError::Template(format!("{} {part}: {e}", template.name))
                    })?;
            }
        }

        self.templates.insert(template.name.clone(), template);
        Ok(())
    }

    pub fn render<T: Serialize>(
        &self,
        name: &str,
        data: &T,
    ) -> NotificationResult<RenderedTemplate> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| NotificationError::Template(format!("Template not found: {name}")))?;

        let render_part = |part: &str| {
            self.handlebars
                .render(&format!("{name}_{part}"), data)
                .map_err(|e| NotificationError::Template(format!("{name} {part}: {e}")))
        };

        Ok(RenderedTemplate {
            subject: render_part("subject")?,
            body_text: template.body_text.as_ref().map(|_| render_part("text")).transpose()?,
            body_html: template.body_html.as_ref().map(|_| render_part("html")).transpose()?,
        })
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }
}

fn event_joined_template() -> EmailTemplate {
    EmailTemplate {
        name: EVENT_JOINED.to_string(),
        subject: "Event booked".to_string(),
        body_text: Some(
            "Hi {{{name}}},\n\n\
             You have successfully joined the event. Here are the event details:\n\n\
             Event Name: {{{eventName}}}\n\
             Date: {{{eventDate}}}\n\
             Time: {{{eventTime}}}\n\n\
             Thank you for joining!"
                .to_string(),
        ),
        body_html: Some(
            "<p>Hi {{name}},</p>\
             <p>You have successfully joined the event. Here are the event details:</p>\
             <ul>\
             <li><strong>Event Name:</strong> {{eventName}}</li>\
             <li><strong>Date:</strong> {{eventDate}}</li>\
             <li><strong>Time:</strong> {{eventTime}}</li>\
             </ul>\
             <p>Thank you for joining!</p>"
                .to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data() -> serde_json::Value {
        json!({
            "name": "Ada & Co",
            "eventName": "Catan Night",
            "eventDate": "2024-06-01",
            "eventTime": "19:00",
        })
    }

    #[test]
    fn test_event_joined_registered() {
        let engine = TemplateEngine::new().unwrap();
        assert!(engine.has_template(EVENT_JOINED));
        assert!(!engine.has_template("welcome"));
    }

    #[test]
    fn test_event_joined_text_is_not_escaped() {
        let engine = TemplateEngine::new().unwrap();
        let rendered = engine.render(EVENT_JOINED, &data()).unwrap();

        assert_eq!(rendered.subject, "Event booked");
        let text = rendered.body_text.unwrap();
        assert!(text.starts_with("Hi Ada & Co,\n\n"));
        assert!(text.contains("Event Name: Catan Night\n"));
        assert!(text.contains("Date: 2024-06-01\n"));
        assert!(text.ends_with("Thank you for joining!"));
    }

    #[test]
    fn test_event_joined_html_is_escaped() {
        let engine = TemplateEngine::new().unwrap();
        let html = engine.render(EVENT_JOINED, &data()).unwrap().body_html.unwrap();

        assert!(html.contains("<p>Hi Ada &amp; Co,</p>"));
        assert!(html.contains("<li><strong>Time:</strong> 19:00</li>"));
    }

    #[test]
    fn test_missing_variable_is_an_error() {
        let engine = TemplateEngine::new().unwrap();
        let err = engine
            .render(EVENT_JOINED, &json!({ "name": "Ada" }))
            .unwrap_err();
        assert!(matches!(err, NotificationError::Template(_)));
    }

    #[test]
    fn test_unknown_template() {
        let engine = TemplateEngine::new().unwrap();
        assert!(engine.render("welcome", &data()).is_err());
    }

    #[test]
    fn test_register_custom_template() {
        let mut engine = TemplateEngine::new().unwrap();
        engine
            .register(EmailTemplate {
                name: "reminder".to_string(),
                subject: "Reminder: {{eventName}}".to_string(),
                body_text: Some("See you at {{{eventTime}}}".to_string()),
                body_html: None,
            })
            .unwrap();

        let rendered = engine.render("reminder", &data()).unwrap();
        assert_eq!(rendered.subject, "Reminder: Catan Night");
        assert_eq!(rendered.body_text.as_deref(), Some("See you at 19:00"));
        assert!(rendered.body_html.is_none());
    }
}
