use std::sync::Arc;

use folio_di::Build;
use folio_templates_contracts::{Template, TemplateService, BASE_TEMPLATE, TEMPLATES};
use folio_utils::trace_instrument;
use tera::Tera;

#[derive(Debug, Clone, Build)]
pub struct TemplateServiceImpl {
    #[state]
    state: State,
}

#[derive(Debug, Clone)]
struct State(Arc<Tera>);

impl Default for State {
    fn default() -> Self {
        let mut tera = Tera::default();

        tera.add_raw_template("base", BASE_TEMPLATE)
            .expect("Failed to load base template");

        for &(name, template) in TEMPLATES {
            tera.add_raw_template(name, template)
                .unwrap_or_else(|err| panic!("Failed to load template {name}: {err}"));
        }

        Self(tera.into())
    }
}

impl TemplateService for TemplateServiceImpl {
    #[trace_instrument(skip(self, template), fields(template = T::NAME))]
    fn render<T: Template>(&self, template: &T) -> anyhow::Result<String> {
        let context = tera::Context::from_serialize(template)?;
        self.state.0.render(T::NAME, &context).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use folio_demo::{
        contact::{ANA, ANA_AI_REPLY, BOB},
        CTA_URL, OWNER_NAME, SOCIALS,
    };
    use folio_models::contact::ContactSubmission;
    use folio_templates_contracts::{ContactConfirmationTemplate, ContactNotificationTemplate};

    use super::*;

    #[test]
    fn notification_contains_message_and_reply() {
        // Arrange
        let template = notification(&ANA, true);

        // Act
        let result = render(&template);

        // Assert
        assert!(result.contains("Hello there"));
        assert!(result.contains("ana@x.com"));
        assert!(result.contains("Hi Ana,"));
        assert!(result.contains("AI generated"));
        assert!(result.contains("Best,<br>Jane Doe"));
    }

    #[test]
    fn notification_without_reply() {
        // Arrange
        let template = ContactNotificationTemplate {
            reply: None,
            ..notification(&ANA, false)
        };

        // Act
        let result = render(&template);

        // Assert
        assert!(result.contains("Hello there"));
        assert!(!result.contains("Reply sent to the visitor"));
    }

    #[test]
    fn notification_escapes_and_keeps_line_breaks() {
        // Arrange
        let template = notification(&BOB, false);

        // Act
        let result = render(&template);

        // Assert
        assert!(!result.contains("<script>"));
        assert!(!result.contains("<b>Builder</b>"));
        assert!(result.contains("Bob &lt;b&gt;Builder&lt;&#x2F;b&gt;"));
        assert!(result.contains("First line<br>Second line &lt;script&gt;"));
        assert!(result.contains("Question about &quot;Folio&quot; &amp; co"));
        assert!(!result.contains("AI generated"));
    }

    #[test]
    fn confirmation_does_not_contain_message() {
        // Arrange
        let template = confirmation();

        // Act
        let result = render(&template);

        // Assert
        assert!(!result.contains(&**ANA.message));
        assert!(result.contains("Hi Ana,"));
        assert!(result.contains("Best,<br>Jane Doe"));
        assert!(result.contains("href=\"https:&#x2F;&#x2F;jane.example.com&#x2F;\""));
        assert!(result.contains("github.com&#x2F;jane-doe"));
        assert!(result.contains("GitHub"));
        assert!(result.contains("&copy; 2024 Jane Doe"));
    }

    fn render<T: Template + 'static>(template: &T) -> String {
        let sut = TemplateServiceImpl {
            state: Default::default(),
        };
        sut.render(template).unwrap()
    }

    fn notification(
        submission: &ContactSubmission,
        ai_generated: bool,
    ) -> ContactNotificationTemplate {
        ContactNotificationTemplate {
            name: (*submission.name).clone(),
            email: (*submission.email).clone(),
            subject: (*submission.subject).clone(),
            message: (*submission.message).clone(),
            reply: Some(ANA_AI_REPLY.clone()),
            ai_generated,
            year: 2024,
        }
    }

    fn confirmation() -> ContactConfirmationTemplate {
        ContactConfirmationTemplate {
            greeting: ANA_AI_REPLY.greeting.clone(),
            response: ANA_AI_REPLY.response.clone(),
            closing: ANA_AI_REPLY.closing.clone(),
            owner_name: OWNER_NAME.into(),
            cta_url: CTA_URL.into(),
            socials: SOCIALS.clone(),
            year: 2024,
        }
    }
}
