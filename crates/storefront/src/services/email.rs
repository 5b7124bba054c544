//! Order confirmation email.
//!
//! Uses SMTP via lettre for delivery with Askama HTML and plain-text
//! templates. Every order produces two messages: the customer's confirmation
//! and a back-office copy that includes payment details.

use askama::Template;
use celestial_gems_core::OrderPayload;
use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
    transport::stub::{AsyncStubTransport, Error as StubError},
};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::instrument;

use crate::config::EmailConfig;

const CUSTOMER_SUBJECT: &str = "Your CelestialGems Order Confirmation";

/// HTML body for both order emails.
#[derive(Template)]
#[template(path = "email/order.html")]
struct OrderEmailHtml<'a> {
    order: &'a OrderPayload,
    admin: bool,
}

/// Plain text body for both order emails.
#[derive(Template)]
#[template(path = "email/order.txt")]
struct OrderEmailText<'a> {
    order: &'a OrderPayload,
    admin: bool,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum MailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// In-process transport error (tests).
    #[error("stub transport error: {0}")]
    Stub(#[from] StubError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Who an order email is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Customer,
    Admin,
}

#[derive(Clone)]
enum Mailer {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    Stub(AsyncStubTransport),
}

/// Email service for order notifications.
#[derive(Clone)]
pub struct EmailService {
    mailer: Mailer,
    sender: Address,
    admin: Address,
}

impl EmailService {
    /// Create an SMTP-backed email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the relay cannot be configured or an address is invalid.
    pub fn new(config: &EmailConfig) -> Result<Self, MailError> {
        let credentials = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Self::with_mailer(config, Mailer::Smtp(mailer))
    }

    /// Create an email service that records messages instead of sending them.
    ///
    /// Keep a clone of `stub` to inspect what was sent.
    ///
    /// # Errors
    ///
    /// Returns error if a configured address is invalid.
    pub fn with_stub(config: &EmailConfig, stub: AsyncStubTransport) -> Result<Self, MailError> {
        Self::with_mailer(config, Mailer::Stub(stub))
    }

    fn with_mailer(config: &EmailConfig, mailer: Mailer) -> Result<Self, MailError> {
        Ok(Self {
            mailer,
            sender: parse_address(&config.username)?,
            admin: parse_address(&config.admin_address)?,
        })
    }

    /// Send the customer confirmation, then the back-office copy.
    ///
    /// # Errors
    ///
    /// Returns the first send failure; the admin copy is not attempted if the
    /// customer message fails.
    pub async fn send_order_confirmation(&self, order: &OrderPayload) -> Result<(), MailError> {
        self.send_order(order, Recipient::Customer).await?;
        self.send_order(order, Recipient::Admin).await
    }

    /// Send one order email.
    ///
    /// # Errors
    ///
    /// Returns error if the email fails to send or a template fails to render.
    #[instrument(skip(self, order), fields(reference = %order.reference))]
    pub async fn send_order(
        &self,
        order: &OrderPayload,
        recipient: Recipient,
    ) -> Result<(), MailError> {
        let admin = recipient == Recipient::Admin;
        let html = OrderEmailHtml { order, admin }.render()?;
        let text = OrderEmailText { order, admin }.render()?;

        let (from, to, subject) = match recipient {
            Recipient::Customer => (
                Mailbox::new(Some("CelestialGems".to_string()), self.sender.clone()),
                Mailbox::new(
                    Some(order.customer.name.clone()),
                    parse_address(order.customer.email.as_str())?,
                ),
                CUSTOMER_SUBJECT.to_string(),
            ),
            Recipient::Admin => (
                Mailbox::new(
                    Some("CelestialGems Order System".to_string()),
                    self.sender.clone(),
                ),
                Mailbox::new(None, self.admin.clone()),
                format!("New Order Received from {}", order.customer.name),
            ),
        };

        self.send_multipart_email(from, to, &subject, &text, &html)
            .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        from: Mailbox,
        to: Mailbox,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), MailError> {
        let to_display = to.email.to_string();
        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        match &self.mailer {
            Mailer::Smtp(mailer) => {
                mailer.send(email).await?;
            }
            Mailer::Stub(mailer) => {
                mailer.send(email).await?;
            }
        }

        tracing::info!(to = %to_display, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

fn parse_address(raw: &str) -> Result<Address, MailError> {
    raw.parse()
        .map_err(|_| MailError::InvalidAddress(raw.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use celestial_gems_core::{
        CartEntry, Category, ContactDetails, Email, PaymentMethod, Price, Product, ProductId,
        ProductImage, Quantity,
    };
    use secrecy::SecretString;

    use super::*;

    fn config() -> EmailConfig {
        EmailConfig {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: "orders@celestialgems.shop".to_string(),
            password: SecretString::from("unused"),
            admin_address: "owner@celestialgems.shop".to_string(),
        }
    }

    fn order() -> OrderPayload {
        let product = Product {
            id: ProductId::new("1"),
            name: "Omega Seamaster".to_string(),
            slug: "omega-seamaster".to_string(),
            category: Category::Swiss,
            description: String::new(),
            long_description: String::new(),
            price: Price::from_cents(520_000),
            image: ProductImage {
                image_url: "https://images.example.com/seamaster.jpg".to_string(),
                image_hint: "dive watch".to_string(),
            },
            brand: "Omega".to_string(),
            model_type: None,
            is_trending: false,
            keywords: Vec::new(),
        };
        let cart = [CartEntry {
            product,
            quantity: Quantity::ONE,
        }];
        let customer = ContactDetails {
            name: "Jane Doe".to_string(),
            email: Email::parse("jane@example.com").unwrap(),
            address: "123 Luxury Lane".to_string(),
            city: "Jewel City".to_string(),
            state: "CA".to_string(),
            zip: "90210".to_string(),
        };
        let payment = PaymentMethod::Card {
            card_number: "4242424242424444".to_string(),
            expiry_date: "12/30".to_string(),
            cvc: "987".to_string(),
        };
        OrderPayload::build(&cart, customer, payment).unwrap()
    }

    #[tokio::test]
    async fn test_confirmation_sends_customer_then_admin() {
        let stub = AsyncStubTransport::new_ok();
        let service = EmailService::with_stub(&config(), stub.clone()).unwrap();
        service.send_order_confirmation(&order()).await.unwrap();

        let sent = stub.messages().await;
        assert_eq!(sent.len(), 2);

        let (customer_env, customer_msg) = &sent[0];
        assert_eq!(customer_env.to()[0].to_string(), "jane@example.com");
        assert!(customer_msg.contains("Subject: Your CelestialGems Order Confirmation"));

        let (admin_env, admin_msg) = &sent[1];
        assert_eq!(admin_env.to()[0].to_string(), "owner@celestialgems.shop");
        assert!(admin_msg.contains("Subject: New Order Received from Jane Doe"));
    }

    #[test]
    fn test_templates_show_payment_by_recipient() {
        let order = order();
        let customer = OrderEmailText {
            order: &order,
            admin: false,
        }
        .render()
        .unwrap();
        assert!(customer.contains("Credit Card"));
        assert!(!customer.contains("...4444"));

        let admin = OrderEmailHtml {
            order: &order,
            admin: true,
        }
        .render()
        .unwrap();
        assert!(admin.contains("...4444"));
        assert!(!admin.contains("12/30"));
        assert!(admin.contains("$5641.00"));
    }

    #[tokio::test]
    async fn test_failed_customer_send_skips_admin_copy() {
        let stub = AsyncStubTransport::new_error();
        let service = EmailService::with_stub(&config(), stub.clone()).unwrap();
        assert!(service.send_order_confirmation(&order()).await.is_err());
        assert!(stub.messages().await.len() <= 1);
    }
}
