use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use thiserror::Error;
use tracing::info;

use crate::domain::{order::Order, user::User};
use crate::infrastructure::config::MailConfig;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),
    #[error("failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),
    #[error("invalid email address: {0}")]
    InvalidAddress(String),
}

/// Outbound SMTP mailer. Holds no transport when EMAIL_USER/EMAIL_PASS are
/// unset, in which case every send is a logged no-op.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_address: String,
}

impl Mailer {
    pub fn new(config: &MailConfig) -> Result<Self, SmtpError> {
        let transport = match config.credentials() {
            Some((username, password)) => Some(
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
                    .port(config.port)
                    .credentials(Credentials::new(username, password))
                    .build(),
            ),
            None => {
                info!("email credentials not found, email functionality disabled");
                None
            }
        };

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }

    #[cfg(test)]
    pub fn disabled() -> Self {
        Self {
            transport: None,
            from_address: "noreply@ecommerce.com".into(),
        }
    }

    pub async fn send_order_confirmation(
        &self,
        order: &Order,
        user: &User,
    ) -> Result<(), MailerError> {
        let Some(transport) = &self.transport else {
            info!("email transporter not available, skipping order confirmation");
            return Ok(());
        };

        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| MailerError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(user
                .email
                .parse()
                .map_err(|_| MailerError::InvalidAddress(user.email.clone()))?)
            .subject("Order Confirmation - E-commerce Store")
            .header(ContentType::TEXT_HTML)
            .body(order_confirmation_body(order, user))?;

        transport.send(email).await?;
        info!(order_id = %order.id, to = %user.email, "order confirmation email sent");
        Ok(())
    }
}

fn order_confirmation_body(order: &Order, user: &User) -> String {
    let rows: String = order
        .items
        .iter()
        .map(|item| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>${}</td><td>${}</td></tr>",
                item.name,
                item.quantity,
                item.price,
                item.subtotal()
            )
        })
        .collect();

    let address = &order.shipping_address;
    format!(
        "<h1>Order Confirmation</h1>\
         <p>Dear {name},</p>\
         <p>Thank you for your order! Here are your order details:</p>\
         <h2>Order Summary</h2>\
         <table border=\"1\" style=\"border-collapse: collapse; width: 100%;\">\
         <thead><tr><th>Product</th><th>Quantity</th><th>Price</th><th>Total</th></tr></thead>\
         <tbody>{rows}</tbody></table>\
         <h3>Total Amount: ${total}</h3>\
         <h2>Shipping Address</h2>\
         <p>{street}<br>{city}, {state} {zip}<br>{country}</p>\
         <p>Your order status: <strong>{status}</strong></p>\
         <p>We'll notify you when your order ships.</p>\
         <p>Best regards,<br>E-commerce Store Team</p>",
        name = user.name,
        rows = rows,
        total = order.total_amount,
        street = address.street,
        city = address.city,
        state = address.state,
        zip = address.zip_code,
        country = address.country,
        status = order.status.as_str(),
    )
}
