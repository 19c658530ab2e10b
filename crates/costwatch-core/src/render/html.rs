//! Branded HTML body of the alert email

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;

use crate::config::EmailConfig;

/// Logo image inlined into the email
#[derive(Debug, Clone)]
pub struct Logo {
    /// Raw image bytes
    pub data: Bytes,
    /// MIME type, e.g. `image/png`
    pub content_type: String,
}

impl Logo {
    /// `data:` URI carrying the image as base64
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.data))
    }
}

const STYLE: &str = r#"
      .container {
        font-family: Arial, sans-serif;
        max-width: 600px;
        margin: 0 auto;
        padding: 20px;
        border: 1px solid #ccc;
      }
      .header {
        background-color: #f0f0f0;
        padding: 10px;
        text-align: center;
      }
      .logo {
        text-align: center;
      }
      .logo img {
        max-width: 200px;
        height: auto;
      }
      .message {
        margin-top: 20px;
      }
      .message h2 {
        color: red;
      }
      .message p {
        margin: 10px 0;
      }
"#;

/// Static alert layout filled with configured wording
#[derive(Debug, Clone)]
pub struct AlertTemplate {
    heading: String,
    greeting: String,
    signature: String,
}

impl AlertTemplate {
    /// Template using the wording from email configuration
    pub fn from_config(config: &EmailConfig) -> Self {
        Self {
            heading: config.heading.clone(),
            greeting: config.greeting.clone(),
            signature: config.signature.clone(),
        }
    }

    /// Render the body; without a logo the logo block is left out entirely
    pub fn render(&self, total_line: &str, logo: Option<&Logo>) -> String {
        let logo_block = logo
            .map(|logo| {
                format!(
                    "\n      <div class=\"logo\">\n        <img src=\"{}\" alt=\"Logo\">\n      </div>",
                    logo.data_uri()
                )
            })
            .unwrap_or_default();

        format!(
            r#"<html>
  <head>
    <style>{style}</style>
  </head>
  <body>
    <div class="container">
      <div class="header">
        <h2>{heading}</h2>
      </div>{logo_block}
      <div class="message">
        <h2><span style="color: red;">{total}</span></h2>
        <p>{greeting}</p>
        <p>Your account cost has exceeded the configured threshold.</p>
      </div>
      <div class="message">
        <p>Please find the attached file for detailed cost information.</p>
        <p>Best regards,<br>{signature}</p>
      </div>
    </div>
  </body>
</html>
"#,
            style = STYLE,
            heading = escape(&self.heading),
            logo_block = logo_block,
            total = escape(total_line),
            greeting = escape(&self.greeting),
            signature = escape(&self.signature),
        )
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> AlertTemplate {
        AlertTemplate::from_config(&EmailConfig::default())
    }

    #[test]
    fn test_logo_is_inlined() {
        let logo = Logo {
            data: Bytes::from_static(b"\x89PNG"),
            content_type: "image/png".to_string(),
        };

        let html = template().render("Your Total Cost for this month: $12.00", Some(&logo));

        assert!(html.contains(r#"<img src="data:image/png;base64,iVBORw==" alt="Logo">"#));
        assert!(html.contains(r#"<span style="color: red;">Your Total Cost for this month: $12.00</span>"#));
    }

    #[test]
    fn test_missing_logo_drops_image() {
        let html = template().render("Your Total Cost for this month: $12.00", None);

        assert!(!html.contains("<img"));
        assert!(!html.contains("class=\"logo\""));
        assert!(html.contains("$12.00"));
    }

    #[test]
    fn test_configured_text_is_escaped() {
        let config = EmailConfig {
            signature: "Ops & <Finance>".to_string(),
            ..EmailConfig::default()
        };

        let html = AlertTemplate::from_config(&config).render("total", None);
        assert!(html.contains("Ops &amp; &lt;Finance&gt;"));
    }
}
