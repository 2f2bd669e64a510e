//! `.env` templates for common SMTP providers.

use clap::ValueEnum;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    Gmail,
    Fastmail,
    Sendgrid,
    Custom,
}

impl Provider {
    fn host(self) -> &'static str {
        match self {
            Self::Gmail => "smtp.gmail.com",
            Self::Fastmail => "smtp.fastmail.com",
            Self::Sendgrid => "smtp.sendgrid.net",
            Self::Custom => "smtp.example.com",
        }
    }

    fn notes(self) -> &'static [&'static str] {
        match self {
            Self::Gmail => &[
                "Gmail requires 2-step verification and an App Password:",
                "Google Account > Security > App passwords. Use it as SMTP_PASS.",
            ],
            Self::Fastmail => &[
                "Create an app password under Settings > Privacy & Security.",
            ],
            Self::Sendgrid => &[
                "SMTP_USER is the literal string \"apikey\"; SMTP_PASS is the API key.",
                "FROM_EMAIL must be a verified sender identity.",
            ],
            Self::Custom => &["Replace host, port and credentials with your provider's values."],
        }
    }

    fn user(self) -> &'static str {
        match self {
            Self::Sendgrid => "apikey",
            _ => "you@example.com",
        }
    }
}

/// A ready-to-edit `.env` for `provider`.
pub fn env_template(provider: Provider) -> String {
    let mut out = String::new();
    for note in provider.notes() {
        out.push_str("# ");
        out.push_str(note);
        out.push('\n');
    }
    out.push_str(&format!(
        "\
# EDGAR asks for a descriptive User-Agent with a contact address.
SEC_USER_AGENT=\"Your Name you@example.com\"

SMTP_HOST={host}
SMTP_PORT=587
SMTP_USER={user}
SMTP_PASS=
FROM_EMAIL=you@example.com
TO_EMAIL=you@example.com

STAKEWATCH_DB=stakewatch_seen.duckdb
",
        host = provider.host(),
        user = provider.user(),
    ));
    out
}
