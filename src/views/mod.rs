//! Server-rendered HTML.
//!
//! Views are plain functions from data to `String`. Every interpolated value
//! goes through [`escape_html`].

pub mod auth_form;
pub mod badge;
pub mod dashboard;

use std::fmt::Write;

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Full document wrapper.
pub fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body class="min-h-screen bg-background font-sans antialiased">
{body}
</body>
</html>"#,
        title = escape_html(title),
        body = body,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Default,
    Destructive,
}

/// Transient, dismissible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn check_email() -> Self {
        Self {
            title: "Check your email".to_string(),
            description: "We sent you a login link. Be sure to check your spam too.".to_string(),
            variant: ToastVariant::Default,
        }
    }

    pub fn sign_in_failed() -> Self {
        Self {
            title: "Something went wrong.".to_string(),
            description: "Your sign in request failed. Please try again.".to_string(),
            variant: ToastVariant::Destructive,
        }
    }

    pub fn render(&self) -> String {
        let class = match self.variant {
            ToastVariant::Default => "toast border bg-background text-foreground",
            ToastVariant::Destructive => "toast destructive border-destructive bg-destructive text-destructive-foreground",
        };

        let mut out = String::new();
        let _ = write!(
            out,
            r#"<div role="status" class="{class}" data-toast><div class="grid gap-1"><div class="text-sm font-semibold">{title}</div><div class="text-sm opacity-90">{description}</div></div><button type="button" class="toast-close" aria-label="Dismiss" onclick="this.parentElement.remove()">&times;</button></div>"#,
            class = class,
            title = escape_html(&self.title),
            description = escape_html(&self.description),
        );
        out
    }
}

/// Small inline icons keyed by name.
pub fn icon(name: &str, class: &str) -> String {
    let path = match name {
        "post" => r#"<path d="M14.5 2H6a2 2 0 0 0-2 2v16a2 2 0 0 0 2 2h12a2 2 0 0 0 2-2V7.5L14.5 2z"/><polyline points="14 2 14 8 20 8"/>"#,
        "spinner" => r#"<path d="M21 12a9 9 0 1 1-6.219-8.56"/>"#,
        "github" => r#"<path d="M9 19c-5 1.5-5-2.5-7-3m14 6v-3.87a3.37 3.37 0 0 0-.94-2.61c3.14-.35 6.44-1.54 6.44-7A5.44 5.44 0 0 0 20 4.77 5.07 5.07 0 0 0 19.91 1S18.73.65 16 2.48a13.38 13.38 0 0 0-7 0C6.27.65 5.09 1 5.09 1A5.07 5.07 0 0 0 5 4.77a5.44 5.44 0 0 0-1.5 3.78c0 5.42 3.3 6.61 6.44 7A3.37 3.37 0 0 0 9 18.13V22"/>"#,
        "chrome" => r#"<circle cx="12" cy="12" r="10"/><circle cx="12" cy="12" r="4"/><line x1="21.17" y1="8" x2="12" y2="8"/><line x1="3.95" y1="6.06" x2="8.54" y2="14"/><line x1="10.88" y1="21.94" x2="15.46" y2="14"/>"#,
        "add" => r#"<line x1="12" y1="5" x2="12" y2="19"/><line x1="5" y1="12" x2="19" y2="12"/>"#,
        _ => "",
    };

    format!(
        r#"<svg class="{}" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" data-icon="{}">{}</svg>"#,
        escape_html(class),
        escape_html(name),
        path
    )
}
