//! Minimal HTML rendering for the server-rendered pages.
//!
//! Pages are small enough that a shared layout plus `format!` fragments
//! covers them; all user-supplied text goes through [`escape`].

use crate::error::FieldErrors;

/// Escape text for interpolation into HTML element content or attribute
/// values (attributes must be double-quoted).
pub fn escape(input: &str) -> String {
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

const STYLE: &str = r#"
    body { font-family: system-ui, sans-serif; max-width: 46rem; margin: 2rem auto; padding: 0 1rem; color: #222; }
    nav { display: flex; gap: 1rem; border-bottom: 1px solid #ddd; padding-bottom: 0.75rem; margin-bottom: 1.5rem; }
    nav a { text-decoration: none; color: #0b5fa5; }
    table { border-collapse: collapse; width: 100%; }
    th, td { text-align: left; padding: 0.4rem 0.6rem; border-bottom: 1px solid #eee; }
    form.inline { display: inline; }
    label { display: block; margin-top: 0.75rem; font-weight: 600; }
    input, select, textarea { width: 100%; max-width: 24rem; padding: 0.35rem; margin-top: 0.2rem; }
    button { margin-top: 1rem; padding: 0.4rem 1rem; }
    .field-error { color: #b00020; margin: 0.2rem 0 0; font-size: 0.9rem; }
    .muted { color: #777; }
"#;

/// Wrap page content in the shared chrome. `logged_in` switches the nav
/// between app links and login/register links.
pub fn layout(title: &str, logged_in: bool, body: &str) -> String {
    let nav = if logged_in {
        r#"<a href="/dashboard">Dashboard</a>
           <a href="/skills">Skills</a>
           <a href="/sessions">Sessions</a>
           <a href="/profile">Profile</a>
           <a href="/logout">Log out</a>"#
    } else {
        r#"<a href="/">Home</a>
           <a href="/login">Log in</a>
           <a href="/register">Register</a>"#
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} — SkillTrack</title>
<style>{STYLE}</style>
</head>
<body>
<nav>{nav}</nav>
{body}
</body>
</html>"#,
        title = escape(title),
    )
}

/// Inline error paragraph for one form field, or nothing.
pub fn field_error(errors: Option<&FieldErrors>, field: &str) -> String {
    match errors.and_then(|e| e.get(field)) {
        Some(message) => format!(r#"<p class="field-error">{}</p>"#, escape(message)),
        None => String::new(),
    }
}

/// `<option>` tag with the selected attribute set when appropriate.
pub fn option_tag(value: &str, label: &str, selected: bool) -> String {
    format!(
        r#"<option value="{}"{}>{}</option>"#,
        escape(value),
        if selected { " selected" } else { "" },
        escape(label),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_covers_html_metacharacters() {
        assert_eq!(
            escape(r#"<b>"a" & 'b'</b>"#),
            "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn layout_escapes_the_title() {
        let page = layout("<script>", false, "body");
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn field_error_renders_only_when_present() {
        let mut errors = FieldErrors::new();
        errors.add("name", "This field is required");
        assert!(field_error(Some(&errors), "name").contains("This field is required"));
        assert_eq!(field_error(Some(&errors), "other"), "");
        assert_eq!(field_error(None, "name"), "");
    }

    #[test]
    fn option_tag_marks_selection() {
        assert!(option_tag("music", "Music", true).contains(" selected"));
        assert!(!option_tag("music", "Music", false).contains(" selected"));
    }
}
