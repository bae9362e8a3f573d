//! HTML directory listings.

/// Render `entries` as an unordered list of links below `parent_url_path`.
///
/// Entries keep the order they are given in. Names and links are inserted
/// verbatim unless `escape` is set.
pub fn render(parent_url_path: &str, entries: &[String], escape: bool) -> String {
    let mut html = String::from("<html><body><ul>");

    for name in entries {
        let href = entry_href(parent_url_path, name);
        if escape {
            html.push_str(&format!(
                "<li><a href=\"{}\">{}</a></li>",
                html_escape(&href),
                html_escape(name)
            ));
        } else {
            html.push_str(&format!("<li><a href=\"{href}\">{name}</a></li>"));
        }
    }

    html.push_str("</ul></body></html>");
    html
}

/// Join a URL path and an entry name with forward slashes, collapsing `.`
/// and `..` segments the way a POSIX path join does.
pub fn entry_href(parent_url_path: &str, name: &str) -> String {
    let joined = if parent_url_path.is_empty() {
        name.replace('\\', "/")
    } else {
        format!("{parent_url_path}/{name}").replace('\\', "/")
    };
    let absolute = joined.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|s| *s != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            _ => segments.push(segment),
        }
    }

    let path = segments.join("/");
    if absolute {
        format!("/{path}")
    } else if path.is_empty() {
        ".".to_string()
    } else {
        path
    }
}

/// Escape HTML entities
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
