use crate::serve::ServerContext;
use indoc::formatdoc;

pub fn escape_html(s: &str) -> String {
    s.replace("&", "&amp;")
        .replace("<", "&lt;")
        .replace(">", "&gt;")
        .replace("\"", "&quot;")
        .replace("'", "&#39;")
}

#[test]
fn test_escape_html() {
    assert_eq!(escape_html("a<b>'c'"), "a&lt;b&gt;&#39;c&#39;");
}

pub fn escape_xml(s: &str) -> String {
    s.replace("&", "&amp;")
        .replace("<", "&lt;")
        .replace(">", "&gt;")
        .replace("\"", "&quot;")
        .replace("'", "&apos;")
}

#[test]
fn test_escape_xml() {
    assert_eq!(escape_xml("foo&bar"), "foo&amp;bar");
}

/// Return formatted HTML that is small and readable.
pub fn minify(page: &str) -> String {
    let mut lines = Vec::new();
    let mut inside_code = false;
    for line in page.lines() {
        let trimmed = line.trim();
        // Don't minify code blocks.
        if trimmed.starts_with("<pre><code") {
            inside_code = true;
            lines.push(trimmed);
            continue;
        }
        if trimmed.starts_with("</code></pre>") {
            inside_code = false;
            lines.push(trimmed);
            continue;
        }
        if inside_code {
            lines.push(line);
        } else if !trimmed.is_empty() {
            lines.push(trimmed);
        }
    }
    lines.join("\n")
}

#[test]
fn test_minify() {
    let page = indoc::indoc! {r#"
      <pre><code class="language-rust">x = 1;

    println!("{x}");
    </code></pre>
    "#};
    let expected = indoc::indoc! {r#"
    <pre><code class="language-rust">x = 1;

    println!("{x}");
    </code></pre>
    "#}
    .trim();
    assert_eq!(minify(page), expected);
}

pub struct PageSettings {
    title: String,
    extra_head: String,
}

impl PageSettings {
    pub fn new(title: &str, extra_head: &str) -> Self {
        Self {
            title: title.to_string(),
            extra_head: extra_head.to_string(),
        }
    }
}

pub fn page(ctx: &ServerContext, settings: &PageSettings, body: &str) -> String {
    let site_name = escape_html(&ctx.args.site_name);
    let full_title = if settings.title.is_empty() {
        site_name.clone()
    } else {
        format!("{} - {site_name}", escape_html(&settings.title))
    };
    let html_lang = &ctx.args.html_lang;
    let extra_head = &settings.extra_head;
    let global_head = &ctx.args.extra_head;
    let page = formatdoc! {
        r#"
        <!DOCTYPE html>
        <html lang='{html_lang}'>
        <head>
            <meta charset='UTF-8'>
            <meta name='viewport' content='width=device-width, initial-scale=1'>
            <title>{full_title}</title>
            <meta property='og:site_name' content='{site_name}'/>
            {extra_head}
            {global_head}
        </head>
        <body>
            <div class='container'>
                {body}
            </div>
        </body>
        </html>
        "#,
    };
    minify(&page)
}
