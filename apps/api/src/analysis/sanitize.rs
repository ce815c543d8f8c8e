//! HTML Sanitizer — strips a raw job-posting document down to a bounded,
//! model-safe text blob. Pattern-based rather than a full DOM parse; always
//! returns a string, degrading on malformed input rather than failing.

use std::sync::OnceLock;

use regex::Regex;

use super::truncate_chars;

/// Upper bound for sanitized job HTML in the job-analysis path, sized to the
/// downstream model's context window.
pub const MAX_JOB_HTML_CHARS: usize = 35_000;

/// Elements whose entire content is stripped. Non-content by definition in a
/// job posting.
const STRIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "iframe", "embed", "object", "video", "audio", "canvas", "svg",
    "nav", "header", "footer", "aside",
];

/// Elements whose content must not survive even when the closing tag is
/// missing: an unclosed `<script>` would otherwise leak code to the model.
const TAIL_STRIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript"];

struct Patterns {
    blocks: Vec<Regex>,
    tails: Vec<Regex>,
    comments: Regex,
    ad_attrs: Regex,
    inter_tag_ws: Regex,
    whitespace: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        blocks: STRIPPED_ELEMENTS
            .iter()
            .map(|tag| {
                Regex::new(&format!(r"(?is)<{tag}\b.*?</{tag}\s*>")).expect("valid block pattern")
            })
            .collect(),
        tails: TAIL_STRIPPED_ELEMENTS
            .iter()
            .map(|tag| Regex::new(&format!(r"(?is)<{tag}\b.*$")).expect("valid tail pattern"))
            .collect(),
        comments: Regex::new(r"(?s)<!--.*?-->").expect("valid comment pattern"),
        ad_attrs: Regex::new(r#"(?i)(class|id)="[^"]*ad[^"]*""#).expect("valid ad pattern"),
        inter_tag_ws: Regex::new(r">\s+<").expect("valid inter-tag pattern"),
        whitespace: Regex::new(r"\s+").expect("valid whitespace pattern"),
    })
}

/// Sanitizes raw job-posting HTML: removes non-content blocks, comments, and
/// ad-marked attributes, collapses whitespace, and truncates to
/// [`MAX_JOB_HTML_CHARS`]. Pure function, no error path.
pub fn sanitize_job_html(raw_html: &str) -> String {
    let p = patterns();

    let mut html = raw_html.to_string();
    for re in &p.blocks {
        html = re.replace_all(&html, "").into_owned();
    }
    // Unclosed script/style/noscript: drop from the opening tag to the end.
    for re in &p.tails {
        html = re.replace_all(&html, "").into_owned();
    }
    html = p.comments.replace_all(&html, "").into_owned();
    html = p.ad_attrs.replace_all(&html, "").into_owned();
    html = p.whitespace.replace_all(&html, " ").into_owned();
    html = p.inter_tag_ws.replace_all(&html, "><").into_owned();

    truncate_chars(html.trim(), MAX_JOB_HTML_CHARS).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_script_blocks() {
        let html = "<div>Job</div><script>alert('x')</script><p>Rust engineer</p>";
        let out = sanitize_job_html(html);
        assert!(!out.contains("<script"));
        assert!(!out.contains("alert"));
        assert!(out.contains("Rust engineer"));
    }

    #[test]
    fn test_strips_style_and_comments() {
        let html = "<style>.a{color:red}</style><!-- tracking --><p>Backend role</p>";
        let out = sanitize_job_html(html);
        assert!(!out.contains("<style"));
        assert!(!out.contains("<!--"));
        assert!(out.contains("Backend role"));
    }

    #[test]
    fn test_strips_unclosed_script() {
        let html = "<p>Senior role</p><script src='x.js'>var a = 1;";
        let out = sanitize_job_html(html);
        assert!(!out.contains("<script"));
        assert!(out.contains("Senior role"));
    }

    #[test]
    fn test_strips_chrome_elements() {
        let html = "<nav>menu</nav><header>site</header><main>5+ years Python</main>\
                    <footer>links</footer><aside>ads</aside>";
        let out = sanitize_job_html(html);
        assert!(!out.contains("menu"));
        assert!(!out.contains("site"));
        assert!(out.contains("5+ years Python"));
        assert!(!out.contains("links"));
    }

    #[test]
    fn test_strips_ad_attributes() {
        let html = r#"<div class="banner-ad-top">promo</div><p>Engineer</p>"#;
        let out = sanitize_job_html(html);
        assert!(!out.contains("banner-ad-top"));
    }

    #[test]
    fn test_collapses_whitespace() {
        let html = "<p>Rust</p>   \n\n\t  <p>Engineer</p>";
        let out = sanitize_job_html(html);
        assert_eq!(out, "<p>Rust</p><p>Engineer</p>");
    }

    #[test]
    fn test_output_bounded_for_any_input() {
        let html = "x".repeat(MAX_JOB_HTML_CHARS * 2);
        let out = sanitize_job_html(&html);
        assert!(out.chars().count() <= MAX_JOB_HTML_CHARS);
    }

    #[test]
    fn test_malformed_input_degrades_without_panicking() {
        let out = sanitize_job_html("<div><<<>>><p junk");
        assert!(out.chars().count() <= MAX_JOB_HTML_CHARS);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert_eq!(sanitize_job_html(""), "");
    }

    #[test]
    fn test_case_insensitive_tag_match() {
        let html = "<SCRIPT>bad()</SCRIPT><p>role</p>";
        let out = sanitize_job_html(html);
        assert!(!out.to_lowercase().contains("<script"));
        assert!(out.contains("role"));
    }
}
