/// A self-contained page with the SVG inlined and the hover style sheet in
/// the head.
pub fn page(title: &str, stylesheet: &str, svg: &str) -> String {
    let mut html = String::with_capacity(svg.len() + stylesheet.len() + 512);
    html.push_str("<!DOCTYPE html>\n");
    html.push_str("<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(title)));
    html.push_str("<style>\nbody {margin: 0; overflow: auto;}\nsvg {display: block;}\n");
    html.push_str(stylesheet);
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str(svg.trim_end());
    html.push_str("\n</body>\n</html>\n");
    html
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_svg_in_a_complete_page() {
        let html = page("fileDAG", "g.edge:hover * {stroke-width: 5;}\n", "<svg></svg>\n");

        assert!(html.starts_with("<!DOCTYPE html>\n<html"));
        assert!(html.contains("<title>fileDAG</title>"));
        assert!(html.contains("g.edge:hover * {stroke-width: 5;}\n</style>"));
        assert!(html.contains("<body>\n<svg></svg>\n</body>"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn title_is_escaped() {
        let html = page("a <b> & \"c\"", "", "<svg/>");

        assert!(html.contains("<title>a &lt;b&gt; &amp; &quot;c&quot;</title>"));
    }
}
