/// Turns document markup into text a terminal can show.
pub trait Converter: Send + Sync {
    fn to_markdown(&self, html: &str) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Html2MdConverter;

impl Converter for Html2MdConverter {
    fn to_markdown(&self, html: &str) -> String {
        let markdown = html2md::parse_html(html);
        markdown
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::{Converter, Html2MdConverter};

    #[test]
    fn blank_lines_are_dropped() {
        let markdown = Html2MdConverter.to_markdown("<p>one</p><p>two</p>");
        assert_eq!(markdown, "one\ntwo");
    }
}
