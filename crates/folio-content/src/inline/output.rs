use std::fmt::Write;

use super::types::{StyledRun, Styles, TextRun};

/// One inline style as an output marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Bold,
    Italic,
    Strike,
    Code,
}

/// Sink for a walk over styled runs.
pub trait RunOutput {
    type Error;

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error>;
    fn start_style(&mut self, style: Style) -> Result<(), Self::Error>;
    fn end_style(&mut self, style: Style) -> Result<(), Self::Error>;
    fn start_link(&mut self, href: &str) -> Result<(), Self::Error>;
    fn end_link(&mut self, href: &str) -> Result<(), Self::Error>;
}

/// Styles to open for a run, outermost first.
///
/// Code short-circuits everything else. Otherwise strike wraps italic wraps
/// bold, so bold sits innermost.
fn styles_outermost_first(styles: Styles) -> Vec<Style> {
    if styles.contains(Styles::CODE) {
        return vec![Style::Code];
    }
    let mut order = Vec::with_capacity(3);
    if styles.contains(Styles::STRIKE) {
        order.push(Style::Strike);
    }
    if styles.contains(Styles::ITALIC) {
        order.push(Style::Italic);
    }
    if styles.contains(Styles::BOLD) {
        order.push(Style::Bold);
    }
    order
}

fn process_text_run<O: RunOutput>(run: &TextRun, output: &mut O) -> Result<(), O::Error> {
    if run.text.is_empty() {
        return Ok(());
    }
    let order = styles_outermost_first(run.styles);
    for style in &order {
        output.start_style(*style)?;
    }
    output.write_text(&run.text)?;
    for style in order.iter().rev() {
        output.end_style(*style)?;
    }
    Ok(())
}

pub fn process_runs<O: RunOutput>(runs: &[StyledRun], output: &mut O) -> Result<(), O::Error> {
    for run in runs {
        match run {
            StyledRun::Text(text) => process_text_run(text, output)?,
            StyledRun::Link(link) => {
                output.start_link(&link.href)?;
                for text in &link.content {
                    process_text_run(text, output)?;
                }
                output.end_link(&link.href)?;
            }
        }
    }
    Ok(())
}

pub struct MarkdownRunOutput<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownRunOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn marker(style: Style) -> &'static str {
        match style {
            Style::Bold => "**",
            Style::Italic => "*",
            Style::Strike => "~~",
            Style::Code => "`",
        }
    }
}

impl<W: Write> RunOutput for MarkdownRunOutput<W> {
    type Error = std::fmt::Error;

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error> {
        self.writer.write_str(text)
    }

    fn start_style(&mut self, style: Style) -> Result<(), Self::Error> {
        self.writer.write_str(Self::marker(style))
    }

    fn end_style(&mut self, style: Style) -> Result<(), Self::Error> {
        self.writer.write_str(Self::marker(style))
    }

    fn start_link(&mut self, _href: &str) -> Result<(), Self::Error> {
        self.writer.write_char('[')
    }

    fn end_link(&mut self, href: &str) -> Result<(), Self::Error> {
        write!(self.writer, "]({})", href)
    }
}

/// Drops all markup, keeping only the visible text.
pub struct PlainRunOutput<W: Write> {
    writer: W,
}

impl<W: Write> PlainRunOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RunOutput for PlainRunOutput<W> {
    type Error = std::fmt::Error;

    fn write_text(&mut self, text: &str) -> Result<(), Self::Error> {
        self.writer.write_str(text)
    }

    fn start_style(&mut self, _style: Style) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end_style(&mut self, _style: Style) -> Result<(), Self::Error> {
        Ok(())
    }

    fn start_link(&mut self, _href: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn end_link(&mut self, _href: &str) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Serialize runs back to marker text.
pub fn serialize_inline(runs: &[StyledRun]) -> String {
    let mut output = MarkdownRunOutput::new(String::new());
    // Writing into a String cannot fail.
    let _ = process_runs(runs, &mut output);
    output.into_inner()
}

/// Visible text of the runs with every marker removed.
pub fn plain_text(runs: &[StyledRun]) -> String {
    let mut output = PlainRunOutput::new(String::new());
    let _ = process_runs(runs, &mut output);
    output.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inline::parse_inline;

    #[test]
    fn single_styles() {
        let runs = vec![
            StyledRun::styled("a", Styles::BOLD),
            StyledRun::plain(" "),
            StyledRun::styled("b", Styles::ITALIC),
            StyledRun::plain(" "),
            StyledRun::styled("c", Styles::STRIKE),
            StyledRun::plain(" "),
            StyledRun::styled("d()", Styles::CODE),
        ];
        assert_eq!(serialize_inline(&runs), "**a** *b* ~~c~~ `d()`");
    }

    #[test]
    fn combined_styles_nest_bold_innermost() {
        let runs = vec![StyledRun::styled(
            "x",
            Styles::BOLD | Styles::ITALIC | Styles::STRIKE,
        )];
        assert_eq!(serialize_inline(&runs), "~~***x***~~");
    }

    #[test]
    fn code_short_circuits_other_styles() {
        let runs = vec![StyledRun::styled("x", Styles::CODE | Styles::BOLD)];
        assert_eq!(serialize_inline(&runs), "`x`");
    }

    #[test]
    fn link_with_styled_label() {
        let runs = vec![StyledRun::link(
            "https://example.com",
            vec![TextRun::styled("go", Styles::ITALIC)],
        )];
        assert_eq!(serialize_inline(&runs), "[*go*](https://example.com)");
        assert_eq!(plain_text(&runs), "go");
    }

    #[test]
    fn unstyled_runs_have_no_markers() {
        assert_eq!(serialize_inline(&[StyledRun::plain("plain")]), "plain");
        assert_eq!(serialize_inline(&[]), "");
    }

    #[test]
    fn single_style_sequences_round_trip() {
        let cases = vec![
            vec![StyledRun::styled("Net inflows", Styles::BOLD)],
            vec![
                StyledRun::plain("Rates "),
                StyledRun::styled("held", Styles::ITALIC),
                StyledRun::plain(" steady"),
            ],
            vec![
                StyledRun::styled("was 4%", Styles::STRIKE),
                StyledRun::plain(" now "),
                StyledRun::styled("rate()", Styles::CODE),
            ],
            vec![
                StyledRun::plain("See "),
                StyledRun::link("https://example.com/a", vec![TextRun::plain("the note")]),
                StyledRun::plain("."),
            ],
        ];
        for runs in cases {
            assert_eq!(parse_inline(&serialize_inline(&runs)), runs);
        }
    }
}
